//! Booking endpoints.

use crate::auth::{CallerIdentity, RequireAdmin};
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use seatwise_core::{Booking, BookingId, BookingStatus, EventId, UserId};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to reserve seats on an event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    /// Event to book.
    pub event_id: EventId,
    /// Seats to reserve (1..=4).
    pub number_of_seats: u32,
}

/// Booking as served to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    /// Booking id.
    pub id: BookingId,
    /// Booked event.
    pub event_id: EventId,
    /// Booking owner.
    pub user_id: UserId,
    /// Seats held (or previously held).
    pub number_of_seats: u32,
    /// Current status.
    pub status: BookingStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Cancellation timestamp, if cancelled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            event_id: booking.event_id,
            user_id: booking.user_id,
            number_of_seats: booking.seats,
            status: booking.status,
            created_at: booking.created_at,
            cancelled_at: booking.cancelled_at,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// `POST /bookings` — reserve seats for the caller.
///
/// Responds 201 with the booking, or 400 with a machine-readable code when
/// the ledger rejects the reservation (invalid seat count, event already
/// started, not enough seats left).
pub async fn create_booking(
    CallerIdentity(identity): CallerIdentity,
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let booking = state
        .service
        .reserve(identity, request.event_id, request.number_of_seats)
        .await?;
    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// `GET /bookings` — every booking across users (admin only).
pub async fn list_bookings(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let bookings = state.service.all_bookings(admin).await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

/// `GET /bookings/my-bookings` — the caller's bookings, active and
/// cancelled.
pub async fn my_bookings(
    CallerIdentity(identity): CallerIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let bookings = state.service.my_bookings(identity).await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

/// `GET /bookings/:id` — one booking; owner or admin only.
pub async fn get_booking(
    CallerIdentity(identity): CallerIdentity,
    State(state): State<AppState>,
    Path(booking_id): Path<BookingId>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = state.service.booking(identity, booking_id).await?;
    Ok(Json(booking.into()))
}

/// `DELETE /bookings/:id` — cancel a booking; owner or admin only.
///
/// Responds 204 on success; 404 when absent, 403 for other callers, 409
/// when already cancelled. The released seats become available immediately.
pub async fn cancel_booking(
    CallerIdentity(identity): CallerIdentity,
    State(state): State<AppState>,
    Path(booking_id): Path<BookingId>,
) -> Result<StatusCode, ApiError> {
    state.service.cancel(identity, booking_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
