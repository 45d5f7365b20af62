//! Event endpoints.
//!
//! Wire field names (`date`, `time`, `image`, `totalSeats`) follow the
//! frontend's existing contract. Listing responses carry catalog fields
//! only; the detail and availability endpoints add the derived seat count.

use crate::auth::RequireAdmin;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use seatwise_core::{CoreError, Event, EventId, EventPatch, NewEvent};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Event as served to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    /// Event id.
    pub id: EventId,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Scheduled start.
    pub date: DateTime<Utc>,
    /// Display time window.
    pub time: String,
    /// Venue.
    pub location: String,
    /// Tags.
    pub tags: Vec<String>,
    /// Total seat capacity.
    pub total_seats: u32,
    /// Image reference.
    pub image: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Derived availability; present on detail responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_seats: Option<u32>,
}

impl EventResponse {
    fn from_event(event: Event, available_seats: Option<u32>) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            date: event.starts_at,
            time: event.time_window,
            location: event.location,
            tags: event.tags,
            total_seats: event.total_seats,
            image: event.image_url,
            created_at: event.created_at,
            updated_at: event.updated_at,
            available_seats,
        }
    }
}

/// Request to create an event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    /// Title (at least six characters).
    pub title: String,
    /// Description (at least six characters).
    pub description: String,
    /// Scheduled start.
    pub date: DateTime<Utc>,
    /// Display time window, e.g. `"10:00 AM - 04:30 PM"`.
    pub time: String,
    /// Venue.
    pub location: String,
    /// Tags, each a single alphabetic word.
    pub tags: Vec<String>,
    /// Total seat capacity.
    pub total_seats: u32,
    /// Image reference.
    pub image: String,
}

/// Request to update an event's mutable fields.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New start.
    pub date: Option<DateTime<Utc>>,
    /// New display time window.
    pub time: Option<String>,
    /// New venue.
    pub location: Option<String>,
    /// New tag set.
    pub tags: Option<Vec<String>>,
    /// Capacity changes are rejected; the field exists so the attempt gets
    /// a clear error instead of being silently dropped.
    pub total_seats: Option<u32>,
    /// New image reference.
    pub image: Option<String>,
}

/// Availability for one event.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    /// Event id.
    pub event_id: EventId,
    /// Seats still available.
    pub available_seats: u32,
}

// ============================================================================
// Public handlers
// ============================================================================

/// `GET /events` — all published events.
pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let events = state.catalog.list().await?;
    Ok(Json(
        events
            .into_iter()
            .map(|e| EventResponse::from_event(e, None))
            .collect(),
    ))
}

/// `GET /events/upcoming` — events starting after now.
pub async fn list_upcoming(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let events = state.catalog.list_upcoming(state.clock.now()).await?;
    Ok(Json(
        events
            .into_iter()
            .map(|e| EventResponse::from_event(e, None))
            .collect(),
    ))
}

/// `GET /events/past` — events already started.
pub async fn list_past(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let events = state.catalog.list_past(state.clock.now()).await?;
    Ok(Json(
        events
            .into_iter()
            .map(|e| EventResponse::from_event(e, None))
            .collect(),
    ))
}

/// `GET /events/:id` — event detail with derived availability.
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> Result<Json<EventResponse>, ApiError> {
    let (event, available) = state.service.event_with_availability(event_id).await?;
    Ok(Json(EventResponse::from_event(event, Some(available))))
}

/// `GET /events/:id/availability` — derived seat count only.
pub async fn get_availability(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let available_seats = state.service.availability(event_id).await?;
    Ok(Json(AvailabilityResponse {
        event_id,
        available_seats,
    }))
}

// ============================================================================
// Administrative handlers
// ============================================================================

/// `POST /events` — create an event (admin only).
pub async fn create_event(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    let event = state
        .catalog
        .create(NewEvent {
            title: request.title,
            description: request.description,
            starts_at: request.date,
            time_window: request.time,
            location: request.location,
            tags: request.tags,
            total_seats: request.total_seats,
            image_url: request.image,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(EventResponse::from_event(event, None)),
    ))
}

/// `PATCH /events/:id` — update mutable fields (admin only).
///
/// Attempts to change `totalSeats` are rejected: capacity is fixed at
/// creation so that availability stays a pure derived quantity.
pub async fn update_event(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    if request.total_seats.is_some() {
        return Err(CoreError::CapacityImmutable.into());
    }

    let event = state
        .catalog
        .update(
            event_id,
            EventPatch {
                title: request.title,
                description: request.description,
                starts_at: request.date,
                time_window: request.time,
                location: request.location,
                tags: request.tags,
                image_url: request.image,
            },
        )
        .await?;

    Ok(Json(EventResponse::from_event(event, None)))
}

/// `DELETE /events/:id` — retire an event (admin only).
pub async fn retire_event(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> Result<StatusCode, ApiError> {
    state.catalog.retire(event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
