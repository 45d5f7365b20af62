//! Router configuration.
//!
//! Builds the complete Axum router. Route order matters for the `/events`
//! tree: the literal `upcoming`/`past` segments are registered before the
//! `:id` capture.

use crate::handlers::health::{health_check, readiness_check};
use crate::handlers::{bookings, events, users};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// Build the complete Axum router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health checks (no authentication)
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // Event catalog: public reads, administrative writes
        .route("/events", get(events::list_events).post(events::create_event))
        .route("/events/upcoming", get(events::list_upcoming))
        .route("/events/past", get(events::list_past))
        .route(
            "/events/:id",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::retire_event),
        )
        .route("/events/:id/availability", get(events::get_availability))
        // Bookings: authenticated
        .route(
            "/bookings",
            post(bookings::create_booking).get(bookings::list_bookings),
        )
        .route("/bookings/my-bookings", get(bookings::my_bookings))
        .route(
            "/bookings/:id",
            get(bookings::get_booking).delete(bookings::cancel_booking),
        )
        // Users
        .route("/users/me", get(users::me))
        .with_state(state)
}
