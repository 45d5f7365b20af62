//! Application state for the HTTP server.

use crate::auth::IdentityProvider;
use seatwise_core::user::UserStore;
use seatwise_core::{BookingService, Clock, EventCatalog};
use std::sync::Arc;

/// State shared across all HTTP handlers, cloned cheaply per request.
#[derive(Clone)]
pub struct AppState {
    /// Booking service (authorization policy + catalog/ledger delegation).
    pub service: BookingService,
    /// Event catalog, for the public listing endpoints.
    pub catalog: Arc<dyn EventCatalog>,
    /// User directory, for profile reads.
    pub users: Arc<dyn UserStore>,
    /// Identity collaborator resolving bearer tokens.
    pub identity: Arc<dyn IdentityProvider>,
    /// Time source for the listing split.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create application state.
    #[must_use]
    pub fn new(
        service: BookingService,
        catalog: Arc<dyn EventCatalog>,
        users: Arc<dyn UserStore>,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            service,
            catalog,
            users,
            identity,
            clock,
        }
    }
}
