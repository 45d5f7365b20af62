//! Booking service.
//!
//! Thin orchestrator between caller identity and the stores: it decides who
//! may see or cancel what, and delegates all seat accounting to the ledger.

use crate::booking::Booking;
use crate::catalog::EventCatalog;
use crate::error::{CoreError, Result};
use crate::event::Event;
use crate::ids::{BookingId, EventId};
use crate::ledger::BookingLedger;
use crate::user::Identity;
use std::sync::Arc;
use tracing::info;

/// Booking service: authorization policy plus delegation to the catalog and
/// the ledger. Holds no state of its own.
#[derive(Clone)]
pub struct BookingService {
    catalog: Arc<dyn EventCatalog>,
    ledger: Arc<dyn BookingLedger>,
}

impl BookingService {
    /// Create a service over a catalog and a ledger.
    #[must_use]
    pub fn new(catalog: Arc<dyn EventCatalog>, ledger: Arc<dyn BookingLedger>) -> Self {
        Self { catalog, ledger }
    }

    /// The event catalog behind this service.
    #[must_use]
    pub fn catalog(&self) -> &Arc<dyn EventCatalog> {
        &self.catalog
    }

    /// Reserve seats on an event for the caller.
    ///
    /// # Errors
    ///
    /// Propagates the ledger's rejection (`EventNotFound`, `EventEnded`,
    /// `InvalidSeatCount`, `InsufficientCapacity`) or `Storage` failure.
    pub async fn reserve(
        &self,
        identity: Identity,
        event_id: EventId,
        seats: u32,
    ) -> Result<Booking> {
        let booking = self
            .ledger
            .reserve(event_id, identity.user_id, seats)
            .await?;
        info!(
            booking_id = %booking.id,
            event_id = %event_id,
            user_id = %identity.user_id,
            seats,
            "booking created"
        );
        Ok(booking)
    }

    /// Cancel a booking on behalf of the caller.
    ///
    /// # Errors
    ///
    /// Propagates the ledger's rejection (`BookingNotFound`,
    /// `AlreadyCancelled`, `Forbidden`) or `Storage` failure.
    pub async fn cancel(&self, identity: Identity, booking_id: BookingId) -> Result<Booking> {
        let booking = self.ledger.cancel(booking_id, identity).await?;
        info!(
            booking_id = %booking.id,
            event_id = %booking.event_id,
            user_id = %identity.user_id,
            "booking cancelled"
        );
        Ok(booking)
    }

    /// Fetch one booking. Only its owner or an administrator may read it.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::BookingNotFound` if absent, `CoreError::Forbidden`
    /// for other callers, `CoreError::Storage` on backend failure.
    pub async fn booking(&self, identity: Identity, booking_id: BookingId) -> Result<Booking> {
        let booking = self.ledger.get(booking_id).await?;
        if booking.user_id != identity.user_id && !identity.is_admin() {
            return Err(CoreError::Forbidden);
        }
        Ok(booking)
    }

    /// The caller's bookings, active and cancelled, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Storage` on backend failure.
    pub async fn my_bookings(&self, identity: Identity) -> Result<Vec<Booking>> {
        self.ledger.for_user(identity.user_id).await
    }

    /// Every booking across users. Administrators only.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Forbidden` for non-administrators,
    /// `CoreError::Storage` on backend failure.
    pub async fn all_bookings(&self, identity: Identity) -> Result<Vec<Booking>> {
        if !identity.is_admin() {
            return Err(CoreError::Forbidden);
        }
        self.ledger.all().await
    }

    /// Seats still available on an event.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EventNotFound` if absent or retired,
    /// `CoreError::Storage` on backend failure.
    pub async fn availability(&self, event_id: EventId) -> Result<u32> {
        self.ledger.available_seats(event_id).await
    }

    /// Event detail together with its derived availability.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EventNotFound` if absent or retired,
    /// `CoreError::Storage` on backend failure.
    pub async fn event_with_availability(&self, event_id: EventId) -> Result<(Event, u32)> {
        let event = self.catalog.get(event_id).await?;
        let available = self.ledger.available_seats(event_id).await?;
        Ok((event, available))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::NewEvent;
    use crate::clock::FixedClock;
    use crate::ids::UserId;
    use crate::memory::{MemoryCatalog, MemoryLedger};
    use chrono::{Duration, TimeZone, Utc};

    async fn service_with_event() -> (BookingService, EventId) {
        let now = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
        let clock = Arc::new(FixedClock::new(now));
        let catalog = Arc::new(MemoryCatalog::new(clock.clone()));
        let ledger = Arc::new(MemoryLedger::new(catalog.clone(), clock.clone()));

        let event = catalog
            .create(NewEvent {
                title: "Evening gala".to_string(),
                description: "An evening of live music".to_string(),
                starts_at: now + Duration::hours(6),
                time_window: "06:00 PM - 11:00 PM".to_string(),
                location: "Town Hall".to_string(),
                tags: vec!["music".to_string()],
                total_seats: 10,
                image_url: "https://img.example/gala.jpg".to_string(),
            })
            .await
            .unwrap();

        (BookingService::new(catalog, ledger), event.id)
    }

    #[tokio::test]
    async fn booking_detail_is_owner_or_admin_only() {
        let (service, event_id) = service_with_event().await;
        let owner = Identity::attendee(UserId::new());
        let booking = service.reserve(owner, event_id, 2).await.unwrap();

        assert_eq!(
            service
                .booking(Identity::attendee(UserId::new()), booking.id)
                .await,
            Err(CoreError::Forbidden)
        );
        assert!(service.booking(owner, booking.id).await.is_ok());
        assert!(service
            .booking(Identity::admin(UserId::new()), booking.id)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn listing_all_bookings_requires_admin() {
        let (service, event_id) = service_with_event().await;
        let attendee = Identity::attendee(UserId::new());
        service.reserve(attendee, event_id, 1).await.unwrap();

        assert_eq!(
            service.all_bookings(attendee).await,
            Err(CoreError::Forbidden)
        );
        assert_eq!(
            service
                .all_bookings(Identity::admin(UserId::new()))
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn my_bookings_only_returns_the_callers_rows() {
        let (service, event_id) = service_with_event().await;
        let alice = Identity::attendee(UserId::new());
        let bob = Identity::attendee(UserId::new());

        service.reserve(alice, event_id, 1).await.unwrap();
        service.reserve(bob, event_id, 2).await.unwrap();

        let mine = service.my_bookings(alice).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].user_id, alice.user_id);
    }

    #[tokio::test]
    async fn event_detail_carries_derived_availability() {
        let (service, event_id) = service_with_event().await;
        service
            .reserve(Identity::attendee(UserId::new()), event_id, 4)
            .await
            .unwrap();

        let (event, available) = service.event_with_availability(event_id).await.unwrap();
        assert_eq!(event.total_seats, 10);
        assert_eq!(available, 6);
    }
}
