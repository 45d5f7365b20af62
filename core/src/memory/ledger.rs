//! In-memory booking ledger.
//!
//! Reservations on one event are serialized through a per-event async
//! mutex; the capacity check and the booking insert both happen under that
//! guard, so concurrent reservations can never jointly oversell an event.
//! Reservations on different events take different mutexes and proceed in
//! parallel.

use crate::booking::{Booking, BookingStatus};
use crate::catalog::EventCatalog;
use crate::clock::Clock;
use crate::error::{CoreError, Result};
use crate::ids::{BookingId, EventId, UserId};
use crate::ledger::BookingLedger;
use crate::user::Identity;
use crate::validate::validate_seat_count;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, RwLock};
use tokio::sync::Mutex as AsyncMutex;

/// In-memory booking ledger.
#[derive(Clone)]
pub struct MemoryLedger {
    catalog: Arc<dyn EventCatalog>,
    clock: Arc<dyn Clock>,
    bookings: Arc<RwLock<HashMap<BookingId, Booking>>>,
    event_locks: Arc<StdMutex<HashMap<EventId, Arc<AsyncMutex<()>>>>>,
}

impl MemoryLedger {
    /// Create an empty ledger over a catalog.
    #[must_use]
    pub fn new(catalog: Arc<dyn EventCatalog>, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog,
            clock,
            bookings: Arc::new(RwLock::new(HashMap::new())),
            event_locks: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    /// The mutex serializing mutations for one event.
    fn event_lock(&self, event_id: EventId) -> Result<Arc<AsyncMutex<()>>> {
        let mut guard = self
            .event_locks
            .lock()
            .map_err(|_| CoreError::Storage("ledger lock poisoned".to_string()))?;
        Ok(Arc::clone(
            guard.entry(event_id).or_insert_with(|| Arc::new(AsyncMutex::new(()))),
        ))
    }

    /// Seat sum of active bookings for one event, from committed state.
    fn active_seats(&self, event_id: EventId) -> Result<u32> {
        let guard = self
            .bookings
            .read()
            .map_err(|_| CoreError::Storage("ledger lock poisoned".to_string()))?;
        Ok(guard
            .values()
            .filter(|booking| booking.event_id == event_id && booking.is_active())
            .map(|booking| booking.seats)
            .sum())
    }

    fn insert(&self, booking: Booking) -> Result<()> {
        let mut guard = self
            .bookings
            .write()
            .map_err(|_| CoreError::Storage("ledger lock poisoned".to_string()))?;
        guard.insert(booking.id, booking);
        Ok(())
    }
}

#[async_trait]
impl BookingLedger for MemoryLedger {
    async fn reserve(&self, event_id: EventId, user_id: UserId, seats: u32) -> Result<Booking> {
        let lock = self.event_lock(event_id)?;
        let _serialized = lock.lock().await;

        // All four preconditions run under the event's mutex; nothing can
        // commit against this event between the availability read and the
        // insert below.
        let event = self.catalog.get(event_id).await?;
        if event.has_started(self.clock.now()) {
            return Err(CoreError::EventEnded);
        }
        validate_seat_count(seats)?;

        let taken = self.active_seats(event_id)?;
        let available = event.total_seats.saturating_sub(taken);
        if available < seats {
            return Err(CoreError::InsufficientCapacity {
                requested: seats,
                available,
            });
        }

        let booking = Booking {
            id: BookingId::new(),
            event_id,
            user_id,
            seats,
            status: BookingStatus::Active,
            created_at: self.clock.now(),
            cancelled_at: None,
        };
        self.insert(booking.clone())?;
        Ok(booking)
    }

    async fn cancel(&self, booking_id: BookingId, actor: Identity) -> Result<Booking> {
        let event_id = self.get(booking_id).await?.event_id;
        let lock = self.event_lock(event_id)?;
        let _serialized = lock.lock().await;

        let now = self.clock.now();
        let mut guard = self
            .bookings
            .write()
            .map_err(|_| CoreError::Storage("ledger lock poisoned".to_string()))?;
        let booking = guard.get_mut(&booking_id).ok_or(CoreError::BookingNotFound)?;

        if booking.user_id != actor.user_id && !actor.is_admin() {
            return Err(CoreError::Forbidden);
        }
        if !booking.is_active() {
            return Err(CoreError::AlreadyCancelled);
        }

        booking.status = BookingStatus::Cancelled;
        booking.cancelled_at = Some(now);
        Ok(booking.clone())
    }

    async fn available_seats(&self, event_id: EventId) -> Result<u32> {
        let event = self.catalog.get(event_id).await?;
        let taken = self.active_seats(event_id)?;
        Ok(event.total_seats.saturating_sub(taken))
    }

    async fn get(&self, booking_id: BookingId) -> Result<Booking> {
        let guard = self
            .bookings
            .read()
            .map_err(|_| CoreError::Storage("ledger lock poisoned".to_string()))?;
        guard
            .get(&booking_id)
            .cloned()
            .ok_or(CoreError::BookingNotFound)
    }

    async fn for_user(&self, user_id: UserId) -> Result<Vec<Booking>> {
        let guard = self
            .bookings
            .read()
            .map_err(|_| CoreError::Storage("ledger lock poisoned".to_string()))?;
        let mut bookings: Vec<Booking> = guard
            .values()
            .filter(|booking| booking.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(bookings)
    }

    async fn all(&self) -> Result<Vec<Booking>> {
        let guard = self
            .bookings
            .read()
            .map_err(|_| CoreError::Storage("ledger lock poisoned".to_string()))?;
        let mut bookings: Vec<Booking> = guard.values().cloned().collect();
        bookings.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(bookings)
    }
}
