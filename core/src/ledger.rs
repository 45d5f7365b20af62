//! Booking ledger.
//!
//! The ledger is the single authority for "does this booking fit". Its
//! `reserve` operation performs the capacity check and the booking insert as
//! one indivisible unit, serialized per event: two reservations that would
//! jointly exceed an event's capacity can never both succeed, regardless of
//! how their calls interleave. Reservations against different events do not
//! block each other.
//!
//! Availability is derived — total capacity minus the seat sum of active
//! bookings — and is recomputed inside the same atomic scope as every write
//! that depends on it. There is no stored seat counter to drift out of sync.

use crate::booking::Booking;
use crate::error::Result;
use crate::ids::{BookingId, EventId, UserId};
use crate::user::Identity;
use async_trait::async_trait;

/// Booking ledger: records bookings against events and enforces the
/// capacity and timing invariants.
#[async_trait]
pub trait BookingLedger: Send + Sync {
    /// Reserve `seats` on an event for a user.
    ///
    /// Preconditions, checked in order inside one atomic unit of work:
    ///
    /// 1. the event exists and is published;
    /// 2. the event has not started yet;
    /// 3. `seats` is within 1..=4;
    /// 4. the derived availability covers `seats`.
    ///
    /// On success a new active [`Booking`] is inserted and returned.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EventNotFound`, `CoreError::EventEnded`,
    /// `CoreError::InvalidSeatCount` or `CoreError::InsufficientCapacity`
    /// per the precondition that failed; `CoreError::Storage` if the
    /// backend fails. `InsufficientCapacity` is an expected outcome under
    /// contention, not an exceptional one.
    async fn reserve(&self, event_id: EventId, user_id: UserId, seats: u32) -> Result<Booking>;

    /// Cancel a booking on behalf of `actor`.
    ///
    /// The booking must exist and be active, and the actor must be its
    /// owner or an administrator. The status transition is atomic with
    /// respect to concurrent `reserve`/`cancel` calls; the released seats
    /// become available immediately because availability is derived.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::BookingNotFound`, `CoreError::AlreadyCancelled`
    /// or `CoreError::Forbidden` per the check that failed;
    /// `CoreError::Storage` if the backend fails.
    async fn cancel(&self, booking_id: BookingId, actor: Identity) -> Result<Booking>;

    /// Seats still available on an event: total capacity minus the seat sum
    /// of active bookings, read consistently with concurrent reservations.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EventNotFound` if the event does not exist or is
    /// retired; `CoreError::Storage` if the backend fails.
    async fn available_seats(&self, event_id: EventId) -> Result<u32>;

    /// Get a booking by id.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::BookingNotFound` if absent; `CoreError::Storage`
    /// if the backend fails.
    async fn get(&self, booking_id: BookingId) -> Result<Booking>;

    /// All bookings (active and cancelled) of one user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Storage` if the backend fails.
    async fn for_user(&self, user_id: UserId) -> Result<Vec<Booking>>;

    /// All bookings across users, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Storage` if the backend fails.
    async fn all(&self) -> Result<Vec<Booking>>;
}
