//! # Seatwise Core
//!
//! Domain model and booking logic for the Seatwise event booking platform.
//!
//! The crate is organized around three components:
//!
//! - **Event catalog** ([`EventCatalog`]): owns the event lifecycle
//!   (create, update, retire) and answers listing queries.
//! - **Booking ledger** ([`BookingLedger`]): the single authority for seat
//!   accounting. A reservation is one atomic check-and-insert, serialized
//!   per event, so two reservations that would jointly oversell an event can
//!   never both commit. Availability is always derived from the live set of
//!   active bookings; it is never a stored counter.
//! - **Booking service** ([`BookingService`]): translates caller identity
//!   into catalog/ledger calls and enforces the owner-or-admin policy.
//!
//! Storage backends implement the two store traits. This crate ships the
//! in-memory implementations (used in tests and local development);
//! `seatwise-postgres` provides the durable ones.

pub mod booking;
pub mod catalog;
pub mod clock;
pub mod error;
pub mod event;
pub mod ids;
pub mod ledger;
pub mod memory;
pub mod service;
pub mod user;
pub mod validate;

// Re-export main types for convenience
pub use booking::{Booking, BookingStatus};
pub use catalog::{EventCatalog, EventPatch, NewEvent};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, Result};
pub use event::{Event, EventStatus};
pub use ids::{BookingId, EventId, UserId};
pub use ledger::BookingLedger;
pub use service::BookingService;
pub use user::{Identity, Role, User};
