//! Booking records.

use crate::ids::{BookingId, EventId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Seats are held against the event's capacity.
    Active,
    /// Seats have been released; the record is kept for audit.
    Cancelled,
}

impl BookingStatus {
    /// Database/wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse the database/wire representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// A claim by one user on some number of an event's seats.
///
/// The seat count never changes after creation. Cancellation flips the
/// status and stamps `cancelled_at`; the row itself is never deleted, and
/// capacity release falls out of the derived-availability rule without any
/// counter update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique booking identifier.
    pub id: BookingId,
    /// Event the seats are claimed against.
    pub event_id: EventId,
    /// User who made the claim.
    pub user_id: UserId,
    /// Number of seats claimed (1..=4).
    pub seats: u32,
    /// Current status.
    pub status: BookingStatus,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
    /// When the booking was cancelled, if it was.
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Whether the booking currently holds seats.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, BookingStatus::Active)
    }
}
