//! Event records.

use crate::ids::EventId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an event.
///
/// Retiring an event is an explicit status transition, never a row delete:
/// bookings keep referring to the record for their audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Visible in listings and open for reservations (capacity permitting).
    Published,
    /// Hidden from listings; reservations are rejected.
    Retired,
}

impl EventStatus {
    /// Database/wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Retired => "retired",
        }
    }

    /// Parse the database/wire representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "published" => Some(Self::Published),
            "retired" => Some(Self::Retired),
            _ => None,
        }
    }
}

/// A schedulable happening with finite seat capacity.
///
/// `total_seats` is fixed at creation and never changes afterwards; seat
/// availability is always derived from the active bookings against this
/// event, so the record intentionally carries no availability field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub id: EventId,
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Scheduled start.
    pub starts_at: DateTime<Utc>,
    /// Display time window, e.g. `"10:00 AM - 04:30 PM"`.
    pub time_window: String,
    /// Venue.
    pub location: String,
    /// Tags, each a single alphabetic word.
    pub tags: Vec<String>,
    /// Total seat capacity. Immutable after creation.
    pub total_seats: u32,
    /// Reference to the event image.
    pub image_url: String,
    /// Lifecycle status.
    pub status: EventStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Whether the event has started (or is starting right now) at `now`.
    ///
    /// An event whose start equals `now` counts as started, so it can no
    /// longer be booked.
    #[must_use]
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.starts_at <= now
    }
}
