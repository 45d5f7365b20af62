//! Error types for catalog and booking operations.

use thiserror::Error;

/// Result type alias for booking-domain operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Error taxonomy for the booking domain.
///
/// Every variant is recoverable and reported to the caller with a stable
/// machine-readable code plus a human-readable message. None of them is
/// fatal to the process.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    // ═══════════════════════════════════════════════════════════
    // Not found
    // ═══════════════════════════════════════════════════════════
    /// Event does not exist (or has been retired).
    #[error("Event not found")]
    EventNotFound,

    /// Booking does not exist.
    #[error("Booking not found")]
    BookingNotFound,

    /// User does not exist.
    #[error("User not found")]
    UserNotFound,

    // ═══════════════════════════════════════════════════════════
    // Invalid input
    // ═══════════════════════════════════════════════════════════
    /// A field failed validation.
    #[error("Invalid {field}: {reason}")]
    InvalidInput {
        /// Field that failed validation.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// Seat count outside the 1..=4 range accepted per booking.
    #[error("Seat count must be between 1 and 4 (requested: {requested})")]
    InvalidSeatCount {
        /// Requested seat count.
        requested: u32,
    },

    // ═══════════════════════════════════════════════════════════
    // Booking rejections
    // ═══════════════════════════════════════════════════════════
    /// Reservation attempted at or after the event's start time.
    #[error("Cannot book an event that has already started")]
    EventEnded,

    /// Not enough seats left. Expected and frequent under contention.
    #[error("Not enough seats available (requested: {requested}, available: {available})")]
    InsufficientCapacity {
        /// Requested seat count.
        requested: u32,
        /// Seats actually available at decision time.
        available: u32,
    },

    /// Booking has already been cancelled.
    #[error("Booking has already been cancelled")]
    AlreadyCancelled,

    // ═══════════════════════════════════════════════════════════
    // Catalog rejections
    // ═══════════════════════════════════════════════════════════
    /// Attempt to change an event's total capacity after creation.
    #[error("Total seat capacity cannot be changed after creation")]
    CapacityImmutable,

    /// Email already registered.
    #[error("Email already registered")]
    EmailTaken,

    // ═══════════════════════════════════════════════════════════
    // Authorization
    // ═══════════════════════════════════════════════════════════
    /// Caller is neither the owner of the resource nor an administrator.
    #[error("Forbidden")]
    Forbidden,

    // ═══════════════════════════════════════════════════════════
    // System
    // ═══════════════════════════════════════════════════════════
    /// Storage backend failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CoreError {
    /// Stable machine-readable code for the wire contract.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EventNotFound => "EVENT_NOT_FOUND",
            Self::BookingNotFound => "BOOKING_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::InvalidSeatCount { .. } => "INVALID_SEAT_COUNT",
            Self::EventEnded => "EVENT_ENDED",
            Self::InsufficientCapacity { .. } => "INSUFFICIENT_CAPACITY",
            Self::AlreadyCancelled => "ALREADY_CANCELLED",
            Self::CapacityImmutable => "CAPACITY_IMMUTABLE",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::Forbidden => "FORBIDDEN",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns `true` if this error is caused by the caller's request
    /// rather than by the system.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}
