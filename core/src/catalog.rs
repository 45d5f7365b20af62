//! Event catalog store.

use crate::error::Result;
use crate::event::Event;
use crate::ids::EventId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Fields accepted when creating an event.
///
/// Capacity is accepted here and nowhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    /// Event title (at least six characters).
    pub title: String,
    /// Event description (at least six characters).
    pub description: String,
    /// Scheduled start.
    pub starts_at: DateTime<Utc>,
    /// Display time window, e.g. `"10:00 AM - 04:30 PM"`.
    pub time_window: String,
    /// Venue.
    pub location: String,
    /// Tags, each a single alphabetic word.
    pub tags: Vec<String>,
    /// Total seat capacity (positive). Immutable once the event exists.
    pub total_seats: u32,
    /// Reference to the event image.
    pub image_url: String,
}

/// Partial update of an event's mutable fields.
///
/// There is deliberately no way to express a capacity change here: the
/// derived-availability rule depends on `total_seats` staying fixed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New start.
    pub starts_at: Option<DateTime<Utc>>,
    /// New display time window.
    pub time_window: Option<String>,
    /// New venue.
    pub location: Option<String>,
    /// New tag set.
    pub tags: Option<Vec<String>>,
    /// New image reference.
    pub image_url: Option<String>,
}

/// Event catalog store.
///
/// Owns the event lifecycle. Listings return published events only, ordered
/// by start time ascending with the id as tie-break, so repeated calls see
/// the same order.
#[async_trait]
pub trait EventCatalog: Send + Sync {
    /// Get a published event by id.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EventNotFound` if the event does not exist or has
    /// been retired; `CoreError::Storage` if the backend fails.
    async fn get(&self, id: EventId) -> Result<Event>;

    /// All published events.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Storage` if the backend fails.
    async fn list(&self) -> Result<Vec<Event>>;

    /// Published events starting strictly after `now`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Storage` if the backend fails.
    async fn list_upcoming(&self, now: DateTime<Utc>) -> Result<Vec<Event>>;

    /// Published events starting at or before `now`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Storage` if the backend fails.
    async fn list_past(&self, now: DateTime<Utc>) -> Result<Vec<Event>>;

    /// Create an event.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` on validation failure;
    /// `CoreError::Storage` if the backend fails.
    async fn create(&self, fields: NewEvent) -> Result<Event>;

    /// Apply a partial update to an event's mutable fields.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EventNotFound` if absent or retired;
    /// `CoreError::InvalidInput` on validation failure;
    /// `CoreError::Storage` if the backend fails.
    async fn update(&self, id: EventId, patch: EventPatch) -> Result<Event>;

    /// Retire an event: hide it from listings and close it for reservations.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EventNotFound` if absent or already retired;
    /// `CoreError::Storage` if the backend fails.
    async fn retire(&self, id: EventId) -> Result<()>;
}

/// Validate the fields of a new event.
///
/// Shared by every [`EventCatalog`] implementation so the rules cannot
/// drift between backends.
///
/// # Errors
///
/// Returns the first `CoreError::InvalidInput` encountered.
pub fn validate_new_event(fields: &NewEvent) -> Result<()> {
    crate::validate::validate_title(&fields.title)?;
    crate::validate::validate_description(&fields.description)?;
    crate::validate::validate_time_window(&fields.time_window)?;
    crate::validate::validate_not_blank("location", &fields.location)?;
    crate::validate::validate_tags(&fields.tags)?;
    crate::validate::validate_capacity(fields.total_seats)?;
    crate::validate::validate_not_blank("image", &fields.image_url)?;
    Ok(())
}

/// Validate the populated fields of an event patch.
///
/// # Errors
///
/// Returns the first `CoreError::InvalidInput` encountered.
pub fn validate_event_patch(patch: &EventPatch) -> Result<()> {
    if let Some(title) = &patch.title {
        crate::validate::validate_title(title)?;
    }
    if let Some(description) = &patch.description {
        crate::validate::validate_description(description)?;
    }
    if let Some(time_window) = &patch.time_window {
        crate::validate::validate_time_window(time_window)?;
    }
    if let Some(location) = &patch.location {
        crate::validate::validate_not_blank("location", location)?;
    }
    if let Some(tags) = &patch.tags {
        crate::validate::validate_tags(tags)?;
    }
    if let Some(image_url) = &patch.image_url {
        crate::validate::validate_not_blank("image", image_url)?;
    }
    Ok(())
}
