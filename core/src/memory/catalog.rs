//! In-memory event catalog.

use crate::catalog::{validate_event_patch, validate_new_event, EventCatalog, EventPatch, NewEvent};
use crate::clock::Clock;
use crate::error::{CoreError, Result};
use crate::event::{Event, EventStatus};
use crate::ids::EventId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory event catalog.
#[derive(Clone)]
pub struct MemoryCatalog {
    clock: Arc<dyn Clock>,
    events: Arc<RwLock<HashMap<EventId, Event>>>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            events: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn read_published(&self) -> Result<Vec<Event>> {
        let guard = self
            .events
            .read()
            .map_err(|_| CoreError::Storage("catalog lock poisoned".to_string()))?;
        let mut events: Vec<Event> = guard
            .values()
            .filter(|event| event.status == EventStatus::Published)
            .cloned()
            .collect();
        // Deterministic listing order: start time ascending, id as tie-break.
        events.sort_by(|a, b| (a.starts_at, a.id).cmp(&(b.starts_at, b.id)));
        Ok(events)
    }
}

#[async_trait]
impl EventCatalog for MemoryCatalog {
    async fn get(&self, id: EventId) -> Result<Event> {
        let guard = self
            .events
            .read()
            .map_err(|_| CoreError::Storage("catalog lock poisoned".to_string()))?;
        guard
            .get(&id)
            .filter(|event| event.status == EventStatus::Published)
            .cloned()
            .ok_or(CoreError::EventNotFound)
    }

    async fn list(&self) -> Result<Vec<Event>> {
        self.read_published()
    }

    async fn list_upcoming(&self, now: DateTime<Utc>) -> Result<Vec<Event>> {
        Ok(self
            .read_published()?
            .into_iter()
            .filter(|event| event.starts_at > now)
            .collect())
    }

    async fn list_past(&self, now: DateTime<Utc>) -> Result<Vec<Event>> {
        Ok(self
            .read_published()?
            .into_iter()
            .filter(|event| event.starts_at <= now)
            .collect())
    }

    async fn create(&self, fields: NewEvent) -> Result<Event> {
        validate_new_event(&fields)?;

        let now = self.clock.now();
        let event = Event {
            id: EventId::new(),
            title: fields.title,
            description: fields.description,
            starts_at: fields.starts_at,
            time_window: fields.time_window,
            location: fields.location,
            tags: fields.tags,
            total_seats: fields.total_seats,
            image_url: fields.image_url,
            status: EventStatus::Published,
            created_at: now,
            updated_at: now,
        };

        let mut guard = self
            .events
            .write()
            .map_err(|_| CoreError::Storage("catalog lock poisoned".to_string()))?;
        guard.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update(&self, id: EventId, patch: EventPatch) -> Result<Event> {
        validate_event_patch(&patch)?;

        let now = self.clock.now();
        let mut guard = self
            .events
            .write()
            .map_err(|_| CoreError::Storage("catalog lock poisoned".to_string()))?;
        let event = guard
            .get_mut(&id)
            .filter(|event| event.status == EventStatus::Published)
            .ok_or(CoreError::EventNotFound)?;

        if let Some(title) = patch.title {
            event.title = title;
        }
        if let Some(description) = patch.description {
            event.description = description;
        }
        if let Some(starts_at) = patch.starts_at {
            event.starts_at = starts_at;
        }
        if let Some(time_window) = patch.time_window {
            event.time_window = time_window;
        }
        if let Some(location) = patch.location {
            event.location = location;
        }
        if let Some(tags) = patch.tags {
            event.tags = tags;
        }
        if let Some(image_url) = patch.image_url {
            event.image_url = image_url;
        }
        event.updated_at = now;

        Ok(event.clone())
    }

    async fn retire(&self, id: EventId) -> Result<()> {
        let now = self.clock.now();
        let mut guard = self
            .events
            .write()
            .map_err(|_| CoreError::Storage("catalog lock poisoned".to_string()))?;
        let event = guard
            .get_mut(&id)
            .filter(|event| event.status == EventStatus::Published)
            .ok_or(CoreError::EventNotFound)?;
        event.status = EventStatus::Retired;
        event.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::TimeZone;

    fn fields(title: &str, starts_at: DateTime<Utc>) -> NewEvent {
        NewEvent {
            title: title.to_string(),
            description: "An evening of live music".to_string(),
            starts_at,
            time_window: "07:00 PM - 10:00 PM".to_string(),
            location: "Town Hall".to_string(),
            tags: vec!["music".to_string()],
            total_seats: 50,
            image_url: "https://img.example/1.jpg".to_string(),
        }
    }

    fn catalog_at(now: DateTime<Utc>) -> MemoryCatalog {
        MemoryCatalog::new(Arc::new(FixedClock::new(now)))
    }

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn listing_splits_on_start_time_and_orders_ascending() {
        let now = ts(12);
        let catalog = catalog_at(now);

        let past = catalog.create(fields("Morning yoga", ts(8))).await.unwrap();
        let later = catalog.create(fields("Evening gala", ts(20))).await.unwrap();
        let sooner = catalog.create(fields("Afternoon talk", ts(15))).await.unwrap();
        // Starting exactly now counts as past.
        let boundary = catalog.create(fields("Noon recital", ts(12))).await.unwrap();

        let upcoming = catalog.list_upcoming(now).await.unwrap();
        assert_eq!(
            upcoming.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![sooner.id, later.id]
        );

        let past_ids: Vec<_> = catalog
            .list_past(now)
            .await
            .unwrap()
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(past_ids, vec![past.id, boundary.id]);
    }

    #[tokio::test]
    async fn update_cannot_touch_capacity() {
        let catalog = catalog_at(ts(12));
        let event = catalog.create(fields("Evening gala", ts(20))).await.unwrap();

        let updated = catalog
            .update(
                event.id,
                EventPatch {
                    title: Some("Evening gala, extended".to_string()),
                    ..EventPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Evening gala, extended");
        assert_eq!(updated.total_seats, event.total_seats);
    }

    #[tokio::test]
    async fn retired_events_disappear() {
        let catalog = catalog_at(ts(12));
        let event = catalog.create(fields("Evening gala", ts(20))).await.unwrap();

        catalog.retire(event.id).await.unwrap();

        assert_eq!(catalog.get(event.id).await, Err(CoreError::EventNotFound));
        assert!(catalog.list().await.unwrap().is_empty());
        // Retiring twice reports not-found, not success.
        assert_eq!(catalog.retire(event.id).await, Err(CoreError::EventNotFound));
    }

    #[tokio::test]
    async fn create_rejects_invalid_fields() {
        let catalog = catalog_at(ts(12));
        let mut bad = fields("Evening gala", ts(20));
        bad.total_seats = 0;
        assert!(matches!(
            catalog.create(bad).await,
            Err(CoreError::InvalidInput { field: "totalSeats", .. })
        ));
    }
}
