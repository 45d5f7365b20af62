//! PostgreSQL event catalog.

use crate::storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use seatwise_core::catalog::{validate_event_patch, validate_new_event};
use seatwise_core::{
    Clock, CoreError, Event, EventCatalog, EventId, EventPatch, EventStatus, NewEvent, Result,
};
use sqlx::PgPool;
use std::sync::Arc;

type EventRow = (
    uuid::Uuid,
    String,
    String,
    DateTime<Utc>,
    String,
    String,
    Vec<String>,
    i32,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
);

const EVENT_COLUMNS: &str = "event_id, title, description, starts_at, time_window, location, \
                             tags, total_seats, image_url, status, created_at, updated_at";

fn event_from_row(row: EventRow) -> Result<Event> {
    let (
        event_id,
        title,
        description,
        starts_at,
        time_window,
        location,
        tags,
        total_seats,
        image_url,
        status,
        created_at,
        updated_at,
    ) = row;

    let status = EventStatus::parse(&status)
        .ok_or_else(|| CoreError::Storage(format!("unknown event status: {status}")))?;
    let total_seats = u32::try_from(total_seats)
        .map_err(|_| CoreError::Storage("negative total_seats".to_string()))?;

    Ok(Event {
        id: EventId::from_uuid(event_id),
        title,
        description,
        starts_at,
        time_window,
        location,
        tags,
        total_seats,
        image_url,
        status,
        created_at,
        updated_at,
    })
}

/// PostgreSQL event catalog.
#[derive(Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl PostgresCatalog {
    /// Create a catalog over a connection pool.
    #[must_use]
    pub fn new(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    async fn list_where(&self, filter: &str, now: Option<DateTime<Utc>>) -> Result<Vec<Event>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE status = 'published' {filter} \
             ORDER BY starts_at ASC, event_id ASC"
        );
        let mut query = sqlx::query_as::<_, EventRow>(&sql);
        if let Some(now) = now {
            query = query.bind(now);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(storage)?;
        rows.into_iter().map(event_from_row).collect()
    }
}

#[async_trait]
impl EventCatalog for PostgresCatalog {
    async fn get(&self, id: EventId) -> Result<Event> {
        let row: Option<EventRow> = sqlx::query_as(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE event_id = $1 AND status = 'published'"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        row.map(event_from_row)
            .transpose()?
            .ok_or(CoreError::EventNotFound)
    }

    async fn list(&self) -> Result<Vec<Event>> {
        self.list_where("", None).await
    }

    async fn list_upcoming(&self, now: DateTime<Utc>) -> Result<Vec<Event>> {
        self.list_where("AND starts_at > $1", Some(now)).await
    }

    async fn list_past(&self, now: DateTime<Utc>) -> Result<Vec<Event>> {
        self.list_where("AND starts_at <= $1", Some(now)).await
    }

    async fn create(&self, fields: NewEvent) -> Result<Event> {
        validate_new_event(&fields)?;

        let id = EventId::new();
        let now = self.clock.now();
        let total_seats = i32::try_from(fields.total_seats).map_err(|_| {
            CoreError::InvalidInput {
                field: "totalSeats",
                reason: "too large".to_string(),
            }
        })?;

        let row: EventRow = sqlx::query_as(&format!(
            "INSERT INTO events \
                 (event_id, title, description, starts_at, time_window, location, \
                  tags, total_seats, image_url, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'published', $10, $10) \
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.starts_at)
        .bind(&fields.time_window)
        .bind(&fields.location)
        .bind(&fields.tags)
        .bind(total_seats)
        .bind(&fields.image_url)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(storage)?;

        event_from_row(row)
    }

    async fn update(&self, id: EventId, patch: EventPatch) -> Result<Event> {
        validate_event_patch(&patch)?;

        // Single statement, so a concurrent update can never interleave.
        // total_seats is not in the SET list: capacity is immutable.
        let row: Option<EventRow> = sqlx::query_as(&format!(
            "UPDATE events SET \
                 title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 starts_at = COALESCE($4, starts_at), \
                 time_window = COALESCE($5, time_window), \
                 location = COALESCE($6, location), \
                 tags = COALESCE($7, tags), \
                 image_url = COALESCE($8, image_url), \
                 updated_at = $9 \
             WHERE event_id = $1 AND status = 'published' \
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.starts_at)
        .bind(patch.time_window)
        .bind(patch.location)
        .bind(patch.tags)
        .bind(patch.image_url)
        .bind(self.clock.now())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        row.map(event_from_row)
            .transpose()?
            .ok_or(CoreError::EventNotFound)
    }

    async fn retire(&self, id: EventId) -> Result<()> {
        let result = sqlx::query(
            "UPDATE events SET status = 'retired', updated_at = $2 \
             WHERE event_id = $1 AND status = 'published'",
        )
        .bind(id.as_uuid())
        .bind(self.clock.now())
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::EventNotFound);
        }
        Ok(())
    }
}
