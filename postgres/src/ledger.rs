//! PostgreSQL booking ledger.
//!
//! `reserve` runs as one transaction: the event row is locked with
//! `SELECT … FOR UPDATE`, which serializes concurrent reservations on the
//! same event; availability is then recomputed from the live active-booking
//! sum and the insert happens before the lock is released. Two reservations
//! that would jointly oversell therefore cannot both commit — the loser
//! re-reads the sum after the winner's insert and is rejected. Reservations
//! on different events lock different rows and proceed in parallel.

use crate::storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use seatwise_core::validate::validate_seat_count;
use seatwise_core::{
    Booking, BookingId, BookingLedger, BookingStatus, Clock, CoreError, EventId, Identity, Result,
    UserId,
};
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;

type BookingRow = (
    uuid::Uuid,
    uuid::Uuid,
    uuid::Uuid,
    i32,
    String,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
);

const BOOKING_COLUMNS: &str =
    "booking_id, event_id, user_id, seats, status, created_at, cancelled_at";

fn booking_from_row(row: BookingRow) -> Result<Booking> {
    let (booking_id, event_id, user_id, seats, status, created_at, cancelled_at) = row;

    let status = BookingStatus::parse(&status)
        .ok_or_else(|| CoreError::Storage(format!("unknown booking status: {status}")))?;
    let seats =
        u32::try_from(seats).map_err(|_| CoreError::Storage("negative seats".to_string()))?;

    Ok(Booking {
        id: BookingId::from_uuid(booking_id),
        event_id: EventId::from_uuid(event_id),
        user_id: UserId::from_uuid(user_id),
        seats,
        status,
        created_at,
        cancelled_at,
    })
}

/// PostgreSQL booking ledger.
#[derive(Clone)]
pub struct PostgresLedger {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl PostgresLedger {
    /// Create a ledger over a connection pool.
    #[must_use]
    pub fn new(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Active seat sum for an event, read inside the caller's transaction.
    async fn active_seats_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        event_id: EventId,
    ) -> Result<u32> {
        let (taken,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(seats), 0) FROM bookings \
             WHERE event_id = $1 AND status = 'active'",
        )
        .bind(event_id.as_uuid())
        .fetch_one(&mut **tx)
        .await
        .map_err(storage)?;

        u32::try_from(taken).map_err(|_| CoreError::Storage("negative seat sum".to_string()))
    }
}

#[async_trait]
impl BookingLedger for PostgresLedger {
    async fn reserve(&self, event_id: EventId, user_id: UserId, seats: u32) -> Result<Booking> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        // Row lock: reservations on this event now run one at a time.
        let event: Option<(DateTime<Utc>, i32, String)> = sqlx::query_as(
            "SELECT starts_at, total_seats, status FROM events \
             WHERE event_id = $1 FOR UPDATE",
        )
        .bind(event_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage)?;

        let Some((starts_at, total_seats, status)) = event else {
            return Err(CoreError::EventNotFound);
        };
        if status != "published" {
            return Err(CoreError::EventNotFound);
        }
        if starts_at <= self.clock.now() {
            return Err(CoreError::EventEnded);
        }
        validate_seat_count(seats)?;

        let total_seats = u32::try_from(total_seats)
            .map_err(|_| CoreError::Storage("negative total_seats".to_string()))?;
        let taken = Self::active_seats_in_tx(&mut tx, event_id).await?;
        let available = total_seats.saturating_sub(taken);
        if available < seats {
            tracing::debug!(
                %event_id,
                requested = seats,
                available,
                "reservation lost the capacity race"
            );
            // Dropping the transaction rolls it back; nothing was written.
            return Err(CoreError::InsufficientCapacity {
                requested: seats,
                available,
            });
        }

        let booking_id = BookingId::new();
        let seats_i32 =
            i32::try_from(seats).map_err(|_| CoreError::InvalidSeatCount { requested: seats })?;
        let row: BookingRow = sqlx::query_as(&format!(
            "INSERT INTO bookings (booking_id, event_id, user_id, seats, status, created_at) \
             VALUES ($1, $2, $3, $4, 'active', $5) \
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(booking_id.as_uuid())
        .bind(event_id.as_uuid())
        .bind(user_id.as_uuid())
        .bind(seats_i32)
        .bind(self.clock.now())
        .fetch_one(&mut *tx)
        .await
        .map_err(storage)?;

        tx.commit().await.map_err(storage)?;
        tracing::debug!(%booking_id, %event_id, seats, "booking committed");
        booking_from_row(row)
    }

    async fn cancel(&self, booking_id: BookingId, actor: Identity) -> Result<Booking> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_id = $1 FOR UPDATE"
        ))
        .bind(booking_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage)?;

        let booking = row
            .map(booking_from_row)
            .transpose()?
            .ok_or(CoreError::BookingNotFound)?;

        if booking.user_id != actor.user_id && !actor.is_admin() {
            return Err(CoreError::Forbidden);
        }
        if !booking.is_active() {
            return Err(CoreError::AlreadyCancelled);
        }

        let row: BookingRow = sqlx::query_as(&format!(
            "UPDATE bookings SET status = 'cancelled', cancelled_at = $2 \
             WHERE booking_id = $1 \
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(booking_id.as_uuid())
        .bind(self.clock.now())
        .fetch_one(&mut *tx)
        .await
        .map_err(storage)?;

        tx.commit().await.map_err(storage)?;
        booking_from_row(row)
    }

    async fn available_seats(&self, event_id: EventId) -> Result<u32> {
        // One statement, one snapshot: the sum can never observe a booking
        // state the capacity read did not.
        let row: Option<(i32, i64)> = sqlx::query_as(
            "SELECT e.total_seats, \
                    COALESCE(SUM(b.seats) FILTER (WHERE b.status = 'active'), 0) \
             FROM events e \
             LEFT JOIN bookings b ON b.event_id = e.event_id \
             WHERE e.event_id = $1 AND e.status = 'published' \
             GROUP BY e.total_seats",
        )
        .bind(event_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        let (total_seats, taken) = row.ok_or(CoreError::EventNotFound)?;
        let total_seats = u32::try_from(total_seats)
            .map_err(|_| CoreError::Storage("negative total_seats".to_string()))?;
        let taken =
            u32::try_from(taken).map_err(|_| CoreError::Storage("negative seat sum".to_string()))?;
        Ok(total_seats.saturating_sub(taken))
    }

    async fn get(&self, booking_id: BookingId) -> Result<Booking> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_id = $1"
        ))
        .bind(booking_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        row.map(booking_from_row)
            .transpose()?
            .ok_or(CoreError::BookingNotFound)
    }

    async fn for_user(&self, user_id: UserId) -> Result<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, booking_id DESC"
        ))
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        rows.into_iter().map(booking_from_row).collect()
    }

    async fn all(&self) -> Result<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             ORDER BY created_at DESC, booking_id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        rows.into_iter().map(booking_from_row).collect()
    }
}
