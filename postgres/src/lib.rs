//! PostgreSQL storage for Seatwise.
//!
//! Implements the `seatwise-core` store traits on top of sqlx. The ledger
//! relies on row-level locking: `reserve` takes `SELECT … FOR UPDATE` on
//! the event row, which serializes reservations per event while leaving
//! other events untouched, and recomputes availability from the live
//! active-booking sum inside the same transaction as the insert.

pub mod catalog;
pub mod ledger;
pub mod users;

pub use catalog::PostgresCatalog;
pub use ledger::PostgresLedger;
pub use users::PostgresUserStore;

use seatwise_core::CoreError;
use sqlx::PgPool;

/// Run database migrations.
///
/// # Errors
///
/// Returns `CoreError::Storage` if a migration fails.
pub async fn migrate(pool: &PgPool) -> Result<(), CoreError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| CoreError::Storage(format!("migration failed: {e}")))
}

/// Map an sqlx error to the domain storage error.
pub(crate) fn storage(e: sqlx::Error) -> CoreError {
    CoreError::Storage(e.to_string())
}
