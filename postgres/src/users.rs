//! PostgreSQL user directory.

use crate::storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use seatwise_core::user::UserStore;
use seatwise_core::{CoreError, Result, Role, User, UserId};
use sqlx::PgPool;

type UserRow = (uuid::Uuid, String, String, String, String, DateTime<Utc>);

const USER_COLUMNS: &str = "user_id, email, first_name, last_name, role, created_at";

fn user_from_row(row: UserRow) -> Result<User> {
    let (user_id, email, first_name, last_name, role, created_at) = row;
    let role = Role::parse(&role)
        .ok_or_else(|| CoreError::Storage(format!("unknown role: {role}")))?;
    Ok(User {
        id: UserId::from_uuid(user_id),
        email,
        first_name,
        last_name,
        role,
        created_at,
    })
}

/// PostgreSQL user directory.
#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    /// Create a user store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn get(&self, id: UserId) -> Result<User> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        row.map(user_from_row)
            .transpose()?
            .ok_or(CoreError::UserNotFound)
    }

    async fn get_by_email(&self, email: &str) -> Result<User> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        row.map(user_from_row)
            .transpose()?
            .ok_or(CoreError::UserNotFound)
    }

    async fn upsert(&self, user: User) -> Result<User> {
        let row: UserRow = sqlx::query_as(&format!(
            "INSERT INTO users (user_id, email, first_name, last_name, role, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 email = EXCLUDED.email, \
                 first_name = EXCLUDED.first_name, \
                 last_name = EXCLUDED.last_name, \
                 role = EXCLUDED.role \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id.as_uuid())
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return CoreError::EmailTaken;
                }
            }
            storage(e)
        })?;

        user_from_row(row)
    }
}
