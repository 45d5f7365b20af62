//! User profile endpoints.

use crate::auth::CallerIdentity;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use seatwise_core::{Role, User, UserId};
use serde::Serialize;

/// User profile as served to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User id.
    pub id: UserId,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Role.
    pub role: Role,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// `GET /users/me` — the caller's profile.
pub async fn me(
    CallerIdentity(identity): CallerIdentity,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.get(identity.user_id).await?;
    Ok(Json(user.into()))
}
