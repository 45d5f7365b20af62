//! User records and caller identity.

use crate::error::Result;
use crate::ids::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role attached to an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular event-goer.
    Attendee,
    /// Administrator: manages events, may inspect and cancel any booking.
    Admin,
}

impl Role {
    /// Database/wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Attendee => "attendee",
            Self::Admin => "admin",
        }
    }

    /// Parse the database/wire representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "attendee" => Some(Self::Attendee),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// A registered user.
///
/// Credentials are not stored here: authentication happens upstream, and
/// every request arrives with an already-verified [`Identity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Email address (unique).
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

/// Verified caller identity, supplied by the authentication collaborator.
///
/// The booking core trusts this pair and performs no credential checking of
/// its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// The verified user.
    pub user_id: UserId,
    /// The verified role.
    pub role: Role,
}

impl Identity {
    /// Identity with the attendee role.
    #[must_use]
    pub const fn attendee(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Attendee,
        }
    }

    /// Identity with the admin role.
    #[must_use]
    pub const fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Admin,
        }
    }

    /// Whether this identity holds the administrative capability.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// User directory.
///
/// Profiles are provisioned by the authentication collaborator (or seeded
/// at startup); the booking core only reads them back.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Get a user by id.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UserNotFound` if absent; `CoreError::Storage` if
    /// the backend fails.
    async fn get(&self, id: UserId) -> Result<User>;

    /// Get a user by email.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UserNotFound` if absent; `CoreError::Storage` if
    /// the backend fails.
    async fn get_by_email(&self, email: &str) -> Result<User>;

    /// Insert or update a user record.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EmailTaken` if the email belongs to another
    /// user; `CoreError::Storage` if the backend fails.
    async fn upsert(&self, user: User) -> Result<User>;
}
