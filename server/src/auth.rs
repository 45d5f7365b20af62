//! Caller identity extraction.
//!
//! Authentication happens upstream: the server receives a bearer token that
//! the identity collaborator has already vouched for, resolves it to a
//! verified `(user_id, role)` pair, and trusts that pair. No credential
//! checking happens here.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use seatwise_core::Identity;
use std::collections::HashMap;

/// Resolves a bearer token to a verified identity.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a token, or `None` when it is unknown.
    async fn resolve(&self, token: &str) -> Option<Identity>;
}

/// Identity provider backed by a fixed token directory.
///
/// Stands in for the upstream authentication service: operators seed it
/// from configuration, tests seed it directly.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenDirectory {
    tokens: HashMap<String, Identity>,
}

impl StaticTokenDirectory {
    /// Build a directory from `(token, identity)` pairs.
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = (String, Identity)>) -> Self {
        Self {
            tokens: entries.into_iter().collect(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenDirectory {
    async fn resolve(&self, token: &str) -> Option<Identity> {
        self.tokens.get(token).copied()
    }
}

/// Bearer token extracted from the `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| {
                ApiError::unauthorized("Invalid authorization format. Expected 'Bearer <token>'")
            })?
            .to_string();

        if token.is_empty() {
            return Err(ApiError::unauthorized("Empty bearer token"));
        }

        Ok(Self(token))
    }
}

/// Verified caller identity.
///
/// Use as a handler parameter to require authentication.
#[derive(Debug, Clone, Copy)]
pub struct CallerIdentity(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for CallerIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = BearerToken::from_request_parts(parts, state).await?;
        let identity = state
            .identity
            .resolve(&bearer.0)
            .await
            .ok_or_else(|| ApiError::unauthorized("Unknown bearer token"))?;
        Ok(Self(identity))
    }
}

/// Verified caller identity holding the admin role.
///
/// Use as a handler parameter to require the administrative capability;
/// non-admin callers receive 403.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CallerIdentity(identity) = CallerIdentity::from_request_parts(parts, state).await?;
        if !identity.is_admin() {
            return Err(ApiError::forbidden("Administrator role required"));
        }
        Ok(Self(identity))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use seatwise_core::UserId;

    #[tokio::test]
    async fn directory_resolves_known_tokens_only() {
        let identity = Identity::attendee(UserId::new());
        let directory =
            StaticTokenDirectory::new([("alice-token".to_string(), identity)]);

        assert_eq!(directory.resolve("alice-token").await, Some(identity));
        assert_eq!(directory.resolve("mallory-token").await, None);
    }
}
