//! In-memory user directory.

use crate::error::{CoreError, Result};
use crate::ids::UserId;
use crate::user::{User, UserStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory user directory.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl MemoryUserStore {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get(&self, id: UserId) -> Result<User> {
        let guard = self
            .users
            .read()
            .map_err(|_| CoreError::Storage("user lock poisoned".to_string()))?;
        guard.get(&id).cloned().ok_or(CoreError::UserNotFound)
    }

    async fn get_by_email(&self, email: &str) -> Result<User> {
        let guard = self
            .users
            .read()
            .map_err(|_| CoreError::Storage("user lock poisoned".to_string()))?;
        guard
            .values()
            .find(|user| user.email == email)
            .cloned()
            .ok_or(CoreError::UserNotFound)
    }

    async fn upsert(&self, user: User) -> Result<User> {
        let mut guard = self
            .users
            .write()
            .map_err(|_| CoreError::Storage("user lock poisoned".to_string()))?;
        if guard
            .values()
            .any(|existing| existing.email == user.email && existing.id != user.id)
        {
            return Err(CoreError::EmailTaken);
        }
        guard.insert(user.id, user.clone());
        Ok(user)
    }
}
