use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::store::UserStore;
use crate::types::error::AppError;
use crate::types::user::User;

/// In-process store for tests and embedders that don't need
/// durability. Enforces the same uniqueness rules as the Postgres
/// backend so callers can't tell them apart.
#[derive(Clone, Default)]
pub struct MemStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(AppError::taken("username"));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::taken("email"));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn save(&self, user: &User) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(AppError::taken("username"));
        }
        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(AppError::taken("email"));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }
}
