use async_trait::async_trait;
use uuid::Uuid;

use crate::types::error::AppError;
use crate::types::user::User;

/// The persistence collaborator. Lookups return fully loaded users,
/// relations included. Callers must await a mutation before treating it
/// as durable; a returned error means nothing may be assumed persisted.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// First persistence of a new user. Fails with a field-level
    /// validation error when username or email is already taken.
    async fn insert(&self, user: &User) -> Result<(), AppError>;

    /// Upsert of profile, credentials, and both relation sets.
    /// Concurrent savers of the same user are last-write-wins; this
    /// layer does not order or merge them.
    async fn save(&self, user: &User) -> Result<(), AppError>;
}
