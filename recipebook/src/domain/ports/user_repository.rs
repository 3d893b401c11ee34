//! Port for user document persistence.
use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::RepositoryError;

/// Typed access to the `users` collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create or fully overwrite the user document keyed by `user.id`.
    async fn save(&self, user: &User) -> Result<(), RepositoryError>;

    /// Fetch a user document by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;
}
