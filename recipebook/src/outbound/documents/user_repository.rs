//! `UserRepository` over a generic document store.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{Collection, DocumentStore, RepositoryError, UserRepository};
use crate::domain::{User, UserId};

use super::{decode, encode};

/// Users stored as JSON documents in the `users` collection, keyed by the
/// auth-assigned id.
#[derive(Clone)]
pub struct DocumentUserRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentUserRepository {
    /// Wrap a document store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for DocumentUserRepository {
    async fn save(&self, user: &User) -> Result<(), RepositoryError> {
        let document = encode(user)?;
        self.store
            .set(Collection::Users, &user.id, document)
            .await
            .map_err(RepositoryError::from_write)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let document = self
            .store
            .get(Collection::Users, id.as_ref())
            .await
            .map_err(RepositoryError::from_read)?;
        document.map(decode::<User>).transpose()
    }
}
