//! Driven port for the managed document store.
//!
//! Documents are JSON objects addressed by string id inside one of two named
//! collections. Writes are full overwrites; there is no partial patch.

use std::fmt;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde_json::Value;

use super::define_port_error;

define_port_error! {
    /// Errors raised by document store adapters.
    pub enum DocumentStoreError {
        /// The store could not be reached.
        Connection { message: String } => "document store connection failed: {message}",
        /// A read, write, delete or query failed.
        Query { message: String } => "document store query failed: {message}",
        /// A document could not be encoded or decoded.
        Serialization { message: String } => "document serialization failed: {message}",
    }
}

/// Named collections used by the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    /// Recipe documents keyed by recipe id.
    Recipes,
    /// User documents keyed by auth user id.
    Users,
}

impl Collection {
    /// Every collection, in a stable order.
    pub const ALL: [Self; 2] = [Self::Recipes, Self::Users];

    /// Collection name as stored by the backend.
    pub fn name(self) -> &'static str {
        match self {
            Self::Recipes => "recipes",
            Self::Users => "users",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Live snapshots of one collection.
///
/// The first item is the current contents; later items follow each change.
/// An `Err` item reports a listener failure and does not end the stream.
pub type DocumentSnapshots = BoxStream<'static, Result<Vec<Value>, DocumentStoreError>>;

/// Capability interface for the document store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document.
    async fn get(&self, collection: Collection, id: &str)
    -> Result<Option<Value>, DocumentStoreError>;

    /// Create or fully overwrite one document.
    async fn set(
        &self,
        collection: Collection,
        id: &str,
        document: Value,
    ) -> Result<(), DocumentStoreError>;

    /// Delete one document. Deleting a missing id succeeds.
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), DocumentStoreError>;

    /// Documents whose top-level `field` equals `value`.
    async fn query_equal(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Value>, DocumentStoreError>;

    /// Subscribe to live snapshots of a collection.
    fn subscribe(&self, collection: Collection) -> DocumentSnapshots;
}
