//! Typed repositories mapping domain records to JSON documents.

mod recipe_repository;
mod user_repository;

pub use recipe_repository::DocumentRecipeRepository;
pub use user_repository::DocumentUserRepository;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::domain::ports::RepositoryError;

fn encode<T: Serialize>(record: &T) -> Result<Value, RepositoryError> {
    serde_json::to_value(record).map_err(|err| RepositoryError::write(err.to_string()))
}

fn decode<T: DeserializeOwned>(document: Value) -> Result<T, RepositoryError> {
    serde_json::from_value(document).map_err(|err| RepositoryError::decode(err.to_string()))
}

/// Decode a result set, dropping documents that do not match the record
/// shape.
fn decode_all<T: DeserializeOwned>(documents: Vec<Value>) -> Vec<T> {
    documents
        .into_iter()
        .filter_map(|document| match decode(document) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(error = %err, "skipping malformed document");
                None
            }
        })
        .collect()
}
