//! Error shared by the typed record repositories.

use super::{DocumentStoreError, define_port_error};

define_port_error! {
    /// Errors raised by [`super::RecipeRepository`] and
    /// [`super::UserRepository`] adapters.
    pub enum RepositoryError {
        /// Reading or listening failed.
        Read { message: String } => "{message}",
        /// Writing or deleting failed.
        Write { message: String } => "{message}",
        /// A stored document did not match the record shape.
        Decode { message: String } => "malformed document: {message}",
    }
}

impl RepositoryError {
    /// Classify a store failure that happened while reading.
    pub fn from_read(error: DocumentStoreError) -> Self {
        match error {
            DocumentStoreError::Serialization { message } => Self::decode(message),
            other => Self::read(other.to_string()),
        }
    }

    /// Classify a store failure that happened while writing.
    pub fn from_write(error: DocumentStoreError) -> Self {
        Self::write(error.to_string())
    }
}
