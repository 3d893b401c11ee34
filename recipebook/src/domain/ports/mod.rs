//! Domain ports and supporting types for the hexagonal boundary.
//!
//! State holders depend only on these traits. Adapters live under
//! [`crate::outbound`].

mod macros;
pub(crate) use macros::define_port_error;

mod auth_service;
mod document_store;
mod preference_store;
mod recipe_repository;
mod repository_error;
mod user_repository;

#[cfg(test)]
pub use auth_service::MockAuthService;
pub use auth_service::{AuthService, AuthServiceError};
#[cfg(test)]
pub use document_store::MockDocumentStore;
pub use document_store::{Collection, DocumentSnapshots, DocumentStore, DocumentStoreError};
#[cfg(test)]
pub use preference_store::MockPreferenceStore;
pub use preference_store::{PreferenceStore, PreferenceStoreError};
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{RecipeFeed, RecipeRepository};
pub use repository_error::RepositoryError;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
