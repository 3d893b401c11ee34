//! Local emulator backend: document store, auth and preferences kept in
//! memory and optionally mirrored to JSON files in a data directory.

mod auth_service;
mod data_dir;
mod document_store;
mod preference_store;

pub use auth_service::LocalAuthService;
pub use data_dir::LocalDataDir;
pub use document_store::LocalDocumentStore;
pub use preference_store::JsonPreferenceStore;
