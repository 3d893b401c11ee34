//! Wire an [`AppContext`] from settings.

use std::sync::Arc;

use tracing::info;

use crate::config::AppSettings;
use crate::domain::ImageUrlTemplate;
use crate::domain::ports::{AuthServiceError, DocumentStore, DocumentStoreError, PreferenceStoreError};
use crate::outbound::documents::{DocumentRecipeRepository, DocumentUserRepository};
use crate::outbound::local::{JsonPreferenceStore, LocalAuthService, LocalDataDir, LocalDocumentStore};
use crate::view_state::AppContext;

/// Failures while building the local backend.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// The data directory could not be created or opened.
    #[error("failed to open data directory {path}: {source}")]
    DataDir {
        /// Directory that failed.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The image service URL does not parse.
    #[error("invalid image service URL: {0}")]
    ImageService(#[from] url::ParseError),
    /// Stored documents could not be loaded.
    #[error(transparent)]
    Documents(#[from] DocumentStoreError),
    /// Stored accounts could not be loaded.
    #[error(transparent)]
    Auth(#[from] AuthServiceError),
    /// Stored preferences could not be loaded.
    #[error(transparent)]
    Preferences(#[from] PreferenceStoreError),
}

/// Build a context backed by the local emulator.
pub fn local_context(settings: &AppSettings) -> Result<AppContext, BootstrapError> {
    let images = ImageUrlTemplate::parse(settings.image_service_url())?;
    if !settings.persist {
        return Ok(in_memory_context(images));
    }
    let path = settings.data_dir();
    let data_dir = LocalDataDir::open(&path).map_err(|source| BootstrapError::DataDir {
        path: path.display().to_string(),
        source,
    })?;
    info!(data_dir = %path.display(), "opening local backend");
    let documents: Arc<dyn DocumentStore> = Arc::new(LocalDocumentStore::open(data_dir.clone())?);
    Ok(AppContext {
        auth: Arc::new(LocalAuthService::open(data_dir.clone())?),
        recipes: Arc::new(DocumentRecipeRepository::new(Arc::clone(&documents))),
        users: Arc::new(DocumentUserRepository::new(documents)),
        preferences: Arc::new(JsonPreferenceStore::open(data_dir)?),
        images,
    })
}

/// Build a context whose state disappears with the process.
pub fn in_memory_context(images: ImageUrlTemplate) -> AppContext {
    let documents: Arc<dyn DocumentStore> = Arc::new(LocalDocumentStore::in_memory());
    AppContext {
        auth: Arc::new(LocalAuthService::in_memory()),
        recipes: Arc::new(DocumentRecipeRepository::new(Arc::clone(&documents))),
        users: Arc::new(DocumentUserRepository::new(documents)),
        preferences: Arc::new(JsonPreferenceStore::in_memory()),
        images,
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn settings(data_dir: Option<std::path::PathBuf>, persist: bool) -> AppSettings {
        AppSettings {
            data_dir,
            image_service_url: None,
            persist,
        }
    }

    #[rstest]
    fn persistent_context_creates_data_dir() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path().join("state");
        local_context(&settings(Some(dir.clone()), true)).expect("context");
        assert!(dir.is_dir());
    }

    #[rstest]
    fn in_memory_context_touches_no_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path().join("state");
        local_context(&settings(Some(dir.clone()), false)).expect("context");
        assert!(!dir.exists());
    }

    #[rstest]
    fn bad_image_url_is_rejected() {
        let mut bad = settings(None, false);
        bad.image_service_url = Some("not a url".into());
        let err = local_context(&bad).err().expect("bad url");
        assert!(matches!(err, BootstrapError::ImageService(_)));
    }
}
