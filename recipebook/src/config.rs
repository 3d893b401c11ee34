//! Runtime settings loaded via OrthoConfig.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DEFAULT_IMAGE_SERVICE_URL;

const DEFAULT_DATA_DIR: &str = ".recipebook";

/// Settings for the local backend and image template.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECIPEBOOK")]
pub struct AppSettings {
    /// Directory holding the emulator's JSON files.
    pub data_dir: Option<PathBuf>,
    /// Base URL for placeholder recipe images.
    pub image_service_url: Option<String>,
    /// Write JSON files; when false everything stays in memory.
    #[ortho_config(default = true)]
    pub persist: bool,
}

impl AppSettings {
    /// Return the configured data directory, falling back to `.recipebook`.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// Return the configured image service, falling back to Unsplash.
    pub fn image_service_url(&self) -> &str {
        self.image_service_url
            .as_deref()
            .unwrap_or(DEFAULT_IMAGE_SERVICE_URL)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("recipebook")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("RECIPEBOOK_DATA_DIR", None::<String>),
            ("RECIPEBOOK_IMAGE_SERVICE_URL", None::<String>),
            ("RECIPEBOOK_PERSIST", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.persist);
        assert_eq!(settings.data_dir(), PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(settings.image_service_url(), DEFAULT_IMAGE_SERVICE_URL);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("RECIPEBOOK_DATA_DIR", Some("/tmp/recipebook-data".to_owned())),
            (
                "RECIPEBOOK_IMAGE_SERVICE_URL",
                Some("https://images.example.com/".to_owned()),
            ),
            ("RECIPEBOOK_PERSIST", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert!(!settings.persist);
        assert_eq!(settings.data_dir(), PathBuf::from("/tmp/recipebook-data"));
        assert_eq!(settings.image_service_url(), "https://images.example.com/");
    }
}
