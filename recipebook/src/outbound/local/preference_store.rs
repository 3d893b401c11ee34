//! Boolean preference flags kept in `preferences.json`.

use std::collections::BTreeMap;
use std::io;
use std::sync::{Mutex, PoisonError};

use crate::domain::ports::{PreferenceStore, PreferenceStoreError};

use super::LocalDataDir;

const PREFERENCES_FILE: &str = "preferences.json";

/// Key-value flag store; the whole map is rewritten on every change.
#[derive(Debug, Default)]
pub struct JsonPreferenceStore {
    values: Mutex<BTreeMap<String, bool>>,
    data_dir: Option<LocalDataDir>,
}

impl JsonPreferenceStore {
    /// Flags held in memory only.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Flags persisted under `data_dir`.
    pub fn open(data_dir: LocalDataDir) -> Result<Self, PreferenceStoreError> {
        let values = data_dir
            .read_json::<BTreeMap<String, bool>>(PREFERENCES_FILE)
            .map_err(map_io)?
            .unwrap_or_default();
        Ok(Self {
            values: Mutex::new(values),
            data_dir: Some(data_dir),
        })
    }
}

fn map_io(err: io::Error) -> PreferenceStoreError {
    if err.kind() == io::ErrorKind::InvalidData {
        PreferenceStoreError::corrupt(err.to_string())
    } else {
        PreferenceStoreError::io(err.to_string())
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn get_bool(&self, key: &str) -> Result<Option<bool>, PreferenceStoreError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).copied())
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), PreferenceStoreError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_owned(), value);
        match &self.data_dir {
            Some(data_dir) => data_dir.write_json(PREFERENCES_FILE, &*values).map_err(map_io),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    use crate::domain::{DARK_THEME_KEY, REMEMBER_ME_KEY};

    #[rstest]
    fn unset_keys_read_as_none() {
        let store = JsonPreferenceStore::in_memory();
        assert_eq!(store.get_bool(REMEMBER_ME_KEY), Ok(None));
    }

    #[rstest]
    fn flags_persist_across_reopen() {
        let tmp = tempfile::tempdir().expect("tempdir");
        {
            let store =
                JsonPreferenceStore::open(LocalDataDir::open(tmp.path()).expect("dir")).expect("open");
            store.set_bool(DARK_THEME_KEY, true).expect("set");
            store.set_bool(REMEMBER_ME_KEY, false).expect("set");
        }
        let store =
            JsonPreferenceStore::open(LocalDataDir::open(tmp.path()).expect("dir")).expect("open");
        assert_eq!(store.get_bool(DARK_THEME_KEY), Ok(Some(true)));
        assert_eq!(store.get_bool(REMEMBER_ME_KEY), Ok(Some(false)));
    }

    #[rstest]
    fn corrupt_file_is_reported() {
        let tmp = tempfile::tempdir().expect("tempdir");
        std::fs::write(tmp.path().join(PREFERENCES_FILE), "[1, 2").expect("seed");
        let err = JsonPreferenceStore::open(LocalDataDir::open(tmp.path()).expect("dir"))
            .expect_err("corrupt");
        assert!(matches!(err, PreferenceStoreError::Corrupt { .. }));
    }
}
