//! Port for the device-local key-value preference store.
//!
//! Reads and writes are synchronous: the store is small, local and consulted
//! at startup before any async work begins.

use super::define_port_error;

define_port_error! {
    /// Errors raised by preference store adapters.
    pub enum PreferenceStoreError {
        /// The backing file could not be read or written.
        Io { message: String } => "preference store I/O failed: {message}",
        /// The backing file is not valid.
        Corrupt { message: String } => "preference store is corrupt: {message}",
    }
}

/// Boolean flag storage.
#[cfg_attr(test, mockall::automock)]
pub trait PreferenceStore: Send + Sync {
    /// Read a flag; `None` when never written.
    fn get_bool(&self, key: &str) -> Result<Option<bool>, PreferenceStoreError>;

    /// Write a flag.
    fn set_bool(&self, key: &str, value: bool) -> Result<(), PreferenceStoreError>;
}
