//! Recipe sharing core: domain records, screen state holders and a local
//! emulator backend.
//!
//! - [`domain`]: records, validation rules and capability ports.
//! - [`view_state`]: one state holder per screen plus the shared
//!   [`view_state::AppContext`].
//! - [`outbound`]: adapters implementing the ports.
//! - [`config`] / [`bootstrap`]: settings and context wiring.

pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod outbound;
pub mod view_state;

pub use bootstrap::{BootstrapError, in_memory_context, local_context};
pub use config::AppSettings;
pub use view_state::AppContext;
