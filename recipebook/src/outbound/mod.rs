//! Outbound adapters implementing the domain ports.

pub mod documents;
pub mod local;
