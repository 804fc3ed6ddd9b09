//! Library entry for the version manifest updater.
//!
//! The `version_manifest` binary fetches the launcher version manifest once,
//! re-encodes it with stable formatting and caches it at
//! `~/.axiom/version_manifest.json`. It is meant to be run by an external
//! scheduler such as cron.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod manifest;

pub use error::{Error, Result};
