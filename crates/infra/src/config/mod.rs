//! Configuration loading
//!
//! This module builds the run's [`DigestConfig`](daybrief_domain::DigestConfig)
//! from an optional file plus `DAYBRIEF_*` environment overrides.

pub mod loader;

// Re-export commonly used items
pub use loader::{apply_overrides, load, load_from_file, find_config_file};
