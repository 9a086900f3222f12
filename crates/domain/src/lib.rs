//! # Daybrief Domain
//!
//! Business domain types and models for Daybrief.
//!
//! This crate contains:
//! - Calendar data (Event, Interval) and analysis outputs (ConflictPair,
//!   FocusBlock)
//! - Directory members and per-run delivery reports
//! - Domain error types and Result definitions
//! - Configuration structures and their defaults
//!
//! ## Architecture
//! - No dependencies on other Daybrief crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
