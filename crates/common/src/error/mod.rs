//! Error classification shared by every layer
//!
//! Concrete error enums live next to the code that produces them. What they
//! have in common is the question the retry guard and the logs ask of every
//! failure: can it be retried, how bad is it, and did the remote side say how
//! long to wait. [`ErrorClassification`] is that question as a trait.
//!
//! ## ErrorSeverity Levels
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Info** | Expected conditions | Empty calendar, skipped roster entry |
//! | **Warning** | Degraded but operational | Rate limiting, transient network failure |
//! | **Error** | Failure requiring attention | Rejected request, bad payload |
//! | **Critical** | Run cannot continue | Credentials rejected, configuration missing |
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use daybrief_common::error::{ErrorClassification, ErrorSeverity};
//!
//! #[derive(Debug)]
//! enum UploadError {
//!     Busy(Duration),
//!     Rejected,
//! }
//!
//! impl ErrorClassification for UploadError {
//!     fn is_retryable(&self) -> bool {
//!         matches!(self, Self::Busy(_))
//!     }
//!
//!     fn severity(&self) -> ErrorSeverity {
//!         match self {
//!             Self::Busy(_) => ErrorSeverity::Warning,
//!             Self::Rejected => ErrorSeverity::Error,
//!         }
//!     }
//!
//!     fn is_critical(&self) -> bool {
//!         false
//!     }
//!
//!     fn retry_after(&self) -> Option<Duration> {
//!         match self {
//!             Self::Busy(wait) => Some(*wait),
//!             Self::Rejected => None,
//!         }
//!     }
//! }
//!
//! assert!(UploadError::Busy(Duration::from_secs(2)).is_retryable());
//! assert_eq!(UploadError::Rejected.severity(), ErrorSeverity::Error);
//! ```

use std::fmt;
use std::time::Duration;

/// Standard interface for classifying errors by their characteristics.
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient: connection resets, timeouts, 5xx
    /// responses and rate limiting.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    ///
    /// Used for logging and escalation decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool;

    /// Get the suggested retry delay if applicable
    ///
    /// Returns `Some(Duration)` when the remote side asked for a specific
    /// wait (for example a `Retry-After` header).
    fn retry_after(&self) -> Option<Duration>;
}

/// Error severity levels for logging and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
