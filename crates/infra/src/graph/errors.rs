//! Graph API error types
//!
//! Provides error classification for Graph calls with retry metadata.

use std::time::Duration;

use daybrief_common::error::{ErrorClassification, ErrorSeverity};
use thiserror::Error;

/// Categories of Graph errors for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphErrorCategory {
    /// Authentication errors (401, 403) - non-retryable
    Authentication,
    /// Rate limiting errors (429) - retry, honouring `Retry-After`
    RateLimit,
    /// Server errors (5xx) - retryable
    Server,
    /// Client errors (4xx except auth and throttling) - non-retryable
    Client,
    /// Connection errors - retryable
    Network,
    /// Request exceeded its per-call timeout - retryable
    Timeout,
    /// Success status with a body that does not match the expected shape
    Parse,
    /// Local misconfiguration - non-retryable
    Config,
}

/// Graph operation errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("{endpoint} returned HTTP {status}: {message}")]
    Status { endpoint: String, status: u16, message: String, retry_after: Option<Duration> },

    #[error("Network error calling {endpoint}: {message}")]
    Network { endpoint: String, message: String },

    #[error("Request to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("Unexpected response from {endpoint}: {message}")]
    Parse { endpoint: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GraphError {
    pub fn status(
        endpoint: impl Into<String>,
        status: u16,
        message: impl Into<String>,
        retry_after: Option<Duration>,
    ) -> Self {
        Self::Status { endpoint: endpoint.into(), status, message: message.into(), retry_after }
    }

    pub fn parse(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse { endpoint: endpoint.into(), message: message.into() }
    }

    /// Get the error category for this error
    pub const fn category(&self) -> GraphErrorCategory {
        match self {
            Self::Status { status, .. } => match *status {
                401 | 403 => GraphErrorCategory::Authentication,
                429 => GraphErrorCategory::RateLimit,
                500..=599 => GraphErrorCategory::Server,
                _ => GraphErrorCategory::Client,
            },
            Self::Network { .. } => GraphErrorCategory::Network,
            Self::Timeout { .. } => GraphErrorCategory::Timeout,
            Self::Parse { .. } => GraphErrorCategory::Parse,
            Self::Config(_) => GraphErrorCategory::Config,
        }
    }

    /// HTTP status, when the server answered at all.
    pub const fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl ErrorClassification for GraphError {
    fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            GraphErrorCategory::RateLimit
                | GraphErrorCategory::Server
                | GraphErrorCategory::Network
                | GraphErrorCategory::Timeout
        )
    }

    fn severity(&self) -> ErrorSeverity {
        match self.category() {
            GraphErrorCategory::Authentication | GraphErrorCategory::Config => {
                ErrorSeverity::Critical
            }
            GraphErrorCategory::Client | GraphErrorCategory::Parse => ErrorSeverity::Error,
            GraphErrorCategory::RateLimit
            | GraphErrorCategory::Server
            | GraphErrorCategory::Network
            | GraphErrorCategory::Timeout => ErrorSeverity::Warning,
        }
    }

    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Status { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}
