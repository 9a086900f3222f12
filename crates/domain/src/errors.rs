//! Error types used throughout the digest pipeline

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Daybrief
///
/// The first four variants form the failure taxonomy the pipeline reasons
/// about: transient network trouble is retried by the call guard, permanent
/// request errors are not, and authentication or roster data failures end
/// the run.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum DigestError {
    /// Connection failures, timeouts, 5xx and rate-limit responses.
    #[error("Transient network error: {0}")]
    TransientNetwork(String),

    /// 4xx responses (other than rate limiting) and malformed payloads.
    #[error("Request rejected: {0}")]
    PermanentRequest(String),

    /// Token exchange failed or exhausted its retries.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Roster or event fetch produced no usable data.
    #[error("Data unavailable: {0}")]
    Data(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Escalation failed: {0}")]
    Escalation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DigestError {
    /// Whether the failure may succeed if the same call is attempted again.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::TransientNetwork(_))
    }

    /// Stable label for structured log fields.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::TransientNetwork(_) => "transient_network",
            Self::PermanentRequest(_) => "permanent_request",
            Self::Authentication(_) => "authentication",
            Self::Data(_) => "data",
            Self::Config(_) => "config",
            Self::Escalation(_) => "escalation",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for Daybrief operations
pub type Result<T> = std::result::Result<T, DigestError>;
