//! Resilience patterns for remote calls
//!
//! Every remote call the digest makes goes through a [`RetryExecutor`]: a
//! bounded number of attempts with clamped exponential backoff between them.
//! Which failures are worth another attempt is decided by a [`RetryPolicy`];
//! [`policies::ClassifiedRetry`] defers to the error's own
//! [`ErrorClassification`](crate::error::ErrorClassification).

pub mod retry;

pub use retry::{
    policies, BackoffStrategy, RetryConfig, RetryConfigBuilder, RetryConfigError, RetryDecision,
    RetryError, RetryExecutor, RetryOutcome, RetryPolicy, RetryResult,
};
