//! Retry call guard
//!
//! Wraps a single-attempt async operation and re-runs it while a
//! [`RetryPolicy`] allows, sleeping between attempts according to a
//! [`BackoffStrategy`]. The guard gives up after `max_attempts` and hands the
//! caller the last error it saw, so callers can classify the failure by its
//! own type rather than by a generic "retries exhausted" marker.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Errors that can occur during retry operations
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// Every allowed attempt failed; `last` is the final attempt's error.
    #[error("All {attempts} attempts failed, last error: {last}")]
    Exhausted { attempts: u32, last: E },

    /// The policy refused to retry this error.
    #[error("Operation failed with non-retryable error after {attempts} attempt(s): {last}")]
    NonRetryable { attempts: u32, last: E },
}

impl<E> RetryError<E> {
    /// Number of attempts made before giving up.
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Exhausted { attempts, .. } | Self::NonRetryable { attempts, .. } => *attempts,
        }
    }

    /// The last operation error.
    pub fn into_last(self) -> E {
        match self {
            Self::Exhausted { last, .. } | Self::NonRetryable { last, .. } => last,
        }
    }
}

/// A [`RetryConfig`] that can never drive a call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid retry configuration: {0}")]
pub struct RetryConfigError(pub String);

/// Result type for retry operations
pub type RetryResult<T, E> = Result<T, RetryError<E>>;

/// Outcome of a retry execution including result and summary statistics.
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub result: RetryResult<T, E>,
    pub attempts: u32,
    pub total_delay: Duration,
}

impl<T, E> RetryOutcome<T, E> {
    /// Consume the outcome and return only the result.
    pub fn into_result(self) -> RetryResult<T, E> {
        self.result
    }
}

/// Trait for determining whether an error should be retried
pub trait RetryPolicy<E> {
    /// `attempt` is the 1-based number of the attempt that just failed.
    fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision;
}

/// Decision for whether to retry an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry the operation with the default backoff delay
    Retry,
    /// Retry after the given delay (still capped by the backoff ceiling)
    RetryAfter(Duration),
    /// Don't retry the operation
    Stop,
}

/// Backoff strategy for calculating retry delays
#[derive(Debug, Clone, PartialEq)]
pub enum BackoffStrategy {
    /// Fixed delay between retries
    Fixed(Duration),
    /// `clamp(multiplier * base^(n - 1), min_delay, max_delay)` before retry
    /// `n`, where `n` is the number of the attempt that failed.
    Exponential { multiplier: Duration, base: f64, min_delay: Duration, max_delay: Duration },
}

impl BackoffStrategy {
    /// Delay to wait after `attempt` (1-based) failed.
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        match self {
            Self::Fixed(delay) => *delay,
            Self::Exponential { multiplier, base, min_delay, max_delay } => {
                let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
                let raw = multiplier.as_secs_f64() * base.powi(exponent);
                let ceiling = max_delay.as_secs_f64();
                let bounded = if raw.is_finite() { raw.min(ceiling) } else { ceiling };
                Duration::from_secs_f64(bounded.max(0.0)).clamp(*min_delay, *max_delay)
            }
        }
    }

    /// Longest delay this strategy will ever produce.
    pub const fn ceiling(&self) -> Duration {
        match self {
            Self::Fixed(delay) => *delay,
            Self::Exponential { max_delay, .. } => *max_delay,
        }
    }
}

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Backoff strategy for calculating delays
    pub backoff: BackoffStrategy,
}

impl Default for RetryConfig {
    /// Three attempts, waiting `clamp(1s * 2^(n-1), 4s, 10s)` between them.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: BackoffStrategy::Exponential {
                multiplier: Duration::from_secs(1),
                base: 2.0,
                min_delay: Duration::from_secs(4),
                max_delay: Duration::from_secs(10),
            },
        }
    }
}

impl RetryConfig {
    /// Create a configuration builder
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::new()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), RetryConfigError> {
        if self.max_attempts == 0 {
            return Err(RetryConfigError("max_attempts must be greater than 0".to_string()));
        }

        if let BackoffStrategy::Exponential { base, min_delay, max_delay, .. } = &self.backoff {
            if *base <= 0.0 {
                return Err(RetryConfigError(
                    "exponential base must be greater than 0".to_string(),
                ));
            }
            if min_delay > max_delay {
                return Err(RetryConfigError(format!(
                    "min_delay {min_delay:?} exceeds max_delay {max_delay:?}"
                )));
            }
        }

        Ok(())
    }
}

/// Builder for RetryConfig with fluent API
#[derive(Debug)]
pub struct RetryConfigBuilder {
    config: RetryConfig,
}

impl Default for RetryConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryConfigBuilder {
    pub fn new() -> Self {
        Self { config: RetryConfig::default() }
    }

    pub const fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    pub const fn fixed_backoff(mut self, delay: Duration) -> Self {
        self.config.backoff = BackoffStrategy::Fixed(delay);
        self
    }

    pub const fn exponential_backoff(
        mut self,
        multiplier: Duration,
        min_delay: Duration,
        max_delay: Duration,
    ) -> Self {
        self.config.backoff =
            BackoffStrategy::Exponential { multiplier, base: 2.0, min_delay, max_delay };
        self
    }

    pub fn build(self) -> Result<RetryConfig, RetryConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// The retry call guard
#[derive(Debug, Clone)]
pub struct RetryExecutor<P> {
    config: RetryConfig,
    policy: P,
}

impl<P> RetryExecutor<P> {
    /// Create a new retry executor with the given configuration and policy
    pub const fn new(config: RetryConfig, policy: P) -> Self {
        Self { config, policy }
    }

    /// Create with default configuration
    pub fn with_policy(policy: P) -> Self {
        Self::new(RetryConfig::default(), policy)
    }

    pub const fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute an operation with retry logic
    #[instrument(skip_all, fields(max_attempts = self.config.max_attempts))]
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> RetryResult<T, E>
    where
        P: RetryPolicy<E>,
        E: fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.execute_with_outcome(operation).await.into_result()
    }

    /// Execute an operation with retry logic and return outcome statistics.
    pub async fn execute_with_outcome<F, Fut, T, E>(&self, mut operation: F) -> RetryOutcome<T, E>
    where
        P: RetryPolicy<E>,
        E: fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut total_delay = Duration::ZERO;
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!("Executing operation (attempt {}/{})", attempt, max_attempts);

            let error = match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "Operation succeeded after retrying");
                    }
                    return RetryOutcome { result: Ok(value), attempts: attempt, total_delay };
                }
                Err(error) => error,
            };

            let delay = match self.policy.should_retry(&error, attempt) {
                RetryDecision::Stop => {
                    debug!(attempt, error = %error, "Retry policy declined to retry");
                    return RetryOutcome {
                        result: Err(RetryError::NonRetryable { attempts: attempt, last: error }),
                        attempts: attempt,
                        total_delay,
                    };
                }
                _ if attempt >= max_attempts => {
                    warn!(attempts = attempt, error = %error, "All retry attempts exhausted");
                    return RetryOutcome {
                        result: Err(RetryError::Exhausted { attempts: attempt, last: error }),
                        attempts: attempt,
                        total_delay,
                    };
                }
                RetryDecision::Retry => self.config.backoff.calculate_delay(attempt),
                RetryDecision::RetryAfter(requested) => requested.min(self.config.backoff.ceiling()),
            };

            warn!(
                attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %error,
                "Operation failed, retrying"
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            total_delay += delay;
        }
    }
}

/// Retry policies used by the remote gateways
pub mod policies {
    use super::{Duration, RetryDecision, RetryPolicy};
    use crate::error::ErrorClassification;

    /// Retries errors that classify themselves as retryable, honouring any
    /// server-requested wait.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct ClassifiedRetry;

    impl<E: ErrorClassification> RetryPolicy<E> for ClassifiedRetry {
        fn should_retry(&self, error: &E, _attempt: u32) -> RetryDecision {
            if !error.is_retryable() {
                return RetryDecision::Stop;
            }
            error.retry_after().map_or(RetryDecision::Retry, |wait: Duration| {
                RetryDecision::RetryAfter(wait)
            })
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for backoff calculation and executor behaviour

    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    /// Retries every error.
    struct AlwaysRetry;

    impl<E> RetryPolicy<E> for AlwaysRetry {
        fn should_retry(&self, _error: &E, _attempt: u32) -> RetryDecision {
            RetryDecision::Retry
        }
    }

    /// Never retries.
    struct NeverRetry;

    impl<E> RetryPolicy<E> for NeverRetry {
        fn should_retry(&self, _error: &E, _attempt: u32) -> RetryDecision {
            RetryDecision::Stop
        }
    }

    struct PredicateRetry<F>(F);

    impl<F, E> RetryPolicy<E> for PredicateRetry<F>
    where
        F: Fn(&E, u32) -> bool,
    {
        fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision {
            if (self.0)(error, attempt) {
                RetryDecision::Retry
            } else {
                RetryDecision::Stop
            }
        }
    }

    fn quick(attempts: u32) -> RetryConfig {
        RetryConfig::builder()
            .max_attempts(attempts)
            .fixed_backoff(Duration::from_millis(1))
            .build()
            .expect("valid config")
    }

    /// Reference waits: multiplier 1s, floor 4s, ceiling 10s.
    #[test]
    fn exponential_backoff_is_clamped_between_floor_and_ceiling() {
        let strategy = RetryConfig::default().backoff;

        assert_eq!(strategy.calculate_delay(1), Duration::from_secs(4));
        assert_eq!(strategy.calculate_delay(2), Duration::from_secs(4));
        assert_eq!(strategy.calculate_delay(3), Duration::from_secs(4));
        assert_eq!(strategy.calculate_delay(4), Duration::from_secs(8));
        assert_eq!(strategy.calculate_delay(5), Duration::from_secs(10));
        assert_eq!(strategy.calculate_delay(60), Duration::from_secs(10));
        assert_eq!(strategy.ceiling(), Duration::from_secs(10));
    }

    #[test]
    fn fixed_backoff_ignores_attempt() {
        let strategy = BackoffStrategy::Fixed(Duration::from_millis(100));
        assert_eq!(strategy.calculate_delay(1), Duration::from_millis(100));
        assert_eq!(strategy.calculate_delay(9), Duration::from_millis(100));
    }

    #[test]
    fn builder_rejects_invalid_settings() {
        assert!(RetryConfig::builder().max_attempts(0).build().is_err());
        assert!(RetryConfig::builder()
            .exponential_backoff(
                Duration::from_secs(1),
                Duration::from_secs(20),
                Duration::from_secs(10)
            )
            .build()
            .is_err());
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let executor = RetryExecutor::new(quick(3), AlwaysRetry);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = Arc::clone(&counter);

        let outcome = executor
            .execute_with_outcome(|| {
                let c = Arc::clone(&counter_clone);
                async move {
                    if c.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err("temporary failure")
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.total_delay, Duration::from_millis(2));
        assert_eq!(outcome.into_result().expect("third attempt succeeds"), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhaustion_returns_the_last_error() {
        let executor = RetryExecutor::new(quick(3), AlwaysRetry);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = Arc::clone(&counter);

        let result = executor
            .execute(|| {
                let c = Arc::clone(&counter_clone);
                async move {
                    let n = c.fetch_add(1, Ordering::SeqCst) + 1;
                    Err::<(), _>(format!("failure {n}"))
                }
            })
            .await;

        match result {
            Err(RetryError::Exhausted { attempts, last }) => {
                assert_eq!(attempts, 3);
                assert_eq!(last, "failure 3");
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn never_retry_stops_after_first_attempt() {
        let executor = RetryExecutor::new(quick(5), NeverRetry);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = Arc::clone(&counter);

        let result = executor
            .execute(|| {
                let c = Arc::clone(&counter_clone);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>("bad request".to_string())
                }
            })
            .await;

        assert!(matches!(result, Err(RetryError::NonRetryable { attempts: 1, .. })));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn predicate_decides_per_error() {
        let policy = PredicateRetry(|error: &String, _: u32| error.contains("retryable"));
        let executor = RetryExecutor::new(quick(5), policy);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = Arc::clone(&counter);

        let result = executor
            .execute(|| {
                let c = Arc::clone(&counter_clone);
                async move {
                    if c.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err::<(), _>("retryable glitch".to_string())
                    } else {
                        Err("fatal".to_string())
                    }
                }
            })
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.attempts(), 2);
        assert_eq!(err.into_last(), "fatal");
    }

    #[tokio::test]
    async fn retry_after_is_capped_by_ceiling() {
        struct Slow;
        impl RetryPolicy<&'static str> for Slow {
            fn should_retry(&self, _: &&'static str, _: u32) -> RetryDecision {
                RetryDecision::RetryAfter(Duration::from_secs(3600))
            }
        }

        let config = RetryConfig::builder()
            .max_attempts(2)
            .exponential_backoff(Duration::ZERO, Duration::ZERO, Duration::from_millis(5))
            .build()
            .unwrap();
        let outcome =
            RetryExecutor::new(config, Slow).execute_with_outcome(|| async { Err::<(), _>("busy") }).await;

        assert_eq!(outcome.attempts, 2);
        assert_eq!(outcome.total_delay, Duration::from_millis(5));
    }

    #[test]
    fn retry_error_display_includes_last_error() {
        let err = RetryError::Exhausted { attempts: 3, last: "connection reset" };
        assert_eq!(err.to_string(), "All 3 attempts failed, last error: connection reset");

        let err = RetryConfig::builder().max_attempts(0).build().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid retry configuration: max_attempts must be greater than 0"
        );
    }
}
