//! Retry policy for idempotent API requests
//!
//! The HTTP transport wraps GET and DELETE calls in [`with_retry`]. Requests
//! that create mail (POST) are never retried here: a duplicate POST could
//! print and mail a second check.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Longest wait honored from a server's `Retry-After` header
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not including the initial attempt)
    pub max_retries: u32,

    /// Fixed pause before each retry
    pub backoff: Duration,

    /// Upper bound for a server-requested wait
    pub max_retry_after: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from_policy(3, 100)
    }
}

impl RetryConfig {
    /// Build the policy described by the `retry` config block
    ///
    /// `times` counts total attempts, so `times = 3` means two retries.
    /// Each retry waits a fixed `sleep_ms` milliseconds unless the server
    /// asks for longer with `Retry-After`.
    pub fn from_policy(times: u32, sleep_ms: u64) -> Self {
        Self {
            max_retries: times.saturating_sub(1),
            backoff: Duration::from_millis(sleep_ms),
            max_retry_after: MAX_RETRY_AFTER,
        }
    }

    /// Never retry
    pub fn none() -> Self {
        Self::from_policy(1, 0)
    }

    /// Pause before the next attempt
    pub fn delay_for(&self, decision: RetryDecision) -> Duration {
        match decision {
            RetryDecision::RetryAfter(wait) => wait.min(self.max_retry_after),
            RetryDecision::Retry | RetryDecision::NoRetry => self.backoff,
        }
    }
}

/// Retry classification for errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry the operation
    Retry,
    /// Retry after the duration the server asked for
    RetryAfter(Duration),
    /// Don't retry, the error is permanent
    NoRetry,
}

/// Errors that know whether they are transient
pub trait RetryableError {
    fn retry_decision(&self) -> RetryDecision;
}

/// Execute an async operation with retry logic
///
/// Returns the first success, or the last error once the policy is
/// exhausted or the error is permanent.
pub async fn with_retry<F, Fut, T, E>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + std::fmt::Display,
{
    let mut attempt = 0;

    loop {
        let error = match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };

        let decision = error.retry_decision();
        if decision == RetryDecision::NoRetry {
            debug!(
                operation = operation_name,
                attempt = attempt,
                "Request failed with non-retryable error: {}",
                error
            );
            return Err(error);
        }

        if attempt >= config.max_retries {
            warn!(
                operation = operation_name,
                attempts = attempt + 1,
                "Request failed after {} attempts: {}",
                attempt + 1,
                error
            );
            return Err(error);
        }

        let delay = config.delay_for(decision);
        warn!(
            operation = operation_name,
            attempt = attempt + 1,
            max_attempts = config.max_retries + 1,
            delay_ms = delay.as_millis() as u64,
            "Retrying after error: {}",
            error
        );

        sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_defaults() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.delay_for(RetryDecision::Retry), Duration::from_millis(100));
    }

    #[test]
    fn test_policy_with_zero_times() {
        assert_eq!(RetryConfig::from_policy(0, 100).max_retries, 0);
        assert_eq!(RetryConfig::none().max_retries, 0);
    }

    #[test]
    fn test_retry_after_is_honored_up_to_the_cap() {
        let config = RetryConfig::from_policy(3, 10);

        assert_eq!(
            config.delay_for(RetryDecision::RetryAfter(Duration::from_secs(2))),
            Duration::from_secs(2)
        );
        assert_eq!(
            config.delay_for(RetryDecision::RetryAfter(Duration::from_secs(3600))),
            MAX_RETRY_AFTER
        );
    }

    #[derive(Debug)]
    struct TestError {
        decision: RetryDecision,
    }

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "TestError({:?})", self.decision)
        }
    }

    impl RetryableError for TestError {
        fn retry_decision(&self) -> RetryDecision {
            self.decision
        }
    }

    fn transient() -> TestError {
        TestError {
            decision: RetryDecision::Retry,
        }
    }

    #[tokio::test]
    async fn test_retry_succeeds_eventually() {
        let config = RetryConfig::from_policy(3, 1);
        let mut attempts = 0;

        let result: Result<&str, TestError> = with_retry(&config, "get status", || {
            attempts += 1;
            async move {
                if attempts < 3 {
                    Err(transient())
                } else {
                    Ok("delivered")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "delivered");
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up() {
        let config = RetryConfig::from_policy(3, 1);
        let mut attempts = 0;

        let result: Result<&str, TestError> = with_retry(&config, "cancel", || {
            attempts += 1;
            async move { Err(transient()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn test_no_retry_on_permanent_error() {
        let config = RetryConfig::from_policy(3, 1);
        let mut attempts = 0;

        let result: Result<&str, TestError> = with_retry(&config, "get status", || {
            attempts += 1;
            async move {
                Err(TestError {
                    decision: RetryDecision::NoRetry,
                })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn test_retry_after_waits_requested_duration() {
        let config = RetryConfig::from_policy(2, 1);
        let mut attempts = 0;
        let started = std::time::Instant::now();

        let result: Result<&str, TestError> = with_retry(&config, "get status", || {
            attempts += 1;
            async move {
                if attempts < 2 {
                    Err(TestError {
                        decision: RetryDecision::RetryAfter(Duration::from_millis(50)),
                    })
                } else {
                    Ok("mailed")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "mailed");
        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
