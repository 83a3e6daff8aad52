// Retry policy for transient store failures
use super::constants::DEFAULT_POOL_RETRY_BACKOFF;
use crate::error::AppError;
use std::time::Duration;
use tracing::warn;

/// Retry decision result
#[derive(Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry the operation after the given backoff
    Retry(Duration),
    /// Do not retry, surface the error to the caller
    GiveUp,
}

/// Retry policy for connection pool exhaustion
///
/// Determines if a failed store operation should be attempted again based on:
/// - Error category (only `AppError::PoolExhausted` is transient)
/// - Attempts made so far against the optional ceiling
///
/// The backoff is constant. With no ceiling configured (the default) a
/// transient failure is retried until the store recovers or a different
/// error occurs.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    backoff: Duration,
    max_attempts: Option<u32>,
    retry_writes: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_RETRY_BACKOFF)
    }
}

impl RetryPolicy {
    /// Create an unbounded, query-only policy
    ///
    /// # Arguments
    /// * `backoff` - Wait between attempts (default: 250ms)
    ///
    /// # Example
    /// ```text
    /// let policy = RetryPolicy::new(Duration::from_millis(250)).with_max_attempts(Some(20));
    /// ```
    pub fn new(backoff: Duration) -> Self {
        Self {
            backoff,
            max_attempts: None,
            retry_writes: false,
        }
    }

    /// Cap the total number of attempts (`None` = unbounded)
    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Also retry execute/save/delete on pool exhaustion
    pub fn with_retry_writes(mut self, retry_writes: bool) -> Self {
        self.retry_writes = retry_writes;
        self
    }

    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    pub fn retries_writes(&self) -> bool {
        self.retry_writes
    }

    /// Determine if an operation should be retried
    ///
    /// `attempt` is the number of attempts already made, including the one
    /// that produced `err`.
    ///
    /// Returns:
    /// - `RetryDecision::Retry(backoff)` for a transient error under the ceiling
    /// - `RetryDecision::GiveUp` otherwise
    pub fn should_retry(&self, err: &AppError, attempt: u32) -> RetryDecision {
        if !err.is_transient() {
            return RetryDecision::GiveUp;
        }

        if let Some(max_attempts) = self.max_attempts {
            if attempt >= max_attempts {
                warn!(
                    attempt = attempt,
                    max_attempts = max_attempts,
                    "Max retry attempts reached"
                );
                return RetryDecision::GiveUp;
            }
        }

        RetryDecision::Retry(self.backoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exhausted() -> AppError {
        AppError::PoolExhausted("pool timed out while waiting for an open connection".into())
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(), Duration::from_millis(250));
        assert_eq!(policy.max_attempts(), None);
        assert!(!policy.retries_writes());
    }

    #[test]
    fn test_backoff_is_constant_and_unbounded() {
        let policy = RetryPolicy::default();

        for attempt in [1, 2, 10, 1_000, u32::MAX] {
            assert_eq!(
                policy.should_retry(&exhausted(), attempt),
                RetryDecision::Retry(Duration::from_millis(250))
            );
        }
    }

    #[test]
    fn test_non_transient_errors_are_not_retried() {
        let policy = RetryPolicy::default();

        let errors = [
            AppError::Database("UNIQUE constraint failed".into()),
            AppError::NotFound("Stock AAA".into()),
            AppError::Validation("empty batch".into()),
            AppError::Interrupted("ctrl-c".into()),
        ];
        for err in errors {
            assert_eq!(policy.should_retry(&err, 1), RetryDecision::GiveUp);
        }
    }

    #[test]
    fn test_ceiling_is_opt_in() {
        let policy = RetryPolicy::new(Duration::from_millis(10)).with_max_attempts(Some(3));

        assert_eq!(
            policy.should_retry(&exhausted(), 1),
            RetryDecision::Retry(Duration::from_millis(10))
        );
        assert_eq!(
            policy.should_retry(&exhausted(), 2),
            RetryDecision::Retry(Duration::from_millis(10))
        );
        assert_eq!(policy.should_retry(&exhausted(), 3), RetryDecision::GiveUp);
    }
}
