//! Sequential retry with per-attempt timeouts and reason-based backoff.
//!
//! Each attempt runs under its own deadline. A failed attempt is retried
//! only when its error carries a backoff (see
//! [`RoutingServiceError::backoff`]) and attempts remain. Retries never
//! overlap.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::error::RoutingServiceError;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Retry configuration for one logical request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; total attempts = `max_retries + 1`.
    pub max_retries: u32,

    /// Deadline for attempt 0.
    pub first_attempt_timeout: Duration,

    /// Deadline for every later attempt.
    pub retry_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            first_attempt_timeout: Duration::from_secs(30),
            retry_timeout: Duration::from_secs(40),
        }
    }
}

impl RetryPolicy {
    /// Same timeouts, different retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Deadline for a 0-indexed attempt.
    pub fn timeout_for(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            self.first_attempt_timeout
        } else {
            self.retry_timeout
        }
    }
}

/// Final result of a retried operation.
#[derive(Debug)]
pub struct RetryOutcome<T> {
    /// Success value or the error from the last attempt.
    pub result: Result<T, RoutingServiceError>,

    /// Attempts made (1 = no retries).
    pub attempts: u32,
}

/// Run `operation` until it succeeds, fails permanently, or the policy is
/// exhausted.
///
/// `operation` receives the 0-indexed attempt number. An attempt that does
/// not finish within [`RetryPolicy::timeout_for`] is dropped and counts as
/// [`RoutingServiceError::Timeout`].
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, mut operation: F) -> RetryOutcome<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, RoutingServiceError>>,
{
    let mut attempt = 0u32;

    loop {
        let deadline = policy.timeout_for(attempt);
        let result = match tokio::time::timeout(deadline, operation(attempt)).await {
            Ok(result) => result,
            Err(_) => Err(RoutingServiceError::Timeout),
        };

        let err = match result {
            Ok(value) => {
                if attempt > 0 {
                    debug!(attempts = attempt + 1, "routing request succeeded after retries");
                }
                return RetryOutcome {
                    result: Ok(value),
                    attempts: attempt + 1,
                };
            }
            Err(err) => err,
        };

        let delay = match err.backoff(attempt) {
            Some(delay) if attempt < policy.max_retries => delay,
            _ => {
                return RetryOutcome {
                    result: Err(err),
                    attempts: attempt + 1,
                };
            }
        };

        warn!(
            attempt = attempt + 1,
            max_retries = policy.max_retries,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "routing request failed, retrying"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
