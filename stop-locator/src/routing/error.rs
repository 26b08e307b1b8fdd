//! Routing service error types.

use std::time::Duration;

/// Errors from a single attempt against the routing table service.
///
/// These never leave [`RouteDistanceClient`](super::RouteDistanceClient):
/// once retries are exhausted the client reports "use the fallback" instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoutingServiceError {
    /// HTTP 429 from the service
    #[error("rate limited by routing service")]
    RateLimited,

    /// Connection failed, reset, or the body could not be read
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The attempt exceeded its deadline
    #[error("routing request timed out")]
    Timeout,

    /// 2xx response whose body is not a usable distance table
    #[error("malformed routing response: {0}")]
    MalformedResponse(String),

    /// Any other non-2xx status
    #[error("routing service returned status {status}")]
    Status { status: u16 },
}

impl RoutingServiceError {
    /// How long to wait before retrying after this error on `attempt`
    /// (0-indexed), or `None` if the error is not worth retrying.
    pub fn backoff(&self, attempt: u32) -> Option<Duration> {
        let step = u64::from(attempt) + 1;
        match self {
            Self::RateLimited | Self::NetworkFailure(_) => Some(Duration::from_millis(step * 2000)),
            Self::Timeout => Some(Duration::from_millis(step * 1000)),
            Self::MalformedResponse(_) | Self::Status { .. } => None,
        }
    }

    /// Returns true if a later attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        self.backoff(0).is_some()
    }
}
