//! Batched road-distance client.
//!
//! Sends one origin and many destinations to the routing table service in a
//! single request, retrying transient failures. Callers never see an error:
//! a whole-call `None` or a per-destination `None` both mean "use the
//! straight-line distance for that stop".

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::Coordinate;

use super::error::RoutingServiceError;
use super::retry::{RetryPolicy, with_retry};
use super::transport::{OsrmTransport, TableTransport};
use super::types::RouteQuery;

/// Default base URL for the public OSRM demo server.
const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

/// Default routing profile.
const DEFAULT_PROFILE: &str = "driving";

/// Default ceiling on destinations per request.
pub const DEFAULT_DESTINATION_CAP: usize = 30;

/// Configuration for the routing client.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingConfig {
    /// Base URL for the table service
    pub base_url: String,
    /// Routing profile path segment (e.g. "driving")
    pub profile: String,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Retry budget and per-attempt timeouts
    pub retry: RetryPolicy,
    /// Maximum destinations sent in one request
    pub destination_cap: usize,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            user_agent: concat!("stop-locator/", env!("CARGO_PKG_VERSION")).to_string(),
            retry: RetryPolicy::default(),
            destination_cap: DEFAULT_DESTINATION_CAP,
        }
    }
}

impl RoutingConfig {
    /// Set a custom base URL (for testing or a self-hosted server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the routing profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the default retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.retry.max_retries = max_retries;
        self
    }

    /// Set the first-attempt and retry deadlines.
    pub fn with_timeouts(mut self, first_attempt: Duration, retry: Duration) -> Self {
        self.retry.first_attempt_timeout = first_attempt;
        self.retry.retry_timeout = retry;
        self
    }

    /// Set the per-request destination ceiling.
    pub fn with_destination_cap(mut self, cap: usize) -> Self {
        self.destination_cap = cap;
        self
    }
}

/// Source of road distances from one origin to many destinations.
///
/// The returned vector, when present, has exactly one entry per
/// destination. This abstraction lets the rankers be tested without HTTP.
pub trait RoadDistances {
    fn fetch_distances(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> impl Future<Output = Option<Vec<Option<f64>>>> + Send;
}

/// Road-distance client with timeout, retry and backoff.
#[derive(Debug, Clone)]
pub struct RouteDistanceClient<T> {
    transport: T,
    policy: RetryPolicy,
    destination_cap: usize,
}

impl RouteDistanceClient<OsrmTransport> {
    /// Create a client talking to an OSRM server.
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingServiceError> {
        Ok(Self::with_transport(OsrmTransport::new(config)?, config))
    }
}

impl<T: TableTransport> RouteDistanceClient<T> {
    /// Create a client over any table transport.
    pub fn with_transport(transport: T, config: &RoutingConfig) -> Self {
        Self {
            transport,
            policy: config.retry.clone(),
            destination_cap: config.destination_cap,
        }
    }

    /// Access the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch road distances in kilometres with an explicit retry budget.
    ///
    /// Returns `None` when every attempt failed. Destinations past the cap
    /// are not sent and come back as `None`.
    pub async fn fetch_distances_with_retries(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
        max_retries: u32,
    ) -> Option<Vec<Option<f64>>> {
        if destinations.is_empty() {
            return Some(Vec::new());
        }

        let query = RouteQuery::new(origin, destinations, self.destination_cap);
        if query.len() < destinations.len() {
            debug!(
                requested = destinations.len(),
                sent = query.len(),
                "destination list truncated to cap"
            );
        }

        let policy = self.policy.clone().with_max_retries(max_retries);
        let query = &query;
        let transport = &self.transport;

        let outcome = with_retry(&policy, move |attempt| async move {
            debug!(attempt, destinations = query.len(), "requesting road distances");
            transport
                .fetch_table(query)
                .await?
                .into_distances_km(query.len())
        })
        .await;

        match outcome.result {
            Ok(mut distances) => {
                let refined = distances.iter().filter(|d| d.is_some()).count();
                debug!(
                    attempts = outcome.attempts,
                    refined,
                    total = destinations.len(),
                    "road distances received"
                );
                distances.resize(destinations.len(), None);
                Some(distances)
            }
            Err(err) => {
                warn!(
                    attempts = outcome.attempts,
                    error = %err,
                    "road distances unavailable, falling back to straight-line"
                );
                None
            }
        }
    }
}

impl<T: TableTransport + Sync> RoadDistances for RouteDistanceClient<T> {
    async fn fetch_distances(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Option<Vec<Option<f64>>> {
        self.fetch_distances_with_retries(origin, destinations, self.policy.max_retries)
            .await
    }
}
