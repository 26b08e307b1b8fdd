//! Road-distance client for an OSRM-compatible table service.
//!
//! Key characteristics of the service:
//! - One request carries one origin and N destinations
//! - It rate-limits aggressively (HTTP 429) and can be slow
//! - Individual cells may be `null` when no route exists
//!
//! The client bounds cost with a destination cap, retries transient
//! failures sequentially, and never surfaces an error to its caller.

mod client;
mod error;
mod retry;
mod transport;
mod types;

pub use client::{DEFAULT_DESTINATION_CAP, RoadDistances, RouteDistanceClient, RoutingConfig};
pub use error::RoutingServiceError;
pub use retry::{DEFAULT_MAX_RETRIES, RetryOutcome, RetryPolicy, with_retry};
pub use transport::{OsrmTransport, TableTransport};
pub use types::{RouteQuery, TableResponse};
