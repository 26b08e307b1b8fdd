//! Transport for the routing table service.

use std::future::Future;

use super::client::RoutingConfig;
use super::error::RoutingServiceError;
use super::types::{RouteQuery, TableResponse};

/// One round trip to a one-to-many distance table service.
///
/// Implementations perform a single request and classify the failure; the
/// deadline and any retries are applied by the caller.
pub trait TableTransport {
    fn fetch_table(
        &self,
        query: &RouteQuery,
    ) -> impl Future<Output = Result<TableResponse, RoutingServiceError>> + Send;
}

/// OSRM `table` API over HTTP.
#[derive(Debug, Clone)]
pub struct OsrmTransport {
    http: reqwest::Client,
    base_url: String,
    profile: String,
}

impl OsrmTransport {
    /// Create a transport from routing configuration.
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingServiceError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| RoutingServiceError::NetworkFailure(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            profile: config.profile.clone(),
        })
    }

    /// Full request URL for a query.
    ///
    /// The query string is written by hand: OSRM expects literal `;`
    /// separators in `destinations`.
    pub fn table_url(&self, query: &RouteQuery) -> String {
        format!(
            "{}/table/v1/{}/{}?sources=0&destinations={}&annotations=distance",
            self.base_url,
            self.profile,
            query.coordinates_path(),
            query.destination_indices()
        )
    }
}

impl TableTransport for OsrmTransport {
    async fn fetch_table(&self, query: &RouteQuery) -> Result<TableResponse, RoutingServiceError> {
        let url = self.table_url(query);

        let response = self.http.get(&url).send().await.map_err(classify)?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RoutingServiceError::RateLimited);
        }

        if !status.is_success() {
            return Err(RoutingServiceError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(classify)?;

        serde_json::from_str(&body).map_err(|e| {
            RoutingServiceError::MalformedResponse(format!(
                "{e} (body: {})",
                body.chars().take(200).collect::<String>()
            ))
        })
    }
}

/// Map a transport-level reqwest failure onto the retry taxonomy.
fn classify(err: reqwest::Error) -> RoutingServiceError {
    if err.is_timeout() {
        RoutingServiceError::Timeout
    } else {
        RoutingServiceError::NetworkFailure(err.to_string())
    }
}
