//! Nominatim reverse-geocoding client.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::debug;

use crate::domain::Coordinate;

use super::error::GeocodeError;

/// Default base URL for the public Nominatim instance.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Configuration for reverse geocoding.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeConfig {
    /// Base URL for the Nominatim API
    pub base_url: String,
    /// Deadline for one lookup
    pub timeout: Duration,
    /// Accept-Language header value
    pub language: String,
    /// User-Agent header (Nominatim requires an identifying agent)
    pub user_agent: String,
    /// Decimal places kept in the cache key
    pub key_precision: u32,
    /// Maximum cached place names
    pub cache_capacity: u64,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(4),
            language: "it".to_string(),
            user_agent: concat!("stop-locator/", env!("CARGO_PKG_VERSION")).to_string(),
            key_precision: 3,
            cache_capacity: 10_000,
        }
    }
}

impl GeocodeConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the lookup deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the preferred response language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Structured address parts returned by Nominatim.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Address {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub municipality: Option<String>,
    pub county: Option<String>,
}

/// A reverse-geocoding result.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReversePlace {
    #[serde(default)]
    pub address: Option<Address>,

    #[serde(default)]
    pub display_name: Option<String>,
}

impl ReversePlace {
    /// Best-effort short label: city, town, village, municipality, county,
    /// then the full display name.
    pub fn label(&self) -> Option<String> {
        let from_address = self.address.as_ref().and_then(|a| {
            [&a.city, &a.town, &a.village, &a.municipality, &a.county]
                .into_iter()
                .flatten()
                .map(|s| s.trim())
                .find(|s| !s.is_empty())
        });

        from_address
            .or_else(|| {
                self.display_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
            })
            .map(str::to_string)
    }
}

/// Resolves a coordinate to a place description.
pub trait ReverseGeocoder {
    fn reverse(
        &self,
        coordinate: Coordinate,
    ) -> impl Future<Output = Result<ReversePlace, GeocodeError>> + Send;
}

/// Raw Nominatim body; an unresolvable point comes back as 200 with `error`.
#[derive(Debug, Deserialize)]
struct NominatimBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    place: ReversePlace,
}

/// Nominatim `/reverse` client.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    /// Create a new client.
    pub fn new(config: &GeocodeConfig) -> Result<Self, GeocodeError> {
        let mut headers = HeaderMap::new();
        let language = HeaderValue::from_str(&config.language)
            .map_err(|_| GeocodeError::NetworkFailure("invalid language header".to_string()))?;
        headers.insert(ACCEPT_LANGUAGE, language);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| GeocodeError::NetworkFailure(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl ReverseGeocoder for NominatimClient {
    async fn reverse(&self, coordinate: Coordinate) -> Result<ReversePlace, GeocodeError> {
        let url = format!("{}/reverse", self.base_url);
        debug!(%coordinate, "reverse geocoding");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("format", "json".to_string()),
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("zoom", "18".to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodeError::Timeout
                } else {
                    GeocodeError::NetworkFailure(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status {
                status: status.as_u16(),
            });
        }

        let body: NominatimBody = response
            .json()
            .await
            .map_err(|e| GeocodeError::MalformedResponse(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(GeocodeError::MalformedResponse(error));
        }

        Ok(body.place)
    }
}
