//! Session cache in front of the reverse geocoder.
//!
//! Keys are coordinates rounded to a fixed number of decimal places, so
//! nearby positions share one lookup. Only successful labels are stored;
//! a failure is retried on the next call.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::{debug, warn};

use crate::domain::Coordinate;

use super::client::{GeocodeConfig, ReverseGeocoder};

/// Rounded (latitude, longitude) pair.
type PlaceKey = (i64, i64);

/// Reverse geocoder with a rounded-key label cache.
pub struct ReverseGeocodeCache<G> {
    geocoder: G,
    labels: MokaCache<PlaceKey, String>,
    scale: f64,
    timeout: Duration,
}

impl<G: ReverseGeocoder + Sync> ReverseGeocodeCache<G> {
    /// Wrap a geocoder.
    pub fn new(geocoder: G, config: &GeocodeConfig) -> Self {
        let labels = MokaCache::builder()
            .max_capacity(config.cache_capacity)
            .build();

        Self {
            geocoder,
            labels,
            scale: 10f64.powi(config.key_precision as i32),
            timeout: config.timeout,
        }
    }

    fn key(&self, coordinate: Coordinate) -> PlaceKey {
        (
            (coordinate.latitude * self.scale).round() as i64,
            (coordinate.longitude * self.scale).round() as i64,
        )
    }

    /// Resolve a coordinate to a short place name.
    ///
    /// Returns `None` on any failure or when the service has no usable
    /// label; nothing is cached in that case.
    pub async fn resolve(&self, coordinate: Coordinate) -> Option<String> {
        if !coordinate.is_valid() {
            debug!(%coordinate, "skipping reverse geocode for invalid coordinate");
            return None;
        }

        let key = self.key(coordinate);
        if let Some(label) = self.labels.get(&key).await {
            debug!(%coordinate, label = %label, "reverse geocode cache hit");
            return Some(label);
        }

        let lookup = self.geocoder.reverse(coordinate);
        let place = match tokio::time::timeout(self.timeout, lookup).await {
            Ok(Ok(place)) => place,
            Ok(Err(e)) => {
                warn!(%coordinate, error = %e, "reverse geocoding failed");
                return None;
            }
            Err(_) => {
                warn!(
                    %coordinate,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "reverse geocoding timed out"
                );
                return None;
            }
        };

        let Some(label) = place.label() else {
            debug!(%coordinate, "reverse geocode result has no usable label");
            return None;
        };

        debug!(%coordinate, label = %label, "reverse geocode cached");
        self.labels.insert(key, label.clone()).await;
        Some(label)
    }

    /// Number of cached labels.
    pub fn entry_count(&self) -> u64 {
        self.labels.entry_count()
    }
}
