//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::config::LocatorConfig;
use crate::geocode::{GeocodeError, NominatimClient, ReverseGeocodeCache};
use crate::lines::{RegistryError, StaticLineRegistry};
use crate::position::{LocationTracker, PositionOptions};
use crate::ranking::RankingConfig;
use crate::routing::{OsrmTransport, RouteDistanceClient, RoutingServiceError};

/// Errors building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("line registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("routing client: {0}")]
    Routing(#[from] RoutingServiceError),

    #[error("geocoding client: {0}")]
    Geocode(#[from] GeocodeError),
}

/// Shared application state.
///
/// Contains all the services needed to handle requests. The location
/// tracker is a single session shared by every request.
#[derive(Clone)]
pub struct AppState {
    /// Lines and stop coordinates
    pub registry: Arc<StaticLineRegistry>,

    /// Road-distance client
    pub distances: Arc<RouteDistanceClient<OsrmTransport>>,

    /// Cached reverse geocoder
    pub geocoder: Arc<ReverseGeocodeCache<NominatimClient>>,

    /// Ranking configuration
    pub ranking: Arc<RankingConfig>,

    /// Options applied to reported positions
    pub position_options: Arc<PositionOptions>,

    /// Last known position
    pub tracker: Arc<Mutex<LocationTracker>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        registry: StaticLineRegistry,
        distances: RouteDistanceClient<OsrmTransport>,
        geocoder: ReverseGeocodeCache<NominatimClient>,
        ranking: RankingConfig,
        position_options: PositionOptions,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            distances: Arc::new(distances),
            geocoder: Arc::new(geocoder),
            ranking: Arc::new(ranking),
            position_options: Arc::new(position_options),
            tracker: Arc::new(Mutex::new(LocationTracker::new())),
        }
    }

    /// Build every service from configuration.
    ///
    /// Loads the lines file when one is configured, otherwise uses the
    /// built-in registry.
    pub fn from_config(config: &LocatorConfig) -> Result<Self, StartupError> {
        let registry = match &config.lines_file {
            Some(path) => StaticLineRegistry::from_json_file(path)?,
            None => {
                info!("using built-in line registry");
                StaticLineRegistry::builtin()
            }
        };

        let distances = RouteDistanceClient::new(&config.routing)?;
        let nominatim = NominatimClient::new(&config.geocode)?;
        let geocoder = ReverseGeocodeCache::new(nominatim, &config.geocode);

        Ok(Self::new(
            registry,
            distances,
            geocoder,
            config.ranking.clone(),
            config.position.clone(),
        ))
    }
}
