//! Service configuration.
//!
//! Every setting has a default; `STOP_LOCATOR_*` environment variables
//! override them.
//!
//! | Variable | Setting |
//! |---|---|
//! | `STOP_LOCATOR_LISTEN` | listen address (`127.0.0.1:3000`) |
//! | `STOP_LOCATOR_LINES_FILE` | JSON line registry; built-in line 400 when unset |
//! | `STOP_LOCATOR_ROUTING_URL` | OSRM base URL |
//! | `STOP_LOCATOR_ROUTING_PROFILE` | OSRM profile (`driving`) |
//! | `STOP_LOCATOR_ROUTING_MAX_RETRIES` | retries after the first attempt (2) |
//! | `STOP_LOCATOR_ROUTING_TIMEOUT_MS` | first-attempt deadline (30000) |
//! | `STOP_LOCATOR_ROUTING_RETRY_TIMEOUT_MS` | later-attempt deadline (40000) |
//! | `STOP_LOCATOR_DESTINATION_CAP` | destinations per routing request (30) |
//! | `STOP_LOCATOR_REFINE_CANDIDATES` | stops refined by road distance (15) |
//! | `STOP_LOCATOR_GEOCODE_URL` | Nominatim base URL |
//! | `STOP_LOCATOR_GEOCODE_LANGUAGE` | `Accept-Language` for place names (`it`) |
//! | `STOP_LOCATOR_GEOCODE_TIMEOUT_MS` | reverse-geocoding deadline (4000) |
//! | `STOP_LOCATOR_POSITION_MAX_AGE_SECS` | oldest accepted reported fix (300) |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::geocode::GeocodeConfig;
use crate::position::PositionOptions;
use crate::ranking::RankingConfig;
use crate::routing::RoutingConfig;

/// Prefix shared by all environment variables.
const ENV_PREFIX: &str = "STOP_LOCATOR_";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable could not be parsed
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },

    /// Settings are individually valid but contradict each other
    #[error("inconsistent configuration: {0}")]
    Inconsistent(String),
}

/// Top-level service configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatorConfig {
    pub listen: SocketAddr,
    pub lines_file: Option<PathBuf>,
    pub routing: RoutingConfig,
    pub ranking: RankingConfig,
    pub geocode: GeocodeConfig,
    pub position: PositionOptions,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 3000)),
            lines_file: None,
            routing: RoutingConfig::default(),
            ranking: RankingConfig::default(),
            geocode: GeocodeConfig::default(),
            position: PositionOptions::default(),
        }
    }
}

impl LocatorConfig {
    pub fn with_listen(mut self, listen: SocketAddr) -> Self {
        self.listen = listen;
        self
    }

    pub fn with_lines_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.lines_file = Some(path.into());
        self
    }

    pub fn with_routing(mut self, routing: RoutingConfig) -> Self {
        self.routing = routing;
        self
    }

    pub fn with_ranking(mut self, ranking: RankingConfig) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn with_geocode(mut self, geocode: GeocodeConfig) -> Self {
        self.geocode = geocode;
        self
    }

    /// Defaults overridden by the process environment, then validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup(variable name)`, then validated.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env { lookup };
        let mut config = Self::default();

        if let Some(listen) = env.parse::<SocketAddr>("LISTEN")? {
            config.listen = listen;
        }
        if let Some(path) = env.string("LINES_FILE") {
            config.lines_file = Some(PathBuf::from(path));
        }

        if let Some(url) = env.string("ROUTING_URL") {
            config.routing.base_url = url;
        }
        if let Some(profile) = env.string("ROUTING_PROFILE") {
            config.routing.profile = profile;
        }
        if let Some(retries) = env.parse::<u32>("ROUTING_MAX_RETRIES")? {
            config.routing.retry.max_retries = retries;
        }
        if let Some(ms) = env.parse::<u64>("ROUTING_TIMEOUT_MS")? {
            config.routing.retry.first_attempt_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = env.parse::<u64>("ROUTING_RETRY_TIMEOUT_MS")? {
            config.routing.retry.retry_timeout = Duration::from_millis(ms);
        }
        if let Some(cap) = env.parse::<usize>("DESTINATION_CAP")? {
            config.routing.destination_cap = cap;
        }

        if let Some(k) = env.parse::<usize>("REFINE_CANDIDATES")? {
            config.ranking.refine_candidates = k;
        }

        if let Some(url) = env.string("GEOCODE_URL") {
            config.geocode.base_url = url;
        }
        if let Some(language) = env.string("GEOCODE_LANGUAGE") {
            config.geocode.language = language;
        }
        if let Some(ms) = env.parse::<u64>("GEOCODE_TIMEOUT_MS")? {
            config.geocode.timeout = Duration::from_millis(ms);
        }

        if let Some(secs) = env.parse::<u64>("POSITION_MAX_AGE_SECS")? {
            config.position.maximum_age = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let k = self.ranking.refine_candidates;
        let cap = self.routing.destination_cap;

        if k == 0 {
            return Err(ConfigError::Inconsistent(
                "refine_candidates must be positive".to_string(),
            ));
        }
        if cap < k {
            return Err(ConfigError::Inconsistent(format!(
                "destination_cap ({cap}) is smaller than refine_candidates ({k})"
            )));
        }
        if self.routing.base_url.trim().is_empty() {
            return Err(ConfigError::Inconsistent("routing URL is empty".to_string()));
        }
        if self.geocode.base_url.trim().is_empty() {
            return Err(ConfigError::Inconsistent("geocode URL is empty".to_string()));
        }
        if self.routing.retry.first_attempt_timeout.is_zero()
            || self.routing.retry.retry_timeout.is_zero()
            || self.geocode.timeout.is_zero()
        {
            return Err(ConfigError::Inconsistent(
                "timeouts must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Prefixed variable lookup.
struct Env<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn string(&self, name: &str) -> Option<String> {
        (self.lookup)(&format!("{ENV_PREFIX}{name}"))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse<T>(&self, name: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.string(name)
            .map(|value| {
                value.parse::<T>().map_err(|e| ConfigError::Invalid {
                    key: format!("{ENV_PREFIX}{name}"),
                    value: value.clone(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }
}
