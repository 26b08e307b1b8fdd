//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, Line, NearestStop, RankedStopList, Stop};
use crate::position::{PositionError, PositionFix, PositionOptions};
use crate::ranking::{DiagnosticEvent, Terminus};

/// A position reported by the browser.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionRequest {
    pub latitude: f64,
    pub longitude: f64,

    /// Accuracy radius in metres
    pub accuracy: Option<f64>,
}

impl PositionRequest {
    /// The reported fix, stamped now. Not yet validated.
    pub fn to_fix(&self) -> PositionFix {
        PositionFix::now(
            Coordinate::new(self.latitude, self.longitude),
            self.accuracy,
        )
    }
}

/// A position failure reported by the browser.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionFailureRequest {
    /// Geolocation API error code (1 denied, 2 unavailable, 3 timeout)
    pub code: u8,
}

impl PositionFailureRequest {
    pub fn to_error(&self) -> PositionError {
        PositionError::from_code(self.code)
    }
}

/// Recorded position failure, with the message to show.
#[derive(Debug, Serialize)]
pub struct PositionFailureResponse {
    pub code: u8,
    pub message: String,
    pub permission_granted: bool,
}

/// Query for reverse geocoding.
#[derive(Debug, Clone, Deserialize)]
pub struct ReverseGeocodeQuery {
    pub lat: f64,
    pub lon: f64,
}

/// A line in the line list.
#[derive(Debug, Serialize)]
pub struct LineSummary {
    pub id: String,
    pub name: String,
    pub stop_count: usize,

    /// Whether nearest-start assignment is available
    pub auto_assign: bool,
}

impl From<&Line> for LineSummary {
    fn from(line: &Line) -> Self {
        Self {
            id: line.id.clone(),
            name: line.name.clone(),
            stop_count: line.stops.len(),
            auto_assign: line.supports_auto_assignment(),
        }
    }
}

/// Response listing all lines.
#[derive(Debug, Serialize)]
pub struct LinesResponse {
    pub lines: Vec<LineSummary>,
}

/// A line's stops in travel order.
#[derive(Debug, Serialize)]
pub struct LineStopsResponse {
    pub line: LineSummary,
    pub stops: Vec<Stop>,
}

/// Stops ranked by distance from the reported position.
#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub line: String,
    pub position: PositionFix,
    pub stops: RankedStopList,
    pub diagnostics: Vec<DiagnosticEvent>,
}

/// Nearest-start assignment result.
#[derive(Debug, Serialize)]
pub struct NearestStartResponse {
    pub line: String,
    pub start: Option<NearestStop>,
    pub destination: Option<Terminus>,
    pub diagnostics: Vec<DiagnosticEvent>,
}

/// Reverse geocoding result.
#[derive(Debug, Serialize)]
pub struct ReverseGeocodeResponse {
    pub label: Option<String>,
}

/// Last known position and permission state.
#[derive(Debug, Serialize)]
pub struct PositionStateResponse {
    pub position: Option<PositionFix>,
    pub permission_granted: bool,

    /// Options the browser should pass to its position request
    pub options: PositionOptionsResponse,
}

/// Position options in browser Geolocation API terms.
#[derive(Debug, Serialize)]
pub struct PositionOptionsResponse {
    pub enable_high_accuracy: bool,
    pub timeout_ms: u64,
    pub maximum_age_ms: u64,
}

impl From<&PositionOptions> for PositionOptionsResponse {
    fn from(options: &PositionOptions) -> Self {
        Self {
            enable_high_accuracy: options.high_accuracy,
            timeout_ms: options.timeout.as_millis() as u64,
            maximum_age_ms: options.maximum_age.as_millis() as u64,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
