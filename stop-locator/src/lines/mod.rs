//! Bus lines and stop coordinates.
//!
//! A registry maps line ids to their ordered stop lists and maps stop names
//! to coordinates. Coordinates are shared across lines: a stop served by
//! two lines has one position.

mod builtin;
mod error;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::domain::{Coordinate, Line, MAX_ANCHORS, Stop};

pub use error::RegistryError;

/// Lookup of lines and stop coordinates.
pub trait LineRegistry {
    /// Line by id.
    fn line(&self, id: &str) -> Option<&Line>;

    /// All lines, in registration order.
    fn lines(&self) -> &[Line];

    /// Coordinate of a stop, if known.
    fn coordinate(&self, stop_name: &str) -> Option<Coordinate>;

    /// A line's stops in order, each with its coordinate if known.
    fn stops_for(&self, line: &Line) -> Vec<Stop> {
        line.stops
            .iter()
            .map(|name| Stop {
                name: name.clone(),
                coordinate: self.coordinate(name),
            })
            .collect()
    }
}

/// On-disk registry format.
#[derive(Debug, Deserialize)]
struct RegistryFile {
    lines: Vec<Line>,
    #[serde(default)]
    coordinates: HashMap<String, Coordinate>,
}

/// In-memory line registry.
#[derive(Debug, Clone)]
pub struct StaticLineRegistry {
    lines: Vec<Line>,
    coordinates: HashMap<String, Coordinate>,
}

impl StaticLineRegistry {
    /// Build a registry, validating every line and coordinate.
    pub fn new(
        lines: Vec<Line>,
        coordinates: HashMap<String, Coordinate>,
    ) -> Result<Self, RegistryError> {
        let mut ids = HashSet::new();
        for line in &lines {
            if !ids.insert(line.id.as_str()) {
                return Err(RegistryError::DuplicateLine(line.id.clone()));
            }

            if line.anchors.len() > MAX_ANCHORS {
                return Err(RegistryError::TooManyAnchors {
                    line: line.id.clone(),
                    count: line.anchors.len(),
                });
            }

            let mut seen = HashSet::new();
            for stop in &line.stops {
                if !seen.insert(stop.as_str()) {
                    return Err(RegistryError::DuplicateStop {
                        line: line.id.clone(),
                        stop: stop.clone(),
                    });
                }
            }
        }

        for (stop, c) in &coordinates {
            Coordinate::validated(c.latitude, c.longitude).map_err(|source| {
                RegistryError::InvalidCoordinate {
                    stop: stop.clone(),
                    source,
                }
            })?;
        }

        Ok(Self { lines, coordinates })
    }

    /// The built-in registry: line 400 Udine-Grado.
    pub fn builtin() -> Self {
        Self {
            lines: vec![builtin::line_400()],
            coordinates: builtin::line_400_coordinates().collect(),
        }
    }

    /// Parse registry JSON.
    ///
    /// ```json
    /// {
    ///   "lines": [{"id": "400", "name": "Udine-Grado", "stops": ["Udine", "Grado"], "anchors": ["Udine"]}],
    ///   "coordinates": {"Udine": {"latitude": 46.0625, "longitude": 13.2354}}
    /// }
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_json::from_str(json)?;
        Self::new(file.lines, file.coordinates)
    }

    /// Load a registry from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            lines = registry.lines.len(),
            stops = registry.coordinates.len(),
            "loaded line registry"
        );
        Ok(registry)
    }
}

impl LineRegistry for StaticLineRegistry {
    fn line(&self, id: &str) -> Option<&Line> {
        self.lines.iter().find(|l| l.id == id)
    }

    fn lines(&self) -> &[Line] {
        &self.lines
    }

    fn coordinate(&self, stop_name: &str) -> Option<Coordinate> {
        self.coordinates.get(stop_name).copied()
    }
}
