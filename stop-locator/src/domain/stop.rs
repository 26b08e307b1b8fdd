//! Stops and lines.

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// A stop on a line, with its coordinate if the registry knows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Stop name, unique within a line's stop list.
    pub name: String,

    /// Coordinate, or `None` when unknown.
    pub coordinate: Option<Coordinate>,
}

impl Stop {
    /// Create a stop with a known coordinate.
    pub fn new(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            coordinate: Some(coordinate),
        }
    }

    /// Create a stop whose coordinate is unknown.
    pub fn unlocated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coordinate: None,
        }
    }
}

/// Maximum number of anchor stops a line may declare.
pub const MAX_ANCHORS: usize = 4;

/// A bus line: an ordered list of stop names plus its anchor stops.
///
/// Anchor stops are the few stops eligible for automatic nearest-start
/// assignment. A line without anchors does not support auto-assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Registry identifier (e.g. "400").
    pub id: String,

    /// Display name (e.g. "Udine-Grado").
    pub name: String,

    /// Stop names in travel order, first stop to last stop.
    pub stops: Vec<String>,

    /// Anchor stop names in priority order.
    #[serde(default)]
    pub anchors: Vec<String>,
}

impl Line {
    /// Position of a stop in the line's stop list.
    pub fn index_of(&self, stop_name: &str) -> Option<usize> {
        self.stops.iter().position(|s| s == stop_name)
    }

    /// Whether the line lists a stop with this name.
    pub fn contains(&self, stop_name: &str) -> bool {
        self.index_of(stop_name).is_some()
    }

    /// First and last stop, if the line has at least two stops.
    pub fn termini(&self) -> Option<(&str, &str)> {
        match self.stops.as_slice() {
            [first, .., last] => Some((first.as_str(), last.as_str())),
            _ => None,
        }
    }

    /// Whether nearest-start auto-assignment is available for this line.
    pub fn supports_auto_assignment(&self) -> bool {
        !self.anchors.is_empty()
    }
}
