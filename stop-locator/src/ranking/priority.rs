//! Nearest-start assignment over a line's anchor stops.
//!
//! Only a handful of anchor stops are eligible, so the whole set goes to
//! the routing service in one request. Any anchor without a road distance
//! falls back to its straight-line distance.

use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::{Coordinate, DistanceSource, Line, NearestStop, Stop};
use crate::geo::distance_km;
use crate::lines::LineRegistry;
use crate::routing::RoadDistances;

use super::diagnostics::{DiagnosticEvent, DiagnosticKind};

/// A line terminus suggested as destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Terminus {
    pub name: String,

    /// Position in the line's stop list.
    pub index: usize,
}

/// Start stop chosen from the user's position, plus the suggested
/// destination at the other end of the line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutoAssignment {
    pub start: NearestStop,
    pub destination: Option<Terminus>,
}

/// Result of an auto-assignment attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignOutcome {
    /// `None` when the line has no anchors or none could be measured.
    pub assignment: Option<AutoAssignment>,
    pub diagnostics: Vec<DiagnosticEvent>,
}

/// Picks the nearest anchor stop for a user.
pub struct PriorityStopSelector<'a, D> {
    distances: &'a D,
}

impl<'a, D: RoadDistances + Sync> PriorityStopSelector<'a, D> {
    pub fn new(distances: &'a D) -> Self {
        Self { distances }
    }

    /// Nearest anchor present in `line_stops`.
    ///
    /// Anchors missing from the line or without a coordinate are ignored.
    /// Equal distances go to the anchor listed first.
    pub async fn select_nearest<S: AsRef<str>>(
        &self,
        user: Coordinate,
        anchors: &[S],
        line_stops: &[Stop],
    ) -> Option<NearestStop> {
        let eligible: Vec<(usize, &Stop, Coordinate)> = anchors
            .iter()
            .filter_map(|anchor| {
                let name = anchor.as_ref();
                let index = line_stops.iter().position(|s| s.name == name)?;
                let stop = &line_stops[index];
                stop.coordinate.map(|c| (index, stop, c))
            })
            .collect();

        if eligible.is_empty() {
            debug!("no anchor stops on this line");
            return None;
        }

        let destinations: Vec<Coordinate> = eligible.iter().map(|(_, _, c)| *c).collect();
        let refined = self.distances.fetch_distances(user, &destinations).await;
        if refined.is_none() {
            debug!(
                anchors = eligible.len(),
                "road distances unavailable for anchors, using straight-line"
            );
        }

        let mut best: Option<NearestStop> = None;
        for (position, (index, stop, coordinate)) in eligible.iter().enumerate() {
            let road = refined
                .as_ref()
                .and_then(|r| r.get(position).copied().flatten());

            let candidate = match road {
                Some(km) => NearestStop {
                    name: stop.name.clone(),
                    index: *index,
                    distance_km: km,
                    source: DistanceSource::Refined,
                },
                None => {
                    let km = distance_km(user, *coordinate);
                    if !km.is_finite() {
                        continue;
                    }
                    NearestStop {
                        name: stop.name.clone(),
                        index: *index,
                        distance_km: km,
                        source: DistanceSource::Approximate,
                    }
                }
            };

            // strict comparison keeps the earlier anchor on ties
            if best
                .as_ref()
                .is_none_or(|b| candidate.distance_km < b.distance_km)
            {
                best = Some(candidate);
            }
        }

        best
    }

    /// Choose a start stop and destination on `line`.
    pub async fn auto_assign<R: LineRegistry + Sync>(
        &self,
        user: Coordinate,
        line: &Line,
        registry: &R,
    ) -> AssignOutcome {
        if !line.supports_auto_assignment() {
            info!(line = %line.id, "auto-assignment not available for this line");
            return AssignOutcome {
                assignment: None,
                diagnostics: Vec::new(),
            };
        }

        let stops = registry.stops_for(line);
        let Some(start) = self.select_nearest(user, &line.anchors, &stops).await else {
            info!(line = %line.id, "no anchor stop could be measured");
            return AssignOutcome {
                assignment: None,
                diagnostics: Vec::new(),
            };
        };

        let destination = opposite_terminus(&start.name, line);
        info!(
            line = %line.id,
            start = %start.name,
            distance_km = start.distance_km,
            destination = destination.as_ref().map(|t| t.name.as_str()),
            "nearest start assigned"
        );

        let event = DiagnosticEvent::new(
            DiagnosticKind::NearestStart,
            "Nearest start",
            json!({
                "line": line.id,
                "start": start.name,
                "distance_km": start.distance_km,
                "source": start.source,
                "destination": destination.as_ref().map(|t| &t.name),
            }),
        );

        AssignOutcome {
            assignment: Some(AutoAssignment { start, destination }),
            diagnostics: vec![event],
        }
    }
}

/// The terminus at the other end of the line from `start`.
///
/// From a terminus this is the other terminus. From an intermediate stop
/// it is the terminus farther along the stop list; a stop exactly halfway
/// heads to the first stop. Returns `None` for lines with fewer than two
/// stops or when `start` is not on the line.
pub fn opposite_terminus(start: &str, line: &Line) -> Option<Terminus> {
    let (first, last) = line.termini()?;
    let last_index = line.stops.len() - 1;
    let to_first = Terminus {
        name: first.to_string(),
        index: 0,
    };
    let to_last = Terminus {
        name: last.to_string(),
        index: last_index,
    };

    if start == first {
        return Some(to_last);
    }
    if start == last {
        return Some(to_first);
    }

    let index = line.index_of(start)?;
    if index < last_index - index {
        Some(to_last)
    } else {
        Some(to_first)
    }
}
