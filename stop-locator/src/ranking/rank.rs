//! Distance ranking of a line's stops.
//!
//! Every locatable stop gets a straight-line distance. The nearest few are
//! then refined with road distances in a single batched request; the rest
//! keep their straight-line value. A stop tied with the last refinement
//! candidate but cut by truncation is not swapped in.

use serde_json::json;
use tracing::{debug, info};

use crate::domain::{Coordinate, DistanceEstimate, RankedStopList, Stop, compare_distances};
use crate::geo::distance_km;
use crate::routing::RoadDistances;

use super::config::RankingConfig;
use super::diagnostics::{DiagnosticEvent, DiagnosticKind};

/// Result of ranking a stop list.
#[derive(Debug, Clone, PartialEq)]
pub struct RankOutcome {
    pub stops: RankedStopList,
    pub diagnostics: Vec<DiagnosticEvent>,
}

/// Ranks stops by distance from the user.
pub struct StopRanker<'a, D> {
    distances: &'a D,
    config: &'a RankingConfig,
}

impl<'a, D: RoadDistances + Sync> StopRanker<'a, D> {
    pub fn new(distances: &'a D, config: &'a RankingConfig) -> Self {
        Self { distances, config }
    }

    /// Rank `stops` by distance from `user`.
    ///
    /// Issues at most one road-distance request. Stops without a coordinate
    /// rank last in their input order.
    pub async fn rank(&self, user: Coordinate, stops: &[Stop]) -> RankOutcome {
        let mut estimates: Vec<DistanceEstimate> = stops
            .iter()
            .map(|stop| {
                DistanceEstimate::approximate(
                    stop.name.as_str(),
                    stop.coordinate.map(|c| distance_km(user, c)),
                )
            })
            .collect();

        // (index into `stops`, coordinate) for every stop with a usable distance
        let mut candidates: Vec<(usize, Coordinate)> = stops
            .iter()
            .enumerate()
            .filter(|(i, _)| estimates[*i].distance_km.is_some())
            .filter_map(|(i, stop)| stop.coordinate.map(|c| (i, c)))
            .collect();
        candidates.sort_by(|(a, _), (b, _)| {
            compare_distances(estimates[*a].distance_km, estimates[*b].distance_km)
        });
        candidates.truncate(self.config.refine_candidates);

        let mut refined_count = 0;
        if candidates.is_empty() {
            debug!(stops = stops.len(), "no locatable stops, skipping refinement");
        } else {
            let destinations: Vec<Coordinate> = candidates.iter().map(|(_, c)| *c).collect();
            match self.distances.fetch_distances(user, &destinations).await {
                Some(refined) => {
                    for ((index, _), km) in candidates.iter().zip(refined) {
                        if let Some(km) = km {
                            estimates[*index] =
                                DistanceEstimate::refined(stops[*index].name.as_str(), km);
                            refined_count += 1;
                        }
                    }
                }
                None => {
                    debug!(
                        candidates = candidates.len(),
                        "road distances unavailable, keeping straight-line ranking"
                    );
                }
            }
        }

        let ranked = RankedStopList::from_estimates(estimates);

        let mut diagnostics = Vec::new();
        if let Some(nearest) = ranked.nearest() {
            let coordinate = stops
                .iter()
                .find(|s| s.name == nearest.stop_name)
                .and_then(|s| s.coordinate);

            info!(
                stop = %nearest.stop_name,
                distance_km = nearest.distance_km,
                source = ?nearest.source,
                refined = refined_count,
                "nearest stop"
            );

            diagnostics.push(DiagnosticEvent::new(
                DiagnosticKind::Ranking,
                "Nearest stop",
                json!({
                    "stop": nearest.stop_name,
                    "distance_km": nearest.distance_km,
                    "source": nearest.source,
                    "coordinate": coordinate,
                    "candidates": candidates.len(),
                    "refined": refined_count,
                }),
            ));
        }

        RankOutcome {
            stops: ranked,
            diagnostics,
        }
    }
}
