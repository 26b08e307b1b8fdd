//! Distance estimates and the ranked stop list.

use std::cmp::Ordering;

use serde::Serialize;

/// Where a distance value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceSource {
    /// Straight-line (Haversine) distance.
    Approximate,
    /// Road distance from the routing service.
    Refined,
}

/// Distance from the user to one stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceEstimate {
    pub stop_name: String,

    /// Distance in kilometres; `None` when the stop cannot be located.
    pub distance_km: Option<f64>,

    pub source: DistanceSource,
}

impl DistanceEstimate {
    /// An approximate estimate, discarding non-finite values.
    pub fn approximate(stop_name: impl Into<String>, distance_km: Option<f64>) -> Self {
        Self {
            stop_name: stop_name.into(),
            distance_km: distance_km.filter(|d| d.is_finite()),
            source: DistanceSource::Approximate,
        }
    }

    /// A refined estimate from the routing service.
    pub fn refined(stop_name: impl Into<String>, distance_km: f64) -> Self {
        Self {
            stop_name: stop_name.into(),
            distance_km: Some(distance_km),
            source: DistanceSource::Refined,
        }
    }
}

/// Order two optional distances ascending with `None` treated as +infinity.
pub fn compare_distances(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stop estimates sorted ascending by distance, unknown distances last.
///
/// Construction uses a stable sort, so stops with equal distances (and all
/// stops with unknown distance) keep their input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankedStopList(Vec<DistanceEstimate>);

impl RankedStopList {
    /// Sort estimates into a ranked list.
    pub fn from_estimates(mut estimates: Vec<DistanceEstimate>) -> Self {
        estimates.sort_by(|a, b| compare_distances(a.distance_km, b.distance_km));
        Self(estimates)
    }

    /// The closest stop, if any stop has a known distance.
    pub fn nearest(&self) -> Option<&DistanceEstimate> {
        self.0.first().filter(|e| e.distance_km.is_some())
    }

    pub fn as_slice(&self) -> &[DistanceEstimate] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DistanceEstimate> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<DistanceEstimate> {
        self.0
    }
}

impl IntoIterator for RankedStopList {
    type Item = DistanceEstimate;
    type IntoIter = std::vec::IntoIter<DistanceEstimate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The anchor stop picked for nearest-start assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestStop {
    pub name: String,

    /// Position of the stop in the line's stop list.
    pub index: usize,

    pub distance_km: f64,

    pub source: DistanceSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &RankedStopList) -> Vec<&str> {
        list.iter().map(|e| e.stop_name.as_str()).collect()
    }

    #[test]
    fn none_sorts_last() {
        let list = RankedStopList::from_estimates(vec![
            DistanceEstimate::approximate("A", None),
            DistanceEstimate::approximate("B", Some(3.0)),
            DistanceEstimate::refined("C", 1.0),
        ]);
        assert_eq!(names(&list), vec!["C", "B", "A"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let list = RankedStopList::from_estimates(vec![
            DistanceEstimate::approximate("A", None),
            DistanceEstimate::approximate("B", Some(2.0)),
            DistanceEstimate::approximate("C", None),
            DistanceEstimate::refined("D", 2.0),
        ]);
        assert_eq!(names(&list), vec!["B", "D", "A", "C"]);
    }

    #[test]
    fn approximate_drops_non_finite() {
        let e = DistanceEstimate::approximate("A", Some(f64::NAN));
        assert_eq!(e.distance_km, None);
        assert_eq!(e.source, DistanceSource::Approximate);
    }

    #[test]
    fn nearest_requires_known_distance() {
        let list = RankedStopList::from_estimates(vec![DistanceEstimate::approximate("A", None)]);
        assert!(list.nearest().is_none());

        let list = RankedStopList::from_estimates(vec![
            DistanceEstimate::approximate("A", None),
            DistanceEstimate::approximate("B", Some(0.4)),
        ]);
        assert_eq!(list.nearest().map(|e| e.stop_name.as_str()), Some("B"));
    }

    #[test]
    fn source_serializes_snake_case() {
        let json = serde_json::to_string(&DistanceSource::Refined).unwrap();
        assert_eq!(json, "\"refined\"");
    }
}
