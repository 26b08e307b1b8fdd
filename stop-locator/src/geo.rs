//! Great-circle distance.
//!
//! The straight-line metric used to pre-rank every stop before the
//! expensive road-distance refinement.

use crate::domain::Coordinate;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinates, in kilometres.
///
/// Pure and deterministic. Malformed input (NaN components) yields NaN
/// rather than an error; callers must discard non-finite results.
///
/// # Examples
///
/// ```
/// use stop_locator::domain::Coordinate;
/// use stop_locator::geo::distance_km;
///
/// let udine = Coordinate::new(46.0625, 13.2354);
/// let grado = Coordinate::new(45.7667, 13.4833);
/// let d = distance_km(udine, grado);
/// assert!(d > 34.0 && d < 36.0);
/// ```
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}
