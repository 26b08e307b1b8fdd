//! Core domain types.
//!
//! Coordinates, stops, lines and the distance estimates produced by the
//! ranking engine. These are transient values built per user action.

mod coordinate;
mod estimate;
mod stop;

pub use coordinate::{Coordinate, InvalidCoordinate};
pub use estimate::{
    DistanceEstimate, DistanceSource, NearestStop, RankedStopList, compare_distances,
};
pub use stop::{Line, MAX_ANCHORS, Stop};
