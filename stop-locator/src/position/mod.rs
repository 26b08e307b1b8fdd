//! User position acquisition.
//!
//! Positions come from a [`PositionSource`]. The HTTP service uses
//! [`ReportedPosition`], wrapping a fix the browser already obtained.

mod error;
mod tracker;

pub use error::PositionError;
pub use tracker::{LocationTracker, PositionFix, PositionOptions, PositionSource, ReportedPosition};
