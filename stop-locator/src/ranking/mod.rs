//! Stop ranking and nearest-start assignment.
//!
//! Both operations compute straight-line distances locally and make at most
//! one road-distance request per call. A routing failure never fails the
//! operation; it only leaves straight-line values in place.

mod config;
mod diagnostics;
mod priority;
mod rank;

#[cfg(test)]
mod mock;

pub use config::{DEFAULT_REFINE_CANDIDATES, RankingConfig};
pub use diagnostics::{DiagnosticEvent, DiagnosticKind};
pub use priority::{
    AssignOutcome, AutoAssignment, PriorityStopSelector, Terminus, opposite_terminus,
};
pub use rank::{RankOutcome, StopRanker};
