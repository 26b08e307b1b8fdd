//! Line registry error types.

use std::path::PathBuf;

use crate::domain::{InvalidCoordinate, MAX_ANCHORS};

/// Errors from loading or validating line data.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Lines file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Lines file is not valid JSON for the registry format
    #[error("failed to parse line data: {0}")]
    Json(#[from] serde_json::Error),

    /// Two lines share an id
    #[error("duplicate line id {0:?}")]
    DuplicateLine(String),

    /// A stop name appears twice in one line
    #[error("line {line:?} lists stop {stop:?} more than once")]
    DuplicateStop { line: String, stop: String },

    /// More anchors than the selector supports
    #[error("line {line:?} declares {count} anchors (at most {max})", max = MAX_ANCHORS)]
    TooManyAnchors { line: String, count: usize },

    /// Stop coordinate out of range
    #[error("stop {stop:?}: {source}")]
    InvalidCoordinate {
        stop: String,
        #[source]
        source: InvalidCoordinate,
    },
}
