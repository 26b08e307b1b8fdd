//! Diagnostic events attached to ranking outcomes.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which operation produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Full stop-list ranking.
    Ranking,
    /// Anchor selection for nearest-start assignment.
    NearestStart,
}

/// A structured note for a debug surface. Never affects results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticEvent {
    pub kind: DiagnosticKind,
    pub title: String,
    pub data: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

impl DiagnosticEvent {
    /// Create an event stamped with the current time.
    pub fn new(kind: DiagnosticKind, title: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            kind,
            title: title.into(),
            data,
            recorded_at: Utc::now(),
        }
    }
}
