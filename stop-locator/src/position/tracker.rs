//! Position sources and the last-known-position tracker.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::Coordinate;

use super::error::PositionError;

/// Options for a single position request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionOptions {
    /// Ask the source for its most accurate fix. Reported positions were
    /// already acquired, so only browser-side acquisition honours this;
    /// the service hands it to clients through `GET /position`.
    pub high_accuracy: bool,
    /// Deadline for the request
    pub timeout: Duration,
    /// Oldest acceptable fix
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(15),
            maximum_age: Duration::from_secs(5 * 60),
        }
    }
}

impl PositionOptions {
    pub fn with_high_accuracy(mut self, high_accuracy: bool) -> Self {
        self.high_accuracy = high_accuracy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_maximum_age(mut self, maximum_age: Duration) -> Self {
        self.maximum_age = maximum_age;
        self
    }
}

/// A position fix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionFix {
    pub coordinate: Coordinate,

    /// Accuracy radius in metres, when the source reports one.
    pub accuracy_m: Option<f64>,

    pub acquired_at: DateTime<Utc>,
}

impl PositionFix {
    /// A fix acquired now.
    pub fn now(coordinate: Coordinate, accuracy_m: Option<f64>) -> Self {
        Self {
            coordinate,
            accuracy_m,
            acquired_at: Utc::now(),
        }
    }

    /// Age of the fix relative to `now`; zero for fixes from the future.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.acquired_at).to_std().unwrap_or(Duration::ZERO)
    }
}

/// Single-shot position provider.
pub trait PositionSource {
    fn current_position(
        &self,
        options: &PositionOptions,
    ) -> impl Future<Output = Result<PositionFix, PositionError>> + Send;
}

/// A fix, or the error, the client already got from its own position
/// provider and reported to the service.
#[derive(Debug, Clone)]
pub struct ReportedPosition {
    report: Result<PositionFix, PositionError>,
}

impl ReportedPosition {
    pub fn new(fix: PositionFix) -> Self {
        Self { report: Ok(fix) }
    }

    /// A failure reported by the client.
    pub fn failed(error: PositionError) -> Self {
        Self { report: Err(error) }
    }
}

impl PositionSource for ReportedPosition {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<PositionFix, PositionError> {
        let fix = self.report.as_ref().map_err(|e| *e)?;
        let age = fix.age(Utc::now());
        if age > options.maximum_age {
            debug!(age_secs = age.as_secs(), "reported fix is too old");
            return Err(PositionError::Unavailable);
        }
        Ok(fix.clone())
    }
}

/// Remembers the last known position and whether location access works.
///
/// One tracker per session; callers needing shared access wrap it in a
/// mutex.
#[derive(Debug, Clone, Default)]
pub struct LocationTracker {
    last: Option<PositionFix>,
    permission_granted: bool,
}

impl LocationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a fix from `source` and remember it.
    ///
    /// A fix with an invalid coordinate is reported as
    /// [`PositionError::Unavailable`]. Any failure clears the permission
    /// flag but keeps the previous position.
    pub async fn locate<S: PositionSource + Sync>(
        &mut self,
        source: &S,
        options: &PositionOptions,
    ) -> Result<PositionFix, PositionError> {
        let result = match tokio::time::timeout(options.timeout, source.current_position(options))
            .await
        {
            Ok(result) => result.and_then(Self::check_fix),
            Err(_) => Err(PositionError::Timeout),
        };

        match result {
            Ok(fix) => {
                info!(
                    coordinate = %fix.coordinate,
                    accuracy_m = fix.accuracy_m,
                    "position acquired"
                );
                self.last = Some(fix.clone());
                self.permission_granted = true;
                Ok(fix)
            }
            Err(err) => {
                warn!(error = %err, code = err.code(), "position request failed");
                self.permission_granted = false;
                Err(err)
            }
        }
    }

    fn check_fix(mut fix: PositionFix) -> Result<PositionFix, PositionError> {
        if !fix.coordinate.is_valid() {
            return Err(PositionError::Unavailable);
        }
        fix.accuracy_m = fix.accuracy_m.filter(|a| a.is_finite() && *a >= 0.0);
        Ok(fix)
    }

    pub fn last_position(&self) -> Option<&PositionFix> {
        self.last.as_ref()
    }

    pub fn is_permission_granted(&self) -> bool {
        self.permission_granted
    }

    /// Forget the position and the permission flag.
    pub fn reset(&mut self) {
        self.last = None;
        self.permission_granted = false;
        debug!("location state reset");
    }
}
