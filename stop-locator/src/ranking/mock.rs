//! Scripted road-distance source for ranking tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::Coordinate;
use crate::routing::RoadDistances;

type Responder = Box<dyn Fn(&[Coordinate]) -> Option<Vec<Option<f64>>> + Send + Sync>;

/// Road-distance source answering from a closure and recording each batch.
pub struct MockDistances {
    respond: Responder,
    calls: AtomicUsize,
    batches: Mutex<Vec<Vec<Coordinate>>>,
}

impl MockDistances {
    pub fn new(
        respond: impl Fn(&[Coordinate]) -> Option<Vec<Option<f64>>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            calls: AtomicUsize::new(0),
            batches: Mutex::new(Vec::new()),
        }
    }

    /// Service that is down for every call.
    pub fn unavailable() -> Self {
        Self::new(|_| None)
    }

    /// Service that answers every destination with the given distance.
    pub fn constant(km: f64) -> Self {
        Self::new(move |d| Some(vec![Some(km); d.len()]))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn batches(&self) -> Vec<Vec<Coordinate>> {
        self.batches.lock().unwrap().clone()
    }
}

impl RoadDistances for MockDistances {
    async fn fetch_distances(
        &self,
        _origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Option<Vec<Option<f64>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batches.lock().unwrap().push(destinations.to_vec());
        (self.respond)(destinations)
    }
}
