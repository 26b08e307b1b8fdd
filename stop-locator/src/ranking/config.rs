//! Ranking configuration.

/// Default number of nearest stops sent for road-distance refinement.
pub const DEFAULT_REFINE_CANDIDATES: usize = 15;

/// Configuration for stop ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingConfig {
    /// How many of the straight-line nearest stops get a road distance.
    /// Stops past this are ranked on straight-line distance only.
    pub refine_candidates: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            refine_candidates: DEFAULT_REFINE_CANDIDATES,
        }
    }
}

impl RankingConfig {
    /// Set the refinement candidate count.
    pub fn with_refine_candidates(mut self, k: usize) -> Self {
        self.refine_candidates = k;
        self
    }
}
