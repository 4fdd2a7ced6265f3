//! Configuration for the clustering core.

use serde::{Deserialize, Serialize};

use crate::distance_measures::ActiveDimensions;
use crate::error::{KMeansError, Result};

/// Default number of clusters.
pub const DEFAULT_NUM_CLUSTERS: usize = 10;

/// Default (and fixed) number of assignment/update rounds.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Configuration for K-means clustering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansConfig {
    /// Number of clusters.
    pub num_clusters: usize,

    /// Number of rounds. Every run executes exactly this many.
    pub max_iterations: usize,

    /// Worker thread count; `None` uses every available thread.
    pub num_threads: Option<usize>,

    /// Random seed for the initial centroids; `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Features taking part in distances and centroid updates.
    pub active_dimensions: ActiveDimensions,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            num_clusters: DEFAULT_NUM_CLUSTERS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            num_threads: None,
            seed: None,
            active_dimensions: ActiveDimensions::All,
        }
    }
}

impl KMeansConfig {
    /// Create a new configuration with the given number of clusters.
    pub fn new(num_clusters: usize) -> Self {
        Self {
            num_clusters,
            ..Default::default()
        }
    }

    /// Set the number of rounds.
    pub fn with_max_iterations(mut self, max_iter: usize) -> Self {
        self.max_iterations = max_iter;
        self
    }

    /// Set the worker thread count.
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the active dimensions.
    pub fn with_active_dimensions(mut self, dims: ActiveDimensions) -> Self {
        self.active_dimensions = dims;
        self
    }

    /// Reject configurations that cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.num_clusters == 0 {
            return Err(KMeansError::invalid_argument("Number of clusters must be > 0"));
        }
        if self.max_iterations == 0 {
            return Err(KMeansError::invalid_argument("Number of iterations must be > 0"));
        }
        Ok(())
    }
}
