//! Distance measures for parkmeans.
//!
//! Clustering uses Euclidean geometry restricted to a configurable prefix of
//! the feature vector, the *active dimensions*. With two-column input and the
//! default setting every feature participates.

mod one_to_many;
mod one_to_one;

pub use one_to_many::nearest_center;
pub use one_to_one::{l2_distance, squared_l2_distance};

use crate::error::{KMeansError, Result};
use serde::{Deserialize, Serialize};

/// Which features participate in distance computations and centroid updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActiveDimensions {
    /// Every feature of the dataset.
    #[default]
    All,

    /// Only the first `n` features; the rest are carried but never read.
    Leading(usize),
}

impl ActiveDimensions {
    /// Resolve to a concrete feature count for a dataset with `dimensionality` features.
    pub fn resolve(self, dimensionality: usize) -> Result<usize> {
        match self {
            ActiveDimensions::All if dimensionality == 0 => Err(KMeansError::invalid_argument(
                "dataset has no features to cluster on",
            )),
            ActiveDimensions::All => Ok(dimensionality),
            ActiveDimensions::Leading(0) => Err(KMeansError::invalid_argument(
                "active dimensions must be at least 1",
            )),
            ActiveDimensions::Leading(n) if n > dimensionality => {
                Err(KMeansError::invalid_argument(format!(
                    "{} active dimensions requested but samples only have {}",
                    n, dimensionality
                )))
            }
            ActiveDimensions::Leading(n) => Ok(n),
        }
    }
}

impl std::str::FromStr for ActiveDimensions {
    type Err = KMeansError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(ActiveDimensions::All),
            _ => s.parse::<usize>().map(ActiveDimensions::Leading).map_err(|_| {
                KMeansError::invalid_argument(format!(
                    "active dimensions must be 'all' or a positive integer, got '{s}'"
                ))
            }),
        }
    }
}
