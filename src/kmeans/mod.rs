//! Parallel Lloyd's k-means.
//!
//! This module provides centroid seeding, the assignment and update steps,
//! and the controller that runs them for a fixed number of rounds.

mod assign;
mod config;
mod init;
mod lloyd;
mod update;

pub use assign::assign_labels;
pub use config::{KMeansConfig, DEFAULT_MAX_ITERATIONS, DEFAULT_NUM_CLUSTERS};
pub use init::random_centroids;
pub use lloyd::{KMeans, KMeansResult, Phase, RoundState};
pub use update::{accumulate, update_centroids, ClusterSums};
