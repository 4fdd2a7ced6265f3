//! # parkmeans - Parallel Lloyd's k-means
//!
//! A multi-threaded implementation of Lloyd's algorithm for clustering a
//! dense numeric sample matrix into `K` groups.
//!
//! ## Overview
//!
//! - **Seeding**: `K` centroids copied from uniformly drawn samples (with replacement)
//! - **Assignment**: every sample labelled with its nearest centroid, split across workers
//! - **Update**: one parallel reduction per round, each centroid written by a single owner
//! - **Fixed rounds**: always exactly `max_iterations` rounds, no early stop
//! - **Active dimensions**: cluster on a leading prefix of the features
//! - **Delimited I/O**: loader for `x,y,...` files and writers for labels and centroids
//!
//! ## Quick Start
//!
//! ```rust
//! use parkmeans::prelude::*;
//!
//! let data = DenseDataset::from_vecs(vec![
//!     vec![0.0f32, 0.0],
//!     vec![0.0, 1.0],
//!     vec![10.0, 10.0],
//!     vec![10.0, 11.0],
//! ])
//! .unwrap();
//! let initial = DenseDataset::from_vecs(vec![vec![0.0f32, 0.0], vec![10.0, 10.0]]).unwrap();
//!
//! let kmeans = KMeans::new(KMeansConfig::new(2).with_num_threads(1));
//! let result = kmeans.fit_from(&data, initial).unwrap();
//!
//! assert_eq!(result.labels, vec![0, 0, 1, 1]);
//! assert_eq!(result.centroids.row(1), &[10.0, 10.5]);
//! ```
//!
//! ## Running a job
//!
//! ```rust,no_run
//! use parkmeans::prelude::*;
//! use parkmeans::data_format::{load_dataset, save_centroids, save_labels};
//!
//! let config = RunConfig::default();
//! let data: DenseDataset<f64> = load_dataset(&config.input, config.delimiter)?;
//! let result = KMeans::new(config.kmeans.clone()).fit(&data)?;
//! save_labels(&config.labels_output, &result.labels)?;
//! save_centroids(
//!     &config.centers_output,
//!     &result.centroids,
//!     result.active_dimensions,
//!     config.delimiter,
//! )?;
//! # Ok::<(), parkmeans::KMeansError>(())
//! ```
//!
//! ## Module Overview
//!
//! - [`data_format`]: Sample matrix, delimited loader and result writers
//! - [`distance_measures`]: Euclidean distance and nearest-centroid search
//! - [`kmeans`]: Seeding, assignment, update and the round controller
//! - [`utils`]: Worker team and random sampling

pub mod data_format;
pub mod distance_measures;
pub mod kmeans;
pub mod utils;

mod config;
mod error;
mod types;

pub use config::{
    RunConfig, DEFAULT_ACTIVE_DIMENSIONS, DEFAULT_CENTERS_OUTPUT, DEFAULT_INPUT,
    DEFAULT_LABELS_OUTPUT,
};
pub use error::{ErrorCode, KMeansError, Result, EXIT_FAILURE, EXIT_IO_FAILURE};
pub use types::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::RunConfig;
    pub use crate::data_format::{Dataset, DenseDataset};
    pub use crate::distance_measures::ActiveDimensions;
    pub use crate::error::{ErrorCode, KMeansError, Result};
    pub use crate::kmeans::{KMeans, KMeansConfig, KMeansResult};
    pub use crate::types::*;
    pub use crate::utils::WorkerTeam;
}
