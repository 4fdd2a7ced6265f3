//! Data format types for parkmeans.
//!
//! This module provides the sample matrix shared by the clustering core and
//! the delimited-text loader and writers around it.

mod dataset;
mod delimited;

pub(crate) use dataset::allocate;
pub use dataset::{Dataset, DenseDataset};
pub use delimited::{
    load_dataset, read_dataset, save_centroids, save_labels, write_centroids, write_labels,
    ResultFiles, DEFAULT_DELIMITER,
};
