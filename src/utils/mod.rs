//! Utility functions and types for parkmeans.

pub(crate) mod parallel;
pub(crate) mod random;

pub use parallel::{max_threads, validate_thread_count, WorkerTeam};
pub use random::{gaussian_blobs, RandomSampler};
