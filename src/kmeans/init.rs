//! Centroid initialization.

use log::trace;

use crate::data_format::{Dataset, DenseDataset};
use crate::error::{KMeansError, Result};
use crate::types::FeatureValue;
use crate::utils::RandomSampler;

/// Seed `k` centroids by copying uniformly drawn rows of `dataset`.
///
/// Rows are drawn independently and with replacement, so two centroids may
/// start on the same sample, and `k > n` is allowed.
pub fn random_centroids<T: FeatureValue>(
    dataset: &DenseDataset<T>,
    k: usize,
    sampler: &mut RandomSampler,
) -> Result<DenseDataset<T>> {
    if dataset.is_empty() {
        return Err(KMeansError::invalid_argument("Cannot seed centroids from an empty dataset"));
    }
    if k == 0 {
        return Err(KMeansError::invalid_argument("Number of clusters must be > 0"));
    }

    let mut centroids = DenseDataset::zeros(k, dataset.dimensionality())?;
    for (slot, idx) in sampler
        .sample_with_replacement(dataset.size(), k)
        .into_iter()
        .enumerate()
    {
        trace!("centroid {} seeded from sample {}", slot, idx);
        centroids.row_mut(slot).copy_from_slice(dataset.row(idx));
    }
    Ok(centroids)
}
