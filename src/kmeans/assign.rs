//! Assignment step: label every sample with its nearest centroid.

use rayon::prelude::*;

use crate::data_format::{Dataset, DenseDataset};
use crate::distance_measures::nearest_center;
use crate::error::{KMeansError, Result};
use crate::types::{ClusterIndex, FeatureValue};
use crate::utils::WorkerTeam;

/// Overwrite `labels[i]` with the index of the centroid nearest to sample `i`.
///
/// Samples are split into at most one contiguous piece per worker. Each piece
/// reads the centroids and writes its own disjoint slice of `labels`, so no
/// coordination happens inside the step. `centroids` must not change while
/// the step runs, which the borrow guarantees.
pub fn assign_labels<T: FeatureValue>(
    team: &WorkerTeam,
    dataset: &DenseDataset<T>,
    centroids: &DenseDataset<T>,
    dims: usize,
    labels: &mut [ClusterIndex],
) -> Result<()> {
    check_shapes(dataset, centroids, dims, labels.len())?;

    let min_len = team.partition_len(labels.len());
    team.install(|| {
        labels
            .par_iter_mut()
            .zip(dataset.par_rows())
            .with_min_len(min_len)
            .for_each(|(label, sample)| {
                *label = nearest_center(sample, centroids, dims).0;
            });
    });
    Ok(())
}

pub(crate) fn check_shapes<T: FeatureValue>(
    dataset: &DenseDataset<T>,
    centroids: &DenseDataset<T>,
    dims: usize,
    num_labels: usize,
) -> Result<()> {
    if centroids.is_empty() {
        return Err(KMeansError::invalid_argument("Centroid set is empty"));
    }
    if num_labels != dataset.size() {
        return Err(KMeansError::invalid_argument(format!(
            "label array has {} slots for {} samples",
            num_labels,
            dataset.size()
        )));
    }
    if centroids.dimensionality() != dataset.dimensionality() {
        return Err(KMeansError::invalid_argument(format!(
            "centroids have {} features, samples have {}",
            centroids.dimensionality(),
            dataset.dimensionality()
        )));
    }
    if dims == 0 || dims > dataset.dimensionality() {
        return Err(KMeansError::invalid_argument(format!(
            "{} active dimensions for {}-dimensional samples",
            dims,
            dataset.dimensionality()
        )));
    }
    Ok(())
}
