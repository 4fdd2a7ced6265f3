//! Update step: move every non-empty cluster's centroid to the mean of its members.
//!
//! The samples are scanned once. Each worker's piece folds into its own
//! [`ClusterSums`], the partial sums are merged pairwise, and each centroid
//! row is then written by exactly one task. Total cost is `O(N + K * P)` for
//! `P` workers and needs no lock.

use rayon::prelude::*;

use crate::data_format::{allocate, DenseDataset};
use crate::error::{KMeansError, Result};
use crate::kmeans::assign::check_shapes;
use crate::types::{ClusterIndex, FeatureValue};
use crate::utils::WorkerTeam;

/// Per-cluster coordinate sums and member counts.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSums {
    /// `num_clusters * dims` sums, row-major by cluster.
    sums: Vec<f64>,
    counts: Vec<usize>,
    dims: usize,
}

impl ClusterSums {
    /// Empty accumulator for `num_clusters` clusters over `dims` coordinates.
    ///
    /// Fails with `ResourceExhausted` when the sums cannot be allocated.
    pub fn zeros(num_clusters: usize, dims: usize) -> Result<Self> {
        let sums = allocate::<f64>(num_clusters, dims)?;
        let mut counts = Vec::new();
        counts.try_reserve_exact(num_clusters).map_err(|e| {
            KMeansError::resource_exhausted(format!(
                "cannot allocate counts for {num_clusters} clusters: {e}"
            ))
        })?;
        counts.resize(num_clusters, 0);
        Ok(Self { sums, counts, dims })
    }

    /// Add the first `dims` coordinates of `sample` to cluster `label`.
    #[inline]
    pub fn add<T: FeatureValue>(&mut self, label: ClusterIndex, sample: &[T]) {
        let offset = label * self.dims;
        for (sum, value) in self.sums[offset..offset + self.dims]
            .iter_mut()
            .zip(sample)
        {
            *sum += value.as_f64();
        }
        self.counts[label] += 1;
    }

    /// Combine two partial accumulators.
    pub fn merge(mut self, other: Self) -> Self {
        for (a, b) in self.sums.iter_mut().zip(&other.sums) {
            *a += b;
        }
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += b;
        }
        self
    }

    /// Number of clusters tracked.
    pub fn num_clusters(&self) -> usize {
        self.counts.len()
    }

    /// Member count per cluster.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Coordinate sums of cluster `k`.
    pub fn sums(&self, k: ClusterIndex) -> &[f64] {
        &self.sums[k * self.dims..(k + 1) * self.dims]
    }

    /// Mean of cluster `k`, or `None` if it has no members.
    pub fn mean(&self, k: ClusterIndex) -> Option<impl Iterator<Item = f64> + '_> {
        let count = self.counts[k];
        (count > 0).then(|| self.sums(k).iter().map(move |&s| s / count as f64))
    }
}

/// Accumulate per-cluster sums of the first `dims` coordinates under the current labels.
pub fn accumulate<T: FeatureValue>(
    team: &WorkerTeam,
    dataset: &DenseDataset<T>,
    labels: &[ClusterIndex],
    num_clusters: usize,
    dims: usize,
) -> Result<ClusterSums> {
    let empty = ClusterSums::zeros(num_clusters, dims)?;
    let min_len = team.partition_len(labels.len());
    Ok(team.install(|| {
        labels
            .par_iter()
            .zip(dataset.par_rows())
            .with_min_len(min_len)
            .fold(
                || empty.clone(),
                |mut acc, (&label, sample)| {
                    acc.add(label, sample);
                    acc
                },
            )
            .reduce(|| empty.clone(), ClusterSums::merge)
    }))
}

/// Recompute centroids from the current labels.
///
/// A centroid whose cluster received at least one sample becomes the mean of
/// those samples over the first `dims` coordinates; its remaining coordinates
/// and every empty cluster's centroid are left untouched. Returns the member
/// count of each cluster.
pub fn update_centroids<T: FeatureValue>(
    team: &WorkerTeam,
    dataset: &DenseDataset<T>,
    labels: &[ClusterIndex],
    centroids: &mut DenseDataset<T>,
    dims: usize,
) -> Result<Vec<usize>> {
    check_shapes(dataset, centroids, dims, labels.len())?;

    let num_clusters = centroids.rows().len();
    if let Some(&label) = labels.iter().find(|&&l| l >= num_clusters) {
        return Err(KMeansError::invalid_argument(format!(
            "label {} out of range for {} clusters",
            label, num_clusters
        )));
    }
    let sums = accumulate(team, dataset, labels, num_clusters, dims)?;

    team.install(|| {
        centroids
            .par_rows_mut()
            .enumerate()
            .for_each(|(k, centroid)| {
                if let Some(mean) = sums.mean(k) {
                    for (value, m) in centroid.iter_mut().zip(mean) {
                        *value = T::from_f64(m);
                    }
                }
            });
    });

    Ok(sums.counts().to_vec())
}
