//! One-to-many distance computations.

use crate::data_format::{Dataset, DenseDataset};
use crate::distance_measures::one_to_one::squared_l2_distance;
use crate::types::{ClusterIndex, FeatureValue};

/// Find the center nearest to `point` over the first `dims` coordinates.
///
/// Centers are scanned in index order and the running minimum is replaced
/// only on strict improvement, so ties go to the lowest index. Returns the
/// winning index and its squared distance. `centers` must not be empty.
#[inline]
pub fn nearest_center<T: FeatureValue>(
    point: &[T],
    centers: &DenseDataset<T>,
    dims: usize,
) -> (ClusterIndex, f64) {
    debug_assert!(!centers.is_empty());
    let mut best = 0;
    let mut best_dist = squared_l2_distance(point, centers.row(0), dims);

    for (k, center) in centers.rows().enumerate().skip(1) {
        let dist = squared_l2_distance(point, center, dims);
        if dist < best_dist {
            best_dist = dist;
            best = k;
        }
    }

    (best, best_dist)
}
