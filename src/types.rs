//! Core type definitions for parkmeans.
//!
//! This module contains the index aliases and the numeric trait shared by
//! samples and centroids.

use std::fmt::Debug;
use num_traits::Float;

/// Index of a sample (row) in a dataset.
pub type SampleIndex = usize;

/// Index of a cluster; also the type of a label.
pub type ClusterIndex = usize;

/// Trait for floating-point types that can be stored as sample features.
///
/// Reductions are always carried out in `f64`, so implementors only need a
/// lossless widening and a (possibly rounding) narrowing conversion.
pub trait FeatureValue: Float + Default + Debug + Send + Sync + 'static {
    /// Widen to f64 for distance and mean computations.
    fn as_f64(self) -> f64;

    /// Narrow from f64 after a reduction.
    fn from_f64(v: f64) -> Self;
}

impl FeatureValue for f32 {
    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

impl FeatureValue for f64 {
    #[inline]
    fn as_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_value_f32() {
        let v: f32 = 0.5;
        assert_eq!(v.as_f64(), 0.5);
        assert_eq!(<f32 as FeatureValue>::from_f64(2.25), 2.25f32);
    }

    #[test]
    fn test_feature_value_f64() {
        let v: f64 = 3.125;
        assert_eq!(v.as_f64(), 3.125);
        assert_eq!(<f64 as FeatureValue>::from_f64(-1.5), -1.5);
    }
}
