//! One-to-one distance computations.

use crate::types::FeatureValue;

/// Squared Euclidean distance over the first `dims` coordinates, accumulated in f64.
#[inline]
pub fn squared_l2_distance<T: FeatureValue>(a: &[T], b: &[T], dims: usize) -> f64 {
    debug_assert!(dims <= a.len() && dims <= b.len());
    let mut sum = 0.0f64;
    for i in 0..dims {
        let d = a[i].as_f64() - b[i].as_f64();
        sum += d * d;
    }
    sum
}

/// Euclidean distance over the first `dims` coordinates.
#[inline]
pub fn l2_distance<T: FeatureValue>(a: &[T], b: &[T], dims: usize) -> f64 {
    squared_l2_distance(a, b, dims).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squared_l2() {
        let a = [0.0f32, 0.0, 100.0];
        let b = [3.0f32, 4.0, -100.0];
        assert_eq!(squared_l2_distance(&a, &b, 2), 25.0);
        assert_eq!(l2_distance(&a, &b, 2), 5.0);
    }

    #[test]
    fn test_inactive_dimensions_ignored() {
        let a = [1.0f64, 2.0, 3.0];
        let b = [1.0f64, 2.0, 1000.0];
        assert_eq!(squared_l2_distance(&a, &b, 2), 0.0);
        assert!(squared_l2_distance(&a, &b, 3) > 0.0);
    }
}
