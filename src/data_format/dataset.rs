//! Dataset types for parkmeans.
//!
//! Samples and centroids share one storage type: a row-major matrix held in a
//! single contiguous allocation, with an explicit stride between rows.

use crate::error::{KMeansError, Result};
use crate::types::{FeatureValue, SampleIndex};
use rayon::prelude::*;

/// Trait for dataset types.
pub trait Dataset<T: FeatureValue>: Send + Sync {
    /// Get the number of rows in the dataset.
    fn size(&self) -> usize;

    /// Check if the dataset is empty.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Get the number of features per row.
    fn dimensionality(&self) -> usize;

    /// Get a row by index.
    fn get(&self, index: SampleIndex) -> Option<&[T]>;
}

/// A dense dataset storing rows in contiguous memory.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseDataset<T: FeatureValue> {
    /// Contiguous storage for all values, `num_points * stride` long.
    data: Vec<T>,

    /// Number of rows.
    num_points: usize,

    /// Number of features per row.
    dimensionality: usize,

    /// Distance between the starts of consecutive rows.
    stride: usize,
}

/// Allocate `rows * dims` zeroed values in one block, reporting failure instead of aborting.
pub(crate) fn allocate<T: FeatureValue>(rows: usize, dims: usize) -> Result<Vec<T>> {
    let len = rows.checked_mul(dims).ok_or_else(|| {
        KMeansError::resource_exhausted(format!("matrix of {rows} x {dims} values overflows usize"))
    })?;
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|e| {
        KMeansError::resource_exhausted(format!("cannot allocate {rows} x {dims} matrix: {e}"))
    })?;
    data.resize(len, T::zero());
    Ok(data)
}

impl<T: FeatureValue> DenseDataset<T> {
    /// Create an empty dense dataset.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            num_points: 0,
            dimensionality: 0,
            stride: 0,
        }
    }

    /// Create a zero-filled dataset with the given shape.
    pub fn zeros(rows: usize, dimensionality: usize) -> Result<Self> {
        if dimensionality == 0 {
            return Err(KMeansError::invalid_argument("Dimensionality cannot be 0"));
        }
        Ok(Self {
            data: allocate(rows, dimensionality)?,
            num_points: rows,
            dimensionality,
            stride: dimensionality,
        })
    }

    /// Create a dense dataset from a vector of rows.
    ///
    /// Every row must have the same, non-zero length.
    pub fn from_vecs(vecs: Vec<Vec<T>>) -> Result<Self> {
        if vecs.is_empty() {
            return Ok(Self::new());
        }

        let dimensionality = vecs[0].len();
        let mut dataset = Self::zeros(vecs.len(), dimensionality)?;

        for (i, row) in vecs.iter().enumerate() {
            if row.len() != dimensionality {
                return Err(KMeansError::invalid_argument(format!(
                    "Row {} has {} features, expected {}",
                    i,
                    row.len(),
                    dimensionality
                )));
            }
            dataset.row_mut(i).copy_from_slice(row);
        }

        Ok(dataset)
    }

    /// Create a dense dataset from a flat row-major array.
    pub fn from_flat(data: Vec<T>, dimensionality: usize) -> Result<Self> {
        if dimensionality == 0 {
            return Err(KMeansError::invalid_argument("Dimensionality cannot be 0"));
        }
        if data.len() % dimensionality != 0 {
            return Err(KMeansError::invalid_argument(
                "Data length must be a multiple of dimensionality",
            ));
        }

        Ok(Self {
            num_points: data.len() / dimensionality,
            data,
            dimensionality,
            stride: dimensionality,
        })
    }

    /// Get the stride between rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Get a row, panicking if out of bounds.
    #[inline]
    pub fn row(&self, index: SampleIndex) -> &[T] {
        let offset = index * self.stride;
        &self.data[offset..offset + self.dimensionality]
    }

    /// Get a mutable row, panicking if out of bounds.
    #[inline]
    pub fn row_mut(&mut self, index: SampleIndex) -> &mut [T] {
        let offset = index * self.stride;
        &mut self.data[offset..offset + self.dimensionality]
    }

    /// Iterate over the rows in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        let dim = self.dimensionality;
        // `max(1)` keeps chunking valid for the empty dataset.
        self.data
            .chunks_exact(self.stride.max(1))
            .map(move |row| &row[..dim])
    }

    /// Parallel iterator over the rows, in index order.
    pub fn par_rows(&self) -> impl IndexedParallelIterator<Item = &[T]> + '_ {
        let dim = self.dimensionality;
        self.data
            .par_chunks_exact(self.stride.max(1))
            .map(move |row| &row[..dim])
    }

    /// Parallel iterator over mutable rows, in index order.
    pub fn par_rows_mut(&mut self) -> impl IndexedParallelIterator<Item = &mut [T]> + '_ {
        let dim = self.dimensionality;
        self.data
            .par_chunks_exact_mut(self.stride.max(1))
            .map(move |row| &mut row[..dim])
    }

    /// Get raw access to the underlying data.
    pub fn raw_data(&self) -> &[T] {
        &self.data
    }

    /// Copy the rows out as nested vectors.
    pub fn to_vecs(&self) -> Vec<Vec<T>> {
        self.rows().map(|row| row.to_vec()).collect()
    }
}

impl<T: FeatureValue> Dataset<T> for DenseDataset<T> {
    fn size(&self) -> usize {
        self.num_points
    }

    fn dimensionality(&self) -> usize {
        self.dimensionality
    }

    fn get(&self, index: SampleIndex) -> Option<&[T]> {
        if index >= self.num_points {
            return None;
        }
        Some(self.row(index))
    }
}

impl<T: FeatureValue> Default for DenseDataset<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_dataset_from_vecs() {
        let data = vec![
            vec![1.0f32, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
            vec![7.0, 8.0, 9.0],
        ];
        let dataset = DenseDataset::from_vecs(data).unwrap();

        assert_eq!(dataset.size(), 3);
        assert_eq!(dataset.dimensionality(), 3);
        assert_eq!(dataset.stride(), 3);
        assert_eq!(dataset.row(0), &[1.0, 2.0, 3.0]);
        assert_eq!(dataset.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(dataset.raw_data().len(), 9);
    }

    #[test]
    fn test_dense_dataset_from_flat() {
        let data = vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0];
        let dataset = DenseDataset::from_flat(data, 3).unwrap();

        assert_eq!(dataset.size(), 2);
        assert_eq!(dataset.dimensionality(), 3);
        assert_eq!(dataset.get(1).unwrap(), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_dense_dataset_rejects_ragged_rows() {
        let result = DenseDataset::from_vecs(vec![vec![1.0f32, 2.0], vec![3.0]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_dense_dataset_rejects_bad_flat_length() {
        assert!(DenseDataset::from_flat(vec![1.0f32, 2.0, 3.0], 2).is_err());
        assert!(DenseDataset::<f32>::from_flat(vec![], 0).is_err());
    }

    #[test]
    fn test_dense_dataset_row_mut() {
        let mut dataset = DenseDataset::<f32>::zeros(2, 2).unwrap();
        dataset.row_mut(1).copy_from_slice(&[3.0, 4.0]);
        assert_eq!(dataset.to_vecs(), vec![vec![0.0, 0.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn test_dense_dataset_rows_iterators() {
        let mut dataset =
            DenseDataset::from_vecs(vec![vec![1.0f32, 1.0], vec![2.0, 2.0], vec![3.0, 3.0]])
                .unwrap();
        assert_eq!(dataset.rows().len(), 3);

        let sums: Vec<f32> = dataset.par_rows().map(|r| r[0] + r[1]).collect();
        assert_eq!(sums, vec![2.0, 4.0, 6.0]);

        dataset.par_rows_mut().for_each(|r| r[1] = 0.0);
        assert_eq!(dataset.row(2), &[3.0, 0.0]);
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = DenseDataset::<f32>::from_vecs(Vec::new()).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.rows().count(), 0);
        assert!(dataset.get(0).is_none());
    }

    #[test]
    fn test_dataset_out_of_bounds() {
        let dataset = DenseDataset::from_vecs(vec![vec![1.0f32, 2.0]]).unwrap();
        assert!(dataset.get(0).is_some());
        assert!(dataset.get(1).is_none());
    }

    #[test]
    fn test_zeros_overflow_is_resource_error() {
        let err = DenseDataset::<f32>::zeros(usize::MAX, 2).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::ResourceExhausted);
    }
}
