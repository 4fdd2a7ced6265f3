//! Random sampling utilities.

use rand::prelude::*;
use rand_distr::{Distribution, Normal};

use crate::data_format::DenseDataset;
use crate::error::{KMeansError, Result};

/// Random sampler for selecting indices.
pub struct RandomSampler {
    rng: StdRng,
}

impl RandomSampler {
    /// Create a new sampler with a random seed.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a new sampler with a specific seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded sampler if a seed is given, entropy-seeded otherwise.
    pub fn from_option(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::with_seed(s),
            None => Self::new(),
        }
    }

    /// Draw `k` indices from `[0, n)` independently and uniformly, with replacement.
    pub fn sample_with_replacement(&mut self, n: usize, k: usize) -> Vec<usize> {
        (0..k).map(|_| self.rng.gen_range(0..n)).collect()
    }
}

impl Default for RandomSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate `n` two-or-more dimensional points scattered around `num_blobs` centers.
///
/// Blob centers are drawn uniformly from `[-extent, extent]` per coordinate and
/// points are assigned to blobs round-robin, with Gaussian noise of standard
/// deviation `spread`.
pub fn gaussian_blobs(
    n: usize,
    dims: usize,
    num_blobs: usize,
    spread: f32,
    seed: u64,
) -> Result<DenseDataset<f32>> {
    if num_blobs == 0 {
        return Err(KMeansError::invalid_argument("num_blobs must be > 0"));
    }
    let noise = Normal::new(0.0f32, spread)
        .map_err(|e| KMeansError::invalid_argument(format!("invalid spread {spread}: {e}")))?;

    let extent = 10.0f32 * num_blobs as f32;
    let mut rng = StdRng::seed_from_u64(seed);
    let centers: Vec<Vec<f32>> = (0..num_blobs)
        .map(|_| (0..dims).map(|_| rng.gen_range(-extent..=extent)).collect())
        .collect();

    let mut dataset = DenseDataset::zeros(n, dims)?;
    for i in 0..n {
        let center = &centers[i % num_blobs];
        for (value, &c) in dataset.row_mut(i).iter_mut().zip(center) {
            *value = c + noise.sample(&mut rng);
        }
    }
    Ok(dataset)
}
