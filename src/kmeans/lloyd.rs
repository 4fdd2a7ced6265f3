//! Iteration controller for Lloyd's algorithm.
//!
//! A run seeds the centroids once, then alternates the assignment and update
//! steps for a fixed number of rounds. There is no convergence test: labels
//! that stabilise early are simply recomputed until the last round.
//!
//! Each round walks the [`Phase`] sequence
//!
//! ```text
//! AssignPending -> Assigning -> AssignBarrier -> UpdatePending -> Updating -> UpdateBarrier
//! ```
//!
//! and the run ends in [`Phase::Done`] after the last round's `UpdateBarrier`.
//! Both steps run on one [`WorkerTeam`] built for the whole run. A step only
//! returns once every worker has finished its piece, so the barrier states
//! guarantee that assignment always sees a settled centroid set and update
//! always sees a complete label array.

use std::time::Instant;

use log::{debug, info, trace};
use rayon::prelude::*;

use crate::data_format::{Dataset, DenseDataset};
use crate::distance_measures::squared_l2_distance;
use crate::error::{KMeansError, Result};
use crate::kmeans::assign::assign_labels;
use crate::kmeans::config::KMeansConfig;
use crate::kmeans::init::random_centroids;
use crate::kmeans::update::update_centroids;
use crate::types::{ClusterIndex, FeatureValue};
use crate::utils::{RandomSampler, WorkerTeam};

/// Position of the controller within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Round started, assignment not yet running.
    AssignPending,
    /// Workers are labelling samples.
    Assigning,
    /// Every worker has finished assignment.
    AssignBarrier,
    /// Labels complete, update not yet running.
    UpdatePending,
    /// Workers are reducing and publishing centroids.
    Updating,
    /// Every worker has finished the update.
    UpdateBarrier,
    /// All rounds completed.
    Done,
}

/// Round counter plus phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundState {
    round: usize,
    num_rounds: usize,
    phase: Phase,
}

impl RoundState {
    /// Start at round 0, or directly in `Done` if there are no rounds.
    pub fn new(num_rounds: usize) -> Self {
        Self {
            round: 0,
            num_rounds,
            phase: if num_rounds == 0 {
                Phase::Done
            } else {
                Phase::AssignPending
            },
        }
    }

    /// Current round (zero-based).
    pub fn round(&self) -> usize {
        self.round
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the run has finished.
    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Move to the next phase and return it.
    pub fn advance(&mut self) -> Phase {
        self.phase = match self.phase {
            Phase::AssignPending => Phase::Assigning,
            Phase::Assigning => Phase::AssignBarrier,
            Phase::AssignBarrier => Phase::UpdatePending,
            Phase::UpdatePending => Phase::Updating,
            Phase::Updating => Phase::UpdateBarrier,
            Phase::UpdateBarrier if self.round + 1 < self.num_rounds => {
                self.round += 1;
                Phase::AssignPending
            }
            Phase::UpdateBarrier | Phase::Done => Phase::Done,
        };
        self.phase
    }
}

/// K-means clustering result.
#[derive(Debug, Clone)]
pub struct KMeansResult<T: FeatureValue> {
    /// Cluster label of every sample, in sample order.
    pub labels: Vec<ClusterIndex>,

    /// Final centroids, one row per cluster, same width as the samples.
    pub centroids: DenseDataset<T>,

    /// Number of samples carrying each label after the last round.
    pub cluster_sizes: Vec<usize>,

    /// Number of rounds executed.
    pub num_iterations: usize,

    /// Sum of squared distances from each sample to its assigned centroid.
    pub inertia: f64,

    /// Number of leading features that took part in clustering.
    pub active_dimensions: usize,
}

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct KMeans {
    config: KMeansConfig,
}

impl KMeans {
    /// Create a new K-means instance with the given configuration.
    pub fn new(config: KMeansConfig) -> Self {
        Self { config }
    }

    /// Create a K-means instance with the given number of clusters.
    pub fn with_clusters(num_clusters: usize) -> Self {
        Self::new(KMeansConfig::new(num_clusters))
    }

    /// Get the configuration.
    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    /// Cluster `dataset`, seeding centroids from randomly drawn samples.
    pub fn fit<T: FeatureValue>(&self, dataset: &DenseDataset<T>) -> Result<KMeansResult<T>> {
        self.config.validate()?;
        if dataset.is_empty() {
            return Err(KMeansError::invalid_argument("Cannot cluster empty dataset"));
        }

        let mut sampler = RandomSampler::from_option(self.config.seed);
        let initial = random_centroids(dataset, self.config.num_clusters, &mut sampler)?;
        self.fit_from(dataset, initial)
    }

    /// Cluster `dataset` starting from the given centroids.
    ///
    /// `initial` must hold exactly `num_clusters` rows of the samples' width.
    pub fn fit_from<T: FeatureValue>(
        &self,
        dataset: &DenseDataset<T>,
        initial: DenseDataset<T>,
    ) -> Result<KMeansResult<T>> {
        self.config.validate()?;
        if dataset.is_empty() {
            return Err(KMeansError::invalid_argument("Cannot cluster empty dataset"));
        }
        if initial.size() != self.config.num_clusters {
            return Err(KMeansError::invalid_argument(format!(
                "{} initial centroids given for {} clusters",
                initial.size(),
                self.config.num_clusters
            )));
        }
        if initial.dimensionality() != dataset.dimensionality() {
            return Err(KMeansError::invalid_argument(format!(
                "initial centroids have {} features, samples have {}",
                initial.dimensionality(),
                dataset.dimensionality()
            )));
        }

        let dims = self
            .config
            .active_dimensions
            .resolve(dataset.dimensionality())?;
        let team = WorkerTeam::from_option(self.config.num_threads)?;
        self.run(&team, dataset, initial, dims)
    }

    fn run<T: FeatureValue>(
        &self,
        team: &WorkerTeam,
        dataset: &DenseDataset<T>,
        mut centroids: DenseDataset<T>,
        dims: usize,
    ) -> Result<KMeansResult<T>> {
        let n = dataset.size();
        let k = centroids.size();

        let mut labels: Vec<ClusterIndex> = Vec::new();
        labels.try_reserve_exact(n).map_err(|e| {
            KMeansError::resource_exhausted(format!("cannot allocate {n} labels: {e}"))
        })?;
        labels.resize(n, 0);

        let mut cluster_sizes = vec![0usize; k];
        let mut state = RoundState::new(self.config.max_iterations);
        let mut num_iterations = 0;
        let start = Instant::now();

        team.install(|| -> Result<()> {
            while !state.is_done() {
                match state.phase() {
                    Phase::Assigning => {
                        assign_labels(team, dataset, &centroids, dims, &mut labels)?;
                    }
                    Phase::Updating => {
                        cluster_sizes =
                            update_centroids(team, dataset, &labels, &mut centroids, dims)?;
                    }
                    Phase::UpdateBarrier => {
                        num_iterations += 1;
                        debug!(
                            "round {}: {} of {} clusters non-empty",
                            state.round(),
                            cluster_sizes.iter().filter(|&&c| c > 0).count(),
                            k
                        );
                    }
                    Phase::AssignPending
                    | Phase::AssignBarrier
                    | Phase::UpdatePending
                    | Phase::Done => {}
                }
                trace!("round {} leaving {:?}", state.round(), state.phase());
                state.advance();
            }
            Ok(())
        })?;

        let inertia = team.install(|| {
            labels
                .par_iter()
                .zip(dataset.par_rows())
                .map(|(&label, sample)| squared_l2_distance(sample, centroids.row(label), dims))
                .sum::<f64>()
        });

        info!(
            "k-means: {} samples, {} clusters, {} threads, {} rounds in {:.6}s (inertia {:.6})",
            n,
            k,
            team.num_threads(),
            num_iterations,
            start.elapsed().as_secs_f64(),
            inertia
        );

        Ok(KMeansResult {
            labels,
            centroids,
            cluster_sizes,
            num_iterations,
            inertia,
            active_dimensions: dims,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_state_single_round() {
        let mut state = RoundState::new(1);
        let mut phases = vec![state.phase()];
        while !state.is_done() {
            phases.push(state.advance());
        }
        assert_eq!(
            phases,
            vec![
                Phase::AssignPending,
                Phase::Assigning,
                Phase::AssignBarrier,
                Phase::UpdatePending,
                Phase::Updating,
                Phase::UpdateBarrier,
                Phase::Done,
            ]
        );
    }

    #[test]
    fn test_round_state_counts_rounds() {
        let mut state = RoundState::new(3);
        let mut barriers = 0;
        while !state.is_done() {
            if state.phase() == Phase::UpdateBarrier {
                barriers += 1;
            }
            state.advance();
        }
        assert_eq!(barriers, 3);
        assert_eq!(state.round(), 2);
        assert_eq!(state.advance(), Phase::Done);
    }

    #[test]
    fn test_round_state_zero_rounds() {
        assert!(RoundState::new(0).is_done());
    }

    #[test]
    fn test_kmeans_basic() {
        let data = DenseDataset::from_vecs(vec![
            vec![0.0f32, 0.0],
            vec![0.0, 1.0],
            vec![10.0, 10.0],
            vec![10.0, 11.0],
        ])
        .unwrap();
        let initial = DenseDataset::from_vecs(vec![vec![0.0f32, 0.0], vec![10.0, 10.0]]).unwrap();

        let kmeans = KMeans::new(KMeansConfig::new(2).with_max_iterations(1));
        let result = kmeans.fit_from(&data, initial).unwrap();

        assert_eq!(result.labels, vec![0, 0, 1, 1]);
        assert_eq!(result.centroids.row(0), &[0.0, 0.5]);
        assert_eq!(result.centroids.row(1), &[10.0, 10.5]);
        assert_eq!(result.cluster_sizes, vec![2, 2]);
        assert_eq!(result.num_iterations, 1);
        assert!((result.inertia - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_kmeans_runs_fixed_rounds() {
        let data = DenseDataset::from_vecs(vec![vec![1.0f64, 1.0], vec![1.0, 1.0]]).unwrap();
        let result = KMeans::new(KMeansConfig::new(1).with_max_iterations(17))
            .fit(&data)
            .unwrap();
        assert_eq!(result.num_iterations, 17);
    }

    #[test]
    fn test_kmeans_rejects_bad_input() {
        let empty = DenseDataset::<f32>::new();
        assert!(KMeans::with_clusters(2).fit(&empty).is_err());

        let data = DenseDataset::from_vecs(vec![vec![1.0f32, 2.0]]).unwrap();
        assert!(KMeans::with_clusters(0).fit(&data).is_err());

        let wrong_count = DenseDataset::from_vecs(vec![vec![0.0f32, 0.0]]).unwrap();
        assert!(KMeans::with_clusters(2).fit_from(&data, wrong_count).is_err());

        let wrong_width = DenseDataset::from_vecs(vec![vec![0.0f32]]).unwrap();
        assert!(KMeans::with_clusters(1).fit_from(&data, wrong_width).is_err());
    }
}
