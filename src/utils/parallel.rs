//! Parallel execution utilities.
//!
//! A [`WorkerTeam`] is a fixed-size pool of worker threads created once per
//! clustering run. Every phase of every round executes inside it; a phase
//! returns only after all of its pieces have finished, which is the barrier
//! between phases.

use crate::error::{KMeansError, Result};

/// Maximum number of worker threads this machine offers.
pub fn max_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Check that `requested` lies in `[1, max]`.
pub fn validate_thread_count(requested: usize, max: usize) -> Result<usize> {
    if requested == 0 || requested > max {
        return Err(KMeansError::invalid_argument(format!(
            "thread count must be between 1 and {max}, got {requested}"
        )));
    }
    Ok(requested)
}

/// Fixed-size team of worker threads.
pub struct WorkerTeam {
    pool: rayon::ThreadPool,
    num_threads: usize,
}

impl WorkerTeam {
    /// Build a team of exactly `num_threads` workers.
    pub fn new(num_threads: usize) -> Result<Self> {
        let num_threads = validate_thread_count(num_threads, max_threads())?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("parkmeans-worker-{i}"))
            .build()
            .map_err(|e| {
                KMeansError::resource_exhausted(format!("failed to start worker threads: {e}"))
            })?;
        Ok(Self { pool, num_threads })
    }

    /// Build a team using every available thread.
    pub fn with_all_threads() -> Result<Self> {
        Self::new(max_threads())
    }

    /// Build a team of `num_threads` workers, or every available thread if `None`.
    pub fn from_option(num_threads: Option<usize>) -> Result<Self> {
        match num_threads {
            Some(n) => Self::new(n),
            None => Self::with_all_threads(),
        }
    }

    /// Get the number of threads.
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Minimum piece length so that `len` items split into at most one piece per worker.
    pub fn partition_len(&self, len: usize) -> usize {
        len.div_ceil(self.num_threads).max(1)
    }

    /// Run `op` inside the team. Parallel iterators used by `op` execute on the team's workers.
    ///
    /// Calling this from one of the team's own workers runs `op` in place.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}

impl std::fmt::Debug for WorkerTeam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerTeam")
            .field("num_threads", &self.num_threads)
            .finish()
    }
}
