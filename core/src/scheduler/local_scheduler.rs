//! Local Task Scheduler
//!
//! This module provides a local scheduler that runs partition-local work
//! either sequentially or on a dedicated Rayon thread pool. Results always
//! come back in partition-index order, whichever mode is used.

use kindle_common::{DatasetError, DatasetResult};
use rayon::prelude::*;

/// LocalScheduler runs one closure per partition.
#[derive(Debug)]
pub struct LocalScheduler {
    /// Pool used for partition-parallel work; `None` runs partitions in order
    /// on the calling thread.
    pool: Option<rayon::ThreadPool>,
    num_threads: usize,
}

impl LocalScheduler {
    /// Create a LocalScheduler backed by a pool of `num_threads` threads
    pub fn new(num_threads: usize) -> DatasetResult<Self> {
        if num_threads == 0 {
            return Err(DatasetError::configuration_error(
                "scheduler needs at least one thread",
            ));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|index| format!("kindle-worker-{index}"))
            .build()
            .map_err(|e| {
                DatasetError::configuration_error(format!("Failed to build thread pool: {e}"))
            })?;
        Ok(Self {
            pool: Some(pool),
            num_threads,
        })
    }

    /// Create a LocalScheduler with one thread per CPU core
    pub fn with_default_threads() -> DatasetResult<Self> {
        Self::new(num_cpus::get().max(1))
    }

    /// Create a scheduler that runs every partition on the calling thread
    pub fn sequential() -> Self {
        Self {
            pool: None,
            num_threads: 1,
        }
    }

    /// Get the number of threads
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    /// Apply `f` to every partition and return the results in partition order
    pub fn run_partitions<T, R, F>(&self, partitions: &[Vec<T>], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&[T]) -> R + Send + Sync,
    {
        match &self.pool {
            Some(pool) => pool.install(|| partitions.par_iter().map(|p| f(p.as_slice())).collect()),
            None => partitions.iter().map(|p| f(p.as_slice())).collect(),
        }
    }

    /// Fallible variant of [`run_partitions`](Self::run_partitions).
    ///
    /// Every partition runs to completion; the error reported is the one from
    /// the lowest partition index.
    pub fn try_run_partitions<T, R, F>(&self, partitions: &[Vec<T>], f: F) -> DatasetResult<Vec<R>>
    where
        T: Sync,
        R: Send,
        F: Fn(&[T]) -> DatasetResult<R> + Send + Sync,
    {
        self.run_partitions(partitions, f).into_iter().collect()
    }

    /// Run a side-effecting closure over every element, partition by partition
    pub fn run_foreach<T, F>(&self, partitions: &[Vec<T>], f: F)
    where
        T: Sync,
        F: Fn(&T) + Send + Sync,
    {
        self.run_partitions(partitions, |partition| partition.iter().for_each(&f));
    }
}

impl Default for LocalScheduler {
    fn default() -> Self {
        Self::sequential()
    }
}
