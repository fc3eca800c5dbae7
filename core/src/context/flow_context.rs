//! FlowContext - Local execution context for dataset operations
//!
//! This module provides the driver-side context that creates datasets and
//! keeps a registry of every dataset it created.

use crate::loader::{self, TextLines};
use crate::partitioner::Partitioner;
use crate::rdd::Dataset;
use crate::scheduler::LocalScheduler;
use crate::traits::Data;
use kindle_common::{DatasetResult, FlowConfig};
use std::any::Any;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// FlowContext creates datasets and remembers them by creation index.
#[derive(Debug)]
pub struct FlowContext {
    config: FlowConfig,
    partitioner: Partitioner,
    scheduler: Arc<LocalScheduler>,
    datasets: Vec<Arc<dyn Any + Send + Sync>>,
}

impl FlowContext {
    /// Create a FlowContext from a validated configuration
    pub fn new(config: FlowConfig) -> DatasetResult<Self> {
        config.validate()?;
        let partitioner = Partitioner::new(config.worker_pool)?;
        let scheduler = match config.num_threads {
            Some(num_threads) => LocalScheduler::new(num_threads)?,
            None => LocalScheduler::sequential(),
        };
        info!(
            app_name = %config.app_name,
            threads = scheduler.num_threads(),
            parallel = scheduler.is_parallel(),
            worker_pool = ?config.worker_pool,
            "Created flow context"
        );
        Ok(Self {
            config,
            partitioner,
            scheduler: Arc::new(scheduler),
            datasets: Vec::new(),
        })
    }

    /// Create a sequential FlowContext with default settings and the given name
    pub fn with_app_name(app_name: impl Into<String>) -> DatasetResult<Self> {
        Self::new(FlowConfig::new(app_name))
    }

    /// Get the application name
    pub fn app_name(&self) -> &str {
        &self.config.app_name
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Create a dataset from a vector, split into `num_partitions` partitions
    pub fn create_dataset<T: Data>(
        &mut self,
        data: Vec<T>,
        num_partitions: usize,
    ) -> DatasetResult<Arc<Dataset<T>>> {
        let dataset = Dataset::build(
            data,
            num_partitions,
            self.partitioner,
            Arc::clone(&self.scheduler),
        )?;
        Ok(self.register(dataset))
    }

    /// Create a dataset using the configured default partition count
    pub fn parallelize<T: Data>(&mut self, data: Vec<T>) -> DatasetResult<Arc<Dataset<T>>> {
        let num_partitions = self.config.default_partitions;
        self.create_dataset(data, num_partitions)
    }

    /// Create a dataset with no elements
    pub fn empty_dataset<T: Data>(
        &mut self,
        num_partitions: usize,
    ) -> DatasetResult<Arc<Dataset<T>>> {
        self.create_dataset(Vec::new(), num_partitions)
    }

    /// Create a dataset of trimmed text lines, optionally dropping a header line
    /// which is kept on the dataset.
    pub fn create_dataset_from_lines<I, S>(
        &mut self,
        lines: I,
        num_partitions: usize,
        has_header: bool,
    ) -> DatasetResult<Arc<Dataset<String>>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let TextLines { header, lines } = loader::prepare_lines(lines, has_header);
        let dataset = Dataset::build(
            lines,
            num_partitions,
            self.partitioner,
            Arc::clone(&self.scheduler),
        )?
        .with_header(header);
        Ok(self.register(dataset))
    }

    /// Load a text file as a dataset of lines
    pub fn text_file(
        &mut self,
        path: impl AsRef<Path>,
        num_partitions: usize,
        has_header: bool,
    ) -> DatasetResult<Arc<Dataset<String>>> {
        let lines = loader::read_lines(path)?;
        self.create_dataset_from_lines(lines, num_partitions, has_header)
    }

    /// Look up a dataset by creation index.
    ///
    /// Returns `None` if the index is out of range or the dataset does not
    /// hold elements of type `T`.
    pub fn dataset<T: Data>(&self, index: usize) -> Option<Arc<Dataset<T>>> {
        let stored = Arc::clone(self.datasets.get(index)?);
        stored.downcast::<Dataset<T>>().ok()
    }

    /// Number of datasets created through this context
    pub fn dataset_count(&self) -> usize {
        self.datasets.len()
    }

    fn register<T: Data>(&mut self, dataset: Dataset<T>) -> Arc<Dataset<T>> {
        let dataset = Arc::new(dataset);
        info!(
            app_name = %self.config.app_name,
            index = self.datasets.len(),
            dataset = %dataset.id(),
            partitions = dataset.num_partitions(),
            "Registered dataset"
        );
        self.datasets.push(dataset.clone());
        dataset
    }
}
