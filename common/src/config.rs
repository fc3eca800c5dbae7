//! Configuration for a kindle flow context.
//!
//! Configuration is plain serde data so it can be loaded from JSON or built
//! in code with the `with_*` setters, then checked once with `validate()`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DatasetError, DatasetResult, ErrorContext};

/// How partitions are assigned to simulated worker locations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerPool {
    /// One worker slot per partition: partition `i` lands on `worker{i}`.
    #[default]
    PerPartition,
    /// A fixed pool of workers: partition `i` lands on `worker{i mod size}`.
    Fixed(usize),
}

impl WorkerPool {
    /// Number of worker slots used when placing `num_partitions` partitions.
    pub fn slots(&self, num_partitions: usize) -> usize {
        match self {
            WorkerPool::PerPartition => num_partitions,
            WorkerPool::Fixed(size) => *size,
        }
    }
}

/// Top-level configuration of a flow context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Application name, used in log output.
    pub app_name: String,
    /// Threads for partition-local work. `None` runs partitions sequentially.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_threads: Option<usize>,
    /// Placement policy for every dataset created by the context.
    pub worker_pool: WorkerPool,
    /// Partition count used when a caller does not pick one.
    pub default_partitions: usize,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            app_name: "kindle-app".to_string(),
            num_threads: None,
            worker_pool: WorkerPool::default(),
            default_partitions: num_cpus::get().max(1),
        }
    }
}

impl FlowConfig {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            ..Self::default()
        }
    }

    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    pub fn with_worker_pool(mut self, worker_pool: WorkerPool) -> Self {
        self.worker_pool = worker_pool;
        self
    }

    pub fn with_default_partitions(mut self, default_partitions: usize) -> Self {
        self.default_partitions = default_partitions;
        self
    }

    /// Parse a configuration from a JSON document and validate it.
    pub fn from_json_str(json: &str) -> DatasetResult<Self> {
        let config: FlowConfig = serde_json::from_str(json)
            .with_config_context(|| "Failed to parse flow configuration".to_string())?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_io_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&contents)
    }

    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> DatasetResult<()> {
        if self.num_threads == Some(0) {
            return Err(DatasetError::configuration_error(
                "num_threads must be at least 1 when set",
            ));
        }
        if let WorkerPool::Fixed(0) = self.worker_pool {
            return Err(DatasetError::invalid_partition_count(
                0,
                "worker pool must contain at least one worker",
            ));
        }
        if self.default_partitions == 0 {
            return Err(DatasetError::invalid_partition_count(
                0,
                "default partition count must be positive",
            ));
        }
        Ok(())
    }
}
