//! The partitioned dataset type
//!
//! A `Dataset` owns its partitions and their placement. It is never mutated
//! after construction: transformations build a new dataset, re-partitioned
//! with the same partition count and placement policy.

use crate::partitioner::{PartitionedData, Partitioner, PlacementMap};
use crate::scheduler::LocalScheduler;
use crate::traits::Data;
use kindle_common::{DatasetResult, WorkerPool};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier of a dataset, used in log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetId(Uuid);

impl DatasetId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Iterator over a dataset's elements in flattened order.
pub type Iter<'a, T> = std::iter::Flatten<std::slice::Iter<'a, Vec<T>>>;

/// An immutable collection of elements split into ordered partitions.
pub struct Dataset<T: Data> {
    pub(crate) id: DatasetId,
    pub(crate) partitions: Vec<Vec<T>>,
    pub(crate) placement: PlacementMap,
    pub(crate) num_partitions: NonZeroUsize,
    pub(crate) header: Option<String>,
    pub(crate) partitioner: Partitioner,
    pub(crate) scheduler: Arc<LocalScheduler>,
}

impl<T: Data> fmt::Debug for Dataset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dataset")
            .field("id", &self.id)
            .field("num_partitions", &self.num_partitions)
            .field("partition_sizes", &self.partition_sizes())
            .field("placement", &self.placement)
            .field("header", &self.header)
            .finish()
    }
}

/// Serializable description of a dataset's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub id: String,
    pub num_partitions: usize,
    pub count: usize,
    pub partition_sizes: Vec<usize>,
    pub placement: Vec<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
}

impl<T: Data> Dataset<T> {
    /// Create a dataset with per-partition placement and sequential execution.
    pub fn from_vec(data: Vec<T>, num_partitions: usize) -> DatasetResult<Self> {
        Self::build(
            data,
            num_partitions,
            Partitioner::default(),
            Arc::new(LocalScheduler::sequential()),
        )
    }

    pub(crate) fn build(
        data: Vec<T>,
        num_partitions: usize,
        partitioner: Partitioner,
        scheduler: Arc<LocalScheduler>,
    ) -> DatasetResult<Self> {
        let parted = partitioner.partition(data, num_partitions)?;
        Ok(Self::assemble(parted, partitioner, scheduler, None))
    }

    fn assemble(
        parted: PartitionedData<T>,
        partitioner: Partitioner,
        scheduler: Arc<LocalScheduler>,
        header: Option<String>,
    ) -> Self {
        let PartitionedData {
            partitions,
            placement,
        } = parted;
        // `partition` and `coalesce` never produce zero partitions.
        let num_partitions = NonZeroUsize::new(partitions.len()).unwrap_or(NonZeroUsize::MIN);
        Self {
            id: DatasetId::new(),
            partitions,
            placement,
            num_partitions,
            header,
            partitioner,
            scheduler,
        }
    }

    /// Re-partition `data` into a new dataset that inherits this dataset's
    /// partition count, placement policy, scheduler and header.
    pub(crate) fn derive<U: Data>(&self, data: Vec<U>) -> Dataset<U> {
        let parted = self.partitioner.split(data, self.num_partitions);
        Dataset::assemble(
            parted,
            self.partitioner,
            Arc::clone(&self.scheduler),
            self.header.clone(),
        )
    }

    /// Build a dataset from already-formed partitions, keeping their boundaries.
    pub(crate) fn derive_partitioned(&self, parted: PartitionedData<T>) -> Dataset<T> {
        Dataset::assemble(
            parted,
            self.partitioner,
            Arc::clone(&self.scheduler),
            self.header.clone(),
        )
    }

    pub(crate) fn with_header(mut self, header: Option<String>) -> Self {
        self.header = header;
        self
    }

    pub fn id(&self) -> DatasetId {
        self.id
    }

    /// Get the number of partitions
    pub fn num_partitions(&self) -> usize {
        self.num_partitions.get()
    }

    pub fn partitions(&self) -> &[Vec<T>] {
        &self.partitions
    }

    /// Elements of one partition, or `None` if `index` is out of range.
    pub fn partition(&self, index: usize) -> Option<&[T]> {
        self.partitions.get(index).map(Vec::as_slice)
    }

    pub fn placement(&self) -> &PlacementMap {
        &self.placement
    }

    pub fn partition_sizes(&self) -> Vec<usize> {
        self.partitions.iter().map(Vec::len).collect()
    }

    /// Header line stripped during text loading, if any.
    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn worker_pool(&self) -> WorkerPool {
        self.partitioner.worker_pool()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.iter().all(Vec::is_empty)
    }

    /// Iterate over every element in flattened order: partition index first,
    /// then position within the partition. Cheap to call repeatedly.
    pub fn iter(&self) -> Iter<'_, T> {
        self.partitions.iter().flatten()
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            id: self.id.to_string(),
            num_partitions: self.num_partitions(),
            count: self.iter().count(),
            partition_sizes: self.partition_sizes(),
            placement: self.placement.labels(),
            header: self.header.clone(),
        }
    }
}

impl<'a, T: Data> IntoIterator for &'a Dataset<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
