//! Splits a sequence into ordered partitions and places them on workers.
//!
//! The split policy is "remainder-last": with `L` elements and `N` partitions
//! the first `N - 1` partitions get `L / N` contiguous elements each and the
//! final partition gets everything that is left. It may therefore be larger
//! than the others, or the only non-empty one when `L < N`. Callers that want
//! balanced partitions should pick an `N` that divides `L`.

use kindle_common::{DatasetError, DatasetResult, WorkerPool};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::ops::Range;

/// A simulated worker location. Displays as `worker{n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkerId(pub usize);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker{}", self.0)
    }
}

/// Partition index -> worker location.
///
/// Holds exactly one entry per partition. An entry is `None` only when the
/// partition was produced by merging partitions that lived on different
/// workers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementMap {
    locations: Vec<Option<WorkerId>>,
}

impl PlacementMap {
    /// Place `num_partitions` partitions round-robin over `slots` workers.
    fn round_robin(num_partitions: usize, slots: NonZeroUsize) -> Self {
        let locations = (0..num_partitions)
            .map(|index| Some(WorkerId(index % slots.get())))
            .collect();
        Self { locations }
    }

    /// Placement of partitions formed by merging each range of `groups`.
    ///
    /// A merged partition keeps its constituents' worker when they all agree.
    pub(crate) fn merge(&self, groups: &[Range<usize>]) -> Self {
        let locations = groups
            .iter()
            .map(|group| {
                let mut members = self.locations[group.clone()].iter();
                let first = members.next().copied().flatten();
                if members.all(|location| *location == first) {
                    first
                } else {
                    None
                }
            })
            .collect();
        Self { locations }
    }

    /// Number of partitions covered by this map.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Worker assigned to `partition`, or `None` if unassigned or out of range.
    pub fn get(&self, partition: usize) -> Option<WorkerId> {
        self.locations.get(partition).copied().flatten()
    }

    /// Whether `partition` has an entry in this map, assigned or not.
    pub fn contains_partition(&self, partition: usize) -> bool {
        partition < self.locations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<WorkerId>)> + '_ {
        self.locations.iter().copied().enumerate()
    }

    /// Location labels in partition order, `None` for unassigned partitions.
    pub fn labels(&self) -> Vec<Option<String>> {
        self.locations
            .iter()
            .map(|location| location.map(|worker| worker.to_string()))
            .collect()
    }
}

/// Output of [`Partitioner::partition`].
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionedData<T> {
    pub partitions: Vec<Vec<T>>,
    pub placement: PlacementMap,
}

/// Splits `len` positions into `num_partitions` contiguous ranges using the
/// remainder-last policy.
pub fn split_ranges(len: usize, num_partitions: NonZeroUsize) -> Vec<Range<usize>> {
    let n = num_partitions.get();
    let base = len / n;
    (0..n)
        .map(|i| {
            let start = i * base;
            let end = if i == n - 1 { len } else { start + base };
            start..end
        })
        .collect()
}

/// Stateless splitter holding only the placement policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Partitioner {
    worker_pool: WorkerPool,
}

impl Partitioner {
    pub fn new(worker_pool: WorkerPool) -> DatasetResult<Self> {
        if let WorkerPool::Fixed(0) = worker_pool {
            return Err(DatasetError::invalid_partition_count(
                0,
                "worker pool must contain at least one worker",
            ));
        }
        Ok(Self { worker_pool })
    }

    pub fn worker_pool(&self) -> WorkerPool {
        self.worker_pool
    }

    /// Split `data` into `num_partitions` ordered partitions and place them.
    pub fn partition<T>(
        &self,
        data: Vec<T>,
        num_partitions: usize,
    ) -> DatasetResult<PartitionedData<T>> {
        let num_partitions = NonZeroUsize::new(num_partitions).ok_or_else(|| {
            DatasetError::invalid_partition_count(0, "a dataset needs at least one partition")
        })?;
        Ok(self.split(data, num_partitions))
    }

    pub(crate) fn split<T>(
        &self,
        data: Vec<T>,
        num_partitions: NonZeroUsize,
    ) -> PartitionedData<T> {
        let ranges = split_ranges(data.len(), num_partitions);
        let mut elements = data.into_iter();
        let partitions = ranges
            .iter()
            .map(|range| elements.by_ref().take(range.len()).collect())
            .collect();

        PartitionedData {
            partitions,
            placement: PlacementMap::round_robin(num_partitions.get(), self.slots(num_partitions)),
        }
    }

    fn slots(&self, num_partitions: NonZeroUsize) -> NonZeroUsize {
        // Fixed(0) is rejected in `new`.
        NonZeroUsize::new(self.worker_pool.slots(num_partitions.get())).unwrap_or(num_partitions)
    }
}
