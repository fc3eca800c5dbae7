//! Dataset transformation implementations.
//!
//! `map`, `try_map` and `filter` run partition by partition through the
//! dataset's scheduler and are then re-partitioned with the same
//! partition count, so output boundaries follow the new element count.

use crate::partitioner::{PartitionedData, split_ranges};
use crate::rdd::Dataset;
use crate::traits::Data;
use kindle_common::{DatasetError, DatasetResult};
use std::cmp::Ordering;
use std::num::NonZeroUsize;
use tracing::{debug, warn};

impl<T: Data> Dataset<T> {
    /// Apply `f` to every element.
    ///
    /// Partitions may be processed concurrently, so `f` must not rely on
    /// shared mutable state.
    pub fn map<U, F>(&self, f: F) -> Dataset<U>
    where
        U: Data,
        F: Fn(&T) -> U + Send + Sync,
    {
        let mapped = self
            .scheduler
            .run_partitions(&self.partitions, |partition| {
                partition.iter().map(&f).collect::<Vec<U>>()
            });
        let result = self.derive(mapped.into_iter().flatten().collect());
        debug!(parent = %self.id, dataset = %result.id, "map");
        result
    }

    /// Apply a fallible `f` to every element.
    ///
    /// Fails with the error of the first failing element in flattened order.
    pub fn try_map<U, F>(&self, f: F) -> DatasetResult<Dataset<U>>
    where
        U: Data,
        F: Fn(&T) -> DatasetResult<U> + Send + Sync,
    {
        let mapped = self
            .scheduler
            .try_run_partitions(&self.partitions, |partition| {
                partition.iter().map(&f).collect::<DatasetResult<Vec<U>>>()
            })?;
        let result = self.derive(mapped.into_iter().flatten().collect());
        debug!(parent = %self.id, dataset = %result.id, "try_map");
        Ok(result)
    }

    /// Keep the elements for which `predicate` holds.
    pub fn filter<F>(&self, predicate: F) -> Dataset<T>
    where
        F: Fn(&T) -> bool + Send + Sync,
    {
        let kept = self
            .scheduler
            .run_partitions(&self.partitions, |partition| {
                partition
                    .iter()
                    .filter(|item| predicate(item))
                    .cloned()
                    .collect::<Vec<T>>()
            });
        let result = self.derive(kept.into_iter().flatten().collect());
        debug!(
            parent = %self.id,
            dataset = %result.id,
            kept = result.partition_sizes().iter().sum::<usize>(),
            "filter"
        );
        result
    }

    /// Sort every element across partitions, ascending unless `descending`.
    ///
    /// The sort is stable. Fails with `UnorderableType` if any two elements
    /// cannot be compared (for example a float `NaN`).
    pub fn sort(&self, descending: bool) -> DatasetResult<Dataset<T>>
    where
        T: PartialOrd,
    {
        self.sort_by_key(|item| item.clone(), descending)
    }

    /// Sort by a key derived from each element. Same contract as [`sort`](Self::sort).
    pub fn sort_by_key<K, F>(&self, key_fn: F, descending: bool) -> DatasetResult<Dataset<T>>
    where
        K: PartialOrd,
        F: Fn(&T) -> K,
    {
        let mut keyed: Vec<(K, T)> = self
            .iter()
            .map(|item| (key_fn(item), item.clone()))
            .collect();
        if keyed.iter().any(|(key, _)| key.partial_cmp(key).is_none()) {
            return Err(DatasetError::unorderable("sort"));
        }

        let mut unorderable = false;
        keyed.sort_by(|(a, _), (b, _)| match a.partial_cmp(b) {
            Some(ordering) if descending => ordering.reverse(),
            Some(ordering) => ordering,
            None => {
                unorderable = true;
                Ordering::Equal
            }
        });
        if unorderable {
            return Err(DatasetError::unorderable("sort"));
        }

        let result = self.derive(keyed.into_iter().map(|(_, item)| item).collect());
        debug!(parent = %self.id, dataset = %result.id, descending, "sort");
        Ok(result)
    }

    /// Merge adjacent partitions down to `num_partitions`, keeping element order.
    ///
    /// Elements are not re-split: each output partition is the concatenation
    /// of a contiguous run of input partitions. A merged partition keeps its
    /// worker only if all of its constituents were on the same worker.
    pub fn coalesce(&self, num_partitions: usize) -> DatasetResult<Dataset<T>> {
        let current = self.num_partitions();
        let target = NonZeroUsize::new(num_partitions)
            .filter(|target| target.get() <= current)
            .ok_or_else(|| {
                DatasetError::invalid_partition_count(
                    num_partitions,
                    format!("coalesce target must be between 1 and {current}"),
                )
            })?;

        let groups = split_ranges(current, target);
        let partitions = groups
            .iter()
            .map(|group| self.partitions[group.clone()].concat())
            .collect();
        let placement = self.placement.merge(&groups);
        let unassigned = placement.iter().filter(|(_, worker)| worker.is_none()).count();

        let result = self.derive_partitioned(PartitionedData {
            partitions,
            placement,
        });
        if unassigned > 0 {
            warn!(
                dataset = %result.id,
                unassigned,
                "coalesce merged partitions from different workers"
            );
        }
        debug!(
            parent = %self.id,
            dataset = %result.id,
            from = current,
            to = num_partitions,
            "coalesce"
        );
        Ok(result)
    }
}
