//! Dataset Actions
//!
//! This module contains the aggregate operations of a dataset. Actions read
//! elements in flattened order (partition index, then position inside the
//! partition) so non-commutative combining functions give the same answer
//! for every partition count. `aggregate` is the one exception: it exposes
//! partition boundaries on purpose.

use crate::rdd::{Dataset, Groups};
use crate::traits::{Data, Numeric};
use kindle_common::{DatasetError, DatasetResult};
use std::cmp::Ordering;
use std::hash::Hash;
use tracing::debug;

impl<T: Data> Dataset<T> {
    /// Collect all elements of the dataset into a vector
    pub fn collect(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Count the number of elements in the dataset
    pub fn count(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }

    /// Take the first `n` elements, or every element if there are fewer
    pub fn take(&self, n: usize) -> Vec<T> {
        self.iter().take(n).cloned().collect()
    }

    /// Get the first element of the dataset
    pub fn first(&self) -> Option<&T> {
        self.iter().next()
    }

    /// Run `f` on every element. Partitions may run concurrently.
    pub fn foreach<F>(&self, f: F)
    where
        F: Fn(&T) + Send + Sync,
    {
        self.scheduler.run_foreach(&self.partitions, f);
    }

    /// Left-fold every element with `f`, starting from the first element.
    pub fn reduce<F>(&self, f: F) -> DatasetResult<T>
    where
        F: FnMut(T, T) -> T,
    {
        let mut elements = self.iter().cloned();
        let first = elements
            .next()
            .ok_or_else(|| DatasetError::empty_dataset("reduce"))?;
        Ok(elements.fold(first, f))
    }

    /// Fold each partition with `seq_op` from a copy of `zero`, then hand the
    /// per-partition results, in partition order, to `comb_op`.
    pub fn aggregate<A, S, C>(&self, zero: A, seq_op: S, comb_op: C) -> A
    where
        A: Clone + Send + Sync,
        S: Fn(A, &T) -> A + Send + Sync,
        C: FnOnce(Vec<A>) -> A,
    {
        let partials = self.scheduler.run_partitions(&self.partitions, |partition| {
            partition.iter().fold(zero.clone(), &seq_op)
        });
        debug!(dataset = %self.id, partials = partials.len(), "aggregate");
        comb_op(partials)
    }

    /// Group elements by `key_fn`, keys in the order they are first seen.
    pub fn group_by<K, F>(&self, mut key_fn: F) -> Groups<K, T>
    where
        K: Eq + Hash + Clone,
        F: FnMut(&T) -> K,
    {
        let mut groups = Groups::new();
        for item in self.iter() {
            groups.push(key_fn(item), item.clone());
        }
        groups
    }

    /// Smallest element; the first one wins on ties.
    pub fn min(&self) -> DatasetResult<T>
    where
        T: PartialOrd,
    {
        self.extremum("min", Ordering::Less)
    }

    /// Largest element; the first one wins on ties.
    pub fn max(&self) -> DatasetResult<T>
    where
        T: PartialOrd,
    {
        self.extremum("max", Ordering::Greater)
    }

    fn extremum(&self, operation: &str, wanted: Ordering) -> DatasetResult<T>
    where
        T: PartialOrd,
    {
        let mut elements = self.iter();
        let mut best = elements
            .next()
            .ok_or_else(|| DatasetError::empty_dataset(operation))?;
        if best.partial_cmp(best).is_none() {
            return Err(DatasetError::unorderable(operation));
        }
        for item in elements {
            match item.partial_cmp(best) {
                Some(ordering) if ordering == wanted => best = item,
                Some(_) => {}
                None => return Err(DatasetError::unorderable(operation)),
            }
        }
        Ok(best.clone())
    }
}

impl<T: Numeric> Dataset<T> {
    /// Sum of every element; zero for an empty dataset.
    ///
    /// Fails with `ArithmeticOverflow` if an integer total leaves the range
    /// of `T`.
    pub fn sum(&self) -> DatasetResult<T> {
        self.iter()
            .try_fold(T::ZERO, |total, item| total.checked_add(*item))
            .ok_or_else(|| DatasetError::overflow("sum"))
    }

    /// Arithmetic mean as `f64`.
    pub fn average(&self) -> DatasetResult<f64> {
        let count = self.count();
        if count == 0 {
            return Err(DatasetError::empty_dataset("average"));
        }
        let total: f64 = self.iter().map(|item| item.to_f64()).sum();
        Ok(total / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use crate::partitioner::Partitioner;
    use crate::rdd::Dataset;
    use crate::scheduler::LocalScheduler;
    use kindle_common::ErrorKind;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn six(partitions: usize) -> Dataset<i32> {
        Dataset::from_vec(vec![1, 2, 3, 4, 5, 6], partitions).unwrap()
    }

    #[test]
    fn test_reduce_is_independent_of_partitioning() {
        for n in [1, 2, 3, 5] {
            assert_eq!(six(n).reduce(|a, b| a + b).unwrap(), 21, "n={n}");
        }
    }

    #[test]
    fn test_reduce_non_commutative_is_deterministic() {
        let expected = six(1).reduce(|a, b| a * 10 + b).unwrap();
        assert_eq!(expected, 123456);
        for n in 2..=6 {
            assert_eq!(six(n).reduce(|a, b| a * 10 + b).unwrap(), expected);
        }
    }

    #[test]
    fn test_aggregate_matches_sum() {
        let dataset = six(3);
        let total = dataset.aggregate(0, |acc, x| acc + x, |parts| parts.iter().sum());
        assert_eq!(total, 21);
        assert_eq!(total, dataset.sum().unwrap());
    }

    #[test]
    fn test_aggregate_sees_partition_boundaries() {
        let sizes = six(4).aggregate(0usize, |acc, _| acc + 1, |parts| {
            assert_eq!(parts, vec![1, 1, 1, 3]);
            parts.len()
        });
        assert_eq!(sizes, 4);
    }

    #[test]
    fn test_aggregate_on_thread_pool() {
        let dataset = Dataset::build(
            (1..=1000).collect::<Vec<i64>>(),
            8,
            Partitioner::default(),
            Arc::new(LocalScheduler::new(4).unwrap()),
        )
        .unwrap();
        let partials = dataset.aggregate(
            Vec::new(),
            |mut acc, x| {
                acc.push(*x);
                acc
            },
            |parts| parts.concat(),
        );
        assert_eq!(partials, (1..=1000).collect::<Vec<i64>>());
    }

    #[test]
    fn test_group_by_first_letter() {
        let dataset = Dataset::from_vec(vec!["Alice", "Bob", "Andy", "Kevin"], 3).unwrap();
        let groups = dataset.group_by(|name| name.chars().next());
        assert_eq!(
            groups.into_vec(),
            vec![
                (Some('A'), vec!["Alice", "Andy"]),
                (Some('B'), vec!["Bob"]),
                (Some('K'), vec!["Kevin"]),
            ]
        );
    }

    #[test]
    fn test_numeric_aggregates() {
        let dataset = six(4);
        assert_eq!(dataset.sum().unwrap(), 21);
        assert_eq!(dataset.average().unwrap(), 3.5);
        assert_eq!(dataset.min().unwrap(), 1);
        assert_eq!(dataset.max().unwrap(), 6);
    }

    #[test]
    fn test_min_max_on_floats() {
        let dataset = Dataset::from_vec(vec![2.5, -1.0, 9.75, 0.0], 2).unwrap();
        assert_eq!(dataset.min().unwrap(), -1.0);
        assert_eq!(dataset.max().unwrap(), 9.75);

        let with_nan = Dataset::from_vec(vec![2.5, f64::NAN], 1).unwrap();
        assert_eq!(with_nan.min().unwrap_err().kind(), ErrorKind::UnorderableType);
        let only_nan = Dataset::from_vec(vec![f64::NAN], 1).unwrap();
        assert_eq!(only_nan.max().unwrap_err().kind(), ErrorKind::UnorderableType);
    }

    #[test]
    fn test_sum_overflow_is_an_error() {
        let dataset = Dataset::from_vec(vec![100i8, 100i8], 2).unwrap();
        assert_eq!(
            dataset.sum().unwrap_err().kind(),
            ErrorKind::ArithmeticOverflow
        );

        let fits = Dataset::from_vec(vec![100i8, 27, -50], 2).unwrap();
        assert_eq!(fits.sum().unwrap(), 77);

        let wide = Dataset::from_vec(vec![u64::MAX, 1], 1).unwrap();
        assert_eq!(wide.sum().unwrap_err().kind(), ErrorKind::ArithmeticOverflow);
    }

    /// Ordered by `rank` only; equality still compares the tag.
    #[derive(Debug, Clone, PartialEq)]
    struct Ranked {
        rank: i32,
        tag: char,
    }

    impl PartialOrd for Ranked {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            self.rank.partial_cmp(&other.rank)
        }
    }

    #[test]
    fn test_min_max_keep_first_of_ties() {
        let ranked = |rank, tag| Ranked { rank, tag };
        // partitions: [a, x] and [b, y]
        let dataset = Dataset::from_vec(
            vec![ranked(1, 'a'), ranked(5, 'x'), ranked(1, 'b'), ranked(5, 'y')],
            2,
        )
        .unwrap();
        assert_eq!(dataset.partition_sizes(), vec![2, 2]);

        assert_eq!(dataset.min().unwrap(), ranked(1, 'a'));
        assert_eq!(dataset.max().unwrap(), ranked(5, 'x'));
    }

    #[test]
    fn test_min_max_on_strings() {
        let dataset = Dataset::from_vec(vec!["pear", "apple", "zucchini"], 2).unwrap();
        assert_eq!(dataset.min().unwrap(), "apple");
        assert_eq!(dataset.max().unwrap(), "zucchini");
    }

    #[test]
    fn test_empty_dataset_failures() {
        let empty = Dataset::from_vec(Vec::<i32>::new(), 3).unwrap();
        assert_eq!(empty.reduce(|a, b| a + b).unwrap_err().kind(), ErrorKind::EmptyDataset);
        assert_eq!(empty.average().unwrap_err().kind(), ErrorKind::EmptyDataset);
        assert_eq!(empty.min().unwrap_err().kind(), ErrorKind::EmptyDataset);
        assert_eq!(empty.max().unwrap_err().kind(), ErrorKind::EmptyDataset);
        assert_eq!(empty.count(), 0);
        assert_eq!(empty.sum().unwrap(), 0);
        assert!(empty.collect().is_empty());
        assert_eq!(empty.first(), None);
    }

    #[test]
    fn test_take_boundaries() {
        let dataset = six(3);
        assert!(dataset.take(0).is_empty());
        assert_eq!(dataset.take(4), vec![1, 2, 3, 4]);
        assert_eq!(dataset.take(100), dataset.collect());
        assert_eq!(dataset.first(), Some(&1));
    }

    #[test]
    fn test_foreach_visits_every_element() {
        let dataset = six(3);
        let seen = AtomicUsize::new(0);
        dataset.foreach(|_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(seen.load(Ordering::SeqCst), 6);
    }
}
