//! Parallel execution tests
//!
//! These tests verify that running partition-local work on a Rayon pool
//! gives exactly the results of sequential execution.

mod common;

use common::*;
use kindle_core::{Dataset, LocalScheduler};
use std::sync::Mutex;

#[test]
fn test_parallel_and_sequential_agree() {
    let data: Vec<i64> = (1..=5000).collect();
    let mut sequential = create_test_context("sequential");
    let mut parallel = create_test_context_with_threads("parallel", 4);

    let seq = sequential.create_dataset(data.clone(), 7).unwrap();
    let par = parallel.create_dataset(data, 7).unwrap();

    let seq_result = seq.map(|x| x * 3).filter(|x| x % 2 == 0);
    let par_result = par.map(|x| x * 3).filter(|x| x % 2 == 0);
    assert_eq!(seq_result.collect(), par_result.collect());
    assert_eq!(seq_result.partition_sizes(), par_result.partition_sizes());
}

#[test]
fn test_parallel_aggregate_keeps_partition_order() {
    let mut context = create_test_context_with_threads("parallel-aggregate", 3);
    let dataset = context.create_dataset((0..100).collect::<Vec<i32>>(), 10).unwrap();

    let firsts = dataset.aggregate(
        Vec::new(),
        |mut acc, x| {
            if acc.is_empty() {
                acc.push(*x);
            }
            acc
        },
        |parts| parts.concat(),
    );
    assert_eq!(firsts, (0..100).step_by(10).collect::<Vec<i32>>());
}

#[test]
fn test_parallel_try_map_reports_earliest_failure() {
    let mut context = create_test_context_with_threads("parallel-try-map", 4);
    let dataset = context.create_dataset((0..40).collect::<Vec<i32>>(), 8).unwrap();

    let err = dataset
        .try_map(|x| {
            if *x % 7 == 6 {
                Err(kindle_core::DatasetError::type_mismatch("not 6 mod 7", x.to_string()))
            } else {
                Ok(*x)
            }
        })
        .unwrap_err();
    assert!(err.to_string().contains("\"6\""));
}

#[test]
fn test_parallel_foreach() {
    let mut context = create_test_context_with_threads("parallel-foreach", 2);
    let dataset = context.create_dataset(create_test_i32_data(), 4).unwrap();

    let seen = Mutex::new(Vec::new());
    dataset.foreach(|x| seen.lock().unwrap().push(*x));

    assert_same_elements(seen.into_inner().unwrap(), create_test_i32_data());
}

#[test]
fn test_partition_driven_results_do_not_depend_on_partition_count() {
    let data: Vec<i32> = (1..=100).collect();
    let single = Dataset::from_vec(data.clone(), 1).unwrap();
    let multi = Dataset::from_vec(data, 8).unwrap();

    assert_eq!(single.collect(), multi.collect());
    assert_eq!(single.count(), multi.count());
    assert_eq!(
        single.reduce(|a, b| a + b).unwrap(),
        multi.reduce(|a, b| a + b).unwrap()
    );
    assert_eq!(single.sum().unwrap(), 5050);
}

#[test]
fn test_local_scheduler() {
    let scheduler = LocalScheduler::new(2).unwrap();
    assert_eq!(scheduler.num_threads(), 2);

    let default_scheduler = LocalScheduler::with_default_threads().unwrap();
    assert!(default_scheduler.num_threads() > 0);
}
