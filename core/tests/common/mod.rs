//! Common test utilities and helpers for integration tests

use kindle_core::{Dataset, FlowConfig, FlowContext};

/// Create a sequential test context with a given name
pub fn create_test_context(name: &str) -> FlowContext {
    FlowContext::with_app_name(name).unwrap()
}

/// Create a test context backed by a thread pool
#[allow(dead_code)] // Not every test binary runs on a pool
pub fn create_test_context_with_threads(name: &str, threads: usize) -> FlowContext {
    FlowContext::new(FlowConfig::new(name).with_threads(threads)).unwrap()
}

/// Create test data for integer operations
pub fn create_test_i32_data() -> Vec<i32> {
    (1..=20).collect()
}

/// Create test data for string operations
#[allow(dead_code)]
pub fn create_test_string_data() -> Vec<String> {
    ["Alice", "Bob", "Charlie", "Andy", "Kevin", "James", "Wade"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Flatten a dataset's partitions by hand, without going through `collect`
#[allow(dead_code)]
pub fn flatten_partitions<T: kindle_core::Data>(dataset: &Dataset<T>) -> Vec<T> {
    dataset
        .partitions()
        .iter()
        .flat_map(|partition| partition.iter().cloned())
        .collect()
}

/// Assert that two vectors contain the same elements (order-independent)
#[allow(dead_code)]
pub fn assert_same_elements<T: Ord + Clone + std::fmt::Debug>(
    mut actual: Vec<T>,
    mut expected: Vec<T>,
) {
    actual.sort();
    expected.sort();
    assert_eq!(actual, expected);
}
