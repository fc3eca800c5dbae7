//! Kindle Core - partitioned datasets on a single node
//!
//! This is the core crate of the kindle project. It models an RDD-style
//! collection: elements split into ordered partitions, each placed on a
//! simulated worker, with eager transformations and aggregations on top.

pub mod context;
pub mod loader;
pub mod partitioner;
pub mod rdd;
pub mod scheduler;
pub mod traits;

pub use context::FlowContext;
pub use kindle_common::{DatasetError, DatasetResult, ErrorKind, FlowConfig, WorkerPool};
pub use partitioner::{PartitionedData, Partitioner, PlacementMap, WorkerId, split_ranges};
pub use rdd::{Dataset, DatasetId, DatasetSummary, Groups};
pub use scheduler::LocalScheduler;
pub use traits::{Data, Numeric};
