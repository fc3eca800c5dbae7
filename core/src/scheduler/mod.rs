//! Task Scheduler module
//!
//! This module provides scheduling of partition-local work, optionally on a
//! Rayon thread pool.

pub mod local_scheduler;

pub use local_scheduler::*;
