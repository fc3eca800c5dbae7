//! Context module for kindle
//!
//! This module provides the execution context datasets are created from.

pub mod flow_context;

pub use flow_context::*;
