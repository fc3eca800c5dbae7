//! Common utilities and abstractions for the kindle project.
//!
//! This crate holds the error type and configuration shared by the engine.

pub mod config;
pub mod error;

pub use config::{FlowConfig, WorkerPool};
pub use error::{DatasetError, DatasetResult, ErrorContext, ErrorKind};
