//! Partitioned dataset implementation
//!
//! This module contains the `Dataset` type together with its
//! transformations and actions.

pub mod actions;
pub mod base;
pub mod groups;
pub mod transformations;

pub use base::*;
pub use groups::*;
