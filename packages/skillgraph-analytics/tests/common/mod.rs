//! Common test utilities for skillgraph-analytics
//!
//! Shared datasets and builders for the integration and property tests.

#![allow(dead_code)]

mod builders;
mod fixtures;

pub use builders::*;
pub use fixtures::*;
