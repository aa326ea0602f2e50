//! Test utilities for datashed
//!
//! This crate provides mock implementations of the catalog and fetcher
//! contracts for testing refresh sweeps without a network.

pub mod mocks;

// Re-export commonly used types
pub use mocks::{FetchBehavior, MockCatalog, MockFetcher};
