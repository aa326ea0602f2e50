//! Mock implementations for testing

mod catalog;
mod fetcher;

pub use catalog::MockCatalog;
pub use fetcher::{FetchBehavior, MockFetcher};
