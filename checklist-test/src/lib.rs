//! Test utilities for the checklist workspace
//!
//! This crate provides common test helpers, fixtures, and utilities for testing
//! across the checklist workspace, following the pattern of tokio-test.
//!
//! # Features
//!
//! - **In-memory store**: Transactional `UsageStore` with failure injection
//! - **Fixtures**: Usage builders and small trees
//! - **Parser**: Just enough authorship parsing for fixtures
//! - **Stubs**: Fixed similarity for threshold tests
//! - **Assertions**: Custom assertions on store state

pub mod assertions;
pub mod fixtures;
pub mod parser;
pub mod store;

// Re-export commonly used items
pub use fixtures::{family_tree, priority_by_id, usage, UsageBuilder};
pub use parser::{parse_authorship, parse_combination};
pub use store::{FailurePoint, InMemoryStore};

// Re-export test dependencies for convenience
pub use anyhow::{Context, Result};

use checklist_names::StringSimilarity;

/// Initialize test logging (call once per test module)
pub fn init_test_logging() {
    checklist_core::system::init_test_logging();
}

/// Similarity returning the same score for any pair of names
#[derive(Debug, Clone, Copy)]
pub struct FixedSimilarity(pub f64);

impl StringSimilarity for FixedSimilarity {
    fn similarity(&self, _a: &str, _b: &str) -> f64 {
        self.0
    }
}

/// Run a test against a store populated with one dataset
///
/// # Example
/// ```rust
/// use checklist_test::{usage, with_store};
///
/// with_store(3, vec![usage("1", "Abies alba", "L.").build()], |store| {
///     assert_eq!(store.usage_count(3), 1);
///     Ok(())
/// })
/// .unwrap();
/// ```
pub fn with_store<F, R>(dataset_key: i32, usages: Vec<checklist_core::LinneanNameUsage>, f: F) -> Result<R>
where
    F: FnOnce(&InMemoryStore) -> Result<R>,
{
    let store = InMemoryStore::with_usages(dataset_key, usages);
    f(&store)
}
