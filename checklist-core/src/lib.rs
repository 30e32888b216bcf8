//! Core utilities and types shared across all checklist crates

pub mod config;
pub mod error;
pub mod store;
pub mod system;
pub mod types;

// Re-export commonly used types
pub use config::{load_config, save_config, ConsolidationConfig};
pub use error::{ChecklistError, ChecklistResult};

// Re-export core types
pub use types::{
    Authorship, Issue, LinneanNameUsage, NameRelation, NameType, NomCode, NomRelType, Rank,
    SimpleName, TaxonomicStatus, UsageKey,
};

pub use store::{StoreSession, TreeTraversal, UsageCursor, UsageStore};

pub use system::init_logging;

/// Version information for the checklist workspace
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
