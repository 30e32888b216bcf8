/// Core types shared across all checklist crates
pub mod authorship;
pub mod key;
pub mod relation;
pub mod usage;
pub mod vocab;

// Re-export commonly used types at module level
pub use authorship::Authorship;
pub use key::UsageKey;
pub use relation::{NameRelation, HOMOTYPIC_GROUPER};
pub use usage::{LinneanNameUsage, SimpleName};
pub use vocab::{Issue, NameType, NomCode, NomRelType, Rank, TaxonomicStatus};
