//! Homotypic grouping and consolidation of a taxonomic checklist
//!
//! Names sharing an original epithet and authorship are detected per higher
//! taxon, linked by nomenclatural relations and consolidated so each homotypic
//! group keeps at most one accepted usage.

pub mod consolidator;
pub mod group;
pub mod orthography;
pub mod priority;
pub mod report;
pub mod sorter;
pub mod task;
pub mod union_find;

// Re-export main types
pub use consolidator::HomotypicConsolidator;
pub use group::HomotypicGroup;
pub use orthography::OrthographicVariantClusterer;
pub use priority::{SectorPriority, UsagePriority};
pub use report::{ConsolidationReport, TaskFailure, TaskStats};
pub use sorter::BasionymSorter;
pub use task::{ConsolidationContext, ConsolidationTask, UsageGroup};
pub use union_find::UnionFind;
