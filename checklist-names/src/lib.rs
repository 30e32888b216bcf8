//! Name level utilities for homotypic grouping: authorship comparison,
//! epithet normalization and name similarity

pub mod authorship;
pub mod epithet;
pub mod fold;
pub mod formattable;
pub mod similarity;

// Re-export commonly used types
pub use authorship::{AuthorComparator, Equality, StandardAuthorComparator};
pub use epithet::{EpithetNormalizer, SciNameNormalizer};
pub use fold::fold_to_ascii;
pub use formattable::FormattableName;
pub use similarity::{ScientificNameSimilarity, StringSimilarity};
