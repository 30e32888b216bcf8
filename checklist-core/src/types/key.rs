/// Dataset scoped identifiers
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a usage (or name) within a single dataset
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UsageKey {
    pub dataset_key: i32,
    pub id: String,
}

impl UsageKey {
    pub fn new(dataset_key: i32, id: impl Into<String>) -> Self {
        Self {
            dataset_key,
            id: id.into(),
        }
    }

    /// Key for another id within the same dataset
    pub fn with_id(&self, id: impl Into<String>) -> Self {
        Self::new(self.dataset_key, id)
    }
}

impl fmt::Display for UsageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.dataset_key, self.id)
    }
}

impl From<(i32, &str)> for UsageKey {
    fn from((dataset_key, id): (i32, &str)) -> Self {
        Self::new(dataset_key, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        let key = UsageKey::new(3, "x12");
        assert_eq!(key.to_string(), "3:x12");
        assert_eq!(key.with_id("y").to_string(), "3:y");
    }

    #[test]
    fn test_key_conversion() {
        let key: UsageKey = (7, "abc").into();
        assert_eq!(key, UsageKey::new(7, "abc"));
    }
}
