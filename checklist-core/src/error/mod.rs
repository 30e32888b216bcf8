//! Core error types for the checklist workspace

use thiserror::Error;

/// Main error type for checklist operations
#[derive(Error, Debug)]
pub enum ChecklistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Task {taxon} failed: {reason}")]
    Task { taxon: String, reason: String },

    #[error("Other error: {0}")]
    Other(String),
}

/// Result type alias for checklist operations
pub type ChecklistResult<T> = Result<T, ChecklistError>;

impl ChecklistError {
    /// Wrap any error raised while processing the subtree of a taxon
    pub fn task(taxon: impl Into<String>, reason: impl ToString) -> Self {
        ChecklistError::Task {
            taxon: taxon.into(),
            reason: reason.to_string(),
        }
    }

    /// True for errors raised by the persistence layer
    pub fn is_storage(&self) -> bool {
        matches!(self, ChecklistError::Storage(_) | ChecklistError::NotFound(_))
    }
}

// Conversion implementations for common error types
impl From<serde_json::Error> for ChecklistError {
    fn from(err: serde_json::Error) -> Self {
        ChecklistError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ChecklistError {
    fn from(err: toml::de::Error) -> Self {
        ChecklistError::Configuration(format!("Failed to parse config: {}", err))
    }
}

impl From<anyhow::Error> for ChecklistError {
    fn from(err: anyhow::Error) -> Self {
        ChecklistError::Other(err.to_string())
    }
}
