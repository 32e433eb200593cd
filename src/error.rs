//! Error types for lfprompt
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::langfuse::FetchError;

/// All error types that can occur in lfprompt
#[derive(Debug, Error)]
pub enum PromptError {
    /// A batch item is missing a required selector
    #[error("Item {index}: {message}")]
    Validation { index: usize, message: String },

    /// The prompt source failed for a batch item
    #[error("Item {index}: failed to fetch prompt '{name}' (label '{label}'): {source}")]
    Fetch {
        index: usize,
        name: String,
        label: String,
        #[source]
        source: FetchError,
    },

    /// Bad batch file or command input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl PromptError {
    /// Index of the batch item that raised this error, if any
    pub fn item_index(&self) -> Option<usize> {
        match self {
            PromptError::Validation { index, .. } | PromptError::Fetch { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Message without the item prefix, as recorded for failed items
    pub fn item_message(&self) -> String {
        match self {
            PromptError::Validation { message, .. } => message.clone(),
            PromptError::Fetch { source, .. } => source.to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for lfprompt operations
pub type Result<T> = std::result::Result<T, PromptError>;
