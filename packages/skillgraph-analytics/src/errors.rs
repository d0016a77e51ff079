//! Error types for skillgraph-analytics
//!
//! Provides unified error handling across the crate.
//!
//! An empty result is not an error: queries whose filters or joins eliminate
//! every row return `Ok(vec![])`.

use skillgraph_storage::StorageError;
use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for analytics operations
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Dataset could not be loaded (integrity violation, malformed record, I/O)
    #[error("Load error: {0}")]
    Load(#[from] StorageError),

    /// Invalid query parameter; raised before any computation starts
    #[error("Invalid parameter '{name}' = {value}: {reason}")]
    Parameter {
        name: String,
        value: String,
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rendering a report failed
    #[error("Report error: {0}")]
    Report(String),
}

impl AnalyticsError {
    /// Create a parameter error
    pub fn parameter(
        name: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        AnalyticsError::Parameter {
            name: name.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a report error
    pub fn report(msg: impl Into<String>) -> Self {
        AnalyticsError::Report(msg.into())
    }

    pub fn is_parameter_error(&self) -> bool {
        matches!(self, AnalyticsError::Parameter { .. })
    }
}

impl From<serde_json::Error> for AnalyticsError {
    fn from(err: serde_json::Error) -> Self {
        AnalyticsError::Report(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for AnalyticsError {
    fn from(err: serde_yaml::Error) -> Self {
        AnalyticsError::Report(format!("YAML error: {}", err))
    }
}

/// Result type alias for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;
