//! Error types for skillgraph-storage
//!
//! Every failure of the load step surfaces as a [`StorageError`]. The store
//! never drops offending rows to recover; the caller decides whether to abort
//! the run or retry with a different dataset.

use std::fmt;
use thiserror::Error;

/// Storage error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A link or posting references an id that does not exist
    ReferentialIntegrity,
    /// A record is missing a required field or carries an invalid value
    MalformedRecord,
    /// Two records of the same table share an identifier
    DuplicateId,
    /// Database errors (SQLite)
    Database,
    /// Serialization/deserialization errors
    Serialization,
    /// I/O errors
    IO,
    /// The load step exceeded its time budget
    Timeout,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ReferentialIntegrity => "referential_integrity",
            ErrorKind::MalformedRecord => "malformed_record",
            ErrorKind::DuplicateId => "duplicate_id",
            ErrorKind::Database => "database",
            ErrorKind::Serialization => "serialization",
            ErrorKind::IO => "io",
            ErrorKind::Timeout => "timeout",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Storage error type
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct StorageError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub message: String,
}

impl StorageError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Whether the error points at the data itself rather than the transport
    pub fn is_data_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::ReferentialIntegrity | ErrorKind::MalformedRecord | ErrorKind::DuplicateId
        )
    }

    // Convenience constructors
    pub fn unknown_reference(
        table: &str,
        field: &str,
        id: impl fmt::Display,
        target: &str,
    ) -> Self {
        Self::new(
            ErrorKind::ReferentialIntegrity,
            format!("{table}.{field} = {id} does not resolve to an existing {target}"),
        )
    }

    pub fn malformed(table: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::MalformedRecord,
            format!("{table}: {}", message.into()),
        )
    }

    pub fn duplicate_id(table: &str, id: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::DuplicateId,
            format!("{table}: id {id} appears more than once"),
        )
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IO, message)
    }

    pub fn timeout(timeout_ms: u128) -> Self {
        Self::new(
            ErrorKind::Timeout,
            format!("dataset load did not finish within {timeout_ms}ms"),
        )
    }
}

// SQLite error conversions
#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::database(format!("SQLite error: {}", err)).with_source(err)
    }
}

// JSON error conversions
impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::serialization(format!("JSON error: {}", err)).with_source(err)
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::io(format!("I/O error: {}", err)).with_source(err)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, StorageError>;
