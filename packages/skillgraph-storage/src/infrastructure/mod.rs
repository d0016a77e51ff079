//! Infrastructure layer - DatasetSource adapters
//!
//! - `memory`: vectors supplied by the caller
//! - `json`: single-document JSON snapshot
//! - `sqlite`: the relational source schema (feature `sqlite`)

pub mod json;
pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use json::{DatasetSnapshot, JsonSnapshotSource};
pub use memory::InMemorySource;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSource;
