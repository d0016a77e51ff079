//! skillgraph-storage - immutable job-market dataset snapshot
//!
//! > Load once, validate once, query many times.
//!
//! ## Core Principles
//!
//! 1. **Injected source**: the four tables (postings, companies, skills,
//!    posting-skill links) come from a [`DatasetSource`]; format and transport
//!    are the adapter's business.
//! 2. **Fail at load**: dangling references, duplicate ids and malformed
//!    records abort the load with a [`StorageError`]. No row is dropped silently.
//! 3. **Read-only after load**: [`DatasetStore`] exposes lookups and
//!    iteration only, so it can be shared freely between query threads.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use skillgraph_storage::{DatasetStore, SqliteSource};
//! use std::time::Duration;
//!
//! let source = SqliteSource::new("jobs.db");
//! let store = DatasetStore::load_with_timeout(&source, Duration::from_secs(30)).await?;
//!
//! for posting in store.postings().filter(|p| p.work_from_home) {
//!     let company = store.company_of(posting).map(|c| c.name.as_str());
//!     println!("{} @ {:?}: {:?}", posting.title, company, store.skill_ids_of(posting.id));
//! }
//! ```

pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod store;

pub use error::{ErrorKind, Result, StorageError};

// Domain re-exports
pub use domain::{
    canonical_skill_name, Company, CompanyId, DatasetSource, Posting, PostingId,
    PostingSkillLink, Skill, SkillId, REMOTE_LOCATION,
};
pub use infrastructure::{DatasetSnapshot, InMemorySource, JsonSnapshotSource};
pub use store::{DatasetStore, StoreStats};

#[cfg(feature = "sqlite")]
pub use infrastructure::SqliteSource;
