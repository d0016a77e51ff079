//! JSON snapshot DatasetSource
//!
//! One document holds all four tables:
//!
//! ```json
//! {
//!   "postings":  [{ "id": 1, "title": "...", "title_short": "Data Analyst", "posted_at": "2023-01-01T00:00:00", ... }],
//!   "companies": [{ "id": 10, "name": "Acme" }],
//!   "skills":    [{ "id": 0, "name": "sql", "category": "programming" }],
//!   "links":     [{ "posting_id": 1, "skill_id": 0 }]
//! }
//! ```
//!
//! The file is read and parsed once, on the first load call; the file handle
//! does not outlive that read.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::domain::{Company, DatasetSource, Posting, PostingSkillLink, Skill};
use crate::error::StorageError;
use crate::Result;

/// Serialized form of a whole dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetSnapshot {
    pub postings: Vec<Posting>,
    #[serde(default)]
    pub companies: Vec<Company>,
    pub skills: Vec<Skill>,
    pub links: Vec<PostingSkillLink>,
}

impl DatasetSnapshot {
    /// Parse a snapshot document
    ///
    /// Missing fields and wrong value types are reported as malformed
    /// records; broken JSON syntax as a serialization error.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| {
            if err.classify() == serde_json::error::Category::Data {
                StorageError::malformed("snapshot", err.to_string()).with_source(err)
            } else {
                StorageError::from(err)
            }
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// DatasetSource reading a [`DatasetSnapshot`] document
#[derive(Debug)]
pub struct JsonSnapshotSource {
    path: Option<PathBuf>,
    snapshot: OnceCell<DatasetSnapshot>,
}

impl JsonSnapshotSource {
    /// Source backed by a file, read lazily on first load
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            snapshot: OnceCell::new(),
        }
    }

    /// Source backed by an in-memory document, parsed eagerly
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot = DatasetSnapshot::from_json(json)?;
        Ok(Self {
            path: None,
            snapshot: OnceCell::new_with(Some(snapshot)),
        })
    }

    async fn snapshot(&self) -> Result<&DatasetSnapshot> {
        self.snapshot
            .get_or_try_init(|| async {
                let path = self.path.as_ref().ok_or_else(|| {
                    StorageError::io("JSON snapshot source has neither a path nor a document")
                })?;
                debug!("reading JSON snapshot {}", path.display());
                let content = tokio::fs::read_to_string(path).await.map_err(|err| {
                    StorageError::io(format!("cannot read {}: {}", path.display(), err))
                        .with_source(err)
                })?;
                DatasetSnapshot::from_json(&content)
            })
            .await
    }
}

#[async_trait]
impl DatasetSource for JsonSnapshotSource {
    async fn load_postings(&self) -> Result<Vec<Posting>> {
        Ok(self.snapshot().await?.postings.clone())
    }

    async fn load_companies(&self) -> Result<Vec<Company>> {
        Ok(self.snapshot().await?.companies.clone())
    }

    async fn load_skills(&self) -> Result<Vec<Skill>> {
        Ok(self.snapshot().await?.skills.clone())
    }

    async fn load_links(&self) -> Result<Vec<PostingSkillLink>> {
        Ok(self.snapshot().await?.links.clone())
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("JSON snapshot {}", path.display()),
            None => "inline JSON snapshot".to_string(),
        }
    }
}
