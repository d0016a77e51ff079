//! Domain layer for the job-market dataset
//!
//! # Domain Models
//!
//! - `Posting`: a single job advertisement (immutable once loaded)
//! - `Company`: the employer behind a posting
//! - `Skill`: a named competency, keyed by canonical identifier
//! - `PostingSkillLink`: many-to-many relation between postings and skills
//!
//! # Port Trait
//!
//! - `DatasetSource`: injected loader for the four tables. Format, storage
//!   engine and transport live behind this trait (see `infrastructure`).
//!
//! # Examples
//!
//! ```rust,ignore
//! use skillgraph_storage::domain::DatasetSource;
//! use skillgraph_storage::DatasetStore;
//!
//! async fn example(source: impl DatasetSource) -> Result<()> {
//!     let store = DatasetStore::load(&source).await?;
//!     for posting in store.postings() {
//!         let skills = store.skill_ids_of(posting.id);
//!         println!("{} requires {} skills", posting.title, skills.len());
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Identifier of a posting (`job_id` in the source data)
pub type PostingId = u64;
/// Identifier of a company (`company_id` in the source data)
pub type CompanyId = u64;
/// Identifier of a skill (`skill_id` in the source data)
pub type SkillId = u64;

/// Location value the source data uses for fully remote postings
pub const REMOTE_LOCATION: &str = "Anywhere";

// ═══════════════════════════════════════════════════════════════════════════
// Domain Models
// ═══════════════════════════════════════════════════════════════════════════

/// Job posting
///
/// # Examples
///
/// ```rust
/// use skillgraph_storage::domain::Posting;
///
/// let posting = Posting::new(1, "Senior Data Analyst", "Data Analyst")
///     .with_location("Anywhere")
///     .with_salary(135_000.0);
/// assert!(posting.is_remote_location());
/// assert!(posting.has_salary());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    /// Posting ID (unique)
    pub id: PostingId,
    /// Full title as advertised
    pub title: String,
    /// Normalized role family (`job_title_short`)
    pub title_short: String,
    /// Free-text location; [`REMOTE_LOCATION`] denotes fully remote
    #[serde(default)]
    pub location: Option<String>,
    /// Full-time, contractor, ...
    #[serde(default)]
    pub schedule_type: Option<String>,
    /// Remote flag (`job_work_from_home`)
    #[serde(default)]
    pub work_from_home: bool,
    /// Average yearly salary, absent for most postings
    #[serde(default)]
    pub salary_year_avg: Option<f64>,
    /// When the posting went live
    pub posted_at: NaiveDateTime,
    /// Owning company (weak reference)
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    /// Country the posting targets
    #[serde(default)]
    pub country: Option<String>,
    /// Channel the posting was collected from ("via LinkedIn")
    #[serde(default)]
    pub via: Option<String>,
}

impl Posting {
    /// Create a posting with the required fields; optional fields start empty
    /// and the posted timestamp at the Unix epoch.
    pub fn new(id: PostingId, title: impl Into<String>, title_short: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            title_short: title_short.into(),
            location: None,
            schedule_type: None,
            work_from_home: false,
            salary_year_avg: None,
            posted_at: NaiveDateTime::default(),
            company_id: None,
            country: None,
            via: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_schedule_type(mut self, schedule_type: impl Into<String>) -> Self {
        self.schedule_type = Some(schedule_type.into());
        self
    }

    pub fn with_remote(mut self, work_from_home: bool) -> Self {
        self.work_from_home = work_from_home;
        self
    }

    pub fn with_salary(mut self, salary_year_avg: f64) -> Self {
        self.salary_year_avg = Some(salary_year_avg);
        self
    }

    pub fn with_posted_at(mut self, posted_at: NaiveDateTime) -> Self {
        self.posted_at = posted_at;
        self
    }

    pub fn with_company(mut self, company_id: CompanyId) -> Self {
        self.company_id = Some(company_id);
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_via(mut self, via: impl Into<String>) -> Self {
        self.via = Some(via.into());
        self
    }

    /// True when the location is the fully-remote sentinel
    pub fn is_remote_location(&self) -> bool {
        self.location.as_deref() == Some(REMOTE_LOCATION)
    }

    pub fn has_salary(&self) -> bool {
        self.salary_year_avg.is_some()
    }
}

/// Company that posted one or more jobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Company ID (unique)
    pub id: CompanyId,
    /// Display name
    pub name: String,
}

impl Company {
    pub fn new(id: CompanyId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Skill referenced by postings
///
/// Names are canonicalized (trimmed, lower-cased) by the store at load time.
/// Aggregation groups by `id`, never by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Skill ID (canonical identifier)
    pub id: SkillId,
    /// Canonical name
    pub name: String,
    /// Skill family (`type` in the source data: programming, cloud, ...)
    #[serde(default)]
    pub category: Option<String>,
}

impl Skill {
    pub fn new(id: SkillId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Canonical form of a skill name
///
/// ```rust
/// use skillgraph_storage::domain::canonical_skill_name;
///
/// assert_eq!(canonical_skill_name("  Python "), "python");
/// ```
pub fn canonical_skill_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Posting ↔ skill relation row (no attributes of its own)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostingSkillLink {
    pub posting_id: PostingId,
    pub skill_id: SkillId,
}

impl PostingSkillLink {
    pub fn new(posting_id: PostingId, skill_id: SkillId) -> Self {
        Self {
            posting_id,
            skill_id,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Port Trait: DatasetSource
// ═══════════════════════════════════════════════════════════════════════════

/// Tabular dataset loader
///
/// Implementations own whatever I/O handle they need and must release it
/// before returning, on success and on failure alike. The store calls each
/// method exactly once per load.
///
/// # Implementations
///
/// - `InMemorySource`: vectors handed over by the caller
/// - `JsonSnapshotSource`: one JSON document holding all four tables
/// - `SqliteSource`: the `job_postings_fact` / `company_dim` / `skills_dim` /
///   `skills_job_dim` schema
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Load every posting
    async fn load_postings(&self) -> Result<Vec<Posting>>;

    /// Load every company
    async fn load_companies(&self) -> Result<Vec<Company>>;

    /// Load every skill (names may still be in surface form)
    async fn load_skills(&self) -> Result<Vec<Skill>>;

    /// Load the posting-skill relation
    async fn load_links(&self) -> Result<Vec<PostingSkillLink>>;

    /// Short description for log lines
    fn describe(&self) -> String {
        "dataset source".to_string()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
