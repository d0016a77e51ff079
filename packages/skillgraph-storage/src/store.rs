//! DatasetStore - immutable, indexed snapshot of the four tables
//!
//! Built once per run. Provides O(1) access to:
//! - postings / companies / skills by id
//! - the skill ids linked to a posting (precomputed posting → skills index)
//! - the company that owns a posting
//!
//! Referential integrity is checked while indexing; nothing is mutated after
//! construction, so a store can be shared across threads behind an `Arc`.

use std::time::{Duration, Instant};

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, warn};

use crate::domain::{
    canonical_skill_name, Company, CompanyId, DatasetSource, Posting, PostingId,
    PostingSkillLink, Skill, SkillId,
};
use crate::error::{Result, StorageError};

const POSTINGS_TABLE: &str = "job_postings_fact";
const COMPANIES_TABLE: &str = "company_dim";
const SKILLS_TABLE: &str = "skills_dim";
const LINKS_TABLE: &str = "skills_job_dim";

/// Table sizes captured at load time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub postings: usize,
    pub companies: usize,
    pub skills: usize,
    pub links: usize,
    pub postings_with_salary: usize,
    /// Link rows dropped because the same (posting, skill) pair was already present
    pub duplicate_links: usize,
}

/// Read-only dataset snapshot
#[derive(Debug)]
pub struct DatasetStore {
    /// Postings in load order
    postings: Vec<Posting>,
    /// posting id → position in `postings`
    posting_index: FxHashMap<PostingId, usize>,
    companies: FxHashMap<CompanyId, Company>,
    skills: FxHashMap<SkillId, Skill>,
    /// Aligned with `postings`: skill ids in link order, no repeats
    posting_skills: Vec<Vec<SkillId>>,
    stats: StoreStats,
}

impl DatasetStore {
    /// Load all four tables from `source`, validate and index them
    pub async fn load<S>(source: &S) -> Result<Self>
    where
        S: DatasetSource + ?Sized,
    {
        let start = Instant::now();
        debug!("loading dataset from {}", source.describe());

        let companies = source.load_companies().await?;
        let skills = source.load_skills().await?;
        let postings = source.load_postings().await?;
        let links = source.load_links().await?;

        let store = Self::from_parts(postings, companies, skills, links)?;
        info!(
            "dataset loaded from {} in {}ms: {} postings, {} companies, {} skills, {} links",
            source.describe(),
            start.elapsed().as_millis(),
            store.stats.postings,
            store.stats.companies,
            store.stats.skills,
            store.stats.links,
        );
        Ok(store)
    }

    /// [`DatasetStore::load`] bounded by `timeout`
    ///
    /// The in-flight source future is dropped on expiry, which releases any
    /// handle it holds.
    pub async fn load_with_timeout<S>(source: &S, timeout: Duration) -> Result<Self>
    where
        S: DatasetSource + ?Sized,
    {
        match tokio::time::timeout(timeout, Self::load(source)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "dataset load from {} timed out after {}ms",
                    source.describe(),
                    timeout.as_millis()
                );
                Err(StorageError::timeout(timeout.as_millis()))
            }
        }
    }

    /// Build a store from already-loaded tables
    ///
    /// # Errors
    ///
    /// - `DuplicateId` when an id repeats within a table
    /// - `MalformedRecord` for empty required text, or a negative / non-finite salary
    /// - `ReferentialIntegrity` when a link or posting points at a missing row
    pub fn from_parts(
        postings: Vec<Posting>,
        companies: Vec<Company>,
        skills: Vec<Skill>,
        links: Vec<PostingSkillLink>,
    ) -> Result<Self> {
        let companies = index_companies(companies)?;
        let skills = index_skills(skills)?;

        let mut posting_index = FxHashMap::default();
        posting_index.reserve(postings.len());
        let mut postings_with_salary = 0;

        for (position, posting) in postings.iter().enumerate() {
            validate_posting(posting)?;

            if let Some(company_id) = posting.company_id {
                if !companies.contains_key(&company_id) {
                    return Err(StorageError::unknown_reference(
                        POSTINGS_TABLE,
                        "company_id",
                        company_id,
                        "company",
                    ));
                }
            }

            if posting_index.insert(posting.id, position).is_some() {
                return Err(StorageError::duplicate_id(POSTINGS_TABLE, posting.id));
            }

            if posting.has_salary() {
                postings_with_salary += 1;
            }
        }

        let mut posting_skills: Vec<Vec<SkillId>> = vec![Vec::new(); postings.len()];
        let mut seen: FxHashSet<PostingSkillLink> = FxHashSet::default();
        let mut duplicate_links = 0;

        for link in &links {
            let position = *posting_index.get(&link.posting_id).ok_or_else(|| {
                StorageError::unknown_reference(LINKS_TABLE, "job_id", link.posting_id, "posting")
            })?;

            if !skills.contains_key(&link.skill_id) {
                return Err(StorageError::unknown_reference(
                    LINKS_TABLE,
                    "skill_id",
                    link.skill_id,
                    "skill",
                ));
            }

            if !seen.insert(*link) {
                warn!(
                    "collapsing duplicate link: posting {} -> skill {}",
                    link.posting_id, link.skill_id
                );
                duplicate_links += 1;
                continue;
            }

            posting_skills[position].push(link.skill_id);
        }

        let stats = StoreStats {
            postings: postings.len(),
            companies: companies.len(),
            skills: skills.len(),
            links: seen.len(),
            postings_with_salary,
            duplicate_links,
        };

        Ok(Self {
            postings,
            posting_index,
            companies,
            skills,
            posting_skills,
            stats,
        })
    }

    /// All postings in load order
    pub fn postings(&self) -> impl Iterator<Item = &Posting> + '_ {
        self.postings.iter()
    }

    /// Postings paired with their linked skill ids, in load order
    pub fn postings_with_skills(&self) -> impl Iterator<Item = (&Posting, &[SkillId])> + '_ {
        self.postings
            .iter()
            .zip(self.posting_skills.iter().map(Vec::as_slice))
    }

    pub fn posting(&self, id: PostingId) -> Option<&Posting> {
        self.posting_index.get(&id).map(|&pos| &self.postings[pos])
    }

    pub fn company(&self, id: CompanyId) -> Option<&Company> {
        self.companies.get(&id)
    }

    pub fn skill(&self, id: SkillId) -> Option<&Skill> {
        self.skills.get(&id)
    }

    /// Skill ids linked to a posting (empty for unknown ids)
    pub fn skill_ids_of(&self, posting_id: PostingId) -> &[SkillId] {
        self.posting_index
            .get(&posting_id)
            .map(|&pos| self.posting_skills[pos].as_slice())
            .unwrap_or(&[])
    }

    /// Skills linked to a posting
    pub fn skills_of(&self, posting_id: PostingId) -> impl Iterator<Item = &Skill> + '_ {
        self.skill_ids_of(posting_id)
            .iter()
            .filter_map(move |id| self.skills.get(id))
    }

    /// Company owning a posting, if the posting names one
    pub fn company_of(&self, posting: &Posting) -> Option<&Company> {
        posting.company_id.and_then(|id| self.companies.get(&id))
    }

    pub fn companies(&self) -> impl Iterator<Item = &Company> + '_ {
        self.companies.values()
    }

    pub fn skills(&self) -> impl Iterator<Item = &Skill> + '_ {
        self.skills.values()
    }

    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

fn index_companies(companies: Vec<Company>) -> Result<FxHashMap<CompanyId, Company>> {
    let mut index = FxHashMap::default();
    index.reserve(companies.len());

    for company in companies {
        if company.name.trim().is_empty() {
            return Err(StorageError::malformed(
                COMPANIES_TABLE,
                format!("company {} has an empty name", company.id),
            ));
        }
        let id = company.id;
        if index.insert(id, company).is_some() {
            return Err(StorageError::duplicate_id(COMPANIES_TABLE, id));
        }
    }

    Ok(index)
}

fn index_skills(skills: Vec<Skill>) -> Result<FxHashMap<SkillId, Skill>> {
    let mut index = FxHashMap::default();
    index.reserve(skills.len());

    for mut skill in skills {
        skill.name = canonical_skill_name(&skill.name);
        if skill.name.is_empty() {
            return Err(StorageError::malformed(
                SKILLS_TABLE,
                format!("skill {} has an empty name", skill.id),
            ));
        }
        let id = skill.id;
        if index.insert(id, skill).is_some() {
            return Err(StorageError::duplicate_id(SKILLS_TABLE, id));
        }
    }

    Ok(index)
}

fn validate_posting(posting: &Posting) -> Result<()> {
    if posting.title.trim().is_empty() {
        return Err(StorageError::malformed(
            POSTINGS_TABLE,
            format!("posting {} has an empty job_title", posting.id),
        ));
    }

    if posting.title_short.trim().is_empty() {
        return Err(StorageError::malformed(
            POSTINGS_TABLE,
            format!("posting {} has an empty job_title_short", posting.id),
        ));
    }

    if let Some(salary) = posting.salary_year_avg {
        if !salary.is_finite() || salary < 0.0 {
            return Err(StorageError::malformed(
                POSTINGS_TABLE,
                format!(
                    "posting {} has an invalid salary_year_avg {}",
                    posting.id, salary
                ),
            ));
        }
    }

    Ok(())
}
