// PostingFilter - Predicate selection over postings
//
// All predicates are ANDed; unset predicates match everything.
// - role: job_title_short equality
// - location: exact location equality (the remote sentinel is just a location)
// - remote: work_from_home flag equality
// - salary_present: salary_year_avg is non-null

use serde::{Deserialize, Serialize};
use skillgraph_storage::{DatasetStore, Posting, SkillId, REMOTE_LOCATION};

/// Conjunctive predicate set over postings
///
/// Example:
/// ```
/// use skillgraph_analytics::PostingFilter;
///
/// let filter = PostingFilter::all()
///     .role("Data Analyst")
///     .remote_location()
///     .salary_present();
/// assert!(!filter.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PostingFilter {
    pub role: Option<String>,
    pub location: Option<String>,
    pub remote: Option<bool>,
    pub salary_present: bool,
}

impl PostingFilter {
    /// Empty predicate set
    pub fn all() -> Self {
        Self::default()
    }

    /// Role family restricted to remote postings
    pub fn remote_role(role: impl Into<String>) -> Self {
        Self::all().role(role).remote(true)
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Location equal to the fully-remote sentinel
    pub fn remote_location(self) -> Self {
        self.location(REMOTE_LOCATION)
    }

    pub fn remote(mut self, remote: bool) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn salary_present(mut self) -> Self {
        self.salary_present = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.location.is_none() && self.remote.is_none() && !self.salary_present
    }

    pub fn matches(&self, posting: &Posting) -> bool {
        if let Some(role) = &self.role {
            if posting.title_short != *role {
                return false;
            }
        }

        if let Some(location) = &self.location {
            if posting.location.as_deref() != Some(location.as_str()) {
                return false;
            }
        }

        if let Some(remote) = self.remote {
            if posting.work_from_home != remote {
                return false;
            }
        }

        !self.salary_present || posting.has_salary()
    }

    /// Matching postings in load order (single lazy scan)
    ///
    /// Yielded postings borrow from `store` only, so they outlive the filter.
    pub fn apply<'a, 's: 'a>(
        &'a self,
        store: &'s DatasetStore,
    ) -> impl Iterator<Item = &'s Posting> + 'a {
        store.postings().filter(move |posting| self.matches(posting))
    }

    /// Matching postings with their linked skill ids
    pub fn apply_with_skills<'a, 's: 'a>(
        &'a self,
        store: &'s DatasetStore,
    ) -> impl Iterator<Item = (&'s Posting, &'s [SkillId])> + 'a {
        store
            .postings_with_skills()
            .filter(move |(posting, _)| self.matches(posting))
    }
}
