//! Query parameters
//!
//! Limits and thresholds are signed so values coming from config files or
//! CLI flags can be represented before they are checked. Every query calls
//! `validate()` before touching the store.

use serde::{Deserialize, Serialize};

use super::filter::PostingFilter;
use crate::config::AnalyticsConfig;
use crate::errors::{AnalyticsError, Result};

fn non_negative(name: &str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| AnalyticsError::parameter(name, value, "must be >= 0"))
}

fn limit_of(name: &str, value: i64) -> Result<usize> {
    let value = non_negative(name, value)?;
    Ok(usize::try_from(value).unwrap_or(usize::MAX))
}

/// Postings of one role at the remote location, with a salary
fn top_postings_filter(config: &AnalyticsConfig) -> PostingFilter {
    PostingFilter::all()
        .role(config.base.role.clone())
        .location(config.base.remote_location.clone())
        .salary_present()
}

/// Role postings, remote-only unless configured otherwise
fn base_filter(config: &AnalyticsConfig) -> PostingFilter {
    let filter = PostingFilter::all().role(config.base.role.clone());
    if config.base.remote_only {
        filter.remote(true)
    } else {
        filter
    }
}

/// Top-paying postings (and the skills / skill frequency derived from them)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPostingsParams {
    pub filter: PostingFilter,
    pub limit: i64,
}

impl TopPostingsParams {
    pub fn from_config(config: &AnalyticsConfig) -> Self {
        Self {
            filter: top_postings_filter(config),
            limit: config.limits.top_postings,
        }
    }

    /// Validated posting limit
    pub fn validate(&self) -> Result<usize> {
        limit_of("limit", self.limit)
    }
}

impl Default for TopPostingsParams {
    fn default() -> Self {
        Self::from_config(&AnalyticsConfig::default())
    }
}

/// Skill frequency among the top-paying postings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillFrequencyParams {
    pub postings: TopPostingsParams,
    /// Number of skills reported
    pub limit: i64,
}

impl SkillFrequencyParams {
    pub fn from_config(config: &AnalyticsConfig) -> Self {
        Self {
            postings: TopPostingsParams::from_config(config),
            limit: config.limits.skill_frequency,
        }
    }

    /// Validated (posting limit, skill limit)
    pub fn validate(&self) -> Result<(usize, usize)> {
        let postings = self.postings.validate()?;
        let skills = limit_of("limit", self.limit)?;
        Ok((postings, skills))
    }
}

impl Default for SkillFrequencyParams {
    fn default() -> Self {
        Self::from_config(&AnalyticsConfig::default())
    }
}

/// Per-skill ranking over one filtered posting set (demand or salary)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRankParams {
    pub filter: PostingFilter,
    pub limit: i64,
}

impl SkillRankParams {
    /// Demand report: role postings, remote-only by default
    pub fn demand(config: &AnalyticsConfig) -> Self {
        Self {
            filter: base_filter(config),
            limit: config.limits.skill_demand,
        }
    }

    /// Salary report: same base set restricted to postings with a salary
    pub fn salaries(config: &AnalyticsConfig) -> Self {
        Self {
            filter: base_filter(config).salary_present(),
            limit: config.limits.skill_salaries,
        }
    }

    pub fn validate(&self) -> Result<usize> {
        limit_of("limit", self.limit)
    }
}

/// Optimal skills composition
///
/// The demand and salary sides take independent filters; by default both are
/// the role's remote postings with a salary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimalSkillsParams {
    pub demand_filter: PostingFilter,
    pub salary_filter: PostingFilter,
    /// Skills need strictly more postings than this
    pub demand_threshold: i64,
    pub limit: i64,
}

impl OptimalSkillsParams {
    pub fn from_config(config: &AnalyticsConfig) -> Self {
        let filter = base_filter(config).salary_present();
        Self {
            demand_filter: filter.clone(),
            salary_filter: filter,
            demand_threshold: config.optimal.demand_threshold,
            limit: config.optimal.limit,
        }
    }

    /// Validated (threshold, limit)
    pub fn validate(&self) -> Result<(u64, usize)> {
        let threshold = non_negative("demand_threshold", self.demand_threshold)?;
        let limit = limit_of("limit", self.limit)?;
        Ok((threshold, limit))
    }
}

impl Default for OptimalSkillsParams {
    fn default() -> Self {
        Self::from_config(&AnalyticsConfig::default())
    }
}
