//! Skill Query UseCase Implementation
//!
//! Provides the application-level interface for the skill reports.
//! External callers should use this UseCase, not the individual stages.
//!
//! Every query is a pure function of the store snapshot and its parameters.
//! Parameters are validated before the store is read.

use std::time::Instant;

use rustc_hash::FxHashMap;
use skillgraph_storage::{DatasetStore, Posting, SkillId};
use tracing::debug;

use crate::config::{AnalyticsConfig, ParallelConfig, Validatable};
use crate::errors::Result;
use crate::features::query_engine::aggregation::{aggregate, SkillAggregates};
use crate::features::query_engine::composition::compose;
use crate::features::query_engine::filter::PostingFilter;
use crate::features::query_engine::join::{company_name, SkillJoin};
use crate::features::query_engine::params::{
    OptimalSkillsParams, SkillFrequencyParams, SkillRankParams, TopPostingsParams,
};
use crate::features::query_engine::ranking::{Order, Ranking};
use crate::features::query_engine::rows::{
    OptimalSkill, PostingSkillRow, SkillDemand, SkillFrequency, SkillReport, SkillSalary,
    TopPayingPosting,
};

/// Skill Query UseCase Trait (Port)
///
/// Defines the contract for the skill reports.
/// External callers should depend on this trait.
pub trait SkillQueryUseCase: Send + Sync {
    /// Highest-salary postings, salary desc then posting id asc
    fn top_paying_postings(
        &self,
        store: &DatasetStore,
        params: &TopPostingsParams,
    ) -> Result<Vec<TopPayingPosting>>;

    /// Skills of the top-paying postings (postings without skills drop out)
    fn top_paying_posting_skills(
        &self,
        store: &DatasetStore,
        params: &TopPostingsParams,
    ) -> Result<Vec<PostingSkillRow>>;

    /// How many top-paying postings require each skill
    fn top_paying_skill_frequency(
        &self,
        store: &DatasetStore,
        params: &SkillFrequencyParams,
    ) -> Result<Vec<SkillFrequency>>;

    /// Distinct postings per skill, demand desc then skill name asc
    fn skill_demand(&self, store: &DatasetStore, params: &SkillRankParams)
        -> Result<Vec<SkillDemand>>;

    /// Rounded mean salary per skill, salary desc then skill name asc
    fn skill_salaries(
        &self,
        store: &DatasetStore,
        params: &SkillRankParams,
    ) -> Result<Vec<SkillSalary>>;

    /// Skills above the demand threshold ranked by salary then demand
    fn optimal_skills(
        &self,
        store: &DatasetStore,
        params: &OptimalSkillsParams,
    ) -> Result<Vec<OptimalSkill>>;

    /// Every report for one configuration
    fn run_all(&self, store: &DatasetStore, config: &AnalyticsConfig) -> Result<SkillReport>;
}

/// Skill Query UseCase Implementation
#[derive(Debug, Clone, Default)]
pub struct SkillQueryUseCaseImpl {
    parallel: ParallelConfig,
}

impl SkillQueryUseCaseImpl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parallel(parallel: ParallelConfig) -> Self {
        Self { parallel }
    }

    pub fn from_config(config: &AnalyticsConfig) -> Self {
        Self::with_parallel(config.parallel.clone())
    }

    pub fn parallel(&self) -> &ParallelConfig {
        &self.parallel
    }

    fn aggregate(&self, store: &DatasetStore, filter: &PostingFilter) -> SkillAggregates {
        aggregate(store, filter, &self.parallel)
    }

    fn posting_skill_rows(
        &self,
        store: &DatasetStore,
        filter: &PostingFilter,
        limit: usize,
    ) -> Vec<PostingSkillRow> {
        let postings = top_postings(store, filter, limit);

        let rows: Vec<PostingSkillRow> = SkillJoin::new(store)
            .with_company()
            .expand(postings)
            .map(|pair| PostingSkillRow {
                posting_id: pair.posting.id,
                title: pair.posting.title.clone(),
                salary_year_avg: pair.posting.salary_year_avg.unwrap_or_default(),
                company_name: pair.company_name.map(str::to_string),
                skill_id: pair.skill.id,
                skill: pair.skill.name.clone(),
                category: pair.skill.category.clone(),
            })
            .collect();

        Ranking::new()
            .order_by_float(|r: &PostingSkillRow| r.salary_year_avg, Order::Desc)
            .order_by_key(|r: &PostingSkillRow| r.posting_id, Order::Asc)
            .order_by(|a: &PostingSkillRow, b: &PostingSkillRow| a.skill.cmp(&b.skill), Order::Asc)
            .apply(rows)
    }
}

impl SkillQueryUseCase for SkillQueryUseCaseImpl {
    fn top_paying_postings(
        &self,
        store: &DatasetStore,
        params: &TopPostingsParams,
    ) -> Result<Vec<TopPayingPosting>> {
        let limit = params.validate()?;
        let start = Instant::now();

        let rows: Vec<TopPayingPosting> = top_postings(store, &params.filter, limit)
            .into_iter()
            .map(|posting| TopPayingPosting {
                posting_id: posting.id,
                title: posting.title.clone(),
                location: posting.location.clone(),
                schedule_type: posting.schedule_type.clone(),
                salary_year_avg: posting.salary_year_avg.unwrap_or_default(),
                posted_at: posting.posted_at,
                company_name: company_name(store, posting).map(str::to_string),
            })
            .collect();

        log_query("top_paying_postings", rows.len(), start);
        Ok(rows)
    }

    fn top_paying_posting_skills(
        &self,
        store: &DatasetStore,
        params: &TopPostingsParams,
    ) -> Result<Vec<PostingSkillRow>> {
        let limit = params.validate()?;
        let start = Instant::now();

        let rows = self.posting_skill_rows(store, &params.filter, limit);

        log_query("top_paying_posting_skills", rows.len(), start);
        Ok(rows)
    }

    fn top_paying_skill_frequency(
        &self,
        store: &DatasetStore,
        params: &SkillFrequencyParams,
    ) -> Result<Vec<SkillFrequency>> {
        let (posting_limit, limit) = params.validate()?;
        let start = Instant::now();

        let mut counts: FxHashMap<SkillId, SkillFrequency> = FxHashMap::default();
        for row in self.posting_skill_rows(store, &params.postings.filter, posting_limit) {
            counts
                .entry(row.skill_id)
                .or_insert_with(|| SkillFrequency {
                    skill_id: row.skill_id,
                    skill: row.skill.clone(),
                    count: 0,
                })
                .count += 1;
        }

        let rows = Ranking::new()
            .order_by_key(|r: &SkillFrequency| r.count, Order::Desc)
            .order_by(|a: &SkillFrequency, b: &SkillFrequency| a.skill.cmp(&b.skill), Order::Asc)
            .limit(limit)
            .apply(counts.into_values().collect());

        log_query("top_paying_skill_frequency", rows.len(), start);
        Ok(rows)
    }

    fn skill_demand(
        &self,
        store: &DatasetStore,
        params: &SkillRankParams,
    ) -> Result<Vec<SkillDemand>> {
        let limit = params.validate()?;
        let start = Instant::now();

        let rows: Vec<SkillDemand> = self
            .aggregate(store, &params.filter)
            .demand_counts()
            .into_iter()
            .filter_map(|count| {
                store.skill(count.skill_id).map(|skill| SkillDemand {
                    skill_id: skill.id,
                    skill: skill.name.clone(),
                    demand_count: count.demand_count,
                })
            })
            .collect();

        let rows = Ranking::new()
            .order_by_key(|r: &SkillDemand| r.demand_count, Order::Desc)
            .order_by(|a: &SkillDemand, b: &SkillDemand| a.skill.cmp(&b.skill), Order::Asc)
            .limit(limit)
            .apply(rows);

        log_query("skill_demand", rows.len(), start);
        Ok(rows)
    }

    fn skill_salaries(
        &self,
        store: &DatasetStore,
        params: &SkillRankParams,
    ) -> Result<Vec<SkillSalary>> {
        let limit = params.validate()?;
        let start = Instant::now();

        let rows: Vec<SkillSalary> = self
            .aggregate(store, &params.filter)
            .average_salaries()
            .into_iter()
            .filter_map(|average| {
                store.skill(average.skill_id).map(|skill| SkillSalary {
                    skill_id: skill.id,
                    skill: skill.name.clone(),
                    avg_salary: average.avg_salary,
                })
            })
            .collect();

        let rows = Ranking::new()
            .order_by_key(|r: &SkillSalary| r.avg_salary, Order::Desc)
            .order_by(|a: &SkillSalary, b: &SkillSalary| a.skill.cmp(&b.skill), Order::Asc)
            .limit(limit)
            .apply(rows);

        log_query("skill_salaries", rows.len(), start);
        Ok(rows)
    }

    fn optimal_skills(
        &self,
        store: &DatasetStore,
        params: &OptimalSkillsParams,
    ) -> Result<Vec<OptimalSkill>> {
        let (threshold, limit) = params.validate()?;
        let start = Instant::now();

        let demand_side = self.aggregate(store, &params.demand_filter);
        let demand = demand_side.demand_counts();
        let salaries = if params.salary_filter == params.demand_filter {
            demand_side.average_salaries()
        } else {
            self.aggregate(store, &params.salary_filter).average_salaries()
        };

        let rows: Vec<OptimalSkill> = compose(&demand, &salaries, threshold)
            .into_iter()
            .filter_map(|composed| {
                store.skill(composed.skill_id).map(|skill| OptimalSkill {
                    skill_id: skill.id,
                    skill: skill.name.clone(),
                    demand_count: composed.demand_count,
                    avg_salary: composed.avg_salary,
                })
            })
            .collect();

        let rows = Ranking::new()
            .order_by_key(|r: &OptimalSkill| r.avg_salary, Order::Desc)
            .order_by_key(|r: &OptimalSkill| r.demand_count, Order::Desc)
            .order_by(|a: &OptimalSkill, b: &OptimalSkill| a.skill.cmp(&b.skill), Order::Asc)
            .limit(limit)
            .apply(rows);

        log_query("optimal_skills", rows.len(), start);
        Ok(rows)
    }

    fn run_all(&self, store: &DatasetStore, config: &AnalyticsConfig) -> Result<SkillReport> {
        config.validate()?;
        let start = Instant::now();

        let top = TopPostingsParams::from_config(config);
        let report = SkillReport {
            top_paying_postings: self.top_paying_postings(store, &top)?,
            top_paying_posting_skills: self.top_paying_posting_skills(store, &top)?,
            top_paying_skill_frequency: self
                .top_paying_skill_frequency(store, &SkillFrequencyParams::from_config(config))?,
            skill_demand: self.skill_demand(store, &SkillRankParams::demand(config))?,
            skill_salaries: self.skill_salaries(store, &SkillRankParams::salaries(config))?,
            optimal_skills: self.optimal_skills(store, &OptimalSkillsParams::from_config(config))?,
        };

        debug!(
            "run_all ({}) finished in {}ms",
            config.describe(),
            start.elapsed().as_millis()
        );
        Ok(report)
    }
}

/// Top `limit` salaried postings matching `filter`
///
/// Postings without a salary never rank, whatever the filter says.
fn top_postings<'s>(store: &'s DatasetStore, filter: &PostingFilter, limit: usize) -> Vec<&'s Posting> {
    let candidates: Vec<&Posting> = filter
        .apply(store)
        .filter(|posting| posting.has_salary())
        .collect();

    Ranking::new()
        .order_by_float(|p: &&Posting| p.salary_year_avg.unwrap_or_default(), Order::Desc)
        .order_by_key(|p: &&Posting| p.id, Order::Asc)
        .limit(limit)
        .apply(candidates)
}

fn log_query(name: &str, rows: usize, start: Instant) {
    debug!(
        "{} returned {} rows in {}µs",
        name,
        rows,
        start.elapsed().as_micros()
    );
}
