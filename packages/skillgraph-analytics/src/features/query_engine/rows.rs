//! Report rows
//!
//! Field order is the column order of rendered tables.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use skillgraph_storage::{PostingId, SkillId};

/// Query 1: a top-paying posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPayingPosting {
    pub posting_id: PostingId,
    pub title: String,
    pub location: Option<String>,
    pub schedule_type: Option<String>,
    pub salary_year_avg: f64,
    pub posted_at: NaiveDateTime,
    pub company_name: Option<String>,
}

/// Query 2: one skill of a top-paying posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingSkillRow {
    pub posting_id: PostingId,
    pub title: String,
    pub salary_year_avg: f64,
    pub company_name: Option<String>,
    pub skill_id: SkillId,
    pub skill: String,
    pub category: Option<String>,
}

/// How often a skill appears among the top-paying postings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillFrequency {
    pub skill_id: SkillId,
    pub skill: String,
    pub count: u64,
}

/// Query 3
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDemand {
    pub skill_id: SkillId,
    pub skill: String,
    pub demand_count: u64,
}

/// Query 4
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSalary {
    pub skill_id: SkillId,
    pub skill: String,
    pub avg_salary: u64,
}

/// Query 5
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimalSkill {
    pub skill_id: SkillId,
    pub skill: String,
    pub demand_count: u64,
    pub avg_salary: u64,
}

/// Every report for one configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillReport {
    pub top_paying_postings: Vec<TopPayingPosting>,
    pub top_paying_posting_skills: Vec<PostingSkillRow>,
    pub top_paying_skill_frequency: Vec<SkillFrequency>,
    pub skill_demand: Vec<SkillDemand>,
    pub skill_salaries: Vec<SkillSalary>,
    pub optimal_skills: Vec<OptimalSkill>,
}
