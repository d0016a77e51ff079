//! Query Engine Feature - Skill analytics pipeline
//!
//! Data flows strictly downward:
//!
//! ```text
//! DatasetStore → filter → join → aggregation → ranking  (demand, salaries)
//!                                    ↓
//!                               composition → ranking   (optimal skills)
//!
//! DatasetStore → filter → ranking → join                 (top postings, their skills)
//! ```
//!
//! # Usage
//! ```ignore
//! use skillgraph_analytics::features::query_engine::{SkillQueryUseCase, SkillQueryUseCaseImpl};
//!
//! let usecase = SkillQueryUseCaseImpl::new();
//! let rows = usecase.optimal_skills(&store, &OptimalSkillsParams::default())?;
//! ```

pub mod aggregation;
pub mod application; // UseCase layer (entry point)
pub mod composition;
pub mod filter;
pub mod join;
pub mod params;
pub mod ranking;
pub mod rows;

// Re-export application layer (primary interface)
pub use application::{SkillQueryUseCase, SkillQueryUseCaseImpl};

pub use aggregation::{
    aggregate, average_salaries, demand_counts, round_half_up, SkillAccumulator, SkillAggregates,
    SkillAverage, SkillCount,
};
pub use composition::{compose, ComposedSkill};
pub use filter::PostingFilter;
pub use join::{SkillJoin, SkillPair};
pub use params::{OptimalSkillsParams, SkillFrequencyParams, SkillRankParams, TopPostingsParams};
pub use ranking::{Order, Ranking};
pub use rows::{
    OptimalSkill, PostingSkillRow, SkillDemand, SkillFrequency, SkillReport, SkillSalary,
    TopPayingPosting,
};
