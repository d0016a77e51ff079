/*
 * Skillgraph Analytics - Job-market skill reports
 *
 * Feature-First Hexagonal Architecture:
 * - config/    : AnalyticsConfig, YAML v1 schema, validation
 * - features/  : query_engine (filter → join → aggregation → ranking → composition)
 * - adapters/  : Report rendering (table / JSON / YAML)
 *
 * Performance:
 * - Rayon partitioned map-reduce for skill aggregates
 * - Integer-cent salary sums (order-independent)
 */

#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::type_complexity)] // Borrowed row tuples in aggregation

pub mod adapters;
pub mod config;
pub mod errors;
pub mod features;

pub use adapters::{render, render_report, ReportFormat};
pub use config::{AnalyticsConfig, ConfigError, Validatable};
pub use errors::{AnalyticsError, Result};
pub use features::query_engine::{
    OptimalSkill, OptimalSkillsParams, Order, PostingFilter, PostingSkillRow, Ranking,
    SkillDemand, SkillFrequency, SkillFrequencyParams, SkillQueryUseCase, SkillQueryUseCaseImpl,
    SkillRankParams, SkillReport, SkillSalary, TopPayingPosting, TopPostingsParams,
};

// Storage re-exports so callers need a single dependency
pub use skillgraph_storage::{
    DatasetSource, DatasetStore, InMemorySource, JsonSnapshotSource, StorageError,
};

#[cfg(feature = "sqlite")]
pub use skillgraph_storage::SqliteSource;
