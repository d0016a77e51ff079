//! Analytics configuration sections
//!
//! Every section has a `Default` matching the stock report set, validates
//! itself through [`Validatable`], and deserializes with `#[serde(default)]`
//! so a YAML file only needs to name the fields it changes.

use serde::{Deserialize, Serialize};
use skillgraph_storage::REMOTE_LOCATION;

use super::error::{ConfigError, ConfigResult};
use super::validation::Validatable;

/// Role family analysed when nothing else is configured
pub const DEFAULT_ROLE: &str = "Data Analyst";

// ============================================================================
// Base predicate set
// ============================================================================

/// Predicates shared by every report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BaseConfig {
    /// Role family (`job_title_short`)
    pub role: String,

    /// Location value that marks a fully remote posting
    pub remote_location: String,

    /// Restrict demand / salary / optimal reports to remote postings
    pub remote_only: bool,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            role: DEFAULT_ROLE.to_string(),
            remote_location: REMOTE_LOCATION.to_string(),
            remote_only: true,
        }
    }
}

impl Validatable for BaseConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.role.trim().is_empty() {
            return Err(ConfigError::Validation(
                "base.role must name a role family".to_string(),
            ));
        }
        if self.remote_location.trim().is_empty() {
            return Err(ConfigError::Validation(
                "base.remote_location must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "BaseConfig"
    }
}

// ============================================================================
// Per-report limits
// ============================================================================

/// Result limits per report (0 = empty result)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Top-paying postings
    pub top_postings: i64,

    /// Skill demand ranking
    pub skill_demand: i64,

    /// Average salary per skill
    pub skill_salaries: i64,

    /// Skill frequency among top-paying postings
    pub skill_frequency: i64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            top_postings: 10,
            skill_demand: 5,
            skill_salaries: 25,
            skill_frequency: 10,
        }
    }
}

impl Validatable for LimitsConfig {
    fn validate(&self) -> ConfigResult<()> {
        let fields = [
            ("limits.top_postings", self.top_postings),
            ("limits.skill_demand", self.skill_demand),
            ("limits.skill_salaries", self.skill_salaries),
            ("limits.skill_frequency", self.skill_frequency),
        ];
        for (field, value) in fields {
            if value < 0 {
                return Err(ConfigError::negative(
                    field,
                    value,
                    "Limits cannot be negative (0 yields an empty report)",
                ));
            }
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "LimitsConfig"
    }
}

// ============================================================================
// Optimal skills
// ============================================================================

/// Demand/salary composition settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimalConfig {
    /// Skills need strictly more postings than this
    pub demand_threshold: i64,

    /// Result limit
    pub limit: i64,
}

impl Default for OptimalConfig {
    fn default() -> Self {
        Self {
            demand_threshold: 10,
            limit: 25,
        }
    }
}

impl Validatable for OptimalConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.demand_threshold < 0 {
            return Err(ConfigError::negative(
                "optimal.demand_threshold",
                self.demand_threshold,
                "Demand threshold is a posting count",
            ));
        }
        if self.limit < 0 {
            return Err(ConfigError::negative(
                "optimal.limit",
                self.limit,
                "Limits cannot be negative (0 yields an empty report)",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "OptimalConfig"
    }
}

// ============================================================================
// Parallel aggregation
// ============================================================================

/// Partitioned aggregation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParallelConfig {
    /// Enable Rayon map-reduce aggregation
    pub enable_rayon: bool,

    /// Number of posting partitions (0=auto, 1..=1024)
    pub partitions: usize,

    /// Inputs smaller than this aggregate sequentially
    pub min_postings: usize,
}

impl ParallelConfig {
    /// Sequential aggregation only
    pub fn sequential() -> Self {
        Self {
            enable_rayon: false,
            ..Self::default()
        }
    }

    /// Effective partition count (0 resolves to the CPU count)
    pub fn resolved_partitions(&self) -> usize {
        if self.partitions == 0 {
            num_cpus::get().max(1)
        } else {
            self.partitions
        }
    }
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enable_rayon: true,
            partitions: 0, // Auto
            min_postings: 10_000,
        }
    }
}

impl Validatable for ParallelConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.partitions > 1024 {
            return Err(ConfigError::range_with_hint(
                "parallel.partitions",
                self.partitions,
                0,
                1024,
                "Partition count must be reasonable (0=auto)",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "ParallelConfig"
    }
}

// ============================================================================
// Load step
// ============================================================================

/// Dataset load settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadConfig {
    /// Upper bound on the whole load step in seconds (1..=3600)
    pub timeout_seconds: u64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 60,
        }
    }
}

impl Validatable for LoadConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.timeout_seconds < 1 || self.timeout_seconds > 3600 {
            return Err(ConfigError::range_with_hint(
                "load.timeout_seconds",
                self.timeout_seconds,
                1,
                3600,
                "Load timeout must be between one second and one hour",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "LoadConfig"
    }
}

// ============================================================================
// Top-level
// ============================================================================

/// Full analytics configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsConfig {
    pub base: BaseConfig,
    pub limits: LimitsConfig,
    pub optimal: OptimalConfig,
    pub parallel: ParallelConfig,
    pub load: LoadConfig,
}

impl AnalyticsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base(mut self, f: impl FnOnce(BaseConfig) -> BaseConfig) -> Self {
        self.base = f(self.base);
        self
    }

    pub fn limits(mut self, f: impl FnOnce(LimitsConfig) -> LimitsConfig) -> Self {
        self.limits = f(self.limits);
        self
    }

    pub fn optimal(mut self, f: impl FnOnce(OptimalConfig) -> OptimalConfig) -> Self {
        self.optimal = f(self.optimal);
        self
    }

    pub fn parallel(mut self, f: impl FnOnce(ParallelConfig) -> ParallelConfig) -> Self {
        self.parallel = f(self.parallel);
        self
    }

    pub fn load(mut self, f: impl FnOnce(LoadConfig) -> LoadConfig) -> Self {
        self.load = f(self.load);
        self
    }

    /// Human-readable one-line summary
    pub fn describe(&self) -> String {
        format!(
            "role={} remote_only={} threshold={} rayon={} partitions={}",
            self.base.role,
            self.base.remote_only,
            self.optimal.demand_threshold,
            self.parallel.enable_rayon,
            self.parallel.resolved_partitions(),
        )
    }
}

impl Validatable for AnalyticsConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.base.validate()?;
        self.limits.validate()?;
        self.optimal.validate()?;
        self.parallel.validate()?;
        self.load.validate()?;
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "AnalyticsConfig"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AnalyticsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.base.role, "Data Analyst");
        assert_eq!(config.base.remote_location, "Anywhere");
        assert_eq!(config.limits.top_postings, 10);
        assert_eq!(config.limits.skill_demand, 5);
        assert_eq!(config.limits.skill_salaries, 25);
        assert_eq!(config.optimal.demand_threshold, 10);
        assert_eq!(config.optimal.limit, 25);
    }

    #[test]
    fn test_negative_limit_rejected() {
        let config = AnalyticsConfig::new().limits(|mut l| {
            l.skill_demand = -1;
            l
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("limits.skill_demand"));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let config = AnalyticsConfig::new().optimal(|mut o| {
            o.demand_threshold = -2;
            o
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Range { .. })
        ));
    }

    #[test]
    fn test_empty_role_rejected() {
        let config = AnalyticsConfig::new().base(|mut b| {
            b.role = "  ".to_string();
            b
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_partition_bounds() {
        let mut parallel = ParallelConfig::default();
        parallel.partitions = 2048;
        assert!(parallel.validate().is_err());

        parallel.partitions = 8;
        assert!(parallel.validate().is_ok());
        assert_eq!(parallel.resolved_partitions(), 8);

        parallel.partitions = 0;
        assert!(parallel.resolved_partitions() >= 1);
    }

    #[test]
    fn test_load_timeout_bounds() {
        assert!(LoadConfig { timeout_seconds: 0 }.validate().is_err());
        assert!(LoadConfig { timeout_seconds: 30 }.validate().is_ok());
        assert!(LoadConfig {
            timeout_seconds: 7200
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_sequential_preset() {
        let parallel = ParallelConfig::sequential();
        assert!(!parallel.enable_rayon);
        assert_eq!(parallel.min_postings, ParallelConfig::default().min_postings);
    }
}
