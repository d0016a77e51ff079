//! Configuration I/O (YAML loading)
//!
//! Schema v1:
//!
//! ```yaml
//! version: 1
//! base:
//!   role: Data Scientist
//! optimal:
//!   demand_threshold: 5
//! ```
//!
//! Omitted sections and fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::analytics_config::{
    AnalyticsConfig, BaseConfig, LimitsConfig, LoadConfig, OptimalConfig, ParallelConfig,
};
use super::error::{ConfigError, ConfigResult};
use super::validation::Validatable;

const SUPPORTED_VERSIONS: &[u32] = &[1];

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1); optional here so a missing field
    /// gets its own error
    #[serde(default)]
    pub version: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<BaseConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<LimitsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimal: Option<OptimalConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<ParallelConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<LoadConfig>,
}

impl ConfigExportV1 {
    fn into_config(self) -> ConfigResult<AnalyticsConfig> {
        let version = self.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let config = AnalyticsConfig {
            base: self.base.unwrap_or_default(),
            limits: self.limits.unwrap_or_default(),
            optimal: self.optimal.unwrap_or_default(),
            parallel: self.parallel.unwrap_or_default(),
            load: self.load.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}

impl From<&AnalyticsConfig> for ConfigExportV1 {
    fn from(config: &AnalyticsConfig) -> Self {
        Self {
            version: Some(1),
            base: Some(config.base.clone()),
            limits: Some(config.limits.clone()),
            optimal: Some(config.optimal.clone()),
            parallel: Some(config.parallel.clone()),
            load: Some(config.load.clone()),
        }
    }
}

impl AnalyticsConfig {
    /// Load and validate a YAML configuration file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let export: ConfigExportV1 = serde_yaml::from_str(content)?;
        export.into_config()
    }

    /// Serialize as a v1 YAML document
    pub fn to_yaml(&self) -> ConfigResult<String> {
        serde_yaml::to_string(&ConfigExportV1::from(self)).map_err(ConfigError::Yaml)
    }
}
