//! Configuration system
//!
//! [`AnalyticsConfig`] groups the report predicates, limits, the optimal
//! skills threshold, parallel aggregation and load settings. It can be built
//! in code with closures per section or read from a versioned YAML file.
//!
//! ```rust,ignore
//! let config = AnalyticsConfig::from_yaml("skills.yaml")?
//!     .optimal(|mut o| { o.demand_threshold = 5; o });
//! config.validate()?;
//! ```

pub mod analytics_config;
pub mod error;
pub mod io;
pub mod validation;

pub use analytics_config::{
    AnalyticsConfig, BaseConfig, LimitsConfig, LoadConfig, OptimalConfig, ParallelConfig,
    DEFAULT_ROLE,
};
pub use error::{ConfigError, ConfigResult};
pub use io::ConfigExportV1;
pub use validation::{Validatable, ValidatableCollection};
