//! Skill Report CLI
//!
//! Loads a job postings dataset and prints one or all skill reports.
//!
//! # Usage
//!
//! ```bash
//! # Every report from a SQLite database
//! cargo run --bin skill-report --release -- --sqlite jobs.db all
//!
//! # Optimal skills for another role, as JSON
//! cargo run --bin skill-report -- --json snapshot.json --format json \
//!     --role "Data Scientist" optimal --threshold 5
//!
//! # With a config file and debug logging
//! RUST_LOG=skillgraph_analytics=debug cargo run --bin skill-report -- \
//!     --sqlite jobs.db --config skills.yaml demand
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use skillgraph_analytics::{
    render, render_report, AnalyticsConfig, AnalyticsError, DatasetSource, DatasetStore,
    JsonSnapshotSource, OptimalSkillsParams, ReportFormat, SkillFrequencyParams,
    SkillQueryUseCase, SkillQueryUseCaseImpl, SkillRankParams, TopPostingsParams, Validatable,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skill-report")]
#[command(about = "Job-market skill analytics - demand, salary and optimal skills", long_about = None)]
struct Cli {
    /// SQLite database with the job postings schema
    #[arg(long, conflicts_with = "json", required_unless_present = "json")]
    sqlite: Option<PathBuf>,

    /// JSON dataset snapshot ({postings, companies, skills, links})
    #[arg(long)]
    json: Option<PathBuf>,

    /// YAML configuration file (version: 1)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Table)]
    format: ReportFormat,

    /// Role family to analyse (job_title_short)
    #[arg(long, global = true)]
    role: Option<String>,

    /// Count on-site postings in demand, salary and optimal reports
    #[arg(long, global = true)]
    include_onsite: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Highest-paying postings
    TopPostings {
        /// Number of postings
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Location to match instead of the remote sentinel
        #[arg(long)]
        location: Option<String>,
    },

    /// Skills required by the highest-paying postings
    TopPostingSkills {
        /// Number of postings
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Location to match instead of the remote sentinel
        #[arg(long)]
        location: Option<String>,
    },

    /// How often each skill appears among the highest-paying postings
    SkillFrequency {
        /// Number of skills
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Number of top-paying postings to inspect
        #[arg(long, allow_negative_numbers = true)]
        postings: Option<i64>,

        /// Location to match instead of the remote sentinel
        #[arg(long)]
        location: Option<String>,
    },

    /// Most in-demand skills
    Demand {
        /// Number of skills
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },

    /// Average salary per skill
    Salaries {
        /// Number of skills
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },

    /// Skills with both high demand and high salary
    Optimal {
        /// Number of skills
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Skills need strictly more postings than this
        #[arg(short, long, allow_negative_numbers = true)]
        threshold: Option<i64>,
    },

    /// Every report
    All,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AnalyticsConfig::from_yaml(path)?,
        None => AnalyticsConfig::default(),
    };
    if let Some(role) = &cli.role {
        config.base.role = role.clone();
    }
    if cli.include_onsite {
        config.base.remote_only = false;
    }
    config.validate()?;
    info!("configuration: {}", config.describe());

    let source = open_source(&cli)?;
    let timeout = Duration::from_secs(config.load.timeout_seconds);
    let store = DatasetStore::load_with_timeout(source.as_ref(), timeout).await?;

    let usecase = SkillQueryUseCaseImpl::from_config(&config);
    let output = run_command(&cli, &config, &usecase, &store)?;
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn run_command(
    cli: &Cli,
    config: &AnalyticsConfig,
    usecase: &SkillQueryUseCaseImpl,
    store: &DatasetStore,
) -> Result<String, AnalyticsError> {
    let format = cli.format;

    match &cli.command {
        Commands::TopPostings { limit, location } => {
            let params = top_postings_params(config, *limit, location.as_deref());
            render(&usecase.top_paying_postings(store, &params)?, format)
        }
        Commands::TopPostingSkills { limit, location } => {
            let params = top_postings_params(config, *limit, location.as_deref());
            render(&usecase.top_paying_posting_skills(store, &params)?, format)
        }
        Commands::SkillFrequency {
            limit,
            postings,
            location,
        } => {
            let mut params = SkillFrequencyParams::from_config(config);
            params.postings = top_postings_params(config, *postings, location.as_deref());
            if let Some(limit) = limit {
                params.limit = *limit;
            }
            render(&usecase.top_paying_skill_frequency(store, &params)?, format)
        }
        Commands::Demand { limit } => {
            let mut params = SkillRankParams::demand(config);
            if let Some(limit) = limit {
                params.limit = *limit;
            }
            render(&usecase.skill_demand(store, &params)?, format)
        }
        Commands::Salaries { limit } => {
            let mut params = SkillRankParams::salaries(config);
            if let Some(limit) = limit {
                params.limit = *limit;
            }
            render(&usecase.skill_salaries(store, &params)?, format)
        }
        Commands::Optimal { limit, threshold } => {
            let mut params = OptimalSkillsParams::from_config(config);
            if let Some(limit) = limit {
                params.limit = *limit;
            }
            if let Some(threshold) = threshold {
                params.demand_threshold = *threshold;
            }
            render(&usecase.optimal_skills(store, &params)?, format)
        }
        Commands::All => render_report(&usecase.run_all(store, config)?, format),
    }
}

fn top_postings_params(
    config: &AnalyticsConfig,
    limit: Option<i64>,
    location: Option<&str>,
) -> TopPostingsParams {
    let mut params = TopPostingsParams::from_config(config);
    if let Some(limit) = limit {
        params.limit = limit;
    }
    if let Some(location) = location {
        params.filter = params.filter.location(location);
    }
    params
}

fn open_source(cli: &Cli) -> Result<Box<dyn DatasetSource>, Box<dyn std::error::Error>> {
    if let Some(path) = &cli.json {
        return Ok(Box::new(JsonSnapshotSource::from_path(path)));
    }

    match &cli.sqlite {
        #[cfg(feature = "sqlite")]
        Some(path) => Ok(Box::new(skillgraph_analytics::SqliteSource::new(path))),
        #[cfg(not(feature = "sqlite"))]
        Some(_) => Err("this build has no SQLite support (enable the `sqlite` feature)".into()),
        None => Err("one of --sqlite or --json is required".into()),
    }
}
