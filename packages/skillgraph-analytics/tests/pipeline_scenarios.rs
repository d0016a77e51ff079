//! End-to-end report scenarios
//!
//! Each test loads a small dataset and checks full report output, including
//! ordering and tie-breaks.

mod common;

use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use common::*;
use pretty_assertions::assert_eq;
use skillgraph_analytics::config::ParallelConfig;
use skillgraph_analytics::features::query_engine::{average_salaries, demand_counts};
use skillgraph_analytics::{
    AnalyticsConfig, AnalyticsError, DatasetSource, DatasetStore, JsonSnapshotSource,
    OptimalSkillsParams, PostingFilter, SkillFrequencyParams, SkillQueryUseCase,
    SkillQueryUseCaseImpl, SkillRankParams, TopPostingsParams,
};
use skillgraph_storage::{Company, ErrorKind, Posting, PostingSkillLink, Skill};
use tempfile::NamedTempFile;

fn usecase() -> SkillQueryUseCaseImpl {
    SkillQueryUseCaseImpl::with_parallel(ParallelConfig::sequential())
}

fn demand_summary(store: &DatasetStore, params: &SkillRankParams) -> Vec<(String, u64)> {
    usecase()
        .skill_demand(store, params)
        .unwrap()
        .into_iter()
        .map(|row| (row.skill, row.demand_count))
        .collect()
}

fn salary_summary(store: &DatasetStore, params: &SkillRankParams) -> Vec<(String, u64)> {
    usecase()
        .skill_salaries(store, params)
        .unwrap()
        .into_iter()
        .map(|row| (row.skill, row.avg_salary))
        .collect()
}

fn owned(rows: &[(&str, u64)]) -> Vec<(String, u64)> {
    rows.iter().map(|(skill, n)| (skill.to_string(), *n)).collect()
}

// ============================================================================
// Aggregation scenarios
// ============================================================================

#[test]
fn scenario_a_demand_counts_null_salary_postings() {
    let store = scenario_a();
    let params = SkillRankParams {
        filter: PostingFilter::remote_role("Data Analyst"),
        limit: 10,
    };

    assert_eq!(
        demand_summary(&store, &params),
        owned(&[("python", 2), ("sql", 2)])
    );
}

#[test]
fn scenario_a_average_excludes_null_salary() {
    let store = scenario_a();
    let params = SkillRankParams {
        filter: PostingFilter::remote_role("Data Analyst"),
        limit: 10,
    };

    // sql: mean of 300000 and 100000; python: only the salaried posting
    assert_eq!(
        salary_summary(&store, &params),
        owned(&[("sql", 200_000), ("python", 100_000)])
    );
}

#[test]
fn scenario_b_threshold_is_strict() {
    let store = scenario_b();
    let params = OptimalSkillsParams {
        demand_threshold: 2,
        ..OptimalSkillsParams::default()
    };

    let rows = usecase().optimal_skills(&store, &params).unwrap();
    let summary: Vec<_> = rows
        .iter()
        .map(|row| (row.skill.as_str(), row.demand_count, row.avg_salary))
        .collect();
    assert_eq!(summary, vec![("sql", 3, 90_000)]);

    let params = OptimalSkillsParams {
        demand_threshold: 1,
        ..OptimalSkillsParams::default()
    };
    let rows = usecase().optimal_skills(&store, &params).unwrap();
    let summary: Vec<_> = rows.iter().map(|row| row.skill.as_str()).collect();
    // tableau averages 100000, sql 90000
    assert_eq!(summary, vec!["tableau", "sql"]);
}

#[test]
fn scenario_c_limits() {
    let store = mixed_market();
    let config = AnalyticsConfig::default();

    let mut params = SkillRankParams::demand(&config);
    params.limit = 0;
    assert!(usecase().skill_demand(&store, &params).unwrap().is_empty());

    params.limit = 1_000;
    assert_eq!(
        demand_summary(&store, &params),
        owned(&[("sql", 4), ("excel", 2), ("python", 2), ("tableau", 1)])
    );
}

#[test]
fn rounding_is_half_up() {
    let store = DatasetBuilder::new()
        .skill(SQL, "sql")
        .analyst(1, Some(100_000.0), &[SQL])
        .analyst(2, Some(100_001.0), &[SQL])
        .build();

    let averages = average_salaries(
        &store,
        &PostingFilter::all(),
        &ParallelConfig::sequential(),
    );
    assert_eq!(averages[0].avg_salary, 100_001);
}

#[test]
fn rounding_applies_to_the_exact_mean() {
    let store = DatasetBuilder::new()
        .skill(SQL, "sql")
        .analyst(1, Some(100.499), &[SQL])
        .build();

    let averages = average_salaries(
        &store,
        &PostingFilter::all(),
        &ParallelConfig::sequential(),
    );
    assert_eq!(averages[0].avg_salary, 100);
}

#[test]
fn duplicate_links_do_not_inflate_demand() {
    let store = DatasetBuilder::new()
        .skill(SQL, "sql")
        .analyst(1, Some(100_000.0), &[SQL, SQL])
        .analyst(2, Some(50_000.0), &[SQL])
        .link(2, SQL)
        .build();

    assert_eq!(store.stats().duplicate_links, 2);

    let counts = demand_counts(&store, &PostingFilter::all(), &ParallelConfig::sequential());
    assert_eq!(counts[0].demand_count, 2);

    let averages = average_salaries(&store, &PostingFilter::all(), &ParallelConfig::sequential());
    assert_eq!(averages[0].avg_salary, 75_000);
}

#[test]
fn postings_without_skills_drop_out_of_joins() {
    let store = DatasetBuilder::new()
        .skill(SQL, "sql")
        .analyst(1, Some(250_000.0), &[])
        .analyst(2, Some(100_000.0), &[SQL])
        .build();

    let top = usecase()
        .top_paying_postings(&store, &TopPostingsParams::default())
        .unwrap();
    assert_eq!(top.len(), 2);

    let skills = usecase()
        .top_paying_posting_skills(&store, &TopPostingsParams::default())
        .unwrap();
    let ids: Vec<_> = skills.iter().map(|row| row.posting_id).collect();
    assert_eq!(ids, vec![2]);
}

// ============================================================================
// Full report set
// ============================================================================

#[test]
fn mixed_market_reports() {
    let store = mixed_market();
    let report = usecase().run_all(&store, &AnalyticsConfig::default()).unwrap();

    let top: Vec<_> = report
        .top_paying_postings
        .iter()
        .map(|row| (row.posting_id, row.salary_year_avg))
        .collect();
    assert_eq!(
        top,
        vec![(4, 150_000.0), (1, 120_000.0), (2, 95_000.0), (5, 80_500.0)]
    );

    let skills: Vec<_> = report
        .top_paying_posting_skills
        .iter()
        .map(|row| (row.posting_id, row.skill.as_str()))
        .collect();
    assert_eq!(
        skills,
        vec![
            (4, "python"),
            (1, "python"),
            (1, "sql"),
            (2, "excel"),
            (2, "sql"),
            (5, "sql"),
        ]
    );

    let frequency: Vec<_> = report
        .top_paying_skill_frequency
        .iter()
        .map(|row| (row.skill.as_str(), row.count))
        .collect();
    assert_eq!(frequency, vec![("sql", 3), ("python", 2), ("excel", 1)]);

    let salaries: Vec<_> = report
        .skill_salaries
        .iter()
        .map(|row| (row.skill.as_str(), row.avg_salary))
        .collect();
    assert_eq!(
        salaries,
        vec![("python", 135_000), ("sql", 98_500), ("excel", 95_000)]
    );

    // default threshold of 10 leaves nothing in a small market
    assert!(report.optimal_skills.is_empty());
}

#[test]
fn mixed_market_optimal_skills() {
    let store = mixed_market();
    let params = OptimalSkillsParams {
        demand_threshold: 1,
        ..OptimalSkillsParams::default()
    };

    let rows = usecase().optimal_skills(&store, &params).unwrap();
    let summary: Vec<_> = rows
        .iter()
        .map(|row| (row.skill.as_str(), row.demand_count, row.avg_salary))
        .collect();
    assert_eq!(summary, vec![("python", 2, 135_000), ("sql", 3, 98_500)]);
}

#[test]
fn optimal_sides_are_independent() {
    let store = mixed_market();
    // demand over every analyst posting, salary over salaried remote ones
    let params = OptimalSkillsParams {
        demand_filter: PostingFilter::all().role("Data Analyst"),
        salary_filter: PostingFilter::remote_role("Data Analyst").salary_present(),
        demand_threshold: 2,
        limit: 25,
    };

    let rows = usecase().optimal_skills(&store, &params).unwrap();
    let summary: Vec<_> = rows
        .iter()
        .map(|row| (row.skill.as_str(), row.demand_count, row.avg_salary))
        .collect();
    // tableau has no salaried posting and is dropped by the join
    assert_eq!(summary, vec![("sql", 5, 98_500), ("excel", 3, 95_000)]);
}

#[test]
fn include_onsite_widens_the_base_set() {
    let store = mixed_market();
    let config = AnalyticsConfig::new().base(|mut base| {
        base.remote_only = false;
        base
    });

    assert_eq!(
        demand_summary(&store, &SkillRankParams::demand(&config)),
        owned(&[("sql", 5), ("excel", 3), ("python", 2), ("tableau", 1)])
    );
}

#[test]
fn role_is_configurable() {
    let store = mixed_market();
    let config = AnalyticsConfig::new().base(|mut base| {
        base.role = "Data Engineer".to_string();
        base
    });

    let report = usecase().run_all(&store, &config).unwrap();
    let ids: Vec<_> = report
        .top_paying_postings
        .iter()
        .map(|row| row.posting_id)
        .collect();
    assert_eq!(ids, vec![6]);
    assert_eq!(report.skill_demand.len(), 1);
}

#[test]
fn invalid_parameters_fail_before_work() {
    let store = mixed_market();

    let err = usecase()
        .optimal_skills(
            &store,
            &OptimalSkillsParams {
                demand_threshold: -1,
                ..OptimalSkillsParams::default()
            },
        )
        .unwrap_err();
    assert!(err.is_parameter_error());

    let err = usecase()
        .top_paying_skill_frequency(
            &store,
            &SkillFrequencyParams {
                limit: -3,
                ..SkillFrequencyParams::default()
            },
        )
        .unwrap_err();
    assert!(err.is_parameter_error());
}

#[test]
fn empty_store_gives_empty_reports() {
    let store = DatasetBuilder::new().build();
    let report = usecase().run_all(&store, &AnalyticsConfig::default()).unwrap();
    assert!(report.top_paying_postings.is_empty());
    assert!(report.skill_demand.is_empty());
    assert!(report.skill_salaries.is_empty());
    assert!(report.optimal_skills.is_empty());
}

// ============================================================================
// Parallel aggregation
// ============================================================================

#[test]
fn parallel_and_sequential_reports_match() {
    let store = generated_market(3_000, 12);
    let config = AnalyticsConfig::default();

    let sequential = SkillQueryUseCaseImpl::with_parallel(ParallelConfig::sequential())
        .run_all(&store, &config)
        .unwrap();

    for partitions in [2, 3, 8] {
        let parallel = SkillQueryUseCaseImpl::with_parallel(ParallelConfig {
            enable_rayon: true,
            partitions,
            min_postings: 0,
        })
        .run_all(&store, &config)
        .unwrap();
        assert_eq!(parallel, sequential);
    }

    assert!(!sequential.optimal_skills.is_empty());
}

// ============================================================================
// Loading
// ============================================================================

#[tokio::test]
async fn json_snapshot_file_end_to_end() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(snapshot_json().as_bytes()).unwrap();

    let source = JsonSnapshotSource::from_path(file.path());
    let store = DatasetStore::load(&source).await.unwrap();
    let config = AnalyticsConfig::default();

    assert_eq!(
        demand_summary(&store, &SkillRankParams::demand(&config)),
        owned(&[("excel", 2), ("sql", 2)])
    );
    assert_eq!(
        salary_summary(&store, &SkillRankParams::salaries(&config)),
        owned(&[("sql", 115_000), ("excel", 90_000)])
    );

    let top = usecase()
        .top_paying_postings(&store, &TopPostingsParams::from_config(&config))
        .unwrap();
    let companies: Vec<_> = top.iter().map(|row| row.company_name.as_deref()).collect();
    assert_eq!(companies, vec![Some("Acme"), None]);
}

#[tokio::test]
async fn referential_integrity_violation_is_a_load_error() {
    let source = DatasetBuilder::new()
        .skill(SQL, "sql")
        .analyst(1, Some(1.0), &[SQL])
        .link(1, 99)
        .source();

    async fn load(source: &dyn DatasetSource) -> skillgraph_analytics::Result<DatasetStore> {
        Ok(DatasetStore::load(source).await?)
    }

    match load(&source).await {
        Err(AnalyticsError::Load(err)) => {
            assert_eq!(err.kind, ErrorKind::ReferentialIntegrity);
            assert!(err.message.contains("99"));
        }
        other => panic!("expected a load error, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_company_and_bad_salary_are_rejected() {
    let source = DatasetBuilder::new()
        .company(1, "Acme")
        .posting(Posting::new(1, "Analyst", "Data Analyst").with_company(2))
        .source();
    let err = DatasetStore::load(&source).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ReferentialIntegrity);

    let source = DatasetBuilder::new()
        .posting(Posting::new(1, "Analyst", "Data Analyst").with_salary(-5.0))
        .source();
    let err = DatasetStore::load(&source).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedRecord);
}

struct StalledSource;

#[async_trait]
impl DatasetSource for StalledSource {
    async fn load_postings(&self) -> skillgraph_storage::Result<Vec<Posting>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Vec::new())
    }

    async fn load_companies(&self) -> skillgraph_storage::Result<Vec<Company>> {
        Ok(Vec::new())
    }

    async fn load_skills(&self) -> skillgraph_storage::Result<Vec<Skill>> {
        Ok(Vec::new())
    }

    async fn load_links(&self) -> skillgraph_storage::Result<Vec<PostingSkillLink>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn stalled_load_times_out() {
    let err = DatasetStore::load_with_timeout(&StalledSource, Duration::from_millis(20))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Timeout);
}
