// Skill aggregation - Demand counts and average salaries keyed by skill id
//
// Each posting contributes once per linked skill (the store already collapses
// duplicate links), so `demand_count` is a distinct-posting count.
//
// Salaries accumulate as exact binary fixed-point sums (SALARY_FRACTION_BITS
// fractional bits), and the mean is rounded once, half-up, at the end. Partial
// accumulators combine by adding numerators and denominators separately, which
// keeps the partitioned map-reduce path bit-identical to the sequential scan.

use std::hash::Hasher;
use std::time::Instant;

use rustc_hash::{FxHashMap, FxHasher};
use serde::Serialize;
use skillgraph_storage::{DatasetStore, Posting, PostingId, SkillId};
use tracing::debug;

use super::filter::PostingFilter;
use super::join::SkillJoin;
use crate::config::ParallelConfig;

/// Per-skill partial sums
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkillAccumulator {
    /// Distinct postings linking to the skill
    pub postings: u64,
    /// Postings that carry a salary
    pub salaried: u64,
    /// Sum of those salaries, fixed point with `SALARY_FRACTION_BITS`
    pub salary_sum: u128,
}

impl SkillAccumulator {
    fn add(&mut self, posting: &Posting) {
        self.postings += 1;
        if let Some(salary) = posting.salary_year_avg {
            self.salaried += 1;
            self.salary_sum = self.salary_sum.saturating_add(to_fixed(salary));
        }
    }

    pub fn merge(&mut self, other: &SkillAccumulator) {
        self.postings += other.postings;
        self.salaried += other.salaried;
        self.salary_sum = self.salary_sum.saturating_add(other.salary_sum);
    }

    /// Mean salary in whole currency units, `None` without salaried postings
    pub fn avg_salary(&self) -> Option<u64> {
        round_half_up(self.salary_sum, self.salaried)
    }
}

/// Demand count of one skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkillCount {
    pub skill_id: SkillId,
    pub demand_count: u64,
}

/// Average salary of one skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkillAverage {
    pub skill_id: SkillId,
    pub avg_salary: u64,
    /// Postings the average is taken over
    pub salaried_postings: u64,
}

/// Combined per-skill aggregates over one filtered posting set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillAggregates {
    per_skill: FxHashMap<SkillId, SkillAccumulator>,
    postings_scanned: usize,
}

impl SkillAggregates {
    pub fn get(&self, skill_id: SkillId) -> Option<&SkillAccumulator> {
        self.per_skill.get(&skill_id)
    }

    pub fn len(&self) -> usize {
        self.per_skill.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_skill.is_empty()
    }

    /// Postings that passed the filter
    pub fn postings_scanned(&self) -> usize {
        self.postings_scanned
    }

    /// Demand per skill, ascending skill id
    pub fn demand_counts(&self) -> Vec<SkillCount> {
        self.sorted()
            .into_iter()
            .map(|(skill_id, acc)| SkillCount {
                skill_id,
                demand_count: acc.postings,
            })
            .collect()
    }

    /// Average salary per skill, ascending skill id; skills without salaried
    /// postings are left out
    pub fn average_salaries(&self) -> Vec<SkillAverage> {
        self.sorted()
            .into_iter()
            .filter_map(|(skill_id, acc)| {
                acc.avg_salary().map(|avg_salary| SkillAverage {
                    skill_id,
                    avg_salary,
                    salaried_postings: acc.salaried,
                })
            })
            .collect()
    }

    fn sorted(&self) -> Vec<(SkillId, SkillAccumulator)> {
        let mut entries: Vec<_> = self.per_skill.iter().map(|(&id, &acc)| (id, acc)).collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        entries
    }

    fn merge(mut self, other: SkillAggregates) -> SkillAggregates {
        self.postings_scanned += other.postings_scanned;
        for (skill_id, acc) in other.per_skill {
            self.per_skill.entry(skill_id).or_default().merge(&acc);
        }
        self
    }
}

/// Aggregate the postings selected by `filter`
///
/// Uses the partitioned path when rayon is enabled and the filtered input
/// reaches `parallel.min_postings`.
pub fn aggregate(
    store: &DatasetStore,
    filter: &PostingFilter,
    parallel: &ParallelConfig,
) -> SkillAggregates {
    let start = Instant::now();
    let postings: Vec<&Posting> = filter.apply(store).collect();
    let join = SkillJoin::new(store);

    let partitions = parallel.resolved_partitions();
    let aggregates =
        if parallel.enable_rayon && partitions > 1 && postings.len() >= parallel.min_postings {
            aggregate_partitioned(join, &postings, partitions)
        } else {
            accumulate(join, &postings)
        };

    debug!(
        "aggregated {} postings into {} skills in {}µs",
        aggregates.postings_scanned,
        aggregates.len(),
        start.elapsed().as_micros()
    );
    aggregates
}

/// Demand counts over the postings selected by `filter`
pub fn demand_counts(
    store: &DatasetStore,
    filter: &PostingFilter,
    parallel: &ParallelConfig,
) -> Vec<SkillCount> {
    aggregate(store, filter, parallel).demand_counts()
}

/// Average salaries over the postings selected by `filter`
pub fn average_salaries(
    store: &DatasetStore,
    filter: &PostingFilter,
    parallel: &ParallelConfig,
) -> Vec<SkillAverage> {
    aggregate(store, filter, parallel).average_salaries()
}

/// Fold the (posting, skill) pairs of `postings` into per-skill accumulators
fn accumulate<'a>(join: SkillJoin<'a>, postings: &'a [&'a Posting]) -> SkillAggregates {
    let mut aggregates = SkillAggregates {
        postings_scanned: postings.len(),
        ..SkillAggregates::default()
    };
    for pair in join.expand(postings.iter().copied()) {
        aggregates
            .per_skill
            .entry(pair.skill.id)
            .or_default()
            .add(pair.posting);
    }
    aggregates
}

/// Partition by hash of posting id, accumulate each partition, then combine
/// partials in partition order
fn aggregate_partitioned(
    join: SkillJoin<'_>,
    postings: &[&Posting],
    partitions: usize,
) -> SkillAggregates {
    let mut buckets: Vec<Vec<&Posting>> = vec![Vec::new(); partitions];
    for &posting in postings {
        buckets[partition_of(posting.id, partitions)].push(posting);
    }

    let partials = accumulate_buckets(join, &buckets);

    partials
        .into_iter()
        .fold(SkillAggregates::default(), SkillAggregates::merge)
}

#[cfg(feature = "parallel")]
fn accumulate_buckets(join: SkillJoin<'_>, buckets: &[Vec<&Posting>]) -> Vec<SkillAggregates> {
    use rayon::prelude::*;

    buckets
        .par_iter()
        .map(|bucket| accumulate(join, bucket))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn accumulate_buckets(join: SkillJoin<'_>, buckets: &[Vec<&Posting>]) -> Vec<SkillAggregates> {
    buckets.iter().map(|bucket| accumulate(join, bucket)).collect()
}

/// Partition index of a posting
pub fn partition_of(posting_id: PostingId, partitions: usize) -> usize {
    let mut hasher = FxHasher::default();
    hasher.write_u64(posting_id);
    (hasher.finish() % partitions.max(1) as u64) as usize
}

/// Fractional bits of the salary fixed-point representation
///
/// Every f64 at or above 1.0 has a unit in the last place of at least 2^-52,
/// so such salaries convert without loss.
pub const SALARY_FRACTION_BITS: u32 = 52;

/// Exact fixed-point value of a non-negative salary
///
/// Values below 1.0 round half-up to the nearest 2^-52. Values too large for
/// the representation saturate.
pub fn to_fixed(salary: f64) -> u128 {
    if !salary.is_finite() || salary <= 0.0 {
        return 0;
    }
    let bits = salary.to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, shift) = if exponent == 0 {
        // subnormal: fraction × 2^-1074
        (fraction, -1022)
    } else {
        (fraction | (1u64 << 52), exponent - 1023)
    };

    // value = mantissa × 2^(shift - 52); fixed = value × 2^52
    let mantissa = u128::from(mantissa);
    if shift > 75 {
        u128::MAX
    } else if shift >= 0 {
        mantissa << shift
    } else if shift < -54 {
        0
    } else {
        let drop = shift.unsigned_abs();
        (mantissa + (1u128 << (drop - 1))) >> drop
    }
}

/// Mean of `count` values whose fixed-point sum is `sum`, rounded half-up to
/// whole units
pub fn round_half_up(sum: u128, count: u64) -> Option<u64> {
    if count == 0 {
        return None;
    }
    let denominator = u128::from(count) << SALARY_FRACTION_BITS;
    let rounded = sum.saturating_add(denominator / 2) / denominator;
    Some(u64::try_from(rounded).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use skillgraph_storage::{PostingSkillLink, Skill};

    fn posting(id: u64, salary: Option<f64>) -> Posting {
        let posting = Posting::new(id, "Data Analyst", "Data Analyst").with_remote(true);
        match salary {
            Some(s) => posting.with_salary(s),
            None => posting,
        }
    }

    fn scenario_store() -> DatasetStore {
        let postings = vec![
            posting(1, Some(300_000.0)),
            posting(2, Some(100_000.0)),
            posting(3, None),
        ];
        let skills = vec![Skill::new(1, "sql"), Skill::new(2, "python")];
        let links = vec![
            PostingSkillLink::new(1, 1),
            PostingSkillLink::new(2, 1),
            PostingSkillLink::new(2, 2),
            PostingSkillLink::new(3, 2),
        ];
        DatasetStore::from_parts(postings, vec![], skills, links).unwrap()
    }

    fn fixed_sum(salaries: &[f64]) -> u128 {
        salaries.iter().map(|&s| to_fixed(s)).sum()
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(0, 0), None);
        assert_eq!(round_half_up(fixed_sum(&[100.5]), 1), Some(101));
        assert_eq!(round_half_up(fixed_sum(&[100.25]), 1), Some(100));
        assert_eq!(round_half_up(fixed_sum(&[300_000.0, 100_000.0]), 2), Some(200_000));
        // mean 100.25
        assert_eq!(round_half_up(fixed_sum(&[100.0, 100.5]), 2), Some(100));
        // mean 100.75
        assert_eq!(round_half_up(fixed_sum(&[100.5, 101.0]), 2), Some(101));
        // mean exactly 100.5
        assert_eq!(round_half_up(fixed_sum(&[100.0, 101.0]), 2), Some(101));
    }

    #[test]
    fn test_to_fixed_is_exact() {
        assert_eq!(to_fixed(0.0), 0);
        assert_eq!(to_fixed(1.0), 1u128 << SALARY_FRACTION_BITS);
        assert_eq!(to_fixed(0.5), 1u128 << (SALARY_FRACTION_BITS - 1));
        assert_eq!(to_fixed(155_000.0), 155_000u128 << SALARY_FRACTION_BITS);
        assert_eq!(to_fixed(f64::MAX), u128::MAX);
        assert_eq!(to_fixed(f64::MIN_POSITIVE), 0);
    }

    #[test]
    fn test_mean_rounds_once() {
        // 100.499 must not round to cents first and then up to 101
        let postings = vec![posting(1, Some(100.499))];
        let skills = vec![Skill::new(1, "sql")];
        let links = vec![PostingSkillLink::new(1, 1)];
        let store = DatasetStore::from_parts(postings, vec![], skills, links).unwrap();

        let averages =
            average_salaries(&store, &PostingFilter::all(), &ParallelConfig::sequential());
        assert_eq!(averages[0].avg_salary, 100);

        // mean of 100.249 and 100.749 is 100.499
        let postings = vec![posting(1, Some(100.249)), posting(2, Some(100.749))];
        let links = vec![PostingSkillLink::new(1, 1), PostingSkillLink::new(2, 1)];
        let store =
            DatasetStore::from_parts(postings, vec![], vec![Skill::new(1, "sql")], links).unwrap();
        let averages =
            average_salaries(&store, &PostingFilter::all(), &ParallelConfig::sequential());
        assert_eq!(averages[0].avg_salary, 100);
    }

    #[test]
    fn test_demand_counts_include_null_salary() {
        let store = scenario_store();
        let counts = demand_counts(&store, &PostingFilter::all(), &ParallelConfig::sequential());
        assert_eq!(
            counts,
            vec![
                SkillCount { skill_id: 1, demand_count: 2 },
                SkillCount { skill_id: 2, demand_count: 2 },
            ]
        );
    }

    #[test]
    fn test_average_excludes_null_salary() {
        let store = scenario_store();
        let averages =
            average_salaries(&store, &PostingFilter::all(), &ParallelConfig::sequential());
        assert_eq!(
            averages,
            vec![
                SkillAverage { skill_id: 1, avg_salary: 200_000, salaried_postings: 2 },
                SkillAverage { skill_id: 2, avg_salary: 100_000, salaried_postings: 1 },
            ]
        );
    }

    #[test]
    fn test_skill_without_salaries_is_excluded() {
        let postings = vec![posting(1, None)];
        let skills = vec![Skill::new(7, "excel")];
        let links = vec![PostingSkillLink::new(1, 7)];
        let store = DatasetStore::from_parts(postings, vec![], skills, links).unwrap();

        let aggregates = aggregate(&store, &PostingFilter::all(), &ParallelConfig::sequential());
        assert_eq!(aggregates.demand_counts().len(), 1);
        assert!(aggregates.average_salaries().is_empty());
    }

    #[test]
    fn test_partitioned_matches_sequential() {
        let postings: Vec<_> = (1..=200)
            .map(|id| posting(id, (id % 3 != 0).then(|| 50_000.0 + (id as f64) * 10.5)))
            .collect();
        let skills: Vec<_> = (1..=7).map(|id| Skill::new(id, format!("skill{id}"))).collect();
        let links: Vec<_> = (1..=200u64)
            .flat_map(|id| {
                (1..=7u64)
                    .filter(move |skill| id % skill == 0)
                    .map(move |skill| PostingSkillLink::new(id, skill))
            })
            .collect();
        let store = DatasetStore::from_parts(postings, vec![], skills, links).unwrap();

        let parallel = ParallelConfig {
            enable_rayon: true,
            partitions: 4,
            min_postings: 0,
        };
        let filter = PostingFilter::all();
        let partitioned = aggregate(&store, &filter, &parallel);
        let sequential = aggregate(&store, &filter, &ParallelConfig::sequential());

        assert_eq!(partitioned, sequential);
        assert_eq!(partitioned.postings_scanned(), 200);
    }

    #[test]
    fn test_partition_of_in_range() {
        for id in 0..1000 {
            assert!(partition_of(id, 7) < 7);
        }
        assert_eq!(partition_of(42, 0), 0);
    }

    #[test]
    fn test_filtered_input_only() {
        let store = scenario_store();
        let filter = PostingFilter::all().salary_present();
        let counts = demand_counts(&store, &filter, &ParallelConfig::sequential());
        assert_eq!(
            counts,
            vec![
                SkillCount { skill_id: 1, demand_count: 2 },
                SkillCount { skill_id: 2, demand_count: 1 },
            ]
        );
    }
}
