// Composition - Demand × salary join for the optimal skills ranking
//
// Inner join on skill id: a skill missing from either aggregate is dropped.
// The demand filter is strict (`demand_count > threshold`).

use rustc_hash::FxHashMap;
use skillgraph_storage::SkillId;

use super::aggregation::{SkillAverage, SkillCount};

/// A skill present in both aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposedSkill {
    pub skill_id: SkillId,
    pub demand_count: u64,
    pub avg_salary: u64,
}

/// Join demand counts with average salaries and keep skills above `threshold`
///
/// Output follows the order of `demand`.
pub fn compose(demand: &[SkillCount], salaries: &[SkillAverage], threshold: u64) -> Vec<ComposedSkill> {
    let salary_by_skill: FxHashMap<SkillId, u64> = salaries
        .iter()
        .map(|average| (average.skill_id, average.avg_salary))
        .collect();

    demand
        .iter()
        .filter(|count| count.demand_count > threshold)
        .filter_map(|count| {
            salary_by_skill
                .get(&count.skill_id)
                .map(|&avg_salary| ComposedSkill {
                    skill_id: count.skill_id,
                    demand_count: count.demand_count,
                    avg_salary,
                })
        })
        .collect()
}
