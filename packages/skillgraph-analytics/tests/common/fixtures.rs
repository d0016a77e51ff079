//! Dataset fixtures

use skillgraph_analytics::DatasetStore;
use skillgraph_storage::{Posting, PostingSkillLink, Skill};

use super::DatasetBuilder;

pub const SQL: u64 = 1;
pub const PYTHON: u64 = 2;
pub const TABLEAU: u64 = 3;
pub const EXCEL: u64 = 4;

/// Three remote analyst postings:
/// 300000 → sql, 100000 → sql + python, no salary → python
pub fn scenario_a() -> DatasetStore {
    DatasetBuilder::new()
        .skill(SQL, "SQL")
        .skill(PYTHON, "Python")
        .analyst(1, Some(300_000.0), &[SQL])
        .analyst(2, Some(100_000.0), &[SQL, PYTHON])
        .analyst(3, None, &[PYTHON])
        .build()
}

/// tableau appears in exactly two salaried postings, sql in three
pub fn scenario_b() -> DatasetStore {
    DatasetBuilder::new()
        .skill(SQL, "sql")
        .skill(TABLEAU, "tableau")
        .analyst(1, Some(90_000.0), &[SQL, TABLEAU])
        .analyst(2, Some(110_000.0), &[SQL, TABLEAU])
        .analyst(3, Some(70_000.0), &[SQL])
        .build()
}

/// Four skills with distinct demand, plus postings from other roles
/// and on-site postings that the default filters exclude
pub fn mixed_market() -> DatasetStore {
    DatasetBuilder::new()
        .company(1, "Acme")
        .company(2, "Globex")
        .skill(SQL, "sql")
        .skill(PYTHON, "python")
        .skill(TABLEAU, "tableau")
        .skill(EXCEL, "excel")
        .analyst(1, Some(120_000.0), &[SQL, PYTHON])
        .analyst(2, Some(95_000.0), &[SQL, EXCEL])
        .analyst(3, None, &[SQL, TABLEAU, EXCEL])
        .analyst(4, Some(150_000.0), &[PYTHON])
        .analyst(5, Some(80_500.0), &[SQL])
        .posting(
            Posting::new(6, "Data Engineer", "Data Engineer")
                .with_location("Anywhere")
                .with_remote(true)
                .with_salary(500_000.0),
        )
        .link(6, PYTHON)
        .posting(
            Posting::new(7, "Analyst (on-site)", "Data Analyst")
                .with_location("Austin, TX")
                .with_salary(200_000.0)
                .with_company(1),
        )
        .link(7, EXCEL)
        .link(7, SQL)
        .build()
}

/// Deterministic dataset of `postings` analyst postings over `skills` skills
pub fn generated_market(postings: u64, skills: u64) -> DatasetStore {
    let mut builder = DatasetBuilder::new();
    for id in 1..=skills {
        builder = builder.skill(id, &format!("skill-{id:03}"));
    }

    for id in 1..=postings {
        let salary = (id % 4 != 0).then(|| 40_000.0 + ((id * 7_919) % 160_000) as f64 + 0.5);
        let remote = id % 3 != 0;
        let mut posting = Posting::new(id, format!("Analyst {id}"), "Data Analyst").with_remote(remote);
        if remote {
            posting = posting.with_location("Anywhere");
        }
        if let Some(salary) = salary {
            posting = posting.with_salary(salary);
        }
        builder = builder.posting(posting);

        for skill in 1..=skills {
            if (id * 31 + skill * 17) % (skill + 2) == 0 {
                builder = builder.link(id, skill);
            }
        }
    }
    builder.build()
}

/// JSON snapshot document for the file source tests
pub fn snapshot_json() -> &'static str {
    r#"{
  "postings": [
    {"id": 1, "title": "Senior Data Analyst", "title_short": "Data Analyst",
     "location": "Anywhere", "work_from_home": true, "salary_year_avg": 140000.0,
     "posted_at": "2023-03-01T09:00:00", "company_id": 1},
    {"id": 2, "title": "Data Analyst", "title_short": "Data Analyst",
     "location": "Anywhere", "work_from_home": true, "salary_year_avg": 90000.0,
     "posted_at": "2023-03-02T09:00:00"},
    {"id": 3, "title": "Junior Data Analyst", "title_short": "Data Analyst",
     "location": "Anywhere", "work_from_home": true,
     "posted_at": "2023-03-03T09:00:00", "company_id": 1}
  ],
  "companies": [{"id": 1, "name": "Acme"}],
  "skills": [
    {"id": 1, "name": "SQL", "category": "programming"},
    {"id": 2, "name": " Excel ", "category": "analyst_tools"}
  ],
  "links": [
    {"posting_id": 1, "skill_id": 1},
    {"posting_id": 2, "skill_id": 1},
    {"posting_id": 2, "skill_id": 2},
    {"posting_id": 3, "skill_id": 2}
  ]
}"#
}

/// Links of the store, for rebuilding it in another order
pub fn links_of(store: &DatasetStore) -> Vec<PostingSkillLink> {
    store
        .postings()
        .flat_map(|posting| {
            store
                .skill_ids_of(posting.id)
                .iter()
                .map(move |&skill| PostingSkillLink::new(posting.id, skill))
        })
        .collect()
}

/// Skills of the store, ascending id
pub fn skills_of(store: &DatasetStore) -> Vec<Skill> {
    let mut skills: Vec<Skill> = store.skills().cloned().collect();
    skills.sort_by_key(|skill| skill.id);
    skills
}
