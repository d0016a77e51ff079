//! Test data builders

use skillgraph_analytics::{DatasetStore, InMemorySource};
use skillgraph_storage::{Company, Posting, PostingSkillLink, Skill, SkillId};

/// Builder for small datasets
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    pub postings: Vec<Posting>,
    pub companies: Vec<Company>,
    pub skills: Vec<Skill>,
    pub links: Vec<PostingSkillLink>,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skill(mut self, id: SkillId, name: &str) -> Self {
        self.skills.push(Skill::new(id, name));
        self
    }

    pub fn company(mut self, id: u64, name: &str) -> Self {
        self.companies.push(Company::new(id, name));
        self
    }

    /// Add a posting as-is
    pub fn posting(mut self, posting: Posting) -> Self {
        self.postings.push(posting);
        self
    }

    /// Add a remote "Data Analyst" posting linked to `skills`
    pub fn analyst(mut self, id: u64, salary: Option<f64>, skills: &[SkillId]) -> Self {
        let mut posting = Posting::new(id, format!("Data Analyst #{id}"), "Data Analyst")
            .with_location("Anywhere")
            .with_remote(true);
        if let Some(salary) = salary {
            posting = posting.with_salary(salary);
        }
        self.postings.push(posting);
        self.links
            .extend(skills.iter().map(|&skill| PostingSkillLink::new(id, skill)));
        self
    }

    pub fn link(mut self, posting_id: u64, skill_id: SkillId) -> Self {
        self.links.push(PostingSkillLink::new(posting_id, skill_id));
        self
    }

    pub fn build(self) -> DatasetStore {
        DatasetStore::from_parts(self.postings, self.companies, self.skills, self.links)
            .expect("fixture dataset must be valid")
    }

    pub fn source(self) -> InMemorySource {
        InMemorySource::new(self.postings, self.companies, self.skills, self.links)
    }
}
