//! In-memory DatasetSource

use async_trait::async_trait;

use crate::domain::{Company, DatasetSource, Posting, PostingSkillLink, Skill};
use crate::Result;

/// DatasetSource over caller-owned vectors
///
/// Each load hands out a clone, so the same source can back several stores.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pub postings: Vec<Posting>,
    pub companies: Vec<Company>,
    pub skills: Vec<Skill>,
    pub links: Vec<PostingSkillLink>,
}

impl InMemorySource {
    pub fn new(
        postings: Vec<Posting>,
        companies: Vec<Company>,
        skills: Vec<Skill>,
        links: Vec<PostingSkillLink>,
    ) -> Self {
        Self {
            postings,
            companies,
            skills,
            links,
        }
    }
}

#[async_trait]
impl DatasetSource for InMemorySource {
    async fn load_postings(&self) -> Result<Vec<Posting>> {
        Ok(self.postings.clone())
    }

    async fn load_companies(&self) -> Result<Vec<Company>> {
        Ok(self.companies.clone())
    }

    async fn load_skills(&self) -> Result<Vec<Skill>> {
        Ok(self.skills.clone())
    }

    async fn load_links(&self) -> Result<Vec<PostingSkillLink>> {
        Ok(self.links.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory source ({} postings)", self.postings.len())
    }
}
