// SkillJoin - Posting → skill expansion
//
// Inner join on skills: a posting with no linked skills yields no pairs.
// Left join on companies: a missing or unresolved company yields `None`.

use skillgraph_storage::{DatasetStore, Posting, Skill};

/// One (posting, skill) pair, optionally enriched with the company name
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillPair<'a> {
    pub posting: &'a Posting,
    pub skill: &'a Skill,
    pub company_name: Option<&'a str>,
}

/// Join builder over a store
///
/// Example:
/// ```
/// use skillgraph_analytics::features::query_engine::{PostingFilter, SkillJoin};
/// use skillgraph_storage::{Company, DatasetStore, Posting, PostingSkillLink, Skill};
///
/// let store = DatasetStore::from_parts(
///     vec![Posting::new(1, "Data Analyst", "Data Analyst").with_company(10)],
///     vec![Company::new(10, "Acme")],
///     vec![Skill::new(1, "sql"), Skill::new(2, "python")],
///     vec![PostingSkillLink::new(1, 1), PostingSkillLink::new(1, 2)],
/// )?;
/// let filter = PostingFilter::all().role("Data Analyst");
///
/// let pairs: Vec<_> = SkillJoin::new(&store)
///     .with_company()
///     .expand(filter.apply(&store))
///     .collect();
/// assert_eq!(pairs.len(), 2);
/// assert_eq!(pairs[0].company_name, Some("Acme"));
/// # Ok::<(), skillgraph_storage::StorageError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SkillJoin<'a> {
    store: &'a DatasetStore,
    with_company: bool,
}

impl<'a> SkillJoin<'a> {
    pub fn new(store: &'a DatasetStore) -> Self {
        Self {
            store,
            with_company: false,
        }
    }

    /// Attach the owning company's display name to each pair
    pub fn with_company(mut self) -> Self {
        self.with_company = true;
        self
    }

    /// Expand postings into pairs, preserving posting order then link order
    pub fn expand<I>(self, postings: I) -> impl Iterator<Item = SkillPair<'a>> + 'a
    where
        I: IntoIterator<Item = &'a Posting>,
        I::IntoIter: 'a,
    {
        let store = self.store;
        let with_company = self.with_company;

        postings.into_iter().flat_map(move |posting| {
            let company_name = if with_company {
                company_name(store, posting)
            } else {
                None
            };
            store.skills_of(posting.id).map(move |skill| SkillPair {
                posting,
                skill,
                company_name,
            })
        })
    }
}

/// Display name of the posting's company (left-join semantics)
pub fn company_name<'a>(store: &'a DatasetStore, posting: &Posting) -> Option<&'a str> {
    store.company_of(posting).map(|company| company.name.as_str())
}
