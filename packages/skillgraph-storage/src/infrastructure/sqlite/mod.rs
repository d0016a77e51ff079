//! SQLite adapter for DatasetSource
//!
//! Reads the job-postings star schema:
//!
//! - `job_postings_fact` (one row per posting)
//! - `company_dim`
//! - `skills_dim`
//! - `skills_job_dim` (posting ↔ skill bridge)
//!
//! Every load call opens its own read-only connection on a blocking task and
//! drops it before returning, whatever the outcome.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::domain::{Company, DatasetSource, Posting, PostingSkillLink, Skill};
use crate::error::StorageError;
use crate::Result;

/// DDL for the source schema (columns the loader does not read are kept so
/// that dumps of the original dataset load unchanged)
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS company_dim (
    company_id INTEGER PRIMARY KEY,
    name TEXT,
    link TEXT,
    link_google TEXT,
    thumbnail TEXT
);
CREATE TABLE IF NOT EXISTS skills_dim (
    skill_id INTEGER PRIMARY KEY,
    skills TEXT,
    type TEXT
);
CREATE TABLE IF NOT EXISTS job_postings_fact (
    job_id INTEGER PRIMARY KEY,
    company_id INTEGER,
    job_title_short TEXT,
    job_title TEXT,
    job_location TEXT,
    job_via TEXT,
    job_schedule_type TEXT,
    job_work_from_home BOOLEAN,
    search_location TEXT,
    job_posted_date TIMESTAMP,
    job_no_degree_mention BOOLEAN,
    job_health_insurance BOOLEAN,
    job_country TEXT,
    salary_rate TEXT,
    salary_year_avg NUMERIC,
    salary_hour_avg NUMERIC
);
CREATE TABLE IF NOT EXISTS skills_job_dim (
    job_id INTEGER,
    skill_id INTEGER
);
"#;

/// DatasetSource over a SQLite database file
#[derive(Debug, Clone)]
pub struct SqliteSource {
    path: PathBuf,
}

impl SqliteSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create the source schema in `conn` (idempotent)
    pub fn create_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Run `read` against a fresh read-only connection on the blocking pool
    async fn with_connection<T, F>(&self, read: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = Connection::open_with_flags(
                &path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            read(&conn)
        })
        .await
        .map_err(|err| {
            StorageError::database(format!("SQLite load task failed: {}", err)).with_source(err)
        })?
    }
}

#[async_trait]
impl DatasetSource for SqliteSource {
    async fn load_postings(&self) -> Result<Vec<Posting>> {
        self.with_connection(read_postings).await
    }

    async fn load_companies(&self) -> Result<Vec<Company>> {
        self.with_connection(read_companies).await
    }

    async fn load_skills(&self) -> Result<Vec<Skill>> {
        self.with_connection(read_skills).await
    }

    async fn load_links(&self) -> Result<Vec<PostingSkillLink>> {
        self.with_connection(read_links).await
    }

    fn describe(&self) -> String {
        format!("SQLite database {}", self.path.display())
    }
}

struct PostingRow {
    job_id: i64,
    company_id: Option<i64>,
    title_short: Option<String>,
    title: Option<String>,
    location: Option<String>,
    via: Option<String>,
    schedule_type: Option<String>,
    work_from_home: Option<bool>,
    posted_at: Option<NaiveDateTime>,
    country: Option<String>,
    salary_year_avg: Option<f64>,
}

fn read_postings(conn: &Connection) -> Result<Vec<Posting>> {
    let mut stmt = conn.prepare(
        "SELECT job_id, company_id, job_title_short, job_title, job_location, job_via, \
                job_schedule_type, job_work_from_home, job_posted_date, job_country, salary_year_avg \
         FROM job_postings_fact ORDER BY job_id",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(PostingRow {
            job_id: row.get(0)?,
            company_id: row.get(1)?,
            title_short: row.get(2)?,
            title: row.get(3)?,
            location: row.get(4)?,
            via: row.get(5)?,
            schedule_type: row.get(6)?,
            work_from_home: row.get(7)?,
            posted_at: row.get(8)?,
            country: row.get(9)?,
            salary_year_avg: row.get(10)?,
        })
    })?;

    let mut postings = Vec::new();
    for row in rows {
        postings.push(posting_from_row(row?)?);
    }
    debug!("read {} rows from job_postings_fact", postings.len());
    Ok(postings)
}

fn posting_from_row(row: PostingRow) -> Result<Posting> {
    const TABLE: &str = "job_postings_fact";
    let id = to_id(TABLE, "job_id", row.job_id)?;
    let required = |value: Option<String>, field: &str| {
        value.ok_or_else(|| StorageError::malformed(TABLE, format!("job {id} has no {field}")))
    };

    Ok(Posting {
        id,
        title: required(row.title, "job_title")?,
        title_short: required(row.title_short, "job_title_short")?,
        location: row.location,
        schedule_type: row.schedule_type,
        work_from_home: row.work_from_home.unwrap_or(false),
        salary_year_avg: row.salary_year_avg,
        posted_at: row.posted_at.ok_or_else(|| {
            StorageError::malformed(TABLE, format!("job {id} has no job_posted_date"))
        })?,
        company_id: row
            .company_id
            .map(|company_id| to_id(TABLE, "company_id", company_id))
            .transpose()?,
        country: row.country,
        via: row.via,
    })
}

fn read_companies(conn: &Connection) -> Result<Vec<Company>> {
    const TABLE: &str = "company_dim";
    let mut stmt = conn.prepare("SELECT company_id, name FROM company_dim ORDER BY company_id")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?))
    })?;

    let mut companies = Vec::new();
    for row in rows {
        let (raw_id, name) = row?;
        let id = to_id(TABLE, "company_id", raw_id)?;
        let name = name
            .ok_or_else(|| StorageError::malformed(TABLE, format!("company {id} has no name")))?;
        companies.push(Company::new(id, name));
    }
    Ok(companies)
}

fn read_skills(conn: &Connection) -> Result<Vec<Skill>> {
    const TABLE: &str = "skills_dim";
    let mut stmt = conn.prepare("SELECT skill_id, skills, type FROM skills_dim ORDER BY skill_id")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, Option<String>>(1)?,
            row.get::<_, Option<String>>(2)?,
        ))
    })?;

    let mut skills = Vec::new();
    for row in rows {
        let (raw_id, name, category) = row?;
        let id = to_id(TABLE, "skill_id", raw_id)?;
        let name =
            name.ok_or_else(|| StorageError::malformed(TABLE, format!("skill {id} has no name")))?;
        skills.push(Skill {
            id,
            name,
            category,
        });
    }
    Ok(skills)
}

fn read_links(conn: &Connection) -> Result<Vec<PostingSkillLink>> {
    const TABLE: &str = "skills_job_dim";
    let mut stmt = conn.prepare("SELECT job_id, skill_id FROM skills_job_dim")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, Option<i64>>(0)?,
            row.get::<_, Option<i64>>(1)?,
        ))
    })?;

    let mut links = Vec::new();
    for row in rows {
        match row? {
            (Some(job_id), Some(skill_id)) => links.push(PostingSkillLink::new(
                to_id(TABLE, "job_id", job_id)?,
                to_id(TABLE, "skill_id", skill_id)?,
            )),
            _ => {
                return Err(StorageError::malformed(
                    TABLE,
                    "link row with a NULL job_id or skill_id",
                ))
            }
        }
    }
    debug!("read {} rows from skills_job_dim", links.len());
    Ok(links)
}

fn to_id(table: &str, field: &str, raw: i64) -> Result<u64> {
    u64::try_from(raw)
        .map_err(|_| StorageError::malformed(table, format!("{field} {raw} is negative")))
}
