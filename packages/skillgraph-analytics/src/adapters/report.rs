//! Report rendering
//!
//! Rows render as an aligned text table, pretty JSON or YAML. Table columns
//! are the serialized field names of the row type, in declaration order.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{AnalyticsError, Result};
use crate::features::query_engine::SkillReport;

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

/// Render a list of rows
pub fn render<T: Serialize>(rows: &[T], format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Table => render_table(rows),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        ReportFormat::Yaml => Ok(serde_yaml::to_string(rows)?),
    }
}

/// Render every section of a report
pub fn render_report(report: &SkillReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        ReportFormat::Yaml => Ok(serde_yaml::to_string(report)?),
        ReportFormat::Table => {
            let sections = [
                ("Top-paying postings", render_table(&report.top_paying_postings)?),
                ("Skills of top-paying postings", render_table(&report.top_paying_posting_skills)?),
                ("Skill frequency among top-paying postings", render_table(&report.top_paying_skill_frequency)?),
                ("Most in-demand skills", render_table(&report.skill_demand)?),
                ("Top-paying skills", render_table(&report.skill_salaries)?),
                ("Optimal skills", render_table(&report.optimal_skills)?),
            ];

            let mut out = String::new();
            for (title, table) in sections {
                if !out.is_empty() {
                    out.push('\n');
                }
                let _ = writeln!(out, "== {} ==", title);
                out.push_str(&table);
            }
            Ok(out)
        }
    }
}

fn render_table<T: Serialize>(rows: &[T]) -> Result<String> {
    let objects = rows
        .iter()
        .map(|row| match serde_json::to_value(row)? {
            Value::Object(map) => Ok(map),
            other => Err(AnalyticsError::report(format!(
                "table rows must serialize to objects, got {}",
                other
            ))),
        })
        .collect::<Result<Vec<Map<String, Value>>>>()?;

    let Some(first) = objects.first() else {
        return Ok("(no rows)\n".to_string());
    };

    let columns: Vec<&str> = first.keys().map(String::as_str).collect();
    let cells: Vec<Vec<(String, bool)>> = objects
        .iter()
        .map(|object| {
            columns
                .iter()
                .map(|column| cell(object.get(*column).unwrap_or(&Value::Null)))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].0.chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(column, &width)| format!("{:<width$}", column))
        .collect();
    let _ = writeln!(out, "{}", header.join("  ").trim_end());

    let rule: Vec<String> = widths.iter().map(|&width| "-".repeat(width)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|((text, numeric), &width)| {
                if *numeric {
                    format!("{:>width$}", text)
                } else {
                    format!("{:<width$}", text)
                }
            })
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }

    Ok(out)
}

/// Cell text and whether it is right-aligned
fn cell(value: &Value) -> (String, bool) {
    match value {
        Value::Null => ("-".to_string(), false),
        Value::String(s) => (s.clone(), false),
        Value::Number(n) => (n.to_string(), true),
        other => (other.to_string(), false),
    }
}
