//! Output adapters

pub mod report;

pub use report::{render, render_report, ReportFormat};
