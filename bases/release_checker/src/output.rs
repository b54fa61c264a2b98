use crate::config::OutputFormat;
use chrono::{DateTime, Utc};
use release_rules::{Level, Report, ValidationIssue};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    root: String,
    score: f64,
    issues: &'a [ValidationIssue],
}

pub struct OutputHandler {
    format: OutputFormat,
    min_level: Level,
    verbose: bool,
}

impl OutputHandler {
    pub fn new(format: OutputFormat, min_level: Level, verbose: bool) -> Self {
        Self {
            format,
            min_level,
            verbose,
        }
    }

    /// Render the report, keeping issues at or above the minimum level
    pub fn render(&self, root: &Path, report: &Report) -> serde_json::Result<String> {
        let shown = report.filtered(self.min_level);
        match self.format {
            OutputFormat::Text => Ok(format!("{}\n{shown}", root.display())),
            OutputFormat::Json => serde_json::to_string_pretty(&JsonReport {
                generated_at: Utc::now(),
                root: root.display().to_string(),
                score: shown.score,
                issues: &shown.issues,
            }),
        }
    }

    pub fn print_report(&self, root: &Path, report: &Report) -> serde_json::Result<()> {
        println!("{}", self.render(root, report)?);
        Ok(())
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        eprintln!("Error: {}", error);

        if self.verbose {
            eprintln!("\nError details:");
            error.chain().skip(1).for_each(|cause| {
                eprintln!("  caused by: {}", cause);
            });
        }
    }
}
