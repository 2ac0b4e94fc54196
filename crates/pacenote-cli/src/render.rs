//! Output formatting for generated notes.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use pacenote_core::{PaceNote, RouteSummary};
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Machine-readable report
    Json,
    /// One co-driver callout per line
    Text,
}

/// Everything printed for one route.
#[derive(Debug, Clone, Serialize)]
pub struct NotesReport {
    pub generated_at: DateTime<Utc>,
    pub summary: RouteSummary,
    pub notes: Vec<PaceNote>,
}

impl NotesReport {
    pub fn new(notes: Vec<PaceNote>) -> Self {
        Self {
            generated_at: Utc::now(),
            summary: RouteSummary::from_notes(&notes),
            notes,
        }
    }
}

pub fn render(report: &NotesReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(render_text(report)),
    }
}

fn render_text(report: &NotesReport) -> String {
    let mut out = String::new();
    for note in &report.notes {
        let _ = writeln!(out, "{note}");
    }

    let summary = &report.summary;
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:.1} km, {} corners ({} named, {} chicanes), {} crests, {} dips, {} jumps",
        summary.length_m / 1000.0,
        summary.corners,
        summary.shaped_turns,
        summary.chicanes,
        summary.crests,
        summary.dips,
        summary.jumps,
    );
    let grades: Vec<String> = summary
        .grade_counts
        .iter()
        .enumerate()
        .map(|(i, count)| format!("{}:{count}", i + 1))
        .collect();
    let _ = writeln!(out, "grades {}", grades.join(" "));
    out
}
