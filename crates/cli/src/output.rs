use crate::error::CliError;
use engine_core::{
    progress::ProgressSink,
    report::{CloneOutcome, CopyReport, SchemaReport},
};
use model::probe::TableDescriptor;
use serde::Serialize;
use std::io::{self, Write};

/// Writes each progress message as a single overwritten status line on
/// stdout, like a shell progress indicator.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn notify(&self, message: &str) {
        let mut out = io::stdout();
        // \r returns to column 0, ESC[2K clears the previous line
        let _ = write!(out, "\r\x1b[2K{message}");
        let _ = out.flush();
    }
}

#[derive(Debug, Serialize)]
pub struct CopySummary {
    pub total: usize,
    pub copied: usize,
    pub unprocessed: usize,
    pub succeeded: bool,
}

impl From<&CopyReport> for CopySummary {
    fn from(report: &CopyReport) -> Self {
        CopySummary {
            total: report.total,
            copied: report.copied(),
            unprocessed: report.unprocessed.len(),
            succeeded: report.succeeded(),
        }
    }
}

pub fn print_copy_report(report: &CopyReport, as_json: bool) -> Result<(), CliError> {
    // end the status line before printing the summary
    println!();

    if as_json {
        let json =
            serde_json::to_string_pretty(&CopySummary::from(report)).map_err(CliError::JsonSerialize)?;
        println!("{json}");
    } else {
        println!("Copy summary");
        println!("-----------------------------");
        println!("{:<16} {}", "Total items", report.total);
        println!("{:<16} {}", "Copied", report.copied());
        println!("{:<16} {}", "Unprocessed", report.unprocessed.len());
    }
    Ok(())
}

pub fn print_clone_outcome(outcome: &CloneOutcome, as_json: bool) -> Result<(), CliError> {
    match outcome {
        CloneOutcome::SchemaTimedOut => {
            println!();
            println!("Destination table failed to become active; no items were copied");
            Ok(())
        }
        CloneOutcome::Copied(report) => print_copy_report(report, as_json),
    }
}

pub fn print_schema_report(report: &SchemaReport) {
    println!();
    if report.active {
        println!("Destination table is active");
    } else {
        println!("Destination table failed to become active within the wait budget");
    }
}

/// Prints a probed table descriptor as pretty JSON, to stdout or a file.
pub async fn write_descriptor(
    descriptor: &TableDescriptor,
    output: Option<String>,
) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(descriptor).map_err(CliError::JsonSerialize)?;

    if let Some(path) = output {
        tokio::fs::write(path, json).await?;
    } else {
        println!("{json}");
    }
    Ok(())
}
