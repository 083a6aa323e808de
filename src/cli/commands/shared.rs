//! Shared components for CLI commands
//!
//! This module contains common types, utilities, and functions used across
//! multiple CLI command implementations: logging setup, progress bars, the
//! end-of-run summary, and the copy/move primitives shared by the renaming
//! and organizing commands.

use crate::app::services::batch_runner::BatchReport;
use crate::cli::args::VerbosityArgs;
use crate::{Error, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::debug;

/// Consolidated result of one toolkit invocation, used for the exit code.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of files processed successfully
    pub processed: usize,
    /// Files whose transformation failed
    pub failed: Vec<String>,
    /// Files skipped before any work (already converted, unrecognized name)
    pub skipped: Vec<String>,
    /// Site codes absent from the active configuration
    pub missing_sites: Vec<String>,
}

impl RunSummary {
    /// True when no per-file transformation failed. Skipped files and
    /// missing configuration entries are findings, not failures.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

impl From<BatchReport> for RunSummary {
    fn from(report: BatchReport) -> Self {
        Self {
            processed: report.succeeded,
            failed: report.failed,
            skipped: report.skipped,
            missing_sites: Vec::new(),
        }
    }
}

/// Set up structured logging according to the verbosity flags
pub fn setup_logging(verbosity: &VerbosityArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = verbosity.get_log_level();

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gnss_toolkit={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} [{per_sec}]",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Announce the start of a batch, shortening long pattern lists.
pub fn announce_start(patterns: &[String], keep_source: Option<bool>) {
    println!("Start processing: {}", shorten(&patterns.join(", "), 62));
    if keep_source == Some(false) {
        println!("Delete source files when complete");
    }
}

/// Print the end-of-run summary for a transformation batch.
pub fn print_batch_summary(operation: &str, summary: &RunSummary) {
    if !summary.skipped.is_empty() {
        println!(
            "\nSkipped (not eligible for {operation}): {}",
            summary.skipped.join(", ")
        );
    }
    if summary.failed.is_empty() {
        println!("\n{}", format!("All {operation} tasks are finished!").green());
    } else {
        println!(
            "\n{} {}",
            format!("{operation} failed filename:").red(),
            summary.failed.join(", ")
        );
    }
}

/// Print the sites that were not found in the active configuration.
pub fn print_missing_sites(label: &str, summary: &RunSummary) {
    if !summary.missing_sites.is_empty() {
        let mut sites = summary.missing_sites.clone();
        sites.sort_unstable();
        sites.dedup();
        println!("\n{} {}", label.yellow(), sites.join(", "));
    }
}

/// Truncate a display string at a word boundary, appending `...`.
pub fn shorten(text: &str, width: usize) -> String {
    if text.len() <= width {
        return text.to_string();
    }
    let mut cut = String::new();
    for word in text.split(' ') {
        if cut.len() + word.len() + 4 > width {
            break;
        }
        if !cut.is_empty() {
            cut.push(' ');
        }
        cut.push_str(word);
    }
    format!("{} ...", cut.trim_end_matches(','))
}

/// Create a directory (and parents) with a configuration-grade error.
pub fn ensure_directory(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        Error::configuration(format!(
            "failed to create output directory '{}': {}",
            dir.display(),
            e
        ))
    })
}

/// Copy `source` to `destination` when `keep` is set, move it otherwise.
/// A move that cannot rename across filesystems falls back to copy+remove.
pub fn copy_or_move(source: &Path, destination: &Path, keep: bool) -> Result<()> {
    if keep {
        std::fs::copy(source, destination).map_err(|e| {
            Error::io(
                format!(
                    "failed to copy '{}' to '{}'",
                    source.display(),
                    destination.display()
                ),
                e,
            )
        })?;
        return Ok(());
    }

    if std::fs::rename(source, destination).is_ok() {
        return Ok(());
    }

    std::fs::copy(source, destination).map_err(|e| {
        Error::io(
            format!(
                "failed to move '{}' to '{}'",
                source.display(),
                destination.display()
            ),
            e,
        )
    })?;
    std::fs::remove_file(source)
        .map_err(|e| Error::io(format!("failed to remove '{}'", source.display()), e))?;
    Ok(())
}

/// Lowercased 4-character site code taken from the front of a file name.
/// Names shorter than 4 characters yield `None`.
pub fn site_prefix(filename: &str) -> Option<String> {
    if filename.chars().take(4).count() < 4 {
        return None;
    }
    Some(filename.chars().take(4).collect::<String>().to_lowercase())
}
