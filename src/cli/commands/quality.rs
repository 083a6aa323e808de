//! Quality check command implementation
//!
//! Runs `teqc +qc` over every observation file with bounded concurrency,
//! parses each report and prints one record per file in completion order.
//! Record order therefore follows task completion, not the input listing.

use super::shared::{
    RunSummary, announce_start, create_progress_bar, print_batch_summary, setup_logging,
};
use crate::app::services::batch_runner::{TaskOutcome, display_name, run_batch};
use crate::app::services::discovery::discover_files;
use crate::app::services::external_tools::{ensure_tool, run_capture_stdout};
use crate::app::services::quality_report::parse_quality_report;
use crate::app::models::QualityMarks;
use crate::cli::args::{QcArgs, ReportFormat};
use crate::constants::{TEQC_TOOL, worker_pool_size};
use crate::Result;
use std::path::PathBuf;
use tracing::{info, warn};

/// Fixed teqc flags for a quality check run
const QC_FLAGS: &[&str] = &["+qc", "-plot", "-rep"];

/// Quality check command runner.
pub async fn run_qc(args: QcArgs) -> Result<RunSummary> {
    setup_logging(&args.verbosity)?;
    ensure_tool(TEQC_TOOL)?;

    let files = discover_files(&args.input.files, args.input.recursive)?;
    info!("Quality checking {} files", files.len());

    announce_start(&args.input.files, None);
    if args.format == ReportFormat::Table {
        println!("{}", QualityMarks::table_header());
    }

    let progress = args
        .verbosity
        .show_progress()
        .then(|| create_progress_bar(files.len() as u64, "quality check"));

    let format = args.format;
    let report = run_batch(files, worker_pool_size(), progress, move |path| async move {
        qc_worker(path, format).await
    })
    .await?;

    let summary = RunSummary::from(report);
    print_batch_summary("quality check", &summary);
    Ok(summary)
}

/// Check one file; a non-zero teqc status or an unparsable report is a
/// per-file failure, never a batch abort.
async fn qc_worker(source: PathBuf, format: ReportFormat) -> TaskOutcome {
    let name = display_name(&source);
    let flags: Vec<String> = QC_FLAGS.iter().map(|f| f.to_string()).collect();

    let (status, stdout) = match run_capture_stdout(TEQC_TOOL, &flags, &source).await {
        Ok(result) => result,
        Err(e) => {
            warn!("Failed to run teqc for {}: {}", name, e);
            return TaskOutcome::failed(name);
        }
    };

    if !status.success() {
        return TaskOutcome::failed(name);
    }

    match parse_quality_report(&name, &stdout) {
        Ok(marks) => TaskOutcome::success_with(match format {
            ReportFormat::Table => marks.table_row(&name),
            ReportFormat::List => marks.list_block(&name),
        }),
        Err(e) => {
            warn!("{}", e);
            TaskOutcome::failed(name)
        }
    }
}
