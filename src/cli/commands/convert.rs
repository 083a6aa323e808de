//! Decompress and compress command implementations
//!
//! Both commands drive the RNXCMP converters over a batch of files: one
//! subprocess per file with bounded concurrency, stdout redirected into the
//! destination file, and the converters' asymmetric exit statuses (0 = ok,
//! 1 = error, 2 = warning-but-ok) interpreted per file.

use super::shared::{
    RunSummary, announce_start, create_progress_bar, ensure_directory, print_batch_summary,
    setup_logging,
};
use crate::app::services::batch_runner::{TaskOutcome, display_name, run_batch};
use crate::app::services::classifier::{compressed_name, decompressed_name};
use crate::app::services::discovery::discover_files;
use crate::app::services::external_tools::{ExitPolicy, Transform, ensure_tool};
use crate::cli::args::ConvertArgs;
use crate::constants::{CRX2RNX_TOOL, RNX2CRX_TOOL, worker_pool_size};
use crate::Result;
use std::path::PathBuf;
use tracing::info;

/// Conversion direction, deciding the tool and the destination naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Compact RINEX -> standard RINEX via crx2rnx
    Decompress,
    /// Standard RINEX -> Compact RINEX via rnx2crx
    Compress,
}

impl Direction {
    fn tool(self) -> &'static str {
        match self {
            Self::Decompress => CRX2RNX_TOOL,
            Self::Compress => RNX2CRX_TOOL,
        }
    }

    fn default_out_dir(self) -> &'static str {
        match self {
            Self::Decompress => "rinex",
            Self::Compress => "crinex",
        }
    }

    fn operation(self) -> &'static str {
        match self {
            Self::Decompress => "decompress",
            Self::Compress => "compress",
        }
    }

    /// Destination file name, or `None` when the source is not eligible
    /// (already in target form, or not an observation file at all).
    fn destination_name(self, filename: &str) -> Option<String> {
        match self {
            Self::Decompress => decompressed_name(filename),
            Self::Compress => compressed_name(filename),
        }
    }
}

/// Decompress command runner: Compact RINEX into standard RINEX.
pub async fn run_decompress(args: ConvertArgs) -> Result<RunSummary> {
    run_convert(args, Direction::Decompress).await
}

/// Compress command runner: standard RINEX into Compact RINEX.
pub async fn run_compress(args: ConvertArgs) -> Result<RunSummary> {
    run_convert(args, Direction::Compress).await
}

async fn run_convert(args: ConvertArgs, direction: Direction) -> Result<RunSummary> {
    setup_logging(&args.verbosity)?;
    ensure_tool(direction.tool())?;

    let out_dir = args
        .out
        .unwrap_or_else(|| PathBuf::from(direction.default_out_dir()));
    ensure_directory(&out_dir)?;

    let files = discover_files(&args.input.files, args.input.recursive)?;
    info!(
        "Running {} over {} files into {}",
        direction.tool(),
        files.len(),
        out_dir.display()
    );

    announce_start(&args.input.files, Some(args.keep));
    let progress = args
        .verbosity
        .show_progress()
        .then(|| create_progress_bar(files.len() as u64, direction.operation()));

    let keep = args.keep;
    let report = run_batch(files, worker_pool_size(), progress, move |path| {
        let out_dir = out_dir.clone();
        async move { convert_worker(path, out_dir, keep, direction).await }
    })
    .await?;

    let summary = RunSummary::from(report);
    print_batch_summary(direction.operation(), &summary);
    Ok(summary)
}

/// Convert one file; every per-file error becomes a per-file outcome.
async fn convert_worker(
    source: PathBuf,
    out_dir: PathBuf,
    keep: bool,
    direction: Direction,
) -> TaskOutcome {
    let name = display_name(&source);
    let Some(destination_name) = direction.destination_name(&name) else {
        return TaskOutcome::skipped(name);
    };

    Transform {
        tool: direction.tool().to_string(),
        args: vec!["-".to_string()],
        source,
        destination: out_dir.join(destination_name),
        keep_source: keep,
        exit_policy: ExitPolicy::rnxcmp(),
    }
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_tables() {
        assert_eq!(Direction::Decompress.tool(), "crx2rnx");
        assert_eq!(Direction::Compress.tool(), "rnx2crx");
        assert_eq!(Direction::Decompress.default_out_dir(), "rinex");
        assert_eq!(Direction::Compress.default_out_dir(), "crinex");
    }

    #[test]
    fn test_destination_names() {
        assert_eq!(
            Direction::Decompress.destination_name("aggo0420.17d").as_deref(),
            Some("aggo0420.17o")
        );
        assert_eq!(
            Direction::Compress.destination_name("aggo0420.17o").as_deref(),
            Some("aggo0420.17d")
        );
        // already in target form: skipped, not converted
        assert!(Direction::Decompress.destination_name("aggo0420.17o").is_none());
        assert!(Direction::Compress.destination_name("aggo0420.17d").is_none());
    }

    #[tokio::test]
    async fn test_worker_skips_ineligible_files() {
        let outcome = convert_worker(
            PathBuf::from("notes.txt"),
            PathBuf::from("rinex"),
            true,
            Direction::Decompress,
        )
        .await;
        assert_eq!(outcome, TaskOutcome::skipped("notes.txt".to_string()));
    }
}
