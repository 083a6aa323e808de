//! Organize command implementation
//!
//! Moves (or copies) GNSS files into an IGS-style daily archive tree:
//! `<out>/YYYY/DDD/<kind>/`, where `<kind>` is the 2-digit year plus kind
//! letter, e.g. `2017/042/17d/aggo0420.17d`. The Classifier decides the
//! target directory; unclassifiable files are skipped and reported.

use super::shared::{
    RunSummary, announce_start, copy_or_move, ensure_directory, setup_logging,
};
use crate::app::services::batch_runner::display_name;
use crate::app::services::classifier::classify;
use crate::app::services::discovery::discover_files;
use crate::cli::args::OrganizeArgs;
use crate::Result;
use colored::Colorize;
use tracing::{info, warn};

/// Organize command runner.
pub async fn run_organize(args: OrganizeArgs) -> Result<RunSummary> {
    setup_logging(&args.verbosity)?;
    ensure_directory(&args.out)?;

    let files = discover_files(&args.input.files, args.input.recursive)?;
    info!("Organizing {} files into {}", files.len(), args.out.display());
    announce_start(&args.input.files, Some(args.keep));

    let mut summary = RunSummary::default();
    for path in &files {
        let name = display_name(path);
        let Some(record) = classify(&name) else {
            summary.skipped.push(name);
            continue;
        };

        let target_dir = args.out.join(record.archive_dir());
        if let Err(e) = ensure_directory(&target_dir) {
            warn!("{}", e);
            summary.failed.push(name);
            continue;
        }

        println!("{} => {}", path.display(), target_dir.display());
        match copy_or_move(path, &target_dir.join(&name), args.keep) {
            Ok(()) => summary.processed += 1,
            Err(e) => {
                warn!("{}", e);
                summary.failed.push(name);
            }
        }
    }

    if !summary.skipped.is_empty() {
        println!(
            "\n{} {}",
            "Unrecognized filenames:".yellow(),
            summary.skipped.join(", ")
        );
    }
    Ok(summary)
}
