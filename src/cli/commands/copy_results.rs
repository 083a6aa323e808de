//! Copy-results command implementation
//!
//! Copies GAMIT/GLOBK result files (o-files, q-files, h-files, z-files,
//! met files and GLOBK org/prt reports) out of a solution tree into one
//! directory. When a destination file already exists the user decides
//! whether to overwrite it, unless `--force` is set; recursion skips the
//! well-known working subdirectories that never hold results.

use super::shared::{RunSummary, setup_logging};
use crate::app::services::batch_runner::display_name;
use crate::app::services::discovery::files_matching_in;
use crate::cli::args::CopyResultsArgs;
use crate::cli::input::prompt_overwrite;
use crate::constants::{RESULT_FILE_PATTERNS, RESULT_SKIP_DIRS};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Copy-results command runner.
pub async fn run_copy_results(args: CopyResultsArgs) -> Result<RunSummary> {
    setup_logging(&args.verbosity)?;

    let patterns = validated_patterns(&args.types);
    if patterns.is_empty() {
        return Err(Error::configuration(format!(
            "no valid result file types among: {}",
            args.types.join(", ")
        )));
    }

    std::fs::create_dir_all(&args.out).map_err(|e| {
        Error::configuration(format!(
            "failed to create output directory '{}': {}",
            args.out.display(),
            e
        ))
    })?;

    // The solution directory argument is itself a glob
    let roots: Vec<PathBuf> = glob::glob(&args.dir)
        .map_err(|e| Error::pattern(args.dir.clone(), e.to_string()))?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_dir())
        .collect();
    if roots.is_empty() {
        return Err(Error::configuration(format!(
            "no solution directory matches '{}'",
            args.dir
        )));
    }

    let mut summary = RunSummary::default();
    for root in roots {
        info!("Copying result files from {}", root.display());

        // Depth-first over the solution tree, skipping working directories
        let mut pending = vec![root];
        while let Some(dir) = pending.pop() {
            copy_from_dir(&dir, &args.out, &patterns, args.force, &mut summary)?;

            if !args.recursive {
                continue;
            }
            let Ok(entries) = std::fs::read_dir(&dir) else {
                warn!("Cannot read directory '{}'", dir.display());
                continue;
            };
            for entry in entries.filter_map(|e| e.ok()) {
                let path = entry.path();
                if !path.is_dir() {
                    continue;
                }
                let skip = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|name| RESULT_SKIP_DIRS.contains(&name));
                if !skip {
                    pending.push(path);
                }
            }
        }
    }

    println!("{} files have been copied.", summary.processed);
    Ok(summary)
}

/// Glob patterns for the requested result types; unknown types are warned
/// about and dropped, matching types are kept in request order.
fn validated_patterns(types: &[String]) -> Vec<&'static str> {
    let mut patterns = Vec::new();
    for requested in types {
        match RESULT_FILE_PATTERNS
            .iter()
            .find(|(name, _)| name == requested)
        {
            Some((_, pattern)) => patterns.push(*pattern),
            None => eprintln!("Warning: file type {requested} is not valid, skip it!"),
        }
    }
    patterns
}

/// Copy the matching result files directly inside one directory.
fn copy_from_dir(
    dir: &Path,
    out_dir: &Path,
    patterns: &[&str],
    force: bool,
    summary: &mut RunSummary,
) -> Result<()> {
    for pattern in patterns {
        for file in files_matching_in(dir, pattern)? {
            let name = display_name(&file);
            let destination = out_dir.join(&name);

            if destination.exists() && !force {
                if !prompt_overwrite(&file.display().to_string())? {
                    println!("skip: {}", file.display());
                    summary.skipped.push(name);
                    continue;
                }
                println!("overwrite: {}", file.display());
            } else {
                println!("copy: {}", file.display());
            }

            match std::fs::copy(&file, &destination) {
                Ok(_) => summary.processed += 1,
                Err(e) => {
                    warn!("Failed to copy '{}': {}", file.display(), e);
                    summary.failed.push(name);
                }
            }
        }
    }
    Ok(())
}
