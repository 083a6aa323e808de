//! Rename and case command implementations
//!
//! `rename` replaces the 4-character site code at the front of each file
//! name through a YAML old-to-new site map, following the case of the
//! original code. `case` batch-renames whole file names to upper or lower
//! case. Both rename in place when no output directory is given, copy when
//! `--keep` is set and move otherwise.

use super::shared::{
    RunSummary, announce_start, copy_or_move, ensure_directory, print_missing_sites,
    setup_logging, site_prefix,
};
use crate::app::services::batch_runner::display_name;
use crate::app::services::discovery::discover_files;
use crate::cli::args::{CaseArgs, CaseDirection, RenameArgs};
use crate::config::{SiteMap, resolve_config_path};
use crate::constants::DEFAULT_SITEMAP_FILE;
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Rename command runner: replace site codes through the site map.
pub async fn run_rename(args: RenameArgs) -> Result<RunSummary> {
    setup_logging(&args.verbosity)?;

    let config_path = resolve_config_path(args.cfg.as_deref(), DEFAULT_SITEMAP_FILE)?;
    let site_map = SiteMap::load(&config_path)?;

    if let Some(out_dir) = &args.out {
        ensure_directory(out_dir)?;
    }

    let files = discover_files(&args.input.files, args.input.recursive)?;
    info!("Renaming {} files using {}", files.len(), config_path.display());
    announce_start(&args.input.files, Some(args.keep));

    let mut summary = RunSummary::default();
    for path in &files {
        let name = display_name(path);
        let Some(site) = site_prefix(&name) else {
            summary.skipped.push(name);
            continue;
        };

        let Some(replacement) = site_map.replacement(&site) else {
            summary.missing_sites.push(site);
            continue;
        };

        let new_name = renamed_site_name(&name, replacement);
        match rename_file(path, &new_name, args.out.as_deref(), args.keep) {
            Ok(destination) => {
                println!("{} => {}", path.display(), destination.display());
                summary.processed += 1;
            }
            Err(e) => {
                warn!("{}", e);
                summary.failed.push(name);
            }
        }
    }

    print_missing_sites("Sites not found in sitemap:", &summary);
    Ok(summary)
}

/// Case command runner: rename file names to upper or lower case.
pub async fn run_case(args: CaseArgs) -> Result<RunSummary> {
    setup_logging(&args.verbosity)?;
    args.validate()?;

    if let Some(out_dir) = &args.out {
        ensure_directory(out_dir)?;
    }

    let files = discover_files(&args.input.files, args.input.recursive)?;
    announce_start(&args.input.files, None);

    let mut summary = RunSummary::default();
    for path in &files {
        let name = display_name(path);
        let new_name = match args.to {
            CaseDirection::Upper => name.to_uppercase(),
            CaseDirection::Lower => name.to_lowercase(),
        };

        match rename_file(path, &new_name, args.out.as_deref(), args.keep) {
            Ok(_) => summary.processed += 1,
            Err(e) => {
                warn!("{}", e);
                summary.failed.push(name);
            }
        }
    }

    println!("{} files have been processed.", summary.processed);
    Ok(summary)
}

/// New file name with the site code replaced, matching the case of the
/// original code: `AGGO0420.17O` with replacement `lpgs` becomes
/// `LPGS0420.17O`.
fn renamed_site_name(filename: &str, replacement: &str) -> String {
    let original_site: String = filename.chars().take(4).collect();
    let tail: String = filename.chars().skip(4).collect();
    let site = if original_site.chars().all(|c| !c.is_ascii_uppercase()) {
        replacement.to_lowercase()
    } else {
        replacement.to_uppercase()
    };
    format!("{site}{tail}")
}

/// Place the renamed file: beside the source when no output directory is
/// given, otherwise into the output directory; copy when `keep` is set.
fn rename_file(
    source: &Path,
    new_name: &str,
    out_dir: Option<&Path>,
    keep: bool,
) -> Result<PathBuf> {
    let destination = match out_dir {
        Some(dir) => dir.join(new_name),
        None => source.with_file_name(new_name),
    };
    copy_or_move(source, &destination, keep)?;
    Ok(destination)
}
