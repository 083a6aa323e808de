//! Metacheck command implementation
//!
//! Compares the metadata recorded in RINEX observation headers (receiver,
//! antenna, antenna delta, approximate position) against the reference
//! values in the YAML site-information configuration. Sites absent from the
//! configuration are collected and reported once at the end, separately
//! from files whose header could not be read.

use super::shared::{RunSummary, announce_start, print_missing_sites, setup_logging, site_prefix};
use crate::app::services::batch_runner::display_name;
use crate::app::services::discovery::discover_files;
use crate::app::services::rinex_header::{Difference, compare_meta, read_observation_meta};
use crate::cli::args::{MetacheckArgs, ReportFormat};
use crate::config::{SitesInfo, resolve_config_path};
use crate::constants::DEFAULT_SITESINFO_FILE;
use crate::Result;
use std::path::Path;
use tracing::{info, warn};

/// Metacheck command runner.
pub async fn run_metacheck(args: MetacheckArgs) -> Result<RunSummary> {
    setup_logging(&args.verbosity)?;

    let config_path = resolve_config_path(args.cfg.as_deref(), DEFAULT_SITESINFO_FILE)?;
    let sites_info = SitesInfo::load(&config_path)?;

    let files = discover_files(&args.input.files, args.input.recursive)?;
    info!(
        "Checking metadata of {} files against {}",
        files.len(),
        config_path.display()
    );

    announce_start(&args.input.files, None);
    if args.format == ReportFormat::Table {
        println!("\n{:<20} {:<10} {:<44} {:<44}", "file", "type", "in cfgfile", "in obsfile");
    }

    let mut summary = RunSummary::default();
    for path in &files {
        let name = display_name(path);
        let Some(site) = site_prefix(&name) else {
            summary.skipped.push(name);
            continue;
        };

        // Only explicitly configured sites are checked; the rest are
        // reported as missing from the configuration.
        let Some(reference) = sites_info.site(&site) else {
            summary.missing_sites.push(site);
            continue;
        };

        let file_meta = match read_observation_meta(path) {
            Ok(meta) => meta,
            Err(e) => {
                warn!("{}", e);
                summary.failed.push(name);
                continue;
            }
        };

        let differences = compare_meta(&file_meta, reference, args.threshold);
        if !differences.is_empty() {
            show_differences(path, &differences, args.format);
        }
        summary.processed += 1;
    }

    print_missing_sites("Sites not found in configuration file:", &summary);
    Ok(summary)
}

/// Print one file's differing attributes in the selected format.
fn show_differences(path: &Path, differences: &[Difference], format: ReportFormat) {
    match format {
        ReportFormat::List => {
            println!("\n{} has difference:", path.display());
            for diff in differences {
                println!("{} in cfg file: {}", diff.attribute, diff.expected);
                println!("{} in obs file: {}", diff.attribute, diff.actual);
            }
        }
        ReportFormat::Table => {
            let filename = display_name(path);
            for diff in differences {
                println!(
                    "{:<20} {:<10} {:<44} {:<44}",
                    filename, diff.attribute, diff.expected, diff.actual
                );
            }
        }
    }
}
