//! Sitecheck command implementation
//!
//! Walks one or more directories and reports which sites from the YAML site
//! list have no observation file (standard or compact, short or long form)
//! for the given year and day of year.

use super::shared::{RunSummary, setup_logging};
use crate::app::services::classifier::{classify, is_observation_for, parse_year_arg};
use crate::app::services::discovery::walk_files;
use crate::cli::args::SitecheckArgs;
use crate::config::{SiteList, resolve_config_path};
use crate::constants::DEFAULT_SITES_FILE;
use crate::{Error, Result};
use colored::Colorize;
use std::collections::HashSet;
use tracing::info;

/// Sitecheck command runner.
pub async fn run_sitecheck(args: SitecheckArgs) -> Result<RunSummary> {
    setup_logging(&args.verbosity)?;

    let year = parse_year_arg(&args.year)?;
    let config_path = resolve_config_path(args.cfg.as_deref(), DEFAULT_SITES_FILE)?;
    let site_list = SiteList::load(&config_path)?;
    if site_list.is_empty() {
        return Err(Error::configuration(format!(
            "site list '{}' is empty",
            config_path.display()
        )));
    }

    // Start from the full site list; every observation found strikes one off.
    let mut missing: HashSet<String> = site_list.as_set();
    info!(
        "Checking {} sites for observations at {}, day {:03}",
        missing.len(),
        year,
        args.doy
    );
    println!(
        "Start processing: {}",
        args.dirs
            .iter()
            .map(|d| d.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    for dir in &args.dirs {
        if !dir.is_dir() {
            return Err(Error::configuration(format!(
                "'{}' is not a directory",
                dir.display()
            )));
        }
        for path in walk_files(dir, args.recursive) {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if is_observation_for(name, year, args.doy) {
                if let Some(record) = classify(name) {
                    missing.remove(&record.site);
                }
            }
        }
    }

    let mut missing_sites: Vec<String> = missing.into_iter().collect();
    missing_sites.sort_unstable();
    let summary = RunSummary {
        missing_sites,
        ..Default::default()
    };

    if summary.missing_sites.is_empty() {
        println!("{}", "Observations found for every site.".green());
    } else {
        println!(
            "{} {}",
            format!("Observations not found at {}, {:03} for:", year, args.doy).yellow(),
            summary.missing_sites.join(", ")
        );
    }
    Ok(summary)
}
