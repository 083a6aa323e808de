//! Subnet command implementation
//!
//! Distributes observation files into one directory per sub-network, using
//! a YAML `net -> [sites]` configuration. A file whose site belongs to
//! several nets is copied into each of them; the source is removed after
//! distribution unless `--keep` is set. Sites in no net are reported once
//! at the end.

use super::shared::{
    RunSummary, announce_start, ensure_directory, print_missing_sites, setup_logging,
    site_prefix,
};
use crate::app::services::batch_runner::display_name;
use crate::app::services::discovery::discover_files;
use crate::cli::args::SubnetArgs;
use crate::config::{Subnets, resolve_config_path};
use crate::constants::DEFAULT_SUBNET_FILE;
use crate::{Error, Result};
use tracing::{info, warn};

/// Subnet command runner.
pub async fn run_subnet(args: SubnetArgs) -> Result<RunSummary> {
    setup_logging(&args.verbosity)?;

    let config_path = resolve_config_path(args.cfg.as_deref(), DEFAULT_SUBNET_FILE)?;
    let subnets = Subnets::load(&config_path)?;

    // One directory per net, created up front
    for net in subnets.net_names() {
        ensure_directory(&args.out.join(net))?;
    }

    let files = discover_files(&args.input.files, args.input.recursive)?;
    info!(
        "Distributing {} files over subnets from {}",
        files.len(),
        config_path.display()
    );
    announce_start(&args.input.files, Some(args.keep));

    let mut summary = RunSummary::default();
    for path in &files {
        let name = display_name(path);
        let Some(site) = site_prefix(&name) else {
            summary.skipped.push(name);
            continue;
        };

        let nets = subnets.nets_of(&site);
        if nets.is_empty() {
            summary.missing_sites.push(site);
            continue;
        }

        let mut copied_everywhere = true;
        for net in &nets {
            let destination = args.out.join(net).join(&name);
            println!("{} => {}", path.display(), args.out.join(net).display());
            if let Err(e) = std::fs::copy(path, &destination)
                .map_err(|e| Error::io(format!("failed to copy to '{}'", destination.display()), e))
            {
                warn!("{}", e);
                copied_everywhere = false;
            }
        }

        if !copied_everywhere {
            summary.failed.push(name);
            continue;
        }

        if !args.keep {
            if let Err(e) = std::fs::remove_file(path) {
                warn!("Cannot remove source '{}': {}", path.display(), e);
            }
        }
        summary.processed += 1;
    }

    print_missing_sites("Sites not belong to any networks:", &summary);
    Ok(summary)
}
