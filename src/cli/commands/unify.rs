//! Unify command implementation
//!
//! Rewrites observation headers with teqc's editing flags, derived from the
//! YAML site-information configuration. The `all` entry supplies defaults
//! which site-specific entries override; the edited file is written to the
//! output directory with its original name.

use super::shared::{
    RunSummary, announce_start, create_progress_bar, ensure_directory, print_batch_summary,
    setup_logging, site_prefix,
};
use crate::app::services::batch_runner::{TaskOutcome, display_name, run_batch};
use crate::app::services::discovery::discover_files;
use crate::app::services::external_tools::{ExitPolicy, Transform, ensure_tool};
use crate::cli::args::UnifyArgs;
use crate::config::{AttributeValue, SiteAttributes, SitesInfo, resolve_config_path};
use crate::constants::{DEFAULT_SITESINFO_FILE, TEQC_TOOL, worker_pool_size};
use crate::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// teqc editing flag for each configurable attribute. `rm_sys` carries no
/// flag of its own: its values become `-R`-style constellation switches.
const TEQC_FLAGS: &[(&str, &str)] = &[
    ("agency", "-O.ag"),
    ("antenna", "-O.at"),
    ("delta", "-O.pe"),
    ("interval", "-O.dec"),
    ("obs_type", "-O.obs"),
    ("observer", "-O.o"),
    ("position", "-O.px"),
    ("receiver", "-O.rt"),
];

/// Unify command runner.
pub async fn run_unify(args: UnifyArgs) -> Result<RunSummary> {
    setup_logging(&args.verbosity)?;
    ensure_tool(TEQC_TOOL)?;

    let config_path = resolve_config_path(args.cfg.as_deref(), DEFAULT_SITESINFO_FILE)?;
    let sites_info = Arc::new(SitesInfo::load(&config_path)?);
    ensure_directory(&args.out)?;

    let files = discover_files(&args.input.files, args.input.recursive)?;
    info!(
        "Unifying {} files using {}",
        files.len(),
        config_path.display()
    );

    announce_start(&args.input.files, Some(args.keep));
    let progress = args
        .verbosity
        .show_progress()
        .then(|| create_progress_bar(files.len() as u64, "unify"));

    let out_dir = args.out.clone();
    let keep = args.keep;
    let report = run_batch(files, worker_pool_size(), progress, move |path| {
        let sites_info = sites_info.clone();
        let out_dir = out_dir.clone();
        async move { unify_worker(path, sites_info, out_dir, keep).await }
    })
    .await?;

    let summary = RunSummary::from(report);
    print_batch_summary("unify", &summary);
    Ok(summary)
}

/// Rewrite one file's header through teqc.
async fn unify_worker(
    source: PathBuf,
    sites_info: Arc<SitesInfo>,
    out_dir: PathBuf,
    keep: bool,
) -> TaskOutcome {
    let name = display_name(&source);
    let Some(site) = site_prefix(&name) else {
        return TaskOutcome::skipped(name);
    };

    let attributes = sites_info.effective(&site);
    Transform {
        tool: TEQC_TOOL.to_string(),
        args: teqc_args(&attributes),
        destination: out_dir.join(&name),
        source,
        keep_source: keep,
        exit_policy: ExitPolicy::Strict,
    }
    .run()
    .await
}

/// Build the teqc argument vector for a site's effective attributes.
///
/// Attributes are emitted in flag-table order so identical configurations
/// always produce identical invocations. `position` and `delta` values are
/// whitespace-separated triples and are passed as separate arguments, the
/// way teqc expects them.
fn teqc_args(attributes: &SiteAttributes) -> Vec<String> {
    let mut args = Vec::new();

    for &(name, flag) in TEQC_FLAGS {
        let Some(value) = attributes.get(name) else {
            continue;
        };
        args.push(flag.to_string());
        match name {
            "position" | "delta" => {
                args.extend(value.as_text().split_whitespace().map(String::from));
            }
            _ => args.push(value.as_text()),
        }
    }

    if let Some(AttributeValue::List(systems)) = attributes.get("rm_sys") {
        args.extend(systems.iter().map(|sys| format!("-{sys}")));
    }

    args
}
