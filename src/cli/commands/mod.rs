//! Command implementations for the GNSS toolkit CLI
//!
//! This module contains the command execution logic, progress reporting and
//! error handling for the CLI interface. Each command is implemented in its
//! own module for better organization and maintainability.

pub mod convert;
pub mod copy_results;
pub mod metacheck;
pub mod organize;
pub mod quality;
pub mod rename;
pub mod shared;
pub mod sitecheck;
pub mod subnet;
pub mod unify;

// Re-export the main types for convenience
pub use shared::RunSummary;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Main command runner for the GNSS toolkit
///
/// Dispatches to the appropriate subcommand handler based on CLI args.
/// Every handler returns a [`RunSummary`]; the caller derives the process
/// exit code from it (non-zero when any per-file operation failed).
pub async fn run(args: Args) -> Result<RunSummary> {
    match args.get_command() {
        Commands::Decompress(convert_args) => convert::run_decompress(convert_args).await,
        Commands::Compress(convert_args) => convert::run_compress(convert_args).await,
        Commands::Qc(qc_args) => quality::run_qc(qc_args).await,
        Commands::Unify(unify_args) => unify::run_unify(unify_args).await,
        Commands::Metacheck(metacheck_args) => metacheck::run_metacheck(metacheck_args).await,
        Commands::Rename(rename_args) => rename::run_rename(rename_args).await,
        Commands::Organize(organize_args) => organize::run_organize(organize_args).await,
        Commands::Subnet(subnet_args) => subnet::run_subnet(subnet_args).await,
        Commands::Sitecheck(sitecheck_args) => sitecheck::run_sitecheck(sitecheck_args).await,
        Commands::Case(case_args) => rename::run_case(case_args).await,
        Commands::CopyResults(copy_args) => copy_results::run_copy_results(copy_args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_summary_re_export() {
        // Verify that RunSummary is properly re-exported
        let summary = RunSummary::default();
        assert!(summary.is_clean());
    }
}
