//! Command-line argument definitions for the GNSS toolkit
//!
//! This module defines the complete CLI interface using the clap derive API.
//! Every file-processing subcommand shares the same surface: one or more
//! filename glob patterns, an optional recursive-search flag, an optional
//! output directory and an optional keep-source flag.

use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the GNSS toolkit
///
/// Batch utilities for GNSS geodesy data processing: RINEX/Compact RINEX
/// conversion, quality checking, metadata checks, renaming and archive
/// organization. External converters (RNXCMP, teqc) must be installed
/// separately.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gnss-toolkit",
    version,
    about = "Batch utilities for GNSS geodesy data processing",
    long_about = "A collection of batch utilities used by GNSS (GPS/GLONASS) geodesy data \
                  processing workflows: converting between RINEX and Compact RINEX via the \
                  RNXCMP tools, quality checking observation files with teqc, checking \
                  observation metadata against a reference configuration, and renaming or \
                  organizing files into date/site-based archive trees."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the GNSS toolkit
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Convert Compact RINEX files into standard RINEX (runs crx2rnx)
    Decompress(ConvertArgs),
    /// Convert standard RINEX files into Compact RINEX (runs rnx2crx)
    Compress(ConvertArgs),
    /// Quality-check observation files and print primary marks (runs teqc +qc)
    Qc(QcArgs),
    /// Rewrite observation headers from a YAML site configuration (runs teqc)
    Unify(UnifyArgs),
    /// Compare observation header metadata against a YAML reference
    Metacheck(MetacheckArgs),
    /// Rename files by replacing the site code through a YAML site map
    Rename(RenameArgs),
    /// Organize files into an IGS-style YYYY/DDD/kind archive tree
    Organize(OrganizeArgs),
    /// Distribute observation files into sub-network directories
    Subnet(SubnetArgs),
    /// Report sites with no observation file for a given year and day
    Sitecheck(SitecheckArgs),
    /// Rename files to upper or lower case
    Case(CaseArgs),
    /// Copy GAMIT/GLOBK result files out of a solution tree
    CopyResults(CopyResultsArgs),
}

/// File selection shared by the file-processing subcommands
#[derive(Debug, Clone, clap::Args)]
pub struct InputArgs {
    /// Filename glob patterns of the files to process
    #[arg(value_name = "PATTERN", required = true)]
    pub files: Vec<String>,

    /// Search for matching file names in subdirectories as well
    #[arg(short = 'r', long = "recursive")]
    pub recursive: bool,
}

/// Logging verbosity shared by all subcommands
#[derive(Debug, Clone, Default, clap::Args)]
pub struct VerbosityArgs {
    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output except errors; also disables progress bars
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl VerbosityArgs {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Arguments for the decompress and compress commands
#[derive(Debug, Clone, Parser)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Keep the source file after a successful conversion
    #[arg(short = 'k', long = "keep")]
    pub keep: bool,

    /// Output directory for converted files
    ///
    /// Created if missing. Defaults to `rinex` for decompress and `crinex`
    /// for compress, in the current directory.
    #[arg(short = 'o', long = "out", value_name = "DIR")]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub verbosity: VerbosityArgs,
}

/// Arguments for the qc command
#[derive(Debug, Clone, Parser)]
pub struct QcArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format for the per-file quality marks
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ReportFormat,

    #[command(flatten)]
    pub verbosity: VerbosityArgs,
}

/// Arguments for the unify command
#[derive(Debug, Clone, Parser)]
pub struct UnifyArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Keep the source file after a successful rewrite
    #[arg(short = 'k', long = "keep")]
    pub keep: bool,

    /// Output directory for rewritten files [default: unificated]
    #[arg(short = 'o', long = "out", value_name = "DIR", default_value = "unificated")]
    pub out: PathBuf,

    /// Site information YAML file [default: _sitesinfo.yml]
    #[arg(short = 'c', long = "cfg", value_name = "FILE")]
    pub cfg: Option<PathBuf>,

    #[command(flatten)]
    pub verbosity: VerbosityArgs,
}

/// Arguments for the metacheck command
#[derive(Debug, Clone, Parser)]
pub struct MetacheckArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Site information YAML file [default: _sitesinfo.yml]
    #[arg(short = 'c', long = "cfg", value_name = "FILE")]
    pub cfg: Option<PathBuf>,

    /// Output format for reported differences
    #[arg(long = "format", value_enum, default_value = "list")]
    pub format: ReportFormat,

    /// Position change threshold in meters
    #[arg(long = "threshold", value_name = "METERS", default_value_t = 10.0)]
    pub threshold: f64,

    #[command(flatten)]
    pub verbosity: VerbosityArgs,
}

/// Arguments for the rename command
#[derive(Debug, Clone, Parser)]
pub struct RenameArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Keep the source file (rename using copy)
    #[arg(short = 'k', long = "keep")]
    pub keep: bool,

    /// Output directory [default: the file's own directory]
    #[arg(short = 'o', long = "out", value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Site map YAML file [default: _sitemap.yml]
    #[arg(short = 'c', long = "cfg", value_name = "FILE")]
    pub cfg: Option<PathBuf>,

    #[command(flatten)]
    pub verbosity: VerbosityArgs,
}

/// Arguments for the organize command
#[derive(Debug, Clone, Parser)]
pub struct OrganizeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Keep the source file (organize using copy)
    #[arg(short = 'k', long = "keep")]
    pub keep: bool,

    /// Root of the archive tree [default: daily]
    #[arg(short = 'o', long = "out", value_name = "DIR", default_value = "daily")]
    pub out: PathBuf,

    #[command(flatten)]
    pub verbosity: VerbosityArgs,
}

/// Arguments for the subnet command
#[derive(Debug, Clone, Parser)]
pub struct SubnetArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Keep the source file after distribution
    #[arg(short = 'k', long = "keep")]
    pub keep: bool,

    /// Output directory holding one folder per net [default: subnets]
    #[arg(short = 'o', long = "out", value_name = "DIR", default_value = "subnets")]
    pub out: PathBuf,

    /// Subnet YAML file [default: _subnet.yml]
    #[arg(short = 'c', long = "cfg", value_name = "FILE")]
    pub cfg: Option<PathBuf>,

    #[command(flatten)]
    pub verbosity: VerbosityArgs,
}

/// Arguments for the sitecheck command
#[derive(Debug, Clone, Parser)]
pub struct SitecheckArgs {
    /// Directories to search for observation files
    #[arg(value_name = "DIR", required = true)]
    pub dirs: Vec<PathBuf>,

    /// Search subdirectories as well
    #[arg(short = 'r', long = "recursive")]
    pub recursive: bool,

    /// Site list YAML file [default: _sites.yml]
    #[arg(short = 'c', long = "cfg", value_name = "FILE")]
    pub cfg: Option<PathBuf>,

    /// Observation year, 2 or 4 digits
    #[arg(short = 'y', long = "year", value_name = "YEAR", required = true)]
    pub year: String,

    /// Observation day of year, 1..=366
    #[arg(short = 'd', long = "doy", value_name = "DOY", required = true,
          value_parser = clap::value_parser!(u16).range(1..=366))]
    pub doy: u16,

    #[command(flatten)]
    pub verbosity: VerbosityArgs,
}

/// Arguments for the case command
#[derive(Debug, Clone, Parser)]
pub struct CaseArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Keep the source file (rename using copy); requires --out
    #[arg(short = 'k', long = "keep")]
    pub keep: bool,

    /// Output directory [default: the file's own directory]
    #[arg(short = 'o', long = "out", value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Target case for the new file names
    #[arg(long = "to", value_enum, required = true)]
    pub to: CaseDirection,

    #[command(flatten)]
    pub verbosity: VerbosityArgs,
}

impl CaseArgs {
    /// Validate the case command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if self.keep && self.out.is_none() {
            return Err(Error::configuration(
                "--keep without an output directory would copy a file onto itself",
            ));
        }
        Ok(())
    }
}

/// Arguments for the copy-results command
#[derive(Debug, Clone, Parser)]
pub struct CopyResultsArgs {
    /// Solution directory (glob patterns accepted) [default: current]
    #[arg(short = 'i', long = "dir", value_name = "DIR", default_value = ".")]
    pub dir: String,

    /// Result file types to copy: o, q, h, z, met, org, prt
    #[arg(short = 't', long = "types", value_name = "TYPE", required = true, num_args = 1..)]
    pub types: Vec<String>,

    /// Output directory [default: results]
    #[arg(short = 'o', long = "out", value_name = "DIR", default_value = "results")]
    pub out: PathBuf,

    /// Search solution subdirectories as well
    #[arg(short = 'r', long = "recursive")]
    pub recursive: bool,

    /// Overwrite existing files without asking
    #[arg(short = 'f', long = "force")]
    pub force: bool,

    #[command(flatten)]
    pub verbosity: VerbosityArgs,
}

/// Output format for per-file reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// One aligned row per file
    Table,
    /// A labeled block per file
    List,
}

/// Target case for the case command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CaseDirection {
    Upper,
    Lower,
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .expect("Command should be present when get_command() is called")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn test_verbosity_log_levels() {
        let mut verbosity = VerbosityArgs::default();
        assert_eq!(verbosity.get_log_level(), "warn");

        verbosity.verbose = 1;
        assert_eq!(verbosity.get_log_level(), "info");

        verbosity.verbose = 2;
        assert_eq!(verbosity.get_log_level(), "debug");

        verbosity.verbose = 3;
        assert_eq!(verbosity.get_log_level(), "trace");

        verbosity.quiet = true;
        assert_eq!(verbosity.get_log_level(), "error");
        assert!(!verbosity.show_progress());
    }

    #[test]
    fn test_decompress_parsing() {
        let args = Args::parse_from(["gnss-toolkit", "decompress", "-k", "-r", "*.17d"]);
        match args.get_command() {
            Commands::Decompress(convert) => {
                assert!(convert.keep);
                assert!(convert.input.recursive);
                assert_eq!(convert.input.files, vec!["*.17d"]);
                assert!(convert.out.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_patterns_are_required() {
        assert!(Args::try_parse_from(["gnss-toolkit", "decompress"]).is_err());
        assert!(Args::try_parse_from(["gnss-toolkit", "qc"]).is_err());
    }

    #[test]
    fn test_sitecheck_doy_bounds() {
        assert!(Args::try_parse_from([
            "gnss-toolkit", "sitecheck", "-y", "2017", "-d", "367", "daily"
        ])
        .is_err());
        assert!(Args::try_parse_from([
            "gnss-toolkit", "sitecheck", "-y", "2017", "-d", "42", "daily"
        ])
        .is_ok());
    }

    #[test]
    fn test_case_keep_requires_out() {
        let args = Args::parse_from(["gnss-toolkit", "case", "--to", "upper", "-k", "*.17o"]);
        match args.get_command() {
            Commands::Case(case) => assert!(case.validate().is_err()),
            other => panic!("unexpected command: {other:?}"),
        }

        let args = Args::parse_from([
            "gnss-toolkit", "case", "--to", "lower", "-k", "-o", "renamed", "*.17O",
        ]);
        match args.get_command() {
            Commands::Case(case) => assert!(case.validate().is_ok()),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_copy_results_types() {
        let args = Args::parse_from([
            "gnss-toolkit", "copy-results", "-t", "o", "q", "met", "-o", "res",
        ]);
        match args.get_command() {
            Commands::CopyResults(copy) => {
                assert_eq!(copy.types, vec!["o", "q", "met"]);
                assert_eq!(copy.out, PathBuf::from("res"));
                assert!(!copy.force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
