use clap::Parser;
use gnss_toolkit::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(commands::run(args));

    match result {
        Ok(summary) => {
            // A non-zero exit code signals "at least one file failed"; the
            // failure causes are in the printed summary, not the exit code.
            if summary.is_clean() {
                process::exit(0);
            }
            process::exit(1);
        }
        Err(error) => {
            // Batch-level error - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("GNSS Toolkit - Batch utilities for GNSS geodesy data processing");
    println!("===============================================================");
    println!();
    println!("Convert, quality-check, rename and organize RINEX/Compact RINEX files");
    println!("in bulk. The RNXCMP converters and teqc must be installed separately.");
    println!();
    println!("USAGE:");
    println!("    gnss-toolkit <COMMAND> [OPTIONS] <PATTERN>...");
    println!();
    println!("COMMANDS:");
    println!("    decompress    Convert Compact RINEX into standard RINEX (crx2rnx)");
    println!("    compress      Convert standard RINEX into Compact RINEX (rnx2crx)");
    println!("    qc            Quality-check observation files (teqc +qc)");
    println!("    unify         Rewrite observation headers from a YAML site config (teqc)");
    println!("    metacheck     Compare header metadata against a YAML reference");
    println!("    rename        Rename files through a YAML site map");
    println!("    organize      Organize files into a YYYY/DDD/kind archive tree");
    println!("    subnet        Distribute observation files into sub-network folders");
    println!("    sitecheck     Report sites with no observation for a year and day");
    println!("    case          Rename files to upper or lower case");
    println!("    copy-results  Copy GAMIT/GLOBK result files out of a solution tree");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Decompress every compact file of day 042, removing the sources:");
    println!("    gnss-toolkit decompress '*0420.17d' -o rinex");
    println!();
    println!("    # Quality-check a year of observations, searching subdirectories:");
    println!("    gnss-toolkit qc -r '*.17o' --format table");
    println!();
    println!("    # Check which sites are missing for 2017, day 042:");
    println!("    gnss-toolkit sitecheck -y 2017 -d 42 daily/2017/042");
    println!();
    println!("For detailed help on any command, use:");
    println!("    gnss-toolkit <COMMAND> --help");
}
