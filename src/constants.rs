//! Application constants for the GNSS toolkit
//!
//! This module contains all configuration constants, default values,
//! and mappings used throughout the toolkit.

// =============================================================================
// Concurrency
// =============================================================================

/// Floor for the worker pool size. Small machines still get a useful amount
/// of overlap while waiting on external processes; larger machines scale up
/// to one worker per processing unit.
pub const WORKER_POOL_FLOOR: usize = 6;

/// Compute the worker pool size: `max(WORKER_POOL_FLOOR, cpu_count)`.
pub fn worker_pool_size() -> usize {
    WORKER_POOL_FLOOR.max(num_cpus::get())
}

// =============================================================================
// External tools
// =============================================================================

/// RNXCMP decompressor: Compact RINEX -> standard RINEX
pub const CRX2RNX_TOOL: &str = "crx2rnx";

/// RNXCMP compressor: standard RINEX -> Compact RINEX
pub const RNX2CRX_TOOL: &str = "rnx2crx";

/// Quality check and header editing tool
pub const TEQC_TOOL: &str = "teqc";

/// Exit status values reported by the RNXCMP converters
pub mod rnxcmp_status {
    /// Conversion succeeded
    pub const SUCCESS: i32 = 0;

    /// Hard error; the destination file is unusable
    pub const ERROR: i32 = 1;

    /// Finished with warnings; the destination file is still usable
    pub const WARNING: i32 = 2;
}

// =============================================================================
// RINEX headers and filenames
// =============================================================================

/// Header terminator label in RINEX observation files
pub const END_OF_HEADER: &str = "END OF HEADER";

/// Maximum number of lines scanned while looking for header fields; a file
/// without `END OF HEADER` within this window is rejected as malformed.
pub const MAX_HEADER_LINES: usize = 200;

/// Two-digit years below this value belong to the 2000s, the rest to the
/// 1900s. Applied everywhere a year is inferred from a 2-digit field.
pub const CENTURY_PIVOT: u16 = 80;

// =============================================================================
// Configuration files
// =============================================================================

/// Default site-information config consumed by `metacheck` and `unify`
pub const DEFAULT_SITESINFO_FILE: &str = "_sitesinfo.yml";

/// Default site map config consumed by `rename`
pub const DEFAULT_SITEMAP_FILE: &str = "_sitemap.yml";

/// Default subnet config consumed by `subnet`
pub const DEFAULT_SUBNET_FILE: &str = "_subnet.yml";

/// Default site list config consumed by `sitecheck`
pub const DEFAULT_SITES_FILE: &str = "_sites.yml";

/// Key in the site-information config whose attributes apply to every site
/// before site-specific overrides.
pub const SITESINFO_DEFAULT_KEY: &str = "all";

// =============================================================================
// GAMIT/GLOBK result files
// =============================================================================

/// Glob patterns for GAMIT/GLOBK solution files, by result type
pub const RESULT_FILE_PATTERNS: &[(&str, &str)] = &[
    ("o", "o????a.[0-9][0-9][0-9]"),
    ("q", "q????a.[0-9][0-9][0-9]"),
    ("h", "h????a.[0-9][0-9][0-9][0-9][0-9]"),
    ("z", "z????[0-9].[0-9][0-9][0-9]"),
    ("met", "met_????.[0-9][0-9][0-9][0-9][0-9]"),
    ("org", "globk_????_[0-9][0-9][0-9][0-9][0-9].org"),
    ("prt", "globk_????_[0-9][0-9][0-9][0-9][0-9].prt"),
];

/// Working subdirectories of a GAMIT/GLOBK solution tree that never contain
/// result files and are skipped during recursive copy.
pub const RESULT_SKIP_DIRS: &[&str] = &[
    "archive", "brdc", "igs", "control", "figs", "gfiles", "glbf", "ionex", "met", "mkrinex",
    "raw", "rinex", "tables",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_pool_size_floor() {
        assert!(worker_pool_size() >= WORKER_POOL_FLOOR);
    }

    #[test]
    fn test_result_patterns_cover_known_types() {
        let types: Vec<&str> = RESULT_FILE_PATTERNS.iter().map(|(t, _)| *t).collect();
        assert_eq!(types, vec!["o", "q", "h", "z", "met", "org", "prt"]);
    }
}
