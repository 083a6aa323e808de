//! RINEX observation header metadata
//!
//! Extracts the fixed-column header fields used for site metadata checks and
//! compares them against the reference attributes from the YAML site
//! configuration. Header fields are identified by a label string anywhere in
//! the line; the value sits at a fixed character-column slice. The header
//! ends at the line containing `END OF HEADER`.

use crate::app::services::quality_report::slice_columns;
use crate::config::SiteAttributes;
use crate::constants::{END_OF_HEADER, MAX_HEADER_LINES};
use crate::{Error, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Checked header attributes: name, identifying label, value column slice.
const HEADER_FIELDS: &[(&str, &str, usize, usize)] = &[
    ("receiver", "REC # / TYPE / VERS", 20, 40),
    ("antenna", "ANT # / TYPE", 20, 40),
    ("delta", "ANTENNA: DELTA H/E/N", 0, 42),
    ("position", "APPROX POSITION XYZ", 0, 42),
];

/// One attribute whose header value disagrees with the reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Difference {
    /// Attribute name (`receiver`, `antenna`, `delta`, `position`)
    pub attribute: String,
    /// Value expected by the configuration
    pub expected: String,
    /// Value found in the observation header
    pub actual: String,
}

/// Read the checked metadata fields from a RINEX observation header.
///
/// Only the header is read; scanning stops at `END OF HEADER`. A file with
/// no header terminator within the scan window is rejected as malformed.
pub fn read_observation_meta(path: &Path) -> Result<HashMap<String, String>> {
    let file = File::open(path)
        .map_err(|e| Error::io(format!("failed to open '{}'", path.display()), e))?;
    let reader = BufReader::new(file);

    let mut meta = HashMap::new();
    let mut terminated = false;

    for line in reader.lines().take(MAX_HEADER_LINES) {
        let line = line
            .map_err(|e| Error::io(format!("failed to read '{}'", path.display()), e))?;
        if line.contains(END_OF_HEADER) {
            terminated = true;
            break;
        }
        for &(name, label, start, end) in HEADER_FIELDS {
            if line.contains(label) {
                meta.insert(name.to_string(), slice_columns(&line, start, end).to_string());
            }
        }
    }

    if !terminated {
        return Err(Error::header_parsing(
            path.display().to_string(),
            format!("no '{END_OF_HEADER}' within the first {MAX_HEADER_LINES} lines"),
        ));
    }

    debug!("Read {} header fields from {}", meta.len(), path.display());
    Ok(meta)
}

/// Compare header metadata against the reference attributes for the site.
///
/// Attributes absent from the reference are not checked. `position`
/// compares numerically per component against `threshold` (meters); every
/// other attribute compares as a trimmed string.
pub fn compare_meta(
    file_meta: &HashMap<String, String>,
    reference: &SiteAttributes,
    threshold: f64,
) -> Vec<Difference> {
    let mut differences = Vec::new();

    for &(name, _, _, _) in HEADER_FIELDS {
        let Some(actual) = file_meta.get(name) else {
            continue;
        };
        let Some(expected) = reference.get(name) else {
            continue;
        };
        let expected = expected.as_text();
        let expected = expected.trim();

        let differs = if name == "position" {
            positions_differ(actual, expected, threshold)
        } else {
            actual != expected
        };

        if differs {
            differences.push(Difference {
                attribute: name.to_string(),
                expected: expected.to_string(),
                actual: actual.clone(),
            });
        }
    }

    differences
}

/// Component-wise numeric comparison of two `X Y Z` position strings.
/// Values that do not parse as numbers fall back to string comparison.
fn positions_differ(actual: &str, expected: &str, threshold: f64) -> bool {
    let parse = |text: &str| -> Option<Vec<f64>> {
        text.split_whitespace().map(|n| n.parse().ok()).collect()
    };

    match (parse(actual), parse(expected)) {
        (Some(file_pos), Some(ref_pos)) => {
            if file_pos.len() != ref_pos.len() {
                return true;
            }
            file_pos
                .iter()
                .zip(ref_pos.iter())
                .any(|(f, r)| (f - r).abs() > threshold)
        }
        _ => actual != expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AttributeValue;
    use std::fs;
    use tempfile::TempDir;

    fn sample_header() -> String {
        [
            "     2.11           OBSERVATION DATA    M (MIXED)           RINEX VERSION / TYPE",
            "4928353             TRIMBLE NETR9       5.22                REC # / TYPE / VERS",
            "                    TRM59800.00     SCIT                    ANT # / TYPE",
            " -2148744.8400  4426642.9600  4044657.8600                  APPROX POSITION XYZ",
            "        0.0083        0.0000        0.0000                  ANTENNA: DELTA H/E/N",
            "                                                            END OF HEADER",
            "observation records follow",
        ]
        .join("\n")
    }

    fn reference(entries: &[(&str, &str)]) -> SiteAttributes {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), AttributeValue::Text(v.to_string())))
            .collect()
    }

    #[test]
    fn test_read_observation_meta() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("aggo0420.17o");
        fs::write(&path, sample_header()).unwrap();

        let meta = read_observation_meta(&path).unwrap();
        assert_eq!(meta.get("receiver").unwrap(), "TRIMBLE NETR9");
        assert_eq!(meta.get("antenna").unwrap(), "TRM59800.00     SCIT");
        assert_eq!(
            meta.get("position").unwrap(),
            "-2148744.8400  4426642.9600  4044657.8600"
        );
        assert_eq!(
            meta.get("delta").unwrap(),
            "0.0083        0.0000        0.0000"
        );
    }

    #[test]
    fn test_header_without_terminator_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("aggo0420.17o");
        fs::write(&path, "just some text\nwith no terminator\n").unwrap();

        assert!(matches!(
            read_observation_meta(&path),
            Err(Error::HeaderParsing { .. })
        ));
    }

    #[test]
    fn test_compare_meta_string_mismatch() {
        let mut file_meta = HashMap::new();
        file_meta.insert("receiver".to_string(), "TRIMBLE NETR9".to_string());

        let diffs = compare_meta(
            &file_meta,
            &reference(&[("receiver", "TRIMBLE NETR8")]),
            10.0,
        );
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].attribute, "receiver");
        assert_eq!(diffs[0].expected, "TRIMBLE NETR8");
        assert_eq!(diffs[0].actual, "TRIMBLE NETR9");

        let same = compare_meta(
            &file_meta,
            &reference(&[("receiver", "TRIMBLE NETR9")]),
            10.0,
        );
        assert!(same.is_empty());
    }

    #[test]
    fn test_compare_meta_position_threshold() {
        let mut file_meta = HashMap::new();
        file_meta.insert(
            "position".to_string(),
            "-2148744.84 4426642.96 4044657.86".to_string(),
        );

        // 11 m offset on X exceeds the 10 m threshold
        let diffs = compare_meta(
            &file_meta,
            &reference(&[("position", "-2148755.84 4426642.96 4044657.85")]),
            10.0,
        );
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].attribute, "position");

        // sub-threshold drift is accepted
        let close = compare_meta(
            &file_meta,
            &reference(&[("position", "-2148744.00 4426642.96 4044657.86")]),
            10.0,
        );
        assert!(close.is_empty());
    }

    #[test]
    fn test_compare_meta_skips_unconfigured_attributes() {
        let mut file_meta = HashMap::new();
        file_meta.insert("receiver".to_string(), "TRIMBLE NETR9".to_string());
        file_meta.insert("antenna".to_string(), "TRM59800.00     SCIT".to_string());

        let diffs = compare_meta(&file_meta, &reference(&[]), 10.0);
        assert!(diffs.is_empty());
    }

    #[test]
    fn test_position_component_count_mismatch() {
        assert!(positions_differ("1.0 2.0 3.0", "1.0 2.0", 10.0));
        assert!(!positions_differ("1.0 2.0 3.0", "1.0 2.0 3.0", 10.0));
    }
}
