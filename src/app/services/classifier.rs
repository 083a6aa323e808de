//! GNSS filename classification
//!
//! Maps a GNSS data filename (legacy short form or long IGS form) to its
//! semantic attributes: 4-character site code, 2-digit year, day of year and
//! file kind. Classification is a pure function of the name string; it never
//! touches the filesystem.
//!
//! Two naming families are recognized:
//!
//! - short form, e.g. `aggo0420.17o`: 4 alphanumeric site characters, 3-digit
//!   day of year, one session character, a dot, 2-digit year and a kind letter;
//! - long IGS form, e.g. `WARN00DEU_R_20170420000_01D_30S_MO.crx`: 9-character
//!   station id, data source, `YYYYDDDHHMM` epoch, file period, sample rate,
//!   constellation and type letters, and an `rnx`/`crx` extension.
//!
//! Anything else is reported as unrecognized; an unmatched name is a distinct
//! category for callers, never an error and never a silent mis-bucket.

use crate::app::models::{FileKind, FileRecord};
use crate::constants::CENTURY_PIVOT;
use crate::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static SHORT_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9a-z]{4})([0-9]{3})[0-9a-z]\.([0-9]{2})([a-z])$").unwrap()
});

static LONG_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([0-9a-z]{4})[0-9]{2}[a-z]{3}_[rs]_([0-9]{4})([0-9]{3})[0-9]{4}_[0-9]{2}[dhm]_[0-9]{2}[sz]_([a-z])([a-z])\.(rnx|crx)$",
    )
    .unwrap()
});

/// Infer a full year from a 2-digit year field.
///
/// Years below the pivot belong to the 2000s, the rest to the 1900s. This is
/// the single century policy for the whole toolkit; every consumer of a
/// 2-digit year goes through here.
pub fn infer_year(year2: u16) -> u16 {
    if year2 < CENTURY_PIVOT {
        2000 + year2
    } else {
        1900 + year2
    }
}

/// Parse a year given on the command line: exactly 2 or exactly 4 digits.
///
/// 2-digit years go through [`infer_year`]; anything else is rejected.
pub fn parse_year_arg(value: &str) -> Result<u16> {
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::configuration(format!(
            "invalid year '{value}': not a number"
        )));
    }
    match value.len() {
        2 => Ok(infer_year(value.parse().map_err(|_| {
            Error::configuration(format!("invalid year '{value}'"))
        })?)),
        4 => value
            .parse()
            .map_err(|_| Error::configuration(format!("invalid year '{value}'"))),
        _ => Err(Error::configuration(format!(
            "invalid year '{value}': expected 2 or 4 digits"
        ))),
    }
}

/// Classify a filename into its [`FileRecord`] attributes.
///
/// Returns `None` for names matching neither naming family, or whose day of
/// year falls outside 1..=366.
pub fn classify(filename: &str) -> Option<FileRecord> {
    let lower = filename.to_lowercase();

    if let Some(caps) = SHORT_FORM.captures(&lower) {
        let doy: u16 = caps[2].parse().ok()?;
        if !(1..=366).contains(&doy) {
            return None;
        }
        let kind_letter = caps[4].chars().next()?;
        return Some(FileRecord {
            site: caps[1].to_string(),
            year2: caps[3].to_string(),
            doy,
            kind: FileKind::from_letter(kind_letter),
        });
    }

    if let Some(caps) = LONG_FORM.captures(&lower) {
        let year4: u16 = caps[2].parse().ok()?;
        let doy: u16 = caps[3].parse().ok()?;
        if !(1..=366).contains(&doy) {
            return None;
        }
        let constellation = caps[4].chars().next()?;
        let type_letter = caps[5].chars().next()?;
        let kind = if &caps[6] == "crx" {
            FileKind::CompactObservation
        } else {
            long_form_kind(constellation, type_letter)
        };
        return Some(FileRecord {
            site: caps[1].to_string(),
            year2: format!("{:02}", year4 % 100),
            doy,
            kind,
        });
    }

    None
}

/// Decode the kind of a long-form `rnx` file from its constellation and type
/// letters. GLONASS navigation is the one case the constellation decides.
fn long_form_kind(constellation: char, type_letter: char) -> FileKind {
    match type_letter {
        'o' => FileKind::Observation,
        'n' if constellation == 'r' => FileKind::NavGlonass,
        'n' => FileKind::NavGps,
        'm' => FileKind::Meteorological,
        other => FileKind::Other(other),
    }
}

/// Destination name for decompressing a Compact RINEX file.
///
/// Returns `None` when the name does not denote a compact observation file;
/// callers report such inputs as skipped rather than converting blindly.
/// Replacement characters follow the case of the source extension.
pub fn decompressed_name(filename: &str) -> Option<String> {
    let record = classify(filename)?;
    if record.kind != FileKind::CompactObservation {
        return None;
    }
    if filename.to_lowercase().ends_with(".crx") {
        let (stem, ext) = filename.split_at(filename.len() - 3);
        let replacement = if ext.chars().all(|c| c.is_ascii_uppercase()) {
            "RNX"
        } else {
            "rnx"
        };
        Some(format!("{stem}{replacement}"))
    } else {
        let last = filename.chars().last()?;
        let replacement = if last.is_ascii_uppercase() { 'O' } else { 'o' };
        Some(format!("{}{}", &filename[..filename.len() - 1], replacement))
    }
}

/// Destination name for compressing a standard RINEX observation file.
///
/// Mirror image of [`decompressed_name`]: `None` unless the name denotes a
/// standard observation file.
pub fn compressed_name(filename: &str) -> Option<String> {
    let record = classify(filename)?;
    if record.kind != FileKind::Observation {
        return None;
    }
    if filename.to_lowercase().ends_with(".rnx") {
        let (stem, ext) = filename.split_at(filename.len() - 3);
        let replacement = if ext.chars().all(|c| c.is_ascii_uppercase()) {
            "CRX"
        } else {
            "crx"
        };
        Some(format!("{stem}{replacement}"))
    } else {
        let last = filename.chars().last()?;
        let replacement = if last.is_ascii_uppercase() { 'D' } else { 'd' };
        Some(format!("{}{}", &filename[..filename.len() - 1], replacement))
    }
}

/// Check whether a filename denotes an observation file (standard or compact)
/// recorded at the given year and day of year.
pub fn is_observation_for(filename: &str, year: u16, doy: u16) -> bool {
    match classify(filename) {
        Some(record) => record.kind.is_observation() && record.year4() == year && record.doy == doy,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_century_inference() {
        assert_eq!(infer_year(79), 2079);
        assert_eq!(infer_year(17), 2017);
        assert_eq!(infer_year(85), 1985);
        assert_eq!(infer_year(80), 1980);
        assert_eq!(infer_year(0), 2000);
    }

    #[test]
    fn test_year_arg_validation() {
        assert_eq!(parse_year_arg("17").unwrap(), 2017);
        assert_eq!(parse_year_arg("99").unwrap(), 1999);
        assert_eq!(parse_year_arg("2017").unwrap(), 2017);
        assert!(parse_year_arg("201").is_err());
        assert!(parse_year_arg("20177").is_err());
        assert!(parse_year_arg("17o").is_err());
        assert!(parse_year_arg("").is_err());
    }

    #[test]
    fn test_classify_short_observation() {
        let record = classify("aggo0420.17o").unwrap();
        assert_eq!(record.site, "aggo");
        assert_eq!(record.year2, "17");
        assert_eq!(record.doy, 42);
        assert_eq!(record.kind, FileKind::Observation);
        assert_eq!(record.kind_label(), "17o");
    }

    #[test]
    fn test_classify_short_family() {
        assert_eq!(classify("brdc0420.17n").unwrap().kind, FileKind::NavGps);
        assert_eq!(
            classify("brdc0420.17g").unwrap().kind,
            FileKind::NavGlonass
        );
        assert_eq!(
            classify("daej0420.17m").unwrap().kind,
            FileKind::Meteorological
        );
        assert_eq!(
            classify("algo0420.17d").unwrap().kind,
            FileKind::CompactObservation
        );
        assert_eq!(classify("aggo0420.17s").unwrap().kind, FileKind::Summary);
        // unknown kind letters pass through
        assert_eq!(classify("aggo0420.17p").unwrap().kind, FileKind::Other('p'));
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        let record = classify("ALGO0420.17D").unwrap();
        assert_eq!(record.site, "algo");
        assert_eq!(record.kind, FileKind::CompactObservation);
        assert_eq!(record.kind_label(), "17d");
    }

    #[test]
    fn test_classify_long_form() {
        let record = classify("WARN00DEU_R_20170420000_01D_30S_MO.crx").unwrap();
        assert_eq!(record.site, "warn");
        assert_eq!(record.year2, "17");
        assert_eq!(record.doy, 42);
        assert_eq!(record.kind, FileKind::CompactObservation);
        assert_eq!(record.kind_label(), "17d");

        let nav = classify("ALGO00CAN_R_20170420000_01D_30S_MN.rnx").unwrap();
        assert_eq!(nav.kind, FileKind::NavGps);
        assert_eq!(nav.kind_label(), "17n");

        let glonass = classify("ALGO00CAN_R_20170420000_01D_30S_RN.rnx").unwrap();
        assert_eq!(glonass.kind, FileKind::NavGlonass);

        let meteo = classify("DAVS00ATA_R_20170420000_01D_30S_MM.RNX").unwrap();
        assert_eq!(meteo.kind, FileKind::Meteorological);
        assert_eq!(meteo.kind_label(), "17m");

        let obs = classify("SHAO00CHN_R_20170420000_01D_30S_MO.rnx").unwrap();
        assert_eq!(obs.kind, FileKind::Observation);
        assert_eq!(obs.kind_label(), "17o");
    }

    #[test]
    fn test_short_form_invariants() {
        for name in ["aggo0420.17o", "bjfs3661.99d", "wuhn0011.05n"] {
            let record = classify(name).unwrap();
            assert_eq!(record.year2.len(), 2);
            assert!(record.year2.chars().all(|c| c.is_ascii_digit()));
            assert!((1..=366).contains(&record.doy));
        }
    }

    #[test]
    fn test_unrecognized_names() {
        assert!(classify("readme.txt").is_none());
        assert!(classify("aggo042.17o").is_none()); // doy too short
        assert!(classify("aggo04200.17o").is_none()); // doy too long
        assert!(classify("agg0420.17o").is_none()); // 3-char site
        assert!(classify("aggo0420.1o").is_none()); // 1-digit year
        assert!(classify("aggo0420.17").is_none()); // no kind letter
        assert!(classify("").is_none());
    }

    #[test]
    fn test_day_of_year_bounds() {
        assert!(classify("aggo0000.17o").is_none());
        assert!(classify("aggo3670.17o").is_none());
        assert!(classify("aggo3660.17o").is_some());
        assert!(classify("aggo0010.17o").is_some());
        assert!(classify("WARN00DEU_R_20170000000_01D_30S_MO.crx").is_none());
        assert!(classify("WARN00DEU_R_20173670000_01D_30S_MO.crx").is_none());
    }

    #[test]
    fn test_decompressed_name() {
        assert_eq!(
            decompressed_name("aggo0420.17d").as_deref(),
            Some("aggo0420.17o")
        );
        assert_eq!(
            decompressed_name("ALGO0420.17D").as_deref(),
            Some("ALGO0420.17O")
        );
        assert_eq!(
            decompressed_name("WARN00DEU_R_20170420000_01D_30S_MO.crx").as_deref(),
            Some("WARN00DEU_R_20170420000_01D_30S_MO.rnx")
        );
        // already standard, or not an observation file at all
        assert!(decompressed_name("aggo0420.17o").is_none());
        assert!(decompressed_name("SHAO00CHN_R_20170420000_01D_30S_MO.rnx").is_none());
        assert!(decompressed_name("brdc0420.17n").is_none());
        assert!(decompressed_name("notes.txt").is_none());
    }

    #[test]
    fn test_compressed_name() {
        assert_eq!(
            compressed_name("aggo0420.17o").as_deref(),
            Some("aggo0420.17d")
        );
        assert_eq!(
            compressed_name("AGGO0420.17O").as_deref(),
            Some("AGGO0420.17D")
        );
        assert_eq!(
            compressed_name("SHAO00CHN_R_20170420000_01D_30S_MO.rnx").as_deref(),
            Some("SHAO00CHN_R_20170420000_01D_30S_MO.crx")
        );
        assert!(compressed_name("aggo0420.17d").is_none());
        assert!(compressed_name("WARN00DEU_R_20170420000_01D_30S_MO.crx").is_none());
    }

    #[test]
    fn test_is_observation_for() {
        assert!(is_observation_for("aggo0420.17o", 2017, 42));
        assert!(is_observation_for("ALGO0420.17D", 2017, 42));
        assert!(!is_observation_for("bjfs0420.17n", 2017, 42));
        assert!(is_observation_for(
            "WARN00DEU_R_20170420000_01D_30S_MO.crx",
            2017,
            42
        ));
        assert!(!is_observation_for(
            "DAVS00ATA_R_20170420000_01D_30S_MM.RNX",
            2017,
            42
        ));
        // wrong epoch
        assert!(!is_observation_for("aggo0420.17o", 2016, 42));
        assert!(!is_observation_for("aggo0420.17o", 2017, 43));
    }
}
