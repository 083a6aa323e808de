//! Data models for GNSS file processing
//!
//! This module contains the core data structures for representing classified
//! GNSS filenames and quality-check results, following the RINEX naming
//! conventions used by IGS data centers.

use crate::app::services::classifier::infer_year;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// =============================================================================
// File kinds
// =============================================================================

/// Kind of a GNSS data file, as encoded in its filename.
///
/// Short-form names carry the kind as the last letter of the extension
/// (`aggo0420.17o`); long IGS names carry a type letter before the extension
/// (`..._MO.crx`). Letters outside the known set are preserved verbatim so
/// that unusual products (ionosphere maps, clock files) still classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    /// RINEX observation file (`o`)
    Observation,
    /// GPS or mixed-constellation navigation file (`n`)
    NavGps,
    /// GLONASS navigation file (`g`)
    NavGlonass,
    /// Compact RINEX (Hatanaka) observation file (`d`)
    CompactObservation,
    /// Meteorological file (`m`)
    Meteorological,
    /// Observation summary file (`s`)
    Summary,
    /// Any other kind letter, passed through unchanged
    Other(char),
}

impl FileKind {
    /// Map a lowercase kind letter to its kind.
    pub fn from_letter(letter: char) -> Self {
        match letter {
            'o' => Self::Observation,
            'n' => Self::NavGps,
            'g' => Self::NavGlonass,
            'd' => Self::CompactObservation,
            'm' => Self::Meteorological,
            's' => Self::Summary,
            other => Self::Other(other),
        }
    }

    /// The lowercase kind letter used in filenames and archive directories.
    pub fn letter(&self) -> char {
        match self {
            Self::Observation => 'o',
            Self::NavGps => 'n',
            Self::NavGlonass => 'g',
            Self::CompactObservation => 'd',
            Self::Meteorological => 'm',
            Self::Summary => 's',
            Self::Other(letter) => *letter,
        }
    }

    /// Whether this kind holds observation data (standard or compact).
    pub fn is_observation(&self) -> bool {
        matches!(self, Self::Observation | Self::CompactObservation)
    }
}

// =============================================================================
// Classified filenames
// =============================================================================

/// Semantic attributes extracted from a GNSS filename.
///
/// Derived, never persisted: a record is recomputed from the filename string
/// each time it is needed, and carries no filesystem state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// 4-character site code, lowercased
    pub site: String,

    /// 2-digit observation year, zero-padded
    pub year2: String,

    /// Day of year, 1..=366
    pub doy: u16,

    /// File kind decoded from the name
    pub kind: FileKind,
}

impl FileRecord {
    /// The 3-character kind label combining year and kind letter, e.g. `17d`
    /// for a compact observation file recorded in 2017.
    pub fn kind_label(&self) -> String {
        format!("{}{}", self.year2, self.kind.letter())
    }

    /// Full 4-digit year, inferred from the 2-digit field.
    pub fn year4(&self) -> u16 {
        // year2 is always two ASCII digits once classification succeeded
        infer_year(self.year2.parse().unwrap_or(0))
    }

    /// Relative archive directory for IGS-style daily organization:
    /// `YYYY/DDD/<kind_label>`, e.g. `2017/042/17o`.
    pub fn archive_dir(&self) -> PathBuf {
        PathBuf::from(format!("{}", self.year4()))
            .join(format!("{:03}", self.doy))
            .join(self.kind_label())
    }
}

// =============================================================================
// Quality check marks
// =============================================================================

/// Primary quality marks parsed from a teqc `+qc` report.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityMarks {
    /// First observation date in the checked window
    pub date: NaiveDate,

    /// Window start time of day, e.g. `00:00:00.000`
    pub start: String,

    /// Window end time of day
    pub end: String,

    /// Observed hours taken from the report summary line
    pub hours: f64,

    /// Mean signal-to-noise ratio on L1
    pub sn1: f64,

    /// Mean signal-to-noise ratio on L2
    pub sn2: f64,

    /// Moving average multipath on L1 (meters)
    pub mp1: f64,

    /// Moving average multipath on L2 (meters)
    pub mp2: f64,

    /// Cycle slip ratio: 1000 / (observations per slip)
    pub csr: f64,
}

impl QualityMarks {
    /// One-line table record for this file's marks.
    pub fn table_row(&self, filename: &str) -> String {
        format!(
            "{:^14} {:^12} {:^14} {:^14} {:>6.2} {:>6.2}  {:>6.2}  {:>6.2}  {:>6.2}  {:>5.2}",
            filename,
            self.date.format("%Y-%m-%d").to_string(),
            self.start,
            self.end,
            self.hours,
            self.sn1,
            self.sn2,
            self.mp1,
            self.mp2,
            self.csr,
        )
    }

    /// Multi-line listing of this file's marks.
    pub fn list_block(&self, filename: &str) -> String {
        format!(
            "\n{} quality marks:\ndate: {}\nstart: {}\nend: {}\nhours: {}\n\
             SN1: {:.2}\nSN2: {:.2}\nMP1: {:.2}\nMP2: {:.2}\nCSR: {:.2}",
            filename,
            self.date.format("%Y-%m-%d"),
            self.start,
            self.end,
            self.hours,
            self.sn1,
            self.sn2,
            self.mp1,
            self.mp2,
            self.csr,
        )
    }

    /// Column header matching [`QualityMarks::table_row`].
    pub fn table_header() -> String {
        format!(
            "\n{:^14} {:^12} {:^14} {:^14} {:>6} {:>6}  {:>6}  {:>6}  {:>6}  {:>5}",
            "file", "date", "start", "end", "hours", "SN1", "SN2", "MP1", "MP2", "CSR"
        )
    }
}
