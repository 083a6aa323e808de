//! teqc quality report parsing
//!
//! Extracts the primary quality marks from the report text that
//! `teqc +qc -plot -rep <file>` prints to stdout: observation window,
//! multipath and signal-to-noise averages, and the cycle slip ratio derived
//! from the final SUM line.

use crate::app::models::QualityMarks;
use crate::{Error, Result};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Labeled report fields and the fixed column slice holding each value.
/// teqc emits these in a fixed order, so the scan resumes where the previous
/// field was found instead of rescanning the whole report.
const REPORT_FIELDS: &[(&str, &str, usize, usize)] = &[
    ("start", "Time of start of window :", 25, 51),
    ("end", "Time of  end  of window :", 37, 51),
    ("length", "Time line window length :", 26, 42),
    ("mp1", "Moving average MP12     :", 26, 32),
    ("mp2", "Moving average MP21     :", 26, 32),
    ("sn1", "Mean S1                 :", 26, 31),
    ("sn2", "Mean S2                 :", 26, 31),
];

/// Parse a teqc `+qc` report into [`QualityMarks`].
///
/// `filename` only labels errors; the report itself carries no name.
pub fn parse_quality_report(filename: &str, report: &str) -> Result<QualityMarks> {
    let lines: Vec<&str> = report.lines().collect();

    let mut values: HashMap<&str, String> = HashMap::new();
    let mut last_line_no = 0;
    for &(name, flag, start, end) in REPORT_FIELDS {
        let mut found = false;
        for (number, line) in lines.iter().enumerate().skip(last_line_no) {
            if !line.contains(flag) {
                continue;
            }
            values.insert(name, slice_columns(line, start, end).to_string());
            last_line_no = number;
            found = true;
            break;
        }
        if !found {
            return Err(Error::report_parsing(
                filename,
                format!("field '{name}' not found in report"),
            ));
        }
    }

    let field = |name: &str| -> &str { values.get(name).map(String::as_str).unwrap_or("") };
    let numeric = |name: &str| -> Result<f64> {
        field(name).parse().map_err(|_| {
            Error::report_parsing(filename, format!("field '{name}' is not a number"))
        })
    };

    // 'start' holds both the date and the time of day: `2017 Aug 10  00:00:00.000`
    let start_field = field("start");
    if start_field.len() < 11 {
        return Err(Error::report_parsing(filename, "window start is truncated"));
    }
    let date = NaiveDate::parse_from_str(start_field[..11].trim(), "%Y %b %d")
        .map_err(|e| Error::report_parsing(filename, format!("bad window date: {e}")))?;
    let start = start_field[11..].trim().to_string();
    let end = field("end").to_string();

    // Observed hours and observations-per-slip come from the trailing SUM line
    let sum_line = lines
        .last()
        .ok_or_else(|| Error::report_parsing(filename, "empty report"))?;
    let tokens: Vec<&str> = sum_line.split_whitespace().collect();
    if tokens.len() < 8 {
        return Err(Error::report_parsing(filename, "SUM line is truncated"));
    }
    let hours: f64 = tokens[tokens.len() - 8].parse().map_err(|_| {
        Error::report_parsing(filename, "SUM line carries no observation hours")
    })?;
    let olps: f64 = tokens[tokens.len() - 1].parse().map_err(|_| {
        Error::report_parsing(filename, "SUM line carries no o/slps count")
    })?;
    if olps <= 0.0 {
        return Err(Error::report_parsing(filename, "o/slps must be positive"));
    }

    Ok(QualityMarks {
        date,
        start,
        end,
        hours,
        sn1: numeric("sn1")?,
        sn2: numeric("sn2")?,
        mp1: numeric("mp1")?,
        mp2: numeric("mp2")?,
        csr: 1000.0 / olps,
    })
}

/// Slice a report line by character columns, tolerating short lines.
pub(crate) fn slice_columns(line: &str, start: usize, end: usize) -> &str {
    let clamped_end = end.min(line.len());
    if start >= clamped_end {
        return "";
    }
    line.get(start..clamped_end).unwrap_or("").trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> String {
        [
            "Time of start of window : 2017 Aug 10  00:00:00.000",
            "Time of  end  of window : 2017 Aug 10  23:59:30.000",
            "Time line window length : 23.99 hour(s), ticked every 3.0 hour(s)",
            "Moving average MP12     : 0.425582 m",
            "Moving average MP21     : 0.384306 m",
            "Mean S1                 : 46.95 (sd=5.80 n=49483)",
            "Mean S2                 : 42.21 (sd=8.18 n=48411)",
            "      first epoch    last epoch    hrs   dt  #expt  #have   %   mp1   mp2 o/slps",
            "SUM 17  8 10 00:00 17  8 10 23:59 14.52  30     -   47669  -   0.43  0.38   3972",
        ]
        .join("\n")
    }

    #[test]
    fn test_parse_full_report() {
        let marks = parse_quality_report("aggo2220.17o", &sample_report()).unwrap();

        assert_eq!(marks.date, NaiveDate::from_ymd_opt(2017, 8, 10).unwrap());
        assert_eq!(marks.start, "00:00:00.000");
        assert_eq!(marks.end, "23:59:30.000");
        assert!((marks.hours - 14.52).abs() < 1e-9);
        assert!((marks.sn1 - 46.95).abs() < 1e-9);
        assert!((marks.sn2 - 42.21).abs() < 1e-9);
        assert!((marks.mp1 - 0.4255).abs() < 1e-4);
        assert!((marks.mp2 - 0.3843).abs() < 1e-4);
        assert!((marks.csr - 1000.0 / 3972.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let report = sample_report().replace("Mean S2", "Mean XX");
        let err = parse_quality_report("aggo2220.17o", &report).unwrap_err();
        assert!(err.to_string().contains("sn2"));
    }

    #[test]
    fn test_truncated_sum_line() {
        let mut lines: Vec<String> = sample_report().lines().map(String::from).collect();
        lines.pop();
        lines.push("SUM 17".to_string());
        let result = parse_quality_report("aggo2220.17o", &lines.join("\n"));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_report() {
        assert!(parse_quality_report("aggo2220.17o", "").is_err());
    }

    #[test]
    fn test_slice_columns_tolerates_short_lines() {
        assert_eq!(slice_columns("short", 25, 51), "");
        assert_eq!(slice_columns("0123456789", 2, 100), "23456789");
    }
}
