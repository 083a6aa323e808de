//! File discovery shared by all subcommands
//!
//! Every tool in this kit accepts one or more filename glob patterns and an
//! optional recursive flag. This module is the single place that turns those
//! inputs into a concrete file list, so the matching rules cannot drift
//! between commands.

use crate::{Error, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Expand glob patterns into a sorted, de-duplicated list of files.
///
/// Each pattern is expanded relative to the current directory. With
/// `recursive`, patterns that carry no path component are additionally
/// matched against file names anywhere beneath the current directory, so
/// `"*.17d" -r` finds compact files in any subdirectory.
pub fn discover_files(patterns: &[String], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let matched = glob::glob(pattern)
            .map_err(|e| Error::pattern(pattern.clone(), e.to_string()))?
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file());
        files.extend(matched);

        if recursive && !pattern.contains(std::path::MAIN_SEPARATOR) && !pattern.contains('/') {
            let name_pattern =
                Pattern::new(pattern).map_err(|e| Error::pattern(pattern.clone(), e.to_string()))?;
            for entry in WalkDir::new(".")
                .min_depth(2)
                .follow_links(false)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if !path.is_file() {
                    continue;
                }
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    if name_pattern.matches(name) {
                        files.push(path.to_path_buf());
                    }
                }
            }
        }
    }

    // Sort for consistent processing order
    files.sort();
    files.dedup();

    debug!("Discovered {} files from {} patterns", files.len(), patterns.len());
    Ok(files)
}

/// List the files directly inside `dir` whose names match `pattern`.
pub fn files_matching_in(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let name_pattern =
        Pattern::new(pattern).map_err(|e| Error::pattern(pattern.to_string(), e.to_string()))?;
    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir)
        .map_err(|e| Error::io(format!("failed to read directory '{}'", dir.display()), e))?;
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name_pattern.matches(name) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Enumerate the files beneath `dir`: only the first level unless `recursive`.
pub fn walk_files(dir: &Path, recursive: bool) -> Vec<PathBuf> {
    let walker = if recursive {
        WalkDir::new(dir)
    } else {
        WalkDir::new(dir).max_depth(1)
    };

    walker
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.into_path())
        .collect()
}
