//! GNSS Toolkit Library
//!
//! A Rust library backing the `gnss-toolkit` command line utilities used in
//! GNSS (GPS/GLONASS) geodesy data processing workflows.
//!
//! This library provides tools for:
//! - Classifying GNSS filenames (legacy short form and long IGS form) into
//!   site, year, day-of-year and file kind
//! - Running per-file external tools (RNXCMP, teqc) over large batches with
//!   bounded concurrency and consolidated failure reporting
//! - Extracting and comparing RINEX observation header metadata against a
//!   YAML reference configuration
//! - Renaming and organizing observation files into archive layouts

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod batch_runner;
        pub mod classifier;
        pub mod discovery;
        pub mod external_tools;
        pub mod quality_report;
        pub mod rinex_header;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
    pub mod input;
}

// Re-export commonly used types
pub use app::models::{FileKind, FileRecord};
pub use app::services::batch_runner::{BatchReport, TaskOutcome};

/// Result type alias for the GNSS toolkit
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for GNSS batch operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error (missing or malformed YAML, bad CLI combination)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Invalid glob pattern supplied on the command line
    #[error("Invalid file pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// RINEX header could not be read or is malformed
    #[error("RINEX header error in file '{file}': {message}")]
    HeaderParsing { file: String, message: String },

    /// Quality-check report from the external tool could not be parsed
    #[error("Quality report error for '{file}': {message}")]
    ReportParsing { file: String, message: String },

    /// Required external tool is not installed
    #[error("External tool '{tool}' not found in PATH; install it and retry")]
    ToolMissing { tool: String },

    /// A worker task panicked or was aborted
    #[error("Worker task failed: {message}")]
    TaskJoin { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid-pattern error
    pub fn pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create a RINEX header parsing error
    pub fn header_parsing(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HeaderParsing {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a quality report parsing error
    pub fn report_parsing(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReportParsing {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a missing-tool error
    pub fn tool_missing(tool: impl Into<String>) -> Self {
        Self::ToolMissing { tool: tool.into() }
    }

    /// Create a worker join error
    pub fn task_join(message: impl Into<String>) -> Self {
        Self::TaskJoin {
            message: message.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<glob::PatternError> for Error {
    fn from(error: glob::PatternError) -> Self {
        Self::Pattern {
            pattern: String::new(),
            message: error.to_string(),
        }
    }
}

impl From<figment::Error> for Error {
    fn from(error: figment::Error) -> Self {
        Self::Configuration {
            message: error.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(error: tokio::task::JoinError) -> Self {
        Self::TaskJoin {
            message: error.to_string(),
        }
    }
}
