//! External tool invocation
//!
//! The toolkit never reimplements the RNXCMP codec or teqc; it drives them
//! as subprocesses, one per file. Commands are always built as argument
//! vectors (no shell interpolation) and their exit codes are interpreted
//! per tool, since the converters use non-zero "warning" statuses that still
//! mean success.

use crate::app::services::batch_runner::{TaskOutcome, display_name};
use crate::constants::rnxcmp_status;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::{debug, warn};

/// How a tool's exit status maps onto success and hard failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitPolicy {
    /// Only status 0 is success (teqc convention)
    Strict,

    /// One specific status is a hard error; every other status, including
    /// the tool's "finished with warnings" code, is success (RNXCMP
    /// convention: 0 = ok, 1 = error, 2 = warning)
    Tolerant { hard_error: i32 },
}

impl ExitPolicy {
    /// The RNXCMP converters' status convention.
    pub fn rnxcmp() -> Self {
        Self::Tolerant {
            hard_error: rnxcmp_status::ERROR,
        }
    }

    fn is_success(&self, status: ExitStatus) -> bool {
        match self {
            Self::Strict => status.success(),
            // A process killed by a signal has no code and is never a success.
            Self::Tolerant { hard_error } => {
                matches!(status.code(), Some(code) if code != *hard_error)
            }
        }
    }
}

/// Fail fast when a required external tool is not installed.
pub fn ensure_tool(tool: &str) -> Result<()> {
    which::which(tool)
        .map(|path| debug!("Using {} at {}", tool, path.display()))
        .map_err(|_| Error::tool_missing(tool))
}

/// One file transformation through an external tool.
///
/// The tool is invoked as `tool <args...> <source>` with stdout redirected
/// into the destination file and stderr discarded. On hard failure the
/// partially written destination is always removed before the failure is
/// reported, so a re-run starts from a clean slate.
#[derive(Debug, Clone)]
pub struct Transform {
    pub tool: String,
    pub args: Vec<String>,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub keep_source: bool,
    pub exit_policy: ExitPolicy,
}

impl Transform {
    /// Run the transformation, converting every error into a per-file outcome.
    pub async fn run(self) -> TaskOutcome {
        let name = display_name(&self.source);

        let destination_file = match std::fs::File::create(&self.destination) {
            Ok(file) => file,
            Err(e) => {
                warn!(
                    "Cannot create destination '{}': {}",
                    self.destination.display(),
                    e
                );
                return TaskOutcome::failed(name);
            }
        };

        let status = Command::new(&self.tool)
            .args(&self.args)
            .arg(&self.source)
            .stdin(Stdio::null())
            .stdout(Stdio::from(destination_file))
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if self.exit_policy.is_success(status) => {
                if !self.keep_source {
                    if let Err(e) = std::fs::remove_file(&self.source) {
                        warn!("Cannot remove source '{}': {}", self.source.display(), e);
                    }
                }
                TaskOutcome::success()
            }
            Ok(status) => {
                debug!("{} exited with {} for {}", self.tool, status, name);
                remove_partial(&self.destination);
                TaskOutcome::failed(name)
            }
            Err(e) => {
                warn!("Failed to run {}: {}", self.tool, e);
                remove_partial(&self.destination);
                TaskOutcome::failed(name)
            }
        }
    }
}

/// Run `tool <args...> <source>` and capture its stdout as text.
///
/// Used for report-producing tools; the caller interprets the exit status.
pub async fn run_capture_stdout(
    tool: &str,
    args: &[String],
    source: &Path,
) -> Result<(ExitStatus, String)> {
    let output = Command::new(tool)
        .args(args)
        .arg(source)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .await
        .map_err(|e| Error::io(format!("failed to run '{tool}'"), e))?;

    Ok((output.status, String::from_utf8_lossy(&output.stdout).into_owned()))
}

fn remove_partial(destination: &Path) {
    if let Err(e) = std::fs::remove_file(destination) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(
                "Cannot remove partial destination '{}': {}",
                destination.display(),
                e
            );
        }
    }
}
