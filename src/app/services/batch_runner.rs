//! Bounded-concurrency batch driver
//!
//! Applies a per-file worker (typically one external process per file) to a
//! static file list with a bounded number of tasks in flight, and aggregates
//! per-file outcomes into a single end-of-run report.
//!
//! Tasks are independent: they may complete in any order, results are
//! consumed in completion order, and one file's failure never aborts the
//! batch. The in-flight bound is enforced with a semaphore rather than any
//! hand-rolled counter.

use crate::{Error, Result};
use indicatif::ProgressBar;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Outcome of one per-file task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The file was processed; `report` is printed in completion order
    Success { report: Option<String> },

    /// The file was not processed (already in target form, or its name was
    /// not recognized); a distinct category, neither success nor failure
    Skipped { name: String },

    /// The external tool failed for this file
    Failed { name: String },
}

impl TaskOutcome {
    /// Plain success with nothing to print.
    pub fn success() -> Self {
        Self::Success { report: None }
    }

    /// Success carrying a per-file record to print in completion order.
    pub fn success_with(report: impl Into<String>) -> Self {
        Self::Success {
            report: Some(report.into()),
        }
    }

    /// The file was skipped.
    pub fn skipped(name: impl Into<String>) -> Self {
        Self::Skipped { name: name.into() }
    }

    /// The file failed.
    pub fn failed(name: impl Into<String>) -> Self {
        Self::Failed { name: name.into() }
    }
}

/// Aggregated result of one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Number of files handed to the driver
    pub total: usize,
    /// Number of files processed successfully
    pub succeeded: usize,
    /// Names of files whose external tool failed
    pub failed: Vec<String>,
    /// Names of files skipped before any work was done
    pub skipped: Vec<String>,
}

impl BatchReport {
    fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// True when no file failed. Skipped files do not count against success.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, outcome: &TaskOutcome) {
        match outcome {
            TaskOutcome::Success { .. } => self.succeeded += 1,
            TaskOutcome::Skipped { name } => self.skipped.push(name.clone()),
            TaskOutcome::Failed { name } => self.failed.push(name.clone()),
        }
    }
}

/// Display name used in reports: the file name component of a path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Run `worker` over `files` with at most `concurrency` tasks in flight.
///
/// The worker owns exactly one file at a time and converts every per-file
/// error into a [`TaskOutcome`] itself; the only whole-batch error is a
/// panicked worker task. Progress ticks and report lines are emitted as
/// tasks complete and never influence completion order.
pub async fn run_batch<F, Fut>(
    files: Vec<PathBuf>,
    concurrency: usize,
    progress: Option<ProgressBar>,
    worker: F,
) -> Result<BatchReport>
where
    F: Fn(PathBuf) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = TaskOutcome> + Send + 'static,
{
    debug!(
        "Starting batch of {} files with {} workers",
        files.len(),
        concurrency
    );

    let mut report = BatchReport::new(files.len());
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let worker = Arc::new(worker);
    let mut tasks = JoinSet::new();

    for path in files {
        let semaphore = semaphore.clone();
        let worker = worker.clone();
        tasks.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                // The semaphore is never closed; treat it as a task failure
                // rather than poisoning the batch.
                Err(_) => return TaskOutcome::failed(display_name(&path)),
            };
            worker(path).await
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let outcome = joined.map_err(Error::from)?;
        report.record(&outcome);

        if let TaskOutcome::Failed { name } = &outcome {
            warn!("Task failed for {}", name);
        }

        match &progress {
            Some(pb) => {
                pb.inc(1);
                if let TaskOutcome::Success { report: Some(line) } = &outcome {
                    pb.println(line);
                }
            }
            None => {
                if let TaskOutcome::Success { report: Some(line) } = &outcome {
                    println!("{line}");
                }
            }
        }
    }

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    debug!(
        "Batch complete: {} ok, {} failed, {} skipped",
        report.succeeded,
        report.failed.len(),
        report.skipped.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_batch() {
        let report = run_batch(vec![], 6, None, |_path| async { TaskOutcome::success() })
            .await
            .unwrap();
        assert_eq!(report.total, 0);
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn test_outcomes_are_aggregated() {
        let files: Vec<PathBuf> = ["a.17d", "b.17d", "c.17o", "d.17d"]
            .iter()
            .map(PathBuf::from)
            .collect();

        let report = run_batch(files, 2, None, |path| async move {
            let name = display_name(&path);
            match name.as_str() {
                "b.17d" => TaskOutcome::failed(name),
                "c.17o" => TaskOutcome::skipped(name),
                _ => TaskOutcome::success(),
            }
        })
        .await
        .unwrap();

        assert_eq!(report.total, 4);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, vec!["b.17d"]);
        assert_eq!(report.skipped, vec!["c.17o"]);
        assert!(!report.is_clean());
    }

    #[tokio::test]
    async fn test_failure_list_independent_of_completion_order() {
        use std::time::Duration;

        let files: Vec<PathBuf> = ["one.17d", "two.17d", "three.17d"]
            .iter()
            .map(PathBuf::from)
            .collect();

        // Delay the middle task so it completes last; the failure list must
        // still name exactly the failing files.
        let report = run_batch(files, 3, None, |path| async move {
            let name = display_name(&path);
            if name == "two.17d" {
                tokio::time::sleep(Duration::from_millis(50)).await;
                TaskOutcome::failed(name)
            } else {
                TaskOutcome::success()
            }
        })
        .await
        .unwrap();

        assert_eq!(report.failed, vec!["two.17d"]);
        assert_eq!(report.succeeded, 2);
    }

    #[tokio::test]
    async fn test_concurrency_bound_is_respected() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::time::Duration;

        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));
        let files: Vec<PathBuf> = (0..24).map(|i| PathBuf::from(format!("{i}.17d"))).collect();

        let bound = 4;
        let (in_flight_w, max_seen_w) = (in_flight.clone(), max_seen.clone());
        let report = run_batch(files, bound, None, move |_path| {
            let in_flight = in_flight_w.clone();
            let max_seen = max_seen_w.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                TaskOutcome::success()
            }
        })
        .await
        .unwrap();

        assert_eq!(report.succeeded, 24);
        assert!(max_seen.load(Ordering::SeqCst) <= bound);
    }
}
