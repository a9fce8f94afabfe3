//! Observer hooks for analysis outcomes.
//!
//! The engine does not log on its own. When [`crate::config::AnalyticsOptions::observer`] is set,
//! every analysis call reports exactly one success or failure to it, and failures at or above
//! [`crate::config::AnalyticsOptions::alert_at_or_above`] are also raised as alerts.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::analytics::AnalysisKind;
use crate::error::AnalysisError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event: a valid query that produced nothing.
    Warning,
    /// Error-level event: the dataset lacks something the analysis needs.
    Error,
    /// Critical error.
    Critical,
}

impl Severity {
    /// Severity assigned to an in-band analysis failure.
    pub fn of(error: &AnalysisError) -> Self {
        match error {
            AnalysisError::NoData => Severity::Warning,
            AnalysisError::MissingColumn { .. } => Severity::Error,
        }
    }
}

/// Context about an analysis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisContext {
    /// Which analysis ran.
    pub analysis: AnalysisKind,
}

/// Minimal stats reported on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisStats {
    /// Number of rows in the result's `data`.
    pub rows: usize,
}

/// Observer interface for analysis outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait AnalysisObserver: Send + Sync {
    /// Called when an analysis succeeds.
    fn on_success(&self, _ctx: &AnalysisContext, _stats: AnalysisStats) {}

    /// Called when an analysis returns a failure envelope.
    fn on_failure(&self, _ctx: &AnalysisContext, _severity: Severity, _error: &AnalysisError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &AnalysisContext, severity: Severity, error: &AnalysisError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn AnalysisObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn AnalysisObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl AnalysisObserver for CompositeObserver {
    fn on_success(&self, ctx: &AnalysisContext, stats: AnalysisStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &AnalysisContext, severity: Severity, error: &AnalysisError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &AnalysisContext, severity: Severity, error: &AnalysisError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs analysis events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl AnalysisObserver for StdErrObserver {
    fn on_success(&self, ctx: &AnalysisContext, stats: AnalysisStats) {
        eprintln!("[analytics][ok] analysis={} rows={}", ctx.analysis, stats.rows);
    }

    fn on_failure(&self, ctx: &AnalysisContext, severity: Severity, error: &AnalysisError) {
        eprintln!("[analytics][{:?}] analysis={} err={}", severity, ctx.analysis, error);
    }

    fn on_alert(&self, ctx: &AnalysisContext, severity: Severity, error: &AnalysisError) {
        eprintln!(
            "[ALERT][analytics][{:?}] analysis={} err={}",
            severity, ctx.analysis, error
        );
    }
}

/// Appends analysis events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{} {line}", chrono::Local::now().to_rfc3339());
        }
    }
}

impl AnalysisObserver for FileObserver {
    fn on_success(&self, ctx: &AnalysisContext, stats: AnalysisStats) {
        self.append_line(&format!("ok analysis={} rows={}", ctx.analysis, stats.rows));
    }

    fn on_failure(&self, ctx: &AnalysisContext, severity: Severity, error: &AnalysisError) {
        self.append_line(&format!(
            "fail severity={:?} analysis={} err={}",
            severity, ctx.analysis, error
        ));
    }

    fn on_alert(&self, ctx: &AnalysisContext, severity: Severity, error: &AnalysisError) {
        self.append_line(&format!(
            "ALERT severity={:?} analysis={} err={}",
            severity, ctx.analysis, error
        ));
    }
}
