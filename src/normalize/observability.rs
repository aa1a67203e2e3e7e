use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::error::NormalizeError;
use crate::types::{display_name, Delimiter};

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizeSeverity {
    /// The file could not be converted (malformed UTF-8, unusable backup suffix).
    Error,
    /// I/O failure: backup copy, temp file, rename.
    Critical,
}

impl NormalizeSeverity {
    /// Classify an error for reporting.
    pub fn for_error(e: &NormalizeError) -> Self {
        match e {
            NormalizeError::Io(_) | NormalizeError::Persist(_) | NormalizeError::Glob(_) => Self::Critical,
            NormalizeError::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(_) => Self::Critical,
                _ => Self::Error,
            },
            NormalizeError::DirectoryNotFound { .. } => Self::Critical,
            NormalizeError::Pattern(_) | NormalizeError::BackupIsSource { .. } => Self::Error,
        }
    }
}

/// Context about the file being normalized.
#[derive(Debug, Clone)]
pub struct NormalizeContext {
    /// The candidate file path.
    pub path: PathBuf,
}

impl NormalizeContext {
    /// File name used in console output.
    pub fn name(&self) -> String {
        display_name(&self.path)
    }
}

/// Stats reported when a file is converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionStats {
    /// Delimiter the original used.
    pub from: Delimiter,
    /// Number of rows rewritten.
    pub rows: usize,
    /// Backup written before the rewrite.
    pub backup: PathBuf,
}

/// Observer interface for per-file normalization outcomes.
///
/// Implementors can print progress, record logs, or trigger alerts.
pub trait NormalizeObserver: Send + Sync {
    /// Called when a file is already comma-delimited.
    fn on_skipped(&self, _ctx: &NormalizeContext) {}

    /// Called after a file was backed up and replaced.
    fn on_converted(&self, _ctx: &NormalizeContext, _stats: &ConversionStats) {}

    /// Called when a file fails.
    fn on_failure(&self, _ctx: &NormalizeContext, _severity: NormalizeSeverity, _error: &NormalizeError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &NormalizeContext, severity: NormalizeSeverity, error: &NormalizeError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Forwards every callback to each wrapped observer, in order.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn NormalizeObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn NormalizeObserver>>) -> Self {
        Self { observers }
    }

    fn each(&self, f: impl Fn(&dyn NormalizeObserver)) {
        self.observers.iter().for_each(|o| f(o.as_ref()));
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompositeObserver({} observers)", self.observers.len())
    }
}

impl NormalizeObserver for CompositeObserver {
    fn on_skipped(&self, ctx: &NormalizeContext) {
        self.each(|o| o.on_skipped(ctx));
    }

    fn on_converted(&self, ctx: &NormalizeContext, stats: &ConversionStats) {
        self.each(|o| o.on_converted(ctx, stats));
    }

    fn on_failure(&self, ctx: &NormalizeContext, severity: NormalizeSeverity, error: &NormalizeError) {
        self.each(|o| o.on_failure(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &NormalizeContext, severity: NormalizeSeverity, error: &NormalizeError) {
        self.each(|o| o.on_alert(ctx, severity, error));
    }
}

/// Prints the human-readable per-file lines to stdout.
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl ConsoleObserver {
    pub fn skip_line(ctx: &NormalizeContext) -> String {
        format!("SKIP: {} already comma-separated", ctx.name())
    }

    pub fn converted_line(ctx: &NormalizeContext, stats: &ConversionStats) -> String {
        format!(
            "CONVERTED: {} (backup -> {})",
            ctx.name(),
            display_name(&stats.backup)
        )
    }

    pub fn error_line(ctx: &NormalizeContext, error: &NormalizeError) -> String {
        format!("ERROR: {} -> {}", ctx.name(), error)
    }
}

impl NormalizeObserver for ConsoleObserver {
    fn on_skipped(&self, ctx: &NormalizeContext) {
        println!("{}", Self::skip_line(ctx));
    }

    fn on_converted(&self, ctx: &NormalizeContext, stats: &ConversionStats) {
        println!("{}", Self::converted_line(ctx, stats));
    }

    fn on_failure(&self, ctx: &NormalizeContext, _severity: NormalizeSeverity, error: &NormalizeError) {
        println!("{}", Self::error_line(ctx, error));
    }

    // Already printed by `on_failure`.
    fn on_alert(&self, _ctx: &NormalizeContext, _severity: NormalizeSeverity, _error: &NormalizeError) {}
}

/// Emits normalization events through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl NormalizeObserver for TracingObserver {
    fn on_skipped(&self, ctx: &NormalizeContext) {
        tracing::debug!(path = %ctx.path.display(), "already comma-delimited");
    }

    fn on_converted(&self, ctx: &NormalizeContext, stats: &ConversionStats) {
        tracing::info!(
            path = %ctx.path.display(),
            from = %stats.from,
            rows = stats.rows,
            backup = %stats.backup.display(),
            "converted to comma-delimited"
        );
    }

    fn on_failure(&self, ctx: &NormalizeContext, severity: NormalizeSeverity, error: &NormalizeError) {
        tracing::warn!(path = %ctx.path.display(), ?severity, %error, "normalization failed");
    }

    fn on_alert(&self, ctx: &NormalizeContext, severity: NormalizeSeverity, error: &NormalizeError) {
        tracing::error!(path = %ctx.path.display(), ?severity, %error, "normalization alert");
    }
}

/// Body of one JSON line in a [`FileObserver`] log.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
enum LogEvent<'a> {
    Skipped {
        path: &'a Path,
    },
    Converted {
        path: &'a Path,
        from: Delimiter,
        rows: usize,
        backup: &'a Path,
    },
    Failure {
        path: &'a Path,
        severity: NormalizeSeverity,
        error: String,
    },
    Alert {
        path: &'a Path,
        severity: NormalizeSeverity,
        error: String,
    },
}

#[derive(Serialize)]
struct Stamped<'a> {
    ts: u64,
    #[serde(flatten)]
    event: LogEvent<'a>,
}

/// Appends normalization events to a JSON-lines log file.
///
/// Best-effort: a log file that cannot be opened or written never fails the run.
#[derive(Debug)]
pub struct FileObserver {
    log: Mutex<PathBuf>,
}

impl FileObserver {
    pub fn new(log: impl Into<PathBuf>) -> Self {
        Self { log: Mutex::new(log.into()) }
    }

    fn append(&self, event: LogEvent<'_>) {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        let Ok(line) = serde_json::to_string(&Stamped { ts, event }) else {
            return;
        };
        let Ok(log) = self.log.lock() else {
            return;
        };
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&*log) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl NormalizeObserver for FileObserver {
    fn on_skipped(&self, ctx: &NormalizeContext) {
        self.append(LogEvent::Skipped { path: &ctx.path });
    }

    fn on_converted(&self, ctx: &NormalizeContext, stats: &ConversionStats) {
        self.append(LogEvent::Converted {
            path: &ctx.path,
            from: stats.from,
            rows: stats.rows,
            backup: &stats.backup,
        });
    }

    fn on_failure(&self, ctx: &NormalizeContext, severity: NormalizeSeverity, error: &NormalizeError) {
        self.append(LogEvent::Failure {
            path: &ctx.path,
            severity,
            error: error.to_string(),
        });
    }

    fn on_alert(&self, ctx: &NormalizeContext, severity: NormalizeSeverity, error: &NormalizeError) {
        self.append(LogEvent::Alert {
            path: &ctx.path,
            severity,
            error: error.to_string(),
        });
    }
}
