//! Directory-level entrypoint.
//!
//! Most callers should use [`normalize_directory`], which normalizes every candidate file in a
//! directory and returns a [`ScanSummary`].
//!
//! - Candidates are regular, non-hidden files matching `*.<extension>`, processed sorted by
//!   file name.
//! - One file's failure never stops the others; it becomes [`FileOutcome::Errored`].
//! - If a [`NormalizeObserver`] is provided, skip/convert/failure/alerts are reported to it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::detection::DEFAULT_SAMPLE_SIZE;
use crate::error::{NormalizeError, NormalizeResult};
use crate::types::{FileOutcome, FileReport, ScanSummary};

use super::file::normalize_file;
use super::observability::{ConversionStats, NormalizeContext, NormalizeObserver, NormalizeSeverity};

/// Default candidate extension (without the dot).
pub const DEFAULT_EXTENSION: &str = "csv";

/// Default suffix appended to a file name to form its backup name.
pub const DEFAULT_BACKUP_SUFFIX: &str = ".bak";

/// Options controlling normalization.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct NormalizeOptions {
    /// Candidate extension, without the leading dot. Matching is case-sensitive.
    pub extension: String,
    /// Number of leading bytes used to detect the delimiter.
    pub sample_size: usize,
    /// Appended to the file name to form the backup name.
    pub backup_suffix: String,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn NormalizeObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: NormalizeSeverity,
}

impl fmt::Debug for NormalizeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizeOptions")
            .field("extension", &self.extension)
            .field("sample_size", &self.sample_size)
            .field("backup_suffix", &self.backup_suffix)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            sample_size: DEFAULT_SAMPLE_SIZE,
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
            observer: None,
            alert_at_or_above: NormalizeSeverity::Critical,
        }
    }
}

/// List candidate files in `dir`: regular files named `*.<extension>`, sorted by file name.
///
/// The listing is taken once; files created afterwards are not included.
pub fn find_candidates(dir: impl AsRef<Path>, extension: &str) -> NormalizeResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(NormalizeError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        glob::Pattern::escape(extension)
    );
    let options = glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let mut files = Vec::new();
    for entry in glob::glob_with(&pattern, options)? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Normalize every candidate file in `dir`.
///
/// Returns [`NormalizeError::DirectoryNotFound`] (without touching anything) when `dir` is
/// missing. Per-file failures are recorded in the summary, not returned.
///
/// When an observer is configured, each file reports exactly one of:
///
/// - `on_skipped` for files already comma-delimited
/// - `on_converted` for rewritten files, with row count and backup path
/// - `on_failure` on failure with a computed severity, plus `on_alert` when the severity is
///   >= `options.alert_at_or_above`
///
/// ```no_run
/// use std::sync::Arc;
///
/// use csv_delimiter_normalizer::normalize::{normalize_directory, ConsoleObserver, NormalizeOptions};
///
/// # fn main() -> Result<(), csv_delimiter_normalizer::NormalizeError> {
/// let opts = NormalizeOptions {
///     observer: Some(Arc::new(ConsoleObserver)),
///     ..Default::default()
/// };
/// let summary = normalize_directory("Data", &opts)?;
/// println!("{summary}");
/// # Ok(())
/// # }
/// ```
pub fn normalize_directory(dir: impl AsRef<Path>, options: &NormalizeOptions) -> NormalizeResult<ScanSummary> {
    let candidates = find_candidates(dir, &options.extension)?;
    tracing::debug!(candidates = candidates.len(), "scanning directory");

    let reports = candidates
        .into_iter()
        .map(|path| {
            let outcome = process_file(&path, options);
            FileReport { path, outcome }
        })
        .collect();

    Ok(ScanSummary { reports })
}

fn process_file(path: &Path, options: &NormalizeOptions) -> FileOutcome {
    let ctx = NormalizeContext {
        path: path.to_path_buf(),
    };
    let result = normalize_file(path, options);

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(FileOutcome::Skipped) => obs.on_skipped(&ctx),
            Ok(FileOutcome::Converted { from, backup, rows }) => obs.on_converted(
                &ctx,
                &ConversionStats {
                    from: *from,
                    rows: *rows,
                    backup: backup.clone(),
                },
            ),
            // Not produced by `normalize_file`, which reports failures as `Err`; `Errored` is
            // only built from that `Err` below, after the observer has seen it.
            Ok(FileOutcome::Errored { .. }) => {}
            Err(e) => {
                let sev = NormalizeSeverity::for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result.unwrap_or_else(|e| FileOutcome::Errored { message: e.to_string() })
}
