use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for normalization operations.
pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Error type returned by detection and normalization functions.
///
/// A single enum shared by the per-file normalizer and the directory scanner.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Underlying I/O error (e.g. file not found, permission denied, backup copy failed).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading the original rows or writing the converted rows failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Replacing the original with the rewritten temporary file failed.
    #[error("atomic replace failed: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// The candidate glob pattern could not be built from the target directory.
    #[error("invalid candidate pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A directory entry could not be read while listing candidates.
    #[error("failed to list candidate: {0}")]
    Glob(#[from] glob::GlobError),

    /// The target directory does not exist (or is not a directory).
    #[error("Data directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// The backup suffix is empty, so the backup would overwrite the file it should preserve.
    #[error("backup path is the file itself: {}", path.display())]
    BackupIsSource { path: PathBuf },
}

/// Why structural sniffing gave up on a sample.
///
/// Returned by [`crate::detection::sniff`] only. These are expected outcomes for short or
/// ambiguous samples; [`crate::detection::detect_delimiter`] recovers from them with a substring
/// heuristic, so they never surface as a [`NormalizeError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SniffError {
    /// The sample has no non-empty lines.
    #[error("sample is empty")]
    EmptySample,

    /// No allowed delimiter occurs consistently across the sample lines.
    #[error("could not determine delimiter")]
    NoConsistentDelimiter,
}
