//! Normalization entrypoints and implementations.
//!
//! Most callers should use [`normalize_directory`] (from [`scan`]) which:
//!
//! - lists candidate files in a directory (sorted by name)
//! - normalizes each one in turn with [`normalize_file`]
//! - optionally reports skip/convert/failure/alerts to a [`NormalizeObserver`]
//!
//! Single-file and in-memory helpers live under [`file`].

pub mod file;
pub mod observability;
pub mod scan;

pub use file::{backup_path_for, normalize_file, rewrite_as_comma};
pub use observability::{
    CompositeObserver, ConsoleObserver, ConversionStats, FileObserver, NormalizeContext, NormalizeObserver,
    NormalizeSeverity, TracingObserver,
};
pub use scan::{
    find_candidates, normalize_directory, NormalizeOptions, DEFAULT_BACKUP_SUFFIX, DEFAULT_EXTENSION,
};
