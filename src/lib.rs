//! `csv-delimiter-normalizer` detects the field delimiter of delimited text files and rewrites
//! the ones that are not comma-delimited as CSV, keeping a verbatim backup of each original.
//!
//! The primary entrypoint is [`normalize::normalize_directory`], which processes every `*.csv`
//! file in a directory (configurable via [`normalize::NormalizeOptions`]) and returns a
//! [`types::ScanSummary`].
//!
//! ## What gets detected
//!
//! Only four delimiters are considered: comma, tab, semicolon and pipe
//! ([`types::Delimiter`]). Detection reads the first 8 KiB of a file and:
//!
//! 1. sniffs the structure (quote adjacency, then per-line count consistency)
//! 2. falls back to the first of tab, semicolon, pipe that appears anywhere in the sample
//! 3. defaults to comma
//!
//! ## What conversion does
//!
//! For a file detected as non-comma:
//!
//! - `<name>.bak` is written first, byte-for-byte
//! - all rows are re-read with the detected delimiter (double-quote quoting is honored)
//! - rows are written comma-delimited, quoting only fields that need it, to a temporary file
//! - the temporary file is renamed over the original
//!
//! Running twice is idempotent: the converted file sniffs as comma and is skipped.
//!
//! ## Quick example
//!
//! ```no_run
//! use csv_delimiter_normalizer::normalize::{normalize_directory, NormalizeOptions};
//!
//! # fn main() -> Result<(), csv_delimiter_normalizer::NormalizeError> {
//! let summary = normalize_directory("Data", &NormalizeOptions::default())?;
//! for name in summary.converted_names() {
//!     println!("converted {name}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## In-memory conversion
//!
//! ```rust
//! use csv_delimiter_normalizer::normalize::rewrite_as_comma;
//! use csv_delimiter_normalizer::types::Delimiter;
//!
//! let mut out = Vec::new();
//! let rows = rewrite_as_comma("a;b,c\n1;2\n".as_bytes(), &mut out, Delimiter::Semicolon).unwrap();
//! assert_eq!(rows, 2);
//! if cfg!(not(windows)) {
//!     assert_eq!(String::from_utf8(out).unwrap(), "a,\"b,c\"\n1,2\n");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`detection`]: delimiter sniffing and the substring fallback
//! - [`normalize`]: per-file and per-directory normalization, plus observers
//! - [`types`]: delimiter and outcome types
//! - [`error`]: error types

pub mod detection;
pub mod error;
pub mod normalize;
pub mod types;

pub use error::{NormalizeError, NormalizeResult, SniffError};
