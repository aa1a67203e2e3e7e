//! Delimiter detection.
//!
//! Most callers should use [`detect_delimiter`], which always returns an answer:
//!
//! - first it tries structural sniffing ([`sniffer::sniff`]) over the allowed set
//!   (comma, tab, semicolon, pipe)
//! - if that fails, it falls back to a substring search in [`Delimiter::FALLBACK_PRIORITY`]
//!   order (tab, then semicolon, then pipe), defaulting to comma
//!
//! Detection works on a bounded prefix of the file, read with [`read_sample`].
//!
//! ```rust
//! use csv_delimiter_normalizer::detection::detect_delimiter;
//! use csv_delimiter_normalizer::types::Delimiter;
//!
//! assert_eq!(detect_delimiter("a\tb\n1\t2\n"), Delimiter::Tab);
//! assert_eq!(detect_delimiter("hello"), Delimiter::Comma);
//! ```

pub mod sniffer;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::NormalizeResult;
use crate::types::Delimiter;

pub use sniffer::sniff;

/// Default number of leading bytes used as the detection sample.
pub const DEFAULT_SAMPLE_SIZE: usize = 8 * 1024;

/// Detect the field delimiter of a text sample.
///
/// Pure function of `sample`. A higher-priority character that only appears inside quoted text
/// can win the fallback; that is an accepted limitation of the heuristic.
pub fn detect_delimiter(sample: &str) -> Delimiter {
    match sniff(sample) {
        Ok(d) => d,
        Err(err) => {
            tracing::trace!(%err, "structural sniff failed; using substring fallback");
            fallback_delimiter(sample)
        }
    }
}

/// Priority-ordered substring search: tab, semicolon, pipe, else comma.
pub fn fallback_delimiter(sample: &str) -> Delimiter {
    Delimiter::FALLBACK_PRIORITY
        .into_iter()
        .find(|d| sample.contains(d.as_char()))
        .unwrap_or(Delimiter::Comma)
}

/// Read at most `cap` leading bytes of `path` as text.
///
/// Invalid UTF-8 (including a multi-byte character cut at the cap) is replaced with U+FFFD
/// instead of failing.
pub fn read_sample(path: impl AsRef<Path>, cap: usize) -> NormalizeResult<String> {
    let file = File::open(path)?;
    let mut buf = Vec::with_capacity(cap.min(DEFAULT_SAMPLE_SIZE));
    file.take(cap as u64).read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
