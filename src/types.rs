//! Core data model types for delimiter normalization.
//!
//! A scan visits every candidate file once and produces a [`FileOutcome`] for it; the scanner
//! collects those into a [`ScanSummary`].

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Field delimiters the detector is allowed to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    /// `,`
    Comma,
    /// `\t`
    Tab,
    /// `;`
    Semicolon,
    /// `|`
    Pipe,
}

impl Delimiter {
    /// Every allowed delimiter, in tie-break preference order.
    pub const ALL: [Delimiter; 4] = [Self::Comma, Self::Tab, Self::Semicolon, Self::Pipe];

    /// Order used by the substring fallback when sniffing fails.
    ///
    /// Comma is absent: it is the default when none of these occur.
    pub const FALLBACK_PRIORITY: [Delimiter; 3] = [Self::Tab, Self::Semicolon, Self::Pipe];

    /// The delimiter as a single byte (what the `csv` crate expects).
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Tab => b'\t',
            Self::Semicolon => b';',
            Self::Pipe => b'|',
        }
    }

    /// The delimiter as a `char`.
    pub fn as_char(self) -> char {
        self.as_byte() as char
    }

    /// Map a character back to an allowed delimiter.
    pub fn from_char(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_char() == c)
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Comma => "comma",
            Self::Tab => "tab",
            Self::Semicolon => "semicolon",
            Self::Pipe => "pipe",
        };
        f.write_str(name)
    }
}

/// Result of processing a single candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Already comma-delimited; nothing was touched.
    Skipped,
    /// Backed up and rewritten as comma-delimited.
    Converted {
        /// Delimiter the original file used.
        from: Delimiter,
        /// Path of the verbatim backup of the original.
        backup: PathBuf,
        /// Rows written to the converted file.
        rows: usize,
    },
    /// Detection, backup, parsing, or replacement failed. The original is not half-written.
    Errored {
        /// Rendered error message.
        message: String,
    },
}

impl FileOutcome {
    /// Whether the file on disk was rewritten.
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Converted { .. })
    }
}

/// Outcome for one file, keyed by its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Candidate file path.
    pub path: PathBuf,
    /// What happened to it.
    pub outcome: FileOutcome,
}

impl FileReport {
    /// File name used in console output (falls back to the full path).
    pub fn name(&self) -> String {
        display_name(&self.path)
    }
}

/// Per-file outcomes of a directory scan, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// One report per candidate, sorted by file name.
    pub reports: Vec<FileReport>,
}

impl ScanSummary {
    /// Reports for files that were rewritten.
    pub fn converted(&self) -> impl Iterator<Item = &FileReport> {
        self.reports.iter().filter(|r| r.outcome.is_changed())
    }

    /// Reports for files left untouched because they were already comma-delimited.
    pub fn skipped(&self) -> impl Iterator<Item = &FileReport> {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, FileOutcome::Skipped))
    }

    /// Reports for files that failed.
    pub fn errored(&self) -> impl Iterator<Item = &FileReport> {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, FileOutcome::Errored { .. }))
    }

    /// Names of converted files, in processing order.
    pub fn converted_names(&self) -> Vec<String> {
        self.converted().map(FileReport::name).collect()
    }
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.converted_names();
        writeln!(f, "Summary:")?;
        write!(f, "Files converted: {}", names.len())?;
        for name in names {
            write!(f, "\n - {name}")?;
        }
        Ok(())
    }
}

pub(crate) fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
