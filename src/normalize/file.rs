//! Per-file normalization: detect, back up, rewrite, replace.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::detection::{detect_delimiter, read_sample};
use crate::error::{NormalizeError, NormalizeResult};
use crate::types::{Delimiter, FileOutcome};

use super::scan::NormalizeOptions;

/// Dot-prefixed so `*.<ext>` candidate listings never pick up a leftover temp file.
const TEMP_PREFIX: &str = ".normalize";

/// Normalize a single file to comma-delimited form.
///
/// Steps:
///
/// 1. Read at most [`NormalizeOptions::sample_size`] bytes (lossy UTF-8) and detect the delimiter.
/// 2. Comma: return [`FileOutcome::Skipped`] without touching anything.
/// 3. Otherwise copy the original verbatim to [`backup_path_for`]. Nothing else happens if the
///    copy fails, or if the backup path is the file itself (empty suffix).
/// 4. Parse the whole original with the detected delimiter and write it, comma-delimited with
///    minimal quoting, to a temporary file in the same directory.
/// 5. Rename the temporary file over the original.
///
/// The original is never observable half-written: if anything fails before step 5 the temporary
/// file is removed and the original is left as it was (the backup stays).
///
/// Errors are returned as-is; [`super::normalize_directory`] turns them into
/// [`FileOutcome::Errored`].
pub fn normalize_file(path: impl AsRef<Path>, options: &NormalizeOptions) -> NormalizeResult<FileOutcome> {
    let path = path.as_ref();
    let sample = read_sample(path, options.sample_size)?;
    let from = detect_delimiter(&sample);
    if from == Delimiter::Comma {
        return Ok(FileOutcome::Skipped);
    }

    let backup = backup_path_for(path, &options.backup_suffix);
    // Copying a file onto itself truncates it.
    if backup.as_path() == path {
        return Err(NormalizeError::BackupIsSource { path: backup });
    }
    fs::copy(path, &backup)?;

    let rows = replace_with_comma(path, from)?;
    tracing::debug!(path = %path.display(), %from, rows, "rewrote file");

    Ok(FileOutcome::Converted { from, backup, rows })
}

/// Backup location for `path`: the full file name with `suffix` appended (`a.csv` -> `a.csv.bak`).
pub fn backup_path_for(path: impl AsRef<Path>, suffix: &str) -> PathBuf {
    let mut name = path.as_ref().as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Copy rows from `src` (delimited by `from`) to `dst` as comma-delimited text.
///
/// Rules:
///
/// - No header handling; every line is a row.
/// - Rows may have different field counts.
/// - Input fields may be double-quoted, with `""` as an escaped quote; quoted fields may contain
///   the delimiter and newlines.
/// - Output fields are quoted only when needed (comma, quote, or line break inside).
/// - Each output row ends with the host line terminator.
///
/// Returns the number of rows written.
pub fn rewrite_as_comma<R: Read, W: Write>(src: R, dst: W, from: Delimiter) -> NormalizeResult<usize> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(from.as_byte())
        .from_reader(src);
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(Delimiter::Comma.as_byte())
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(host_terminator())
        .from_writer(dst);

    let mut record = csv::StringRecord::new();
    let mut rows = 0usize;
    while rdr.read_record(&mut record)? {
        wtr.write_record(&record)?;
        rows += 1;
    }
    wtr.flush()?;
    Ok(rows)
}

fn replace_with_comma(path: &Path, from: Delimiter) -> NormalizeResult<usize> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    // Temp name length must not depend on the candidate's (NAME_MAX).
    let mut tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(".tmp")
        .tempfile_in(dir)?;

    let rows = {
        let src = File::open(path)?;
        rewrite_as_comma(src, tmp.as_file_mut(), from)?
    };
    tmp.as_file().sync_all()?;
    // Temp files are created owner-only; keep the original's mode.
    fs::set_permissions(tmp.path(), fs::metadata(path)?.permissions())?;

    tmp.persist(path)?;
    Ok(rows)
}

fn host_terminator() -> csv::Terminator {
    if cfg!(windows) {
        csv::Terminator::CRLF
    } else {
        csv::Terminator::Any(b'\n')
    }
}
