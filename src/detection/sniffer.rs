//! Structural delimiter sniffing.
//!
//! Two passes, both restricted to [`Delimiter::ALL`]:
//!
//! 1. **Quote adjacency**: a double-quoted run that is bounded by a delimiter (or the line edge)
//!    is strong evidence for that delimiter.
//! 2. **Consistency**: the delimiter should occur the same number of times on (nearly) every
//!    line. Lines are examined in chunks of [`CHUNK_LINES`]; a character qualifies when its most
//!    common per-line count covers at least 90% of the lines seen so far.
//!
//! Counting is purely textual: delimiters inside quoted fields are counted too. Pathological
//! inputs (e.g. quoted commas inside a semicolon file) can therefore be misdetected.

use crate::error::SniffError;
use crate::types::Delimiter;

/// Number of lines added to the consistency window per iteration.
pub const CHUNK_LINES: usize = 10;

/// Consistency thresholds, in percent, tried from strictest to loosest.
const CONSISTENCY_START_PCT: usize = 100;
const CONSISTENCY_FLOOR_PCT: usize = 90;

const QUOTE: char = '"';

/// Infer the delimiter of `sample` from its structure.
///
/// Returns an error for empty or ambiguous samples instead of guessing; see
/// [`super::detect_delimiter`] for the variant that always produces an answer.
pub fn sniff(sample: &str) -> Result<Delimiter, SniffError> {
    let lines: Vec<&str> = sample.split('\n').filter(|l| !l.is_empty()).collect();
    if lines.is_empty() {
        return Err(SniffError::EmptySample);
    }

    if let Some(d) = sniff_quote_adjacency(&lines) {
        return Ok(d);
    }
    sniff_consistency(&lines)
}

fn sniff_quote_adjacency(lines: &[&str]) -> Option<Delimiter> {
    let mut counts = [0usize; Delimiter::ALL.len()];

    for line in lines {
        let chars: Vec<char> = line.trim_end_matches('\r').chars().collect();
        let mut i = 0;
        while i < chars.len() {
            if chars[i] != QUOTE {
                i += 1;
                continue;
            }
            let open = i;
            let Some(len) = chars[open + 1..].iter().position(|&c| c == QUOTE) else {
                break;
            };
            let close = open + 1 + len;

            let before = delimiter_before(&chars, open);
            let after = chars.get(close + 1).copied();
            let after_delim = after.and_then(Delimiter::from_char);

            let hit = match (before, after_delim) {
                (Edge::Delim(b), Some(a)) if a == b => Some(a),
                (Edge::LineStart, Some(a)) => Some(a),
                (Edge::Delim(b), None) if after.is_none() => Some(b),
                _ => None,
            };
            if let Some(d) = hit {
                counts[index_of(d)] += 1;
            }
            i = close + 1;
        }
    }

    // Strict `>` keeps the earlier (preferred) delimiter on ties.
    let mut best: Option<(Delimiter, usize)> = None;
    for (d, &n) in Delimiter::ALL.iter().zip(counts.iter()) {
        if n > 0 && best.is_none_or(|(_, m)| n > m) {
            best = Some((*d, n));
        }
    }
    best.map(|(d, _)| d)
}

enum Edge {
    LineStart,
    Delim(Delimiter),
    Other,
}

/// What precedes the opening quote at `open`, allowing one space after a delimiter.
fn delimiter_before(chars: &[char], open: usize) -> Edge {
    if open == 0 {
        return Edge::LineStart;
    }
    let j = if chars[open - 1] == ' ' { open - 1 } else { open };
    match j.checked_sub(1).and_then(|k| Delimiter::from_char(chars[k])) {
        Some(d) => Edge::Delim(d),
        None => Edge::Other,
    }
}

/// Per-line occurrence counts of one character: `(occurrences, lines)` in first-seen order.
#[derive(Debug, Default)]
struct Histogram {
    buckets: Vec<(usize, usize)>,
}

impl Histogram {
    fn record(&mut self, occurrences: usize) {
        match self.buckets.iter_mut().find(|(o, _)| *o == occurrences) {
            Some((_, lines)) => *lines += 1,
            None => self.buckets.push((occurrences, 1)),
        }
    }

    /// The most common per-line count and its weight (its line count minus all other buckets).
    ///
    /// `None` when the character never occurs.
    fn mode(&self) -> Option<(usize, i64)> {
        if let [(0, _)] = self.buckets.as_slice() {
            return None;
        }
        let mut best: Option<(usize, usize)> = None;
        for &(occ, lines) in &self.buckets {
            if best.is_none_or(|(_, l)| lines > l) {
                best = Some((occ, lines));
            }
        }
        let (occ, lines) = best?;
        let total: usize = self.buckets.iter().map(|(_, l)| l).sum();
        let others = total - lines;
        Some((occ, lines as i64 - others as i64))
    }
}

fn sniff_consistency(lines: &[&str]) -> Result<Delimiter, SniffError> {
    let chunk_len = lines.len().min(CHUNK_LINES);
    let mut histograms: [Histogram; Delimiter::ALL.len()] = Default::default();
    let mut candidates: Vec<Delimiter> = Vec::new();
    let mut seen = 0usize;

    for chunk in lines.chunks(chunk_len) {
        seen += chunk.len();
        for line in chunk {
            for (d, hist) in Delimiter::ALL.iter().zip(histograms.iter_mut()) {
                hist.record(line.matches(d.as_char()).count());
            }
        }

        let mut pct = CONSISTENCY_START_PCT;
        while candidates.is_empty() && pct >= CONSISTENCY_FLOOR_PCT {
            for (d, hist) in Delimiter::ALL.iter().zip(histograms.iter()) {
                let Some((occ, weight)) = hist.mode() else {
                    continue;
                };
                if occ > 0 && weight > 0 && weight as usize * 100 >= pct * seen {
                    candidates.push(*d);
                }
            }
            pct -= 1;
        }

        match candidates.len() {
            0 => continue,
            1 => return Ok(candidates[0]),
            // Further chunks cannot narrow an ambiguous set.
            _ => break,
        }
    }

    // `Delimiter::ALL` is already in preference order, and candidates were pushed in that order.
    candidates
        .first()
        .copied()
        .ok_or(SniffError::NoConsistentDelimiter)
}

fn index_of(d: Delimiter) -> usize {
    match d {
        Delimiter::Comma => 0,
        Delimiter::Tab => 1,
        Delimiter::Semicolon => 2,
        Delimiter::Pipe => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consistent_tabs_sniff_as_tab() {
        let sample = "id\tname\n1\tAda\n2\tGrace\n";
        assert_eq!(sniff(sample), Ok(Delimiter::Tab));
    }

    #[test]
    fn consistent_pipes_sniff_as_pipe() {
        let sample = "a|b|c\n1|2|3\n4|5|6\n";
        assert_eq!(sniff(sample), Ok(Delimiter::Pipe));
    }

    #[test]
    fn single_token_sample_fails() {
        assert_eq!(sniff("hello"), Err(SniffError::NoConsistentDelimiter));
    }

    #[test]
    fn empty_sample_fails() {
        assert_eq!(sniff(""), Err(SniffError::EmptySample));
        assert_eq!(sniff("\n\n"), Err(SniffError::EmptySample));
    }

    #[test]
    fn ambiguous_candidates_prefer_comma() {
        // Comma and semicolon are both perfectly consistent.
        let sample = "a,b;c\nd,e;f\n";
        assert_eq!(sniff(sample), Ok(Delimiter::Comma));
    }

    #[test]
    fn quoted_field_bounded_by_semicolons_wins() {
        let sample = "id;note;x\n1;\"a, b, c\";y\n";
        assert_eq!(sniff(sample), Ok(Delimiter::Semicolon));
    }

    #[test]
    fn quoted_tab_inside_comma_file_stays_comma() {
        let sample = "\"x\ty\",z\n\"p\tq\",r\n";
        assert_eq!(sniff(sample), Ok(Delimiter::Comma));
    }

    #[test]
    fn stray_line_is_outweighed_by_later_chunks() {
        // First chunk: 9 of 10 lines agree, weight 8/10 is below the floor.
        // After the second chunk: weight 18/20 reaches it.
        let mut sample = String::from("title only\n");
        for i in 0..19 {
            sample.push_str(&format!("{i};a;b\n"));
        }
        assert_eq!(sniff(&sample), Ok(Delimiter::Semicolon));
    }

    #[test]
    fn one_stray_line_in_ten_is_not_consistent() {
        let mut sample = String::new();
        for i in 0..9 {
            sample.push_str(&format!("{i};a;b\n"));
        }
        sample.push_str("oops\n");
        assert_eq!(sniff(&sample), Err(SniffError::NoConsistentDelimiter));
    }

    #[test]
    fn histogram_mode_prefers_first_seen_on_ties() {
        let mut h = Histogram::default();
        h.record(2);
        h.record(1);
        assert_eq!(h.mode(), Some((2, 0)));
    }

    #[test]
    fn histogram_mode_is_none_for_absent_character() {
        let mut h = Histogram::default();
        h.record(0);
        h.record(0);
        assert_eq!(h.mode(), None);
    }
}
