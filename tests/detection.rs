use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use csv_delimiter_normalizer::detection::{detect_delimiter, fallback_delimiter, read_sample, sniff};
use csv_delimiter_normalizer::types::Delimiter;
use csv_delimiter_normalizer::SniffError;

fn tmp_file(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("csv-delimiter-normalizer-detection-{tag}-{nanos}.csv"))
}

#[test]
fn tab_separated_sample_detects_as_tab() {
    let sample = "name\tscore\nAda\t1\nGrace\t2\n";
    assert_eq!(detect_delimiter(sample), Delimiter::Tab);
}

#[test]
fn pipe_separated_sample_detects_as_pipe() {
    let sample = "id|city|zip\n1|Oslo|0150\n2|Bergen|5003\n";
    assert_eq!(detect_delimiter(sample), Delimiter::Pipe);
}

#[test]
fn semicolon_separated_sample_detects_as_semicolon() {
    let sample = "id;amount\n1;3,50\n2;4,25\n";
    // Decimal commas are missing from the header line, so only the semicolon is consistent.
    assert_eq!(detect_delimiter(sample), Delimiter::Semicolon);
}

#[test]
fn comma_separated_sample_detects_as_comma() {
    let sample = "a,b,c\n1,2,3\n4,5,6\n";
    assert_eq!(detect_delimiter(sample), Delimiter::Comma);
}

#[test]
fn single_token_single_line_falls_back_to_comma() {
    assert!(sniff("hello").is_err());
    assert_eq!(detect_delimiter("hello"), Delimiter::Comma);
}

#[test]
fn empty_sample_falls_back_to_comma() {
    assert_eq!(sniff(""), Err(SniffError::EmptySample));
    assert_eq!(detect_delimiter(""), Delimiter::Comma);
}

#[test]
fn single_line_with_delimiter_uses_sniff_or_fallback() {
    assert_eq!(detect_delimiter("a;b;c"), Delimiter::Semicolon);
    assert_eq!(detect_delimiter("a|b"), Delimiter::Pipe);
}

#[test]
fn fallback_follows_priority_order() {
    assert_eq!(fallback_delimiter("a|b;c\td"), Delimiter::Tab);
    assert_eq!(fallback_delimiter("a|b;c"), Delimiter::Semicolon);
    assert_eq!(fallback_delimiter("a|b,c"), Delimiter::Pipe);
    assert_eq!(fallback_delimiter("a,b"), Delimiter::Comma);
    assert_eq!(fallback_delimiter(""), Delimiter::Comma);
}

#[test]
fn inconsistent_sample_uses_fallback() {
    // Semicolons appear on one line out of four: sniffing fails, the substring search wins.
    let sample = "alpha\nbeta;gamma\ndelta\nepsilon\n";
    assert!(sniff(sample).is_err());
    assert_eq!(detect_delimiter(sample), Delimiter::Semicolon);
}

#[test]
fn read_sample_respects_cap() {
    let path = tmp_file("cap");
    fs::write(&path, "a\tb\n1\t2\n3\t4\n").unwrap();

    let sample = read_sample(&path, 4).unwrap();
    assert_eq!(sample, "a\tb\n");

    let full = read_sample(&path, 8192).unwrap();
    assert_eq!(full, "a\tb\n1\t2\n3\t4\n");

    fs::remove_file(&path).unwrap();
}

#[test]
fn read_sample_replaces_invalid_utf8() {
    let path = tmp_file("lossy");
    // "é" is two bytes; a cap of 1 cuts it in half.
    fs::write(&path, "é\tx\n").unwrap();
    assert_eq!(read_sample(&path, 1).unwrap(), "\u{FFFD}");

    fs::write(&path, b"\xff\tx\n").unwrap();
    assert_eq!(read_sample(&path, 8192).unwrap(), "\u{FFFD}\tx\n");

    fs::remove_file(&path).unwrap();
}

#[test]
fn read_sample_errors_on_missing_file() {
    let err = read_sample(tmp_file("missing"), 8192).unwrap_err();
    assert!(err.to_string().contains("io error"));
}
