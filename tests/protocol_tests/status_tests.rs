//! Status Line Tests
//!
//! Tests for status line parsing and reading.

use std::io::Cursor;

use dictwire::protocol::{codes, Status};
use dictwire::DictError;

// =============================================================================
// Status Parsing Tests
// =============================================================================

#[test]
fn test_parse_code_and_detail() {
    let status = Status::parse("250 ok").unwrap();
    assert_eq!(status.code(), 250);
    assert_eq!(status.detail(), "ok");
}

#[test]
fn test_parse_code_only() {
    let status = Status::parse("250").unwrap();
    assert_eq!(status.code(), 250);
    assert_eq!(status.detail(), "");
}

#[test]
fn test_parse_keeps_rest_of_line_verbatim() {
    let status = Status::parse("150 2 definitions retrieved").unwrap();
    assert_eq!(status.code(), 150);
    assert_eq!(status.detail(), "2 definitions retrieved");
}

#[test]
fn test_parse_only_first_space_is_separator() {
    let status = Status::parse("250  two spaces").unwrap();
    assert_eq!(status.detail(), " two spaces");
}

#[test]
fn test_parse_rejects_non_numeric() {
    let err = Status::parse("hello world").unwrap_err();
    assert!(err.is_protocol());
}

#[test]
fn test_parse_rejects_empty_line() {
    assert!(matches!(Status::parse(""), Err(DictError::Protocol(_))));
}

#[test]
fn test_parse_rejects_short_code() {
    assert!(Status::parse("25 ok").is_err());
}

#[test]
fn test_parse_rejects_code_glued_to_text() {
    assert!(Status::parse("250ok").is_err());
}

#[test]
fn test_status_classification() {
    assert!(Status::new(250, "ok").is_success());
    assert!(Status::new(552, "no match").is_failure());
    assert!(!Status::new(150, "").is_failure());
}

#[test]
fn test_reply_code_classes() {
    for code in [codes::GREETING, codes::CLOSING, codes::OK, codes::STATUS] {
        assert!(Status::new(code, "").is_success(), "{} should be success", code);
    }
    for code in [
        codes::INVALID_DATABASE,
        codes::INVALID_STRATEGY,
        codes::NO_MATCH,
        codes::NO_DATABASES,
        codes::NO_STRATEGIES,
    ] {
        assert!(Status::new(code, "").is_failure(), "{} should be failure", code);
    }
}

#[test]
fn test_expect_reports_offending_code() {
    let err = Status::new(552, "no match")
        .expect(250, "testing")
        .unwrap_err();
    assert_eq!(err.status_code(), Some(552));
}

#[test]
fn test_status_display() {
    assert_eq!(Status::new(250, "ok").to_string(), "250 ok");
    assert_eq!(Status::new(250, "").to_string(), "250");
}

#[test]
fn test_read_status_from_stream() {
    let mut reader = Cursor::new(b"220 dict.org ready\r\n".to_vec());
    let status = Status::read(&mut reader).unwrap();
    assert_eq!(status.code(), 220);
    assert_eq!(status.detail(), "dict.org ready");
}

#[test]
fn test_read_status_at_end_of_stream() {
    let mut reader = Cursor::new(Vec::new());
    let err = Status::read(&mut reader).unwrap_err();
    assert!(err.is_protocol());
}
