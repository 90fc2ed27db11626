//! Tests for DictConnection over in-memory streams
//!
//! These tests verify:
//! - Greeting validation and CLIENT identification
//! - Command wire text and reply decoding through the session
//! - Poisoning after protocol failures
//! - Silent teardown

mod support;

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use dictwire::protocol::{Command, Reply};
use dictwire::{Config, Database, DictConnection, DictError, MatchingStrategy, ReplyPolicy};

use support::{channel_stream, lines, script, BrokenWriter, SharedBuf};

// =============================================================================
// Helper Functions
// =============================================================================

const GREETING: &str = "220 dict.example.org dictd 1.12 <auth.mime> <1.2@dict.example.org>";

fn open_scripted(server_lines: &[&str]) -> (DictConnection, SharedBuf) {
    open_with_config(server_lines, &Config::default())
}

fn open_with_config(server_lines: &[&str], config: &Config) -> (DictConnection, SharedBuf) {
    let mut all = vec![GREETING];
    all.extend_from_slice(server_lines);
    let out = SharedBuf::default();
    let conn = DictConnection::from_stream(script(&all), out.clone(), config).unwrap();
    (conn, out)
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_open_parses_greeting() {
    let (conn, out) = open_scripted(&[]);

    let greeting = conn.greeting();
    assert_eq!(greeting.capabilities, vec!["auth", "mime"]);
    assert!(greeting.has_capability("MIME"));
    assert_eq!(greeting.msg_id.as_deref(), Some("<1.2@dict.example.org>"));
    assert!(out.sent().is_empty());
}

#[test]
fn test_open_rejects_non_220_greeting() {
    let result = DictConnection::from_stream(
        script(&["530 access denied"]),
        SharedBuf::default(),
        &Config::default(),
    );
    let err = result.err().unwrap();
    assert!(err.is_connection());
}

#[test]
fn test_open_rejects_garbage_greeting() {
    let result = DictConnection::from_stream(
        script(&["hello there"]),
        SharedBuf::default(),
        &Config::default(),
    );
    assert!(matches!(result, Err(DictError::Connection(_))));
}

#[test]
fn test_open_rejects_empty_stream() {
    let result = DictConnection::from_stream(script(&[]), SharedBuf::default(), &Config::default());
    assert!(result.err().unwrap().is_connection());
}

#[test]
fn test_open_sends_client_name() {
    let config = Config::builder().client_name("dictwire tests").build();
    let (conn, out) = open_with_config(&["250 ok"], &config);

    assert_eq!(out.sent(), vec![r#"CLIENT "dictwire tests""#]);
    drop(conn);
}

#[test]
fn test_open_fails_when_client_rejected() {
    let config = Config::builder().client_name("tests").build();
    let result = DictConnection::from_stream(
        script(&[GREETING, "502 command not implemented"]),
        SharedBuf::default(),
        &config,
    );
    assert!(result.err().unwrap().is_connection());
}

#[test]
fn test_close_sends_quit() {
    let (conn, out) = open_scripted(&[]);
    conn.close();
    assert_eq!(out.sent(), vec!["QUIT"]);
}

#[test]
fn test_drop_sends_quit_once() {
    let (conn, out) = open_scripted(&[]);
    drop(conn);
    assert_eq!(out.sent(), vec!["QUIT"]);
}

#[test]
fn test_close_swallows_write_failures() {
    let conn = DictConnection::from_stream(script(&[GREETING]), BrokenWriter, &Config::default())
        .unwrap();
    // Must return normally even though QUIT cannot be written
    conn.close();
}

#[test]
fn test_execute_quit_closes_session() {
    let (conn, out) = open_scripted(&[]);
    let reply = conn.execute(&Command::Quit).unwrap();
    assert_eq!(reply, Reply::Closed);

    let err = conn.databases().unwrap_err();
    assert!(matches!(err, DictError::Poisoned));

    drop(conn);
    assert_eq!(out.sent(), vec!["QUIT"]);
}

// =============================================================================
// Command Tests
// =============================================================================

#[test]
fn test_define_round_trip() {
    let (conn, out) = open_scripted(&[
        "150 2 definitions found",
        r#"151 cat wn "Cat""#,
        "A feline.",
        ".",
        r#"151 cat wn2 "Cat2""#,
        "Another.",
        ".",
        "250 ok",
    ]);

    let defs = conn.define("cat", &Database::new("wn", "WordNet")).unwrap();

    assert_eq!(out.sent(), vec!["DEFINE wn cat"]);
    assert_eq!(defs.len(), 2);
    assert_eq!((defs[0].word.as_str(), defs[0].database.as_str()), ("cat", "wn"));
    assert_eq!(defs[0].body, vec!["A feline."]);
    assert_eq!((defs[1].word.as_str(), defs[1].database.as_str()), ("cat", "wn2"));
    assert_eq!(defs[1].body, vec!["Another."]);
}

#[test]
fn test_define_no_match_leaves_stream_for_next_command() {
    let (conn, out) = open_scripted(&[
        "552 no match",
        "552 no match",
        "110 1 databases present",
        r#"wn "WordNet""#,
        ".",
        "250 ok",
    ]);

    assert!(conn.define("qzx", &Database::all()).unwrap().is_empty());
    assert!(conn.define("qzx", &Database::first_match()).unwrap().is_empty());
    let dbs = conn.databases().unwrap();

    assert_eq!(dbs.len(), 1);
    assert_eq!(
        out.sent(),
        vec!["DEFINE * qzx", "DEFINE ! qzx", "SHOW DB"]
    );
    assert!(!conn.is_poisoned());
}

#[test]
fn test_define_strict_policy_raises() {
    let config = Config::builder().reply_policy(ReplyPolicy::Strict).build();
    let (conn, _out) = open_with_config(&["501 syntax error"], &config);

    let err = conn.define("cat", &Database::all()).unwrap_err();
    assert_eq!(err.status_code(), Some(501));
}

#[test]
fn test_match_round_trip() {
    let (conn, out) = open_scripted(&[
        "152 3 matches found",
        r#"wn "cat""#,
        r#"wn "cat""#,
        r#"wn "catalog""#,
        ".",
        "250 ok",
    ]);

    let strategy = MatchingStrategy::new("prefix", "Match prefixes");
    let words = conn.match_words("cat", &strategy, &Database::new("wn", "")).unwrap();

    assert_eq!(out.sent(), vec!["MATCH wn prefix cat"]);
    assert_eq!(words, vec!["cat", "catalog"]);
}

#[test]
fn test_strategies_round_trip() {
    let (conn, out) = open_scripted(&[
        "111 2 strategies available",
        r#"exact "Match headwords exactly""#,
        r#"prefix "Match prefixes""#,
        ".",
        "250 ok",
    ]);

    let strats = conn.strategies().unwrap();
    assert_eq!(out.sent(), vec!["SHOW STRAT"]);
    assert_eq!(strats.len(), 2);
    assert_eq!(strats[0].name, "exact");
}

#[test]
fn test_info_sends_separated_name() {
    let (conn, out) = open_scripted(&["112 information for wn", "WordNet", ".", "250 ok"]);

    let info = conn.database_info(&Database::new("wn", "")).unwrap();
    assert_eq!(info, "WordNet");
    assert_eq!(out.sent(), vec!["SHOW INFO wn"]);
}

#[test]
fn test_info_invalid_database_is_empty() {
    let (conn, _out) = open_scripted(&["550 invalid database"]);
    let info = conn.database_info(&Database::new("nope", "")).unwrap();
    assert_eq!(info, "");
    assert!(!conn.is_poisoned());
}

#[test]
fn test_info_trailing_completion_is_discarded() {
    let (conn, _out) = open_scripted(&[
        "112 information for wn",
        "WordNet",
        ".",
        "250 ok",
        "552 no match",
    ]);

    conn.database_info(&Database::new("wn", "")).unwrap();
    assert!(conn.define("qzx", &Database::new("wn", "")).unwrap().is_empty());
    assert!(!conn.is_poisoned());
}

#[test]
fn test_info_without_trailing_completion() {
    let (conn, _out) = open_scripted(&[
        "112 information for wn",
        "WordNet",
        ".",
        "552 no match",
    ]);

    conn.database_info(&Database::new("wn", "")).unwrap();
    assert!(conn.define("qzx", &Database::new("wn", "")).unwrap().is_empty());
}

#[test]
fn test_server_help_and_status() {
    let (conn, out) = open_scripted(&[
        "114 server information",
        "dictd 1.12.1",
        ".",
        "250 ok",
        "113 help text follows",
        "DEFINE database word",
        "MATCH database strategy word",
        ".",
        "250 ok",
        "210 status [d/m/c = 0/0/0; 5.000r 0.000u 0.000s]",
    ]);

    assert_eq!(conn.server_info().unwrap(), "dictd 1.12.1");
    assert_eq!(
        conn.help().unwrap(),
        "DEFINE database word\nMATCH database strategy word"
    );
    assert!(conn.status().unwrap().starts_with("status"));
    assert_eq!(out.sent(), vec!["SHOW SERVER", "HELP", "STATUS"]);
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_protocol_error_poisons_session() {
    let (conn, out) = open_scripted(&[
        "110 1 databases present",
        r#"wn "WordNet""#,
        ".",
        "420 server temporarily unavailable",
    ]);

    let err = conn.databases().unwrap_err();
    assert_eq!(err.status_code(), Some(420));
    assert!(conn.is_poisoned());

    let err = conn.strategies().unwrap_err();
    assert!(matches!(err, DictError::Poisoned));
    assert!(err.is_protocol());

    // Nothing was written for the refused command
    assert_eq!(out.sent(), vec!["SHOW DB"]);
}

#[test]
fn test_stream_end_mid_reply_is_protocol_error() {
    let (conn, _out) = open_scripted(&["150 1 definitions found", "151 cat wn", "A feline."]);

    let err = conn.define("cat", &Database::all()).unwrap_err();
    assert!(err.is_protocol());
    assert!(!err.is_connection());
}

#[test]
fn test_write_failure_is_protocol_error() {
    let conn = DictConnection::from_stream(script(&[GREETING]), BrokenWriter, &Config::default())
        .unwrap();
    let err = conn.databases().unwrap_err();
    assert!(err.is_protocol());
}

#[test]
fn test_try_execute_when_idle() {
    let (conn, _out) = open_scripted(&["210 up"]);
    let reply = conn.try_execute(&Command::Status).unwrap();
    assert_eq!(reply.into_status().unwrap().detail(), "up");
}

#[test]
fn test_try_execute_while_exchange_in_flight_is_busy() {
    let (server, reader) = channel_stream();
    server.send(lines(&[GREETING])).unwrap();
    let out = SharedBuf::default();
    let conn = Arc::new(DictConnection::from_stream(reader, out.clone(), &Config::default()).unwrap());

    // SHOW DB is written, then the caller blocks waiting for the reply
    let caller = {
        let conn = Arc::clone(&conn);
        thread::spawn(move || conn.databases())
    };
    let deadline = Instant::now() + Duration::from_secs(5);
    while out.sent().is_empty() {
        assert!(Instant::now() < deadline, "SHOW DB was never written");
        thread::sleep(Duration::from_millis(5));
    }

    let err = conn.try_execute(&Command::Status).unwrap_err();
    assert!(matches!(err, DictError::Busy));
    assert!(err.is_protocol());
    assert_eq!(out.sent(), vec!["SHOW DB"]);

    server
        .send(lines(&["110 1 database present", r#"wn "WordNet""#, ".", "250 ok"]))
        .unwrap();
    let dbs = caller.join().unwrap().unwrap();
    assert_eq!(dbs["wn"].description, "WordNet");

    // The refused call neither poisoned the session nor queued a command
    assert!(!conn.is_poisoned());
    server.send(lines(&["210 up"])).unwrap();
    assert_eq!(conn.status().unwrap(), "up");
    assert_eq!(out.sent(), vec!["SHOW DB", "STATUS"]);
}

#[test]
fn test_identify_after_open() {
    let (conn, out) = open_scripted(&["250 ok"]);
    conn.identify("late client").unwrap();
    assert_eq!(out.sent(), vec![r#"CLIENT "late client""#]);
}
