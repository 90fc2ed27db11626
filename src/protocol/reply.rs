//! Reply decoders
//!
//! One decoder per command family. Each receives the status line that
//! opened the reply and reads whatever further lines that command's grammar
//! calls for, stopping after the final status (or after the block
//! terminator, for SHOW INFO).

use std::collections::{BTreeMap, HashSet};
use std::io::BufRead;

use crate::config::ReplyPolicy;
use crate::error::{DictError, Result};
use crate::model::{Database, Definition, MatchingStrategy};
use super::atoms::split_atoms;
use super::codec::{read_block, read_block_lines};
use super::command::Command;
use super::status::{codes, Status};

/// A decoded reply, tagged by the command that produced it
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Definitions(Vec<Definition>),
    Matches(Vec<String>),
    Databases(BTreeMap<String, Database>),
    Strategies(Vec<MatchingStrategy>),
    Text(String),
    Completed(Status),
    /// QUIT: nothing is read back
    Closed,
}

impl Reply {
    pub fn into_definitions(self) -> Result<Vec<Definition>> {
        match self {
            Reply::Definitions(defs) => Ok(defs),
            other => Err(shape_mismatch("definitions", &other)),
        }
    }

    pub fn into_matches(self) -> Result<Vec<String>> {
        match self {
            Reply::Matches(words) => Ok(words),
            other => Err(shape_mismatch("matches", &other)),
        }
    }

    pub fn into_databases(self) -> Result<BTreeMap<String, Database>> {
        match self {
            Reply::Databases(dbs) => Ok(dbs),
            other => Err(shape_mismatch("databases", &other)),
        }
    }

    pub fn into_strategies(self) -> Result<Vec<MatchingStrategy>> {
        match self {
            Reply::Strategies(strats) => Ok(strats),
            other => Err(shape_mismatch("strategies", &other)),
        }
    }

    pub fn into_text(self) -> Result<String> {
        match self {
            Reply::Text(text) => Ok(text),
            other => Err(shape_mismatch("text", &other)),
        }
    }

    pub fn into_status(self) -> Result<Status> {
        match self {
            Reply::Completed(status) => Ok(status),
            other => Err(shape_mismatch("status", &other)),
        }
    }
}

fn shape_mismatch(wanted: &str, got: &Reply) -> DictError {
    DictError::Protocol(format!("Expected a {} reply, decoded {:?}", wanted, got))
}

// =============================================================================
// Dispatch
// =============================================================================

/// Decode the rest of the reply to `command`, given its opening status
pub fn decode_reply<R: BufRead + ?Sized>(
    command: &Command,
    status: Status,
    reader: &mut R,
    policy: ReplyPolicy,
) -> Result<Reply> {
    match command {
        Command::Define { .. } => decode_definitions(status, reader, policy).map(Reply::Definitions),
        Command::Match { .. } => decode_matches(status, reader, policy).map(Reply::Matches),
        Command::ShowDatabases => decode_databases(status, reader).map(Reply::Databases),
        Command::ShowStrategies => decode_strategies(status, reader).map(Reply::Strategies),
        Command::ShowInfo { .. } => decode_database_info(status, reader).map(Reply::Text),
        Command::ShowServer => {
            decode_text_block(status, reader, codes::SERVER_INFO, "reading server info")
                .map(Reply::Text)
        }
        Command::Help => {
            decode_text_block(status, reader, codes::HELP_TEXT, "reading help text").map(Reply::Text)
        }
        Command::Status => status
            .expect(codes::STATUS, "reading server status")
            .map(Reply::Completed),
        Command::Client { .. } => status
            .expect(codes::OK, "identifying client")
            .map(Reply::Completed),
        Command::Quit => Ok(Reply::Closed),
    }
}

/// A reply that carries no data block: empty result, or an error in strict mode
fn no_data(status: &Status, policy: ReplyPolicy, context: &'static str) -> Result<()> {
    let tolerated = matches!(status.code(), codes::NO_MATCH | codes::INVALID_DATABASE);
    if policy == ReplyPolicy::Strict && status.is_failure() && !tolerated {
        return Err(DictError::unexpected(status.code(), status.detail(), context));
    }
    tracing::debug!("No data while {}: {}", context, status);
    Ok(())
}

fn read_completion<R: BufRead + ?Sized>(reader: &mut R, context: &'static str) -> Result<()> {
    Status::read(reader)?.expect(codes::OK, context)?;
    Ok(())
}

// =============================================================================
// DEFINE
// =============================================================================

/// Upper bound on up-front allocation for a DEFINE reply
const MAX_PREALLOCATED_DEFINITIONS: usize = 64;

/// `150 n definitions` then n × (`151` header, body, `.`) then `250`
pub fn decode_definitions<R: BufRead + ?Sized>(
    status: Status,
    reader: &mut R,
    policy: ReplyPolicy,
) -> Result<Vec<Definition>> {
    if !status.is(codes::DEFINITIONS_FOUND) {
        no_data(&status, policy, "looking up definitions")?;
        return Ok(Vec::new());
    }

    let count = split_atoms(status.detail())
        .first()
        .and_then(|atom| atom.parse::<usize>().ok())
        .ok_or_else(|| {
            DictError::Protocol(format!("Missing definition count in {:?}", status.detail()))
        })?;

    // The count comes from the server; it only bounds the loop, never an allocation
    let mut definitions = Vec::with_capacity(count.min(MAX_PREALLOCATED_DEFINITIONS));
    for _ in 0..count {
        let header = Status::read(reader)?.expect(codes::DEFINITION_FOLLOWS, "reading definition header")?;
        let mut atoms = split_atoms(header.detail()).into_iter();
        let (Some(word), Some(database)) = (atoms.next(), atoms.next()) else {
            return Err(DictError::Protocol(format!(
                "Malformed definition header: {:?}",
                header.detail()
            )));
        };

        let mut definition = Definition::new(word, database);
        read_block(reader, |line| {
            definition.append_line(line);
            Ok(())
        })?;
        definitions.push(definition);
    }

    read_completion(reader, "finishing definitions")?;
    Ok(definitions)
}

// =============================================================================
// MATCH
// =============================================================================

/// `152 n matches` then `<db> <word>` lines, `.`, `250`
///
/// Words keep first-seen order; repeats are dropped.
pub fn decode_matches<R: BufRead + ?Sized>(
    status: Status,
    reader: &mut R,
    policy: ReplyPolicy,
) -> Result<Vec<String>> {
    if !status.is(codes::MATCHES_FOUND) {
        no_data(&status, policy, "matching words")?;
        return Ok(Vec::new());
    }

    let mut seen = HashSet::new();
    let mut words = Vec::new();
    read_block(reader, |line| {
        match split_atoms(&line).into_iter().nth(1) {
            Some(word) => {
                if seen.insert(word.clone()) {
                    words.push(word);
                }
            }
            None => tracing::warn!("Skipping malformed match line: {:?}", line),
        }
        Ok(())
    })?;

    read_completion(reader, "finishing match list")?;
    Ok(words)
}

// =============================================================================
// SHOW DB / SHOW STRAT
// =============================================================================

/// `110` then `<name> <description>` lines, `.`, `250`
///
/// A repeated name keeps the last description.
pub fn decode_databases<R: BufRead + ?Sized>(
    status: Status,
    reader: &mut R,
) -> Result<BTreeMap<String, Database>> {
    let mut databases = BTreeMap::new();
    if !status.is(codes::DATABASES_PRESENT) {
        tracing::debug!("No database list: {}", status);
        return Ok(databases);
    }

    read_block(reader, |line| {
        if let Some((name, description)) = name_and_description(&line) {
            databases.insert(name.clone(), Database::new(name, description));
        }
        Ok(())
    })?;

    read_completion(reader, "finishing database list")?;
    Ok(databases)
}

/// `111` then `<name> <description>` lines, `.`, `250`
pub fn decode_strategies<R: BufRead + ?Sized>(
    status: Status,
    reader: &mut R,
) -> Result<Vec<MatchingStrategy>> {
    let mut strategies: Vec<MatchingStrategy> = Vec::new();
    if !status.is(codes::STRATEGIES_AVAILABLE) {
        tracing::debug!("No strategy list: {}", status);
        return Ok(strategies);
    }

    read_block(reader, |line| {
        if let Some((name, description)) = name_and_description(&line) {
            let strategy = MatchingStrategy::new(name, description);
            if !strategies.contains(&strategy) {
                strategies.push(strategy);
            }
        }
        Ok(())
    })?;

    read_completion(reader, "finishing strategy list")?;
    Ok(strategies)
}

fn name_and_description(line: &str) -> Option<(String, String)> {
    let mut atoms = split_atoms(line).into_iter();
    let name = atoms.next()?;
    Some((name, atoms.next().unwrap_or_default()))
}

// =============================================================================
// Free-text blocks
// =============================================================================

/// `112` then text lines and `.`; no final status is read
///
/// Lines are concatenated as-is. `550` (unknown database) yields "".
pub fn decode_database_info<R: BufRead + ?Sized>(status: Status, reader: &mut R) -> Result<String> {
    match status.code() {
        codes::DATABASE_INFO => {
            let mut info = String::new();
            read_block(reader, |line| {
                info.push_str(&line);
                Ok(())
            })?;
            Ok(info)
        }
        codes::INVALID_DATABASE => {
            tracing::debug!("Invalid database: {}", status.detail());
            Ok(String::new())
        }
        code => Err(DictError::unexpected(code, status.detail(), "reading database info")),
    }
}

/// `expected` then text lines, `.`, `250`; line breaks are kept
pub fn decode_text_block<R: BufRead + ?Sized>(
    status: Status,
    reader: &mut R,
    expected: u16,
    context: &'static str,
) -> Result<String> {
    status.expect(expected, context)?;
    let lines = read_block_lines(reader)?;
    read_completion(reader, context)?;
    Ok(lines.join("\n"))
}
