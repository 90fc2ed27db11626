//! Command definitions
//!
//! Represents commands sent to the server.

use std::fmt;

use super::atoms::quote_atom;

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Define,
    Match,
    ShowDatabases,
    ShowStrategies,
    ShowInfo,
    ShowServer,
    Help,
    Status,
    Client,
    Quit,
}

/// A command ready to be written to the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Look up definitions of a word
    Define { database: String, word: String },

    /// Look up words matching a pattern under a strategy
    Match {
        database: String,
        strategy: String,
        word: String,
    },

    /// List databases
    ShowDatabases,

    /// List matching strategies
    ShowStrategies,

    /// Describe one database
    ShowInfo { database: String },

    /// Describe the server
    ShowServer,

    /// Server help text
    Help,

    /// Server status / timing line
    Status,

    /// Identify this client
    Client { text: String },

    /// End the session
    Quit,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Define { .. } => CommandType::Define,
            Command::Match { .. } => CommandType::Match,
            Command::ShowDatabases => CommandType::ShowDatabases,
            Command::ShowStrategies => CommandType::ShowStrategies,
            Command::ShowInfo { .. } => CommandType::ShowInfo,
            Command::ShowServer => CommandType::ShowServer,
            Command::Help => CommandType::Help,
            Command::Status => CommandType::Status,
            Command::Client { .. } => CommandType::Client,
            Command::Quit => CommandType::Quit,
        }
    }

    /// Exact wire text, without the line ending
    pub fn to_line(&self) -> String {
        match self {
            Command::Define { database, word } => {
                format!("DEFINE {} {}", quote_atom(database), quote_atom(word))
            }
            Command::Match {
                database,
                strategy,
                word,
            } => format!(
                "MATCH {} {} {}",
                quote_atom(database),
                quote_atom(strategy),
                quote_atom(word)
            ),
            Command::ShowDatabases => "SHOW DB".to_string(),
            Command::ShowStrategies => "SHOW STRAT".to_string(),
            Command::ShowInfo { database } => format!("SHOW INFO {}", quote_atom(database)),
            Command::ShowServer => "SHOW SERVER".to_string(),
            Command::Help => "HELP".to_string(),
            Command::Status => "STATUS".to_string(),
            Command::Client { text } => format!("CLIENT {}", quote_atom(text)),
            Command::Quit => "QUIT".to_string(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}
