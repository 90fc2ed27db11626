//! Catalog and result records
//!
//! Plain values returned by the session. A Definition names its database
//! by string only; there is no link back to a Database value.

use std::fmt;

use crate::protocol::split_atoms;

/// A dictionary database offered by the server
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Database {
    pub name: String,
    pub description: String,
}

impl Database {
    /// Selector querying every database (`*`)
    pub const ALL: &'static str = "*";

    /// Selector stopping at the first database with a result (`!`)
    pub const FIRST_MATCH: &'static str = "!";

    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// The `*` selector
    pub fn all() -> Self {
        Self::new(Self::ALL, "All databases")
    }

    /// The `!` selector
    pub fn first_match() -> Self {
        Self::new(Self::FIRST_MATCH, "First matching database")
    }

    /// True for the reserved `*` and `!` selectors
    pub fn is_selector(&self) -> bool {
        self.name == Self::ALL || self.name == Self::FIRST_MATCH
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.description)
    }
}

/// A server-side search algorithm usable with MATCH
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchingStrategy {
    pub name: String,
    pub description: String,
}

impl MatchingStrategy {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for MatchingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.description)
    }
}

/// One definition block returned by DEFINE
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub word: String,
    pub database: String,
    pub body: Vec<String>,
}

impl Definition {
    /// Start a definition with an empty body
    pub fn new(word: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            database: database.into(),
            body: Vec::new(),
        }
    }

    pub fn append_line(&mut self, line: impl Into<String>) {
        self.body.push(line.into());
    }

    /// Body joined with newlines
    pub fn text(&self) -> String {
        self.body.join("\n")
    }
}

/// The parsed 220 banner
///
/// `220 dict.example.org dictd 1.12 <auth.mime> <123.456@dict.example.org>`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Greeting {
    /// Everything after the status code
    pub banner: String,

    /// Entries of the `<cap.cap>` group, empty if the server sent none
    pub capabilities: Vec<String>,

    /// The trailing `<...@...>` message id, if present
    pub msg_id: Option<String>,
}

impl Greeting {
    pub fn parse(detail: &str) -> Self {
        let mut capabilities = Vec::new();
        let mut msg_id = None;

        for atom in split_atoms(detail) {
            let Some(inner) = atom
                .strip_prefix('<')
                .and_then(|rest| rest.strip_suffix('>'))
            else {
                continue;
            };

            if inner.contains('@') {
                msg_id = Some(atom.clone());
            } else if capabilities.is_empty() {
                capabilities = inner
                    .split('.')
                    .filter(|cap| !cap.is_empty())
                    .map(str::to_string)
                    .collect();
            }
        }

        Self {
            banner: detail.to_string(),
            capabilities,
            msg_id,
        }
    }

    pub fn has_capability(&self, name: &str) -> bool {
        self.capabilities.iter().any(|cap| cap.eq_ignore_ascii_case(name))
    }
}
