//! Status lines
//!
//! Every reply opens with `<code> <detail>`, and every multi-block reply
//! closes with another one.

use std::fmt;
use std::io::BufRead;

use crate::error::{DictError, Result};
use super::codec::read_line;

/// Status codes this client interprets
pub mod codes {
    pub const DATABASES_PRESENT: u16 = 110;
    pub const STRATEGIES_AVAILABLE: u16 = 111;
    pub const DATABASE_INFO: u16 = 112;
    pub const HELP_TEXT: u16 = 113;
    pub const SERVER_INFO: u16 = 114;
    pub const DEFINITIONS_FOUND: u16 = 150;
    pub const DEFINITION_FOLLOWS: u16 = 151;
    pub const MATCHES_FOUND: u16 = 152;
    pub const STATUS: u16 = 210;
    pub const GREETING: u16 = 220;
    pub const CLOSING: u16 = 221;
    pub const OK: u16 = 250;
    pub const INVALID_DATABASE: u16 = 550;
    pub const INVALID_STRATEGY: u16 = 551;
    pub const NO_MATCH: u16 = 552;
    pub const NO_DATABASES: u16 = 554;
    pub const NO_STRATEGIES: u16 = 555;
}

/// Width of the numeric code at the start of a status line
pub const CODE_WIDTH: usize = 3;

/// One parsed status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    code: u16,
    detail: String,
}

impl Status {
    pub fn new(code: u16, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }

    /// Parse `<3-digit-code> <detail>`
    ///
    /// The detail is everything after the first space following the code,
    /// or empty when the line holds only the code.
    pub fn parse(line: &str) -> Result<Self> {
        let digits = line.bytes().take_while(u8::is_ascii_digit).count();
        if digits != CODE_WIDTH {
            return Err(DictError::Protocol(format!(
                "Malformed status line: {:?}",
                line
            )));
        }

        let (code, rest) = line.split_at(CODE_WIDTH);
        let detail = match rest.chars().next() {
            None => "",
            Some(c) if c.is_whitespace() => &rest[c.len_utf8()..],
            Some(_) => {
                return Err(DictError::Protocol(format!(
                    "Malformed status line: {:?}",
                    line
                )))
            }
        };

        let code = code
            .parse::<u16>()
            .map_err(|e| DictError::Protocol(format!("Bad status code {:?}: {}", code, e)))?;

        Ok(Self::new(code, detail))
    }

    /// Read exactly one line from the stream and parse it
    pub fn read<R: BufRead + ?Sized>(reader: &mut R) -> Result<Self> {
        let line = read_line(reader)?;
        Self::parse(&line)
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn is(&self, code: u16) -> bool {
        self.code == code
    }

    /// Positive completion (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// Permanent negative completion (5xx)
    pub fn is_failure(&self) -> bool {
        self.code >= 500
    }

    /// Fail unless the status carries `expected`
    pub fn expect(self, expected: u16, context: &'static str) -> Result<Self> {
        if self.code == expected {
            Ok(self)
        } else {
            Err(DictError::unexpected(self.code, &self.detail, context))
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{} {}", self.code, self.detail)
        }
    }
}
