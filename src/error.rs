//! Error types for dictwire
//!
//! Every failure that crosses a public operation is one of two kinds:
//! the session could not be established, or the reply stream did not
//! follow the protocol. Raw I/O errors are folded into one of them.

use thiserror::Error;

/// Result type alias using DictError
pub type Result<T> = std::result::Result<T, DictError>;

/// Unified error type for dictwire operations
#[derive(Debug, Error)]
pub enum DictError {
    // -------------------------------------------------------------------------
    // Session Establishment Errors
    // -------------------------------------------------------------------------
    #[error("Connection error: {0}")]
    Connection(String),

    // -------------------------------------------------------------------------
    // Reply Stream Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Protocol error: unexpected status {code} ({detail}) while {context}")]
    UnexpectedStatus {
        code: u16,
        detail: String,
        context: &'static str,
    },

    #[error("Protocol error: session is unusable after an earlier failure or close")]
    Poisoned,

    #[error("Protocol error: another command is still in flight on this session")]
    Busy,
}

impl DictError {
    /// True for failures raised while establishing the session
    pub fn is_connection(&self) -> bool {
        matches!(self, DictError::Connection(_))
    }

    /// True for failures raised while exchanging commands and replies
    pub fn is_protocol(&self) -> bool {
        !self.is_connection()
    }

    /// The offending status code, when the failure was an unexpected status
    pub fn status_code(&self) -> Option<u16> {
        match self {
            DictError::UnexpectedStatus { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Re-file any failure as a connection failure (used during the handshake)
    pub(crate) fn into_connection(self) -> Self {
        match self {
            DictError::Connection(msg) => DictError::Connection(msg),
            other => DictError::Connection(other.to_string()),
        }
    }

    pub(crate) fn unexpected(code: u16, detail: &str, context: &'static str) -> Self {
        DictError::UnexpectedStatus {
            code,
            detail: detail.to_string(),
            context,
        }
    }
}

impl From<std::io::Error> for DictError {
    /// I/O failures below a public operation surface as protocol errors
    fn from(err: std::io::Error) -> Self {
        DictError::Protocol(format!("IO error: {}", err))
    }
}
