//! Client Module
//!
//! The session layer: one connection, one exchange at a time.
//!
//! ## Lifecycle
//! - open: connect, require the 220 greeting, optionally send CLIENT
//! - commands: each holds the session lock until its reply is drained
//! - close: QUIT, then release the stream; never fails

mod connection;

pub use connection::DictConnection;
