//! # dictwire
//!
//! A blocking client for the DICT dictionary lookup protocol (RFC 2229):
//! - One persistent stream, one outstanding command at a time
//! - Status-line classification and block-terminated reply decoding
//! - Definitions, match lists, database and strategy catalogs, info text
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     DictConnection                           │
//! │          (session lock, greeting, QUIT on close)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Command
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Reply Decoders                             │
//! │     (DEFINE / MATCH / SHOW DB / SHOW STRAT / SHOW INFO)      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Status    │          │    Atom     │
//!   │   Reader    │          │  Tokenizer  │
//!   └──────┬──────┘          └─────────────┘
//!          │
//!          ▼
//!   ┌─────────────┐
//!   │ Line Codec  │
//!   │ (BufRead)   │
//!   └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use dictwire::{Database, DictConnection};
//!
//! let conn = DictConnection::open_default("dict.org")?;
//! for def in conn.define("parrot", &Database::all())? {
//!     println!("{} ({})\n{}", def.word, def.database, def.text());
//! }
//! conn.close();
//! # Ok::<(), dictwire::DictError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod model;
pub mod protocol;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DictError, Result};
pub use config::{Config, ReplyPolicy, DEFAULT_PORT};
pub use model::{Database, Definition, Greeting, MatchingStrategy};
pub use client::DictConnection;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of dictwire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
