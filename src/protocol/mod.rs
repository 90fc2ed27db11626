//! Protocol Module
//!
//! The DICT wire protocol (RFC 2229) as seen from the client.
//!
//! ## Exchange Shape
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌────────────────┐   ┌──────────────┐
//! │ Command line │──▶│ Status line  │──▶│ Blocks ... "." │──▶│ Final status │
//! └──────────────┘   └──────────────┘   └────────────────┘   └──────────────┘
//! ```
//!
//! ### Replies by Command
//! - DEFINE:     150, then per definition 151 + block, then 250
//! - MATCH:      152 + block, then 250
//! - SHOW DB:    110 + block, then 250
//! - SHOW STRAT: 111 + block, then 250
//! - SHOW INFO:  112 + block (550 for an unknown database)
//! - SHOW SERVER / HELP: 114 / 113 + block, then 250
//! - STATUS: 210, CLIENT: 250
//!
//! ### Block Terminator
//! A line holding only `.` ends every block.

mod atoms;
mod status;
mod codec;
mod command;
mod reply;

pub use atoms::{split_atoms, quote_atom};
pub use status::{codes, Status, CODE_WIDTH};
pub use codec::{read_line, read_block, read_block_lines, write_line, TERMINATOR, LINE_ENDING};
pub use command::{Command, CommandType};
pub use reply::{
    Reply, decode_reply, decode_definitions, decode_matches, decode_databases,
    decode_strategies, decode_database_info, decode_text_block,
};
