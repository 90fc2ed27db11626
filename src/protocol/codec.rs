//! Line codec
//!
//! Reading and writing of protocol lines over a byte stream.
//!
//! ## Wire Format
//! ```text
//! C: DEFINE wn cat\r\n
//! S: 150 1 definitions retrieved\r\n          <- status line
//! S: 151 "cat" wn "WordNet"\r\n               <- status line
//! S: cat\r\n                                  <- block line
//! S:     n 1: feline mammal\r\n               <- block line
//! S: .\r\n                                    <- block terminator
//! S: 250 ok\r\n                               <- final status line
//! ```
//!
//! Block lines that begin with a dot are sent with an extra leading dot,
//! which is removed on read.

use std::io::{BufRead, Write};

use crate::error::{DictError, Result};

/// A line consisting of exactly this ends a text block
pub const TERMINATOR: &str = ".";

/// Line separator written after every command
pub const LINE_ENDING: &str = "\r\n";

/// Read one line, without its CRLF or LF ending
///
/// End of stream is a protocol error: a reply was expected.
pub fn read_line<R: BufRead + ?Sized>(reader: &mut R) -> Result<String> {
    let mut buf = Vec::new();
    let read = reader.read_until(b'\n', &mut buf)?;
    if read == 0 {
        return Err(DictError::Protocol(
            "Connection closed while awaiting a reply line".to_string(),
        ));
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }

    let line = String::from_utf8_lossy(&buf).into_owned();
    tracing::trace!("<- {}", line);
    Ok(line)
}

/// Read block lines until the terminator, feeding each to `on_line`
///
/// The terminator is consumed and not passed on.
pub fn read_block<R, F>(reader: &mut R, mut on_line: F) -> Result<()>
where
    R: BufRead + ?Sized,
    F: FnMut(String) -> Result<()>,
{
    loop {
        let line = read_line(reader)?;
        if line == TERMINATOR {
            return Ok(());
        }
        on_line(unstuff(line))?;
    }
}

/// Collect every line of a block
pub fn read_block_lines<R: BufRead + ?Sized>(reader: &mut R) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    read_block(reader, |line| {
        lines.push(line);
        Ok(())
    })?;
    Ok(lines)
}

/// Write a single command line and flush it
pub fn write_line<W: Write + ?Sized>(writer: &mut W, line: &str) -> Result<()> {
    tracing::trace!("-> {}", line);
    writer.write_all(line.as_bytes())?;
    writer.write_all(LINE_ENDING.as_bytes())?;
    writer.flush()?;
    Ok(())
}

fn unstuff(line: String) -> String {
    if line.starts_with("..") {
        line[1..].to_string()
    } else {
        line
    }
}
