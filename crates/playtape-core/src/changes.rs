//! Change file reader
//!
//! A change file holds one command per line, fields separated by commas:
//!
//! ```text
//! # new playlist for user 1
//! add-playlist,1,6,8
//! add-song-to-playlist,2,32
//! rm-playlist,3
//! ```
//!
//! Lines starting with `#` are comments and empty lines are skipped. A line of
//! only whitespace is kept as a one-field record. A field
//! may be wrapped in double quotes to contain commas, with `""` standing for
//! a literal quote. Records do not need the same number of fields.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// A raw command record: name followed by arguments
pub type Record = Vec<String>;

/// Errors that can occur while reading a change file
#[derive(Error, Debug)]
pub enum ChangesError {
    #[error("Failed to read changes file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Quoted field not closed before the end of the line (1-based)
    #[error("Unterminated quoted field on line {line}")]
    UnterminatedQuote { line: usize },

    /// Text after a closing quote (1-based line)
    #[error("Unexpected character after closing quote on line {line}")]
    TrailingAfterQuote { line: usize },
}

/// Read and parse a change file
pub fn load_changes(path: impl AsRef<Path>) -> Result<Vec<Record>, ChangesError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ChangesError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse_changes(&content)?;
    debug!("Read {} command(s) from {:?}", records.len(), path);
    Ok(records)
}

/// Parse change file text into records, in file order
pub fn parse_changes(content: &str) -> Result<Vec<Record>, ChangesError> {
    let mut records = Vec::new();

    for (number, line) in content.lines().enumerate() {
        if line.starts_with('#') || line.is_empty() {
            continue;
        }
        records.push(parse_line(line, number + 1)?);
    }

    Ok(records)
}

fn parse_line(line: &str, number: usize) -> Result<Record, ChangesError> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        let mut field = String::new();

        if chars.peek() == Some(&'"') {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') if chars.peek() == Some(&'"') => {
                        chars.next();
                        field.push('"');
                    }
                    Some('"') => break,
                    Some(c) => field.push(c),
                    None => return Err(ChangesError::UnterminatedQuote { line: number }),
                }
            }
            match chars.next() {
                None => {
                    fields.push(field);
                    return Ok(fields);
                }
                Some(',') => fields.push(field),
                Some(_) => return Err(ChangesError::TrailingAfterQuote { line: number }),
            }
        } else {
            loop {
                match chars.next() {
                    Some(',') => break,
                    Some(c) => field.push(c),
                    None => {
                        fields.push(field);
                        return Ok(fields);
                    }
                }
            }
            fields.push(field);
        }
    }
}
