//! Domain errors
//!
//! `StoreError` covers rejected store operations and load-time integrity
//! failures. `CommandError` covers malformed change records and wraps store
//! rejections with the record that caused them.

use std::fmt;

use thiserror::Error;

/// Entity kind, used to name the collection an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Song,
    Playlist,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::User => "user",
            EntityKind::Song => "song",
            EntityKind::Playlist => "playlist",
        };
        write!(f, "{}", name)
    }
}

/// Errors raised by `Store` construction and mutation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Playlist ID is not a non-negative base-10 integer
    #[error("Malformed playlist id '{id}': expected a non-negative integer")]
    MalformedIdentifier { id: String },

    #[error("User id '{0}' does not exist")]
    UnknownUser(String),

    #[error("Song id '{0}' does not exist")]
    UnknownSong(String),

    #[error("Playlist id '{0}' does not exist")]
    UnknownPlaylist(String),

    /// A playlist must contain at least one song
    #[error("A playlist must contain at least one song (no song ids were provided)")]
    EmptyPlaylist,

    /// No playlist ID is left to assign after the highest one in use
    #[error("Playlist id space exhausted: no id follows '{last}'")]
    PlaylistIdsExhausted { last: u64 },

    /// Same ID appears twice in one collection (strict loading only)
    #[error("Duplicate {kind} id '{id}'")]
    DuplicateId { kind: EntityKind, id: String },

    /// Playlist refers to a user or song that does not exist (strict loading only)
    #[error("Playlist '{playlist_id}' refers to missing {kind} '{id}'")]
    DanglingReference {
        playlist_id: String,
        kind: EntityKind,
        id: String,
    },
}

/// Errors raised while parsing or applying a single change record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Can't process empty command")]
    EmptyCommand,

    /// Wrong number of arguments; `expected` is human-readable ("1", "at least 2")
    #[error("Incorrect number of arguments for `{command}`: expected {expected}, got {got}")]
    Arity {
        command: &'static str,
        expected: &'static str,
        got: usize,
    },

    #[error("Unrecognized command: `{0}`")]
    UnknownCommand(String),

    /// The store refused the operation
    #[error("Problem with `{}`: {source}", .record.join(","))]
    Rejected {
        record: Vec<String>,
        #[source]
        source: StoreError,
    },
}

impl CommandError {
    /// The store error behind a rejected command, if any
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            CommandError::Rejected { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Aggregate outcome of a batch run with at least one failed command
///
/// The individual failures are kept by the processor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{failed} of {total} command(s) failed")]
pub struct BatchError {
    pub failed: usize,
    pub total: usize,
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for command dispatch
pub type CommandResult<T> = Result<T, CommandError>;
