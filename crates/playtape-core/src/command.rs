//! Change commands
//!
//! A raw record is a list of fields: the command name followed by its
//! arguments. Records are parsed into [`Command`] values, which carry their
//! own arity rules, and then applied to a [`Store`].
//!
//! | Record                                   | Command               |
//! |------------------------------------------|-----------------------|
//! | `add-playlist,<user>,<song>[,<song>...]` | [`Command::AddPlaylist`] |
//! | `add-song-to-playlist,<playlist>,<song>` | [`Command::AddSongToPlaylist`] |
//! | `rm-playlist,<playlist>`                 | [`Command::RemovePlaylist`] |

use std::fmt;

use crate::error::{CommandError, CommandResult, StoreResult};
use crate::store::Store;

pub const ADD_PLAYLIST: &str = "add-playlist";
pub const ADD_SONG_TO_PLAYLIST: &str = "add-song-to-playlist";
pub const REMOVE_PLAYLIST: &str = "rm-playlist";

/// A parsed change to apply to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddPlaylist {
        user_id: String,
        song_ids: Vec<String>,
    },
    AddSongToPlaylist {
        playlist_id: String,
        song_id: String,
    },
    RemovePlaylist {
        playlist_id: String,
    },
}

/// What a successfully applied command did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// A playlist was created with this ID
    PlaylistCreated(String),
    SongAdded,
    /// `false` if the playlist did not exist
    PlaylistRemoved(bool),
}

impl Command {
    /// Parse a raw record
    pub fn parse<S: AsRef<str>>(record: &[S]) -> CommandResult<Self> {
        let (name, args) = record.split_first().ok_or(CommandError::EmptyCommand)?;
        let args: Vec<String> = args.iter().map(|a| a.as_ref().to_string()).collect();

        match name.as_ref() {
            ADD_PLAYLIST => {
                if args.len() < 2 {
                    return Err(CommandError::Arity {
                        command: ADD_PLAYLIST,
                        expected: "at least 2",
                        got: args.len(),
                    });
                }
                let mut args = args.into_iter();
                let user_id = args.next().unwrap_or_default();
                Ok(Command::AddPlaylist {
                    user_id,
                    song_ids: args.collect(),
                })
            }
            ADD_SONG_TO_PLAYLIST => match <[String; 2]>::try_from(args) {
                Ok([playlist_id, song_id]) => Ok(Command::AddSongToPlaylist {
                    playlist_id,
                    song_id,
                }),
                Err(args) => Err(CommandError::Arity {
                    command: ADD_SONG_TO_PLAYLIST,
                    expected: "2",
                    got: args.len(),
                }),
            },
            REMOVE_PLAYLIST => match <[String; 1]>::try_from(args) {
                Ok([playlist_id]) => Ok(Command::RemovePlaylist { playlist_id }),
                Err(args) => Err(CommandError::Arity {
                    command: REMOVE_PLAYLIST,
                    expected: "1",
                    got: args.len(),
                }),
            },
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }

    /// The command name as it appears in a record
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddPlaylist { .. } => ADD_PLAYLIST,
            Command::AddSongToPlaylist { .. } => ADD_SONG_TO_PLAYLIST,
            Command::RemovePlaylist { .. } => REMOVE_PLAYLIST,
        }
    }

    /// Apply the command to a store
    pub fn apply(&self, store: &mut Store) -> StoreResult<Applied> {
        match self {
            Command::AddPlaylist { user_id, song_ids } => store
                .add_new_playlist(user_id, song_ids)
                .map(Applied::PlaylistCreated),
            Command::AddSongToPlaylist {
                playlist_id,
                song_id,
            } => store
                .add_song_to_playlist(playlist_id, song_id)
                .map(|()| Applied::SongAdded),
            Command::RemovePlaylist { playlist_id } => store
                .remove_playlist(playlist_id)
                .map(Applied::PlaylistRemoved),
        }
    }

    /// Back to record form
    pub fn to_record(&self) -> Vec<String> {
        let mut record = vec![self.name().to_string()];
        match self {
            Command::AddPlaylist { user_id, song_ids } => {
                record.push(user_id.clone());
                record.extend(song_ids.iter().cloned());
            }
            Command::AddSongToPlaylist {
                playlist_id,
                song_id,
            } => {
                record.push(playlist_id.clone());
                record.push(song_id.clone());
            }
            Command::RemovePlaylist { playlist_id } => record.push(playlist_id.clone()),
        }
        record
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_record().join(","))
    }
}

/// Parse a raw record and apply it
///
/// A store rejection is wrapped together with the record that caused it.
pub fn dispatch<S: AsRef<str>>(store: &mut Store, record: &[S]) -> CommandResult<Applied> {
    let command = Command::parse(record)?;
    command
        .apply(store)
        .map_err(|source| CommandError::Rejected {
            record: record.iter().map(|f| f.as_ref().to_string()).collect(),
            source,
        })
}
