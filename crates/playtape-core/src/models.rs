//! Data models for playtape
//!
//! Defines the catalog records: User, Song, and Playlist.
//! Field names match the snapshot format and must not change.

use serde::{Deserialize, Serialize};

/// A listener who owns playlists
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
}

impl User {
    /// Create a user with the given ID and name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A song in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Song {
    /// Unique identifier
    pub id: String,
    /// Performing artist
    pub artist: String,
    /// Song title
    pub title: String,
}

impl Song {
    /// Create a song with the given ID, artist and title
    pub fn new(
        id: impl Into<String>,
        artist: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            artist: artist.into(),
            title: title.into(),
        }
    }
}

/// An ordered list of songs owned by a user
///
/// The same song may appear more than once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Playlist {
    /// Numeric identifier, assigned by the store
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Songs in play order
    pub song_ids: Vec<String>,
}

impl Playlist {
    /// Create a playlist record
    pub fn new(id: impl Into<String>, user_id: impl Into<String>, song_ids: Vec<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            song_ids,
        }
    }

    /// Number of song entries, counting duplicates
    pub fn len(&self) -> usize {
        self.song_ids.len()
    }

    /// Whether the playlist has no songs
    pub fn is_empty(&self) -> bool {
        self.song_ids.is_empty()
    }
}
