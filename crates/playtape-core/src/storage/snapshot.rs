//! Snapshot files
//!
//! A snapshot is a JSON object with `users`, `playlists` and `songs` arrays.
//! Output is pretty-printed with two-space indentation.
//!
//! Writes are atomic (write to a uniquely named temp file, then rename), so a
//! failed write never leaves a truncated snapshot or a stray temp file behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use super::error::{SnapshotError, SnapshotResult};
use crate::models::{Playlist, Song, User};

/// Serialized form of a catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub playlists: Vec<Playlist>,
    pub songs: Vec<Song>,
}

impl Snapshot {
    /// Decode a snapshot from JSON text
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Encode as pretty-printed JSON with a trailing newline
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Read and decode a snapshot file
    pub fn load(path: impl AsRef<Path>) -> SnapshotResult<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|e| SnapshotError::from_read(e, path.to_path_buf()))?;

        let snapshot =
            Self::from_json(&content).map_err(|source| SnapshotError::InvalidFormat {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(
            "Loaded snapshot {:?}: {} users, {} songs, {} playlists",
            path,
            snapshot.users.len(),
            snapshot.songs.len(),
            snapshot.playlists.len()
        );
        Ok(snapshot)
    }

    /// Encode and write the snapshot to `path`, replacing any existing file
    pub fn save(&self, path: impl AsRef<Path>) -> SnapshotResult<()> {
        let path = path.as_ref();
        let json = self.to_json_pretty().map_err(SnapshotError::Encode)?;

        atomic_write(path, json.as_bytes())
            .map_err(|e| SnapshotError::from_write(e, path.to_path_buf()))?;

        debug!("Saved snapshot to {:?}", path);
        Ok(())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a fresh temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// The temp file is removed if any step fails.
fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent)?;
            parent
        }
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(data)?;
    file.as_file().sync_all()?;

    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
