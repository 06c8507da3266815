//! In-memory catalog store
//!
//! The `Store` owns users, songs and playlists as dense vectors, with a side
//! table per collection mapping each ID to its position. All mutations go
//! through the methods here so the side tables never go stale.
//!
//! ## Invariants
//!
//! After construction and after every successful mutation:
//! - each index maps exactly the IDs present in its collection to their position
//! - every playlist's owner and songs resolve to existing records
//! - every playlist has at least one song
//! - `next_playlist_id` is greater than any playlist ID loaded or assigned
//!
//! Rejected operations leave the store untouched.
//!
//! Lenient loading (the default) only guarantees the first and last of these
//! for the loaded data; see [`LoadOptions`].
//!
//! ## Usage
//!
//! ```ignore
//! let snapshot = Snapshot::load("catalog.json")?;
//! let mut store = Store::from_snapshot(snapshot, &LoadOptions::default())?;
//!
//! let id = store.add_new_playlist("1", &["3".to_string()])?;
//! store.add_song_to_playlist(&id, "4")?;
//! store.remove_playlist("2")?;
//!
//! store.to_snapshot().save("catalog.out.json")?;
//! ```

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{EntityKind, StoreError, StoreResult};
use crate::models::{Playlist, Song, User};
use crate::storage::Snapshot;

/// Checks applied while building a store from loaded data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Reject playlists whose owner or songs are missing, or that have no songs
    pub check_references: bool,
    /// Reject a collection that uses the same ID twice
    pub reject_duplicate_ids: bool,
}

impl LoadOptions {
    /// All load-time checks enabled
    pub fn strict() -> Self {
        Self {
            check_references: true,
            reject_duplicate_ids: true,
        }
    }
}

/// In-memory catalog of users, songs and playlists
#[derive(Debug, Clone)]
pub struct Store {
    users: Vec<User>,
    songs: Vec<Song>,
    playlists: Vec<Playlist>,

    user_index: HashMap<String, usize>,
    song_index: HashMap<String, usize>,
    playlist_index: HashMap<String, usize>,

    next_playlist_id: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            songs: Vec::new(),
            playlists: Vec::new(),
            user_index: HashMap::new(),
            song_index: HashMap::new(),
            playlist_index: HashMap::new(),
            next_playlist_id: 1,
        }
    }
}

impl Store {
    /// Build a store from a decoded snapshot
    pub fn from_snapshot(snapshot: Snapshot, options: &LoadOptions) -> StoreResult<Self> {
        Self::from_parts(snapshot.users, snapshot.songs, snapshot.playlists, options)
    }

    /// Build a store from raw collections, keeping their order
    ///
    /// Fails with `MalformedIdentifier` if any playlist ID is not a
    /// non-negative integer. The remaining checks depend on `options`.
    pub fn from_parts(
        users: Vec<User>,
        songs: Vec<Song>,
        playlists: Vec<Playlist>,
        options: &LoadOptions,
    ) -> StoreResult<Self> {
        let user_index = build_index(
            users.iter().map(|u| u.id.as_str()),
            EntityKind::User,
            options.reject_duplicate_ids,
        )?;
        let song_index = build_index(
            songs.iter().map(|s| s.id.as_str()),
            EntityKind::Song,
            options.reject_duplicate_ids,
        )?;
        let playlist_index = build_index(
            playlists.iter().map(|p| p.id.as_str()),
            EntityKind::Playlist,
            options.reject_duplicate_ids,
        )?;

        // Seed the generator from the highest loaded ID
        let mut max_id = 0;
        for playlist in &playlists {
            max_id = max_id.max(parse_playlist_id(&playlist.id)?);
        }
        let next_playlist_id = if playlists.is_empty() {
            1
        } else {
            max_id
                .checked_add(1)
                .ok_or(StoreError::PlaylistIdsExhausted { last: max_id })?
        };

        let store = Self {
            users,
            songs,
            playlists,
            user_index,
            song_index,
            playlist_index,
            next_playlist_id,
        };

        if options.check_references {
            store.check_references()?;
        } else if let Err(e) = store.check_references() {
            warn!("Loaded catalog is inconsistent, continuing: {}", e);
        }

        debug!(
            "Store loaded: {} users, {} songs, {} playlists, next playlist id {}",
            store.users.len(),
            store.songs.len(),
            store.playlists.len(),
            store.next_playlist_id
        );

        Ok(store)
    }

    /// Copy the collections out as a snapshot
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            users: self.users.clone(),
            playlists: self.playlists.clone(),
            songs: self.songs.clone(),
        }
    }

    /// Consume the store, handing its collections to a snapshot
    pub fn into_snapshot(self) -> Snapshot {
        Snapshot {
            users: self.users,
            playlists: self.playlists,
            songs: self.songs,
        }
    }

    // ==================== Playlist Operations ====================

    /// Remove a playlist
    ///
    /// Returns `false` if no playlist has this ID, so removing twice is safe.
    /// The last playlist is moved into the freed slot, so playlist order is
    /// not preserved. The error channel is currently never used.
    pub fn remove_playlist(&mut self, id: &str) -> StoreResult<bool> {
        let Some(position) = self.playlist_index.remove(id) else {
            return Ok(false);
        };

        self.playlists.swap_remove(position);
        if let Some(moved) = self.playlists.get(position) {
            self.playlist_index.insert(moved.id.clone(), position);
        }

        debug!("Removed playlist {}", id);
        Ok(true)
    }

    /// Create a playlist for `user_id` and return its new ID
    ///
    /// Checks, in order: the user exists, at least one song was given, every
    /// song exists. The song IDs are copied into the store.
    pub fn add_new_playlist(&mut self, user_id: &str, song_ids: &[String]) -> StoreResult<String> {
        if !self.user_index.contains_key(user_id) {
            return Err(StoreError::UnknownUser(user_id.to_string()));
        }

        if song_ids.is_empty() {
            return Err(StoreError::EmptyPlaylist);
        }

        if let Some(missing) = song_ids.iter().find(|id| !self.song_index.contains_key(*id)) {
            return Err(StoreError::UnknownSong(missing.clone()));
        }

        let id = self.generate_playlist_id()?;
        let playlist = Playlist::new(id.clone(), user_id, song_ids.to_vec());

        self.playlists.push(playlist);
        self.playlist_index.insert(id.clone(), self.playlists.len() - 1);

        debug!("Added playlist {} for user {}", id, user_id);
        Ok(id)
    }

    /// Append an existing song to a playlist; duplicates are allowed
    ///
    /// The song is checked before the playlist.
    pub fn add_song_to_playlist(&mut self, playlist_id: &str, song_id: &str) -> StoreResult<()> {
        if !self.song_index.contains_key(song_id) {
            return Err(StoreError::UnknownSong(song_id.to_string()));
        }

        let position = *self
            .playlist_index
            .get(playlist_id)
            .ok_or_else(|| StoreError::UnknownPlaylist(playlist_id.to_string()))?;

        self.playlists[position].song_ids.push(song_id.to_string());

        debug!("Added song {} to playlist {}", song_id, playlist_id);
        Ok(())
    }

    /// Hand out the next ID; fails without touching the counter when none is left
    fn generate_playlist_id(&mut self) -> StoreResult<String> {
        let id = self.next_playlist_id;
        self.next_playlist_id = id
            .checked_add(1)
            .ok_or(StoreError::PlaylistIdsExhausted { last: id })?;
        Ok(id.to_string())
    }

    // ==================== Queries ====================

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// All playlists, in no guaranteed order
    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    /// Get a user by ID
    pub fn user(&self, id: &str) -> Option<&User> {
        self.user_index.get(id).map(|&i| &self.users[i])
    }

    /// Get a song by ID
    pub fn song(&self, id: &str) -> Option<&Song> {
        self.song_index.get(id).map(|&i| &self.songs[i])
    }

    /// Get a playlist by ID
    pub fn playlist(&self, id: &str) -> Option<&Playlist> {
        self.playlist_index.get(id).map(|&i| &self.playlists[i])
    }

    /// The ID the next created playlist will receive
    pub fn next_playlist_id(&self) -> u64 {
        self.next_playlist_id
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn song_count(&self) -> usize {
        self.songs.len()
    }

    pub fn playlist_count(&self) -> usize {
        self.playlists.len()
    }

    // ==================== Integrity ====================

    /// Verify the whole catalog, returning the first violation found
    ///
    /// Duplicate IDs are detected by comparing each record against its index
    /// entry, since a later duplicate shadows an earlier one.
    pub fn check_integrity(&self) -> StoreResult<()> {
        check_unique(
            self.users.iter().map(|u| u.id.as_str()),
            &self.user_index,
            EntityKind::User,
        )?;
        check_unique(
            self.songs.iter().map(|s| s.id.as_str()),
            &self.song_index,
            EntityKind::Song,
        )?;
        check_unique(
            self.playlists.iter().map(|p| p.id.as_str()),
            &self.playlist_index,
            EntityKind::Playlist,
        )?;
        self.check_references()
    }

    fn check_references(&self) -> StoreResult<()> {
        for playlist in &self.playlists {
            if !self.user_index.contains_key(&playlist.user_id) {
                return Err(StoreError::DanglingReference {
                    playlist_id: playlist.id.clone(),
                    kind: EntityKind::User,
                    id: playlist.user_id.clone(),
                });
            }

            if playlist.is_empty() {
                return Err(StoreError::EmptyPlaylist);
            }

            if let Some(missing) = playlist
                .song_ids
                .iter()
                .find(|id| !self.song_index.contains_key(*id))
            {
                return Err(StoreError::DanglingReference {
                    playlist_id: playlist.id.clone(),
                    kind: EntityKind::Song,
                    id: missing.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Map each ID to its position; a later duplicate shadows an earlier one
fn build_index<'a>(
    ids: impl Iterator<Item = &'a str>,
    kind: EntityKind,
    reject_duplicates: bool,
) -> StoreResult<HashMap<String, usize>> {
    let mut index = HashMap::new();
    for (position, id) in ids.enumerate() {
        if let Some(previous) = index.insert(id.to_string(), position) {
            if reject_duplicates {
                return Err(StoreError::DuplicateId {
                    kind,
                    id: id.to_string(),
                });
            }
            warn!(
                "Duplicate {} id '{}' at positions {} and {}, using the later one",
                kind, id, previous, position
            );
        }
    }
    Ok(index)
}

fn check_unique<'a>(
    ids: impl Iterator<Item = &'a str>,
    index: &HashMap<String, usize>,
    kind: EntityKind,
) -> StoreResult<()> {
    for (position, id) in ids.enumerate() {
        if index.get(id) != Some(&position) {
            return Err(StoreError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

/// Parse a playlist ID as a plain base-10 number (no sign, no whitespace)
fn parse_playlist_id(id: &str) -> StoreResult<u64> {
    let malformed = || StoreError::MalformedIdentifier { id: id.to_string() };

    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    id.parse().map_err(|_| malformed())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    /// Catalog with 2 users, 4 songs and playlists "1", "2", "3"
    pub(crate) fn sample_store() -> Store {
        let users = vec![User::new("1", "Albin Jaye"), User::new("2", "Dipika Crescentia")];
        let songs = vec![
            Song::new("1", "Camila Cabello", "Never Be the Same"),
            Song::new("2", "Zedd", "The Middle"),
            Song::new("3", "The Weeknd", "Pray For Me"),
            Song::new("4", "FINNEAS", "Lost My Mind"),
        ];
        let playlists = vec![
            Playlist::new("1", "2", ids(&["1", "2"])),
            Playlist::new("2", "1", ids(&["3"])),
            Playlist::new("3", "1", ids(&["2", "4", "1"])),
        ];
        Store::from_parts(users, songs, playlists, &LoadOptions::strict()).unwrap()
    }

    /// Every index entry points at the record holding that ID, and nothing else is indexed
    pub(crate) fn assert_indexes_consistent(store: &Store) {
        assert_eq!(store.user_index.len(), store.users.len());
        assert_eq!(store.song_index.len(), store.songs.len());
        assert_eq!(store.playlist_index.len(), store.playlists.len());

        for (position, user) in store.users.iter().enumerate() {
            assert_eq!(store.user_index[&user.id], position);
        }
        for (position, song) in store.songs.iter().enumerate() {
            assert_eq!(store.song_index[&song.id], position);
        }
        for (position, playlist) in store.playlists.iter().enumerate() {
            assert_eq!(store.playlist_index[&playlist.id], position);
        }
    }

    #[test]
    fn test_load_builds_indexes() {
        let store = sample_store();

        assert_eq!(store.user_count(), 2);
        assert_eq!(store.playlist_count(), 3);
        assert_eq!(store.songs()[2].artist, "The Weeknd");

        assert_eq!(store.user_index["1"], 0);
        assert_eq!(store.song_index["2"], 1);
        assert_eq!(store.playlist_index["3"], 2);
        assert_indexes_consistent(&store);
    }

    #[test]
    fn test_next_playlist_id_follows_max() {
        let store = sample_store();
        assert_eq!(store.next_playlist_id(), 4);

        let playlists = vec![
            Playlist::new("12", "1", ids(&["1"])),
            Playlist::new("5", "1", ids(&["1"])),
        ];
        let store = Store::from_parts(
            vec![User::new("1", "a")],
            vec![Song::new("1", "a", "b")],
            playlists,
            &LoadOptions::default(),
        )
        .unwrap();
        assert_eq!(store.next_playlist_id(), 13);
    }

    #[test]
    fn test_next_playlist_id_without_playlists() {
        let store = Store::from_parts(vec![], vec![], vec![], &LoadOptions::default()).unwrap();
        assert_eq!(store.next_playlist_id(), 1);
        assert_eq!(Store::default().next_playlist_id(), 1);
    }

    #[test]
    fn test_malformed_playlist_id_aborts_load() {
        for bad in ["abc", "", "-1", "+2", " 3", "1.5", "99999999999999999999999"] {
            let result = Store::from_parts(
                vec![User::new("1", "a")],
                vec![Song::new("1", "a", "b")],
                vec![Playlist::new(bad, "1", ids(&["1"]))],
                &LoadOptions::default(),
            );
            assert_eq!(
                result.unwrap_err(),
                StoreError::MalformedIdentifier { id: bad.to_string() }
            );
        }
    }

    #[test]
    fn test_max_playlist_id_rejected_at_load() {
        let result = Store::from_parts(
            vec![User::new("1", "a")],
            vec![Song::new("1", "a", "b")],
            vec![Playlist::new(u64::MAX.to_string(), "1", ids(&["1"]))],
            &LoadOptions::default(),
        );
        assert_eq!(
            result.unwrap_err(),
            StoreError::PlaylistIdsExhausted { last: u64::MAX }
        );
    }

    #[test]
    fn test_add_new_playlist_when_ids_run_out() {
        let mut store = Store::from_parts(
            vec![User::new("1", "a")],
            vec![Song::new("1", "a", "b")],
            vec![Playlist::new((u64::MAX - 1).to_string(), "1", ids(&["1"]))],
            &LoadOptions::default(),
        )
        .unwrap();
        assert_eq!(store.next_playlist_id(), u64::MAX);
        let before = store.playlists().to_vec();

        assert_eq!(
            store.add_new_playlist("1", &ids(&["1"])),
            Err(StoreError::PlaylistIdsExhausted { last: u64::MAX })
        );
        assert_eq!(store.playlists(), before.as_slice());
        assert_eq!(store.next_playlist_id(), u64::MAX);
        assert_indexes_consistent(&store);
    }

    #[test]
    fn test_lenient_load_accepts_dangling_references() {
        let store = Store::from_parts(
            vec![User::new("1", "a")],
            vec![Song::new("1", "a", "b")],
            vec![Playlist::new("1", "ghost", ids(&["1", "404"]))],
            &LoadOptions::default(),
        )
        .unwrap();

        assert_eq!(store.playlist_count(), 1);
        assert!(matches!(
            store.check_integrity(),
            Err(StoreError::DanglingReference { .. })
        ));
    }

    #[test]
    fn test_strict_load_rejects_dangling_song() {
        let result = Store::from_parts(
            vec![User::new("1", "a")],
            vec![Song::new("1", "a", "b")],
            vec![Playlist::new("1", "1", ids(&["1", "404"]))],
            &LoadOptions::strict(),
        );

        assert_eq!(
            result.unwrap_err(),
            StoreError::DanglingReference {
                playlist_id: "1".into(),
                kind: EntityKind::Song,
                id: "404".into(),
            }
        );
    }

    #[test]
    fn test_strict_load_rejects_empty_playlist() {
        let result = Store::from_parts(
            vec![User::new("1", "a")],
            vec![],
            vec![Playlist::new("1", "1", vec![])],
            &LoadOptions::strict(),
        );
        assert_eq!(result.unwrap_err(), StoreError::EmptyPlaylist);
    }

    #[test]
    fn test_duplicate_ids() {
        let users = vec![User::new("1", "first"), User::new("1", "second")];

        // Lenient: later record shadows the earlier one
        let store =
            Store::from_parts(users.clone(), vec![], vec![], &LoadOptions::default()).unwrap();
        assert_eq!(store.user("1").unwrap().name, "second");
        assert_eq!(store.user_count(), 2);
        assert!(matches!(
            store.check_integrity(),
            Err(StoreError::DuplicateId { .. })
        ));

        // Strict: rejected
        let result = Store::from_parts(users, vec![], vec![], &LoadOptions::strict());
        assert_eq!(
            result.unwrap_err(),
            StoreError::DuplicateId {
                kind: EntityKind::User,
                id: "1".into()
            }
        );
    }

    #[test]
    fn test_remove_playlist() {
        let mut store = sample_store();

        assert!(store.remove_playlist("1").unwrap());
        assert_eq!(store.playlist_count(), 2);
        assert_indexes_consistent(&store);

        // Second removal is a no-op
        assert!(!store.remove_playlist("1").unwrap());
        assert_eq!(store.playlist_count(), 2);

        // Last playlist was moved into the freed slot
        assert_eq!(store.playlists()[0].id, "3");
        assert_eq!(store.playlists()[1].id, "2");
    }

    #[test]
    fn test_remove_missing_playlist() {
        let mut store = sample_store();
        let before = store.playlists().to_vec();

        assert!(!store.remove_playlist("404").unwrap());
        assert_eq!(store.playlists(), before.as_slice());
    }

    #[test]
    fn test_remove_last_playlist() {
        let mut store = sample_store();

        assert!(store.remove_playlist("3").unwrap());
        assert!(store.playlist("3").is_none());
        assert_indexes_consistent(&store);

        assert!(store.remove_playlist("1").unwrap());
        assert!(store.remove_playlist("2").unwrap());
        assert_eq!(store.playlist_count(), 0);
        assert_indexes_consistent(&store);
    }

    #[test]
    fn test_add_new_playlist_rejections_leave_store_unchanged() {
        let mut store = sample_store();
        let before = store.playlists().to_vec();

        assert_eq!(
            store.add_new_playlist("bad-id", &ids(&["1", "2"])),
            Err(StoreError::UnknownUser("bad-id".into()))
        );
        assert_eq!(
            store.add_new_playlist("1", &ids(&["bad-id", "2"])),
            Err(StoreError::UnknownSong("bad-id".into()))
        );
        assert_eq!(
            store.add_new_playlist("1", &[]),
            Err(StoreError::EmptyPlaylist)
        );

        assert_eq!(store.playlists(), before.as_slice());
        assert_eq!(store.next_playlist_id(), 4);
    }

    #[test]
    fn test_add_new_playlist_checks_user_first() {
        let mut store = sample_store();
        assert_eq!(
            store.add_new_playlist("bad-id", &[]),
            Err(StoreError::UnknownUser("bad-id".into()))
        );
    }

    #[test]
    fn test_add_new_playlist() {
        let mut store = sample_store();
        let mut song_ids = ids(&["1", "2"]);

        let id = store.add_new_playlist("1", &song_ids).unwrap();
        assert_eq!(id, "4");
        assert_eq!(store.next_playlist_id(), 5);

        // Caller's list is not shared with the store
        song_ids.push("3".to_string());
        let playlist = store.playlist("4").unwrap();
        assert_eq!(playlist.user_id, "1");
        assert_eq!(playlist.song_ids, ids(&["1", "2"]));
        assert_indexes_consistent(&store);
    }

    #[test]
    fn test_ids_are_not_reused_after_removal() {
        let mut store = sample_store();

        assert!(store.remove_playlist("3").unwrap());
        let id = store.add_new_playlist("2", &ids(&["4"])).unwrap();
        assert_eq!(id, "4");
        assert_indexes_consistent(&store);
    }

    #[test]
    fn test_add_song_to_playlist() {
        let mut store = sample_store();

        assert_eq!(
            store.add_song_to_playlist("1", "bad-id"),
            Err(StoreError::UnknownSong("bad-id".into()))
        );
        assert_eq!(
            store.add_song_to_playlist("bad-id", "1"),
            Err(StoreError::UnknownPlaylist("bad-id".into()))
        );

        for _ in 0..3 {
            store.add_song_to_playlist("1", "1").unwrap();
        }
        assert_eq!(store.playlist("1").unwrap().len(), 5);
    }

    #[test]
    fn test_add_song_checks_song_before_playlist() {
        let mut store = sample_store();
        assert_eq!(
            store.add_song_to_playlist("bad-playlist", "bad-song"),
            Err(StoreError::UnknownSong("bad-song".into()))
        );
    }

    #[test]
    fn test_mutations_preserve_integrity() {
        let mut store = sample_store();

        store.add_new_playlist("2", &ids(&["4", "4"])).unwrap();
        store.remove_playlist("2").unwrap();
        store.add_song_to_playlist("4", "3").unwrap();
        store.remove_playlist("1").unwrap();

        assert_indexes_consistent(&store);
        store.check_integrity().unwrap();
    }

    #[test]
    fn test_into_snapshot_keeps_collections() {
        let store = sample_store();
        let snapshot = store.to_snapshot();
        assert_eq!(snapshot.playlists, store.playlists());

        let owned = store.into_snapshot();
        assert_eq!(owned, snapshot);
    }
}
