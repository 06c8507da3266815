//! playtape core library
//!
//! Keeps a music catalog (users, songs, playlists) in memory, applies batches
//! of playlist changes to it, and reads/writes catalog snapshots.
//!
//! # Quick Start
//!
//! ```text
//! let snapshot = Snapshot::load("catalog.json")?;
//! let mut store = Store::from_snapshot(snapshot, &LoadOptions::default())?;
//!
//! let records = load_changes("changes.csv")?;
//! let mut processor = BatchProcessor::new(records, &mut store);
//! let outcome = processor.process_all();
//!
//! store.to_snapshot().save("catalog.out.json")?;
//! ```
//!
//! # Modules
//!
//! - `store`: Catalog store with ID indexes (main entry point)
//! - `models`: User, Song and Playlist records
//! - `command`: Change commands and dispatch
//! - `processor`: Best-effort batch runs
//! - `changes`: Change file reader
//! - `storage`: Snapshot files
//! - `config`: Application configuration

pub mod changes;
pub mod command;
pub mod config;
pub mod error;
pub mod models;
pub mod processor;
pub mod storage;
pub mod store;

pub use changes::{load_changes, parse_changes, ChangesError, Record};
pub use command::{dispatch, Applied, Command};
pub use config::Config;
pub use error::{BatchError, CommandError, EntityKind, StoreError};
pub use models::{Playlist, Song, User};
pub use processor::{BatchProcessor, CommandFailure};
pub use storage::{Snapshot, SnapshotError};
pub use store::{LoadOptions, Store};
