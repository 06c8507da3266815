//! Storage layer
//!
//! Reads and writes catalog snapshots as JSON files.
//!
//! A snapshot holds only the three collections. Indexes and the playlist ID
//! generator are rebuilt by `Store` on load and never written out.

pub mod error;
pub mod snapshot;

pub use error::{SnapshotError, SnapshotResult};
pub use snapshot::Snapshot;
