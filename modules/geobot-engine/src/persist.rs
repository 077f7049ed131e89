//! StateStore implementations and the on-disk record format.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use geobot_core::types::{ImageGame, SurfaceId, UserId};

use crate::traits::StateStore;

// ---------------------------------------------------------------------------
// Snapshot — the wire format
// ---------------------------------------------------------------------------

/// The complete persisted engine state, exactly as written to disk.
///
/// Field names are the on-disk JSON record. Map keys (tags, participant
/// ids) serialize as JSON object keys; numeric ids become strings there and
/// come back as numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub subscribed: BTreeSet<SurfaceId>,
    pub admins: BTreeSet<SurfaceId>,
    /// Active rounds, tag → round.
    pub images: BTreeMap<String, ImageGame>,
    /// Closed rounds in close order.
    pub closed_images: Vec<ImageGame>,
    pub scores: BTreeMap<UserId, i64>,
    pub maxdist: f64,
}

// ---------------------------------------------------------------------------
// JsonStateStore (production — single file on disk)
// ---------------------------------------------------------------------------

/// Whole-file JSON persistence. Every save rewrites the file in place; the
/// last successful save wins. No crash-atomicity beyond that.
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read state file: {}", self.path.display()))
            }
        };
        let snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))?;
        info!(path = %self.path.display(), "Game state loaded");
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create data dir: {}", dir.display()))?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(snapshot)?)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryStateStore (tests — no disk required)
// ---------------------------------------------------------------------------

/// In-memory state store for testing. Keeps the latest snapshot and counts
/// saves so tests can assert the persistence contract. Thread-safe.
#[derive(Default)]
pub struct MemoryStateStore {
    latest: Mutex<Option<Snapshot>>,
    save_count: AtomicU32,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store, as if a previous process had saved this snapshot.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            latest: Mutex::new(Some(snapshot)),
            save_count: AtomicU32::new(0),
        }
    }

    /// The most recently saved snapshot (for test assertions).
    pub fn latest(&self) -> Option<Snapshot> {
        self.latest.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> u32 {
        self.save_count.load(Ordering::SeqCst)
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        Ok(self.latest.lock().unwrap().clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        *self.latest.lock().unwrap() = Some(snapshot.clone());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geobot_core::geo::WORLD_MAXDIST_METERS;
    use geobot_core::types::{Coordinate, Guess, ImageGame, MessageRef};

    fn sample_snapshot() -> Snapshot {
        let mut round = ImageGame::new(
            Coordinate::new(35.6586, 139.7454),
            "breeze".into(),
            "breeze.jpg".into(),
            vec![MessageRef::new(7, 70)],
            vec![MessageRef::new(7, 71)],
        );
        round.guesses.insert(
            3,
            Guess::new(Coordinate::new(34.0, 135.0), MessageRef::new(7, 72)),
        );

        let mut closed = round.clone();
        closed.tag = "ember".into();

        Snapshot {
            subscribed: BTreeSet::from([7, 9]),
            admins: BTreeSet::from([1]),
            images: BTreeMap::from([("breeze".to_string(), round)]),
            closed_images: vec![closed],
            scores: BTreeMap::from([(3, 4100)]),
            maxdist: WORLD_MAXDIST_METERS,
        }
    }

    #[test]
    fn file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStateStore::new(dir.path().join("data.json"));

        let snapshot = sample_snapshot();
        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap(), Some(snapshot));
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStateStore::new(dir.path().join("nope/data.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_creates_parent_dirs_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStateStore::new(dir.path().join("deep/nested/data.json"));

        let mut snapshot = sample_snapshot();
        store.save(&snapshot).unwrap();
        snapshot.scores.insert(8, 250);
        store.save(&snapshot).unwrap();

        assert_eq!(store.load().unwrap(), Some(snapshot));
    }
}
