//! Battle snapshots for resume-after-reload.
//!
//! A snapshot is the full `BattleState`, the combat RNG position and the
//! save time, encoded with `bincode` into a single slot.
//!
//! ## Load rules
//!
//! - Empty slot: nothing to resume
//! - Older than `snapshot_max_age_ms` (24h by default): discarded
//! - Undecodable: slot cleared, `SnapshotError::Corrupt`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{BattleConfig, BattleState, GameRngState};
use crate::error::SnapshotError;

/// Durable storage for one snapshot.
pub trait SnapshotSlot {
    /// Stored bytes, `None` when empty.
    fn read(&self) -> io::Result<Option<Vec<u8>>>;

    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    fn clear(&mut self) -> io::Result<()>;
}

/// In-memory slot.
#[derive(Clone, Debug, Default)]
pub struct MemorySlot {
    bytes: Option<Vec<u8>>,
}

impl MemorySlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_none()
    }
}

impl SnapshotSlot for MemorySlot {
    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.bytes.clone())
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.bytes = Some(bytes.to_vec());
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.bytes = None;
        Ok(())
    }
}

/// Slot backed by a single file.
#[derive(Clone, Debug)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSlot for FileSlot {
    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        fs::write(&self.path, bytes)
    }

    fn clear(&mut self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// What gets persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub saved_at_ms: u64,
    pub state: BattleState,
    pub rng: GameRngState,
}

/// Saves and loads battle snapshots in a slot.
#[derive(Debug)]
pub struct SnapshotStore<S: SnapshotSlot> {
    slot: S,
    max_age_ms: u64,
}

impl<S: SnapshotSlot> SnapshotStore<S> {
    #[must_use]
    pub fn new(slot: S, config: &BattleConfig) -> Self {
        Self {
            slot,
            max_age_ms: config.snapshot_max_age_ms,
        }
    }

    #[must_use]
    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn into_slot(self) -> S {
        self.slot
    }

    /// Overwrite the slot with the current battle.
    pub fn save(
        &mut self,
        state: &BattleState,
        rng: GameRngState,
        now_ms: u64,
    ) -> Result<(), SnapshotError> {
        let snapshot = BattleSnapshot {
            saved_at_ms: now_ms,
            state: state.clone(),
            rng,
        };
        let bytes = bincode::serialize(&snapshot)?;
        self.slot.write(&bytes)?;
        log::debug!("snapshot saved at round {} ({} bytes)", state.round, bytes.len());
        Ok(())
    }

    /// Load a fresh snapshot.
    ///
    /// Stale snapshots are discarded and yield `Ok(None)`. Corrupt ones are
    /// discarded and yield an error.
    pub fn load(&mut self, now_ms: u64) -> Result<Option<BattleSnapshot>, SnapshotError> {
        let Some(bytes) = self.slot.read()? else {
            return Ok(None);
        };

        let snapshot: BattleSnapshot = match bincode::deserialize(&bytes) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("discarding corrupt snapshot: {}", e);
                self.slot.clear()?;
                return Err(SnapshotError::Corrupt(e));
            }
        };

        let age = now_ms.saturating_sub(snapshot.saved_at_ms);
        if age > self.max_age_ms {
            log::warn!("discarding snapshot saved {} ms ago", age);
            self.slot.clear()?;
            return Ok(None);
        }

        log::info!("snapshot loaded (round {})", snapshot.state.round);
        Ok(Some(snapshot))
    }

    pub fn clear(&mut self) -> Result<(), SnapshotError> {
        self.slot.clear()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardInstance, StatBlock};
    use crate::core::GameRng;

    const DAY_MS: u64 = 86_400_000;

    fn state() -> BattleState {
        let deck = |names: [&str; 3]| {
            names
                .iter()
                .map(|n| CardInstance::new(*n, StatBlock::new(20, 100, 10, 10)))
                .collect()
        };
        let mut state = BattleState::new(deck(["A", "B", "C"]), deck(["X", "Y", "Z"]));
        state.round = 4;
        state
    }

    fn store() -> SnapshotStore<MemorySlot> {
        SnapshotStore::new(MemorySlot::new(), &BattleConfig::default())
    }

    #[test]
    fn test_save_and_load() {
        let mut store = store();
        let rng = GameRng::new(9);
        store.save(&state(), rng.state(), 1_000).unwrap();

        let loaded = store.load(1_000 + DAY_MS).unwrap().unwrap();
        assert_eq!(loaded.state, state());
        assert_eq!(loaded.rng, rng.state());
        assert_eq!(loaded.saved_at_ms, 1_000);
    }

    #[test]
    fn test_stale_snapshot_discarded() {
        let mut store = store();
        store.save(&state(), GameRng::new(1).state(), 1_000).unwrap();

        assert_eq!(store.load(1_001 + DAY_MS).unwrap(), None);
        assert!(store.slot().is_empty());
    }

    #[test]
    fn test_corrupt_snapshot_discarded() {
        let mut slot = MemorySlot::new();
        slot.write(&[1, 2, 3]).unwrap();
        let mut store = SnapshotStore::new(slot, &BattleConfig::default());

        assert!(matches!(store.load(0), Err(SnapshotError::Corrupt(_))));
        assert!(store.slot().is_empty());
        assert_eq!(store.load(0).unwrap(), None);
    }

    #[test]
    fn test_empty_slot() {
        assert_eq!(store().load(0).unwrap(), None);
    }

    #[test]
    fn test_file_slot() {
        let path = std::env::temp_dir().join(format!("card-duel-snapshot-{}.bin", std::process::id()));
        let mut store = SnapshotStore::new(FileSlot::new(&path), &BattleConfig::default());

        store.save(&state(), GameRng::new(2).state(), 5).unwrap();
        assert!(store.load(10).unwrap().is_some());

        store.clear().unwrap();
        assert!(!path.exists());
        assert_eq!(store.load(10).unwrap(), None);
        store.clear().unwrap();
    }
}
