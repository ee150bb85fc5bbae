//! Battle persistence across reloads.

mod store;

pub use store::{BattleSnapshot, FileSlot, MemorySlot, SnapshotSlot, SnapshotStore};
