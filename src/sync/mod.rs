//! Online synchronization through a shared room record.
//!
//! ## Key Types
//!
//! - `Room`: The shared record (camelCase JSON)
//! - `RoomChannel`: Transport seam (`publish`, `subscribe`, `current`, `delete`)
//! - `RoomDirectory`: In-memory rooms with lobby operations
//! - `SyncProtocol`: Publishes local activations, reconciles the peer's

mod channel;
mod protocol;
mod room;

pub use channel::{RoomChannel, RoomDirectory, RoomEvent, RoomHandle};
pub use protocol::{reconcile, snapshot_deck, ReconcileReport, SyncProtocol};
pub use room::{CardSnapshot, Room, RoomDeck, RoomStatus, RoomUpdate, TurnRecord};
