//! Room transport.
//!
//! `RoomChannel` is the only thing the sync protocol knows about the
//! backend. `RoomDirectory` is an in-process push implementation: every
//! write is delivered to all subscribers of that room.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::{channel, Receiver, Sender};

use rustc_hash::FxHashMap;

use crate::core::GameRng;
use crate::error::SyncError;

use super::room::{Room, RoomUpdate};

/// Change notification for one room.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoomEvent {
    Updated(Room),
    Deleted,
}

/// Access to one room record.
pub trait RoomChannel {
    /// The room's code.
    fn code(&self) -> &str;

    /// Write to the record. Returns the record after the write.
    fn publish(&self, update: RoomUpdate) -> Result<Room, SyncError>;

    /// Receive every later change of the record.
    fn subscribe(&self) -> Receiver<RoomEvent>;

    /// The record as currently stored.
    fn current(&self) -> Result<Room, SyncError>;

    /// Remove the record. Subscribers receive `RoomEvent::Deleted`.
    fn delete(&self) -> Result<(), SyncError>;
}

#[derive(Debug)]
struct DirectoryInner {
    rooms: FxHashMap<String, Room>,
    subscribers: FxHashMap<String, Vec<Sender<RoomEvent>>>,
    rng: GameRng,
}

impl DirectoryInner {
    fn notify(&mut self, code: &str, event: &RoomEvent) {
        if let Some(senders) = self.subscribers.get_mut(code) {
            senders.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }

    fn room_mut(&mut self, code: &str) -> Result<&mut Room, SyncError> {
        self.rooms
            .get_mut(code)
            .ok_or_else(|| SyncError::RoomNotFound(code.to_string()))
    }
}

/// In-memory room directory keyed by numeric code.
///
/// Clones share the same rooms, so each peer can hold its own handle.
#[derive(Clone, Debug)]
pub struct RoomDirectory {
    inner: Rc<RefCell<DirectoryInner>>,
}

impl RoomDirectory {
    /// Create a directory; `seed` drives room code generation.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(DirectoryInner {
                rooms: FxHashMap::default(),
                subscribers: FxHashMap::default(),
                rng: GameRng::new(seed),
            })),
        }
    }

    /// Open a room with a fresh six-digit code.
    pub fn create_room(
        &self,
        host: &str,
        host_nickname: &str,
        host_deck: Vec<String>,
        now_ms: u64,
    ) -> Room {
        let mut inner = self.inner.borrow_mut();
        let code = loop {
            let code = (100_000 + inner.rng.gen_range(0..900_000)).to_string();
            if !inner.rooms.contains_key(&code) {
                break code;
            }
        };

        let room = Room::new(code.clone(), host, host_nickname, host_deck, now_ms);
        inner.rooms.insert(code.clone(), room.clone());
        log::info!("room {} created by {}", code, host_nickname);
        room
    }

    /// Join a waiting room as guest.
    pub fn join_room(
        &self,
        code: &str,
        guest: &str,
        guest_nickname: &str,
        guest_deck: Vec<String>,
    ) -> Result<Room, SyncError> {
        let room = self.channel(code).publish(RoomUpdate::Join {
            guest: guest.to_string(),
            guest_nickname: guest_nickname.to_string(),
            guest_deck,
        })?;
        log::info!("{} joined room {}", guest_nickname, code);
        Ok(room)
    }

    /// Move a ready room into play with the bootstrap record.
    pub fn start_battle(&self, code: &str) -> Result<Room, SyncError> {
        let room = self.channel(code).publish(RoomUpdate::Start)?;
        log::info!("room {} battle started", code);
        Ok(room)
    }

    /// Handle for one room.
    #[must_use]
    pub fn channel(&self, code: &str) -> RoomHandle {
        RoomHandle {
            directory: self.clone(),
            code: code.to_string(),
        }
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.inner.borrow().rooms.contains_key(code)
    }
}

/// `RoomChannel` over a `RoomDirectory`.
#[derive(Clone, Debug)]
pub struct RoomHandle {
    directory: RoomDirectory,
    code: String,
}

impl RoomChannel for RoomHandle {
    fn code(&self) -> &str {
        &self.code
    }

    fn publish(&self, update: RoomUpdate) -> Result<Room, SyncError> {
        let mut inner = self.directory.inner.borrow_mut();
        let room = inner.room_mut(&self.code)?;
        room.apply(update)?;
        let room = room.clone();

        inner.notify(&self.code, &RoomEvent::Updated(room.clone()));
        Ok(room)
    }

    fn subscribe(&self) -> Receiver<RoomEvent> {
        let (tx, rx) = channel();
        self.directory
            .inner
            .borrow_mut()
            .subscribers
            .entry(self.code.clone())
            .or_default()
            .push(tx);
        rx
    }

    fn current(&self) -> Result<Room, SyncError> {
        let mut inner = self.directory.inner.borrow_mut();
        inner.room_mut(&self.code).map(|room| room.clone())
    }

    fn delete(&self) -> Result<(), SyncError> {
        let mut inner = self.directory.inner.borrow_mut();
        if inner.rooms.remove(&self.code).is_none() {
            return Err(SyncError::RoomNotFound(self.code.clone()));
        }
        inner.notify(&self.code, &RoomEvent::Deleted);
        inner.subscribers.remove(&self.code);
        log::info!("room {} deleted", self.code);
        Ok(())
    }
}
