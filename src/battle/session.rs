//! Battle session: the engine plus everything around it.
//!
//! For each queued intent the session runs the full control flow:
//! engine validates and resolves, the snapshot is saved (or cleared once
//! the battle is over), and online activations are published to the room.
//! Peer activations come in through `poll_peer`.
//!
//! Time is always passed in (`now_ms`); the session never reads a clock.

use crate::cards::{build_cards, build_deck, CardCatalog, ProfileStore};
use crate::core::{BattleConfig, BattleState, GameRng, Intent, PeerRole, Side};
use crate::error::{BattleError, SyncError};
use crate::intents::IntentQueue;
use crate::rules::BattleOutcome;
use crate::snapshot::{SnapshotSlot, SnapshotStore};
use crate::sync::{Room, RoomChannel, RoomEvent, RoomHandle, RoomStatus, SyncProtocol};

use super::bot::{generate_bot_deck, DifficultyProfile};
use super::engine::TurnEngine;
use super::events::RenderFrame;
use super::phase::TurnPhase;

/// One running battle with persistence and (online) sync.
pub struct BattleSession<S: SnapshotSlot, C: RoomChannel = RoomHandle> {
    engine: TurnEngine,
    queue: IntentQueue,
    snapshots: SnapshotStore<S>,
    sync: Option<SyncProtocol<C>>,
}

impl<S: SnapshotSlot, C: RoomChannel> BattleSession<S, C> {
    #[must_use]
    pub fn new(engine: TurnEngine, snapshots: SnapshotStore<S>, sync: Option<SyncProtocol<C>>) -> Self {
        Self {
            engine,
            queue: IntentQueue::new(),
            snapshots,
            sync,
        }
    }

    /// Start a battle against the scripted bot.
    ///
    /// Deck problems fail here, before any battle state exists.
    pub fn start_local(
        catalog: &impl CardCatalog,
        profile: &impl ProfileStore,
        difficulty: DifficultyProfile,
        config: BattleConfig,
        slot: S,
        seed: u64,
        now_ms: u64,
    ) -> Result<Self, BattleError> {
        let player_deck = build_deck(catalog, profile, &config)?;
        let mut deck_rng = GameRng::new(seed).for_context("bot-deck");
        let opponent_deck = generate_bot_deck(catalog, difficulty, &mut deck_rng, &config)?;

        let snapshots = SnapshotStore::new(slot, &config);
        let engine = TurnEngine::local(player_deck, opponent_deck, config, seed);
        let mut session = Self::new(engine, snapshots, None);
        session.persist(now_ms)?;
        Ok(session)
    }

    /// Start an online battle in a room that is already playing.
    ///
    /// The peer's deck comes from the room's card names at base stats until
    /// the first published activation overwrites it.
    #[allow(clippy::too_many_arguments)]
    pub fn start_online(
        catalog: &impl CardCatalog,
        profile: &impl ProfileStore,
        room: &Room,
        role: PeerRole,
        channel: C,
        config: BattleConfig,
        slot: S,
        seed: u64,
        now_ms: u64,
    ) -> Result<Self, BattleError> {
        if room.status != RoomStatus::Playing {
            return Err(SyncError::WrongStatus {
                code: room.code.clone(),
                status: room.status.as_str(),
                expected: RoomStatus::Playing.as_str(),
            }
            .into());
        }
        let peer_deck = match role {
            PeerRole::Host => room.guest_deck.as_ref(),
            PeerRole::Guest => Some(&room.host_deck),
        }
        .ok_or_else(|| SyncError::RoomClosed(room.code.clone()))?;

        let player_deck = build_deck(catalog, profile, &config)?;
        let opponent_deck = build_cards(catalog, &peer_deck.names(), |_| Vec::new(), &config)?;

        let snapshots = SnapshotStore::new(slot, &config);
        let sync = SyncProtocol::new(channel, role);
        let engine = TurnEngine::online(player_deck, opponent_deck, role, room.code.clone(), config, seed);
        let mut session = Self::new(engine, snapshots, Some(sync));
        session.persist(now_ms)?;
        Ok(session)
    }

    /// Resume the saved battle, if a fresh one exists.
    ///
    /// Online battles need a channel to their room; a room that no longer
    /// exists discards the snapshot. A peer activation already waiting in
    /// the room is adopted right away.
    pub fn resume(
        catalog: &impl CardCatalog,
        slot: S,
        config: BattleConfig,
        channel: Option<C>,
        now_ms: u64,
    ) -> Result<Option<Self>, BattleError> {
        let mut snapshots = SnapshotStore::new(slot, &config);
        let Some(snapshot) = snapshots.load(now_ms)? else {
            return Ok(None);
        };
        if !snapshot.state.in_progress {
            snapshots.clear()?;
            return Ok(None);
        }

        let (sync, room) = match (snapshot.state.is_online, snapshot.state.peer_role) {
            (true, Some(role)) => {
                let code = snapshot.state.room_code.clone().unwrap_or_default();
                let Some(channel) = channel else {
                    snapshots.clear()?;
                    return Err(SyncError::RoomClosed(code).into());
                };
                let room = match channel.current() {
                    Ok(room) => room,
                    Err(e) => {
                        snapshots.clear()?;
                        return Err(e.into());
                    }
                };
                (Some(SyncProtocol::new(channel, role)), Some(room))
            }
            _ => (None, None),
        };

        let engine = TurnEngine::restore(snapshot.state, &snapshot.rng, config, catalog);
        let mut session = Self::new(engine, snapshots, sync);
        session.enqueue(Intent::Resume);

        // The peer may have published while this client was away.
        if let Some(room) = room {
            if session.adopt_peer_record(&room)? {
                session.flush(now_ms)?;
            }
        }
        Ok(Some(session))
    }

    // === Accessors ===

    #[must_use]
    pub fn engine(&self) -> &TurnEngine {
        &self.engine
    }

    #[must_use]
    pub fn state(&self) -> &BattleState {
        self.engine.state()
    }

    #[must_use]
    pub fn phase(&self) -> &TurnPhase {
        self.engine.phase()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.engine.is_over()
    }

    #[must_use]
    pub fn snapshots(&self) -> &SnapshotStore<S> {
        &self.snapshots
    }

    #[must_use]
    pub fn sync(&self) -> Option<&SyncProtocol<C>> {
        self.sync.as_ref()
    }

    // === Flow ===

    pub fn enqueue(&mut self, intent: Intent) {
        self.queue.push(intent);
    }

    /// Apply every queued intent and return the resulting frame.
    ///
    /// Rejected intents show up as `RenderEvent::IntentRejected` in the
    /// frame; only persistence and transport failures are errors.
    pub fn pump(&mut self, now_ms: u64) -> Result<RenderFrame, BattleError> {
        while let Some(intent) = self.queue.pop() {
            if self.engine.submit(intent).is_ok() {
                self.flush(now_ms)?;
            }
            if self.engine.is_over() {
                self.queue.clear();
            }
        }
        Ok(self.engine.take_frame())
    }

    /// Handle room events. Returns a frame when anything arrived.
    pub fn poll_peer(&mut self, now_ms: u64) -> Result<Option<RenderFrame>, BattleError> {
        let events = match self.sync.as_mut() {
            Some(sync) => sync.poll(),
            None => return Ok(None),
        };
        if events.is_empty() {
            return Ok(None);
        }

        for event in events {
            match event {
                RoomEvent::Updated(room) => {
                    self.adopt_peer_record(&room)?;
                }
                RoomEvent::Deleted => {
                    if !self.engine.is_over() {
                        log::warn!("room closed by the opponent");
                        self.engine
                            .terminate(BattleOutcome::Abandoned { by: Side::Opponent });
                    }
                }
            }
        }

        self.flush(now_ms)?;
        Ok(Some(self.engine.take_frame()))
    }

    /// Take the peer's activation from `room` if it hands us the turn.
    ///
    /// Returns whether the record was adopted. A battle that ends on the
    /// adopted record closes the room.
    fn adopt_peer_record(&mut self, room: &Room) -> Result<bool, BattleError> {
        let Some(sync) = &self.sync else {
            return Ok(false);
        };
        if !sync.should_reconcile(room) || !self.engine.is_waiting_for_peer() {
            return Ok(false);
        }
        let Some(report) = self.engine.accept_peer_turn(room) else {
            return Ok(false);
        };
        log::debug!("reconciled {} cards", report.total_updated());
        if self.engine.is_over() {
            sync.close()?;
        }
        Ok(true)
    }

    /// Publish a pending handoff, close an abandoned room, then persist.
    ///
    /// A peer turn can end in a local skip, so `poll_peer` may also leave
    /// a handoff behind.
    fn flush(&mut self, now_ms: u64) -> Result<(), BattleError> {
        if let Some(sync) = &self.sync {
            if self.engine.take_handoff() {
                sync.publish_activation(self.engine.state(), now_ms)?;
            }
            if self.engine.outcome() == Some(BattleOutcome::Abandoned { by: Side::Player }) {
                sync.close()?;
            }
        }
        self.persist(now_ms)
    }

    fn persist(&mut self, now_ms: u64) -> Result<(), BattleError> {
        if self.engine.is_over() {
            self.snapshots.clear()?;
        } else {
            self.snapshots
                .save(self.engine.state(), self.engine.rng_state(), now_ms)?;
        }
        Ok(())
    }
}
