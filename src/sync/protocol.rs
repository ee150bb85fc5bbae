//! Turn handoff between two online peers.
//!
//! ## Protocol
//!
//! 1. `isHostTurn` marks the turn holder. After its activation the holder
//!    publishes both decks as per-card snapshots, both last cards and the
//!    round, flips `isHostTurn` and stamps `lastActionTime`.
//! 2. The waiting peer, on a record that hands it the turn, overwrites its
//!    local cards from the record (both sides) and adopts the round.
//! 3. Records without `lastActionTime` are the bootstrap and are never
//!    reconciled.
//!
//! The host always moves first in a round, so the guest closes each round
//! and publishes the ticked round and rune timers.
//!
//! Reconciliation is a pure overwrite: applying the same record twice
//! gives the same state.

use std::sync::mpsc::Receiver;

use crate::core::{BattleState, CardRef, PeerRole, Side, SideMap};
use crate::error::SyncError;
use crate::status::{Rune, StatusEffectManager};

use super::channel::{RoomChannel, RoomEvent};
use super::room::{CardSnapshot, Room, RoomStatus, RoomUpdate, TurnRecord};

/// What a reconciliation changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Cards overwritten per local side.
    pub updated: SideMap<usize>,
    /// Snapshot entries with no matching local card.
    pub skipped: Vec<CardRef>,
    /// Round adopted from the record.
    pub round: u32,
}

impl ReconcileReport {
    #[must_use]
    pub fn total_updated(&self) -> usize {
        self.updated.iter().map(|(_, n)| *n).sum()
    }
}

/// Local side that owns the host's deck.
fn host_side(role: PeerRole) -> Side {
    match role {
        PeerRole::Host => Side::Player,
        PeerRole::Guest => Side::Opponent,
    }
}

/// Per-card snapshots of one side's deck.
#[must_use]
pub fn snapshot_deck(state: &BattleState, side: Side) -> Vec<CardSnapshot> {
    state
        .deck(side)
        .iter()
        .map(|card| CardSnapshot {
            name: card.name.clone(),
            health: card.health(),
            max_health: card.max_health(),
            is_dead: card.is_dead(),
            damage: card.damage,
            defense: card.defense,
            speed: card.speed,
            ability_cooldown: card.ability_cooldown,
            frozen: StatusEffectManager::is_frozen(state, side, &card.name),
            feared: StatusEffectManager::is_feared(state, side, &card.name),
            invisible_rounds: StatusEffectManager::rounds_left(state, Rune::Invisibility, side, &card.name)
                .unwrap_or(0),
            shield_rounds: StatusEffectManager::rounds_left(state, Rune::Shield, side, &card.name)
                .unwrap_or(0),
            temp_defense: card.temp_defense,
        })
        .collect()
}

/// Overwrite `state` from a published room record.
///
/// Unknown card names are skipped and reported.
pub fn reconcile(state: &mut BattleState, room: &Room, role: PeerRole) -> ReconcileReport {
    let host = host_side(role);
    let mut report = ReconcileReport {
        updated: SideMap::with_value(0),
        skipped: Vec::new(),
        round: room.round,
    };

    let decks = [(host, Some(&room.host_deck)), (host.other(), room.guest_deck.as_ref())];
    for (side, deck) in decks {
        let Some(snapshots) = deck.and_then(|d| d.snapshots()) else {
            continue;
        };
        for snapshot in snapshots {
            if apply_snapshot(state, side, snapshot) {
                report.updated[side] += 1;
            } else {
                log::warn!(
                    "room {}: no local card `{}` on {} side, skipped",
                    room.code,
                    snapshot.name,
                    side
                );
                report.skipped.push(CardRef::new(side, snapshot.name.clone()));
            }
        }
    }

    state.round = room.round;
    state.set_last_card(host, room.last_player_card.clone());
    state.set_last_card(host.other(), room.last_bot_card.clone());
    report
}

fn apply_snapshot(state: &mut BattleState, side: Side, snapshot: &CardSnapshot) -> bool {
    let Some(card) = state.card_mut(side, &snapshot.name) else {
        return false;
    };

    card.damage = snapshot.damage;
    card.defense = snapshot.defense;
    card.speed = snapshot.speed;
    card.set_max_health(snapshot.max_health);
    card.set_health(if snapshot.is_dead { 0 } else { snapshot.health });
    card.ability_cooldown = snapshot.ability_cooldown;
    card.temp_defense = snapshot.temp_defense;

    let target = CardRef::new(side, snapshot.name.clone());
    set_member(&mut state.frozen_cards, &target, snapshot.frozen);
    set_member(&mut state.feared_cards, &target, snapshot.feared);

    for (rune, rounds) in [
        (Rune::Invisibility, snapshot.invisible_rounds),
        (Rune::Shield, snapshot.shield_rounds),
    ] {
        let set = match rune {
            Rune::Shield => &mut state.shielded_cards,
            _ => &mut state.invisible_cards,
        };
        set_member(set, &target, rounds > 0);
        if rounds > 0 {
            state.rune_durations.insert((rune, target.clone()), rounds);
        } else {
            state.rune_durations.remove(&(rune, target.clone()));
        }
    }
    true
}

fn set_member(set: &mut im::OrdSet<CardRef>, target: &CardRef, present: bool) {
    if present {
        set.insert(target.clone());
    } else {
        set.remove(target);
    }
}

/// Online sync for one peer.
pub struct SyncProtocol<C: RoomChannel> {
    channel: C,
    role: PeerRole,
    events: Receiver<RoomEvent>,
}

impl<C: RoomChannel> SyncProtocol<C> {
    /// Subscribe to the room as `role`.
    pub fn new(channel: C, role: PeerRole) -> Self {
        let events = channel.subscribe();
        Self {
            channel,
            role,
            events,
        }
    }

    #[must_use]
    pub fn role(&self) -> PeerRole {
        self.role
    }

    #[must_use]
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Publish the local activation and hand the turn to the peer.
    pub fn publish_activation(&self, state: &BattleState, now_ms: u64) -> Result<Room, SyncError> {
        let host = host_side(self.role);
        let record = TurnRecord {
            host_deck: snapshot_deck(state, host),
            guest_deck: snapshot_deck(state, host.other()),
            is_host_turn: self.role == PeerRole::Guest,
            round: state.round,
            last_action_time: now_ms,
            last_player_card: state.last_card(host).map(str::to_string),
            last_bot_card: state.last_card(host.other()).map(str::to_string),
        };

        let room = self.channel.publish(RoomUpdate::Turn(record))?;
        log::info!(
            "room {}: published round {} as {:?}",
            self.channel.code(),
            state.round,
            self.role
        );
        Ok(room)
    }

    /// Pending room events, oldest first.
    pub fn poll(&mut self) -> Vec<RoomEvent> {
        self.events.try_iter().collect()
    }

    /// Whether `room` is a published activation that hands us the turn.
    #[must_use]
    pub fn should_reconcile(&self, room: &Room) -> bool {
        room.is_authoritative()
            && room.status == RoomStatus::Playing
            && room.is_host_turn == (self.role == PeerRole::Host)
    }

    /// Delete the room (battle over or abandoned).
    pub fn close(&self) -> Result<(), SyncError> {
        match self.channel.delete() {
            Ok(()) | Err(SyncError::RoomNotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
