//! Battle state: everything needed to continue a battle.
//!
//! ## BattleState
//!
//! - Both decks (exactly `deck_size` cards each)
//! - Turn bookkeeping: round, whose turn, last card per side
//! - Status sets (frozen, feared, invisible, shielded) and rune timers
//! - This turn's runes
//! - Online fields (room code, local role)
//! - Battle log
//!
//! Status bookkeeping uses `im` persistent collections so the state can be
//! cloned into every render frame and snapshot cheaply.

use im::{OrdMap, OrdSet, Vector};
use serde::{Deserialize, Serialize};

use super::action::{ActionKind, ActionRecord};
use super::side::{CardRef, PeerRole, Side};
use crate::cards::CardInstance;
use crate::status::Rune;

/// One battle instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleState {
    // === Decks ===
    pub player_deck: Vec<CardInstance>,
    pub opponent_deck: Vec<CardInstance>,

    // === Turn bookkeeping ===
    /// Full cycles started (starts at 1).
    pub round: u32,

    /// Whose activation is current or next.
    pub is_player_turn: bool,

    /// Card that acted in the player's last activation.
    pub last_player_card: Option<String>,

    /// Card that acted in the opponent's last activation.
    pub last_opponent_card: Option<String>,

    pub in_progress: bool,

    // === Status ===
    pub frozen_cards: OrdSet<CardRef>,
    pub feared_cards: OrdSet<CardRef>,
    pub invisible_cards: OrdSet<CardRef>,
    pub shielded_cards: OrdSet<CardRef>,

    /// Rounds left per active rune effect.
    pub rune_durations: OrdMap<(Rune, CardRef), u32>,

    // === Runes ===
    pub player_rune: Option<Rune>,
    pub opponent_rune: Option<Rune>,
    pub rune_used_this_turn: bool,

    // === Online ===
    pub is_online: bool,
    pub room_code: Option<String>,
    pub peer_role: Option<PeerRole>,

    // === Log ===
    pub log: Vector<ActionRecord>,
    next_sequence: u32,
}

impl BattleState {
    /// Create a local battle. The player moves first.
    #[must_use]
    pub fn new(player_deck: Vec<CardInstance>, opponent_deck: Vec<CardInstance>) -> Self {
        Self {
            player_deck,
            opponent_deck,
            round: 1,
            is_player_turn: true,
            last_player_card: None,
            last_opponent_card: None,
            in_progress: true,
            frozen_cards: OrdSet::new(),
            feared_cards: OrdSet::new(),
            invisible_cards: OrdSet::new(),
            shielded_cards: OrdSet::new(),
            rune_durations: OrdMap::new(),
            player_rune: None,
            opponent_rune: None,
            rune_used_this_turn: false,
            is_online: false,
            room_code: None,
            peer_role: None,
            log: Vector::new(),
            next_sequence: 0,
        }
    }

    /// Mark as an online battle in the given room.
    #[must_use]
    pub fn online(mut self, role: PeerRole, room_code: impl Into<String>) -> Self {
        self.is_online = true;
        self.room_code = Some(room_code.into());
        self.peer_role = Some(role);
        self.is_player_turn = role == PeerRole::Host;
        self
    }

    /// The side that opens each round.
    #[must_use]
    pub fn first_mover(&self) -> Side {
        self.peer_role.map_or(Side::Player, PeerRole::first_mover)
    }

    /// The side whose activation is current or next.
    #[must_use]
    pub fn turn_side(&self) -> Side {
        if self.is_player_turn {
            Side::Player
        } else {
            Side::Opponent
        }
    }

    // === Decks ===

    #[must_use]
    pub fn deck(&self, side: Side) -> &[CardInstance] {
        match side {
            Side::Player => &self.player_deck,
            Side::Opponent => &self.opponent_deck,
        }
    }

    pub fn deck_mut(&mut self, side: Side) -> &mut Vec<CardInstance> {
        match side {
            Side::Player => &mut self.player_deck,
            Side::Opponent => &mut self.opponent_deck,
        }
    }

    /// Both decks at once: `(side's deck, the other side's deck)`.
    pub fn decks_mut(&mut self, side: Side) -> (&mut [CardInstance], &mut [CardInstance]) {
        match side {
            Side::Player => (self.player_deck.as_mut_slice(), self.opponent_deck.as_mut_slice()),
            Side::Opponent => (self.opponent_deck.as_mut_slice(), self.player_deck.as_mut_slice()),
        }
    }

    #[must_use]
    pub fn card(&self, side: Side, name: &str) -> Option<&CardInstance> {
        self.deck(side).iter().find(|c| c.name == name)
    }

    pub fn card_mut(&mut self, side: Side, name: &str) -> Option<&mut CardInstance> {
        self.deck_mut(side).iter_mut().find(|c| c.name == name)
    }

    /// Living cards of a side, in deck order.
    pub fn living(&self, side: Side) -> impl Iterator<Item = &CardInstance> {
        self.deck(side).iter().filter(|c| c.is_alive())
    }

    #[must_use]
    pub fn has_living(&self, side: Side) -> bool {
        self.living(side).next().is_some()
    }

    // === Turn bookkeeping ===

    #[must_use]
    pub fn last_card(&self, side: Side) -> Option<&str> {
        match side {
            Side::Player => self.last_player_card.as_deref(),
            Side::Opponent => self.last_opponent_card.as_deref(),
        }
    }

    pub fn set_last_card(&mut self, side: Side, name: Option<String>) {
        match side {
            Side::Player => self.last_player_card = name,
            Side::Opponent => self.last_opponent_card = name,
        }
    }

    #[must_use]
    pub fn rune(&self, side: Side) -> Option<Rune> {
        match side {
            Side::Player => self.player_rune,
            Side::Opponent => self.opponent_rune,
        }
    }

    pub fn set_rune(&mut self, side: Side, rune: Option<Rune>) {
        match side {
            Side::Player => self.player_rune = rune,
            Side::Opponent => self.opponent_rune = rune,
        }
    }

    // === Log ===

    /// Append an entry to the battle log.
    pub fn record(&mut self, side: Side, kind: ActionKind) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.log
            .push_back(ActionRecord::new(side, self.round, sequence, kind));
    }
}
