//! Timed status effects and ability cooldowns.
//!
//! ## Lifetimes
//!
//! - **Rune effects** (invisible, shielded): last a number of rounds and
//!   tick down at round advance. Removing a shield rolls back its defense
//!   bonus.
//! - **Control effects** (frozen, feared): block the affected side's next
//!   activation and are consumed when that activation closes, whether the
//!   side acted or skipped.
//! - **Cooldowns**: tick down at the start of each of the owning side's
//!   turns.

use crate::core::{BattleConfig, BattleState, CardRef, Side};
use crate::error::IntentError;

use super::rune::Rune;

/// Result of spending a rune.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuneOutcome {
    pub rune: Rune,
    pub target: CardRef,
    /// Health restored (heal rune only).
    pub healed: i32,
    /// Rounds the effect lasts (timed runes only).
    pub rounds: u32,
}

/// Status bookkeeping on a `BattleState`.
pub struct StatusEffectManager;

impl StatusEffectManager {
    // === Queries ===

    #[must_use]
    pub fn is_frozen(state: &BattleState, side: Side, name: &str) -> bool {
        state.frozen_cards.contains(&CardRef::new(side, name))
    }

    #[must_use]
    pub fn is_feared(state: &BattleState, side: Side, name: &str) -> bool {
        state.feared_cards.contains(&CardRef::new(side, name))
    }

    #[must_use]
    pub fn is_invisible(state: &BattleState, side: Side, name: &str) -> bool {
        state.invisible_cards.contains(&CardRef::new(side, name))
    }

    #[must_use]
    pub fn is_shielded(state: &BattleState, side: Side, name: &str) -> bool {
        state.shielded_cards.contains(&CardRef::new(side, name))
    }

    /// Frozen or feared.
    #[must_use]
    pub fn is_controlled(state: &BattleState, side: Side, name: &str) -> bool {
        Self::is_frozen(state, side, name) || Self::is_feared(state, side, name)
    }

    /// Rounds left on a rune effect, if active.
    #[must_use]
    pub fn rounds_left(state: &BattleState, rune: Rune, side: Side, name: &str) -> Option<u32> {
        state
            .rune_durations
            .get(&(rune, CardRef::new(side, name)))
            .copied()
    }

    // === Control effects ===

    pub fn freeze(state: &mut BattleState, target: CardRef) {
        log::debug!("{} frozen", target);
        state.frozen_cards.insert(target);
    }

    pub fn fear(state: &mut BattleState, target: CardRef) {
        log::debug!("{} feared", target);
        state.feared_cards.insert(target);
    }

    /// Consume the control effects of `side` once its activation closes.
    pub fn close_activation(state: &mut BattleState, side: Side) {
        state.frozen_cards = state.frozen_cards.iter().filter(|r| r.side != side).cloned().collect();
        state.feared_cards = state.feared_cards.iter().filter(|r| r.side != side).cloned().collect();
    }

    // === Runes ===

    /// Spend `side`'s rune on one of its own cards.
    ///
    /// Invisibility and shield need a living card; heal needs a living
    /// damaged one. Re-applying a timed rune refreshes its duration without
    /// stacking the bonus.
    pub fn apply_rune(
        state: &mut BattleState,
        side: Side,
        rune: Rune,
        target: &str,
        config: &BattleConfig,
    ) -> Result<RuneOutcome, IntentError> {
        let card = state
            .card(side, target)
            .ok_or_else(|| IntentError::UnknownCard(target.to_string()))?;
        let legal = match rune {
            Rune::Heal => card.is_damaged(),
            Rune::Invisibility | Rune::Shield => card.is_alive(),
        };
        if !legal {
            return Err(IntentError::InvalidTarget(target.to_string()));
        }

        let target_ref = CardRef::new(side, target);
        let rounds = if rune.is_timed() {
            config.rune_duration(side)
        } else {
            0
        };
        let mut healed = 0;

        match rune {
            Rune::Invisibility => {
                state.invisible_cards.insert(target_ref.clone());
            }
            Rune::Shield => {
                if state.shielded_cards.insert(target_ref.clone()).is_none() {
                    if let Some(card) = state.card_mut(side, target) {
                        card.temp_defense += config.shield_defense_bonus;
                    }
                }
            }
            Rune::Heal => {
                if let Some(card) = state.card_mut(side, target) {
                    healed = card.heal(config.rune_heal_amount);
                }
            }
        }

        if rune.is_timed() {
            state.rune_durations.insert((rune, target_ref.clone()), rounds);
        }

        log::debug!("{} rune on {} ({} rounds)", rune, target_ref, rounds);
        Ok(RuneOutcome {
            rune,
            target: target_ref,
            healed,
            rounds,
        })
    }

    // === Timers ===

    /// Tick cooldowns of `side`'s cards at the start of its turn.
    pub fn begin_turn(state: &mut BattleState, side: Side) {
        for card in state.deck_mut(side) {
            card.tick_cooldown();
        }
    }

    /// Tick rune effects at round advance. Returns the effects that expired.
    pub fn tick_round(state: &mut BattleState, config: &BattleConfig) -> Vec<(Rune, CardRef)> {
        let mut expired = Vec::new();
        let mut durations = state.rune_durations.clone();

        for (key, rounds) in state.rune_durations.iter() {
            let left = rounds.saturating_sub(1);
            if left == 0 {
                durations.remove(key);
                expired.push(key.clone());
            } else {
                durations.insert(key.clone(), left);
            }
        }
        state.rune_durations = durations;

        for (rune, target) in &expired {
            Self::remove_rune(state, *rune, target, config);
        }
        expired
    }

    /// Drop a rune effect and undo its bonus.
    pub fn remove_rune(state: &mut BattleState, rune: Rune, target: &CardRef, config: &BattleConfig) {
        state.rune_durations.remove(&(rune, target.clone()));
        match rune {
            Rune::Invisibility => {
                state.invisible_cards.remove(target);
            }
            Rune::Shield => {
                if state.shielded_cards.remove(target).is_some() {
                    if let Some(card) = state.card_mut(target.side, &target.name) {
                        card.temp_defense = (card.temp_defense - config.shield_defense_bonus).max(0);
                    }
                }
            }
            Rune::Heal => {}
        }
        log::debug!("{} expired on {}", rune, target);
    }
}
