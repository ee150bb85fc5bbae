//! Battle rules: who may act and when the battle is over.
//!
//! - Eligibility: alive, not the side's last card, not frozen, not feared
//! - Ability casting: eligible, carries an ability, cooldown at zero
//! - End: a side with no living cards loses

use serde::{Deserialize, Serialize};

use crate::core::{BattleState, Side};
use crate::error::IntentError;
use crate::status::StatusEffectManager;

/// Result of a finished battle, from the local side's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    /// One side still has living cards.
    Winner(Side),
    /// Neither side has living cards.
    Draw,
    /// A side gave up or disconnected.
    Abandoned { by: Side },
}

impl BattleOutcome {
    /// Check if `side` won.
    #[must_use]
    pub fn is_winner(&self, side: Side) -> bool {
        match self {
            BattleOutcome::Winner(s) => *s == side,
            BattleOutcome::Abandoned { by } => *by != side,
            BattleOutcome::Draw => false,
        }
    }
}

/// Stateless rule checks.
pub struct BattleRules;

impl BattleRules {
    /// Whether `name` may act in `side`'s current activation.
    #[must_use]
    pub fn is_eligible(state: &BattleState, side: Side, name: &str) -> bool {
        state.card(side, name).is_some_and(|c| c.is_alive())
            && state.last_card(side) != Some(name)
            && !StatusEffectManager::is_controlled(state, side, name)
    }

    /// Cards of `side` that may act, in deck order.
    #[must_use]
    pub fn eligible_attackers(state: &BattleState, side: Side) -> Vec<String> {
        state
            .living(side)
            .filter(|c| Self::is_eligible(state, side, &c.name))
            .map(|c| c.name.clone())
            .collect()
    }

    /// Check that `name` may act now.
    pub fn check_actor(state: &BattleState, side: Side, name: &str) -> Result<(), IntentError> {
        if state.card(side, name).is_none() {
            return Err(IntentError::UnknownCard(name.to_string()));
        }
        if !Self::is_eligible(state, side, name) {
            return Err(IntentError::NotEligible(name.to_string()));
        }
        Ok(())
    }

    /// Check that `name` may cast its ability now.
    pub fn check_caster(state: &BattleState, side: Side, name: &str) -> Result<(), IntentError> {
        Self::check_actor(state, side, name)?;

        let card = state
            .card(side, name)
            .ok_or_else(|| IntentError::UnknownCard(name.to_string()))?;
        if card.ability.is_none() {
            return Err(IntentError::NoAbility(name.to_string()));
        }
        if card.ability_cooldown > 0 {
            return Err(IntentError::AbilityOnCooldown {
                card: name.to_string(),
                remaining: card.ability_cooldown,
            });
        }
        Ok(())
    }

    /// The outcome if the battle is over.
    #[must_use]
    pub fn check_outcome(state: &BattleState) -> Option<BattleOutcome> {
        match (state.has_living(Side::Player), state.has_living(Side::Opponent)) {
            (true, true) => None,
            (true, false) => Some(BattleOutcome::Winner(Side::Player)),
            (false, true) => Some(BattleOutcome::Winner(Side::Opponent)),
            (false, false) => Some(BattleOutcome::Draw),
        }
    }
}
