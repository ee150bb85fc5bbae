//! Target selection for attacks and abilities.
//!
//! - Normal attacks hit a living enemy that is not invisible.
//! - Abilities ignore invisibility; their target set comes from
//!   `AbilityKind::target`.
//! - When the current target dies mid-sequence, the next hit goes to the
//!   first living enemy in deck order, visible cards first.

use crate::core::{BattleState, CardRef, Side};
use crate::error::IntentError;
use crate::status::StatusEffectManager;

use super::ability::{AbilityKind, AbilityTarget};

/// Target selection rules.
pub struct TargetSelector;

impl TargetSelector {
    /// Names of enemy cards `side` may attack, in deck order.
    #[must_use]
    pub fn attack_targets(state: &BattleState, side: Side) -> Vec<String> {
        let enemy = side.other();
        state
            .living(enemy)
            .filter(|c| !StatusEffectManager::is_invisible(state, enemy, &c.name))
            .map(|c| c.name.clone())
            .collect()
    }

    /// Check a normal attack target chosen by `side`.
    pub fn validate_attack_target(
        state: &BattleState,
        side: Side,
        target: &str,
    ) -> Result<(), IntentError> {
        let enemy = side.other();
        let card = state
            .card(enemy, target)
            .ok_or_else(|| IntentError::UnknownCard(target.to_string()))?;

        if card.is_dead() {
            return Err(IntentError::InvalidTarget(target.to_string()));
        }
        if StatusEffectManager::is_invisible(state, enemy, target) {
            return Err(IntentError::TargetInvisible(target.to_string()));
        }
        Ok(())
    }

    /// Next target after the current one died.
    ///
    /// First visible living enemy in deck order, else the first living one.
    #[must_use]
    pub fn retarget(state: &BattleState, side: Side) -> Option<String> {
        let enemy = side.other();
        let mut living = state.living(enemy).peekable();
        let fallback = living.peek().map(|c| c.name.clone());

        living
            .find(|c| !StatusEffectManager::is_invisible(state, enemy, &c.name))
            .map(|c| c.name.clone())
            .or(fallback)
    }

    /// Legal targets of an ability cast by `side`.
    #[must_use]
    pub fn ability_targets(state: &BattleState, side: Side, kind: &AbilityKind) -> Vec<CardRef> {
        match kind.target() {
            AbilityTarget::Enemy => state
                .living(side.other())
                .map(|c| CardRef::new(side.other(), c.name.clone()))
                .collect(),
            AbilityTarget::DamagedAlly => state
                .living(side)
                .filter(|c| c.is_damaged())
                .map(|c| CardRef::new(side, c.name.clone()))
                .collect(),
            AbilityTarget::Ally => state
                .living(side)
                .map(|c| CardRef::new(side, c.name.clone()))
                .collect(),
        }
    }

    /// Resolve and check the target of an ability.
    ///
    /// Ally abilities without an explicit target fall back to the caster.
    pub fn validate_ability_target(
        state: &BattleState,
        side: Side,
        caster: &str,
        kind: &AbilityKind,
        target: Option<&str>,
    ) -> Result<CardRef, IntentError> {
        let target_side = match kind.target() {
            AbilityTarget::Enemy => side.other(),
            AbilityTarget::DamagedAlly | AbilityTarget::Ally => side,
        };
        let name = match (target, kind.target()) {
            (Some(name), _) => name,
            (None, AbilityTarget::Ally) => caster,
            (None, _) => return Err(IntentError::InvalidTarget(String::new())),
        };

        let card = state
            .card(target_side, name)
            .ok_or_else(|| IntentError::UnknownCard(name.to_string()))?;
        let legal = match kind.target() {
            AbilityTarget::DamagedAlly => card.is_damaged(),
            AbilityTarget::Enemy | AbilityTarget::Ally => card.is_alive(),
        };
        if !legal {
            return Err(IntentError::InvalidTarget(name.to_string()));
        }

        Ok(CardRef::new(target_side, name))
    }
}
