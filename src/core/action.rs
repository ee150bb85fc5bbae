//! Intents from the presentation layer and the battle log.
//!
//! An `Intent` is what the user asked for; the engine decides whether it is
//! legal. An `ActionRecord` is what actually happened, appended to the
//! battle log shown next to the board.

use serde::{Deserialize, Serialize};

use super::side::Side;
use crate::status::Rune;

/// A user request forwarded by the presentation layer.
///
/// ## Example
///
/// ```
/// use card_duel::core::Intent;
///
/// let pick = Intent::SelectAttacker("Knight".into());
/// let hit = Intent::SelectTarget("Archer".into());
/// assert_eq!(pick.label(), "select attacker");
/// assert_eq!(hit.label(), "select target");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Choose which own card attacks this turn.
    SelectAttacker(String),
    /// Choose the enemy card the selected attacker hits first.
    SelectTarget(String),
    /// Cast the caster's ability, with a target when the ability needs one.
    UseAbility { caster: String, target: Option<String> },
    /// Spend this turn's rune on an own card.
    UseRune(String),
    /// Re-emit the current state (after a reload).
    Resume,
    /// Give up the battle.
    Abandon,
}

impl Intent {
    /// Short label used in errors and logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Intent::SelectAttacker(_) => "select attacker",
            Intent::SelectTarget(_) => "select target",
            Intent::UseAbility { .. } => "use ability",
            Intent::UseRune(_) => "use rune",
            Intent::Resume => "resume",
            Intent::Abandon => "abandon",
        }
    }
}

/// What a side did during one action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    /// Normal attack sequence; `damage` is the total dealt over all hits.
    Attack {
        attacker: String,
        target: String,
        hits: u32,
        damage: i32,
    },
    /// Ability cast.
    Ability {
        caster: String,
        ability: String,
        target: Option<String>,
    },
    /// Rune used on an own card.
    Rune { rune: Rune, target: String },
    /// No eligible card; the activation was skipped.
    Skip,
}

/// One entry of the battle log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub side: Side,
    pub round: u32,
    /// Ordering within the battle.
    pub sequence: u32,
    pub kind: ActionKind,
}

impl ActionRecord {
    #[must_use]
    pub fn new(side: Side, round: u32, sequence: u32, kind: ActionKind) -> Self {
        Self {
            side,
            round,
            sequence,
            kind,
        }
    }
}
