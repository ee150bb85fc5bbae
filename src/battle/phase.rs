//! Turn phases of the battle state machine.
//!
//! ```text
//! PlayerSelecting -> PlayerTargeting -> ResolvingAttacks -> OpponentTurn
//!        ^                                                      |
//!        +-------------------- RoundAdvance <-------------------+
//! ```
//!
//! `BattleEnded` is terminal. `RoundAdvance` and `ResolvingAttacks` are
//! transient: they show up in render events but never wait for input.

use serde::{Deserialize, Serialize};

use crate::rules::BattleOutcome;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Local side picks an attacker, an ability or a rune.
    PlayerSelecting,
    /// Local side picked `attacker` and now picks a target.
    PlayerTargeting { attacker: String },
    /// An attack sequence or ability is resolving.
    ResolvingAttacks,
    /// The other side is acting (scripted bot or remote peer).
    OpponentTurn,
    /// Per-round timers are ticking.
    RoundAdvance,
    BattleEnded(BattleOutcome),
}

impl TurnPhase {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            TurnPhase::PlayerSelecting => "selecting",
            TurnPhase::PlayerTargeting { .. } => "targeting",
            TurnPhase::ResolvingAttacks => "resolving",
            TurnPhase::OpponentTurn => "waiting for the opponent",
            TurnPhase::RoundAdvance => "advancing the round",
            TurnPhase::BattleEnded(_) => "ended",
        }
    }

    /// Whether the local side may submit actions.
    #[must_use]
    pub fn accepts_input(&self) -> bool {
        matches!(
            self,
            TurnPhase::PlayerSelecting | TurnPhase::PlayerTargeting { .. }
        )
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnPhase::BattleEnded(_))
    }

    #[must_use]
    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self {
            TurnPhase::BattleEnded(outcome) => Some(*outcome),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Side;

    #[test]
    fn test_input_phases() {
        assert!(TurnPhase::PlayerSelecting.accepts_input());
        assert!(TurnPhase::PlayerTargeting {
            attacker: "Knight".into()
        }
        .accepts_input());
        assert!(!TurnPhase::OpponentTurn.accepts_input());
        assert!(!TurnPhase::ResolvingAttacks.accepts_input());
    }

    #[test]
    fn test_terminal() {
        let ended = TurnPhase::BattleEnded(BattleOutcome::Winner(Side::Player));
        assert!(ended.is_terminal());
        assert_eq!(ended.outcome(), Some(BattleOutcome::Winner(Side::Player)));
        assert_eq!(TurnPhase::PlayerSelecting.outcome(), None);
    }
}
