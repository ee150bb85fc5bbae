//! Render events: what the presentation layer animates.
//!
//! Events are transient. They describe what just happened (hits, casts,
//! runes, skips) and pacing hints, but the authoritative data is always
//! the `BattleState` carried by the frame.

use crate::core::{BattleState, CardRef, Side};
use crate::error::IntentError;
use crate::rules::BattleOutcome;
use crate::status::Rune;

use super::phase::TurnPhase;

/// Why an activation was skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Every living card is locked as last card, frozen or feared.
    NoEligibleCard,
    /// Every living enemy is invisible and no ability can be cast.
    NoTarget,
}

/// One animated effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EffectDescriptor {
    Hit {
        side: Side,
        attacker: String,
        target: String,
        damage: i32,
        crit: bool,
        blocked: bool,
        killed: bool,
    },
    Ability {
        side: Side,
        caster: String,
        ability: String,
        effect: &'static str,
        target: CardRef,
        amount: i32,
    },
    Rune {
        side: Side,
        rune: Rune,
        target: String,
        healed: i32,
    },
    /// A timed rune wore off.
    Expired { rune: Rune, target: CardRef },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderEvent {
    PhaseChanged(TurnPhase),
    TurnStarted {
        side: Side,
        round: u32,
        rune: Option<Rune>,
    },
    Effect(EffectDescriptor),
    /// Pacing hint; the engine never sleeps.
    Pause { millis: u64 },
    Skipped { side: Side, reason: SkipReason },
    RoundAdvanced { round: u32 },
    IntentRejected { intent: &'static str, error: IntentError },
    BattleEnded(BattleOutcome),
}

/// State plus the events since the last frame.
#[derive(Clone, Debug)]
pub struct RenderFrame {
    pub state: BattleState,
    pub phase: TurnPhase,
    pub events: Vec<RenderEvent>,
}

impl RenderFrame {
    /// Effect descriptors in this frame.
    pub fn effects(&self) -> impl Iterator<Item = &EffectDescriptor> {
        self.events.iter().filter_map(|e| match e {
            RenderEvent::Effect(effect) => Some(effect),
            _ => None,
        })
    }

    /// Total pacing requested by this frame.
    #[must_use]
    pub fn total_pause(&self) -> u64 {
        self.events
            .iter()
            .map(|e| match e {
                RenderEvent::Pause { millis } => *millis,
                _ => 0,
            })
            .sum()
    }
}
