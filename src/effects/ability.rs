//! Ability definitions.
//!
//! Abilities are exact-value state transitions. They never go through the
//! crit/block rolls of a normal attack. The catalog attaches an
//! `AbilityDef` to epic and legendary cards; the resolver dispatches on
//! `AbilityKind` alone.

use serde::{Deserialize, Serialize};

/// What an ability does when cast.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Fixed damage to one enemy.
    Strike { damage: i32 },
    /// Fixed heal on one damaged ally, clamped to its max health.
    Heal { amount: i32 },
    /// Caster and one enemy exchange current health.
    SwapHealth,
    /// The enemy skips its side's next activation.
    Freeze,
    /// The enemy skips its side's next activation (separate status from freeze).
    Fear,
    /// Bonus speed on an ally (or the caster) until its next attack sequence ends.
    Haste { amount: i32 },
}

/// Legal target set of an ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbilityTarget {
    /// A living enemy card.
    Enemy,
    /// A living own card below max health.
    DamagedAlly,
    /// Any living own card, the caster included.
    Ally,
}

impl AbilityKind {
    /// Target rule for this ability.
    #[must_use]
    pub fn target(&self) -> AbilityTarget {
        match self {
            AbilityKind::Strike { .. }
            | AbilityKind::SwapHealth
            | AbilityKind::Freeze
            | AbilityKind::Fear => AbilityTarget::Enemy,
            AbilityKind::Heal { .. } => AbilityTarget::DamagedAlly,
            AbilityKind::Haste { .. } => AbilityTarget::Ally,
        }
    }

    /// Effect label for render events and logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            AbilityKind::Strike { .. } => "strike",
            AbilityKind::Heal { .. } => "heal",
            AbilityKind::SwapHealth => "swap-health",
            AbilityKind::Freeze => "freeze",
            AbilityKind::Fear => "fear",
            AbilityKind::Haste { .. } => "haste",
        }
    }
}

/// An ability as listed in the card catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityDef {
    pub name: String,
    /// Cooldown shown on the ability icon.
    pub cooldown_total: u32,
    pub description: String,
    pub kind: AbilityKind,
}

impl AbilityDef {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: AbilityKind) -> Self {
        Self {
            name: name.into(),
            cooldown_total: 2,
            description: String::new(),
            kind,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
