//! Card definitions - static catalog data.
//!
//! `CardDefinition` holds the immutable properties of a card: base stats,
//! rarity and, for the top rarities, an ability. Per-battle data (current
//! health, cooldowns, temporary bonuses) lives in `CardInstance`.

use serde::{Deserialize, Serialize};

use super::attributes::StatBlock;
use crate::effects::AbilityDef;

/// Card rarity tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Only epic and legendary cards carry an ability.
    #[must_use]
    pub const fn carries_ability(self) -> bool {
        matches!(self, Rarity::Epic | Rarity::Legendary)
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use card_duel::cards::{CardDefinition, Rarity};
/// use card_duel::effects::{AbilityDef, AbilityKind};
///
/// let mage = CardDefinition::new("Frost Mage", Rarity::Epic)
///     .with_stats(22, 90, 5, 15)
///     .with_ability(AbilityDef::new("Frost Nova", AbilityKind::Freeze));
///
/// assert_eq!(mage.stats.health, 90);
/// assert!(mage.ability().is_some());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Card name, unique in the catalog.
    pub name: String,

    pub rarity: Rarity,

    pub stats: StatBlock,

    /// Ability as listed; see [`CardDefinition::ability`].
    ability: Option<AbilityDef>,
}

impl CardDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, rarity: Rarity) -> Self {
        Self {
            name: name.into(),
            rarity,
            stats: StatBlock::default(),
            ability: None,
        }
    }

    /// Set base stats (builder pattern).
    #[must_use]
    pub fn with_stats(mut self, damage: i32, health: i32, defense: i32, speed: i32) -> Self {
        self.stats = StatBlock::new(damage, health, defense, speed);
        self
    }

    /// Attach an ability (builder pattern).
    #[must_use]
    pub fn with_ability(mut self, ability: AbilityDef) -> Self {
        self.ability = Some(ability);
        self
    }

    /// The card's ability, if its rarity allows one.
    ///
    /// Abilities listed on common or rare cards are ignored.
    #[must_use]
    pub fn ability(&self) -> Option<&AbilityDef> {
        self.ability.as_ref().filter(|_| self.rarity.carries_ability())
    }
}
