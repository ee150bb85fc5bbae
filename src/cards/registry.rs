//! Card catalog lookup.
//!
//! The battle engine only ever reads the catalog at deck-construction time
//! (and when re-deriving ability metadata after a reload). `CardCatalog`
//! is the seam; `CardRegistry` is the in-process implementation.

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, Rarity};
use crate::effects::{AbilityDef, AbilityKind};

/// Read-only card catalog.
pub trait CardCatalog {
    /// Look up a card by name.
    fn get_card(&self, name: &str) -> Option<&CardDefinition>;

    /// All card names, sorted.
    fn card_names(&self) -> Vec<String>;
}

/// In-memory catalog keyed by card name.
///
/// ## Example
///
/// ```
/// use card_duel::cards::{CardCatalog, CardDefinition, CardRegistry, Rarity};
///
/// let mut registry = CardRegistry::new();
/// registry.register(CardDefinition::new("Footman", Rarity::Common).with_stats(20, 100, 10, 12));
///
/// let found = registry.get_card("Footman").unwrap();
/// assert_eq!(found.stats.damage, 20);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<String, CardDefinition>,
}

impl CardRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same name already exists.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.name) {
            panic!("Card `{}` already registered", card.name);
        }
        self.cards.insert(card.name.clone(), card);
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.cards.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// Find cards by rarity.
    pub fn find_by_rarity(&self, rarity: Rarity) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values().filter(move |c| c.rarity == rarity)
    }

    /// The catalog shipped with the game.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();

        registry.register(CardDefinition::new("Footman", Rarity::Common).with_stats(20, 100, 10, 12));
        registry.register(CardDefinition::new("Archer", Rarity::Common).with_stats(25, 80, 5, 22));
        registry.register(CardDefinition::new("Squire", Rarity::Common).with_stats(15, 120, 15, 10));

        registry.register(CardDefinition::new("Knight", Rarity::Rare).with_stats(30, 130, 20, 12));
        registry.register(CardDefinition::new("Ranger", Rarity::Rare).with_stats(28, 90, 8, 25));
        registry.register(CardDefinition::new("Acolyte", Rarity::Rare).with_stats(18, 100, 10, 15));

        registry.register(
            CardDefinition::new("Frost Mage", Rarity::Epic)
                .with_stats(22, 90, 5, 15)
                .with_ability(
                    AbilityDef::new("Frost Nova", AbilityKind::Freeze)
                        .with_description("Freezes an enemy; it cannot act on its next turn."),
                ),
        );
        registry.register(
            CardDefinition::new("Butcher", Rarity::Epic)
                .with_stats(35, 150, 10, 8)
                .with_ability(
                    AbilityDef::new("Meat Hook", AbilityKind::Strike { damage: 45 })
                        .with_description("Deals 45 damage to an enemy, ignoring defense."),
                ),
        );
        registry.register(
            CardDefinition::new("Cleric", Rarity::Epic)
                .with_stats(15, 110, 12, 12)
                .with_ability(
                    AbilityDef::new("Mend", AbilityKind::Heal { amount: 40 })
                        .with_description("Restores 40 health to a wounded ally."),
                ),
        );
        registry.register(
            CardDefinition::new("Wraith", Rarity::Epic)
                .with_stats(30, 85, 5, 24)
                .with_ability(
                    AbilityDef::new("Dread", AbilityKind::Fear)
                        .with_description("Terrifies an enemy; it cannot act on its next turn."),
                ),
        );

        registry.register(
            CardDefinition::new("Soul Thief", Rarity::Legendary)
                .with_stats(32, 120, 10, 14)
                .with_ability(
                    AbilityDef::new("Soul Swap", AbilityKind::SwapHealth)
                        .with_description("Exchanges current health with an enemy."),
                ),
        );
        registry.register(
            CardDefinition::new("Windrunner", Rarity::Legendary)
                .with_stats(30, 100, 10, 20)
                .with_ability(
                    AbilityDef::new("Tailwind", AbilityKind::Haste { amount: 15 })
                        .with_description("Grants an ally 15 speed for its next attack."),
                ),
        );
        registry.register(
            CardDefinition::new("Dragon", Rarity::Legendary)
                .with_stats(45, 180, 15, 10)
                .with_ability(
                    AbilityDef::new("Dragon Breath", AbilityKind::Strike { damage: 60 })
                        .with_description("Deals 60 damage to an enemy, ignoring defense."),
                ),
        );

        registry
    }
}

impl CardCatalog for CardRegistry {
    fn get_card(&self, name: &str) -> Option<&CardDefinition> {
        self.cards.get(name)
    }

    fn card_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.cards.keys().cloned().collect();
        names.sort();
        names
    }
}
