//! Card instances - combat-ready card state.
//!
//! `CardInstance` is built once per battle from a catalog definition plus
//! the profile's upgrades, then mutated by combat. Health is private so the
//! liveness invariant holds everywhere:
//!
//! - `0 <= health <= max_health`
//! - `is_dead() == (health == 0)`

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::attributes::{StatBlock, Upgrade};
use super::definition::CardDefinition;
use crate::effects::AbilityDef;
use crate::error::DeckError;

/// A card on the battlefield.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInstance {
    /// Card name, unique within its deck.
    pub name: String,

    pub damage: i32,

    health: i32,

    max_health: i32,

    /// Percent chance to block a normal hit.
    pub defense: i32,

    /// Every 10 points of speed is one hit per attack (minimum one).
    pub speed: i32,

    /// Upgrades applied at construction, in purchase order.
    pub upgrades: SmallVec<[Upgrade; 3]>,

    /// Volatile defense bonus (shield rune).
    pub temp_defense: i32,

    /// Volatile speed bonus (haste), cleared after the card's next attack sequence.
    pub temp_speed: i32,

    /// Ability metadata, re-derived from the catalog after a reload.
    #[serde(skip)]
    pub ability: Option<AbilityDef>,

    /// Own turns until the ability can be cast again.
    pub ability_cooldown: u32,

    is_dead: bool,
}

impl CardInstance {
    /// Create an instance with the given stats and full health.
    #[must_use]
    pub fn new(name: impl Into<String>, stats: StatBlock) -> Self {
        let max_health = stats.health.max(1);
        Self {
            name: name.into(),
            damage: stats.damage,
            health: max_health,
            max_health,
            defense: stats.defense,
            speed: stats.speed,
            upgrades: SmallVec::new(),
            temp_defense: 0,
            temp_speed: 0,
            ability: None,
            ability_cooldown: 0,
            is_dead: false,
        }
    }

    /// Build from a catalog definition and the profile's upgrades.
    pub fn from_definition(
        def: &CardDefinition,
        upgrades: &[Upgrade],
        max_upgrades: usize,
    ) -> Result<Self, DeckError> {
        if upgrades.len() > max_upgrades {
            return Err(DeckError::TooManyUpgrades {
                card: def.name.clone(),
                count: upgrades.len(),
                max: max_upgrades,
            });
        }

        let mut card = Self::new(def.name.clone(), def.stats.with_upgrades(upgrades));
        card.upgrades = SmallVec::from_slice(upgrades);
        card.ability = def.ability().cloned();
        Ok(card)
    }

    /// Attach an ability (builder pattern).
    #[must_use]
    pub fn with_ability(mut self, ability: AbilityDef) -> Self {
        self.ability = Some(ability);
        self
    }

    // === Health ===

    #[must_use]
    pub fn health(&self) -> i32 {
        self.health
    }

    #[must_use]
    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.is_dead
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }

    #[must_use]
    pub fn is_damaged(&self) -> bool {
        self.is_alive() && self.health < self.max_health
    }

    /// Set health, clamped to `[0, max_health]`.
    pub fn set_health(&mut self, health: i32) {
        self.health = health.clamp(0, self.max_health);
        self.is_dead = self.health == 0;
    }

    /// Set max health (at least 1), clamping current health under it.
    pub fn set_max_health(&mut self, max_health: i32) {
        self.max_health = max_health.max(1);
        self.set_health(self.health);
    }

    /// Subtract health. Returns the health actually lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.set_health(before - amount.max(0));
        before - self.health
    }

    /// Restore health on a living card. Returns the health actually gained.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if self.is_dead {
            return 0;
        }
        let before = self.health;
        self.set_health(before + amount.max(0));
        self.health - before
    }

    // === Combat stats ===

    /// Block chance in percent, including temporary bonuses.
    #[must_use]
    pub fn effective_defense(&self) -> i32 {
        (self.defense + self.temp_defense).clamp(0, 100)
    }

    #[must_use]
    pub fn effective_speed(&self) -> i32 {
        self.speed + self.temp_speed
    }

    /// Hits per attack: `max(1, floor(speed / 10))`.
    #[must_use]
    pub fn attacks_count(&self) -> u32 {
        (self.effective_speed() / 10).max(1) as u32
    }

    // === Ability ===

    /// Living, has an ability, and the cooldown has run out.
    #[must_use]
    pub fn can_cast(&self) -> bool {
        self.is_alive() && self.ability.is_some() && self.ability_cooldown == 0
    }

    /// Reduce the cooldown by one own turn.
    pub fn tick_cooldown(&mut self) {
        self.ability_cooldown = self.ability_cooldown.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rarity, Stat};
    use crate::effects::AbilityKind;

    fn card(health: i32) -> CardInstance {
        CardInstance::new("Test", StatBlock::new(10, health, 0, 10))
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut c = card(40);
        let lost = c.take_damage(50);

        assert_eq!(lost, 40);
        assert_eq!(c.health(), 0);
        assert!(c.is_dead());
    }

    #[test]
    fn test_heal_clamps_at_max() {
        let mut c = card(100);
        c.take_damage(30);
        assert!(c.is_damaged());

        let gained = c.heal(50);
        assert_eq!(gained, 30);
        assert_eq!(c.health(), 100);
        assert!(!c.is_damaged());
    }

    #[test]
    fn test_dead_cards_stay_dead_on_heal() {
        let mut c = card(10);
        c.take_damage(10);
        assert_eq!(c.heal(20), 0);
        assert!(c.is_dead());
    }

    #[test]
    fn test_set_max_health_clamps() {
        let mut c = card(100);
        c.set_max_health(60);
        assert_eq!(c.health(), 60);
        assert_eq!(c.max_health(), 60);
    }

    #[test]
    fn test_attacks_count() {
        let mut c = CardInstance::new("Fast", StatBlock::new(10, 10, 0, 25));
        assert_eq!(c.attacks_count(), 2);

        c.speed = 5;
        assert_eq!(c.attacks_count(), 1);

        c.temp_speed = 30;
        assert_eq!(c.attacks_count(), 3);

        c.speed = -50;
        c.temp_speed = 0;
        assert_eq!(c.attacks_count(), 1);
    }

    #[test]
    fn test_effective_defense_clamped() {
        let mut c = CardInstance::new("Wall", StatBlock::new(1, 10, 80, 10));
        c.temp_defense = 40;
        assert_eq!(c.effective_defense(), 100);
    }

    #[test]
    fn test_from_definition_applies_upgrades() {
        let def = CardDefinition::new("Cleric", Rarity::Epic)
            .with_stats(15, 110, 12, 12)
            .with_ability(AbilityDef::new("Mend", AbilityKind::Heal { amount: 40 }));

        let card = CardInstance::from_definition(
            &def,
            &[Upgrade::new(Stat::Health), Upgrade::new(Stat::Speed)],
            3,
        )
        .unwrap();

        assert_eq!(card.max_health(), 125);
        assert_eq!(card.health(), 125);
        assert_eq!(card.speed, 17);
        assert_eq!(card.upgrades.len(), 2);
        assert!(card.can_cast());
    }

    #[test]
    fn test_from_definition_rejects_too_many_upgrades() {
        let def = CardDefinition::new("Footman", Rarity::Common).with_stats(20, 100, 10, 12);
        let upgrades = [Upgrade::new(Stat::Damage); 4];

        let err = CardInstance::from_definition(&def, &upgrades, 3).unwrap_err();
        assert!(matches!(err, DeckError::TooManyUpgrades { count: 4, max: 3, .. }));
    }

    #[test]
    fn test_cooldown_ticks_to_zero() {
        let mut c = card(10).with_ability(AbilityDef::new("Bash", AbilityKind::Strike { damage: 5 }));
        c.ability_cooldown = 2;
        assert!(!c.can_cast());

        c.tick_cooldown();
        c.tick_cooldown();
        c.tick_cooldown();
        assert_eq!(c.ability_cooldown, 0);
        assert!(c.can_cast());
    }

    #[test]
    fn test_serialization_drops_ability_metadata() {
        let mut c = card(50).with_ability(AbilityDef::new("Bash", AbilityKind::Strike { damage: 5 }));
        c.ability_cooldown = 1;
        c.take_damage(20);

        let bytes = bincode::serialize(&c).unwrap();
        let restored: CardInstance = bincode::deserialize(&bytes).unwrap();

        assert_eq!(restored.health(), 30);
        assert_eq!(restored.ability_cooldown, 1);
        assert!(restored.ability.is_none());
    }
}
