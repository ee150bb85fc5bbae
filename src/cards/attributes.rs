//! Card stats and upgrades.
//!
//! A card's starting stats are its catalog base plus the fixed bonus of
//! every upgrade bought for it in the profile.

use serde::{Deserialize, Serialize};

/// A stat that upgrades can raise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Damage,
    Health,
    Defense,
    Speed,
}

impl Stat {
    /// Fixed bonus one upgrade adds to this stat.
    #[must_use]
    pub const fn upgrade_bonus(self) -> i32 {
        match self {
            Stat::Damage => 5,
            Stat::Health => 15,
            Stat::Defense => 3,
            Stat::Speed => 5,
        }
    }
}

/// One purchased upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Upgrade {
    pub stat: Stat,
}

impl Upgrade {
    #[must_use]
    pub const fn new(stat: Stat) -> Self {
        Self { stat }
    }

    #[must_use]
    pub const fn bonus(self) -> i32 {
        self.stat.upgrade_bonus()
    }
}

/// Base combat stats of a card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatBlock {
    pub damage: i32,
    pub health: i32,
    pub defense: i32,
    pub speed: i32,
}

impl StatBlock {
    #[must_use]
    pub const fn new(damage: i32, health: i32, defense: i32, speed: i32) -> Self {
        Self {
            damage,
            health,
            defense,
            speed,
        }
    }

    /// Get a single stat.
    #[must_use]
    pub const fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Damage => self.damage,
            Stat::Health => self.health,
            Stat::Defense => self.defense,
            Stat::Speed => self.speed,
        }
    }

    /// Stats after applying upgrades in order.
    #[must_use]
    pub fn with_upgrades(mut self, upgrades: &[Upgrade]) -> Self {
        for upgrade in upgrades {
            let bonus = upgrade.bonus();
            match upgrade.stat {
                Stat::Damage => self.damage += bonus,
                Stat::Health => self.health += bonus,
                Stat::Defense => self.defense += bonus,
                Stat::Speed => self.speed += bonus,
            }
        }
        self
    }

    /// Sum of all stats, a rough power rating used to rank cards.
    #[must_use]
    pub const fn total(&self) -> i32 {
        self.damage + self.health + self.defense + self.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upgrades_add_fixed_bonus() {
        let base = StatBlock::new(20, 100, 10, 12);
        let upgraded = base.with_upgrades(&[
            Upgrade::new(Stat::Damage),
            Upgrade::new(Stat::Damage),
            Upgrade::new(Stat::Health),
        ]);

        assert_eq!(upgraded.damage, 30);
        assert_eq!(upgraded.health, 115);
        assert_eq!(upgraded.defense, 10);
        assert_eq!(upgraded.get(Stat::Speed), 12);
    }

    #[test]
    fn test_no_upgrades() {
        let base = StatBlock::new(1, 2, 3, 4);
        assert_eq!(base.with_upgrades(&[]), base);
        assert_eq!(base.total(), 10);
    }

    #[test]
    fn test_upgrade_serialization() {
        let upgrade = Upgrade::new(Stat::Defense);
        let json = serde_json::to_string(&upgrade).unwrap();
        let deserialized: Upgrade = serde_json::from_str(&json).unwrap();
        assert_eq!(upgrade, deserialized);
    }
}
