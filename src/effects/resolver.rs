//! Combat resolution.
//!
//! ## Normal attacks
//!
//! An attack is `attacks_count()` sequential hits. Each hit rolls a crit
//! (`crit_chance`, damage x `crit_multiplier`) and then a block (chance =
//! target's effective defense, damage x `block_multiplier`). Damage is
//! floored and never negative. When the target dies, the next hit goes to
//! another living enemy; with none left the sequence stops.
//!
//! ## Abilities
//!
//! Exact-value transitions dispatched on `AbilityKind`. No crit, no block.

use smallvec::SmallVec;

use crate::cards::CardInstance;
use crate::core::{BattleConfig, BattleState, CardRef, GameRng, Side};
use crate::error::IntentError;
use crate::status::StatusEffectManager;

use super::ability::AbilityKind;
use super::targeting::TargetSelector;

/// Random outcome of one hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HitRolls {
    pub crit: bool,
    pub blocked: bool,
}

impl HitRolls {
    /// Neither crit nor block.
    pub const PLAIN: HitRolls = HitRolls {
        crit: false,
        blocked: false,
    };

    /// Roll crit, then block against `target`.
    pub fn roll(rng: &mut GameRng, target: &CardInstance, config: &BattleConfig) -> Self {
        let crit = rng.roll(config.crit_chance);
        let blocked = rng.roll_percent(target.effective_defense());
        Self { crit, blocked }
    }
}

/// One resolved hit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HitReport {
    pub target: String,
    pub damage: i32,
    pub crit: bool,
    pub blocked: bool,
    pub killed: bool,
    /// Target health after the hit.
    pub remaining: i32,
}

/// A resolved attack sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackOutcome {
    pub attacker: String,
    /// Hits the attacker was entitled to.
    pub attacks: u32,
    pub hits: SmallVec<[HitReport; 4]>,
}

impl AttackOutcome {
    #[must_use]
    pub fn total_damage(&self) -> i32 {
        self.hits.iter().map(|h| h.damage).sum()
    }

    /// Whether the sequence ran out of targets before using every hit.
    #[must_use]
    pub fn cut_short(&self) -> bool {
        (self.hits.len() as u32) < self.attacks
    }
}

/// A resolved ability cast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbilityOutcome {
    pub caster: String,
    pub ability: String,
    pub kind: AbilityKind,
    pub target: CardRef,
    /// Damage dealt, health restored or speed granted, depending on kind.
    pub amount: i32,
    pub killed: bool,
}

/// Resolves attacks and abilities on a `BattleState`.
pub struct CombatResolver;

impl CombatResolver {
    /// Damage of one hit after crit and block.
    #[must_use]
    pub fn hit_damage(base: i32, rolls: HitRolls, config: &BattleConfig) -> i32 {
        let mut damage = f64::from(base.max(0));
        if rolls.crit {
            damage *= config.crit_multiplier;
        }
        if rolls.blocked {
            damage *= config.block_multiplier;
        }
        damage.floor().max(0.0) as i32
    }

    /// Apply one hit to `target`.
    pub fn resolve_hit(
        base_damage: i32,
        target: &mut CardInstance,
        rolls: HitRolls,
        config: &BattleConfig,
    ) -> HitReport {
        let damage = Self::hit_damage(base_damage, rolls, config);
        let was_alive = target.is_alive();
        let dealt = target.take_damage(damage);

        HitReport {
            target: target.name.clone(),
            damage: dealt,
            crit: rolls.crit,
            blocked: rolls.blocked,
            killed: was_alive && target.is_dead(),
            remaining: target.health(),
        }
    }

    /// Resolve `attacker`'s full attack sequence, rolling with `rng`.
    pub fn resolve_attack(
        state: &mut BattleState,
        side: Side,
        attacker: &str,
        target: &str,
        rng: &mut GameRng,
        config: &BattleConfig,
    ) -> Result<AttackOutcome, IntentError> {
        Self::resolve_attack_with(state, side, attacker, target, config, |card| {
            HitRolls::roll(rng, card, config)
        })
    }

    /// Resolve an attack sequence with caller-supplied rolls.
    pub fn resolve_attack_with(
        state: &mut BattleState,
        side: Side,
        attacker: &str,
        target: &str,
        config: &BattleConfig,
        mut roll: impl FnMut(&CardInstance) -> HitRolls,
    ) -> Result<AttackOutcome, IntentError> {
        let (damage, attacks) = {
            let card = state
                .card(side, attacker)
                .ok_or_else(|| IntentError::UnknownCard(attacker.to_string()))?;
            (card.damage, card.attacks_count())
        };

        let mut hits = SmallVec::new();
        let mut current = target.to_string();

        for _ in 0..attacks {
            let alive = state.card(side.other(), &current).is_some_and(CardInstance::is_alive);
            if !alive {
                match TargetSelector::retarget(state, side) {
                    Some(next) => current = next,
                    None => break,
                }
            }

            let Some(card) = state.card_mut(side.other(), &current) else {
                break;
            };
            let rolls = roll(&*card);
            let report = Self::resolve_hit(damage, card, rolls, config);
            log::debug!(
                "{} hits {} for {} (crit: {}, blocked: {})",
                attacker,
                report.target,
                report.damage,
                report.crit,
                report.blocked
            );
            hits.push(report);
        }

        // Haste lasts until the end of the card's next attack sequence.
        if let Some(card) = state.card_mut(side, attacker) {
            card.temp_speed = 0;
        }

        Ok(AttackOutcome {
            attacker: attacker.to_string(),
            attacks,
            hits,
        })
    }

    /// Cast `caster`'s ability on an already validated target.
    pub fn resolve_ability(
        state: &mut BattleState,
        side: Side,
        caster: &str,
        target: CardRef,
        config: &BattleConfig,
    ) -> Result<AbilityOutcome, IntentError> {
        let ability = state
            .card(side, caster)
            .ok_or_else(|| IntentError::UnknownCard(caster.to_string()))?
            .ability
            .clone()
            .ok_or_else(|| IntentError::NoAbility(caster.to_string()))?;

        let mut amount = 0;
        let mut killed = false;

        match ability.kind {
            AbilityKind::Strike { damage } => {
                if let Some(card) = state.card_mut(target.side, &target.name) {
                    amount = card.take_damage(damage);
                    killed = card.is_dead();
                }
            }
            AbilityKind::Heal { amount: heal } => {
                if let Some(card) = state.card_mut(target.side, &target.name) {
                    amount = card.heal(heal);
                }
            }
            AbilityKind::SwapHealth => {
                let (own, enemy) = state.decks_mut(side);
                let caster_card = own.iter_mut().find(|c| c.name == caster);
                let target_card = enemy.iter_mut().find(|c| c.name == target.name);
                if let (Some(caster_card), Some(target_card)) = (caster_card, target_card) {
                    let caster_health = caster_card.health();
                    let target_health = target_card.health();
                    caster_card.set_health(target_health);
                    target_card.set_health(caster_health);
                    amount = target_card.health() - target_health;
                    killed = target_card.is_dead();
                }
            }
            AbilityKind::Freeze => StatusEffectManager::freeze(state, target.clone()),
            AbilityKind::Fear => StatusEffectManager::fear(state, target.clone()),
            AbilityKind::Haste { amount: bonus } => {
                if let Some(card) = state.card_mut(target.side, &target.name) {
                    card.temp_speed += bonus;
                    amount = bonus;
                }
            }
        }

        if let Some(card) = state.card_mut(side, caster) {
            card.ability_cooldown = config.ability_cooldown;
        }

        log::debug!("{} casts {} on {}", caster, ability.name, target);
        Ok(AbilityOutcome {
            caster: caster.to_string(),
            ability: ability.name,
            kind: ability.kind,
            target,
            amount,
            killed,
        })
    }
}
