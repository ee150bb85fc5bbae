//! Scripted opponent for local battles.
//!
//! ## Turn plan
//!
//! 1. Rune: heal the most wounded card, shield or hide the weakest one
//! 2. Ability: the first eligible caster whose ability has a target
//! 3. Attack: strongest eligible card into the weakest visible enemy
//!
//! ## Deck generation
//!
//! `DifficultyProfile` feeds deck generation. `Tutorial` (a player's first
//! battle) gets a weakened deck of common cards.

use serde::{Deserialize, Serialize};

use crate::cards::{build_cards, CardCatalog, CardInstance, Rarity};
use crate::core::{BattleConfig, BattleState, GameRng, Side};
use crate::effects::{AbilityKind, AbilityTarget, TargetSelector};
use crate::error::DeckError;
use crate::rules::BattleRules;
use crate::status::{Rune, StatusEffectManager};

/// Strength of the generated bot deck.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifficultyProfile {
    /// Random catalog cards at base stats.
    #[default]
    Standard,
    /// Weak common cards at half damage and health.
    Tutorial,
}

impl DifficultyProfile {
    /// `Tutorial` for a player's first battle, `Standard` afterwards.
    #[must_use]
    pub fn for_battles_played(played: u32) -> Self {
        if played == 0 {
            DifficultyProfile::Tutorial
        } else {
            DifficultyProfile::Standard
        }
    }
}

/// Generate the bot's deck.
pub fn generate_bot_deck(
    catalog: &impl CardCatalog,
    profile: DifficultyProfile,
    rng: &mut GameRng,
    config: &BattleConfig,
) -> Result<Vec<CardInstance>, DeckError> {
    let mut names = catalog.card_names();

    let deck = match profile {
        DifficultyProfile::Standard => {
            rng.shuffle(&mut names);
            names.truncate(config.deck_size);
            build_cards(catalog, &names, |_| Vec::new(), config)?
        }
        DifficultyProfile::Tutorial => {
            names.retain(|n| {
                catalog
                    .get_card(n)
                    .is_some_and(|c| c.rarity == Rarity::Common)
            });
            names.sort_by_key(|n| catalog.get_card(n).map_or(0, |c| c.stats.total()));
            names.truncate(config.deck_size);

            let mut deck = build_cards(catalog, &names, |_| Vec::new(), config)?;
            for card in &mut deck {
                card.damage = (card.damage / 2).max(1);
                card.set_max_health(card.max_health() / 2);
                card.set_health(card.max_health());
            }
            deck
        }
    };

    log::debug!("generated {:?} bot deck {:?}", profile, names);
    Ok(deck)
}

/// What the bot does with its activation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BotAction {
    Attack { attacker: String, target: String },
    Ability { caster: String, target: Option<String> },
}

/// A full bot turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BotPlan {
    /// Own card to spend the rune on.
    pub rune_target: Option<String>,
    /// `None` when nothing can act.
    pub action: Option<BotAction>,
}

/// Deterministic scripted opponent.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScriptedBot;

impl ScriptedBot {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Own card to use `rune` on, if any is worth it.
    #[must_use]
    pub fn choose_rune_target(&self, state: &BattleState, side: Side, rune: Rune) -> Option<String> {
        let weakest = |keep: &dyn Fn(&CardInstance) -> bool| {
            state
                .living(side)
                .filter(|c| keep(*c))
                .min_by_key(|c| c.health())
                .map(|c| c.name.clone())
        };

        match rune {
            Rune::Heal => weakest(&|c| c.is_damaged()),
            Rune::Shield => weakest(&|c| !StatusEffectManager::is_shielded(state, side, &c.name)),
            Rune::Invisibility => {
                weakest(&|c| !StatusEffectManager::is_invisible(state, side, &c.name))
            }
        }
    }

    /// Ability cast or attack for this activation.
    #[must_use]
    pub fn choose_action(&self, state: &BattleState, side: Side) -> Option<BotAction> {
        let eligible = BattleRules::eligible_attackers(state, side);

        for caster in &eligible {
            if BattleRules::check_caster(state, side, caster).is_err() {
                continue;
            }
            let Some(kind) = state
                .card(side, caster)
                .and_then(|c| c.ability.as_ref())
                .map(|a| a.kind.clone())
            else {
                continue;
            };
            if let Some(target) = self.ability_target(state, side, caster, &kind) {
                return Some(BotAction::Ability {
                    caster: caster.clone(),
                    target: Some(target),
                });
            }
        }

        let targets = TargetSelector::attack_targets(state, side);
        let target = targets
            .iter()
            .filter_map(|n| state.card(side.other(), n))
            .min_by_key(|c| c.health())?;

        let attacker = eligible
            .iter()
            .filter_map(|n| state.card(side, n))
            .max_by_key(|c| (c.damage * c.attacks_count() as i32, std::cmp::Reverse(c.name.clone())))?;

        Some(BotAction::Attack {
            attacker: attacker.name.clone(),
            target: target.name.clone(),
        })
    }

    /// Rune and action for a whole turn.
    #[must_use]
    pub fn plan(&self, state: &BattleState, side: Side) -> BotPlan {
        let rune_target = state
            .rune(side)
            .filter(|_| !state.rune_used_this_turn)
            .and_then(|rune| self.choose_rune_target(state, side, rune));

        BotPlan {
            rune_target,
            action: self.choose_action(state, side),
        }
    }

    fn ability_target(
        &self,
        state: &BattleState,
        side: Side,
        caster: &str,
        kind: &AbilityKind,
    ) -> Option<String> {
        match kind.target() {
            AbilityTarget::Enemy => state
                .living(side.other())
                .min_by_key(|c| c.health())
                .map(|c| c.name.clone()),
            AbilityTarget::DamagedAlly => state
                .living(side)
                .filter(|c| c.is_damaged())
                .min_by_key(|c| c.health())
                .map(|c| c.name.clone()),
            AbilityTarget::Ally => Some(caster.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardRegistry, StatBlock};
    use crate::core::CardRef;
    use crate::effects::AbilityDef;

    fn card(name: &str, damage: i32, health: i32, speed: i32) -> CardInstance {
        CardInstance::new(name, StatBlock::new(damage, health, 0, speed))
    }

    fn state() -> BattleState {
        BattleState::new(
            vec![card("A", 20, 100, 10), card("B", 20, 60, 10), card("C", 20, 80, 10)],
            vec![card("X", 10, 100, 10), card("Y", 40, 100, 10), card("Z", 20, 100, 20)],
        )
    }

    #[test]
    fn test_attacks_weakest_visible_with_strongest() {
        let mut s = state();
        s.invisible_cards.insert(CardRef::new(Side::Player, "B"));

        let action = ScriptedBot::new().choose_action(&s, Side::Opponent);

        assert_eq!(
            action,
            Some(BotAction::Attack {
                attacker: "Y".into(),
                target: "C".into()
            })
        );
    }

    #[test]
    fn test_respects_last_card_lock() {
        let mut s = state();
        s.last_opponent_card = Some("Y".into());

        let action = ScriptedBot::new().choose_action(&s, Side::Opponent);
        assert!(matches!(action, Some(BotAction::Attack { attacker, .. }) if attacker == "Z"));
    }

    #[test]
    fn test_prefers_ability() {
        let mut s = state();
        s.card_mut(Side::Opponent, "X").unwrap().ability =
            Some(AbilityDef::new("Frost Nova", AbilityKind::Freeze));

        let action = ScriptedBot::new().choose_action(&s, Side::Opponent);
        assert_eq!(
            action,
            Some(BotAction::Ability {
                caster: "X".into(),
                target: Some("B".into())
            })
        );

        s.card_mut(Side::Opponent, "X").unwrap().ability_cooldown = 1;
        let action = ScriptedBot::new().choose_action(&s, Side::Opponent);
        assert!(matches!(action, Some(BotAction::Attack { .. })));
    }

    #[test]
    fn test_rune_targets() {
        let mut s = state();
        let bot = ScriptedBot::new();

        assert_eq!(bot.choose_rune_target(&s, Side::Opponent, Rune::Heal), None);
        s.card_mut(Side::Opponent, "Z").unwrap().take_damage(30);
        assert_eq!(
            bot.choose_rune_target(&s, Side::Opponent, Rune::Heal).as_deref(),
            Some("Z")
        );
        assert_eq!(
            bot.choose_rune_target(&s, Side::Opponent, Rune::Shield).as_deref(),
            Some("Z")
        );
    }

    #[test]
    fn test_no_action_when_all_enemies_hidden() {
        let mut s = state();
        for name in ["A", "B", "C"] {
            s.invisible_cards.insert(CardRef::new(Side::Player, name));
        }
        assert_eq!(ScriptedBot::new().choose_action(&s, Side::Opponent), None);
    }

    #[test]
    fn test_standard_deck() {
        let catalog = CardRegistry::standard();
        let mut rng = GameRng::new(5);
        let config = BattleConfig::default();

        let deck = generate_bot_deck(&catalog, DifficultyProfile::Standard, &mut rng, &config).unwrap();
        assert_eq!(deck.len(), 3);

        let mut rng = GameRng::new(5);
        let again = generate_bot_deck(&catalog, DifficultyProfile::Standard, &mut rng, &config).unwrap();
        assert_eq!(deck, again);
    }

    #[test]
    fn test_tutorial_deck_is_weakened() {
        let catalog = CardRegistry::standard();
        let mut rng = GameRng::new(5);

        let deck = generate_bot_deck(
            &catalog,
            DifficultyProfile::Tutorial,
            &mut rng,
            &BattleConfig::default(),
        )
        .unwrap();

        assert_eq!(deck.len(), 3);
        for card in &deck {
            let def = catalog.get_card(&card.name).unwrap();
            assert_eq!(def.rarity, Rarity::Common);
            assert!(card.max_health() < def.stats.health);
            assert_eq!(card.health(), card.max_health());
        }
    }

    #[test]
    fn test_first_battle_is_tutorial() {
        assert_eq!(DifficultyProfile::for_battles_played(0), DifficultyProfile::Tutorial);
        assert_eq!(DifficultyProfile::for_battles_played(3), DifficultyProfile::Standard);
    }
}
