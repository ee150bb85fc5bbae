//! Local battle tests.
//!
//! These drive `TurnEngine` against the scripted bot:
//! - Multi-hit attacks, kills and the end check
//! - Rune timers measured in full rounds
//! - The last-card lock and skipped activations
//! - Ability cooldowns

use card_duel::battle::{EffectDescriptor, RenderEvent, SkipReason, TurnEngine, TurnPhase};
use card_duel::cards::{CardInstance, StatBlock};
use card_duel::core::{ActionKind, BattleConfig, Intent, Side};
use card_duel::effects::{AbilityDef, AbilityKind, TargetSelector};
use card_duel::error::IntentError;
use card_duel::rules::BattleOutcome;
use card_duel::status::{Rune, StatusEffectManager};

fn card(name: &str, damage: i32, health: i32, defense: i32, speed: i32) -> CardInstance {
    CardInstance::new(name, StatBlock::new(damage, health, defense, speed))
}

fn dead(name: &str) -> CardInstance {
    let mut c = card(name, 1, 10, 0, 10);
    c.set_health(0);
    c
}

fn config() -> BattleConfig {
    BattleConfig::default().without_crits().with_pacing(0, 0)
}

fn hits(events: &[RenderEvent]) -> Vec<&EffectDescriptor> {
    events
        .iter()
        .filter_map(|e| match e {
            RenderEvent::Effect(d @ EffectDescriptor::Hit { .. }) => Some(d),
            _ => None,
        })
        .collect()
}

/// Two hits against a 40 health target: the first kills, the second has
/// nothing left to hit and the battle ends.
#[test]
fn test_second_hit_skipped_when_last_enemy_dies() {
    let mut engine = TurnEngine::local(
        vec![card("Brute", 50, 100, 0, 25), dead("P2"), dead("P3")],
        vec![card("Target", 10, 40, 0, 10), dead("O2"), dead("O3")],
        config(),
        3,
    );

    engine.submit(Intent::SelectAttacker("Brute".into())).unwrap();
    engine.submit(Intent::SelectTarget("Target".into())).unwrap();

    let target = engine.state().card(Side::Opponent, "Target").unwrap();
    assert_eq!(target.health(), 0);
    assert!(target.is_dead());

    let frame = engine.take_frame();
    let hits = hits(&frame.events);
    assert_eq!(hits.len(), 1);
    assert!(matches!(hits[0], EffectDescriptor::Hit { damage: 40, killed: true, .. }));
    assert_eq!(engine.outcome(), Some(BattleOutcome::Winner(Side::Player)));
    assert!(!engine.state().in_progress);
}

/// With another enemy alive the second hit moves on to it.
#[test]
fn test_second_hit_retargets() {
    let mut engine = TurnEngine::local(
        vec![card("Brute", 50, 1000, 0, 25), dead("P2"), dead("P3")],
        vec![card("Target", 1, 40, 0, 10), card("Backup", 1, 200, 0, 10), dead("O3")],
        config(),
        3,
    );

    engine.submit(Intent::SelectAttacker("Brute".into())).unwrap();
    engine.submit(Intent::SelectTarget("Target".into())).unwrap();

    assert!(engine.state().card(Side::Opponent, "Target").unwrap().is_dead());
    assert!(!engine.is_over());

    let frame = engine.take_frame();
    let targets: Vec<_> = hits(&frame.events)
        .into_iter()
        .filter_map(|h| match h {
            EffectDescriptor::Hit { side: Side::Player, target, damage, .. } => Some((target.as_str(), *damage)),
            _ => None,
        })
        .collect();
    assert_eq!(targets, vec![("Target", 40), ("Backup", 50)]);
}

/// A card hidden on round 1 cannot be attacked for two full rounds.
#[test]
fn test_invisibility_lasts_two_full_rounds() {
    let (seed, mut engine) = (0..200)
        .map(|seed| {
            let engine = TurnEngine::local(
                vec![card("P1", 10, 300, 0, 10), card("P2", 10, 900, 0, 10), card("P3", 10, 900, 0, 10)],
                vec![card("O1", 1, 900, 0, 10), card("O2", 1, 900, 0, 10), card("O3", 1, 900, 0, 10)],
                config(),
                seed,
            );
            (seed, engine)
        })
        .find(|(_, e)| e.state().player_rune == Some(Rune::Invisibility))
        .expect("some seed draws invisibility first");

    engine.submit(Intent::UseRune("P1".into())).unwrap();
    engine.submit(Intent::SelectAttacker("P1".into())).unwrap();
    engine.submit(Intent::SelectTarget("O1".into())).unwrap();

    // Round 2: still hidden from the opponent.
    assert_eq!(engine.state().round, 2, "seed {seed}");
    assert!(StatusEffectManager::is_invisible(engine.state(), Side::Player, "P1"));
    assert!(!TargetSelector::attack_targets(engine.state(), Side::Opponent).contains(&"P1".to_string()));
    assert_eq!(engine.state().card(Side::Player, "P1").unwrap().health(), 300);

    engine.submit(Intent::SelectAttacker("P2".into())).unwrap();
    engine.submit(Intent::SelectTarget("O2".into())).unwrap();

    // Round 3: visible again.
    assert_eq!(engine.state().round, 3);
    assert!(!StatusEffectManager::is_invisible(engine.state(), Side::Player, "P1"));
    assert_eq!(engine.state().card(Side::Player, "P1").unwrap().health(), 300);
    let frame = engine.take_frame();
    assert!(frame.effects().any(|e| matches!(
        e,
        EffectDescriptor::Expired { rune: Rune::Invisibility, target } if target.name == "P1"
    )));

    engine.submit(Intent::SelectAttacker("P1".into())).unwrap();
    engine.submit(Intent::SelectTarget("O3".into())).unwrap();

    // The weakest card is the bot's target once it can be seen.
    assert!(engine.state().card(Side::Player, "P1").unwrap().health() < 300);
}

/// Each side's only living card is locked after acting: both activations
/// are skipped and the lock resets for the next round.
#[test]
fn test_only_card_locked_skips_then_recovers() {
    let mut engine = TurnEngine::local(
        vec![card("Solo", 5, 1000, 0, 10), dead("P2"), dead("P3")],
        vec![card("Lone", 5, 1000, 0, 10), dead("O2"), dead("O3")],
        config(),
        8,
    );

    engine.submit(Intent::SelectAttacker("Solo".into())).unwrap();
    engine.submit(Intent::SelectTarget("Lone".into())).unwrap();

    let frame = engine.take_frame();
    let skips: Vec<_> = frame
        .events
        .iter()
        .filter_map(|e| match e {
            RenderEvent::Skipped { side, reason } => Some((*side, *reason)),
            _ => None,
        })
        .collect();
    assert_eq!(
        skips,
        vec![
            (Side::Player, SkipReason::NoEligibleCard),
            (Side::Opponent, SkipReason::NoEligibleCard)
        ]
    );

    assert_eq!(engine.state().round, 3);
    assert_eq!(engine.state().last_player_card, None);
    assert_eq!(engine.state().last_opponent_card, None);
    assert_eq!(engine.phase(), &TurnPhase::PlayerSelecting);
    engine.submit(Intent::SelectAttacker("Solo".into())).unwrap();
}

#[test]
fn test_cast_sets_cooldown_and_locks_ability() {
    let striker = card("Striker", 10, 500, 0, 10)
        .with_ability(AbilityDef::new("Meat Hook", AbilityKind::Strike { damage: 45 }));
    let mut engine = TurnEngine::local(
        vec![striker, card("P2", 10, 500, 0, 10), card("P3", 10, 500, 0, 10)],
        vec![card("O1", 1, 500, 0, 10), card("O2", 1, 500, 0, 10), card("O3", 1, 500, 0, 10)],
        config(),
        5,
    );

    engine
        .submit(Intent::UseAbility {
            caster: "Striker".into(),
            target: Some("O2".into()),
        })
        .unwrap();

    let frame = engine.take_frame();
    assert!(frame.effects().any(|e| matches!(
        e,
        EffectDescriptor::Ability { caster, effect: "strike", amount: 45, .. } if caster == "Striker"
    )));
    // Two turns of cooldown, one already ticked at the start of this turn.
    assert_eq!(engine.state().card(Side::Player, "Striker").unwrap().ability_cooldown, 1);
    assert_eq!(
        engine.submit(Intent::UseAbility {
            caster: "Striker".into(),
            target: Some("O2".into()),
        }),
        Err(IntentError::NotEligible("Striker".into()))
    );

    engine.submit(Intent::SelectAttacker("P2".into())).unwrap();
    engine.submit(Intent::SelectTarget("O1".into())).unwrap();

    assert_eq!(engine.state().card(Side::Player, "Striker").unwrap().ability_cooldown, 0);
    engine
        .submit(Intent::UseAbility {
            caster: "Striker".into(),
            target: Some("O3".into()),
        })
        .unwrap();
}

#[test]
fn test_cooldown_blocks_cast_when_card_eligible() {
    let config = BattleConfig {
        ability_cooldown: 3,
        ..config()
    };
    let freezer = card("Freezer", 10, 500, 0, 10)
        .with_ability(AbilityDef::new("Frost Nova", AbilityKind::Freeze));
    let mut engine = TurnEngine::local(
        vec![freezer, card("P2", 10, 500, 0, 10), card("P3", 10, 500, 0, 10)],
        vec![card("O1", 1, 500, 0, 10), card("O2", 1, 500, 0, 10), card("O3", 1, 500, 0, 10)],
        config,
        5,
    );

    engine
        .submit(Intent::UseAbility {
            caster: "Freezer".into(),
            target: Some("O1".into()),
        })
        .unwrap();
    engine.submit(Intent::SelectAttacker("P2".into())).unwrap();
    engine.submit(Intent::SelectTarget("O1".into())).unwrap();

    assert_eq!(
        engine.submit(Intent::UseAbility {
            caster: "Freezer".into(),
            target: Some("O1".into()),
        }),
        Err(IntentError::AbilityOnCooldown {
            card: "Freezer".into(),
            remaining: 1
        })
    );
    engine.submit(Intent::SelectAttacker("Freezer".into())).unwrap();
}

#[test]
fn test_frozen_card_skips_one_activation() {
    let freezer = card("Freezer", 10, 500, 0, 10)
        .with_ability(AbilityDef::new("Frost Nova", AbilityKind::Freeze));
    let mut engine = TurnEngine::local(
        vec![freezer, dead("P2"), dead("P3")],
        vec![card("Lone", 5, 500, 0, 10), dead("O2"), dead("O3")],
        config(),
        4,
    );

    engine
        .submit(Intent::UseAbility {
            caster: "Freezer".into(),
            target: Some("Lone".into()),
        })
        .unwrap();

    let frame = engine.take_frame();
    assert!(frame.events.iter().any(|e| matches!(
        e,
        RenderEvent::Skipped { side: Side::Opponent, reason: SkipReason::NoEligibleCard }
    )));
    assert!(!StatusEffectManager::is_frozen(engine.state(), Side::Opponent, "Lone"));

    let opponent_round_one: Vec<_> = engine
        .state()
        .log
        .iter()
        .filter(|r| r.side == Side::Opponent && r.round == 1)
        .map(|r| r.kind.clone())
        .collect();
    assert_eq!(opponent_round_one.last(), Some(&ActionKind::Skip));
    assert!(!opponent_round_one
        .iter()
        .any(|k| matches!(k, ActionKind::Attack { .. })));
}

#[test]
fn test_feared_card_skips_one_activation() {
    let scarer = card("Lich", 10, 500, 0, 10).with_ability(AbilityDef::new("Dread", AbilityKind::Fear));
    let mut engine = TurnEngine::local(
        vec![scarer, dead("P2"), dead("P3")],
        vec![card("Lone", 5, 500, 0, 10), dead("O2"), dead("O3")],
        config(),
        6,
    );

    engine
        .submit(Intent::UseAbility {
            caster: "Lich".into(),
            target: Some("Lone".into()),
        })
        .unwrap();

    let frame = engine.take_frame();
    assert!(frame.events.iter().any(|e| matches!(
        e,
        RenderEvent::Skipped { side: Side::Opponent, reason: SkipReason::NoEligibleCard }
    )));
    assert!(!StatusEffectManager::is_feared(engine.state(), Side::Opponent, "Lone"));

    let opponent_round_one: Vec<_> = engine
        .state()
        .log
        .iter()
        .filter(|r| r.side == Side::Opponent && r.round == 1)
        .map(|r| r.kind.clone())
        .collect();
    assert_eq!(opponent_round_one.last(), Some(&ActionKind::Skip));
    assert!(!opponent_round_one
        .iter()
        .any(|k| matches!(k, ActionKind::Attack { .. })));
}

#[test]
fn test_illegal_intents_leave_state_untouched() {
    let mut engine = TurnEngine::local(
        vec![card("P1", 10, 100, 0, 10), card("P2", 10, 100, 0, 10), card("P3", 10, 100, 0, 10)],
        vec![card("O1", 10, 100, 0, 10), card("O2", 10, 100, 0, 10), card("O3", 10, 100, 0, 10)],
        config(),
        2,
    );
    let before = engine.state().clone();

    assert_eq!(
        engine.submit(Intent::SelectAttacker("Nobody".into())),
        Err(IntentError::UnknownCard("Nobody".into()))
    );
    assert_eq!(
        engine.submit(Intent::UseAbility {
            caster: "P1".into(),
            target: None
        }),
        Err(IntentError::NoAbility("P1".into()))
    );
    engine.submit(Intent::SelectAttacker("P1".into())).unwrap();
    assert_eq!(
        engine.submit(Intent::SelectTarget("P2".into())),
        Err(IntentError::UnknownCard("P2".into()))
    );

    assert_eq!(engine.state(), &before);
    let frame = engine.take_frame();
    let rejected = frame
        .events
        .iter()
        .filter(|e| matches!(e, RenderEvent::IntentRejected { .. }))
        .count();
    assert_eq!(rejected, 3);
}

#[test]
fn test_resume_reemits_phase() {
    let mut engine = TurnEngine::local(
        vec![card("P1", 10, 100, 0, 10), card("P2", 10, 100, 0, 10), card("P3", 10, 100, 0, 10)],
        vec![card("O1", 10, 100, 0, 10), card("O2", 10, 100, 0, 10), card("O3", 10, 100, 0, 10)],
        config(),
        2,
    );
    engine.take_frame();

    engine.submit(Intent::Resume).unwrap();
    let frame = engine.take_frame();

    assert_eq!(
        frame.events,
        vec![RenderEvent::PhaseChanged(TurnPhase::PlayerSelecting)]
    );
}
