//! The turn engine: the battle state machine.
//!
//! ## Activation flow
//!
//! 1. `start_turn`: tick the side's cooldowns, draw its rune, check
//!    eligibility (no eligible card means the activation is skipped)
//! 2. The side uses at most one rune, then attacks or casts once
//! 3. `finish_activation`: consume control effects, check for the end,
//!    advance the round after the second mover, hand over
//!
//! Local battles drive the opponent through `ScriptedBot` synchronously.
//! Online battles stop after the local activation and raise a handoff;
//! the peer's activation arrives later as a room record.
//!
//! The engine never sleeps. Pacing is emitted as `RenderEvent::Pause`.

use std::mem;

use crate::cards::{CardCatalog, CardInstance};
use crate::core::{
    ActionKind, BattleConfig, BattleState, GameRng, GameRngState, Intent, PeerRole, Side,
};
use crate::effects::{CombatResolver, TargetSelector};
use crate::error::IntentError;
use crate::rules::{BattleOutcome, BattleRules};
use crate::status::{Rune, StatusEffectManager};
use crate::sync::{reconcile, ReconcileReport, Room};

use super::bot::{BotAction, ScriptedBot};
use super::events::{EffectDescriptor, RenderEvent, RenderFrame, SkipReason};
use super::phase::TurnPhase;

/// Owns one battle and sequences its turns.
pub struct TurnEngine {
    state: BattleState,
    phase: TurnPhase,
    config: BattleConfig,
    rng: GameRng,
    /// Scripted opponent (local battles only).
    bot: Option<ScriptedBot>,
    events: Vec<RenderEvent>,
    /// Local activation finished and must be published.
    handoff: bool,
}

impl TurnEngine {
    /// Start a battle against the scripted bot. The player moves first.
    #[must_use]
    pub fn local(
        player_deck: Vec<CardInstance>,
        opponent_deck: Vec<CardInstance>,
        config: BattleConfig,
        seed: u64,
    ) -> Self {
        let state = BattleState::new(player_deck, opponent_deck);
        let mut engine = Self::from_parts(state, config, GameRng::new(seed), Some(ScriptedBot::new()));
        log::info!("local battle started (seed {})", seed);
        engine.run_from(Side::Player);
        engine
    }

    /// Start an online battle. The host moves first; the guest waits.
    #[must_use]
    pub fn online(
        player_deck: Vec<CardInstance>,
        opponent_deck: Vec<CardInstance>,
        role: PeerRole,
        room_code: impl Into<String>,
        config: BattleConfig,
        seed: u64,
    ) -> Self {
        let state = BattleState::new(player_deck, opponent_deck).online(role, room_code);
        let mut engine = Self::from_parts(state, config, GameRng::new(seed), None);
        log::info!("online battle started as {:?}", role);
        engine.run_from(role.first_mover());
        engine
    }

    /// Continue a saved battle.
    ///
    /// Ability metadata is not part of the saved state; it is looked up in
    /// `catalog` again.
    #[must_use]
    pub fn restore(
        mut state: BattleState,
        rng: &GameRngState,
        config: BattleConfig,
        catalog: &impl CardCatalog,
    ) -> Self {
        for side in Side::BOTH {
            for card in state.deck_mut(side) {
                card.ability = catalog
                    .get_card(&card.name)
                    .and_then(|def| def.ability())
                    .cloned();
            }
        }

        let bot = (!state.is_online).then(ScriptedBot::new);
        let mut engine = Self::from_parts(state, config, GameRng::from_state(rng), bot);
        engine.phase = match BattleRules::check_outcome(&engine.state) {
            Some(outcome) => TurnPhase::BattleEnded(outcome),
            None if engine.state.is_player_turn => TurnPhase::PlayerSelecting,
            None => TurnPhase::OpponentTurn,
        };
        engine.emit(RenderEvent::PhaseChanged(engine.phase.clone()));
        log::info!(
            "battle restored at round {} ({})",
            engine.state.round,
            engine.phase.label()
        );
        engine
    }

    fn from_parts(
        state: BattleState,
        config: BattleConfig,
        rng: GameRng,
        bot: Option<ScriptedBot>,
    ) -> Self {
        Self {
            state,
            phase: TurnPhase::PlayerSelecting,
            config,
            rng,
            bot,
            events: Vec::new(),
            handoff: false,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn state(&self) -> &BattleState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    #[must_use]
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.phase.outcome()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Online and waiting for the peer's activation.
    #[must_use]
    pub fn is_waiting_for_peer(&self) -> bool {
        self.state.is_online && self.phase == TurnPhase::OpponentTurn
    }

    /// Events and state since the last frame.
    pub fn take_frame(&mut self) -> RenderFrame {
        RenderFrame {
            state: self.state.clone(),
            phase: self.phase.clone(),
            events: mem::take(&mut self.events),
        }
    }

    /// Whether a finished local activation still has to be published.
    pub fn take_handoff(&mut self) -> bool {
        mem::take(&mut self.handoff)
    }

    // === Intents ===

    /// Apply one intent from the presentation layer.
    ///
    /// A rejected intent leaves the state untouched and emits
    /// `RenderEvent::IntentRejected`.
    pub fn submit(&mut self, intent: Intent) -> Result<(), IntentError> {
        let label = intent.label();
        let result = self.apply(intent);
        if let Err(error) = &result {
            log::warn!("rejected {}: {}", label, error);
            self.emit(RenderEvent::IntentRejected {
                intent: label,
                error: error.clone(),
            });
        }
        result
    }

    fn apply(&mut self, intent: Intent) -> Result<(), IntentError> {
        if intent == Intent::Resume {
            self.resume();
            return Ok(());
        }
        if self.phase.is_terminal() {
            return Err(IntentError::BattleOver);
        }
        if intent == Intent::Abandon {
            self.terminate(BattleOutcome::Abandoned { by: Side::Player });
            return Ok(());
        }
        if !self.state.is_player_turn || !self.phase.accepts_input() {
            return Err(IntentError::NotYourTurn);
        }

        match intent {
            Intent::SelectAttacker(name) => {
                BattleRules::check_actor(&self.state, Side::Player, &name)?;
                self.set_phase(TurnPhase::PlayerTargeting { attacker: name });
                Ok(())
            }
            Intent::SelectTarget(target) => {
                let TurnPhase::PlayerTargeting { attacker } = &self.phase else {
                    return Err(IntentError::WrongPhase {
                        intent: "select target",
                        phase: self.phase.label(),
                    });
                };
                let attacker = attacker.clone();
                self.attack(Side::Player, &attacker, &target)?;
                self.close_local_activation();
                Ok(())
            }
            Intent::UseAbility { caster, target } => {
                self.cast(Side::Player, &caster, target.as_deref())?;
                self.close_local_activation();
                Ok(())
            }
            Intent::UseRune(target) => self.use_rune(Side::Player, &target),
            Intent::Resume | Intent::Abandon => Ok(()),
        }
    }

    /// Re-emit the current phase; a restored local battle waiting on the
    /// bot lets it play.
    fn resume(&mut self) {
        self.emit(RenderEvent::PhaseChanged(self.phase.clone()));
        if self.bot.is_some() && self.phase == TurnPhase::OpponentTurn {
            self.play_bot(Side::Opponent);
            if let Some(next) = self.finish_activation(Side::Opponent) {
                self.run_from(next);
            }
        }
    }

    /// End the battle without a winner check (abandon or disconnect).
    pub fn terminate(&mut self, outcome: BattleOutcome) {
        if !self.phase.is_terminal() {
            self.end(outcome);
        }
    }

    /// Adopt the peer's published activation and start the local turn.
    ///
    /// Returns `None` when the engine is not waiting for the peer.
    pub fn accept_peer_turn(&mut self, room: &Room) -> Option<ReconcileReport> {
        if !self.is_waiting_for_peer() {
            return None;
        }
        let role = self.state.peer_role?;

        let report = reconcile(&mut self.state, room, role);
        log::info!(
            "peer turn adopted: round {}, {} cards updated",
            self.state.round,
            report.total_updated()
        );

        match BattleRules::check_outcome(&self.state) {
            Some(outcome) => self.end(outcome),
            None => self.run_from(Side::Player),
        }
        Some(report)
    }

    // === Actions ===

    fn attack(&mut self, side: Side, attacker: &str, target: &str) -> Result<(), IntentError> {
        BattleRules::check_actor(&self.state, side, attacker)?;
        TargetSelector::validate_attack_target(&self.state, side, target)?;

        self.pause(self.config.select_pause_ms);
        self.set_phase(TurnPhase::ResolvingAttacks);

        let outcome = CombatResolver::resolve_attack(
            &mut self.state,
            side,
            attacker,
            target,
            &mut self.rng,
            &self.config,
        )?;

        for (i, hit) in outcome.hits.iter().enumerate() {
            if i > 0 {
                self.pause(self.config.hit_pause_ms);
            }
            self.emit(RenderEvent::Effect(EffectDescriptor::Hit {
                side,
                attacker: attacker.to_string(),
                target: hit.target.clone(),
                damage: hit.damage,
                crit: hit.crit,
                blocked: hit.blocked,
                killed: hit.killed,
            }));
        }

        log::info!(
            "{} {} attacks {} ({} hits, {} damage)",
            side,
            attacker,
            target,
            outcome.hits.len(),
            outcome.total_damage()
        );
        self.state.record(
            side,
            ActionKind::Attack {
                attacker: attacker.to_string(),
                target: target.to_string(),
                hits: outcome.hits.len() as u32,
                damage: outcome.total_damage(),
            },
        );
        self.state.set_last_card(side, Some(attacker.to_string()));
        Ok(())
    }

    fn cast(&mut self, side: Side, caster: &str, target: Option<&str>) -> Result<(), IntentError> {
        BattleRules::check_caster(&self.state, side, caster)?;
        let kind = self
            .state
            .card(side, caster)
            .and_then(|c| c.ability.as_ref())
            .map(|a| a.kind.clone())
            .ok_or_else(|| IntentError::NoAbility(caster.to_string()))?;
        let target = TargetSelector::validate_ability_target(&self.state, side, caster, &kind, target)?;

        self.set_phase(TurnPhase::ResolvingAttacks);
        let outcome = CombatResolver::resolve_ability(&mut self.state, side, caster, target, &self.config)?;

        self.emit(RenderEvent::Effect(EffectDescriptor::Ability {
            side,
            caster: caster.to_string(),
            ability: outcome.ability.clone(),
            effect: outcome.kind.label(),
            target: outcome.target.clone(),
            amount: outcome.amount,
        }));
        log::info!("{} {} casts {} on {}", side, caster, outcome.ability, outcome.target);

        self.state.record(
            side,
            ActionKind::Ability {
                caster: caster.to_string(),
                ability: outcome.ability,
                target: Some(outcome.target.name),
            },
        );
        self.state.set_last_card(side, Some(caster.to_string()));
        Ok(())
    }

    fn use_rune(&mut self, side: Side, target: &str) -> Result<(), IntentError> {
        if self.state.rune_used_this_turn {
            return Err(IntentError::RuneAlreadyUsed);
        }
        let rune = self.state.rune(side).ok_or(IntentError::RuneUnavailable)?;
        let outcome = StatusEffectManager::apply_rune(&mut self.state, side, rune, target, &self.config)?;
        self.state.rune_used_this_turn = true;

        self.emit(RenderEvent::Effect(EffectDescriptor::Rune {
            side,
            rune,
            target: target.to_string(),
            healed: outcome.healed,
        }));
        self.state.record(
            side,
            ActionKind::Rune {
                rune,
                target: target.to_string(),
            },
        );
        Ok(())
    }

    fn play_bot(&mut self, side: Side) {
        let Some(bot) = self.bot else {
            return;
        };

        let plan = bot.plan(&self.state, side);
        let mut action = plan.action;
        if let Some(target) = plan.rune_target {
            match self.use_rune(side, &target) {
                Ok(()) => action = bot.choose_action(&self.state, side),
                Err(e) => log::warn!("bot rune on {} failed: {}", target, e),
            }
        }

        let result = match action {
            Some(BotAction::Attack { attacker, target }) => self.attack(side, &attacker, &target),
            Some(BotAction::Ability { caster, target }) => self.cast(side, &caster, target.as_deref()),
            None => {
                self.skip(side, SkipReason::NoTarget);
                Ok(())
            }
        };
        if let Err(e) = result {
            log::warn!("bot action failed: {}", e);
            self.skip(side, SkipReason::NoEligibleCard);
        }
    }

    // === Turn flow ===

    /// Run activations starting with `side` until one needs outside input.
    fn run_from(&mut self, mut side: Side) {
        while self.start_turn(side) {
            match self.finish_activation(side) {
                Some(next) => side = next,
                None => return,
            }
        }
    }

    /// Start `side`'s activation. Returns true when it already finished
    /// (skipped or played by the bot).
    fn start_turn(&mut self, side: Side) -> bool {
        self.state.is_player_turn = side == Side::Player;

        if self.state.is_online && side == Side::Opponent {
            self.set_phase(TurnPhase::OpponentTurn);
            return false;
        }

        StatusEffectManager::begin_turn(&mut self.state, side);
        let rune = Rune::draw(&mut self.rng);
        self.state.set_rune(side, Some(rune));
        self.state.rune_used_this_turn = false;

        log::info!("round {}: {} turn", self.state.round, side);
        self.emit(RenderEvent::TurnStarted {
            side,
            round: self.state.round,
            rune: Some(rune),
        });

        if let Some(reason) = self.skip_reason(side) {
            self.skip(side, reason);
            return true;
        }

        match side {
            Side::Player => {
                self.set_phase(TurnPhase::PlayerSelecting);
                false
            }
            Side::Opponent => {
                self.set_phase(TurnPhase::OpponentTurn);
                self.play_bot(side);
                true
            }
        }
    }

    fn skip_reason(&self, side: Side) -> Option<SkipReason> {
        let eligible = BattleRules::eligible_attackers(&self.state, side);
        if eligible.is_empty() {
            return Some(SkipReason::NoEligibleCard);
        }
        if !TargetSelector::attack_targets(&self.state, side).is_empty() {
            return None;
        }

        let can_cast = eligible.iter().any(|name| {
            BattleRules::check_caster(&self.state, side, name).is_ok()
                && self
                    .state
                    .card(side, name)
                    .and_then(|c| c.ability.as_ref())
                    .is_some_and(|a| {
                        !TargetSelector::ability_targets(&self.state, side, &a.kind).is_empty()
                    })
        });
        (!can_cast).then_some(SkipReason::NoTarget)
    }

    fn skip(&mut self, side: Side, reason: SkipReason) {
        log::info!("{} skips ({:?})", side, reason);
        self.emit(RenderEvent::Skipped { side, reason });
        self.state.record(side, ActionKind::Skip);
        self.state.set_last_card(side, None);
    }

    fn close_local_activation(&mut self) {
        if let Some(next) = self.finish_activation(Side::Player) {
            self.run_from(next);
        }
    }

    /// Close `side`'s activation. Returns the side that acts next, or
    /// `None` when the battle ended or the turn passed to the peer.
    fn finish_activation(&mut self, side: Side) -> Option<Side> {
        StatusEffectManager::close_activation(&mut self.state, side);
        self.state.set_rune(side, None);
        self.state.rune_used_this_turn = false;

        let online_local = self.state.is_online && side == Side::Player;

        if let Some(outcome) = BattleRules::check_outcome(&self.state) {
            self.handoff |= online_local;
            self.end(outcome);
            return None;
        }

        if side != self.state.first_mover() {
            self.advance_round();
        }

        if online_local {
            self.state.is_player_turn = false;
            self.handoff = true;
            self.set_phase(TurnPhase::OpponentTurn);
            return None;
        }
        Some(side.other())
    }

    fn advance_round(&mut self) {
        self.set_phase(TurnPhase::RoundAdvance);
        self.state.round += 1;

        for (rune, target) in StatusEffectManager::tick_round(&mut self.state, &self.config) {
            self.emit(RenderEvent::Effect(EffectDescriptor::Expired { rune, target }));
        }
        log::info!("round {} begins", self.state.round);
        self.emit(RenderEvent::RoundAdvanced {
            round: self.state.round,
        });
    }

    fn end(&mut self, outcome: BattleOutcome) {
        self.state.in_progress = false;
        self.set_phase(TurnPhase::BattleEnded(outcome));
        self.emit(RenderEvent::BattleEnded(outcome));
        log::info!("battle ended: {:?}", outcome);
    }

    // === Events ===

    fn set_phase(&mut self, phase: TurnPhase) {
        if self.phase != phase {
            self.phase = phase.clone();
            self.emit(RenderEvent::PhaseChanged(phase));
        }
    }

    fn pause(&mut self, millis: u64) {
        if millis > 0 {
            self.emit(RenderEvent::Pause { millis });
        }
    }

    fn emit(&mut self, event: RenderEvent) {
        self.events.push(event);
    }
}
