//! Battle configuration.
//!
//! `BattleConfig` collects every tunable constant of the combat rules and
//! the pacing hints handed to the presentation layer. Defaults reproduce the
//! live game; the builder methods and JSON loading exist for tests and
//! balance experiments.

use serde::{Deserialize, Serialize};

use super::side::Side;

/// 24 hours in milliseconds.
const DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// Tunable battle rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BattleConfig {
    /// Cards per deck.
    pub deck_size: usize,

    /// Maximum upgrades a single card may carry.
    pub max_upgrades: usize,

    /// Probability of a critical hit per resolution.
    pub crit_chance: f64,

    /// Damage multiplier on a critical hit.
    pub crit_multiplier: f64,

    /// Damage multiplier when the target blocks.
    pub block_multiplier: f64,

    /// Defense granted by the shield rune.
    pub shield_defense_bonus: i32,

    /// Cooldown set when an ability is cast, in own turns.
    pub ability_cooldown: u32,

    /// Rune duration in rounds when cast by the player.
    pub player_rune_duration: u32,

    /// Rune duration in rounds when cast by the opponent.
    pub opponent_rune_duration: u32,

    /// Health restored by the heal rune.
    pub rune_heal_amount: i32,

    /// Snapshots older than this are discarded on load.
    pub snapshot_max_age_ms: u64,

    /// Pause between sequential hits.
    pub hit_pause_ms: u64,

    /// Pause between a selection and its resolution.
    pub select_pause_ms: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            deck_size: 3,
            max_upgrades: 3,
            crit_chance: 0.15,
            crit_multiplier: 1.5,
            block_multiplier: 0.3,
            shield_defense_bonus: 40,
            ability_cooldown: 2,
            player_rune_duration: 2,
            opponent_rune_duration: 2,
            rune_heal_amount: 50,
            snapshot_max_age_ms: DAY_MS,
            hit_pause_ms: 600,
            select_pause_ms: 400,
        }
    }
}

impl BattleConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from JSON. Missing keys fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Rune duration for runes cast by `side`.
    #[must_use]
    pub fn rune_duration(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player_rune_duration,
            Side::Opponent => self.opponent_rune_duration,
        }
    }

    /// Set crit chance and multiplier.
    #[must_use]
    pub fn with_crit(mut self, chance: f64, multiplier: f64) -> Self {
        self.crit_chance = chance;
        self.crit_multiplier = multiplier;
        self
    }

    /// Disable critical hits. Blocks still follow defense.
    #[must_use]
    pub fn without_crits(mut self) -> Self {
        self.crit_chance = 0.0;
        self
    }

    /// Set rune durations per side.
    #[must_use]
    pub fn with_rune_durations(mut self, player: u32, opponent: u32) -> Self {
        self.player_rune_duration = player;
        self.opponent_rune_duration = opponent;
        self
    }

    /// Bot-cast runes last a single round, as in the first release.
    #[must_use]
    pub fn with_legacy_bot_runes(self) -> Self {
        let player = self.player_rune_duration;
        self.with_rune_durations(player, 1)
    }

    /// Set pacing hints (zero disables pauses).
    #[must_use]
    pub fn with_pacing(mut self, hit_pause_ms: u64, select_pause_ms: u64) -> Self {
        self.hit_pause_ms = hit_pause_ms;
        self.select_pause_ms = select_pause_ms;
        self
    }

    #[must_use]
    pub fn with_snapshot_max_age(mut self, max_age_ms: u64) -> Self {
        self.snapshot_max_age_ms = max_age_ms;
        self
    }
}
