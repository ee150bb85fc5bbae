//! Runes: once-per-turn support actions.
//!
//! Each side draws one rune at the start of its turn. Using it does not
//! consume the attack.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::GameRng;

/// A support rune.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rune {
    /// Own card cannot be chosen as a normal attack target.
    Invisibility,
    /// Own card gains bonus defense.
    Shield,
    /// Own damaged card restores health.
    Heal,
}

impl Rune {
    pub const ALL: [Rune; 3] = [Rune::Invisibility, Rune::Shield, Rune::Heal];

    /// Draw this turn's rune uniformly.
    pub fn draw(rng: &mut GameRng) -> Rune {
        Self::ALL[rng.gen_range_usize(0..Self::ALL.len())]
    }

    /// Whether the rune leaves a timed status behind.
    #[must_use]
    pub fn is_timed(self) -> bool {
        matches!(self, Rune::Invisibility | Rune::Shield)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Rune::Invisibility => "invisibility",
            Rune::Shield => "shield",
            Rune::Heal => "heal",
        }
    }
}

impl fmt::Display for Rune {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
