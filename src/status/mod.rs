//! Status effects: runes, freeze/fear and cooldowns.

pub mod manager;
pub mod rune;

pub use manager::{RuneOutcome, StatusEffectManager};
pub use rune::Rune;
