//! Core battle types: sides, state, intents, RNG, configuration.
//!
//! Everything here is plain data. Rules live in `rules`, `status`,
//! `effects` and `battle`.

pub mod action;
pub mod config;
pub mod rng;
pub mod side;
pub mod state;

pub use action::{ActionKind, ActionRecord, Intent};
pub use config::BattleConfig;
pub use rng::{GameRng, GameRngState};
pub use side::{CardRef, PeerRole, Side, SideMap};
pub use state::BattleState;
