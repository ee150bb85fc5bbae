//! Battle orchestration.
//!
//! ## Key Types
//!
//! - `TurnEngine`: Turn state machine for one battle
//! - `TurnPhase`: Where the battle is (selecting, targeting, waiting, ended)
//! - `RenderFrame` / `RenderEvent`: Everything the presentation layer draws
//! - `ScriptedBot`: Opponent policy for local battles
//! - `BattleSession`: Engine plus intent queue, snapshots and online sync

pub mod bot;
pub mod engine;
pub mod events;
pub mod phase;
pub mod session;

pub use bot::{generate_bot_deck, BotAction, BotPlan, DifficultyProfile, ScriptedBot};
pub use engine::TurnEngine;
pub use events::{EffectDescriptor, RenderEvent, RenderFrame, SkipReason};
pub use phase::TurnPhase;
pub use session::BattleSession;
