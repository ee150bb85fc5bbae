//! # card-duel
//!
//! Turn-based card duel engine: two decks of three cards fight round by
//! round against a scripted bot or a remote peer.
//!
//! ## Design Principles
//!
//! 1. **Engine Owns Legality**: The presentation layer sends intents and
//!    draws frames. Every rule check happens in `rules` and `battle`.
//!
//! 2. **Deterministic**: All randomness goes through a seeded `GameRng`,
//!    and its position is saved with the battle.
//!
//! 3. **No Clocks, No Sleeps**: Time is passed in; pacing is emitted as
//!    pause events for the presentation layer to honor.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: `BattleState` uses `im-rs`, so render
//!   frames and snapshots carry full state clones cheaply.
//!
//! - **Seams as Traits**: `CardCatalog`, `ProfileStore`, `RoomChannel` and
//!   `SnapshotSlot` are the boundaries to storage and transport.
//!
//! ## Modules
//!
//! - `core`: Sides, state, intents, RNG, configuration
//! - `cards`: Card definitions, instances, catalog and deck building
//! - `effects`: Abilities, targeting and combat resolution
//! - `status`: Runes, freeze/fear and their timers
//! - `rules`: Eligibility and the end condition
//! - `intents`: Intent queue
//! - `battle`: Turn engine, scripted bot and the session facade
//! - `sync`: Room record and the online turn handoff
//! - `snapshot`: Save and resume
//!
//! ## Example
//!
//! ```
//! use card_duel::{BattleConfig, BattleSession, CardRegistry, DifficultyProfile, Intent, MemorySlot, Profile};
//!
//! let catalog = CardRegistry::standard();
//! let profile = Profile::new(["Knight", "Archer", "Cleric"]);
//! let config = BattleConfig::default().with_pacing(0, 0);
//!
//! let mut session: BattleSession<MemorySlot> = BattleSession::start_local(
//!     &catalog,
//!     &profile,
//!     DifficultyProfile::Tutorial,
//!     config,
//!     MemorySlot::new(),
//!     7,
//!     0,
//! )
//! .unwrap();
//!
//! session.enqueue(Intent::SelectAttacker("Knight".into()));
//! let frame = session.pump(100).unwrap();
//! assert!(frame.phase.accepts_input() || frame.phase.is_terminal());
//! ```

pub mod core;
pub mod cards;
pub mod effects;
pub mod status;
pub mod rules;
pub mod intents;
pub mod battle;
pub mod sync;
pub mod snapshot;
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    ActionKind, ActionRecord, BattleConfig, BattleState, CardRef, GameRng, GameRngState, Intent,
    PeerRole, Side, SideMap,
};

pub use crate::cards::{
    build_deck, CardCatalog, CardDefinition, CardInstance, CardRegistry, Profile, ProfileStore,
    Rarity, Stat, StatBlock, Upgrade,
};

pub use crate::effects::{AbilityDef, AbilityKind, AbilityTarget, CombatResolver, TargetSelector};

pub use crate::status::{Rune, StatusEffectManager};

pub use crate::rules::{BattleOutcome, BattleRules};

pub use crate::intents::IntentQueue;

pub use crate::battle::{
    BattleSession, DifficultyProfile, EffectDescriptor, RenderEvent, RenderFrame, ScriptedBot,
    SkipReason, TurnEngine, TurnPhase,
};

pub use crate::sync::{Room, RoomChannel, RoomDirectory, RoomEvent, RoomStatus, SyncProtocol};

pub use crate::snapshot::{FileSlot, MemorySlot, SnapshotSlot, SnapshotStore};

pub use crate::error::{BattleError, DeckError, IntentError, Result, SnapshotError, SyncError};
