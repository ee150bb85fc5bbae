//! Card system: definitions, instances, catalog and deck building.
//!
//! ## Key Types
//!
//! - `CardDefinition`: Immutable catalog data (base stats, rarity, ability)
//! - `CardInstance`: Combat-ready card (health, temporary bonuses, cooldown)
//! - `CardCatalog` / `CardRegistry`: Card lookup by name
//! - `ProfileStore` / `Profile`: Deck composition and upgrades
//! - `Stat` / `Upgrade`: Fixed per-upgrade stat bonuses

pub mod attributes;
pub mod deck;
pub mod definition;
pub mod instance;
pub mod registry;

pub use attributes::{Stat, StatBlock, Upgrade};
pub use deck::{build_cards, build_deck, validate_deck_names, Profile, ProfileStore};
pub use definition::{CardDefinition, Rarity};
pub use instance::CardInstance;
pub use registry::{CardCatalog, CardRegistry};
