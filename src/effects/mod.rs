//! Combat effects: abilities, targeting and resolution.
//!
//! - `AbilityDef` / `AbilityKind`: catalog data for special abilities
//! - `TargetSelector`: who may be attacked or targeted
//! - `CombatResolver`: applies attacks and abilities to a `BattleState`

mod ability;
mod resolver;
mod targeting;

pub use ability::{AbilityDef, AbilityKind, AbilityTarget};
pub use resolver::{AbilityOutcome, AttackOutcome, CombatResolver, HitReport, HitRolls};
pub use targeting::TargetSelector;
