//! Battle rules: eligibility, casting checks and the end condition.
//!
//! The turn engine calls into `BattleRules` and never decides legality on
//! its own. The presentation layer never decides legality at all.

pub mod engine;

pub use engine::{BattleOutcome, BattleRules};
