//! Intent buffering.
//!
//! The presentation layer enqueues intents; the battle session feeds them
//! to the turn engine one at a time.

mod queue;

pub use queue::IntentQueue;
