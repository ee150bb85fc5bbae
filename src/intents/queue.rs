//! Intent queue between the presentation layer and the turn engine.
//!
//! Intents are applied in arrival order. The queue only buffers; the
//! engine decides legality when each intent is popped.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::Intent;

/// FIFO of pending intents.
///
/// ## Behavior
///
/// - `push()`: Appends an intent
/// - `pop()`: Takes the oldest intent
/// - `clear()`: Drops everything still pending (battle ended)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IntentQueue {
    pending: VecDeque<Intent>,
}

impl IntentQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, intent: Intent) {
        log::debug!("queued intent: {}", intent.label());
        self.pending.push_back(intent);
    }

    pub fn pop(&mut self) -> Option<Intent> {
        self.pending.pop_front()
    }

    #[must_use]
    pub fn peek(&self) -> Option<&Intent> {
        self.pending.front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl Extend<Intent> for IntentQueue {
    fn extend<I: IntoIterator<Item = Intent>>(&mut self, iter: I) {
        for intent in iter {
            self.push(intent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = IntentQueue::new();
        queue.push(Intent::SelectAttacker("Knight".into()));
        queue.push(Intent::SelectTarget("Archer".into()));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.peek(), Some(&Intent::SelectAttacker("Knight".into())));
        assert_eq!(queue.pop(), Some(Intent::SelectAttacker("Knight".into())));
        assert_eq!(queue.pop(), Some(Intent::SelectTarget("Archer".into())));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_extend_and_clear() {
        let mut queue = IntentQueue::new();
        queue.extend([Intent::Resume, Intent::Abandon]);
        assert_eq!(queue.len(), 2);

        queue.clear();
        assert!(queue.is_empty());
    }
}
