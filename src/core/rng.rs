//! Deterministic random number generation for combat rolls.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical crits, blocks and rune draws
//! - **Serializable**: O(1) state capture, so a resumed battle continues the same stream
//! - **Context streams**: Independent sequences for unrelated purposes (room codes, bot decks)
//!
//! ```
//! use card_duel::core::GameRng;
//!
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//! assert_eq!(a.roll(0.5), b.roll(0.5));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed,
    /// and drawing from it never disturbs the combat sequence.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Roll an event with the given probability (clamped to `[0, 1]`).
    pub fn roll(&mut self, probability: f64) -> bool {
        let p = if probability.is_nan() { 0.0 } else { probability.clamp(0.0, 1.0) };
        self.inner.gen_bool(p)
    }

    /// Roll an event with a percent chance (e.g. a defense value).
    pub fn roll_percent(&mut self, percent: i32) -> bool {
        self.roll(f64::from(percent) / 100.0)
    }

    /// Generate a random u32 in the given range.
    pub fn gen_range(&mut self, range: std::ops::Range<u32>) -> u32 {
        self.inner.gen_range(range)
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG state stored alongside battle snapshots.
///
/// Uses the ChaCha8 word position, so capture cost does not grow with
/// the number of rolls made.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    pub word_pos: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_range(0..1000), rng2.gen_range(0..1000));
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = GameRng::new(1);
        let mut rng2 = GameRng::new(2);

        let seq1: Vec<_> = (0..10).map(|_| rng1.gen_range(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| rng2.gen_range(0..1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_roll_extremes() {
        let mut rng = GameRng::new(3);
        for _ in 0..50 {
            assert!(!rng.roll(0.0));
            assert!(rng.roll(1.0));
            assert!(rng.roll_percent(150)); // clamped to certain
            assert!(!rng.roll_percent(-20));
        }
    }

    #[test]
    fn test_roll_rate() {
        let mut rng = GameRng::new(99);
        let hits = (0..10_000).filter(|_| rng.roll(0.15)).count();
        let rate = hits as f64 / 10_000.0;
        assert!((rate - 0.15).abs() < 0.02, "rate was {rate}");
    }

    #[test]
    fn test_context_is_deterministic() {
        let rng1 = GameRng::new(42);
        let rng2 = GameRng::new(42);

        let mut ctx1 = rng1.for_context("room-code");
        let mut ctx2 = rng2.for_context("room-code");
        let mut other = rng1.for_context("bot-deck");

        let seq1: Vec<_> = (0..10).map(|_| ctx1.gen_range(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| ctx2.gen_range(0..1000)).collect();
        let seq3: Vec<_> = (0..10).map(|_| other.gen_range(0..1000)).collect();

        assert_eq!(seq1, seq2);
        assert_ne!(seq1, seq3);
    }

    #[test]
    fn test_choose() {
        let mut rng = GameRng::new(42);
        let items = vec![1, 2, 3, 4, 5];

        let chosen = rng.choose(&items);
        assert!(items.contains(chosen.unwrap()));

        let empty: Vec<i32> = vec![];
        assert!(rng.choose(&empty).is_none());
    }

    #[test]
    fn test_state_restores_stream() {
        let mut rng = GameRng::new(42);
        for _ in 0..100 {
            rng.roll(0.5);
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.gen_range(0..1000)).collect();

        let mut restored = GameRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.gen_range(0..1000)).collect();

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_state_serde() {
        let state = GameRngState {
            seed: 42,
            word_pos: 12345,
        };

        let bytes = bincode::serialize(&state).unwrap();
        let deserialized: GameRngState = bincode::deserialize(&bytes).unwrap();

        assert_eq!(state, deserialized);
    }
}
