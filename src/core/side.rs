//! Battle sides and per-side storage.
//!
//! ## Side
//!
//! Every battle has exactly two sides. `Player` is always the local user;
//! `Opponent` is the scripted bot or, online, the remote peer.
//!
//! ## SideMap
//!
//! Fixed two-slot storage indexed by `Side`.
//!
//! ## CardRef
//!
//! Card names are only unique within one deck, so anything that tracks a
//! card across both decks keys it by `(side, name)`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two sides of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    /// Both sides, player first.
    pub const BOTH: [Side; 2] = [Side::Player, Side::Opponent];

    /// The other side.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    /// Slot index (player = 0).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Opponent => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Opponent => write!(f, "opponent"),
        }
    }
}

/// Role of the local client in an online room.
///
/// The host always moves first in each round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeerRole {
    Host,
    Guest,
}

impl PeerRole {
    /// The side that opens every round from this client's point of view.
    #[must_use]
    pub const fn first_mover(self) -> Side {
        match self {
            PeerRole::Host => Side::Player,
            PeerRole::Guest => Side::Opponent,
        }
    }

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            PeerRole::Host => PeerRole::Guest,
            PeerRole::Guest => PeerRole::Host,
        }
    }
}

/// A card on the battlefield, identified by side and name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardRef {
    pub side: Side,
    pub name: String,
}

impl CardRef {
    #[must_use]
    pub fn new(side: Side, name: impl Into<String>) -> Self {
        Self {
            side,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for CardRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.side, self.name)
    }
}

/// Per-side data storage.
///
/// ## Example
///
/// ```
/// use card_duel::core::{Side, SideMap};
///
/// let mut wins: SideMap<u32> = SideMap::with_value(0);
/// wins[Side::Opponent] += 1;
/// assert_eq!(wins[Side::Player], 0);
/// assert_eq!(wins[Side::Opponent], 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: [T; 2],
}

impl<T> SideMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(Side) -> T) -> Self {
        Self {
            data: [factory(Side::Player), factory(Side::Opponent)],
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        &self.data[side.index()]
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        &mut self.data[side.index()]
    }

    /// Iterate over (Side, &T) pairs, player first.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::BOTH.into_iter().zip(self.data.iter())
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_other() {
        assert_eq!(Side::Player.other(), Side::Opponent);
        assert_eq!(Side::Opponent.other(), Side::Player);
        assert_eq!(format!("{}", Side::Player), "player");
    }

    #[test]
    fn test_first_mover() {
        assert_eq!(PeerRole::Host.first_mover(), Side::Player);
        assert_eq!(PeerRole::Guest.first_mover(), Side::Opponent);
        assert_eq!(PeerRole::Guest.other(), PeerRole::Host);
    }

    #[test]
    fn test_side_map_new() {
        let map = SideMap::new(|side| side.index() * 10);
        assert_eq!(map[Side::Player], 0);
        assert_eq!(map[Side::Opponent], 10);

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(Side::Player, &0), (Side::Opponent, &10)]);
    }

    #[test]
    fn test_card_ref_ordering() {
        let a = CardRef::new(Side::Player, "Zed");
        let b = CardRef::new(Side::Opponent, "Abe");
        assert!(a < b); // side first, then name
        assert_eq!(a.to_string(), "player:Zed");
    }

    #[test]
    fn test_side_map_serialization() {
        let map = SideMap::new(|side| side.index() as i32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: SideMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
