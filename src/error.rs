//! Error types for battle operations.
//!
//! Each collaborator boundary has its own enum so callers can match on the
//! failure they care about; `BattleError` unifies them for the session facade.

use thiserror::Error;

/// Deck construction failed before any battle state was created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    /// Deck does not have exactly the configured number of cards.
    #[error("deck must contain exactly {expected} cards, found {found}")]
    WrongSize { expected: usize, found: usize },

    /// Deck references a card the catalog does not know.
    #[error("card `{0}` is not in the catalog")]
    UnknownCard(String),

    /// The same card name appears twice in one deck.
    #[error("card `{0}` appears more than once in the deck")]
    DuplicateCard(String),

    /// Upgrade list longer than allowed.
    #[error("card `{card}` has {count} upgrades, at most {max} allowed")]
    TooManyUpgrades { card: String, count: usize, max: usize },
}

/// An intent was rejected. The battle state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("the battle is over")]
    BattleOver,

    #[error("it is not your turn")]
    NotYourTurn,

    /// The intent does not apply to the current phase (e.g. a target before an attacker).
    #[error("`{intent}` is not allowed while {phase}")]
    WrongPhase { intent: &'static str, phase: &'static str },

    #[error("no card named `{0}` on this side")]
    UnknownCard(String),

    /// Card is dead, acted last turn, frozen or feared.
    #[error("card `{0}` cannot act this turn")]
    NotEligible(String),

    #[error("`{0}` is not a legal target")]
    InvalidTarget(String),

    #[error("`{0}` is invisible and cannot be attacked")]
    TargetInvisible(String),

    #[error("card `{0}` has no ability")]
    NoAbility(String),

    #[error("ability of `{card}` is on cooldown for {remaining} more turn(s)")]
    AbilityOnCooldown { card: String, remaining: u32 },

    #[error("no rune available this turn")]
    RuneUnavailable,

    #[error("a rune was already used this turn")]
    RuneAlreadyUsed,
}

/// Failures talking to the room directory.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("room {0} does not exist")]
    RoomNotFound(String),

    /// Room was deleted by the peer or at battle end.
    #[error("room {0} was closed")]
    RoomClosed(String),

    #[error("room {0} already has a guest")]
    RoomFull(String),

    #[error("room {code} is {status}, expected {expected}")]
    WrongStatus {
        code: String,
        status: &'static str,
        expected: &'static str,
    },

    #[error("room record could not be encoded: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Failures loading or saving a battle snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Snapshot bytes could not be decoded. The slot has been cleared.
    #[error("snapshot is corrupt: {0}")]
    Corrupt(#[from] bincode::Error),

    #[error("snapshot slot I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Any error surfaced by the battle session.
#[derive(Debug, Error)]
pub enum BattleError {
    #[error(transparent)]
    Deck(#[from] DeckError),

    #[error(transparent)]
    Intent(#[from] IntentError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Result alias defaulting to `BattleError`.
pub type Result<T, E = BattleError> = std::result::Result<T, E>;
