//! Battle deck construction from a user profile.
//!
//! The profile store is an external collaborator; the engine only needs the
//! current deck (card names) and each card's upgrade list.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::attributes::Upgrade;
use super::instance::CardInstance;
use super::registry::CardCatalog;
use crate::core::BattleConfig;
use crate::error::DeckError;

/// Read access to the user's profile.
pub trait ProfileStore {
    /// Names of the cards in the current deck.
    fn deck(&self) -> Vec<String>;

    /// Upgrades bought for a card, in purchase order.
    fn upgrades(&self, card: &str) -> Vec<Upgrade>;
}

/// In-memory profile, also the shape persisted by the profile service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub deck: Vec<String>,
    #[serde(default)]
    pub card_upgrades: FxHashMap<String, Vec<Upgrade>>,
}

impl Profile {
    #[must_use]
    pub fn new<S: Into<String>>(deck: impl IntoIterator<Item = S>) -> Self {
        Self {
            deck: deck.into_iter().map(Into::into).collect(),
            card_upgrades: FxHashMap::default(),
        }
    }

    /// Add upgrades for a card (builder pattern).
    #[must_use]
    pub fn with_upgrades(mut self, card: impl Into<String>, upgrades: Vec<Upgrade>) -> Self {
        self.card_upgrades.insert(card.into(), upgrades);
        self
    }
}

impl ProfileStore for Profile {
    fn deck(&self) -> Vec<String> {
        self.deck.clone()
    }

    fn upgrades(&self, card: &str) -> Vec<Upgrade> {
        self.card_upgrades.get(card).cloned().unwrap_or_default()
    }
}

/// Check deck size and name uniqueness.
pub fn validate_deck_names(names: &[String], config: &BattleConfig) -> Result<(), DeckError> {
    if names.len() != config.deck_size {
        return Err(DeckError::WrongSize {
            expected: config.deck_size,
            found: names.len(),
        });
    }

    let mut seen = FxHashSet::default();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(DeckError::DuplicateCard(name.clone()));
        }
    }
    Ok(())
}

/// Build combat-ready instances for a list of card names.
pub fn build_cards(
    catalog: &impl CardCatalog,
    names: &[String],
    upgrades: impl Fn(&str) -> Vec<Upgrade>,
    config: &BattleConfig,
) -> Result<Vec<CardInstance>, DeckError> {
    validate_deck_names(names, config)?;

    names
        .iter()
        .map(|name| {
            let def = catalog
                .get_card(name)
                .ok_or_else(|| DeckError::UnknownCard(name.clone()))?;
            CardInstance::from_definition(def, &upgrades(name), config.max_upgrades)
        })
        .collect()
}

/// Build the player's battle deck from the profile.
///
/// Fails before any battle state exists if the deck is not exactly
/// `deck_size` distinct catalog cards.
pub fn build_deck(
    catalog: &impl CardCatalog,
    profile: &impl ProfileStore,
    config: &BattleConfig,
) -> Result<Vec<CardInstance>, DeckError> {
    let names = profile.deck();
    let deck = build_cards(catalog, &names, |name| profile.upgrades(name), config)?;
    log::debug!("built deck {:?}", names);
    Ok(deck)
}
