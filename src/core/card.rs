//! The fixed 14-value card domain.
//!
//! Thirteen ranks plus `Joker`. A joker matches any claimed rank when a
//! hand is checked. Cards carry no identity beyond their value, so
//! inventories, stakes and offer escrows are multisets of `Card`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{EngineError, EngineResult};

/// A playing card value.
///
/// Serialized by its upper-case name (`"ACE"`, `"QUEEN"`, `"JOKER"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Card {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Joker,
}

/// Small card list used by stakes, offers and call parameters.
///
/// Most stakes are a handful of cards, so these stay on the stack.
pub type CardList = SmallVec<[Card; 4]>;

impl Card {
    /// Every card value, in domain order.
    pub const ALL: [Card; 14] = [
        Card::Ace,
        Card::Two,
        Card::Three,
        Card::Four,
        Card::Five,
        Card::Six,
        Card::Seven,
        Card::Eight,
        Card::Nine,
        Card::Ten,
        Card::Jack,
        Card::Queen,
        Card::King,
        Card::Joker,
    ];

    /// Size of the card domain.
    pub const COUNT: usize = Self::ALL.len();

    /// Card at a domain index (`0..Card::COUNT`).
    #[must_use]
    pub fn from_index(index: usize) -> Option<Card> {
        Self::ALL.get(index).copied()
    }

    /// Position of this card in [`Card::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Upper-case wire name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Card::Ace => "ACE",
            Card::Two => "TWO",
            Card::Three => "THREE",
            Card::Four => "FOUR",
            Card::Five => "FIVE",
            Card::Six => "SIX",
            Card::Seven => "SEVEN",
            Card::Eight => "EIGHT",
            Card::Nine => "NINE",
            Card::Ten => "TEN",
            Card::Jack => "JACK",
            Card::Queen => "QUEEN",
            Card::King => "KING",
            Card::Joker => "JOKER",
        }
    }

    /// Does this card support a claim of `claim`?
    ///
    /// Jokers match everything.
    #[must_use]
    pub fn matches(self, claim: Card) -> bool {
        self == claim || self == Card::Joker
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Card {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Card::ALL
            .iter()
            .copied()
            .find(|card| card.name() == s)
            .ok_or_else(|| EngineError::invalid(format!("Unsupported card value: {s}")))
    }
}

/// Count occurrences of each card value.
#[must_use]
pub fn tally(cards: &[Card]) -> FxHashMap<Card, usize> {
    let mut counts = FxHashMap::default();
    for &card in cards {
        *counts.entry(card).or_insert(0) += 1;
    }
    counts
}

/// Reject an empty card list.
pub fn require_cards(cards: &[Card]) -> EngineResult<()> {
    if cards.is_empty() {
        return Err(EngineError::invalid("at least one card is required"));
    }
    Ok(())
}
