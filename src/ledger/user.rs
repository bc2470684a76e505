//! User accounts: balance, points and card inventory.
//!
//! `User` owns the unstaked, unoffered cards of one identity. Cards and
//! funds leave the inventory through `take_cards` / `debit`, both of which
//! check before they mutate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::card::{tally, Card, CardList};
use crate::core::{money, UserId};
use crate::error::{EngineError, EngineResult};

/// A registered player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identity supplied by the authentication layer.
    pub user_id: UserId,

    /// Free-text profile, non-empty.
    pub bio: String,

    /// Spendable funds. Never negative.
    #[serde(with = "crate::core::money::exact")]
    pub balance: Decimal,

    /// Score accumulated from hand settlements. May go negative.
    #[serde(default, with = "crate::core::money::exact")]
    pub points: Decimal,

    /// Cards held in inventory (not staked, not offered).
    pub cards: Vec<Card>,
}

impl User {
    /// Create a user with the given starting balance and no cards.
    #[must_use]
    pub fn new(user_id: UserId, bio: impl Into<String>, balance: Decimal) -> Self {
        Self {
            user_id,
            bio: bio.into(),
            balance,
            points: Decimal::ZERO,
            cards: Vec::new(),
        }
    }

    /// Add funds. Callers validate that `amount` is positive.
    ///
    /// Fails with `InvalidInput`, leaving the balance as it was, when the
    /// new balance would overflow.
    pub fn credit(&mut self, amount: Decimal) -> EngineResult<()> {
        self.balance = money::add(self.balance, amount)?;
        Ok(())
    }

    /// Check that `amount` can be credited.
    pub fn ensure_credit(&self, amount: Decimal) -> EngineResult<()> {
        money::add(self.balance, amount).map(|_| ())
    }

    /// Remove funds, failing if the balance would go negative.
    pub fn debit(&mut self, amount: Decimal) -> EngineResult<()> {
        self.ensure_funds(amount)?;
        self.balance = money::sub(self.balance, amount)?;
        Ok(())
    }

    /// Check that `amount` can be debited.
    pub fn ensure_funds(&self, amount: Decimal) -> EngineResult<()> {
        if self.balance < amount {
            return Err(EngineError::InsufficientFunds {
                needed: amount,
                available: self.balance,
            });
        }
        Ok(())
    }

    /// Add cards to inventory.
    pub fn add_cards(&mut self, new_cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(new_cards);
    }

    /// Check that the inventory contains `wanted` as a multiset.
    ///
    /// Reports the first short card in domain order.
    pub fn ensure_cards(&self, wanted: &[Card]) -> EngineResult<()> {
        let have = tally(&self.cards);
        let need = tally(wanted);

        for card in Card::ALL {
            let needed = need.get(&card).copied().unwrap_or(0);
            let held = have.get(&card).copied().unwrap_or(0);
            if needed > held {
                return Err(EngineError::InsufficientCards {
                    missing: card,
                    count: needed - held,
                });
            }
        }
        Ok(())
    }

    /// Remove the multiset `wanted` from inventory.
    ///
    /// All-or-nothing: the inventory is untouched on error.
    pub fn take_cards(&mut self, wanted: &[Card]) -> EngineResult<CardList> {
        self.ensure_cards(wanted)?;

        for card in wanted {
            if let Some(pos) = self.cards.iter().position(|c| c == card) {
                self.cards.remove(pos);
            }
        }
        Ok(CardList::from_slice(wanted))
    }

    /// Adjust points by a signed delta, failing on overflow.
    pub fn add_points(&mut self, delta: Decimal) -> EngineResult<()> {
        self.points = money::add(self.points, delta)?;
        Ok(())
    }
}
