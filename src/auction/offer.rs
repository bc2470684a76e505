//! Auction offers.
//!
//! An offer holds its cards in escrow from creation until it resolves.
//! While open it holds at most one bid's funds, exactly `current_bid`,
//! on behalf of `current_bidder_id`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::card::CardList;
use crate::core::{OfferId, UserId};

/// A listed multiset of cards open for ascending bids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub offer_id: OfferId,
    pub creator_id: UserId,
    /// Escrowed cards.
    pub cards: CardList,
    #[serde(with = "crate::core::money::exact")]
    pub initial_price: Decimal,
    #[serde(default, with = "crate::core::money::exact_option")]
    pub current_bid: Option<Decimal>,
    pub current_bidder_id: Option<UserId>,
    pub is_resolved: bool,
}

impl Offer {
    #[must_use]
    pub fn new(offer_id: OfferId, creator_id: UserId, cards: CardList, initial_price: Decimal) -> Self {
        Self {
            offer_id,
            creator_id,
            cards,
            initial_price,
            current_bid: None,
            current_bidder_id: None,
            is_resolved: false,
        }
    }

    /// A bid must be strictly greater than this.
    #[must_use]
    pub fn bid_floor(&self) -> Decimal {
        self.current_bid
            .map_or(self.initial_price, |bid| bid.max(self.initial_price))
    }

    /// Funds currently held for the active bidder.
    #[must_use]
    pub fn escrowed_funds(&self) -> Decimal {
        if self.is_resolved {
            Decimal::ZERO
        } else {
            self.current_bid.unwrap_or(Decimal::ZERO)
        }
    }

    /// The active bid and its owner, if any.
    #[must_use]
    pub fn active_bid(&self) -> Option<(&UserId, Decimal)> {
        match (&self.current_bidder_id, self.current_bid) {
            (Some(bidder), Some(amount)) => Some((bidder, amount)),
            _ => None,
        }
    }

    /// Replace the active bid, returning the one it displaced.
    pub fn replace_bid(&mut self, bidder: UserId, amount: Decimal) -> Option<(UserId, Decimal)> {
        let previous = self.take_bid();
        self.current_bid = Some(amount);
        self.current_bidder_id = Some(bidder);
        previous
    }

    /// Clear the active bid, returning it.
    pub fn take_bid(&mut self) -> Option<(UserId, Decimal)> {
        let bidder = self.current_bidder_id.take();
        let amount = self.current_bid.take();
        bidder.zip(amount)
    }
}
