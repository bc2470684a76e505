//! Engine state: the explicit store every operation reads and writes.
//!
//! ## Store
//!
//! - Users, hands and offers keyed by id
//! - Id counters for hands and offers
//! - Supply counters for auditing conservation
//!
//! Uses `im` persistent maps so a whole store clones in O(1). The
//! dispatcher relies on this to apply each call to a draft and commit it
//! only on success.

use im::OrdMap;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::card::Card;
use super::id::{HandId, OfferId, UserId};
use super::money;
use crate::auction::Offer;
use crate::error::{EngineError, EngineResult};
use crate::hands::Hand;
use crate::ledger::User;

/// Totals of value that entered or left circulation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyCounters {
    /// Deposits plus starting balances granted.
    #[serde(with = "super::money::exact")]
    pub total_deposited: Decimal,
    /// Balance converted into cards.
    #[serde(with = "super::money::exact")]
    pub total_spent_on_cards: Decimal,
    /// Cards created by purchases.
    pub cards_minted: u64,
}

/// Complete engine state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    users: OrdMap<UserId, User>,
    hands: OrdMap<HandId, Hand>,
    offers: OrdMap<OfferId, Offer>,
    hands_created: u64,
    offers_created: u64,
    supply: SupplyCounters,
}

impl Store {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Users ===

    /// Get a user.
    #[must_use]
    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.get(id)
    }

    /// Get a mutable user, failing with `NotFound` if unregistered.
    pub fn user_mut(&mut self, id: &UserId) -> EngineResult<&mut User> {
        self.users
            .get_mut(id)
            .ok_or_else(|| EngineError::not_found("user", id))
    }

    /// Iterate over users in id order.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    /// Insert or replace a user.
    pub fn insert_user(&mut self, user: User) {
        self.users.insert(user.user_id.clone(), user);
    }

    // === Hands ===

    /// Get a hand.
    #[must_use]
    pub fn hand(&self, id: &HandId) -> Option<&Hand> {
        self.hands.get(id)
    }

    /// Get a mutable hand.
    pub fn hand_mut(&mut self, id: &HandId) -> Option<&mut Hand> {
        self.hands.get_mut(id)
    }

    /// Iterate over hands in creation order.
    pub fn hands(&self) -> impl Iterator<Item = &Hand> {
        self.hands.values()
    }

    /// Allocate the next hand id.
    pub fn alloc_hand_id(&mut self) -> HandId {
        self.hands_created += 1;
        HandId::from_sequence(self.hands_created)
    }

    /// Insert or replace a hand.
    pub fn insert_hand(&mut self, hand: Hand) {
        self.hands.insert(hand.hand_id.clone(), hand);
    }

    // === Offers ===

    /// Get an offer.
    #[must_use]
    pub fn offer(&self, id: &OfferId) -> Option<&Offer> {
        self.offers.get(id)
    }

    /// Get a mutable offer.
    pub fn offer_mut(&mut self, id: &OfferId) -> Option<&mut Offer> {
        self.offers.get_mut(id)
    }

    /// Iterate over offers in creation order.
    pub fn offers(&self) -> impl Iterator<Item = &Offer> {
        self.offers.values()
    }

    /// Allocate the next offer id.
    pub fn alloc_offer_id(&mut self) -> OfferId {
        self.offers_created += 1;
        OfferId::from_sequence(self.offers_created)
    }

    /// Insert or replace an offer.
    pub fn insert_offer(&mut self, offer: Offer) {
        self.offers.insert(offer.offer_id.clone(), offer);
    }

    // === Supply ===

    #[must_use]
    pub fn supply(&self) -> &SupplyCounters {
        &self.supply
    }

    pub fn supply_mut(&mut self) -> &mut SupplyCounters {
        &mut self.supply
    }

    // === Audit ===

    /// Sum of all user balances.
    pub fn total_balance(&self) -> EngineResult<Decimal> {
        money::sum(self.users.values().map(|user| user.balance))
    }

    /// Funds held in escrow by open offers.
    pub fn escrowed_funds(&self) -> EngineResult<Decimal> {
        money::sum(self.offers.values().map(Offer::escrowed_funds))
    }

    /// Count every card by value, wherever it sits: inventories,
    /// hand stakes and open offer escrows.
    #[must_use]
    pub fn card_census(&self) -> FxHashMap<Card, usize> {
        let mut census = FxHashMap::default();
        let mut count = |cards: &[Card]| {
            for &card in cards {
                *census.entry(card).or_insert(0) += 1;
            }
        };

        for user in self.users.values() {
            count(&user.cards);
        }
        for hand in self.hands.values() {
            for stake in &hand.stakes {
                count(&stake.cards);
            }
        }
        for offer in self.offers.values().filter(|o| !o.is_resolved) {
            count(&offer.cards);
        }
        census
    }

    /// Total number of cards in existence.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.card_census().values().sum()
    }

    /// Verify funds and card conservation against the supply counters.
    pub fn audit(&self) -> EngineResult<()> {
        let held = self.users.values().map(|user| user.balance);
        let escrowed = self.offers.values().map(Offer::escrowed_funds);
        let (whole, fraction) = split_total(held.chain(escrowed))?;
        let issued = money::sub(self.supply.total_deposited, self.supply.total_spent_on_cards)?;
        if (whole, fraction) != (issued.floor(), issued - issued.floor()) {
            return Err(EngineError::invalid(format!(
                "funds out of balance: {whole} + {fraction} circulating, {issued} issued"
            )));
        }

        let cards = self.card_count() as u64;
        if cards != self.supply.cards_minted {
            return Err(EngineError::invalid(format!(
                "cards out of balance: {cards} held, {} minted",
                self.supply.cards_minted
            )));
        }

        if let Some(user) = self.users.values().find(|u| u.balance < Decimal::ZERO) {
            return Err(EngineError::invalid(format!(
                "negative balance for {}",
                user.user_id
            )));
        }
        Ok(())
    }

    // === Snapshots ===

    /// Encode the full store for durable storage.
    pub fn to_snapshot(&self) -> EngineResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a store written by [`Store::to_snapshot`].
    pub fn from_snapshot(bytes: &[u8]) -> EngineResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Sum amounts as `(whole, fraction)` with `0 <= fraction < 1`.
///
/// Keeps the total exact even when whole units and fine fractions held
/// by different users could not share one `Decimal`.
fn split_total(amounts: impl IntoIterator<Item = Decimal>) -> EngineResult<(Decimal, Decimal)> {
    let mut whole = Decimal::ZERO;
    let mut fraction = Decimal::ZERO;
    for amount in amounts {
        let units = amount.floor();
        whole = money::add(whole, units)?;
        fraction = money::add(fraction, amount - units)?;

        let carry = fraction.floor();
        whole = money::add(whole, carry)?;
        fraction -= carry;
    }
    Ok((whole, fraction))
}
