//! Bluff hands: claim, ordered stakes, settlement.
//!
//! A hand is `Open` until someone checks it, then `Resolved` forever.
//! Stakes are append-only; only the last one is ever revealed.
//!
//! ## Settlement
//!
//! Checking reveals the last stake. It is a bluff if any card in it is
//! neither the claimed rank nor a joker.
//!
//! | outcome  | challenger          | scored stakes           |
//! |----------|---------------------|-------------------------|
//! | bluff    | `+ |last|`          | every stake before last |
//! | no bluff | `- |last|`          | every stake             |
//!
//! Scored stakes earn, per card, the honest reward when the card matches
//! the claim and the uncaught-bluff reward otherwise.

use im::Vector;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::card::{Card, CardList};
use crate::core::config::RewardSchedule;
use crate::core::{money, HandId, UserId};
use crate::error::EngineResult;

/// One user's contribution to a hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stake {
    pub user_id: UserId,
    pub cards: CardList,
}

impl Stake {
    /// Does every card in this stake support `claim`?
    #[must_use]
    pub fn is_honest(&self, claim: Card) -> bool {
        self.cards.iter().all(|card| card.matches(claim))
    }

    /// Points this stake earns when it is scored.
    pub fn reward(&self, claim: Card, rewards: &RewardSchedule) -> EngineResult<Decimal> {
        money::sum(self.cards.iter().map(|card| {
            if card.matches(claim) {
                rewards.honest_card
            } else {
                rewards.uncaught_bluff_card
            }
        }))
    }
}

/// A bluff hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    pub hand_id: HandId,
    pub creator: UserId,
    pub claimed_card: Card,
    /// Stakes in arrival order. Never empty.
    pub stakes: Vector<Stake>,
    pub is_resolved: bool,
}

/// Points awarded to one staker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    pub user_id: UserId,
    pub points: Decimal,
}

/// Outcome of checking a hand, before it is applied to accounts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub bluff: bool,
    pub challenger: UserId,
    /// Signed points change for the challenger.
    pub challenger_delta: Decimal,
    /// One award per scored stake, in stake order.
    pub awards: Vec<Award>,
}

impl Hand {
    /// Open a hand with the creator's first stake.
    #[must_use]
    pub fn new(hand_id: HandId, creator: UserId, claimed_card: Card, cards: CardList) -> Self {
        let mut stakes = Vector::new();
        stakes.push_back(Stake {
            user_id: creator.clone(),
            cards,
        });
        Self {
            hand_id,
            creator,
            claimed_card,
            stakes,
            is_resolved: false,
        }
    }

    /// The most recent stake.
    #[must_use]
    pub fn last_stake(&self) -> Option<&Stake> {
        self.stakes.back()
    }

    /// Append a stake.
    pub fn push_stake(&mut self, user_id: UserId, cards: CardList) {
        self.stakes.push_back(Stake { user_id, cards });
    }

    /// Total number of cards staked across all entries.
    #[must_use]
    pub fn staked_card_count(&self) -> usize {
        self.stakes.iter().map(|stake| stake.cards.len()).sum()
    }

    /// Compute the settlement for `challenger` checking this hand.
    ///
    /// Pure: the hand is not modified. Fails only when a reward sum
    /// overflows.
    pub fn settle(&self, challenger: &UserId, rewards: &RewardSchedule) -> EngineResult<Settlement> {
        let claim = self.claimed_card;
        let (last_index, revealed) = match self.last_stake() {
            Some(last) => (self.stakes.len() - 1, last.cards.len()),
            None => (0, 0),
        };
        let revealed = Decimal::from(revealed);

        let bluff = self
            .last_stake()
            .map_or(false, |last| !last.is_honest(claim));

        let (challenger_delta, scored) = if bluff {
            (revealed, last_index)
        } else {
            (-revealed, self.stakes.len())
        };

        let awards = self
            .stakes
            .iter()
            .take(scored)
            .map(|stake| -> EngineResult<Award> {
                Ok(Award {
                    user_id: stake.user_id.clone(),
                    points: stake.reward(claim, rewards)?,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        Ok(Settlement {
            bluff,
            challenger: challenger.clone(),
            challenger_delta,
            awards,
        })
    }

    /// Public view: counts and order, cards hidden until resolved.
    #[must_use]
    pub fn masked(&self) -> HandView {
        HandView {
            hand_id: self.hand_id.clone(),
            creator: self.creator.clone(),
            claimed_card: self.claimed_card,
            stakes: self
                .stakes
                .iter()
                .map(|stake| MaskedStake {
                    user_id: stake.user_id.clone(),
                    card_count: stake.cards.len(),
                })
                .collect(),
            revealed: if self.is_resolved {
                self.last_stake().map(|stake| stake.cards.clone())
            } else {
                None
            },
            is_resolved: self.is_resolved,
        }
    }
}

/// A stake with its cards hidden.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskedStake {
    pub user_id: UserId,
    pub card_count: usize,
}

/// What other players may see of a hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandView {
    pub hand_id: HandId,
    pub creator: UserId,
    pub claimed_card: Card,
    pub stakes: Vec<MaskedStake>,
    /// The last stake's cards, once a check has revealed them.
    pub revealed: Option<CardList>,
    pub is_resolved: bool,
}
