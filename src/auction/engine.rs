//! Auction operations: offer, bid, withdraw, resolve.

use rust_decimal::Decimal;
use tracing::debug;

use super::offer::Offer;
use crate::core::card::{require_cards, Card};
use crate::core::{money, OfferId, Store, UserId};
use crate::error::{EngineError, EngineResult};
use crate::ledger::accounts::require_positive;

fn open_offer<'a>(store: &'a mut Store, offer_id: &OfferId) -> EngineResult<&'a mut Offer> {
    let offer = store
        .offer_mut(offer_id)
        .ok_or_else(|| EngineError::not_found("offer", offer_id))?;
    if offer.is_resolved {
        return Err(EngineError::already_resolved("offer", offer_id));
    }
    Ok(offer)
}

/// List `cards` for auction, escrowing them out of the caller's inventory.
pub fn offer(
    store: &mut Store,
    caller: &UserId,
    cards: &[Card],
    initial_price: Decimal,
) -> EngineResult<Offer> {
    require_cards(cards)?;
    require_positive(initial_price, "initial price")?;

    let escrowed = store.user_mut(caller)?.take_cards(cards)?;
    let offer_id = store.alloc_offer_id();
    let offer = Offer::new(offer_id, caller.clone(), escrowed, initial_price);
    store.insert_offer(offer.clone());

    debug!(offer = %offer.offer_id, creator = %caller, price = %initial_price, "offer listed");
    Ok(offer)
}

/// Place a bid above the current floor.
///
/// The bidder's funds move into escrow and the displaced bid, if any,
/// is refunded in the same step.
pub fn bid(store: &mut Store, caller: &UserId, offer_id: &OfferId, amount: Decimal) -> EngineResult<()> {
    let floor = open_offer(store, offer_id)?.bid_floor();
    if amount <= floor {
        return Err(EngineError::invalid(format!(
            "bid {amount} must be greater than {floor}"
        )));
    }
    let displaced = open_offer(store, offer_id)?
        .active_bid()
        .map(|(bidder, refund)| (bidder.clone(), refund));

    let bidder = store.user_mut(caller)?;
    bidder.ensure_funds(amount)?;
    let remaining = money::sub(bidder.balance, amount)?;
    match &displaced {
        Some((previous, refund)) if previous == caller => {
            money::add(remaining, *refund)?;
        }
        Some((previous, refund)) => store.user_mut(previous)?.ensure_credit(*refund)?,
        None => {}
    }

    store.user_mut(caller)?.debit(amount)?;
    if let Some((previous, refund)) = displaced {
        store.user_mut(&previous)?.credit(refund)?;
        debug!(offer = %offer_id, outbid = %previous, refund = %refund, "bid refunded");
    }
    open_offer(store, offer_id)?.replace_bid(caller.clone(), amount);
    Ok(())
}

/// Withdraw the caller's active bid and refund it.
pub fn withdraw_bid(store: &mut Store, caller: &UserId, offer_id: &OfferId) -> EngineResult<()> {
    let refund = match open_offer(store, offer_id)?.active_bid() {
        Some((bidder, amount)) if bidder == caller => amount,
        _ => {
            return Err(EngineError::forbidden(format!(
                "{caller} is not the current bidder on {offer_id}"
            )))
        }
    };

    store.user_mut(caller)?.credit(refund)?;
    open_offer(store, offer_id)?.take_bid();
    Ok(())
}

/// Close an offer. Only its creator may resolve it.
///
/// With a bid the cards go to the bidder and the funds to the creator;
/// without one the cards go back to the creator.
pub fn resolve(store: &mut Store, caller: &UserId, offer_id: &OfferId) -> EngineResult<()> {
    let offer = open_offer(store, offer_id)?;
    if &offer.creator_id != caller {
        return Err(EngineError::forbidden(format!(
            "only the creator may resolve {offer_id}"
        )));
    }

    let cards = offer.cards.clone();
    let creator = offer.creator_id.clone();
    let sale = offer
        .active_bid()
        .map(|(bidder, amount)| (bidder.clone(), amount));

    match sale {
        Some((buyer, amount)) => {
            if store.user(&buyer).is_none() {
                return Err(EngineError::not_found("user", &buyer));
            }
            store.user_mut(&creator)?.credit(amount)?;
            store.user_mut(&buyer)?.add_cards(cards);
            debug!(offer = %offer_id, buyer = %buyer, amount = %amount, "offer sold");
        }
        None => {
            store.user_mut(&creator)?.add_cards(cards);
            debug!(offer = %offer_id, "offer closed without bids");
        }
    }

    open_offer(store, offer_id)?.is_resolved = true;
    Ok(())
}

/// All offers, in creation order.
#[must_use]
pub fn get_offers(store: &Store) -> Vec<Offer> {
    store.offers().cloned().collect()
}
