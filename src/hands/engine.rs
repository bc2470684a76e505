//! Hand operations: open, stake, check.

use rust_decimal::Decimal;
use tracing::debug;

use super::hand::{Hand, Settlement};
use crate::core::card::{require_cards, Card};
use crate::core::{money, EngineConfig, HandId, Store, UserId};
use crate::error::{EngineError, EngineResult};

fn open_hand<'a>(store: &'a mut Store, hand_id: &HandId) -> EngineResult<&'a mut Hand> {
    let hand = store
        .hand_mut(hand_id)
        .ok_or_else(|| EngineError::not_found("hand", hand_id))?;
    if hand.is_resolved {
        return Err(EngineError::already_resolved("hand", hand_id));
    }
    Ok(hand)
}

/// Open a hand claiming `claim`, staking `cards` from the caller's inventory.
pub fn start_hand(
    store: &mut Store,
    caller: &UserId,
    claim: Card,
    cards: &[Card],
) -> EngineResult<Hand> {
    require_cards(cards)?;

    let staked = store.user_mut(caller)?.take_cards(cards)?;
    let hand_id = store.alloc_hand_id();
    let hand = Hand::new(hand_id, caller.clone(), claim, staked);
    store.insert_hand(hand.clone());

    debug!(hand = %hand.hand_id, creator = %caller, claim = %claim, "hand opened");
    Ok(hand)
}

/// Add a stake to an open hand.
pub fn stake(
    store: &mut Store,
    caller: &UserId,
    hand_id: &HandId,
    cards: &[Card],
) -> EngineResult<Hand> {
    open_hand(store, hand_id)?;
    require_cards(cards)?;

    let staked = store.user_mut(caller)?.take_cards(cards)?;
    let hand = open_hand(store, hand_id)?;
    hand.push_stake(caller.clone(), staked);
    Ok(hand.clone())
}

/// Challenge a hand: reveal its last stake, pay out, resolve it.
///
/// Returns whether a bluff was found.
pub fn check(
    store: &mut Store,
    config: &EngineConfig,
    caller: &UserId,
    hand_id: &HandId,
) -> EngineResult<bool> {
    let settlement = open_hand(store, hand_id)?.settle(caller, &config.rewards)?;
    apply_settlement(store, &settlement)?;
    if let Some(hand) = store.hand_mut(hand_id) {
        hand.is_resolved = true;
    }

    debug!(
        hand = %hand_id,
        challenger = %caller,
        bluff = settlement.bluff,
        awards = settlement.awards.len(),
        "hand checked"
    );
    Ok(settlement.bluff)
}

/// Move points for a settlement. Every account and every new total is
/// checked before the first update.
fn apply_settlement(store: &mut Store, settlement: &Settlement) -> EngineResult<()> {
    let mut deltas: Vec<(&UserId, Decimal)> = Vec::with_capacity(settlement.awards.len() + 1);
    let entries = std::iter::once((&settlement.challenger, settlement.challenger_delta))
        .chain(settlement.awards.iter().map(|award| (&award.user_id, award.points)));
    for (user_id, points) in entries {
        match deltas.iter_mut().find(|(id, _)| *id == user_id) {
            Some((_, total)) => *total = money::add(*total, points)?,
            None => deltas.push((user_id, points)),
        }
    }

    for (user_id, delta) in &deltas {
        let user = store
            .user(user_id)
            .ok_or_else(|| EngineError::not_found("user", user_id))?;
        money::add(user.points, *delta)?;
    }
    for (user_id, delta) in deltas {
        store.user_mut(user_id)?.add_points(delta)?;
    }
    Ok(())
}

/// Look up one hand.
#[must_use]
pub fn get_hand(store: &Store, hand_id: &HandId) -> Option<Hand> {
    store.hand(hand_id).cloned()
}

/// All hands, in creation order.
#[must_use]
pub fn get_hands(store: &Store) -> Vec<Hand> {
    store.hands().cloned().collect()
}
