//! Buying cards with balance.
//!
//! Each whole unit of `amount` converts to one random card. The
//! fractional part of `amount` is never charged.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use super::source::CardSource;
use crate::core::{money, Card, EngineConfig, Store, UserId};
use crate::error::{EngineError, EngineResult};
use crate::ledger::accounts::require_positive;

/// Spend `floor(amount)` of the caller's balance on that many random cards.
///
/// Fails before drawing if `amount` is not positive, exceeds the balance,
/// or would draw more than `config.max_cards_per_purchase` cards.
pub fn buy_cards(
    store: &mut Store,
    config: &EngineConfig,
    source: &mut dyn CardSource,
    caller: &UserId,
    amount: Decimal,
) -> EngineResult<Vec<Card>> {
    require_positive(amount, "purchase amount")?;

    let balance = store.user_mut(caller)?.balance;
    if amount > balance {
        return Err(EngineError::invalid(format!(
            "purchase amount {amount} exceeds balance {balance}"
        )));
    }

    let whole = amount.floor();
    let limit = config.max_cards_per_purchase;
    let count = whole
        .to_u64()
        .filter(|&count| count <= limit)
        .ok_or_else(|| {
            EngineError::invalid(format!(
                "purchase of {whole} cards exceeds the limit of {limit}"
            ))
        })?;
    money::sub(balance, whole)?;
    let spent = money::add(store.supply().total_spent_on_cards, whole)?;
    let minted = store
        .supply()
        .cards_minted
        .checked_add(count)
        .ok_or_else(|| EngineError::invalid("card supply counter overflow"))?;
    let draws = usize::try_from(count)
        .map_err(|_| EngineError::invalid(format!("purchase of {count} cards is too large")))?;

    let drawn = source.draw_many(draws);
    let user = store.user_mut(caller)?;
    user.debit(whole)?;
    user.add_cards(drawn.iter().copied());

    let supply = store.supply_mut();
    supply.total_spent_on_cards = spent;
    supply.cards_minted = minted;

    debug!(user = %caller, count, "bought cards");
    Ok(drawn)
}
