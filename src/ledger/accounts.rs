//! Account operations: registration, deposits and reads.

use rust_decimal::Decimal;
use tracing::debug;

use super::user::User;
use crate::core::{money, Card, EngineConfig, RegistrationPolicy, Store, UserId};
use crate::error::{EngineError, EngineResult};

/// Reject zero, negative amounts.
pub(crate) fn require_positive(amount: Decimal, what: &str) -> EngineResult<()> {
    if amount <= Decimal::ZERO {
        return Err(EngineError::invalid(format!("{what} must be positive, got {amount}")));
    }
    Ok(())
}

/// Register `caller` with a bio.
///
/// A second registration is handled per `config.registration`.
pub fn register(
    store: &mut Store,
    config: &EngineConfig,
    caller: &UserId,
    bio: &str,
) -> EngineResult<User> {
    if caller.is_blank() {
        return Err(EngineError::invalid("caller identity is empty"));
    }
    if bio.trim().is_empty() {
        return Err(EngineError::invalid("bio must not be empty"));
    }

    if let Some(existing) = store.user(caller) {
        return match config.registration {
            RegistrationPolicy::Reject => Err(EngineError::invalid(format!(
                "user {caller} is already registered"
            ))),
            RegistrationPolicy::ReturnExisting => Ok(existing.clone()),
        };
    }

    let deposited = money::add(store.supply().total_deposited, config.starting_balance)?;
    let user = User::new(caller.clone(), bio, config.starting_balance);
    store.supply_mut().total_deposited = deposited;
    store.insert_user(user.clone());
    debug!(user = %caller, "registered user");
    Ok(user)
}

/// Add `amount` to the caller's balance.
pub fn deposit(store: &mut Store, caller: &UserId, amount: Decimal) -> EngineResult<()> {
    require_positive(amount, "deposit amount")?;

    let deposited = money::add(store.supply().total_deposited, amount)?;
    store.user_mut(caller)?.credit(amount)?;
    store.supply_mut().total_deposited = deposited;
    Ok(())
}

/// Look up one user.
#[must_use]
pub fn get_user(store: &Store, id: &UserId) -> Option<User> {
    store.user(id).cloned()
}

/// All users, ordered by id.
#[must_use]
pub fn get_users(store: &Store) -> Vec<User> {
    store.users().cloned().collect()
}

/// The caller's inventory, empty when unregistered.
#[must_use]
pub fn get_my_cards(store: &Store, caller: &UserId) -> Vec<Card> {
    store
        .user(caller)
        .map(|user| user.cards.clone())
        .unwrap_or_default()
}
