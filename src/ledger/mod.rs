//! Account ledger: identity, bio, balance, points and card inventory.
//!
//! ## Key Types
//!
//! - `User`: one registered identity and its holdings
//!
//! Operations take the `Store` explicitly; none of them touch global state.

pub mod accounts;
pub mod user;

pub use accounts::{deposit, get_my_cards, get_user, get_users, register};
pub use user::User;
