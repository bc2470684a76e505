//! Hand engine: the bluff-claim state machine.
//!
//! ## Key Types
//!
//! - `Hand`: claim plus append-only stakes
//! - `Stake`: one user's hidden cards
//! - `Settlement`: computed outcome of a check
//! - `HandView`: masked, counts-only view
//!
//! Lifecycle is `Open -> Resolved`. `check` is the single settlement
//! point; resolved hands reject both `stake` and `check`.

pub mod engine;
pub mod hand;

pub use engine::{check, get_hand, get_hands, stake, start_hand};
pub use hand::{Award, Hand, HandView, MaskedStake, Settlement, Stake};
