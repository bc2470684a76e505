//! # escalate-engine
//!
//! Deterministic state machine for a card-bluffing game with an
//! integrated auction market.
//!
//! ## Design Principles
//!
//! 1. **Explicit State**: Every operation takes the `Store` it reads and
//!    writes. There is no global state.
//!
//! 2. **Atomic Calls**: The dispatcher applies each call to a draft of the
//!    store and commits only on success. Errors never leave partial updates.
//!
//! 3. **Injected Randomness**: Card draws come from a `CardSource`, so
//!    tests and replays are fully deterministic.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) store cloning via `im-rs` makes
//!   draft-then-commit cheap.
//!
//! - **Exact Money**: Balances, bids and points use `rust_decimal`, so a
//!   `1.0 + 1.2` reward is exactly `2.2`.
//!
//! ## Modules
//!
//! - `core`: Cards, ids, configuration, RNG, checked money arithmetic, the store
//! - `error`: Typed engine errors
//! - `ledger`: User accounts, balances, inventories
//! - `supply`: Card purchases and card sources
//! - `hands`: Bluff hands and settlement
//! - `auction`: Offers, bids, escrow
//! - `dispatch`: Call decoding, routing, envelopes, journal

pub mod auction;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod hands;
pub mod ledger;
pub mod supply;

// Re-export commonly used types
pub use crate::core::{
    Card, CardList, EngineConfig, GameRng, GameRngState, HandId, OfferId, RegistrationPolicy,
    RewardSchedule, Store, SupplyCounters, UserId,
};

pub use crate::error::{EngineError, EngineResult, ErrorKind};

pub use crate::ledger::User;

pub use crate::supply::{CardSource, ScriptedSource};

pub use crate::hands::{Hand, HandView, Settlement, Stake};

pub use crate::auction::Offer;

pub use crate::dispatch::{Call, CallError, CallRecord, Dispatcher, Envelope, Reply};
