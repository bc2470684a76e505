//! Core engine types: cards, ids, configuration, RNG, state.
//!
//! Everything here is shared by the ledger, hand and auction engines.
//! Hosts configure behavior via `EngineConfig` rather than modifying the core.

pub mod card;
pub mod config;
pub mod id;
pub mod money;
pub mod rng;
pub mod state;

pub use card::{Card, CardList};
pub use config::{EngineConfig, RegistrationPolicy, RewardSchedule};
pub use id::{HandId, OfferId, UserId};
pub use rng::{GameRng, GameRngState};
pub use state::{Store, SupplyCounters};
