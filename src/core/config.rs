//! Engine configuration.
//!
//! Hosts configure the engine at startup with an `EngineConfig`:
//! - `RegistrationPolicy`: what a second `register_user` from the same identity does
//! - `RewardSchedule`: per-card points paid out when a hand is checked
//! - starting balance and the default RNG seed
//!
//! Defaults follow the published rules. The config is serde-friendly so
//! a host can keep it in a JSON file.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

/// What happens when an already-registered identity registers again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationPolicy {
    /// Fail with `InvalidInput`.
    #[default]
    Reject,
    /// Return the stored profile unchanged.
    ReturnExisting,
}

/// Per-card rewards paid to stakers when a hand settles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardSchedule {
    /// Card that matches the claim (or is a joker).
    pub honest_card: Decimal,

    /// Non-matching card that was never revealed.
    pub uncaught_bluff_card: Decimal,
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            honest_card: Decimal::ONE,
            uncaught_bluff_card: Decimal::new(12, 1),
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Balance granted on registration.
    pub starting_balance: Decimal,

    /// Duplicate registration handling.
    pub registration: RegistrationPolicy,

    /// Hand settlement rewards.
    pub rewards: RewardSchedule,

    /// Seed for the built-in card source.
    pub seed: u64,

    /// Largest number of cards one `buy_cards` call may draw.
    pub max_cards_per_purchase: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_balance: Decimal::ZERO,
            registration: RegistrationPolicy::default(),
            rewards: RewardSchedule::default(),
            seed: 0,
            max_cards_per_purchase: 10_000,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the balance granted on registration.
    #[must_use]
    pub fn with_starting_balance(mut self, balance: Decimal) -> Self {
        self.starting_balance = balance;
        self
    }

    /// Set the duplicate registration policy.
    #[must_use]
    pub fn with_registration(mut self, policy: RegistrationPolicy) -> Self {
        self.registration = policy;
        self
    }

    /// Set the settlement rewards.
    #[must_use]
    pub fn with_rewards(mut self, rewards: RewardSchedule) -> Self {
        self.rewards = rewards;
        self
    }

    /// Set the seed for the built-in card source.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Cap the number of cards a single purchase may draw.
    #[must_use]
    pub fn with_max_cards_per_purchase(mut self, max: u64) -> Self {
        self.max_cards_per_purchase = max;
        self
    }
}
