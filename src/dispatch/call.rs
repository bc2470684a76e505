//! Call representation: method name + typed parameters.
//!
//! Calls arrive as a method name and a JSON params object, exactly as
//! the client sends them:
//!
//! ```
//! use escalate_engine::dispatch::Call;
//! use serde_json::json;
//!
//! let call = Call::from_method("check", json!({ "hand_id": "hand-000001" })).unwrap();
//! assert_eq!(call.method(), "check");
//! assert!(!call.is_read_only());
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::core::{Card, HandId, OfferId, UserId};
use crate::error::EngineResult;

/// A decoded call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "snake_case")]
pub enum Call {
    RegisterUser { bio: String },
    Deposit { amount: Decimal },
    BuyCards { amount: Decimal },
    GetUsers {},
    GetUser { id: UserId },
    GetMyCards {},
    StartHand { claim: Card, cards: Vec<Card> },
    Stake { hand_id: HandId, cards: Vec<Card> },
    Check { hand_id: HandId },
    GetHands {},
    GetHand { id: HandId },
    Offer { cards: Vec<Card>, amount: Decimal },
    GetOffers {},
    Bid {
        offer_id: OfferId,
        // The shipped client sends this key misspelled.
        #[serde(alias = "bid_amout")]
        bid_amount: Decimal,
    },
    Resolve { offer_id: OfferId },
    WithdrawBid { offer_id: OfferId },
}

impl Call {
    /// Decode a call from its method name and params.
    ///
    /// `null` params are treated as `{}`. Unknown methods, unknown card
    /// names and malformed params are `InvalidInput`.
    pub fn from_method(method: &str, params: Value) -> EngineResult<Self> {
        let params = match params {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        Ok(serde_json::from_value(json!({ "method": method, "params": params }))?)
    }

    /// Wire name of this call.
    #[must_use]
    pub fn method(&self) -> &'static str {
        match self {
            Call::RegisterUser { .. } => "register_user",
            Call::Deposit { .. } => "deposit",
            Call::BuyCards { .. } => "buy_cards",
            Call::GetUsers {} => "get_users",
            Call::GetUser { .. } => "get_user",
            Call::GetMyCards {} => "get_my_cards",
            Call::StartHand { .. } => "start_hand",
            Call::Stake { .. } => "stake",
            Call::Check { .. } => "check",
            Call::GetHands {} => "get_hands",
            Call::GetHand { .. } => "get_hand",
            Call::Offer { .. } => "offer",
            Call::GetOffers {} => "get_offers",
            Call::Bid { .. } => "bid",
            Call::Resolve { .. } => "resolve",
            Call::WithdrawBid { .. } => "withdraw_bid",
        }
    }

    /// Does this call only read state?
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Call::GetUsers {}
                | Call::GetUser { .. }
                | Call::GetMyCards {}
                | Call::GetHands {}
                | Call::GetHand { .. }
                | Call::GetOffers {}
        )
    }
}

/// A committed state-changing call, for audit and replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Position in the journal, starting at 1.
    pub sequence: u64,

    /// Identity that made the call.
    pub caller: UserId,

    /// The call applied.
    pub call: Call,
}

impl CallRecord {
    #[must_use]
    pub fn new(sequence: u64, caller: UserId, call: Call) -> Self {
        Self {
            sequence,
            caller,
            call,
        }
    }
}
