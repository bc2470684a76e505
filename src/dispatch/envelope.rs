//! Result envelopes exchanged with clients.
//!
//! A call answers with exactly one of `{"Ok": payload}` or
//! `{"Err": {"kind": ..., "message": ...}}`. Hosts sometimes wrap that
//! again: inside a `txn_result` string, or with the Ok payload itself
//! JSON-encoded as a string. [`Envelope::from_wire`] peels those layers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auction::Offer;
use crate::core::Card;
use crate::error::{EngineError, EngineResult, ErrorKind};
use crate::hands::Hand;
use crate::ledger::User;

/// Typed payload of a successful call.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    User(User),
    MaybeUser(Option<User>),
    Users(Vec<User>),
    Cards(Vec<Card>),
    Hand(Hand),
    MaybeHand(Option<Hand>),
    Hands(Vec<Hand>),
    Offer(Offer),
    Offers(Vec<Offer>),
    /// Outcome of a challenge: `true` when the last stake was a bluff.
    Bluff(bool),
    /// Mutations with no payload serialize as `null`.
    Unit,
}

/// Failure half of an envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct CallError {
    /// Absent when the host only forwarded a bare message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    pub message: String,
}

impl From<&EngineError> for CallError {
    fn from(err: &EngineError) -> Self {
        Self {
            kind: Some(err.kind()),
            message: err.to_string(),
        }
    }
}

impl From<EngineError> for CallError {
    fn from(err: EngineError) -> Self {
        Self::from(&err)
    }
}

/// Exactly one of a payload or an error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Envelope {
    Ok(Value),
    Err(CallError),
}

impl Envelope {
    /// Wrap an engine outcome.
    pub fn from_outcome(outcome: EngineResult<Reply>) -> Self {
        match outcome.and_then(|reply| Ok(serde_json::to_value(reply)?)) {
            Ok(payload) => Envelope::Ok(payload),
            Err(err) => Envelope::Err(err.into()),
        }
    }

    /// Parse a raw response as a host delivered it.
    ///
    /// Only invalid JSON fails. Anything else becomes an envelope: a bare
    /// payload with no `Ok`/`Err` key is treated as success.
    pub fn from_wire(raw: &str) -> EngineResult<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Ok(Self::from_value(value))
    }

    fn from_value(value: Value) -> Self {
        let mut map = match value {
            Value::Object(map) => map,
            other => return Envelope::Ok(other),
        };

        match map.remove("txn_result") {
            Some(Value::String(inner)) => {
                return match serde_json::from_str(&inner) {
                    Ok(nested) => Self::from_value(nested),
                    Err(_) => Envelope::Ok(Value::String(inner)),
                };
            }
            Some(nested) => return Self::from_value(nested),
            None => {}
        }

        if let Some(payload) = map.remove("Ok") {
            return Envelope::Ok(decode_string_payload(payload));
        }

        if let Some(err) = map.remove("Err") {
            let err = match err {
                Value::String(message) => CallError {
                    kind: None,
                    message,
                },
                other => serde_json::from_value(other.clone()).unwrap_or(CallError {
                    kind: None,
                    message: other.to_string(),
                }),
            };
            return Envelope::Err(err);
        }

        Envelope::Ok(Value::Object(map))
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Envelope::Ok(_))
    }

    /// Convert into a plain `Result`.
    pub fn into_result(self) -> Result<Value, CallError> {
        match self {
            Envelope::Ok(payload) => Ok(payload),
            Envelope::Err(err) => Err(err),
        }
    }

    /// Serialize for the wire.
    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// Some hosts JSON-encode the Ok payload a second time.
fn decode_string_payload(payload: Value) -> Value {
    match payload {
        Value::String(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        other => other,
    }
}
