//! Engine error taxonomy.
//!
//! Every fallible operation returns [`EngineResult`]. Errors are raised
//! before any mutation, so a failed call never leaves a partial update.
//!
//! [`ErrorKind`] is the fieldless mirror of [`EngineError`] that travels
//! on the wire inside an error envelope.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::Card;

/// Result alias used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// A typed engine failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Malformed or out-of-range arguments.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unknown user, hand or offer.
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    /// The hand or offer has reached its terminal state.
    #[error("{what} {id} is already resolved")]
    AlreadyResolved { what: &'static str, id: String },

    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },

    /// The caller does not hold the requested multiset of cards.
    #[error("insufficient cards: missing {missing} x{count}")]
    InsufficientCards { missing: Card, count: usize },

    /// The caller lacks the role the operation requires.
    #[error("forbidden: {0}")]
    Forbidden(String),
}

impl EngineError {
    /// Shorthand for an `InvalidInput` error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Shorthand for a `Forbidden` error.
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub(crate) fn not_found(what: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            what,
            id: id.to_string(),
        }
    }

    pub(crate) fn already_resolved(what: &'static str, id: impl ToString) -> Self {
        Self::AlreadyResolved {
            what,
            id: id.to_string(),
        }
    }

    /// The wire-level kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::InvalidInput(_) => ErrorKind::InvalidInput,
            EngineError::NotFound { .. } => ErrorKind::NotFound,
            EngineError::AlreadyResolved { .. } => ErrorKind::AlreadyResolved,
            EngineError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            EngineError::InsufficientCards { .. } => ErrorKind::InsufficientCards,
            EngineError::Forbidden(_) => ErrorKind::Forbidden,
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<bincode::Error> for EngineError {
    fn from(err: bincode::Error) -> Self {
        Self::InvalidInput(format!("snapshot: {err}"))
    }
}

/// Error category carried in an error envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    AlreadyResolved,
    InsufficientFunds,
    InsufficientCards,
    Forbidden,
}
