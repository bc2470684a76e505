//! Checked money arithmetic and the exact snapshot encoding of amounts.
//!
//! `Decimal` operators panic on overflow and silently round when a result
//! needs more than 28-29 significant digits. Every balance, counter and
//! points update goes through [`add`] / [`sub`] / [`sum`] instead, which
//! surface both as `InvalidInput` before anything is written.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

/// Keep `result` only if it carries every fractional digit of its operands.
fn exact(result: Option<Decimal>, a: Decimal, b: Decimal) -> Option<Decimal> {
    let digits = a.normalize().scale().max(b.normalize().scale());
    result.filter(|value| value.scale() >= digits)
}

/// `a + b`, or `InvalidInput` when the result overflows or would be rounded.
pub fn add(a: Decimal, b: Decimal) -> EngineResult<Decimal> {
    exact(a.checked_add(b), a, b)
        .ok_or_else(|| EngineError::invalid(format!("amount out of range: {a} + {b}")))
}

/// `a - b`, or `InvalidInput` when the result overflows or would be rounded.
pub fn sub(a: Decimal, b: Decimal) -> EngineResult<Decimal> {
    exact(a.checked_sub(b), a, b)
        .ok_or_else(|| EngineError::invalid(format!("amount out of range: {a} - {b}")))
}

/// Checked sum of a sequence of amounts.
pub fn sum(amounts: impl IntoIterator<Item = Decimal>) -> EngineResult<Decimal> {
    amounts.into_iter().try_fold(Decimal::ZERO, add)
}

/// Serde adapter for amounts kept in the store.
///
/// Human-readable formats (the JSON call surface) see a plain number.
/// Binary formats (bincode snapshots) get the exact decimal text, so a
/// snapshot restores every digit.
pub mod exact {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            Serialize::serialize(value, serializer)
        } else {
            serializer.serialize_str(&value.to_string())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        if deserializer.is_human_readable() {
            <Decimal as Deserialize>::deserialize(deserializer)
        } else {
            let text = String::deserialize(deserializer)?;
            Decimal::from_str(&text).map_err(D::Error::custom)
        }
    }
}

/// [`exact`] for optional amounts.
pub mod exact_option {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    struct Exact<'a>(&'a Decimal);

    impl Serialize for Exact<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            super::exact::serialize(self.0, serializer)
        }
    }

    struct Owned(Decimal);

    impl<'de> Deserialize<'de> for Owned {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            super::exact::deserialize(deserializer).map(Owned)
        }
    }

    pub fn serialize<S: Serializer>(
        value: &Option<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.as_ref().map(Exact).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Decimal>, D::Error> {
        Ok(Option::<Owned>::deserialize(deserializer)?.map(|owned| owned.0))
    }
}
