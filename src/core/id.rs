//! Identifiers for users, hands and offers.
//!
//! ## Layout
//!
//! - `UserId`: supplied by the authentication layer, opaque to the engine
//! - `HandId`: `hand-NNNNNN`, allocated by the store
//! - `OfferId`: `offer-NNNNNN`, allocated by the store
//!
//! Generated ids are zero-padded to six digits and grow past that. Hand
//! and offer ids order by length first, then text, so order equals
//! creation order at any sequence number.
//!
//! ```
//! use escalate_engine::core::{HandId, OfferId};
//!
//! assert_eq!(HandId::from_sequence(7).as_str(), "hand-000007");
//! assert!(OfferId::from_sequence(2) < OfferId::from_sequence(10));
//! assert!(OfferId::from_sequence(999_999) < OfferId::from_sequence(1_000_000));
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    (@body $name:ident) => {
        impl $name {
            /// Wrap a raw id string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the raw id string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };

    // Store-allocated id: `{prefix}-{seq:06}`, ordered shortest first.
    ($(#[$meta:meta])* $name:ident, prefix = $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        string_id!(@body $name);

        impl $name {
            #[doc = concat!("Id for the `seq`-th ", $prefix, " created in a store.")]
            #[must_use]
            pub fn from_sequence(seq: u64) -> Self {
                Self(format!(concat!($prefix, "-{:06}"), seq))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0
                    .len()
                    .cmp(&other.0.len())
                    .then_with(|| self.0.cmp(&other.0))
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }
    };

    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        string_id!(@body $name);
    };
}

string_id!(
    /// Stable caller identity from the authentication provider.
    UserId
);

string_id!(
    /// Identifier of a bluff hand.
    HandId,
    prefix = "hand"
);

string_id!(
    /// Identifier of an auction offer.
    OfferId,
    prefix = "offer"
);

impl UserId {
    /// Is this id usable as a caller identity?
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}
