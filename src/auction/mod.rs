//! Auction engine: ascending-bid market with escrow.
//!
//! ## Key Types
//!
//! - `Offer`: escrowed cards plus at most one escrowed bid
//!
//! Lifecycle is `Open -> Resolved`. Bids strictly ascend; a new bid
//! refunds the one it displaces. `withdraw_bid` clears the offer back to
//! "no bid" and keeps no history.

pub mod engine;
pub mod offer;

pub use engine::{bid, get_offers, offer, resolve, withdraw_bid};
pub use offer::Offer;
