//! Card supply: the only place cards enter the game.
//!
//! ## Key Types
//!
//! - `CardSource`: injectable randomness for draws
//! - `ScriptedSource`: fixed sequence, for tests and replays
//!
//! `GameRng` (in `core`) is the built-in seeded source.

pub mod purchase;
pub mod source;

pub use purchase::buy_cards;
pub use source::{CardSource, ScriptedSource};
