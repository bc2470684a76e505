//! Call dispatcher: the single entry point for all operations.
//!
//! ## Key Types
//!
//! - `Call`: a decoded method name plus typed params
//! - `Dispatcher`: owns the store, applies calls atomically
//! - `Envelope`: `{"Ok": ...}` / `{"Err": ...}` result wrapper
//! - `CallRecord`: one committed mutation in the journal

pub mod call;
pub mod dispatcher;
pub mod envelope;

pub use call::{Call, CallRecord};
pub use dispatcher::Dispatcher;
pub use envelope::{CallError, Envelope, Reply};
