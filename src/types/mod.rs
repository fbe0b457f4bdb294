//! Core data types for the matching engine.
//!
//! ## Types
//!
//! - [`Asset`]: A tradable instrument (immutable)
//! - [`Investor`]: An account holding per-asset [`Position`]s
//! - [`Order`]: A limit order whose fill state the engine advances
//! - [`Transaction`]: An executed trade between a buy and a sell order
//! - [`ExecutionReceipt`]: Summary of the engine state with a state root
//!
//! ## Fixed-Point Arithmetic
//!
//! Prices are stored as `u64` scaled by 10^8 (see [`price`]).
//! Share counts are whole units, so `shares * price` is itself fixed-point.

mod asset;
mod investor;
mod order;
mod transaction;
mod receipt;
pub mod price;

pub use asset::Asset;
pub use investor::{Investor, Position};
pub use order::{Order, OrderRef, OrderStatus, Side};
pub use transaction::{Transaction, TransactionRecord};
pub use receipt::ExecutionReceipt;
