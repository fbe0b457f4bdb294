//! Matching engine module.
//!
//! ## Design Principles
//!
//! 1. **Single writer**: one thread owns every book and processes orders in
//!    arrival order
//! 2. **Fixed-Point Math**: prices and totals are scaled integers
//! 3. **Price-Time Priority**: best price first, then earliest arrival
//!
//! ## Matching Rules
//!
//! - **Buy orders** match against asks (lowest price first)
//! - **Sell orders** match against bids (highest price first)
//! - Trades execute at the resting order's price
//! - **Partial fills** are supported
//! - **Unfilled quantity** rests on the book
//!
//! ## Components
//!
//! - [`MatchingEngine`]: synchronous core, one call per order
//! - [`PositionLedger`]: investor registry, settles trades
//! - [`TransactionLog`]: append-only trade record
//! - [`CompletionSignal`]: counts trading orders still to be processed
//! - [`Exchange`]: runs the core on its own thread behind channels

pub mod matcher;
pub mod ledger;
pub mod log;
pub mod signal;
pub mod exchange;

pub use matcher::{crosses, MatchResult, MatcherStats, MatchingEngine};
pub use ledger::PositionLedger;
pub use log::TransactionLog;
pub use signal::CompletionSignal;
pub use exchange::{Exchange, ExchangeHandle, OrderSubmitter};
