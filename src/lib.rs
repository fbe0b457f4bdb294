//! # Matchbook
//!
//! Continuous double-auction matching engine for a multi-asset exchange.
//!
//! ## Architecture
//!
//! - **Types**: Order, Investor, Asset, Transaction, ExecutionReceipt
//! - **OrderBook**: per-asset books with slab-based storage
//! - **Engine**: price-time priority matching, position settlement, and the
//!   threaded runtime that feeds it
//!
//! ## Design Principles
//!
//! 1. **Serialized matching**: every order is matched by one thread, in the
//!    order it arrived
//! 2. **No Floating Point**: prices use fixed-point arithmetic (10^8 scaling)
//! 3. **Shared orders**: submitters keep an [`types::OrderRef`] and observe
//!    fills as they happen
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use matchbook::{AppConfig, Exchange};
//! use matchbook::types::{Asset, Investor, Order, Position, Side};
//! use matchbook::types::price::to_fixed;
//!
//! let config = AppConfig::default();
//! let exchange = Exchange::start(config.engine).unwrap();
//!
//! let asset = Arc::new(Asset::new("asset1", "Asset 1", 1000));
//! let investor = Arc::new(Investor::new("1"));
//! investor.add_asset_position(Position::new("asset1", 10));
//!
//! let order = Arc::new(Order::new("1", investor, asset, 5, to_fixed("5").unwrap(), Side::Sell));
//! exchange.submit(order).unwrap();
//!
//! let stats = exchange.shutdown().unwrap();
//! assert_eq!(stats.orders_rested, 1);
//! ```

/// Core data types: Order, Investor, Asset, Transaction
pub mod types;

/// Order book: per-asset bid/ask sides with slab-based storage
pub mod orderbook;

/// Matching engine and its threaded runtime
pub mod engine;

/// TOML configuration
pub mod config;

/// Error types
pub mod error;

pub use types::{
    Asset, ExecutionReceipt, Investor, Order, OrderRef, OrderStatus, Position, Side, Transaction,
};
pub use orderbook::AssetBook;
pub use engine::{Exchange, ExchangeHandle, MatchingEngine};
pub use config::{AppConfig, EngineConfig};
pub use error::{EngineError, EngineResult};
