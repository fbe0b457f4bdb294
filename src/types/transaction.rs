//! Transaction type representing an executed match between two orders.
//!
//! ## SSZ Serialization
//!
//! A [`Transaction`] holds shared references to its orders and asset, so it
//! is not itself serializable. Its [`TransactionRecord`] is a fixed-size
//! numeric projection encoded with SSZ for the transaction log state root.

use std::sync::Arc;

use ssz_rs::prelude::*;

use crate::types::price::total_value;
use crate::types::{Asset, OrderRef};

/// A trade between a buy order and a sell order.
///
/// ## Price Discovery
///
/// The trade always executes at the maker's price (the resting order's price).
/// `total` is `shares * price`, fixed-point like the price and widened to
/// `u128` so it is always exact.
#[derive(Debug, Clone)]
pub struct Transaction {
    /// Position in the transaction log (1-based)
    pub id: u64,

    /// Asset traded
    pub asset: Arc<Asset>,

    /// The buying order
    pub buy_order: OrderRef,

    /// The selling order
    pub sell_order: OrderRef,

    /// Shares transacted (always > 0)
    pub shares: u64,

    /// Execution price in fixed-point (scaled by 10^8)
    pub price: u64,

    /// shares * price in fixed-point (scaled by 10^8)
    pub total: u128,

    /// Execution timestamp in milliseconds
    pub timestamp: u64,
}

impl Transaction {
    /// Create a new transaction; the total is computed from shares and price.
    pub fn new(
        id: u64,
        asset: Arc<Asset>,
        buy_order: OrderRef,
        sell_order: OrderRef,
        shares: u64,
        price: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            id,
            asset,
            buy_order,
            sell_order,
            shares,
            price,
            total: total_value(shares, price),
            timestamp,
        }
    }

    /// Fixed-size record used for the state root
    pub fn record(&self) -> TransactionRecord {
        TransactionRecord {
            id: self.id,
            buy_sequence: self.buy_order.sequence().unwrap_or(0),
            sell_sequence: self.sell_order.sequence().unwrap_or(0),
            shares: self.shares,
            price: self.price,
            total: self.total,
        }
    }
}

/// Deterministic, SSZ-encodable projection of a [`Transaction`].
///
/// Orders are identified by arrival sequence rather than caller ids, and the
/// wall-clock timestamp is left out so identical order flows hash alike.
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct TransactionRecord {
    pub id: u64,
    pub buy_sequence: u64,
    pub sell_sequence: u64,
    pub shares: u64,
    pub price: u64,
    pub total: u128,
}
