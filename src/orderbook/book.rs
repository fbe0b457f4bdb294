//! Per-asset order book.
//!
//! ## Architecture
//!
//! - **Slab**: Pre-allocated storage for resting order nodes
//! - **BTreeMap**: Sorted price levels for best bid/ask lookup
//! - **HashMap**: Order identity to slab key, for O(1) removal
//!
//! ## Price Ordering
//!
//! - **Bids** (buy orders): high-to-low, then earliest arrival
//! - **Asks** (sell orders): low-to-high, then earliest arrival
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use matchbook::orderbook::AssetBook;
//! use matchbook::types::{Asset, Investor, Order, Side};
//!
//! let asset = Arc::new(Asset::new("asset1", "Asset 1", 100));
//! let investor = Arc::new(Investor::new("1"));
//! let mut book = AssetBook::with_capacity("asset1", 16);
//!
//! let bid = Arc::new(Order::new("1", investor.clone(), asset.clone(), 5, 500_000_000, Side::Buy));
//! let ask = Arc::new(Order::new("2", investor, asset, 5, 600_000_000, Side::Sell));
//! book.insert(bid);
//! book.insert(ask);
//!
//! assert_eq!(book.best_bid_price(), Some(500_000_000));
//! assert_eq!(book.best_ask_price(), Some(600_000_000));
//! assert_eq!(book.spread(), Some(100_000_000));
//! ```

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use slab::Slab;

use crate::orderbook::{OrderNode, PriceLevel};
use crate::types::{Order, OrderRef, Side};

/// Resting orders for a single asset.
#[derive(Debug)]
pub struct AssetBook {
    /// Asset this book holds orders for
    asset_id: String,

    /// Resting order nodes
    orders: Slab<OrderNode>,

    /// Bid price levels; `Reverse(price)` for descending order
    bids: BTreeMap<Reverse<u64>, PriceLevel>,

    /// Ask price levels, ascending
    asks: BTreeMap<u64, PriceLevel>,

    /// Order identity (`Arc` address) to slab key. Sequences are only
    /// unique per book, so they cannot tell a foreign order apart.
    order_index: HashMap<usize, usize>,

    /// Sequence handed to orders inserted without one
    next_sequence: u64,

    bid_count: usize,
    ask_count: usize,
}

impl AssetBook {
    /// Create an empty book
    pub fn new(asset_id: impl Into<String>) -> Self {
        Self::with_capacity(asset_id, 0)
    }

    /// Create a book with pre-allocated order slots
    pub fn with_capacity(asset_id: impl Into<String>, order_capacity: usize) -> Self {
        Self {
            asset_id: asset_id.into(),
            orders: Slab::with_capacity(order_capacity),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            order_index: HashMap::with_capacity(order_capacity),
            next_sequence: 1,
            bid_count: 0,
            ask_count: 0,
        }
    }

    // ========================================================================
    // Size
    // ========================================================================

    #[inline]
    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    /// Total number of resting orders
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn bid_count(&self) -> usize {
        self.bid_count
    }

    #[inline]
    pub fn ask_count(&self) -> usize {
        self.ask_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    #[inline]
    pub fn ask_levels(&self) -> usize {
        self.asks.len()
    }

    // ========================================================================
    // Order Management
    // ========================================================================

    /// Rest an open order on its side of the book.
    ///
    /// Orders without an arrival sequence get the book's next one. Closed
    /// orders and orders already resting are refused.
    ///
    /// # Returns
    ///
    /// The slab key, or None if the order was refused
    pub fn insert(&mut self, order: OrderRef) -> Option<usize> {
        if order.is_closed() {
            return None;
        }

        let sequence = match order.sequence() {
            Some(seq) => seq,
            None => {
                order.assign_sequence(self.next_sequence);
                order.sequence().unwrap_or(self.next_sequence)
            }
        };
        let identity = order_identity(&order);
        if self.order_index.contains_key(&identity) {
            return None;
        }
        self.next_sequence = self.next_sequence.max(sequence + 1);

        let price = order.price;
        let side = order.side;
        let key = self.orders.insert(OrderNode::new(order, sequence));
        self.order_index.insert(identity, key);

        match side {
            Side::Buy => {
                self.bids
                    .entry(Reverse(price))
                    .or_insert_with(|| PriceLevel::new(price))
                    .insert(key, &mut self.orders);
                self.bid_count += 1;
            }
            Side::Sell => {
                self.asks
                    .entry(price)
                    .or_insert_with(|| PriceLevel::new(price))
                    .insert(key, &mut self.orders);
                self.ask_count += 1;
            }
        }

        Some(key)
    }

    /// Take an order off the book. No-op if it is not resting here.
    pub fn remove(&mut self, order: &Order) -> Option<OrderRef> {
        let key = *self.order_index.get(&order_identity(order))?;
        self.remove_key(key)
    }

    fn remove_key(&mut self, key: usize) -> Option<OrderRef> {
        let node = self.orders.get(key)?;
        let identity = order_identity(&node.order);
        let price = node.price();
        let side = node.order.side;

        match side {
            Side::Buy => {
                if let Some(level) = self.bids.get_mut(&Reverse(price)) {
                    level.remove(key, &mut self.orders);
                    self.bid_count -= 1;
                    if level.is_empty() {
                        self.bids.remove(&Reverse(price));
                    }
                }
            }
            Side::Sell => {
                if let Some(level) = self.asks.get_mut(&price) {
                    level.remove(key, &mut self.orders);
                    self.ask_count -= 1;
                    if level.is_empty() {
                        self.asks.remove(&price);
                    }
                }
            }
        }

        self.order_index.remove(&identity);
        Some(self.orders.remove(key).order)
    }

    /// Check if an order is resting in this book
    pub fn contains(&self, order: &Order) -> bool {
        self.order_index.contains_key(&order_identity(order))
    }

    /// Keep level totals in step with a fill on a resting order
    pub fn record_fill(&mut self, order: &Order, shares: u64) {
        if !self.contains(order) {
            return;
        }
        match order.side {
            Side::Buy => {
                if let Some(level) = self.bids.get_mut(&Reverse(order.price)) {
                    level.reduce_quantity(shares);
                }
            }
            Side::Sell => {
                if let Some(level) = self.asks.get_mut(&order.price) {
                    level.reduce_quantity(shares);
                }
            }
        }
    }

    // ========================================================================
    // Best Bid/Ask
    // ========================================================================

    /// Highest-priced, earliest bid
    pub fn best_bid(&self) -> Option<&OrderRef> {
        let key = self.bids.values().next()?.peek_head()?;
        self.orders.get(key).map(|node| &node.order)
    }

    /// Lowest-priced, earliest ask
    pub fn best_ask(&self) -> Option<&OrderRef> {
        let key = self.asks.values().next()?.peek_head()?;
        self.orders.get(key).map(|node| &node.order)
    }

    /// Head of the given side's queue
    pub fn best(&self, side: Side) -> Option<&OrderRef> {
        match side {
            Side::Buy => self.best_bid(),
            Side::Sell => self.best_ask(),
        }
    }

    #[inline]
    pub fn best_bid_price(&self) -> Option<u64> {
        self.bids.keys().next().map(|r| r.0)
    }

    #[inline]
    pub fn best_ask_price(&self) -> Option<u64> {
        self.asks.keys().next().copied()
    }

    /// best_ask - best_bid, or None if either side is empty or crossed
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid_price(), self.best_ask_price()) {
            (Some(bid), Some(ask)) if ask >= bid => Some(ask - bid),
            _ => None,
        }
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Resting orders on one side in priority order
    pub fn orders(&self, side: Side) -> Vec<OrderRef> {
        let levels: Vec<&PriceLevel> = match side {
            Side::Buy => self.bids.values().collect(),
            Side::Sell => self.asks.values().collect(),
        };
        levels
            .into_iter()
            .flat_map(|level| level.keys(&self.orders))
            .map(|key| self.orders[key].order.clone())
            .collect()
    }

    /// `(price, pending shares)` per level on one side, best first
    pub fn depth(&self, side: Side) -> Vec<(u64, u64)> {
        match side {
            Side::Buy => self
                .bids
                .values()
                .map(|l| (l.price, l.total_quantity))
                .collect(),
            Side::Sell => self
                .asks
                .values()
                .map(|l| (l.price, l.total_quantity))
                .collect(),
        }
    }
}

/// Address of the shared order. Stable while a node holds its `Arc`.
fn order_identity(order: &Order) -> usize {
    order as *const Order as usize
}

// ============================================================================
// Unit Tests
// ============================================================================
