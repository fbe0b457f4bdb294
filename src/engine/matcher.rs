//! Price-time priority matching.
//!
//! [`MatchingEngine`] is the synchronous core: it owns the asset books and
//! processes one incoming order at a time. The threaded runtime in
//! [`crate::engine::exchange`] wraps it, but it can be driven directly.
//!
//! ## Algorithm
//!
//! For an incoming (taker) order against the opposite side of its asset book:
//!
//! 1. While the taker has pending shares and the best resting (maker) order
//!    crosses, trade `min(taker pending, maker pending)` at the maker's price.
//! 2. Each trade moves shares from seller to buyer in the ledger and is
//!    appended to the transaction log.
//! 3. A maker that reaches zero is closed and leaves the book.
//! 4. A taker with shares left rests on its own side.

use std::collections::HashMap;

use crate::engine::{PositionLedger, TransactionLog};
use crate::error::{EngineError, EngineResult};
use crate::orderbook::AssetBook;
use crate::types::{OrderRef, Side, Transaction};

/// Does a resting order at `maker_price` cross an incoming order?
///
/// An incoming buy crosses asks priced at or below its limit; an incoming
/// sell crosses bids priced at or above its limit.
#[inline]
pub fn crosses(taker_side: Side, taker_price: u64, maker_price: u64) -> bool {
    match taker_side {
        Side::Buy => maker_price <= taker_price,
        Side::Sell => maker_price >= taker_price,
    }
}

/// Outcome of processing one incoming order.
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// Arrival sequence assigned to the incoming order
    pub sequence: u64,

    /// Transactions executed, in execution order
    pub transactions: Vec<Transaction>,

    /// Orders touched by a trade that are still open, to be published
    pub updated: Vec<OrderRef>,

    /// The incoming order ended fully matched
    pub fully_filled: bool,

    /// The incoming order was placed on the book
    pub rested: bool,
}

impl MatchResult {
    /// Whether at least one trade was executed
    #[inline]
    pub fn traded(&self) -> bool {
        !self.transactions.is_empty()
    }
}

/// Running counters for the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatcherStats {
    pub orders_processed: u64,
    pub trades_executed: u64,
    pub orders_rested: u64,
    pub last_sequence: u64,
    pub books: usize,
}

/// Synchronous matching core.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use matchbook::engine::{MatchingEngine, PositionLedger, TransactionLog};
/// use matchbook::types::{Asset, Investor, Order, OrderStatus, Position, Side};
/// use matchbook::types::price::to_fixed;
///
/// let asset = Arc::new(Asset::new("asset1", "Asset 1", 100));
/// let seller = Arc::new(Investor::new("1"));
/// seller.add_asset_position(Position::new("asset1", 10));
/// let buyer = Arc::new(Investor::new("2"));
///
/// let mut engine = MatchingEngine::new();
/// let mut ledger = PositionLedger::new();
/// let mut log = TransactionLog::new();
///
/// let sell = Arc::new(Order::new("1", seller, asset.clone(), 5, to_fixed("5").unwrap(), Side::Sell));
/// let buy = Arc::new(Order::new("2", buyer, asset, 5, to_fixed("5").unwrap(), Side::Buy));
///
/// engine.match_order(sell.clone(), &mut ledger, &mut log, 0).unwrap();
/// let result = engine.match_order(buy.clone(), &mut ledger, &mut log, 0).unwrap();
///
/// assert!(result.fully_filled);
/// assert_eq!(sell.status(), OrderStatus::Closed);
/// assert_eq!(ledger.position("2", "asset1"), 5);
/// assert_eq!(log.len(), 1);
/// ```
#[derive(Debug)]
pub struct MatchingEngine {
    books: HashMap<String, AssetBook>,
    book_capacity: usize,
    next_sequence: u64,
    stats: MatcherStats,
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self::with_book_capacity(0)
    }

    /// Pre-allocate `book_capacity` order slots in every new asset book
    pub fn with_book_capacity(book_capacity: usize) -> Self {
        Self {
            books: HashMap::new(),
            book_capacity,
            next_sequence: 1,
            stats: MatcherStats::default(),
        }
    }

    pub fn book(&self, asset_id: &str) -> Option<&AssetBook> {
        self.books.get(asset_id)
    }

    pub fn books(&self) -> impl Iterator<Item = &AssetBook> {
        self.books.values()
    }

    pub fn stats(&self) -> MatcherStats {
        self.stats
    }

    /// Process one incoming order to completion.
    ///
    /// Assigns the arrival sequence, matches against the opposite side of
    /// the asset's book (creating the book on first reference), settles
    /// positions, appends transactions, and rests any remainder.
    ///
    /// # Errors
    ///
    /// [`EngineError::AlreadySubmitted`] if the order already carries an
    /// arrival sequence. Nothing is mutated in that case.
    pub fn match_order(
        &mut self,
        order: OrderRef,
        ledger: &mut PositionLedger,
        log: &mut TransactionLog,
        timestamp: u64,
    ) -> EngineResult<MatchResult> {
        let sequence = self.next_sequence;
        if !order.assign_sequence(sequence) {
            return Err(EngineError::AlreadySubmitted(order.id.clone()));
        }
        self.next_sequence += 1;
        self.stats.orders_processed += 1;
        self.stats.last_sequence = sequence;

        ledger.register(&order.investor);

        let book_capacity = self.book_capacity;
        let book = self
            .books
            .entry(order.asset.id.clone())
            .or_insert_with(|| {
                tracing::debug!(asset = %order.asset.id, "creating asset book");
                AssetBook::with_capacity(order.asset.id.clone(), book_capacity)
            });

        tracing::debug!(
            sequence,
            order = %order.id,
            side = %order.side,
            price = order.price,
            shares = order.shares,
            "order accepted"
        );

        let mut transactions = Vec::new();
        let mut updated = Vec::new();
        let maker_side = order.side.opposite();

        while order.pending_shares() > 0 {
            let maker = match book.best(maker_side) {
                Some(maker) if crosses(order.side, order.price, maker.price) => maker.clone(),
                _ => break,
            };

            let shares = order.pending_shares().min(maker.pending_shares());
            order.fill(shares);
            maker.fill(shares);
            book.record_fill(&maker, shares);

            let (buy_order, sell_order) = match order.side {
                Side::Buy => (order.clone(), maker.clone()),
                Side::Sell => (maker.clone(), order.clone()),
            };
            ledger.settle(
                &buy_order.investor,
                &sell_order.investor,
                &order.asset.id,
                shares,
            );
            let transaction = log
                .append(
                    order.asset.clone(),
                    buy_order,
                    sell_order,
                    shares,
                    maker.price,
                    timestamp,
                )
                .clone();

            tracing::trace!(
                transaction = transaction.id,
                taker = %order.id,
                maker = %maker.id,
                shares,
                price = maker.price,
                "trade executed"
            );
            transactions.push(transaction);

            if maker.is_closed() {
                book.remove(&maker);
                tracing::debug!(order = %maker.id, "resting order closed");
            } else {
                updated.push(maker);
            }
        }

        let fully_filled = order.is_closed();
        let rested = !fully_filled && book.insert(order.clone()).is_some();
        if rested {
            self.stats.orders_rested += 1;
            tracing::debug!(
                order = %order.id,
                pending = order.pending_shares(),
                "order resting"
            );
            if !transactions.is_empty() {
                updated.push(order.clone());
            }
        }

        self.stats.trades_executed += transactions.len() as u64;
        self.stats.books = self.books.len();

        Ok(MatchResult {
            sequence,
            transactions,
            updated,
            fully_filled,
            rested,
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
