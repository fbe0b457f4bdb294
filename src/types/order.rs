//! Order types for the matching engine.
//!
//! ## Ownership
//!
//! An [`Order`] is created by the caller and handed to the engine as an
//! [`OrderRef`] (`Arc<Order>`). The caller keeps its own reference and can
//! read the fill state at any time; only the engine advances it.
//!
//! ## Fill State
//!
//! `pending_shares` and `status` sit behind a single `parking_lot::Mutex`
//! so they always change together:
//!
//! ```text
//! status == Closed  <=>  pending_shares == 0
//! ```
//!
//! ## Fixed-Point Representation
//!
//! Prices are stored as u64 scaled by 10^8 (see [`crate::types::price`]).

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::types::price::from_fixed_trimmed;
use crate::types::{Asset, Investor};

/// Shared handle to an order.
pub type OrderRef = Arc<Order>;

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Buy or Sell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Buy order (bid) - wants to purchase the asset
    #[default]
    Buy,
    /// Sell order (ask) - wants to sell the asset
    Sell,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("BUY"),
            Side::Sell => f.write_str("SELL"),
        }
    }
}

// ============================================================================
// OrderStatus enum
// ============================================================================

/// Lifecycle status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    /// Has pending shares; may rest on the book
    #[default]
    Open,
    /// Fully matched
    Closed,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Open => f.write_str("OPEN"),
            OrderStatus::Closed => f.write_str("CLOSED"),
        }
    }
}

#[derive(Debug)]
struct FillState {
    pending_shares: u64,
    status: OrderStatus,
}

// ============================================================================
// Order struct
// ============================================================================

/// A limit order.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use matchbook::types::{Asset, Investor, Order, OrderStatus, Side};
/// use matchbook::types::price::to_fixed;
///
/// let asset = Arc::new(Asset::new("asset1", "Asset 1", 100));
/// let investor = Arc::new(Investor::new("1"));
///
/// let order = Order::new("1", investor, asset, 5, to_fixed("5.0").unwrap(), Side::Sell);
/// assert_eq!(order.pending_shares(), 5);
/// assert_eq!(order.status(), OrderStatus::Open);
/// ```
#[derive(Debug)]
pub struct Order {
    /// Caller-assigned order identifier
    pub id: String,

    /// Owning investor (shared, not owned)
    pub investor: Arc<Investor>,

    /// Asset being traded
    pub asset: Arc<Asset>,

    /// Buy or Sell
    pub side: Side,

    /// Limit price in fixed-point (scaled by 10^8)
    pub price: u64,

    /// Original share quantity
    pub shares: u64,

    /// Arrival sequence; 0 until the engine accepts the order
    sequence: AtomicU64,

    fill: Mutex<FillState>,
}

impl Order {
    /// Create a new open order
    ///
    /// # Arguments
    ///
    /// * `id` - Caller-assigned identifier
    /// * `investor` - Investor placing the order
    /// * `asset` - Asset to trade
    /// * `shares` - Share quantity
    /// * `price` - Limit price in fixed-point (scaled by 10^8)
    /// * `side` - Buy or Sell
    pub fn new(
        id: impl Into<String>,
        investor: Arc<Investor>,
        asset: Arc<Asset>,
        shares: u64,
        price: u64,
        side: Side,
    ) -> Self {
        Self {
            id: id.into(),
            investor,
            asset,
            side,
            price,
            shares,
            sequence: AtomicU64::new(0),
            fill: Mutex::new(FillState {
                pending_shares: shares,
                status: if shares == 0 {
                    OrderStatus::Closed
                } else {
                    OrderStatus::Open
                },
            }),
        }
    }

    /// Identifier of the asset this order trades
    #[inline]
    pub fn asset_id(&self) -> &str {
        &self.asset.id
    }

    /// Identifier of the investor who placed this order
    #[inline]
    pub fn investor_id(&self) -> &str {
        &self.investor.id
    }

    /// Remaining unmatched shares
    pub fn pending_shares(&self) -> u64 {
        self.fill.lock().pending_shares
    }

    /// Current status
    pub fn status(&self) -> OrderStatus {
        self.fill.lock().status
    }

    /// Pending shares and status read under one lock
    pub fn fill_state(&self) -> (u64, OrderStatus) {
        let fill = self.fill.lock();
        (fill.pending_shares, fill.status)
    }

    /// Check if the order still has pending shares
    pub fn is_open(&self) -> bool {
        self.status() == OrderStatus::Open
    }

    /// Check if the order is fully filled
    pub fn is_closed(&self) -> bool {
        self.status() == OrderStatus::Closed
    }

    /// Get the filled quantity
    pub fn filled_shares(&self) -> u64 {
        self.shares.saturating_sub(self.pending_shares())
    }

    /// Arrival sequence assigned by the engine, if accepted
    #[inline]
    pub fn sequence(&self) -> Option<u64> {
        match self.sequence.load(Ordering::Acquire) {
            0 => None,
            seq => Some(seq),
        }
    }

    /// Stamp the arrival sequence. Fails if one was already assigned.
    pub(crate) fn assign_sequence(&self, sequence: u64) -> bool {
        self.sequence
            .compare_exchange(0, sequence, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Fill a portion of this order
    ///
    /// Closes the order when pending shares reach zero.
    ///
    /// # Returns
    ///
    /// The actual quantity filled (may be less if order doesn't have enough pending)
    pub(crate) fn fill(&self, shares: u64) -> u64 {
        let mut fill = self.fill.lock();
        debug_assert!(
            (fill.status == OrderStatus::Closed) == (fill.pending_shares == 0),
            "order {} has inconsistent fill state",
            self.id
        );

        let actual = shares.min(fill.pending_shares);
        fill.pending_shares -= actual;
        if fill.pending_shares == 0 {
            fill.status = OrderStatus::Closed;
        }
        actual
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (pending, status) = self.fill_state();
        write!(
            f,
            "{} {} {}/{} {} @ {} [{}]",
            self.id,
            self.side,
            pending,
            self.shares,
            self.asset.id,
            from_fixed_trimmed(self.price),
            status
        )
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
