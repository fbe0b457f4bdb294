//! Order node for slab-based storage.
//!
//! ## Design
//!
//! `OrderNode` wraps a shared [`OrderRef`] with doubly-linked list pointers
//! for removal from price levels in O(1) when we have the slab key.
//!
//! ## Linked List
//!
//! Orders at the same price level form a doubly-linked list ordered by
//! arrival sequence:
//! - `next`: Points to the next order (later arrival) in the price level
//! - `prev`: Points to the previous order (earlier arrival) in the price level

use crate::types::OrderRef;

/// Order node stored in the slab.
///
/// The pointers are slab keys (`usize`), not direct references.
#[derive(Debug, Clone)]
pub struct OrderNode {
    /// The resting order
    pub order: OrderRef,

    /// Arrival sequence, copied out of the order for cheap comparisons
    pub sequence: u64,

    /// Next order in the price level queue (slab key)
    /// None if this is the tail (latest arrival)
    pub next: Option<usize>,

    /// Previous order in the price level queue (slab key)
    /// None if this is the head (earliest arrival)
    pub prev: Option<usize>,
}

impl OrderNode {
    /// Create a new, unlinked order node
    #[inline]
    pub fn new(order: OrderRef, sequence: u64) -> Self {
        Self {
            order,
            sequence,
            next: None,
            prev: None,
        }
    }

    /// Check if this node is unlinked (not part of any price level)
    #[inline]
    pub fn is_unlinked(&self) -> bool {
        self.next.is_none() && self.prev.is_none()
    }

    /// Get the order price
    #[inline]
    pub fn price(&self) -> u64 {
        self.order.price
    }

    /// Get the pending quantity
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.order.pending_shares()
    }
}
