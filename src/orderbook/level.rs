//! Price level management for orders at the same price.
//!
//! ## Queue Structure
//!
//! ```text
//! head (earliest) <-> order2 <-> order3 <-> tail (latest)
//! ```
//!
//! - Orders are kept in ascending arrival sequence
//! - Matching consumes orders from the head
//! - Any order can be removed in O(1) using the slab key
//!
//! Orders nearly always arrive in sequence order, so insertion walks back
//! from the tail and normally stops immediately.

use slab::Slab;

use crate::orderbook::OrderNode;

/// A price level containing orders at a single price.
///
/// The order data lives in the slab; this struct only holds the queue
/// metadata.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Price for this level (fixed-point, scaled by 10^8)
    pub price: u64,

    /// Total pending shares at this level
    pub total_quantity: u64,

    /// Head of the order queue (earliest arrival, slab key)
    pub head: Option<usize>,

    /// Tail of the order queue (latest arrival, slab key)
    pub tail: Option<usize>,

    /// Number of orders at this price level
    pub order_count: usize,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new(price: u64) -> Self {
        Self {
            price,
            total_quantity: 0,
            head: None,
            tail: None,
            order_count: 0,
        }
    }

    /// Check if the price level is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Link a node into the queue by arrival sequence.
    ///
    /// # Panics
    ///
    /// Panics if the key doesn't exist in the slab
    pub fn insert(&mut self, key: usize, slab: &mut Slab<OrderNode>) {
        let sequence = slab[key].sequence;
        let quantity = slab[key].remaining();

        // Find the last node that arrived before the new one
        let mut after = self.tail;
        while let Some(candidate) = after {
            if slab[candidate].sequence < sequence {
                break;
            }
            after = slab[candidate].prev;
        }

        let next = match after {
            Some(prev_key) => slab[prev_key].next,
            None => self.head,
        };

        {
            let node = &mut slab[key];
            node.prev = after;
            node.next = next;
        }

        match after {
            Some(prev_key) => slab[prev_key].next = Some(key),
            None => self.head = Some(key),
        }
        match next {
            Some(next_key) => slab[next_key].prev = Some(key),
            None => self.tail = Some(key),
        }

        self.order_count += 1;
        self.total_quantity = self.total_quantity.saturating_add(quantity);
    }

    /// Remove an order from the queue by slab key
    ///
    /// # Returns
    ///
    /// The pending quantity of the removed order
    pub fn remove(&mut self, key: usize, slab: &mut Slab<OrderNode>) -> u64 {
        let (quantity, prev_key, next_key) = {
            let node = &slab[key];
            (node.remaining(), node.prev, node.next)
        };

        match prev_key {
            Some(prev) => slab[prev].next = next_key,
            None => self.head = next_key,
        }
        match next_key {
            Some(next) => slab[next].prev = prev_key,
            None => self.tail = prev_key,
        }

        let node = &mut slab[key];
        node.prev = None;
        node.next = None;

        self.order_count -= 1;
        self.total_quantity = self.total_quantity.saturating_sub(quantity);

        quantity
    }

    /// Get the head order's slab key (earliest arrival)
    #[inline]
    pub fn peek_head(&self) -> Option<usize> {
        self.head
    }

    /// Update the total quantity after a partial fill
    pub fn reduce_quantity(&mut self, filled_quantity: u64) {
        self.total_quantity = self.total_quantity.saturating_sub(filled_quantity);
    }

    /// Slab keys from head to tail
    pub fn keys(&self, slab: &Slab<OrderNode>) -> Vec<usize> {
        let mut keys = Vec::with_capacity(self.order_count);
        let mut cursor = self.head;
        while let Some(key) = cursor {
            keys.push(key);
            cursor = slab[key].next;
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::types::{Asset, Investor, Order, Side};

    fn create_test_node(slab: &mut Slab<OrderNode>, sequence: u64, quantity: u64) -> usize {
        let order = Order::new(
            sequence.to_string(),
            Arc::new(Investor::new("1")),
            Arc::new(Asset::new("asset1", "Asset 1", 100)),
            quantity,
            500_000_000,
            Side::Buy,
        );
        slab.insert(OrderNode::new(Arc::new(order), sequence))
    }

    fn sequences(level: &PriceLevel, slab: &Slab<OrderNode>) -> Vec<u64> {
        level.keys(slab).into_iter().map(|k| slab[k].sequence).collect()
    }

    #[test]
    fn test_price_level_new() {
        let level = PriceLevel::new(500_000_000);

        assert_eq!(level.total_quantity, 0);
        assert!(level.peek_head().is_none());
        assert!(level.is_empty());
    }

    #[test]
    fn test_insert_in_arrival_order() {
        let mut slab = Slab::with_capacity(10);
        let mut level = PriceLevel::new(500_000_000);

        let key1 = create_test_node(&mut slab, 1, 3);
        let key2 = create_test_node(&mut slab, 2, 5);
        let key3 = create_test_node(&mut slab, 3, 2);

        level.insert(key1, &mut slab);
        level.insert(key2, &mut slab);
        level.insert(key3, &mut slab);

        assert_eq!(level.order_count, 3);
        assert_eq!(level.total_quantity, 10);
        assert_eq!(level.head, Some(key1));
        assert_eq!(level.tail, Some(key3));
        assert_eq!(slab[key2].prev, Some(key1));
        assert_eq!(slab[key2].next, Some(key3));
    }

    #[test]
    fn test_insert_out_of_order_keeps_sequence_order() {
        let mut slab = Slab::with_capacity(10);
        let mut level = PriceLevel::new(500_000_000);

        for seq in [5, 2, 9, 1, 7] {
            let key = create_test_node(&mut slab, seq, 1);
            level.insert(key, &mut slab);
        }

        assert_eq!(sequences(&level, &slab), vec![1, 2, 5, 7, 9]);
        let tail = level.tail.unwrap();
        assert_eq!(slab[tail].sequence, 9);
    }

    #[test]
    fn test_remove_middle_head_tail() {
        let mut slab = Slab::with_capacity(10);
        let mut level = PriceLevel::new(500_000_000);

        let keys: Vec<usize> = (1..=4)
            .map(|seq| {
                let key = create_test_node(&mut slab, seq, 2);
                level.insert(key, &mut slab);
                key
            })
            .collect();

        assert_eq!(level.remove(keys[1], &mut slab), 2);
        assert_eq!(sequences(&level, &slab), vec![1, 3, 4]);

        level.remove(keys[0], &mut slab);
        assert_eq!(level.head, Some(keys[2]));

        level.remove(keys[3], &mut slab);
        assert_eq!(level.tail, Some(keys[2]));
        assert!(slab[keys[2]].is_unlinked());

        level.remove(keys[2], &mut slab);
        assert!(level.is_empty());
        assert_eq!(level.total_quantity, 0);
        assert!(level.head.is_none() && level.tail.is_none());
    }

    #[test]
    fn test_reduce_quantity() {
        let mut level = PriceLevel::new(500_000_000);
        level.total_quantity = 10;

        level.reduce_quantity(3);
        assert_eq!(level.total_quantity, 7);

        level.reduce_quantity(100);
        assert_eq!(level.total_quantity, 0);
    }
}
