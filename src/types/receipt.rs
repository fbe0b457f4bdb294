//! Execution receipt summarising the engine state.
//!
//! A receipt records how far the matching thread has progressed together
//! with the transaction log state root, so two engines fed the same order
//! flow can be compared byte for byte.

use ssz_rs::prelude::*;

/// Execution receipt for everything processed so far.
///
/// ## State Root
///
/// The 32-byte state root is the SHA-256 hash of the SSZ-encoded
/// transaction records in log order (see
/// [`crate::engine::TransactionLog::state_root`]).
///
/// ## Example
///
/// ```
/// use matchbook::types::ExecutionReceipt;
///
/// let receipt = ExecutionReceipt::new(
///     12,                     // last_sequence
///     12,                     // orders_processed
///     4,                      // trades_executed
///     [0u8; 32],              // state_root
///     1703577600000,          // timestamp
/// );
/// assert!(!receipt.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct ExecutionReceipt {
    /// Arrival sequence of the last processed order
    pub last_sequence: u64,

    /// Orders taken off the intake queue
    pub orders_processed: u64,

    /// Transactions appended to the log
    pub trades_executed: u64,

    /// SHA-256 of the SSZ-encoded transaction log
    pub state_root: [u8; 32],

    /// Receipt timestamp in milliseconds
    pub timestamp: u64,
}

impl ExecutionReceipt {
    pub fn new(
        last_sequence: u64,
        orders_processed: u64,
        trades_executed: u64,
        state_root: [u8; 32],
        timestamp: u64,
    ) -> Self {
        Self {
            last_sequence,
            orders_processed,
            trades_executed,
            state_root,
            timestamp,
        }
    }

    /// Same progress and same log, ignoring when each receipt was taken
    pub fn same_state(&self, other: &Self) -> bool {
        self.last_sequence == other.last_sequence
            && self.orders_processed == other.orders_processed
            && self.trades_executed == other.trades_executed
            && self.state_root == other.state_root
    }

    /// Get the state root as a hex string
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root)
    }

    /// Check if no orders have been processed
    pub fn is_empty(&self) -> bool {
        self.orders_processed == 0
    }

    /// Trades per processed order, None before the first order
    pub fn trades_per_order(&self) -> Option<f64> {
        if self.orders_processed == 0 {
            None
        } else {
            Some(self.trades_executed as f64 / self.orders_processed as f64)
        }
    }
}
