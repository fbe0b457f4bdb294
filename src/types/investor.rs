//! Investors and their per-asset positions.
//!
//! Positions live inside the [`Investor`] behind a `parking_lot::RwLock` so
//! that reporting code can read balances while the matching thread is
//! running. Only the engine writes them (see `credit` / `debit`).
//!
//! Balances are signed. Selling more than is held is not prevented, and the
//! seller simply goes negative by the uncovered amount, so the total held
//! across investors never changes.

use std::collections::HashMap;

use parking_lot::RwLock;

/// An investor's holding of a single asset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Position {
    /// Asset identifier
    pub asset_id: String,

    /// Shares held; negative only after an uncovered sale
    pub shares: i64,
}

impl Position {
    /// Create a position with an initial share balance
    pub fn new(asset_id: impl Into<String>, shares: i64) -> Self {
        Self {
            asset_id: asset_id.into(),
            shares,
        }
    }
}

/// An investor account.
///
/// A missing position is an implicit zero balance. Positions are created
/// lazily the first time the investor buys an asset.
///
/// ## Example
///
/// ```
/// use matchbook::types::{Investor, Position};
///
/// let investor = Investor::new("1");
/// investor.add_asset_position(Position::new("asset1", 10));
///
/// assert_eq!(investor.shares("asset1"), 10);
/// assert_eq!(investor.shares("asset2"), 0);
/// ```
#[derive(Debug, Default)]
pub struct Investor {
    /// Unique investor identifier
    pub id: String,

    positions: RwLock<HashMap<String, Position>>,
}

impl Investor {
    /// Create an investor with no positions
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            positions: RwLock::new(HashMap::new()),
        }
    }

    /// Record an opening position, replacing any existing one for the asset.
    ///
    /// Intended for account setup before orders are submitted.
    pub fn add_asset_position(&self, position: Position) {
        self.positions
            .write()
            .insert(position.asset_id.clone(), position);
    }

    /// Get a copy of the position for an asset, if one was ever recorded
    pub fn asset_position(&self, asset_id: &str) -> Option<Position> {
        self.positions.read().get(asset_id).cloned()
    }

    /// Shares held in an asset (zero if no position exists)
    pub fn shares(&self, asset_id: &str) -> i64 {
        self.positions
            .read()
            .get(asset_id)
            .map(|p| p.shares)
            .unwrap_or(0)
    }

    /// Copy of every recorded position
    pub fn positions(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self.positions.read().values().cloned().collect();
        positions.sort_by(|a, b| a.asset_id.cmp(&b.asset_id));
        positions
    }

    /// Add shares to a position, creating it at zero if absent.
    ///
    /// Returns the new balance.
    pub(crate) fn credit(&self, asset_id: &str, shares: u64) -> i64 {
        let mut positions = self.positions.write();
        let position = positions
            .entry(asset_id.to_string())
            .or_insert_with(|| Position::new(asset_id, 0));
        position.shares = position.shares.saturating_add_unsigned(shares);
        position.shares
    }

    /// Remove shares from a position, creating it at zero if absent.
    ///
    /// The full amount is always taken, so the balance goes negative when
    /// the sale is not covered. Returns the new balance.
    pub(crate) fn debit(&self, asset_id: &str, shares: u64) -> i64 {
        let mut positions = self.positions.write();
        let position = positions
            .entry(asset_id.to_string())
            .or_insert_with(|| Position::new(asset_id, 0));
        position.shares = position.shares.saturating_sub_unsigned(shares);
        position.shares
    }
}
