//! Position ledger: every investor the engine has seen, keyed by id.
//!
//! Balances themselves live inside each [`Investor`]; the ledger is the
//! lookup table used for `(investor id, asset id)` queries and for settling
//! trades. Entries are created on first reference and never removed.

use std::collections::HashMap;
use std::sync::Arc;

use crate::types::Investor;

#[derive(Debug, Default)]
pub struct PositionLedger {
    investors: HashMap<String, Arc<Investor>>,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track an investor. The first handle registered for an id wins.
    pub fn register(&mut self, investor: &Arc<Investor>) {
        let entry = self
            .investors
            .entry(investor.id.clone())
            .or_insert_with(|| investor.clone());
        if !Arc::ptr_eq(entry, investor) {
            tracing::warn!(
                investor = %investor.id,
                "different investor handle submitted under an existing id"
            );
        }
    }

    pub fn investor(&self, investor_id: &str) -> Option<&Arc<Investor>> {
        self.investors.get(investor_id)
    }

    /// Shares an investor holds in an asset; zero if either is unknown
    pub fn position(&self, investor_id: &str, asset_id: &str) -> i64 {
        self.investors
            .get(investor_id)
            .map(|investor| investor.shares(asset_id))
            .unwrap_or(0)
    }

    /// Sum of every tracked investor's holding in an asset
    pub fn total_shares(&self, asset_id: &str) -> i64 {
        self.investors
            .values()
            .map(|investor| investor.shares(asset_id))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.investors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.investors.is_empty()
    }

    /// Move `shares` of an asset from seller to buyer.
    ///
    /// No short-sale check is made. An uncovered sale leaves the seller
    /// negative by the shortfall and is logged; the total is unchanged.
    pub(crate) fn settle(
        &mut self,
        buyer: &Arc<Investor>,
        seller: &Arc<Investor>,
        asset_id: &str,
        shares: u64,
    ) {
        self.register(buyer);
        self.register(seller);

        let seller_balance = seller.debit(asset_id, shares);
        if seller_balance < 0 {
            tracing::warn!(
                investor = %seller.id,
                asset = asset_id,
                shortfall = seller_balance.unsigned_abs().min(shares),
                balance = seller_balance,
                "sell settled against insufficient position"
            );
        }
        let buyer_balance = buyer.credit(asset_id, shares);

        tracing::trace!(
            buyer = %buyer.id,
            seller = %seller.id,
            asset = asset_id,
            shares,
            buyer_balance,
            seller_balance,
            "positions settled"
        );
    }
}
