//! Append-only transaction log.
//!
//! Entries are appended by the matching engine in execution order and are
//! never modified afterwards. Everything else gets read access only.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::error::{EngineError, EngineResult};
use crate::types::{Asset, OrderRef, Transaction};

#[derive(Debug, Default, Clone)]
pub struct TransactionLog {
    entries: Vec<Transaction>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All transactions in execution order
    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.entries.iter()
    }

    /// Transaction by 1-based id
    pub fn get(&self, id: u64) -> Option<&Transaction> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.entries.get(index)
    }

    pub fn last(&self) -> Option<&Transaction> {
        self.entries.last()
    }

    /// Entries with id greater than `after`, for incremental readers
    pub fn since(&self, after: u64) -> &[Transaction] {
        let start = usize::try_from(after).unwrap_or(usize::MAX).min(self.entries.len());
        &self.entries[start..]
    }

    /// Record a trade. The id is the entry's 1-based log position.
    pub(crate) fn append(
        &mut self,
        asset: Arc<Asset>,
        buy_order: OrderRef,
        sell_order: OrderRef,
        shares: u64,
        price: u64,
        timestamp: u64,
    ) -> &Transaction {
        let id = self.entries.len() as u64 + 1;
        self.entries.push(Transaction::new(
            id, asset, buy_order, sell_order, shares, price, timestamp,
        ));
        &self.entries[self.entries.len() - 1]
    }

    /// SHA-256 over the SSZ encoding of every record, in log order
    pub fn state_root(&self) -> EngineResult<[u8; 32]> {
        let mut hasher = Sha256::new();
        for entry in &self.entries {
            let bytes = ssz_rs::serialize(&entry.record())
                .map_err(|e| EngineError::Encoding(format!("{e:?}")))?;
            hasher.update(&bytes);
        }
        Ok(hasher.finalize().into())
    }
}
