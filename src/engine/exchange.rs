//! Threaded runtime around the matching core.
//!
//! ## Concurrency Model
//!
//! One dedicated thread owns the [`MatchingEngine`] and every asset book.
//! It takes orders off the intake channel one at a time, so the channel's
//! order is the arrival order. Producers on any number of threads submit
//! through an [`OrderSubmitter`]; with the default zero-capacity intake a
//! submission returns only once the matching thread has taken the order.
//!
//! After an order that traded, each touched order still open is sent on the
//! result channel. With the default zero-capacity result channel that send
//! blocks until a consumer receives it, so anyone who wants the engine to
//! keep moving must drain [`ExchangeHandle::results`]. The
//! [`CompletionSignal`] is decremented after the results for that order have
//! been handed off.
//!
//! The transaction log and position ledger are written only by the matching
//! thread, under `RwLock`s held for the whole matching step. Reads through
//! [`ExchangeHandle`] (`transactions`, `transaction_count`, `position`,
//! `receipt`) therefore see either the state before an order or the state
//! after it. Shared [`Order`](crate::types::Order) fill state and
//! [`Investor::shares`](crate::types::Investor::shares) read directly are
//! not covered by those locks and may show a step in progress; wait on the
//! [`CompletionSignal`] before reading them.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use matchbook::config::EngineConfig;
//! use matchbook::engine::Exchange;
//! use matchbook::types::{Asset, Investor, Order, OrderStatus, Position, Side};
//! use matchbook::types::price::to_fixed;
//!
//! let exchange = Exchange::start(EngineConfig::default()).unwrap();
//!
//! let asset = Arc::new(Asset::new("asset1", "Asset 1", 100));
//! let seller = Arc::new(Investor::new("1"));
//! seller.add_asset_position(Position::new("asset1", 10));
//! let buyer = Arc::new(Investor::new("2"));
//!
//! let sell = Arc::new(Order::new("1", seller, asset.clone(), 5, to_fixed("5").unwrap(), Side::Sell));
//! let buy = Arc::new(Order::new("2", buyer, asset, 5, to_fixed("5").unwrap(), Side::Buy));
//!
//! exchange.completion().add(1);
//! exchange.submit(sell.clone()).unwrap();
//! exchange.submit(buy.clone()).unwrap();
//! exchange.completion().wait();
//!
//! assert_eq!(buy.status(), OrderStatus::Closed);
//! assert_eq!(exchange.position("2", "asset1"), 5);
//! exchange.shutdown().unwrap();
//! ```

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{SystemTime, UNIX_EPOCH};

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::RwLock;

use crate::config::EngineConfig;
use crate::engine::{CompletionSignal, MatcherStats, MatchingEngine, PositionLedger, TransactionLog};
use crate::error::{EngineError, EngineResult};
use crate::types::{ExecutionReceipt, OrderRef, Transaction};

/// State the matching thread writes and everyone else may read.
#[derive(Debug, Default)]
struct SharedState {
    ledger: RwLock<PositionLedger>,
    log: RwLock<TransactionLog>,
    stats: RwLock<MatcherStats>,
}

/// Cloneable intake handle for producer threads.
#[derive(Debug, Clone)]
pub struct OrderSubmitter {
    intake: Sender<OrderRef>,
}

impl OrderSubmitter {
    /// Hand an order to the matching thread.
    ///
    /// Orders with zero shares or a zero price, and orders that were already
    /// submitted, are refused here and never reach the book. Blocks until
    /// the matching thread takes the order when the intake is unbuffered.
    pub fn submit(&self, order: OrderRef) -> EngineResult<()> {
        if order.shares == 0 {
            return Err(EngineError::InvalidOrder {
                order_id: order.id.clone(),
                reason: "shares must be positive",
            });
        }
        if order.price == 0 {
            return Err(EngineError::InvalidOrder {
                order_id: order.id.clone(),
                reason: "price must be positive",
            });
        }
        if order.sequence().is_some() {
            return Err(EngineError::AlreadySubmitted(order.id.clone()));
        }

        self.intake.send(order).map_err(|_| EngineError::Disconnected)
    }
}

/// Entry point for starting the matching thread.
pub struct Exchange;

impl Exchange {
    /// Spawn the matching thread.
    pub fn start(config: EngineConfig) -> EngineResult<ExchangeHandle> {
        config.validate()?;

        let (intake_tx, intake_rx) = channel::bounded(config.intake_buffer);
        let (result_tx, result_rx) = channel::bounded(config.result_buffer);
        let completion = Arc::new(CompletionSignal::new());
        let state = Arc::new(SharedState::default());

        let worker = {
            let completion = completion.clone();
            let state = state.clone();
            let engine = MatchingEngine::with_book_capacity(config.book_capacity);
            thread::Builder::new()
                .name(config.thread_name.clone())
                .spawn(move || run(engine, intake_rx, result_tx, completion, state))
                .map_err(EngineError::Spawn)?
        };

        tracing::info!(
            thread = %config.thread_name,
            intake_buffer = config.intake_buffer,
            result_buffer = config.result_buffer,
            "matching thread started"
        );

        Ok(ExchangeHandle {
            submitter: OrderSubmitter { intake: intake_tx },
            results: result_rx,
            completion,
            state,
            worker: Some(worker),
        })
    }
}

/// Handle to a running matching thread.
///
/// Dropping the handle without [`ExchangeHandle::shutdown`] detaches the
/// thread; it exits once every submitter is gone.
#[derive(Debug)]
pub struct ExchangeHandle {
    submitter: OrderSubmitter,
    results: Receiver<OrderRef>,
    completion: Arc<CompletionSignal>,
    state: Arc<SharedState>,
    worker: Option<JoinHandle<MatcherStats>>,
}

impl ExchangeHandle {
    /// Submit an order (see [`OrderSubmitter::submit`])
    pub fn submit(&self, order: OrderRef) -> EngineResult<()> {
        self.submitter.submit(order)
    }

    /// A submitter that can be moved to another thread
    pub fn submitter(&self) -> OrderSubmitter {
        self.submitter.clone()
    }

    /// Orders left open with a changed pending quantity.
    ///
    /// The receiver can be cloned and drained from another thread.
    pub fn results(&self) -> &Receiver<OrderRef> {
        &self.results
    }

    pub fn completion(&self) -> Arc<CompletionSignal> {
        self.completion.clone()
    }

    /// Snapshot of the transaction log
    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.log.read().entries().to_vec()
    }

    pub fn transaction_count(&self) -> usize {
        self.state.log.read().len()
    }

    /// Shares an investor holds in an asset
    pub fn position(&self, investor_id: &str, asset_id: &str) -> i64 {
        self.state.ledger.read().position(investor_id, asset_id)
    }

    pub fn stats(&self) -> MatcherStats {
        *self.state.stats.read()
    }

    /// Summary of everything processed so far, with the log state root
    pub fn receipt(&self) -> EngineResult<ExecutionReceipt> {
        let log = self.state.log.read();
        let stats = *self.state.stats.read();
        Ok(ExecutionReceipt::new(
            stats.last_sequence,
            stats.orders_processed,
            log.len() as u64,
            log.state_root()?,
            now_millis(),
        ))
    }

    /// Close the intake, drain outstanding results, and join the thread.
    ///
    /// Blocks until every [`OrderSubmitter`] clone has been dropped.
    pub fn shutdown(self) -> EngineResult<MatcherStats> {
        let ExchangeHandle {
            submitter,
            results,
            worker,
            ..
        } = self;
        drop(submitter);

        // Keep receiving so a blocked publication can complete
        for _ in results.iter() {}

        let stats = match worker {
            Some(worker) => worker.join().map_err(|_| EngineError::WorkerPanicked)?,
            None => MatcherStats::default(),
        };
        tracing::info!(
            orders = stats.orders_processed,
            trades = stats.trades_executed,
            "matching thread stopped"
        );
        Ok(stats)
    }
}

fn run(
    mut engine: MatchingEngine,
    intake: Receiver<OrderRef>,
    results: Sender<OrderRef>,
    completion: Arc<CompletionSignal>,
    state: Arc<SharedState>,
) -> MatcherStats {
    for order in intake.iter() {
        let outcome = {
            let mut ledger = state.ledger.write();
            let mut log = state.log.write();
            let outcome = engine.match_order(order, &mut ledger, &mut log, now_millis());
            *state.stats.write() = engine.stats();
            outcome
        };

        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(error = %err, "order skipped");
                continue;
            }
        };
        if !result.traded() {
            continue;
        }

        for updated in result.updated {
            if results.send(updated).is_err() {
                tracing::debug!("result receiver dropped");
                break;
            }
        }
        completion.done();
    }

    engine.stats()
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::types::price::to_fixed;
    use crate::types::{Asset, Investor, Order, Side};

    fn order(id: &str, shares: u64, price: u64, side: Side) -> OrderRef {
        Arc::new(Order::new(
            id,
            Arc::new(Investor::new(id)),
            Arc::new(Asset::new("asset1", "Asset 1", 100)),
            shares,
            price,
            side,
        ))
    }

    #[test]
    fn test_submit_rejects_degenerate_orders() {
        let exchange = Exchange::start(EngineConfig::default()).unwrap();

        let err = exchange.submit(order("zero-shares", 0, 1, Side::Buy)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidOrder { .. }));

        let err = exchange.submit(order("zero-price", 1, 0, Side::Buy)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidOrder { .. }));

        assert_eq!(exchange.shutdown().unwrap().orders_processed, 0);
    }

    #[test]
    fn test_submit_rejects_resubmission() {
        let exchange = Exchange::start(EngineConfig::default()).unwrap();
        let o = order("1", 1, to_fixed("5").unwrap(), Side::Sell);

        exchange.submit(o.clone()).unwrap();
        // The rendezvous completes only once the first order is fully
        // processed, so its sequence is assigned by now
        exchange.submit(order("2", 1, to_fixed("6").unwrap(), Side::Sell)).unwrap();
        assert_eq!(o.sequence(), Some(1));

        let err = exchange.submit(o).unwrap_err();
        assert!(matches!(err, EngineError::AlreadySubmitted(id) if id == "1"));

        assert_eq!(exchange.shutdown().unwrap().orders_processed, 2);
    }

    #[test]
    fn test_unread_result_holds_back_completion() {
        let exchange = Exchange::start(EngineConfig::default()).unwrap();
        let price = to_fixed("5").unwrap();
        let buy = order("buy", 5, price, Side::Buy);
        let completion = exchange.completion();

        completion.add(1);
        exchange.submit(buy.clone()).unwrap();
        exchange.submit(order("sell", 2, price, Side::Sell)).unwrap();

        // Nobody is receiving, so publication of the partly filled buy blocks
        assert!(!completion.wait_timeout(Duration::from_millis(200)));
        assert_eq!(completion.pending(), 1);

        let published = exchange
            .results()
            .recv_timeout(Duration::from_secs(5))
            .unwrap();
        assert!(Arc::ptr_eq(&published, &buy));
        assert!(completion.wait_timeout(Duration::from_secs(5)));
        assert_eq!(completion.pending(), 0);

        exchange.shutdown().unwrap();
    }

    #[test]
    fn test_shutdown_drains_blocked_publication() {
        let exchange = Exchange::start(EngineConfig::default()).unwrap();
        let price = to_fixed("5").unwrap();

        exchange.submit(order("buy", 5, price, Side::Buy)).unwrap();
        // Partially fills the buy, which then waits on the result channel
        exchange.submit(order("sell", 2, price, Side::Sell)).unwrap();

        let stats = exchange.shutdown().unwrap();
        assert_eq!(stats.trades_executed, 1);
    }

    #[test]
    fn test_buffered_results() {
        let config = EngineConfig {
            result_buffer: 8,
            ..EngineConfig::default()
        };
        let exchange = Exchange::start(config).unwrap();
        let price = to_fixed("5").unwrap();
        let buy = order("buy", 5, price, Side::Buy);

        exchange.completion().add(1);
        exchange.submit(buy.clone()).unwrap();
        exchange.submit(order("sell", 2, price, Side::Sell)).unwrap();
        assert!(exchange.completion().wait_timeout(Duration::from_secs(5)));

        let published = exchange.results().try_recv().unwrap();
        assert!(Arc::ptr_eq(&published, &buy));
        assert_eq!(published.pending_shares(), 3);

        let receipt = exchange.receipt().unwrap();
        assert_eq!(receipt.orders_processed, 2);
        assert_eq!(receipt.trades_executed, 1);
        assert_eq!(receipt.last_sequence, 2);
        exchange.shutdown().unwrap();
    }

    #[test]
    fn test_invalid_config_refused() {
        let config = EngineConfig {
            book_capacity: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            Exchange::start(config),
            Err(EngineError::Config(_))
        ));
    }
}
