//! Benchmarks for the matching engine.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark
//! cargo bench -- single_match
//! ```
//!
//! Results are saved to `target/criterion/` with HTML reports.
//!
//! Orders carry their arrival sequence once submitted, so every iteration
//! builds fresh orders in its setup closure.

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use std::sync::Arc;
use std::time::Duration;

use matchbook::engine::{PositionLedger, TransactionLog};
use matchbook::{Asset, AssetBook, Investor, MatchingEngine, Order, OrderRef, Position, Side};

// ============================================================================
// HELPER FUNCTIONS - Deterministic order generation
// ============================================================================

/// Base price: 100.00000000 (in fixed-point)
const BASE_PRICE: u64 = 10_000_000_000;

/// One tick: 0.01
const TICK: u64 = 1_000_000;

/// Resting size that outlasts any number of one-share takers
const DEEP: u64 = 1_000_000_000_000;

struct Fixture {
    asset: Arc<Asset>,
    investor: Arc<Investor>,
}

impl Fixture {
    fn new() -> Self {
        let investor = Investor::new("bench");
        investor.add_asset_position(Position::new("asset1", i64::MAX / 2));
        Self {
            asset: Arc::new(Asset::new("asset1", "Asset 1", u64::MAX)),
            investor: Arc::new(investor),
        }
    }

    fn order(&self, side: Side, price: u64, shares: u64) -> OrderRef {
        Arc::new(Order::new(
            "bench",
            self.investor.clone(),
            self.asset.clone(),
            shares,
            price,
            side,
        ))
    }
}

struct Session {
    engine: MatchingEngine,
    ledger: PositionLedger,
    log: TransactionLog,
}

impl Session {
    fn new(capacity: usize) -> Self {
        Self {
            engine: MatchingEngine::with_book_capacity(capacity),
            ledger: PositionLedger::new(),
            log: TransactionLog::new(),
        }
    }

    fn submit(&mut self, order: OrderRef) -> usize {
        self.engine
            .match_order(order, &mut self.ledger, &mut self.log, 0)
            .map(|r| r.transactions.len())
            .unwrap_or(0)
    }

    /// Rest `count` sells at increasing prices starting from `base`
    fn populate_asks(&mut self, fx: &Fixture, count: usize, base: u64, step: u64, shares: u64) {
        for i in 0..count {
            self.submit(fx.order(Side::Sell, base + i as u64 * step, shares));
        }
    }

    /// Rest `count` buys at decreasing prices starting from `base`
    fn populate_bids(&mut self, fx: &Fixture, count: usize, base: u64, step: u64, shares: u64) {
        for i in 0..count {
            self.submit(fx.order(Side::Buy, base - i as u64 * step, shares));
        }
    }
}

/// (side, price, shares) triples from a seeded RNG.
fn generate_order_specs(count: usize, seed: u64) -> Vec<(Side, u64, u64)> {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
            let ticks: i64 = rng.gen_range(-500..=500);
            let price = (BASE_PRICE as i64 + ticks * TICK as i64) as u64;
            (side, price, rng.gen_range(1..=100))
        })
        .collect()
}

// ============================================================================
// BENCHMARK: Single Match Latency
// ============================================================================

fn bench_single_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_match");
    group.measurement_time(Duration::from_secs(10));

    // Match a buy against the best of 1,000 resting asks
    group.bench_function("against_1k_orders", |b| {
        let fx = Fixture::new();
        let mut session = Session::new(2000);
        session.populate_asks(&fx, 1000, BASE_PRICE, TICK, DEEP);

        b.iter_batched(
            || fx.order(Side::Buy, BASE_PRICE, 1),
            |buy| black_box(session.submit(buy)),
            BatchSize::SmallInput,
        );
    });

    // A buy that sweeps ten price levels
    group.bench_function("multi_level_sweep", |b| {
        let fx = Fixture::new();
        b.iter_batched(
            || {
                let mut session = Session::new(200);
                session.populate_asks(&fx, 100, BASE_PRICE, TICK, 10);
                (session, fx.order(Side::Buy, BASE_PRICE + 10 * TICK, 100))
            },
            |(mut session, buy)| black_box(session.submit(buy)),
            BatchSize::SmallInput,
        );
    });

    // No cross: the buy rests
    group.bench_function("no_match_rest_on_book", |b| {
        let fx = Fixture::new();
        b.iter_batched(
            || {
                let mut session = Session::new(2000);
                session.populate_asks(&fx, 1000, BASE_PRICE, TICK, 10);
                (session, fx.order(Side::Buy, BASE_PRICE - TICK, 10))
            },
            |(mut session, buy)| black_box(session.submit(buy)),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: Book Operations
// ============================================================================

fn bench_book_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("book_operations");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("insert_to_empty", |b| {
        let fx = Fixture::new();
        b.iter_batched(
            || (AssetBook::new("asset1"), fx.order(Side::Buy, BASE_PRICE, 10)),
            |(mut book, order)| black_box(book.insert(order)),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("insert_to_1k_book", |b| {
        let fx = Fixture::new();
        b.iter_batched(
            || {
                let mut book = AssetBook::with_capacity("asset1", 2000);
                for i in 0..500u64 {
                    book.insert(fx.order(Side::Sell, BASE_PRICE + i * TICK, 10));
                    book.insert(fx.order(Side::Buy, BASE_PRICE - (i + 1) * TICK, 10));
                }
                (book, fx.order(Side::Buy, BASE_PRICE - 250 * TICK, 10))
            },
            |(mut book, order)| black_box(book.insert(order)),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("remove_from_middle", |b| {
        let fx = Fixture::new();
        b.iter_batched(
            || {
                let mut book = AssetBook::with_capacity("asset1", 2000);
                let orders: Vec<_> = (0..1000u64)
                    .map(|i| fx.order(Side::Buy, BASE_PRICE - i * TICK, 10))
                    .collect();
                for order in &orders {
                    book.insert(order.clone());
                }
                (book, orders[500].clone())
            },
            |(mut book, order)| black_box(book.remove(&order)),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: Throughput
// ============================================================================

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");
    group.measurement_time(Duration::from_secs(15));
    group.sample_size(50);

    for batch_size in [1_000, 10_000, 50_000] {
        group.throughput(Throughput::Elements(batch_size as u64));

        group.bench_with_input(
            BenchmarkId::new("orders", batch_size),
            &batch_size,
            |b, &size| {
                let fx = Fixture::new();
                let specs = generate_order_specs(size, 42);

                b.iter_batched(
                    || {
                        let orders: Vec<_> = specs
                            .iter()
                            .map(|&(side, price, shares)| fx.order(side, price, shares))
                            .collect();
                        (Session::new(size), orders)
                    },
                    |(mut session, orders)| {
                        let mut trades = 0;
                        for order in orders {
                            trades += session.submit(order);
                        }
                        black_box(trades)
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

// ============================================================================
// BENCHMARK: Large Book
// ============================================================================

fn bench_large_book(c: &mut Criterion) {
    let mut group = c.benchmark_group("large_book");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(50);

    group.bench_function("match_in_100k_book", |b| {
        let fx = Fixture::new();
        let mut session = Session::new(120_000);
        session.populate_asks(&fx, 50_000, BASE_PRICE, TICK / 10, DEEP);
        session.populate_bids(&fx, 50_000, BASE_PRICE - TICK, TICK / 10, 10);

        b.iter_batched(
            || fx.order(Side::Buy, BASE_PRICE, 1),
            |buy| black_box(session.submit(buy)),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ============================================================================
// CRITERION ENTRY POINT
// ============================================================================

criterion_group!(
    benches,
    bench_single_match,
    bench_book_operations,
    bench_throughput,
    bench_large_book
);

criterion_main!(benches);
