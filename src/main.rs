//! Matchbook - Binary Entry Point
//!
//! Starts the matching thread with the config from the first argument (or
//! `matchbook.toml`), runs a short two-seller session against one buyer,
//! and prints the resulting transaction log and receipt.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use matchbook::types::price::{from_fixed_trimmed, to_fixed, total_to_string};
use matchbook::types::{Asset, Investor, Order, OrderRef, Position, Side};
use matchbook::{AppConfig, EngineError, Exchange};

fn main() -> ExitCode {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("matchbook.toml"));

    let config = match AppConfig::load_or_default(&path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "session failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: AppConfig) -> Result<(), EngineError> {
    let exchange = Exchange::start(config.engine)?;

    let results = exchange.results().clone();
    let consumer = thread::spawn(move || {
        for order in results.iter() {
            tracing::info!(order = %order, "order updated");
        }
    });

    let asset = Arc::new(Asset::new("asset1", "Asset 1", 1000));
    let investor1 = Arc::new(Investor::new("1"));
    investor1.add_asset_position(Position::new("asset1", 3));
    let investor2 = Arc::new(Investor::new("2"));
    let investor3 = Arc::new(Investor::new("3"));
    investor3.add_asset_position(Position::new("asset1", 5));

    let price = to_fixed("5").ok_or(EngineError::InvalidOrder {
        order_id: "-".to_string(),
        reason: "price out of range",
    })?;
    let order = |id: &str, investor: &Arc<Investor>, shares: u64, side: Side| -> OrderRef {
        Arc::new(Order::new(id, investor.clone(), asset.clone(), shares, price, side))
    };

    let buy = order("2", &investor2, 5, Side::Buy);
    let first_sell = order("1", &investor1, 3, Side::Sell);
    let second_sell = order("3", &investor3, 2, Side::Sell);

    let completion = exchange.completion();
    completion.add(2);
    exchange.submit(buy.clone())?;
    exchange.submit(first_sell.clone())?;
    exchange.submit(second_sell.clone())?;
    if !completion.wait_timeout(Duration::from_secs(5)) {
        tracing::warn!(pending = completion.pending(), "timed out waiting for matches");
    }

    println!("Orders:");
    for o in [&buy, &first_sell, &second_sell] {
        println!("  {o}");
    }

    println!("Transactions:");
    for tx in exchange.transactions() {
        println!(
            "  #{} {} buy={} sell={} shares={} price={} total={}",
            tx.id,
            tx.asset.id,
            tx.buy_order.id,
            tx.sell_order.id,
            tx.shares,
            from_fixed_trimmed(tx.price),
            total_to_string(tx.total),
        );
    }

    println!("Positions:");
    for investor in [&investor1, &investor2, &investor3] {
        println!("  investor {}: {}", investor.id, investor.shares("asset1"));
    }

    let receipt = exchange.receipt()?;
    println!("Receipt:");
    println!("  orders processed: {}", receipt.orders_processed);
    println!("  trades executed:  {}", receipt.trades_executed);
    if let Some(rate) = receipt.trades_per_order() {
        println!("  trades per order: {rate:.2}");
    }
    println!("  state root:       {}", receipt.state_root_hex());

    exchange.shutdown()?;
    consumer.join().map_err(|_| EngineError::WorkerPanicked)?;
    Ok(())
}
