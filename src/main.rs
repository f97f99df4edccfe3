//! Resting Book - demo binary
//!
//! Replays a handful of add / cancel / amend sequences and prints the top of
//! the book after each one. Set `RUST_LOG=resting_book=trace` to see every
//! book operation.

use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use resting_book::types::price::{from_fixed_dp, from_fixed_trimmed, to_fixed};
use resting_book::{BookConfig, BookError, OrderBook, Side};
use tracing::error;
use tracing_subscriber::EnvFilter;

const DISPLAY_DEPTH: usize = 5;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("===========================================");
    println!("  Resting Book - limit order book demo");
    println!("===========================================");

    let scenarios: [(&str, fn() -> Result<(), BookError>); 6] = [
        ("Basic order operations", basic_operations),
        ("Snapshot", snapshot),
        ("Cancellation", cancellation),
        ("Amendment", amendment),
        ("FIFO priority at one price", fifo_priority),
        ("Mixed sequence", mixed_sequence),
    ];

    for (number, (title, run)) in scenarios.iter().enumerate() {
        println!();
        println!("--- {}. {} ---", number + 1, title);
        if let Err(err) = run() {
            error!(%err, scenario = title, "scenario failed");
            eprintln!("ERROR: {err}");
            return ExitCode::FAILURE;
        }
    }

    println!();
    println!("All scenarios completed.");
    ExitCode::SUCCESS
}

// ============================================================================
// Scenarios
// ============================================================================

fn basic_operations() -> Result<(), BookError> {
    let mut book = new_book();

    add(&mut book, 1001, Side::Buy, "100.50", "500")?;
    add(&mut book, 1002, Side::Buy, "100.25", "300")?;
    add(&mut book, 1003, Side::Buy, "100.50", "200")?;
    add(&mut book, 1004, Side::Buy, "100.00", "400")?;

    add(&mut book, 2001, Side::Sell, "101.00", "350")?;
    add(&mut book, 2002, Side::Sell, "101.25", "250")?;
    add(&mut book, 2003, Side::Sell, "101.00", "150")?;
    add(&mut book, 2004, Side::Sell, "101.50", "600")?;

    print_book(&book, DISPLAY_DEPTH);
    Ok(())
}

fn snapshot() -> Result<(), BookError> {
    let mut book = new_book();

    add(&mut book, 1001, Side::Buy, "99.75", "1000")?;
    add(&mut book, 1002, Side::Buy, "99.50", "800")?;
    add(&mut book, 1003, Side::Buy, "99.75", "500")?;
    add(&mut book, 2001, Side::Sell, "100.25", "700")?;
    add(&mut book, 2002, Side::Sell, "100.50", "600")?;
    add(&mut book, 2003, Side::Sell, "100.25", "300")?;

    let snapshot = book.snapshot(3);
    println!("Top 3 bid levels:");
    for (i, level) in snapshot.bids.iter().enumerate() {
        println!("  {}: {} x {}", i + 1, fmt_price(level.price), fmt_qty(level.total_quantity));
    }
    println!("Top 3 ask levels:");
    for (i, level) in snapshot.asks.iter().enumerate() {
        println!("  {}: {} x {}", i + 1, fmt_price(level.price), fmt_qty(level.total_quantity));
    }

    print_book(&book, 3);
    Ok(())
}

fn cancellation() -> Result<(), BookError> {
    let mut book = new_book();

    add(&mut book, 1001, Side::Buy, "50.00", "100")?;
    add(&mut book, 1002, Side::Buy, "50.00", "200")?;
    add(&mut book, 1003, Side::Buy, "49.50", "150")?;
    add(&mut book, 2001, Side::Sell, "51.00", "120")?;
    add(&mut book, 2002, Side::Sell, "51.50", "180")?;
    print_book(&book, DISPLAY_DEPTH);

    println!("Cancel 1002: {}", outcome(book.cancel(1002)));
    println!("Cancel 9999: {} (expected)", outcome(book.cancel(9999)));

    print_book(&book, DISPLAY_DEPTH);
    Ok(())
}

fn amendment() -> Result<(), BookError> {
    let mut book = new_book();

    add(&mut book, 1001, Side::Buy, "100.00", "500")?;
    add(&mut book, 1002, Side::Buy, "99.50", "300")?;
    add(&mut book, 2001, Side::Sell, "101.00", "400")?;
    print_book(&book, DISPLAY_DEPTH);

    println!("Amend 1001: quantity 500 -> 800 at 100.00");
    let applied = book.amend_order(1001, px("100.00"), px("800"))?;
    println!("  {}", outcome(applied));
    print_book(&book, DISPLAY_DEPTH);

    println!("Amend 2001: price 101.00 -> 100.75");
    let applied = book.amend_order(2001, px("100.75"), px("400"))?;
    println!("  {}", outcome(applied));
    print_book(&book, DISPLAY_DEPTH);
    Ok(())
}

fn fifo_priority() -> Result<(), BookError> {
    let mut book = new_book();

    add(&mut book, 1001, Side::Buy, "100.00", "100")?;
    add(&mut book, 1002, Side::Buy, "100.00", "200")?;
    add(&mut book, 1003, Side::Buy, "100.00", "150")?;

    let queue: Vec<String> = book
        .orders_at(Side::Buy, px("100.00"))
        .map(|order| format!("{} ({})", order.id, fmt_qty(order.quantity)))
        .collect();
    println!("Queue at 100.00: {}", queue.join(" -> "));

    if let Some(level) = book.best_bid_level() {
        println!("Aggregated quantity at 100.00: {} (expected 450)", fmt_qty(level.total_quantity));
    }
    print_book(&book, DISPLAY_DEPTH);
    Ok(())
}

fn mixed_sequence() -> Result<(), BookError> {
    let mut book = new_book();

    add(&mut book, 1001, Side::Buy, "99.00", "1000")?;
    add(&mut book, 1002, Side::Buy, "98.50", "800")?;
    add(&mut book, 1003, Side::Buy, "98.00", "600")?;
    add(&mut book, 2001, Side::Sell, "100.00", "900")?;
    add(&mut book, 2002, Side::Sell, "100.50", "700")?;
    add(&mut book, 2003, Side::Sell, "101.00", "500")?;
    print_book(&book, DISPLAY_DEPTH);

    add(&mut book, 1004, Side::Buy, "99.25", "500")?;
    book.cancel(2002);
    book.amend_order(1001, px("99.50"), px("1200"))?;

    print_book(&book, DISPLAY_DEPTH);
    println!("State root: {}", book.state_root_hex()?);
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn new_book() -> OrderBook {
    OrderBook::with_config(BookConfig::default().with_verify_invariants(true))
}

fn add(book: &mut OrderBook, id: u64, side: Side, price: &str, quantity: &str) -> Result<usize, BookError> {
    book.add(id, side, px(price), px(quantity), now_ns())
}

/// Demo literals are always valid decimals
fn px(s: &str) -> u64 {
    to_fixed(s).unwrap_or_default()
}

fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

fn fmt_price(price: u64) -> String {
    from_fixed_dp(price, 2)
}

fn fmt_qty(quantity: u64) -> String {
    from_fixed_trimmed(quantity)
}

fn outcome(ok: bool) -> &'static str {
    if ok {
        "SUCCESS"
    } else {
        "NOT FOUND"
    }
}

/// Asks best-last above the spread line, bids best-first below it
fn print_book(book: &OrderBook, depth: usize) {
    let snapshot = book.snapshot(depth);

    println!("+------------------------------------+");
    println!("| ASK  {:>12} | {:>14} |", "price", "quantity");
    if snapshot.asks.is_empty() {
        println!("|  (no sell orders)                  |");
    }
    for level in snapshot.asks.iter().rev() {
        println!("|      {:>12} | {:>14} |", fmt_price(level.price), fmt_qty(level.total_quantity));
    }
    match book.spread() {
        Some(spread) => println!("|------ spread {:>10} -----------|", fmt_price(spread)),
        None => println!("|------------------------------------|"),
    }
    for level in &snapshot.bids {
        println!("|      {:>12} | {:>14} |", fmt_price(level.price), fmt_qty(level.total_quantity));
    }
    if snapshot.bids.is_empty() {
        println!("|  (no buy orders)                   |");
    }
    println!("| BID                                |");
    println!("+------------------------------------+");
}
