//! Behavioural tests for the public book API.
//!
//! Each scenario runs with invariant verification switched on, so every
//! mutation is also cross-checked by `check_integrity`.

use resting_book::types::price::to_fixed;
use resting_book::{BookConfig, BookError, OrderBook, Side};

fn px(s: &str) -> u64 {
    to_fixed(s).expect("valid decimal literal")
}

fn book() -> OrderBook {
    OrderBook::with_config(BookConfig::default().with_verify_invariants(true))
}

fn queue(book: &OrderBook, side: Side, price: &str) -> Vec<u64> {
    book.orders_at(side, px(price)).map(|o| o.id).collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn aggregates_same_price_best_first() {
    let mut book = book();
    book.add(1, Side::Buy, px("100.50"), px("500"), 0).unwrap();
    book.add(2, Side::Buy, px("100.25"), px("300"), 1).unwrap();
    book.add(3, Side::Buy, px("100.50"), px("200"), 2).unwrap();

    let snapshot = book.snapshot(2);
    assert_eq!(
        snapshot.bid_pairs(),
        vec![(px("100.50"), px("700")), (px("100.25"), px("300"))]
    );
    assert!(snapshot.asks.is_empty());
    assert_eq!(snapshot.bids[0].order_count, 2);
}

#[test]
fn cancel_leaves_remaining_quantity() {
    let mut book = book();
    book.add(1, Side::Buy, px("100.00"), px("100"), 0).unwrap();
    book.add(2, Side::Buy, px("100.00"), px("200"), 1).unwrap();

    assert!(book.cancel(1));

    assert_eq!(book.snapshot(1).bid_pairs(), vec![(px("100.00"), px("200"))]);
    assert_eq!(queue(&book, Side::Buy, "100.00"), vec![2]);
}

#[test]
fn quantity_amend_updates_aggregate_in_place() {
    let mut book = book();
    book.add(1, Side::Buy, px("100.00"), px("500"), 0).unwrap();

    assert_eq!(book.amend_order(1, px("100.00"), px("800")), Ok(true));

    assert_eq!(book.snapshot(5).bid_pairs(), vec![(px("100.00"), px("800"))]);
    assert_eq!(queue(&book, Side::Buy, "100.00"), vec![1]);
}

#[test]
fn price_amend_moves_level() {
    let mut book = book();
    book.add(1, Side::Sell, px("101.00"), px("400"), 0).unwrap();

    assert_eq!(book.amend_order(1, px("100.75"), px("400")), Ok(true));

    let asks = book.snapshot(5).ask_pairs();
    assert_eq!(asks, vec![(px("100.75"), px("400"))]);
    assert!(book.level(Side::Sell, px("101.00")).is_none());
}

#[test]
fn cancel_unknown_on_empty_book() {
    let mut book = book();

    assert!(book.cancel_order(999).is_none());
    assert!(book.is_empty());
    assert!(book.snapshot(10).is_empty());
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn sides_iterate_in_strict_priority_order() {
    let mut book = book();
    let prices = ["99.00", "101.00", "100.00", "98.50", "100.50"];
    for (i, p) in prices.iter().enumerate() {
        book.add(i as u64 + 1, Side::Buy, px(p), px("1"), 0).unwrap();
        book.add(i as u64 + 100, Side::Sell, px(p), px("1"), 0).unwrap();
    }

    let bids: Vec<u64> = book.bids(10).iter().map(|l| l.price).collect();
    let asks: Vec<u64> = book.asks(10).iter().map(|l| l.price).collect();

    assert!(bids.windows(2).all(|w| w[0] > w[1]));
    assert!(asks.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(bids.len(), prices.len());
    assert_eq!(book.best_bid(), Some(px("101.00")));
    assert_eq!(book.best_ask(), Some(px("98.50")));
}

#[test]
fn fifo_follows_arrival_regardless_of_timestamp() {
    let mut book = book();
    // timestamps deliberately out of order; queue position follows insertion
    book.add(1, Side::Sell, px("50.00"), px("10"), 300).unwrap();
    book.add(2, Side::Sell, px("50.00"), px("10"), 100).unwrap();
    book.add(3, Side::Sell, px("50.00"), px("10"), 200).unwrap();

    assert_eq!(queue(&book, Side::Sell, "50.00"), vec![1, 2, 3]);
}

#[test]
fn quantity_amend_keeps_priority_among_peers() {
    let mut book = book();
    for id in 1..=3 {
        book.add(id, Side::Buy, px("100.00"), px("100"), 0).unwrap();
    }

    book.amend_order(2, px("100.00"), px("5")).unwrap();
    book.amend_order(1, px("100.00"), px("900")).unwrap();

    assert_eq!(queue(&book, Side::Buy, "100.00"), vec![1, 2, 3]);
    assert_eq!(
        book.level(Side::Buy, px("100.00")).map(|l| l.total_quantity),
        Some(px("1005"))
    );
}

#[test]
fn price_amend_forfeits_priority() {
    let mut book = book();
    book.add(1, Side::Buy, px("100.00"), px("100"), 0).unwrap();
    book.add(2, Side::Buy, px("100.00"), px("100"), 0).unwrap();
    book.add(3, Side::Buy, px("99.00"), px("100"), 0).unwrap();

    book.amend_order(1, px("99.00"), px("100")).unwrap();

    assert_eq!(queue(&book, Side::Buy, "100.00"), vec![2]);
    assert_eq!(queue(&book, Side::Buy, "99.00"), vec![3, 1]);
}

#[test]
fn failed_operations_leave_book_unchanged() {
    let mut book = book();
    book.add(1, Side::Buy, px("100.00"), px("100"), 0).unwrap();
    book.add(2, Side::Sell, px("101.00"), px("50"), 0).unwrap();
    let root = book.state_root().unwrap();
    let snapshot = book.snapshot(10);

    assert!(!book.cancel(999));
    assert_eq!(book.amend_order(999, px("100.00"), px("1")), Ok(false));
    assert_eq!(book.add(1, Side::Sell, px("102.00"), px("1"), 0), Err(BookError::DuplicateOrderId(1)));
    assert_eq!(book.add(3, Side::Buy, 0, px("1"), 0), Err(BookError::InvalidPrice(3)));
    assert_eq!(book.add(4, Side::Buy, px("1"), 0, 0), Err(BookError::InvalidQuantity(4)));
    assert_eq!(book.amend_order(1, px("100.00"), 0), Err(BookError::InvalidQuantity(1)));

    assert_eq!(book.state_root().unwrap(), root);
    assert_eq!(book.snapshot(10), snapshot);
    assert_eq!(book.order_count(), 2);
}

#[test]
fn levels_vanish_when_emptied() {
    let mut book = book();
    book.add(1, Side::Sell, px("10.00"), px("1"), 0).unwrap();
    book.add(2, Side::Sell, px("10.00"), px("1"), 0).unwrap();
    book.add(3, Side::Sell, px("11.00"), px("1"), 0).unwrap();

    book.cancel(1);
    book.amend_order(2, px("12.00"), px("1")).unwrap();

    let prices: Vec<u64> = book.asks(10).iter().map(|l| l.price).collect();
    assert_eq!(prices, vec![px("11.00"), px("12.00")]);
    assert!(book.asks(10).iter().all(|l| l.total_quantity > 0 && l.order_count > 0));
}

#[test]
fn snapshot_depth_has_no_padding() {
    let mut book = book();
    book.add(1, Side::Buy, px("1.00"), px("1"), 0).unwrap();

    let snapshot = book.snapshot(5);
    assert_eq!(snapshot.bids.len(), 1);
    assert!(snapshot.asks.is_empty());
    assert!(book.snapshot(0).is_empty());
}

#[test]
fn mixed_sequence_matches_expected_book() {
    let mut book = book();
    book.add(1001, Side::Buy, px("99.00"), px("1000"), 0).unwrap();
    book.add(1002, Side::Buy, px("98.50"), px("800"), 0).unwrap();
    book.add(1003, Side::Buy, px("98.00"), px("600"), 0).unwrap();
    book.add(2001, Side::Sell, px("100.00"), px("900"), 0).unwrap();
    book.add(2002, Side::Sell, px("100.50"), px("700"), 0).unwrap();
    book.add(2003, Side::Sell, px("101.00"), px("500"), 0).unwrap();

    book.add(1004, Side::Buy, px("99.25"), px("500"), 0).unwrap();
    assert!(book.cancel(2002));
    assert_eq!(book.amend_order(1001, px("99.50"), px("1200")), Ok(true));

    let snapshot = book.snapshot(5);
    assert_eq!(
        snapshot.bid_pairs(),
        vec![
            (px("99.50"), px("1200")),
            (px("99.25"), px("500")),
            (px("98.50"), px("800")),
            (px("98.00"), px("600")),
        ]
    );
    assert_eq!(
        snapshot.ask_pairs(),
        vec![(px("100.00"), px("900")), (px("101.00"), px("500"))]
    );
    assert_eq!(book.spread(), Some(px("0.50")));
    assert_eq!(book.check_integrity(), Ok(()));
}
