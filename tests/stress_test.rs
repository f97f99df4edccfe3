//! Randomized workload tests for the order book.
//!
//! These tests verify:
//! 1. The book agrees with a naive reference model under random add/cancel/amend
//! 2. Every invariant holds throughout a long run
//! 3. The same seed always produces the same state root
//!
//! ## Running Stress Tests
//!
//! ```bash
//! cargo test --release --test stress_test -- --nocapture
//! ```

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use resting_book::{BookConfig, LevelSnapshot, OrderBook, Side};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Base price: 100.00000000
const BASE_PRICE: u64 = 10_000_000_000;

/// Tick: 0.01
const TICK: u64 = 1_000_000;

/// Price band either side of the base, in ticks
const PRICE_TICKS: u64 = 50;

// ============================================================================
// REFERENCE MODEL
// ============================================================================

/// Deliberately simple model: one Vec per (side, price), scanned linearly.
#[derive(Default)]
struct Model {
    orders: HashMap<u64, (Side, u64, u64)>,
    queues: BTreeMap<(u8, u64), Vec<u64>>,
}

impl Model {
    fn add(&mut self, id: u64, side: Side, price: u64, quantity: u64) {
        self.orders.insert(id, (side, price, quantity));
        self.queues.entry((side.to_u8(), price)).or_default().push(id);
    }

    fn cancel(&mut self, id: u64) -> bool {
        let Some((side, price, _)) = self.orders.remove(&id) else {
            return false;
        };
        let key = (side.to_u8(), price);
        if let Some(queue) = self.queues.get_mut(&key) {
            queue.retain(|&queued| queued != id);
            if queue.is_empty() {
                self.queues.remove(&key);
            }
        }
        true
    }

    fn amend(&mut self, id: u64, price: u64, quantity: u64) -> bool {
        let Some(&(side, old_price, _)) = self.orders.get(&id) else {
            return false;
        };
        if old_price == price {
            self.orders.insert(id, (side, price, quantity));
        } else {
            self.cancel(id);
            self.add(id, side, price, quantity);
        }
        true
    }

    fn levels(&self, side: Side) -> Vec<LevelSnapshot> {
        let mut levels: Vec<LevelSnapshot> = self
            .queues
            .iter()
            .filter(|((s, _), _)| *s == side.to_u8())
            .map(|((_, price), queue)| {
                let total = queue.iter().map(|id| self.orders[id].2).sum();
                LevelSnapshot::new(*price, total, queue.len())
            })
            .collect();
        if side == Side::Buy {
            levels.reverse();
        }
        levels
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn random_price(rng: &mut ChaCha8Rng) -> u64 {
    BASE_PRICE - PRICE_TICKS * TICK + rng.gen_range(0..=2 * PRICE_TICKS) * TICK
}

fn random_quantity(rng: &mut ChaCha8Rng) -> u64 {
    rng.gen_range(1..=1_000) * 100_000_000
}

/// Run `ops` random operations, checking against the model every
/// `check_every` operations. Returns the final book.
fn run_workload(seed: u64, ops: usize, check_every: usize) -> OrderBook {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut book = OrderBook::with_capacity(ops);
    let mut model = Model::default();
    let mut live: Vec<u64> = Vec::new();
    let mut next_id = 1u64;

    for op in 0..ops {
        let roll: f64 = rng.gen();
        if live.is_empty() || roll < 0.5 {
            let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
            let price = random_price(&mut rng);
            let quantity = random_quantity(&mut rng);
            book.add(next_id, side, price, quantity, op as u64).unwrap();
            model.add(next_id, side, price, quantity);
            live.push(next_id);
            next_id += 1;
        } else if roll < 0.75 {
            let id = live.swap_remove(rng.gen_range(0..live.len()));
            assert!(book.cancel(id));
            assert!(model.cancel(id));
        } else if roll < 0.95 {
            let id = live[rng.gen_range(0..live.len())];
            let current = book.get_order(id).map(|o| o.price).unwrap();
            let price = if rng.gen_bool(0.5) { current } else { random_price(&mut rng) };
            let quantity = random_quantity(&mut rng);
            assert_eq!(book.amend_order(id, price, quantity), Ok(true));
            assert!(model.amend(id, price, quantity));
        } else {
            // unknown id
            let id = next_id + 1_000_000;
            assert!(!book.cancel(id));
            assert_eq!(book.amend_order(id, BASE_PRICE, 1), Ok(false));
        }

        if op % check_every == 0 {
            assert_matches_model(&book, &model);
        }
    }

    assert_matches_model(&book, &model);
    book
}

fn assert_matches_model(book: &OrderBook, model: &Model) {
    assert_eq!(book.check_integrity(), Ok(()));
    assert_eq!(book.order_count(), model.orders.len());
    assert_eq!(book.bids(usize::MAX), model.levels(Side::Buy));
    assert_eq!(book.asks(usize::MAX), model.levels(Side::Sell));

    for ((side_raw, price), queue) in &model.queues {
        let side = Side::from_u8(*side_raw).unwrap();
        let ids: Vec<u64> = book.orders_at(side, *price).map(|o| o.id).collect();
        assert_eq!(&ids, queue, "queue mismatch at {side} {price}");
    }
}

// ============================================================================
// STRESS TESTS
// ============================================================================

#[test]
fn random_workload_matches_reference_model() {
    for seed in [1, 7, 42] {
        run_workload(seed, 5_000, 50);
    }
}

#[test]
fn verify_determinism() {
    const OPS: usize = 10_000;
    const SEED: u64 = 12345;

    let root1 = run_workload(SEED, OPS, OPS).state_root().unwrap();
    let root2 = run_workload(SEED, OPS, OPS).state_root().unwrap();
    println!("Run 1 state root: {}", hex::encode(root1));
    println!("Run 2 state root: {}", hex::encode(root2));
    assert_eq!(root1, root2, "State roots must match for the same seed");

    let root3 = run_workload(SEED + 1, OPS, OPS).state_root().unwrap();
    assert_ne!(root1, root3, "Different seeds should produce different books");
}

#[test]
fn verified_book_survives_churn() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut book = OrderBook::with_config(
        BookConfig::default()
            .with_order_capacity(512)
            .with_verify_invariants(true),
    );

    for round in 0..20u64 {
        for i in 0..50 {
            let id = round * 1_000 + i;
            let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };
            book.add(id, side, random_price(&mut rng), random_quantity(&mut rng), 0).unwrap();
        }
        for i in (0..50).step_by(3) {
            book.cancel(round * 1_000 + i);
        }
    }

    assert_eq!(book.check_integrity(), Ok(()));
    assert_eq!(book.order_count(), 20 * (50 - 17));
}

#[test]
fn stress_cancellations() {
    const ORDER_COUNT: usize = 100_000;

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut book = OrderBook::with_capacity(ORDER_COUNT);

    let start = Instant::now();
    for i in 0..ORDER_COUNT as u64 {
        let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
        book.add(i + 1, side, random_price(&mut rng), random_quantity(&mut rng), i).unwrap();
    }
    for i in (1..=ORDER_COUNT as u64).rev() {
        assert!(book.cancel(i));
    }
    let elapsed = start.elapsed();

    println!("  Operations:    {:>12}", ORDER_COUNT * 2);
    println!("  Elapsed time:  {:>12.2?}", elapsed);
    println!(
        "  Throughput:    {:>12.0} ops/sec",
        (ORDER_COUNT * 2) as f64 / elapsed.as_secs_f64()
    );

    assert!(book.is_empty());
    assert_eq!(book.bid_levels(), 0);
    assert_eq!(book.ask_levels(), 0);
}
