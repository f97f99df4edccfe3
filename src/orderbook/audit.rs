//! Invariant checking and state hashing.
//!
//! [`OrderBook::check_integrity`] walks every queue and cross-checks it
//! against the level metadata, the side map and the order index.
//!
//! [`OrderBook::state_root`] hashes the observable book state (every resting
//! order, in priority order) so two books, or one book before and after an
//! operation, can be compared with a single 32-byte value.

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use slab::Slab;

use crate::orderbook::{BookSide, Locator, OrderBook, OrderNode, PriceLevel, PriceOrdering};
use crate::types::{BookError, IntegrityError, Side};

impl OrderBook {
    /// Verify every book invariant.
    ///
    /// O(n) in the number of resting orders.
    pub fn check_integrity(&self) -> Result<(), IntegrityError> {
        let queued = check_side(&self.bids, &self.orders, &self.order_index)?
            + check_side(&self.asks, &self.orders, &self.order_index)?;

        if self.order_index.len() != self.orders.len() || self.orders.len() != queued {
            return Err(IntegrityError::IndexSize {
                indexed: self.order_index.len(),
                stored: self.orders.len(),
                queued,
            });
        }
        Ok(())
    }

    /// SHA-256 over the SSZ encoding of every resting order: bids best level
    /// first, then asks best level first, FIFO within each level.
    ///
    /// ```
    /// use resting_book::OrderBook;
    /// use resting_book::types::Side;
    ///
    /// let mut book = OrderBook::new();
    /// book.add(1, Side::Buy, 100, 10, 0).unwrap();
    /// let before = book.state_root().unwrap();
    ///
    /// assert!(!book.cancel(999));
    /// assert_eq!(book.state_root().unwrap(), before);
    /// ```
    pub fn state_root(&self) -> Result<[u8; 32], BookError> {
        let mut hasher = Sha256::new();

        for (_, level) in self.bids.iter() {
            hash_level(&mut hasher, level, &self.orders)?;
        }
        for (_, level) in self.asks.iter() {
            hash_level(&mut hasher, level, &self.orders)?;
        }

        let mut root = [0u8; 32];
        root.copy_from_slice(&hasher.finalize());
        Ok(root)
    }

    /// [`state_root`](Self::state_root) as a hex string
    pub fn state_root_hex(&self) -> Result<String, BookError> {
        self.state_root().map(hex::encode)
    }
}

fn hash_level(hasher: &mut Sha256, level: &PriceLevel, orders: &Slab<OrderNode>) -> Result<(), BookError> {
    for (_, node) in level.iter(orders) {
        let bytes = ssz_rs::serialize(&node.order).map_err(|err| BookError::Encoding(format!("{err:?}")))?;
        hasher.update(&bytes);
    }
    Ok(())
}

/// Check one side; returns the number of queued orders.
fn check_side<O: PriceOrdering>(
    side: &BookSide<O>,
    orders: &Slab<OrderNode>,
    index: &HashMap<u64, Locator>,
) -> Result<usize, IntegrityError> {
    let side_id = side.side();
    let mut previous: Option<u64> = None;
    let mut queued = 0;

    for (key_price, level) in side.iter() {
        if level.price != key_price {
            return Err(IntegrityError::KeyMismatch {
                side: side_id,
                key: key_price,
                price: level.price,
            });
        }
        if level.is_empty() || level.head.is_none() {
            return Err(IntegrityError::EmptyLevel {
                side: side_id,
                price: level.price,
            });
        }
        if let Some(previous) = previous {
            let ordered = match side_id {
                Side::Buy => key_price < previous,
                Side::Sell => key_price > previous,
            };
            if !ordered {
                return Err(IntegrityError::PriceOrder {
                    side: side_id,
                    previous,
                    next: key_price,
                });
            }
        }
        previous = Some(key_price);

        queued += check_level(side_id, level, orders, index)?;
    }

    if queued != side.order_count() {
        return Err(IntegrityError::SideCount {
            side: side_id,
            recorded: side.order_count(),
            actual: queued,
        });
    }
    Ok(queued)
}

/// Walk one queue; returns its length.
fn check_level(
    side: Side,
    level: &PriceLevel,
    orders: &Slab<OrderNode>,
    index: &HashMap<u64, Locator>,
) -> Result<usize, IntegrityError> {
    let price = level.price;
    let broken = |slot| IntegrityError::BrokenLink { side, price, slot };

    let mut sum: u128 = 0;
    let mut count = 0;
    let mut last_sequence: Option<u64> = None;
    let mut prev_slot: Option<usize> = None;
    let mut cursor = level.head;

    while let Some(slot) = cursor {
        let node = orders.get(slot).ok_or_else(|| broken(slot))?;
        // a cycle can never be longer than the arena
        if node.prev != prev_slot || count >= orders.len() {
            return Err(broken(slot));
        }

        let order_id = node.order_id();
        if node.order.side_raw != side.to_u8() {
            return Err(IntegrityError::OrderSide {
                order_id,
                side,
                side_raw: node.order.side_raw,
            });
        }
        if node.price() != price {
            return Err(IntegrityError::OrderPrice {
                order_id,
                side,
                level_price: price,
                order_price: node.price(),
            });
        }
        if last_sequence.is_some_and(|last| node.sequence <= last) {
            return Err(IntegrityError::Fifo { order_id, slot });
        }

        let expected = Locator { side, price, slot };
        if index.get(&order_id) != Some(&expected) {
            return Err(IntegrityError::Locator { order_id, slot });
        }

        sum += u128::from(node.quantity());
        count += 1;
        last_sequence = Some(node.sequence);
        prev_slot = Some(slot);
        cursor = node.next;
    }

    if level.tail != prev_slot {
        return Err(broken(level.tail.unwrap_or_default()));
    }
    if count != level.order_count {
        return Err(IntegrityError::OrderCount {
            side,
            price,
            recorded: level.order_count,
            actual: count,
        });
    }
    if sum != u128::from(level.total_quantity) {
        return Err(IntegrityError::Aggregate {
            side,
            price,
            recorded: level.total_quantity,
            actual: u64::try_from(sum).unwrap_or(u64::MAX),
        });
    }
    Ok(count)
}

// ============================================================================
// Unit Tests
// ============================================================================
