//! One side of the book: price levels in priority order.
//!
//! Bids and asks differ only in the direction their prices sort. That
//! direction is a type parameter ([`PriceOrdering`]), so both sides share a
//! single implementation:
//!
//! - [`Descending`]: bids, keyed by `Reverse(price)`, best bid = highest price
//! - [`Ascending`]: asks, keyed by `price`, best ask = lowest price
//!
//! A level is created when its first order arrives and removed in the same
//! call that unlinks its last order, so iteration never sees an empty level.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::marker::PhantomData;

use slab::Slab;

use crate::orderbook::{OrderNode, PriceLevel};
use crate::types::{LevelSnapshot, Side};

/// Sort direction of a book side.
pub trait PriceOrdering {
    /// BTreeMap key; iteration order of the keys is priority order
    type Key: Ord + Copy + Debug;

    /// The side whose orders rest here
    const SIDE: Side;

    fn key(price: u64) -> Self::Key;

    fn price(key: Self::Key) -> u64;
}

/// Highest price first (bids).
#[derive(Debug, Clone, Copy, Default)]
pub struct Descending;

impl PriceOrdering for Descending {
    type Key = Reverse<u64>;
    const SIDE: Side = Side::Buy;

    #[inline]
    fn key(price: u64) -> Self::Key {
        Reverse(price)
    }

    #[inline]
    fn price(key: Self::Key) -> u64 {
        key.0
    }
}

/// Lowest price first (asks).
#[derive(Debug, Clone, Copy, Default)]
pub struct Ascending;

impl PriceOrdering for Ascending {
    type Key = u64;
    const SIDE: Side = Side::Sell;

    #[inline]
    fn key(price: u64) -> Self::Key {
        price
    }

    #[inline]
    fn price(key: Self::Key) -> u64 {
        key
    }
}

/// Price-ordered levels for one side.
#[derive(Debug, Clone)]
pub struct BookSide<O: PriceOrdering> {
    levels: BTreeMap<O::Key, PriceLevel>,
    order_count: usize,
    _ordering: PhantomData<O>,
}

/// Bid side: highest price first
pub type BidSide = BookSide<Descending>;

/// Ask side: lowest price first
pub type AskSide = BookSide<Ascending>;

impl<O: PriceOrdering> Default for BookSide<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: PriceOrdering> BookSide<O> {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
            order_count: 0,
            _ordering: PhantomData,
        }
    }

    #[inline]
    pub fn side(&self) -> Side {
        O::SIDE
    }

    /// Number of price levels
    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of orders resting on this side
    #[inline]
    pub fn order_count(&self) -> usize {
        self.order_count
    }

    #[inline]
    pub fn level(&self, price: u64) -> Option<&PriceLevel> {
        self.levels.get(&O::key(price))
    }

    #[inline]
    pub fn level_mut(&mut self, price: u64) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&O::key(price))
    }

    /// Whether `quantity` more can rest at `price` without overflowing the
    /// level aggregate. Always true for a price with no level yet.
    pub fn can_accept(&self, price: u64, quantity: u64) -> bool {
        self.level(price)
            .map_or(true, |level| level.can_accept(quantity))
    }

    /// Append a slab node at the tail of the level for `price`, creating the
    /// level if needed.
    ///
    /// # Returns
    ///
    /// `true` if a new level was created
    pub fn insert(&mut self, key: usize, price: u64, slab: &mut Slab<OrderNode>) -> bool {
        let mut created = false;
        let level = self.levels.entry(O::key(price)).or_insert_with(|| {
            created = true;
            PriceLevel::new(price)
        });
        level.push_back(key, slab);
        self.order_count += 1;
        created
    }

    /// Unlink a slab node from the level for `price`, dropping the level if
    /// it becomes empty.
    ///
    /// # Returns
    ///
    /// `Some(level_removed)`, or `None` if there is no level at `price`
    pub fn remove(&mut self, key: usize, price: u64, slab: &mut Slab<OrderNode>) -> Option<bool> {
        let level_key = O::key(price);
        let level = self.levels.get_mut(&level_key)?;
        level.remove(key, slab);
        self.order_count -= 1;

        if level.is_empty() {
            self.levels.remove(&level_key);
            Some(true)
        } else {
            Some(false)
        }
    }

    /// Best price on this side
    #[inline]
    pub fn best_price(&self) -> Option<u64> {
        self.levels.keys().next().map(|key| O::price(*key))
    }

    #[inline]
    pub fn best_level(&self) -> Option<&PriceLevel> {
        self.levels.values().next()
    }

    /// Levels in priority order (best first)
    pub fn iter(&self) -> impl Iterator<Item = (u64, &PriceLevel)> + '_ {
        self.levels.iter().map(|(key, level)| (O::price(*key), level))
    }

    /// Aggregates of the best `depth` levels, best first
    pub fn depth(&self, depth: usize) -> Vec<LevelSnapshot> {
        self.levels
            .values()
            .take(depth)
            .map(|level| LevelSnapshot::new(level.price, level.total_quantity, level.order_count))
            .collect()
    }

    pub fn clear(&mut self) {
        self.levels.clear();
        self.order_count = 0;
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
