//! Resting limit order book for one instrument.
//!
//! ## Architecture
//!
//! - **Slab**: arena holding every resting order as an [`OrderNode`]
//! - **BookSide**: BTreeMap of price levels per side, best price first
//! - **HashMap**: order ID to [`Locator`] for O(1) cancel and amend
//!
//! The side maps and the order index are two views of the same slab. Every
//! `&mut self` method updates all three before it returns, and validates its
//! input before the first write, so an operation either applies fully or not
//! at all.
//!
//! The book never matches. A bid priced at or above the best ask simply rests.
//!
//! ## Example
//!
//! ```
//! use resting_book::OrderBook;
//! use resting_book::types::Side;
//! use resting_book::types::price::to_fixed;
//!
//! let mut book = OrderBook::new();
//! let px = |s| to_fixed(s).unwrap();
//!
//! book.add(1, Side::Buy, px("100.50"), px("500"), 0).unwrap();
//! book.add(2, Side::Buy, px("100.25"), px("300"), 1).unwrap();
//! book.add(3, Side::Buy, px("100.50"), px("200"), 2).unwrap();
//!
//! let snapshot = book.snapshot(2);
//! assert_eq!(
//!     snapshot.bid_pairs(),
//!     vec![(px("100.50"), px("700")), (px("100.25"), px("300"))]
//! );
//! ```

use std::collections::HashMap;

use slab::Slab;
use tracing::{debug, error, trace, warn};

use crate::config::BookConfig;
use crate::orderbook::{AskSide, BidSide, LevelIter, OrderNode, PriceLevel};
use crate::types::{BookError, BookSnapshot, LevelSnapshot, Order, Side};

/// Where a resting order lives: enough to reach its level and its slab slot
/// without any traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locator {
    pub side: Side,
    pub price: u64,
    pub slot: usize,
}

/// Single-instrument order book.
///
/// Not internally synchronized. Share it across threads behind one mutex.
#[derive(Debug)]
pub struct OrderBook {
    /// Arena for every resting order
    pub(super) orders: Slab<OrderNode>,

    /// Bid price levels (highest first)
    pub(super) bids: BidSide,

    /// Ask price levels (lowest first)
    pub(super) asks: AskSide,

    /// Order ID to locator
    pub(super) order_index: HashMap<u64, Locator>,

    /// Next insertion sequence
    next_sequence: u64,

    config: BookConfig,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    /// Create an empty book with the default configuration
    pub fn new() -> Self {
        Self::with_config(BookConfig::default())
    }

    /// Create an empty book with room for `order_capacity` orders
    ///
    /// ```
    /// use resting_book::OrderBook;
    ///
    /// let book = OrderBook::with_capacity(100_000);
    /// assert!(book.capacity() >= 100_000);
    /// ```
    pub fn with_capacity(order_capacity: usize) -> Self {
        Self::with_config(BookConfig::default().with_order_capacity(order_capacity))
    }

    pub fn with_config(config: BookConfig) -> Self {
        Self {
            orders: Slab::with_capacity(config.order_capacity),
            bids: BidSide::new(),
            asks: AskSide::new(),
            order_index: HashMap::with_capacity(config.order_capacity),
            next_sequence: 1,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    // ========================================================================
    // Capacity and Size
    // ========================================================================

    /// Pre-allocated order slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.orders.capacity()
    }

    /// Total number of resting orders
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn bid_count(&self) -> usize {
        self.bids.order_count()
    }

    #[inline]
    pub fn ask_count(&self) -> usize {
        self.asks.order_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of bid price levels
    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    /// Number of ask price levels
    #[inline]
    pub fn ask_levels(&self) -> usize {
        self.asks.len()
    }

    // ========================================================================
    // Order Management
    // ========================================================================

    /// Add an order at the tail of its price level.
    ///
    /// # Errors
    ///
    /// - [`BookError::DuplicateOrderId`] if the ID is already resting
    /// - [`BookError::InvalidSide`] if `side_raw` is not 0 or 1
    /// - [`BookError::InvalidPrice`] / [`BookError::InvalidQuantity`] on zero
    /// - [`BookError::QuantityOverflow`] if the level aggregate would overflow
    ///
    /// The book is unchanged on error.
    ///
    /// # Returns
    ///
    /// The slab slot of the new order
    pub fn add_order(&mut self, order: Order) -> Result<usize, BookError> {
        if let Err(err) = self.validate_new(&order) {
            warn!(order_id = order.id, %err, "add rejected");
            return Err(err);
        }

        let (order_id, side, price, quantity) = (order.id, order.side(), order.price, order.quantity);
        let slot = self.insert_node(order);
        trace!(order_id, %side, price, quantity, slot, "order added");

        self.verify();
        Ok(slot)
    }

    /// Flat-argument form of [`add_order`](Self::add_order)
    pub fn add(
        &mut self,
        order_id: u64,
        side: Side,
        price: u64,
        quantity: u64,
        timestamp: u64,
    ) -> Result<usize, BookError> {
        self.add_order(Order::new(order_id, side, price, quantity, timestamp))
    }

    /// Cancel an order by ID
    ///
    /// # Returns
    ///
    /// The cancelled order, or `None` if no such order rests (nothing changes)
    ///
    /// ```
    /// use resting_book::OrderBook;
    /// use resting_book::types::Side;
    ///
    /// let mut book = OrderBook::new();
    /// book.add(42, Side::Buy, 10_000_000_000, 100_000_000, 0).unwrap();
    ///
    /// assert_eq!(book.cancel_order(42).map(|o| o.id), Some(42));
    /// assert!(book.cancel_order(42).is_none());
    /// assert!(book.is_empty());
    /// ```
    pub fn cancel_order(&mut self, order_id: u64) -> Option<Order> {
        let Some(locator) = self.order_index.get(&order_id).copied() else {
            trace!(order_id, "cancel: order not found");
            return None;
        };

        let order = self.unlink_node(locator);
        trace!(order_id, side = %locator.side, price = locator.price, quantity = order.quantity, "order cancelled");

        self.verify();
        Some(order)
    }

    /// `true` if the order was found and removed
    pub fn cancel(&mut self, order_id: u64) -> bool {
        self.cancel_order(order_id).is_some()
    }

    /// Amend an order's price and/or quantity.
    ///
    /// - Same price: the quantity is rewritten in place and the order keeps
    ///   its queue position.
    /// - New price: the order moves to the tail of the new level and loses
    ///   time priority. ID, side and timestamp are kept.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if applied, `Ok(false)` if no such order rests
    ///
    /// # Errors
    ///
    /// [`BookError::InvalidPrice`], [`BookError::InvalidQuantity`] or
    /// [`BookError::QuantityOverflow`]. The book is unchanged on error.
    pub fn amend_order(&mut self, order_id: u64, new_price: u64, new_quantity: u64) -> Result<bool, BookError> {
        if let Err(err) = validate_terms(order_id, new_price, new_quantity) {
            warn!(order_id, %err, "amend rejected");
            return Err(err);
        }

        let Some(locator) = self.order_index.get(&order_id).copied() else {
            trace!(order_id, "amend: order not found");
            return Ok(false);
        };

        if locator.price == new_price {
            if !self.amend_in_place(order_id, locator, new_quantity)? {
                return Ok(false);
            }
        } else {
            self.relocate(order_id, locator, new_price, new_quantity)?;
        }

        self.verify();
        Ok(true)
    }

    /// `Ok(false)` only if the index points at a level that does not exist
    fn amend_in_place(&mut self, order_id: u64, locator: Locator, new_quantity: u64) -> Result<bool, BookError> {
        let old_quantity = self.orders[locator.slot].quantity();
        let level = match locator.side {
            Side::Buy => self.bids.level_mut(locator.price),
            Side::Sell => self.asks.level_mut(locator.price),
        };
        let Some(level) = level else {
            error!(order_id, side = %locator.side, price = locator.price, "indexed order has no level");
            return Ok(false);
        };

        if !level.amend_quantity(locator.slot, new_quantity, &mut self.orders) {
            let err = BookError::QuantityOverflow {
                order_id,
                side: locator.side,
                price: locator.price,
            };
            warn!(order_id, %err, "amend rejected");
            return Err(err);
        }

        trace!(order_id, side = %locator.side, price = locator.price, old_quantity, new_quantity, "order quantity amended");
        Ok(true)
    }

    fn relocate(&mut self, order_id: u64, locator: Locator, new_price: u64, new_quantity: u64) -> Result<(), BookError> {
        if !self.side_accepts(locator.side, new_price, new_quantity) {
            let err = BookError::QuantityOverflow {
                order_id,
                side: locator.side,
                price: new_price,
            };
            warn!(order_id, %err, "amend rejected");
            return Err(err);
        }

        let mut order = self.unlink_node(locator);
        order.price = new_price;
        order.quantity = new_quantity;
        let slot = self.insert_node(order);

        trace!(
            order_id,
            side = %locator.side,
            old_price = locator.price,
            new_price,
            new_quantity,
            slot,
            "order moved to new price"
        );
        Ok(())
    }

    /// Remove every order and level. The insertion sequence keeps counting.
    pub fn clear(&mut self) {
        self.orders.clear();
        self.bids.clear();
        self.asks.clear();
        self.order_index.clear();
        debug!("order book cleared");
    }

    // ========================================================================
    // Snapshot
    // ========================================================================

    /// Aggregated top `depth` levels of each side, best price first.
    ///
    /// Sides with fewer levels return what they have; empty sides return an
    /// empty vector.
    pub fn snapshot(&self, depth: usize) -> BookSnapshot {
        BookSnapshot {
            bids: self.bids.depth(depth),
            asks: self.asks.depth(depth),
        }
    }

    /// Top `depth` bid levels, highest price first
    pub fn bids(&self, depth: usize) -> Vec<LevelSnapshot> {
        self.bids.depth(depth)
    }

    /// Top `depth` ask levels, lowest price first
    pub fn asks(&self, depth: usize) -> Vec<LevelSnapshot> {
        self.asks.depth(depth)
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    #[inline]
    pub fn get_order(&self, order_id: u64) -> Option<&Order> {
        let locator = self.order_index.get(&order_id)?;
        self.orders.get(locator.slot).map(|node| &node.order)
    }

    #[inline]
    pub fn locate(&self, order_id: u64) -> Option<Locator> {
        self.order_index.get(&order_id).copied()
    }

    #[inline]
    pub fn contains_order(&self, order_id: u64) -> bool {
        self.order_index.contains_key(&order_id)
    }

    /// The level at `price` on `side`, if any orders rest there
    pub fn level(&self, side: Side, price: u64) -> Option<&PriceLevel> {
        match side {
            Side::Buy => self.bids.level(price),
            Side::Sell => self.asks.level(price),
        }
    }

    /// Orders resting at `price` on `side`, oldest first
    pub fn orders_at(&self, side: Side, price: u64) -> impl Iterator<Item = &Order> + '_ {
        let queue = match self.level(side, price) {
            Some(level) => level.iter(&self.orders),
            None => LevelIter::empty(&self.orders),
        };
        queue.map(|(_, node)| &node.order)
    }

    // ========================================================================
    // Best Bid/Ask
    // ========================================================================

    /// Highest bid price
    #[inline]
    pub fn best_bid(&self) -> Option<u64> {
        self.bids.best_price()
    }

    /// Lowest ask price
    #[inline]
    pub fn best_ask(&self) -> Option<u64> {
        self.asks.best_price()
    }

    /// `best_ask - best_bid`, or `None` if a side is empty or the book is
    /// crossed
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if ask >= bid => Some(ask - bid),
            _ => None,
        }
    }

    pub fn best_bid_level(&self) -> Option<&PriceLevel> {
        self.bids.best_level()
    }

    pub fn best_ask_level(&self) -> Option<&PriceLevel> {
        self.asks.best_level()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn validate_new(&self, order: &Order) -> Result<(), BookError> {
        if self.order_index.contains_key(&order.id) {
            return Err(BookError::DuplicateOrderId(order.id));
        }
        let side = Side::from_u8(order.side_raw).ok_or(BookError::InvalidSide(order.id))?;
        validate_terms(order.id, order.price, order.quantity)?;

        if !self.side_accepts(side, order.price, order.quantity) {
            return Err(BookError::QuantityOverflow {
                order_id: order.id,
                side,
                price: order.price,
            });
        }
        Ok(())
    }

    fn side_accepts(&self, side: Side, price: u64, quantity: u64) -> bool {
        match side {
            Side::Buy => self.bids.can_accept(price, quantity),
            Side::Sell => self.asks.can_accept(price, quantity),
        }
    }

    /// Store, enqueue and index a validated order
    fn insert_node(&mut self, order: Order) -> usize {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let (order_id, side, price) = (order.id, order.side(), order.price);
        let slot = self.orders.insert(OrderNode::new(order, sequence));

        let created = match side {
            Side::Buy => self.bids.insert(slot, price, &mut self.orders),
            Side::Sell => self.asks.insert(slot, price, &mut self.orders),
        };
        if created {
            debug!(%side, price, "level created");
        }

        self.order_index.insert(order_id, Locator { side, price, slot });
        slot
    }

    /// Dequeue, unindex and free a resting order
    fn unlink_node(&mut self, locator: Locator) -> Order {
        let level_removed = match locator.side {
            Side::Buy => self.bids.remove(locator.slot, locator.price, &mut self.orders),
            Side::Sell => self.asks.remove(locator.slot, locator.price, &mut self.orders),
        };

        match level_removed {
            Some(true) => debug!(side = %locator.side, price = locator.price, "level removed"),
            Some(false) => {}
            None => error!(side = %locator.side, price = locator.price, slot = locator.slot, "indexed order has no level"),
        }

        let order = self.orders.remove(locator.slot).order;
        self.order_index.remove(&order.id);
        order
    }

    fn verify(&self) {
        if !self.config.verify_invariants {
            return;
        }
        if let Err(err) = self.check_integrity() {
            error!(%err, "order book integrity check failed");
            debug_assert!(false, "order book integrity check failed: {err}");
        }
    }
}

/// Reject non-positive prices and quantities
fn validate_terms(order_id: u64, price: u64, quantity: u64) -> Result<(), BookError> {
    if price == 0 {
        return Err(BookError::InvalidPrice(order_id));
    }
    if quantity == 0 {
        return Err(BookError::InvalidQuantity(order_id));
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================
