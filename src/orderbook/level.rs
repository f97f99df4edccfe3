//! Price level management for orders at the same price.
//!
//! ## Design
//!
//! A `PriceLevel` represents all orders resting at a single price on one side.
//! Orders are kept in a doubly-linked list threaded through the slab, in
//! arrival order.
//!
//! ## Queue Structure
//!
//! ```text
//! head (oldest) <-> order2 <-> order3 <-> tail (newest)
//! ```
//!
//! - New orders are appended at the tail
//! - Any order can be removed in O(1) using its slab key
//! - A quantity amendment rewrites the aggregate without touching the links

use slab::Slab;

use crate::orderbook::OrderNode;

/// A price level containing orders at a single price.
///
/// The order data lives in the slab; this struct only holds the queue
/// metadata and the running aggregate.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Price for this level (fixed-point, scaled by 10^8)
    pub price: u64,

    /// Sum of the quantities of every queued order
    pub total_quantity: u64,

    /// Head of the order queue (oldest order, slab key)
    pub head: Option<usize>,

    /// Tail of the order queue (newest order, slab key)
    pub tail: Option<usize>,

    /// Number of orders at this price level
    pub order_count: usize,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new(price: u64) -> Self {
        Self {
            price,
            total_quantity: 0,
            head: None,
            tail: None,
            order_count: 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Whether `quantity` more can be added without overflowing the aggregate
    #[inline]
    pub fn can_accept(&self, quantity: u64) -> bool {
        self.total_quantity.checked_add(quantity).is_some()
    }

    /// Append an order to the tail of the queue
    ///
    /// The caller checks [`can_accept`](Self::can_accept) first.
    ///
    /// # Panics
    ///
    /// Panics if the key doesn't exist in the slab
    pub fn push_back(&mut self, key: usize, slab: &mut Slab<OrderNode>) {
        let quantity = {
            let node = &mut slab[key];
            node.prev = self.tail;
            node.next = None;
            node.quantity()
        };

        match self.tail {
            Some(tail_key) => slab[tail_key].next = Some(key),
            None => self.head = Some(key),
        }

        self.tail = Some(key);
        self.order_count += 1;
        self.total_quantity += quantity;
    }

    /// Unlink an order from the queue by slab key
    ///
    /// The node stays in the slab; the caller removes it.
    ///
    /// # Returns
    ///
    /// The quantity of the unlinked order
    pub fn remove(&mut self, key: usize, slab: &mut Slab<OrderNode>) -> u64 {
        let (quantity, prev_key, next_key) = {
            let node = &slab[key];
            (node.quantity(), node.prev, node.next)
        };

        match prev_key {
            Some(prev) => slab[prev].next = next_key,
            None => self.head = next_key,
        }

        match next_key {
            Some(next) => slab[next].prev = prev_key,
            None => self.tail = prev_key,
        }

        let node = &mut slab[key];
        node.prev = None;
        node.next = None;

        self.order_count -= 1;
        self.total_quantity -= quantity;

        quantity
    }

    /// Replace the quantity of a queued order in place.
    ///
    /// Queue position is untouched. Returns `false` (and changes nothing) if
    /// the new aggregate would overflow.
    pub fn amend_quantity(&mut self, key: usize, new_quantity: u64, slab: &mut Slab<OrderNode>) -> bool {
        let node = &mut slab[key];
        let Some(total) = (self.total_quantity - node.order.quantity).checked_add(new_quantity) else {
            return false;
        };

        node.order.quantity = new_quantity;
        self.total_quantity = total;
        true
    }

    /// Iterate the queue from oldest to newest
    pub fn iter<'a>(&self, slab: &'a Slab<OrderNode>) -> LevelIter<'a> {
        LevelIter {
            slab,
            cursor: self.head,
        }
    }
}

/// FIFO iterator over a level's queue, yielding `(slab key, node)`.
pub struct LevelIter<'a> {
    slab: &'a Slab<OrderNode>,
    cursor: Option<usize>,
}

impl<'a> LevelIter<'a> {
    /// An iterator that yields nothing (for a price with no level)
    pub fn empty(slab: &'a Slab<OrderNode>) -> Self {
        Self { slab, cursor: None }
    }
}

impl<'a> Iterator for LevelIter<'a> {
    type Item = (usize, &'a OrderNode);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor?;
        let node = self.slab.get(key)?;
        self.cursor = node.next;
        Some((key, node))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
