//! Order node for slab-based storage.
//!
//! ## Design
//!
//! `OrderNode` wraps an `Order` with doubly-linked list pointers so that an
//! order can be unlinked from its price level in O(1) given its slab key.
//! The pointers are slab keys (`usize`), never references, so a removed
//! node cannot leave a dangling pointer behind.
//!
//! ## Slab Integration
//!
//! Per official slab docs (https://docs.rs/slab/0.4.11):
//! - Keys are `usize` values returned by `slab.insert()`
//! - Keys may be reused after `slab.remove()`
//! - O(1) insert, remove, and lookup
//!
//! ## Linked List
//!
//! - `prev`: the order queued immediately ahead (older)
//! - `next`: the order queued immediately behind (newer)

use crate::types::Order;

/// Order node stored in the slab.
#[derive(Debug, Clone)]
pub struct OrderNode {
    /// The resting order
    pub order: Order,

    /// Book-assigned insertion sequence. Strictly increasing along a queue.
    pub sequence: u64,

    /// Next order in the price level queue (slab key)
    /// None if this is the tail (newest order)
    pub next: Option<usize>,

    /// Previous order in the price level queue (slab key)
    /// None if this is the head (oldest order)
    pub prev: Option<usize>,
}

impl OrderNode {
    /// Create a new node (not yet linked)
    ///
    /// ```
    /// use resting_book::orderbook::OrderNode;
    /// use resting_book::types::{Order, Side};
    ///
    /// let order = Order::new(1, Side::Buy, 10_000_000_000, 100_000_000, 0);
    /// let node = OrderNode::new(order, 1);
    ///
    /// assert!(node.is_unlinked());
    /// ```
    #[inline]
    pub fn new(order: Order, sequence: u64) -> Self {
        Self {
            order,
            sequence,
            next: None,
            prev: None,
        }
    }

    /// Check if this node has no neighbours
    #[inline]
    pub fn is_unlinked(&self) -> bool {
        self.next.is_none() && self.prev.is_none()
    }

    #[inline]
    pub fn order_id(&self) -> u64 {
        self.order.id
    }

    #[inline]
    pub fn price(&self) -> u64 {
        self.order.price
    }

    #[inline]
    pub fn quantity(&self) -> u64 {
        self.order.quantity
    }
}
