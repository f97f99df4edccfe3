//! Order book configuration.

/// Default number of pre-allocated order slots
pub const DEFAULT_ORDER_CAPACITY: usize = 1024;

/// Construction-time settings for an [`OrderBook`](crate::OrderBook).
///
/// ```
/// use resting_book::{BookConfig, OrderBook};
///
/// let config = BookConfig::default()
///     .with_order_capacity(100_000)
///     .with_verify_invariants(true);
/// let book = OrderBook::with_config(config);
///
/// assert!(book.capacity() >= 100_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookConfig {
    /// Orders to pre-allocate in the slab and the order index
    pub order_capacity: usize,

    /// Run the full integrity check after every mutation. O(n) per call,
    /// meant for tests and debugging.
    pub verify_invariants: bool,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            order_capacity: DEFAULT_ORDER_CAPACITY,
            verify_invariants: false,
        }
    }
}

impl BookConfig {
    pub fn with_order_capacity(mut self, order_capacity: usize) -> Self {
        self.order_capacity = order_capacity;
        self
    }

    pub fn with_verify_invariants(mut self, verify_invariants: bool) -> Self {
        self.verify_invariants = verify_invariants;
        self
    }
}
