//! Depth snapshot types.
//!
//! A snapshot is a read-only copy of the top `N` levels of each side, best
//! price first. It holds aggregates only; individual orders are not exposed.

/// Aggregated view of one price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelSnapshot {
    /// Level price (fixed-point, scaled by 10^8)
    pub price: u64,

    /// Sum of the quantities of every order resting at this price
    pub total_quantity: u64,

    /// Number of orders resting at this price
    pub order_count: usize,
}

impl LevelSnapshot {
    pub fn new(price: u64, total_quantity: u64, order_count: usize) -> Self {
        Self {
            price,
            total_quantity,
            order_count,
        }
    }

    /// `(price, total_quantity)` pair
    #[inline]
    pub fn as_pair(&self) -> (u64, u64) {
        (self.price, self.total_quantity)
    }
}

/// Top-of-book depth for both sides.
///
/// `bids` are ordered highest price first, `asks` lowest price first.
/// Either vector may be shorter than the requested depth, or empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookSnapshot {
    pub bids: Vec<LevelSnapshot>,
    pub asks: Vec<LevelSnapshot>,
}

impl BookSnapshot {
    /// Bid levels as `(price, total_quantity)` pairs
    pub fn bid_pairs(&self) -> Vec<(u64, u64)> {
        self.bids.iter().map(LevelSnapshot::as_pair).collect()
    }

    /// Ask levels as `(price, total_quantity)` pairs
    pub fn ask_pairs(&self) -> Vec<(u64, u64)> {
        self.asks.iter().map(LevelSnapshot::as_pair).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}
