//! Order types for the resting book.
//!
//! ## SSZ Serialization
//!
//! `Order` derives `SimpleSerialize` from ssz_rs so that the book state can be
//! hashed deterministically (see [`crate::OrderBook::state_root`]).
//! Basic types (u64, u8) are encoded little-endian and concatenated.
//!
//! ## Fixed-Point Representation
//!
//! Prices and quantities are stored as u64 scaled by 10^8
//! (see [`crate::types::price::SCALE`]).

use std::fmt;

use ssz_rs::prelude::*;

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Buy (bid) or Sell (ask)
///
/// Represented as u8 for SSZ compatibility:
/// - Buy = 0
/// - Sell = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Buy order, rests on the bid side
    #[default]
    Buy,
    /// Sell order, rests on the ask side
    Sell,
}

impl Side {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Buy),
            1 => Some(Side::Sell),
            _ => None,
        }
    }

    /// Build a side from an `is_buy` flag
    #[inline]
    pub fn from_is_buy(is_buy: bool) -> Self {
        if is_buy {
            Side::Buy
        } else {
            Side::Sell
        }
    }

    #[inline]
    pub fn is_buy(self) -> bool {
        self == Side::Buy
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("BUY"),
            Side::Sell => f.write_str("SELL"),
        }
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A resting limit order.
///
/// `id`, side and `timestamp` never change while the order rests.
/// `price` and `quantity` change only through
/// [`OrderBook::amend_order`](crate::OrderBook::amend_order).
///
/// ## SSZ Layout
///
/// Fixed-size container, 33 bytes (8 + 1 + 8 + 8 + 8).
///
/// ## Example
///
/// ```
/// use resting_book::types::{Order, Side};
///
/// // Buy 500 units at 100.50
/// let order = Order::new(
///     1,                  // id
///     Side::Buy,          // side
///     10_050_000_000,     // price: 100.50000000
///     50_000_000_000,     // quantity: 500.00000000
///     1703577600000,      // timestamp (arrival marker)
/// );
/// assert!(order.is_buy());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Order {
    /// Unique order identifier (assigned by the caller)
    pub id: u64,

    /// Order side as u8 (0=Buy, 1=Sell)
    pub side_raw: u8,

    /// Limit price in fixed-point (scaled by 10^8)
    pub price: u64,

    /// Resting quantity in fixed-point (scaled by 10^8)
    pub quantity: u64,

    /// Caller-supplied arrival marker (e.g. nanoseconds since epoch).
    /// Informational only; queue position is decided by the book.
    pub timestamp: u64,
}

impl Order {
    /// Create a new limit order
    ///
    /// # Arguments
    ///
    /// * `id` - Unique order identifier
    /// * `side` - Buy or Sell
    /// * `price` - Price in fixed-point (scaled by 10^8)
    /// * `quantity` - Quantity in fixed-point (scaled by 10^8)
    /// * `timestamp` - Arrival marker
    pub fn new(id: u64, side: Side, price: u64, quantity: u64, timestamp: u64) -> Self {
        Self {
            id,
            side_raw: side.to_u8(),
            price,
            quantity,
            timestamp,
        }
    }

    /// Get the order side
    pub fn side(&self) -> Side {
        Side::from_u8(self.side_raw).unwrap_or(Side::Buy)
    }

    #[inline]
    pub fn is_buy(&self) -> bool {
        self.side().is_buy()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
