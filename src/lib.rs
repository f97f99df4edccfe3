//! # Resting Book
//!
//! Limit order book for a single instrument: two price-ordered sides of
//! levels, each level a FIFO queue of individually addressable orders.
//!
//! ## Architecture
//!
//! - **Types**: Order, Side, fixed-point prices, snapshots, errors
//! - **OrderBook**: slab-backed levels with an O(1) order index
//! - **Config**: capacity and invariant-verification settings
//!
//! ## Design Principles
//!
//! 1. **No matching**: orders rest until cancelled; crossing prices are stored as-is
//! 2. **No Floating Point**: prices and quantities are u64 scaled by 10^8
//! 3. **Pre-allocated Memory**: Slab allocation for O(1) order operations
//! 4. **Single writer**: every mutation takes `&mut self`; no internal locking
//!
//! ## Example
//!
//! ```
//! use resting_book::{OrderBook, Side};
//!
//! let mut book = OrderBook::new();
//! book.add(1, Side::Sell, 10_100_000_000, 40_000_000_000, 0).unwrap();
//! book.amend_order(1, 10_075_000_000, 40_000_000_000).unwrap();
//!
//! let asks = book.asks(5);
//! assert_eq!(asks.len(), 1);
//! assert_eq!(asks[0].price, 10_075_000_000);
//! ```

/// Core data types: Order, Side, snapshots, errors
pub mod types;

/// Order book: levels, sides, order index
pub mod orderbook;

/// Book configuration
pub mod config;

pub use config::BookConfig;
pub use orderbook::{Locator, OrderBook, PriceLevel};
pub use types::{BookError, BookSnapshot, IntegrityError, LevelSnapshot, Order, Side};
