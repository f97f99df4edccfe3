//! Order book: the resting-order state of one instrument.
//!
//! ## Architecture
//!
//! - **Slab-based storage**: O(1) order insertion, removal, and lookup
//! - **Price levels**: Orders grouped by price in a BTreeMap per side
//! - **Time priority**: FIFO queue at each price level
//!
//! ## Components
//!
//! - [`OrderNode`]: `Order` plus linked-list pointers for its price level
//! - [`PriceLevel`]: Queue and aggregate for a single price point
//! - [`BookSide`]: Price-ordered levels, generic over [`PriceOrdering`]
//! - [`OrderBook`]: Both sides plus the order index
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Add order | O(log P) |
//! | Cancel order by ID | O(1) + O(log P) level lookup |
//! | Amend quantity | O(1) + O(log P) level lookup |
//! | Amend price | O(log P) |
//! | Snapshot depth N | O(N) |
//!
//! P = distinct price levels on the side.

pub mod node;
pub mod level;
pub mod side;
pub mod book;
mod audit;

pub use node::OrderNode;
pub use level::{LevelIter, PriceLevel};
pub use side::{Ascending, AskSide, BidSide, BookSide, Descending, PriceOrdering};
pub use book::{Locator, OrderBook};
