//! Error types for the order book.
//!
//! "Order not found" is deliberately absent: cancel and amend report it
//! through `Option`/`bool` because it is a routine outcome.

use thiserror::Error;

use crate::types::Side;

/// Input rejected by a book operation. The book is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    #[error("order {0} is already resting in the book")]
    DuplicateOrderId(u64),

    #[error("order {0}: price must be greater than zero")]
    InvalidPrice(u64),

    #[error("order {0}: quantity must be greater than zero")]
    InvalidQuantity(u64),

    #[error("order {0}: side byte is neither buy (0) nor sell (1)")]
    InvalidSide(u64),

    #[error("order {order_id}: aggregate quantity at {side} {price} would overflow")]
    QuantityOverflow { order_id: u64, side: Side, price: u64 },

    #[error("failed to encode book state: {0}")]
    Encoding(String),
}

/// A broken book invariant, reported by
/// [`OrderBook::check_integrity`](crate::OrderBook::check_integrity).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("{side} level keyed {key} reports price {price}")]
    KeyMismatch { side: Side, key: u64, price: u64 },

    #[error("{side} level {price} is empty")]
    EmptyLevel { side: Side, price: u64 },

    #[error("{side} levels out of order: {previous} then {next}")]
    PriceOrder { side: Side, previous: u64, next: u64 },

    #[error("{side} level {price}: aggregate {recorded} != queued sum {actual}")]
    Aggregate { side: Side, price: u64, recorded: u64, actual: u64 },

    #[error("{side} level {price}: order count {recorded} != queue length {actual}")]
    OrderCount { side: Side, price: u64, recorded: usize, actual: usize },

    #[error("{side} level {price}: broken queue link at slot {slot}")]
    BrokenLink { side: Side, price: u64, slot: usize },

    #[error("order {order_id} sits in {side} level {level_price} but is priced {order_price}")]
    OrderPrice { order_id: u64, side: Side, level_price: u64, order_price: u64 },

    #[error("order {order_id} sits on the {side} side but carries side byte {side_raw}")]
    OrderSide { order_id: u64, side: Side, side_raw: u8 },

    #[error("order {order_id}: queue out of arrival order at slot {slot}")]
    Fifo { order_id: u64, slot: usize },

    #[error("order {order_id}: index locator does not point at its queue slot {slot}")]
    Locator { order_id: u64, slot: usize },

    #[error("index holds {indexed} orders but {stored} are stored and {queued} are queued")]
    IndexSize { indexed: usize, stored: usize, queued: usize },

    #[error("{side} order count {recorded} != {actual} queued")]
    SideCount { side: Side, recorded: usize, actual: usize },
}
