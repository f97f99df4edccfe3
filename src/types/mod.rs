//! Core data types for the resting book
//!
//! All numeric values use fixed-point representation (scaled by 10^8).
//!
//! ## Types
//!
//! - [`Order`]: A resting limit order
//! - [`Side`]: Buy or Sell
//! - [`LevelSnapshot`] / [`BookSnapshot`]: Aggregated depth views
//! - [`BookError`] / [`IntegrityError`]: Rejections and invariant failures
//!
//! ## Fixed-Point Arithmetic
//!
//! Prices and quantities are stored as `u64` scaled by 10^8.
//! Example: 100.50 is stored as 10_050_000_000u64

mod error;
mod order;
mod snapshot;
pub mod price;

pub use error::{BookError, IntegrityError};
pub use order::{Order, Side};
pub use snapshot::{BookSnapshot, LevelSnapshot};
