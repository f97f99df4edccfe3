//! Fixed-point price and quantity utilities.
//!
//! ## Overview
//!
//! Prices and quantities in the book are `u64` scaled by 10^8. Keys in the
//! side maps are compared exactly, so two prices that print the same are the
//! same level; there is no floating-point equality anywhere in the book.
//!
//! ## Examples
//!
//! ```
//! use resting_book::types::price::{to_fixed, from_fixed};
//!
//! let price = to_fixed("100.50").unwrap();
//! assert_eq!(price, 10_050_000_000);
//! assert_eq!(from_fixed(price), "100.50000000");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor for fixed-point arithmetic: 10^8
pub const SCALE: u64 = 100_000_000;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert a decimal string to fixed-point u64
///
/// Returns `None` if parsing fails, the value is negative, or it does not fit.
/// Digits beyond the 8th decimal place are rounded (banker's rounding).
///
/// ```
/// use resting_book::types::price::to_fixed;
///
/// assert_eq!(to_fixed("1.0"), Some(100_000_000));
/// assert_eq!(to_fixed("0.00000001"), Some(1));
/// assert_eq!(to_fixed("-1"), None);
/// ```
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a Decimal to fixed-point u64
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    scaled.round_dp(0).to_u64()
}

/// Convert fixed-point u64 to a Decimal
pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Convert fixed-point u64 to a string with 8 decimal places
///
/// ```
/// use resting_book::types::price::from_fixed;
///
/// assert_eq!(from_fixed(100_000_000), "1.00000000");
/// ```
pub fn from_fixed(value: u64) -> String {
    format!("{:.8}", fixed_to_decimal(value))
}

/// Convert fixed-point u64 to a string with `dp` decimal places
///
/// ```
/// use resting_book::types::price::from_fixed_dp;
///
/// assert_eq!(from_fixed_dp(10_050_000_000, 2), "100.50");
/// assert_eq!(from_fixed_dp(50_000_000_000, 0), "500");
/// ```
pub fn from_fixed_dp(value: u64, dp: u32) -> String {
    let rounded = fixed_to_decimal(value).round_dp(dp);
    format!("{:.*}", dp as usize, rounded)
}

/// Convert fixed-point u64 to a string with trailing zeros trimmed
///
/// ```
/// use resting_book::types::price::from_fixed_trimmed;
///
/// assert_eq!(from_fixed_trimmed(100_000_000), "1");
/// assert_eq!(from_fixed_trimmed(150_000_000), "1.5");
/// ```
pub fn from_fixed_trimmed(value: u64) -> String {
    format!("{}", fixed_to_decimal(value).normalize())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_fixed_basic() {
        assert_eq!(to_fixed("1"), Some(100_000_000));
        assert_eq!(to_fixed("100.50"), Some(10_050_000_000));
        assert_eq!(to_fixed("100.25"), Some(10_025_000_000));
        assert_eq!(to_fixed("0.00000001"), Some(1));
    }

    #[test]
    fn test_to_fixed_edge_cases() {
        assert_eq!(to_fixed("0"), Some(0));
        assert_eq!(to_fixed("-1.0"), None);
        assert_eq!(to_fixed("abc"), None);
        assert_eq!(to_fixed(""), None);
    }

    #[test]
    fn test_equal_prices_share_representation() {
        // "100.5" and "100.50" must land on the same level key
        assert_eq!(to_fixed("100.5"), to_fixed("100.50"));
        assert_eq!(to_fixed("100.500000001"), to_fixed("100.5"));
    }

    #[test]
    fn test_from_fixed() {
        assert_eq!(from_fixed(1), "0.00000001");
        assert_eq!(from_fixed(0), "0.00000000");
        assert_eq!(from_fixed(10_050_000_000), "100.50000000");
    }

    #[test]
    fn test_from_fixed_dp() {
        assert_eq!(from_fixed_dp(10_075_000_000, 2), "100.75");
        assert_eq!(from_fixed_dp(9_950_000_000, 2), "99.50");
        assert_eq!(from_fixed_dp(0, 2), "0.00");
    }

    #[test]
    fn test_from_fixed_trimmed() {
        assert_eq!(from_fixed_trimmed(123_456_789), "1.23456789");
        assert_eq!(from_fixed_trimmed(70_000_000_000), "700");
    }

    #[test]
    fn test_precision() {
        let value = "123456789.12345678";
        let fixed = to_fixed(value).unwrap();
        assert_eq!(from_fixed(fixed), value);
    }
}
