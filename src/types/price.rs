//! Fixed-point price utilities.
//!
//! ## Overview
//!
//! Limit prices and execution prices are stored as `u64` scaled by 10^8.
//! Transaction totals use the same scale in a `u128`, which holds any
//! `u64` share count times any `u64` price. Conversions go through `rust_decimal` so no
//! floating-point rounding ever reaches the book.
//!
//! Share counts are whole units and are *not* scaled, so multiplying a
//! share count by a fixed-point price yields a fixed-point total.
//!
//! ## Examples
//!
//! ```
//! use matchbook::types::price::{to_fixed, total_to_string, total_value};
//!
//! let price = to_fixed("5.0").unwrap();
//! assert_eq!(price, 500_000_000);
//!
//! let total = total_value(3, price);
//! assert_eq!(total_to_string(total), "15");
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
/// Returns `None` if parsing fails or the value is negative or out of range.
///
/// ```
/// use matchbook::types::price::to_fixed;
///
/// assert_eq!(to_fixed("1.0"), Some(100_000_000));
/// assert_eq!(to_fixed("4.5"), Some(450_000_000));
/// assert_eq!(to_fixed("0.00000001"), Some(1));
/// ```
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a Decimal to fixed-point u64, rounding to 8 decimal places
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

/// Format with exactly 8 decimal places
pub fn from_fixed(value: u64) -> String {
    format!("{:.8}", fixed_to_decimal(value))
}

/// Format with trailing zeros removed
///
/// ```
/// use matchbook::types::price::from_fixed_trimmed;
///
/// assert_eq!(from_fixed_trimmed(100_000_000), "1");
/// assert_eq!(from_fixed_trimmed(150_000_000), "1.5");
/// ```
pub fn from_fixed_trimmed(value: u64) -> String {
    fixed_to_decimal(value).normalize().to_string()
}

// ============================================================================
// Arithmetic
// ============================================================================

/// Value of `shares` whole units at a fixed-point `price`, widened so the
/// product never overflows.
pub fn total_value(shares: u64, price: u64) -> u128 {
    u128::from(shares) * u128::from(price)
}

/// Format a fixed-point total with trailing zeros removed
///
/// ```
/// use matchbook::types::price::total_to_string;
///
/// assert_eq!(total_to_string(2_500_000_000), "25");
/// assert_eq!(total_to_string(20_000_000_000_000_000_000), "200000000000");
/// ```
pub fn total_to_string(value: u128) -> String {
    let scale = u128::from(SCALE);
    let whole = value / scale;
    let frac = value % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{frac:08}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
