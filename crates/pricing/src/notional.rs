//! Contract value helper
//!
//! Converts a (price, quantity) pair at a book level into notional value in
//! base units (satoshi for XBT contracts), independent of contract style.

/// Notional value of `qty` contracts at `price`.
///
/// Positive `multiplier` means a linear or quanto contract
/// (`|multiplier * price|` per contract); negative means an inverse contract
/// (`|multiplier / price|` per contract). The result is rounded to the
/// nearest whole base unit.
///
/// `price` must be positive; levels with an absent price are skipped before
/// reaching this helper.
pub fn contract_value(multiplier: f64, price: f64, qty: f64) -> f64 {
    let per_contract = if multiplier > 0.0 {
        (multiplier * price).abs()
    } else {
        (multiplier / price).abs()
    };
    (per_contract * qty).round()
}
