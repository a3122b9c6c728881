//! Fair basis and fair price calculation
//!
//! Combines the impact mid with an externally supplied index price and the
//! time to expiry, using the exchange's published marking formula:
//!
//! ```text
//! fair_basis_rate = (impact_mid / index_price - 1) / time_years
//! fair_basis      = index_price * fair_basis_rate * time_years
//! fair_price      = index_price + fair_basis
//! ```
//!
//! The time factor cancels out of `fair_basis` algebraically; the three-step
//! form is kept because `fair_basis_rate` is the quantity the exchange
//! reports and its magnitude does depend on the time to expiry.

use chrono::{DateTime, Utc};

use crate::error::PricingError;
use crate::impact::ImpactResult;
use crate::types::FairResult;
use crate::{Result, SECONDS_PER_YEAR};

/// Time to expiry as a fraction of a 365-day year, from whole seconds
/// between the two instants.
pub fn time_to_expiry_years(expiry: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let seconds = ((expiry - now).num_milliseconds() as f64 / 1000.0).round();
    seconds / SECONDS_PER_YEAR as f64
}

/// Derive the fair-price record from computed impact prices.
///
/// Fails with [`PricingError::InvalidExpiry`] when `time_years` is zero or
/// negative (expired contract) and [`PricingError::InvalidInput`] when the
/// index price or impact mid is not positive; never emits infinity or NaN.
pub fn fair_price(impact: &ImpactResult, index_price: f64, time_years: f64) -> Result<FairResult> {
    if !(index_price > 0.0) {
        return Err(PricingError::InvalidInput(format!(
            "index price must be positive, got {index_price}"
        )));
    }
    if !(impact.impact_mid > 0.0) {
        return Err(PricingError::InvalidInput(format!(
            "impact mid must be positive, got {}",
            impact.impact_mid
        )));
    }
    if time_years <= 0.0 {
        return Err(PricingError::InvalidExpiry { time_years });
    }

    let fair_basis_rate = (impact.impact_mid / index_price - 1.0) / time_years;
    let fair_basis = index_price * fair_basis_rate * time_years;
    let fair_price = index_price + fair_basis;

    Ok(FairResult {
        index_price,
        impact_bid_price: impact.impact_bid,
        impact_ask_price: impact.impact_ask,
        impact_mid_price: impact.impact_mid,
        fair_basis_rate,
        fair_basis,
        fair_price,
    })
}
