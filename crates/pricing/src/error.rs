//! Pricing error types

use thiserror::Error;

/// Errors that can occur during a fair-price calculation
#[derive(Error, Debug)]
pub enum PricingError {
    /// Contract expired or expiring at the calculation instant; the fair
    /// basis rate would divide by (near-)zero
    #[error("invalid time to expiry: {time_years} years")]
    InvalidExpiry { time_years: f64 },

    /// Non-positive index price or impact mid
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
