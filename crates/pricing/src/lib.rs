//! Fair price calculation engine for futures contracts
//!
//! This crate reproduces the mark-price formula a derivatives exchange uses
//! for margining, so the result can be cross-checked against the value the
//! exchange reports.
//!
//! # Core Components
//!
//! - [`impact`] - Impact bid/ask/mid from an order-book snapshot
//! - [`fair`] - Fair basis rate, fair basis, and fair price
//! - [`notional`] - Contract value helper for linear and inverse contracts
//!
//! # Key Invariants
//!
//! - The engine is a pure function of (book snapshot, instrument, index
//!   price) - no I/O, no shared state, one coherent snapshot per call
//! - `impact_mid == (impact_bid + impact_ask) / 2`
//! - `fair_price == index_price + fair_basis`
//! - Thin books degrade (partial weights, advisory logs), they never fail;
//!   only an expired contract or non-positive prices are hard errors

pub mod error;
pub mod fair;
pub mod impact;
pub mod notional;
pub mod types;

pub use error::PricingError;
pub use fair::{fair_price, time_to_expiry_years};
pub use impact::{impact_prices, impact_side, BookSide, ImpactResult, SideImpact};
pub use notional::contract_value;
pub use types::{BookLevel, FairResult, Instrument};

pub type Result<T> = std::result::Result<T, PricingError>;

/// Target notional for the impact-price walk, in base units.
/// 10 XBT expressed in satoshi, matching the exchange's impact notional
/// for XBT contracts.
pub const IMPACT_NOTIONAL: f64 = 1_000_000_000.0;

/// Seconds in the 365-day year the exchange annualizes the basis over.
pub const SECONDS_PER_YEAR: i64 = 365 * 86_400;

/// Compute the full fair-price record for one snapshot.
///
/// `now` is the wall-clock instant to measure time-to-expiry from; pass
/// `None` when pricing a static snapshot and the instrument's own capture
/// timestamp should be used instead.
pub fn compute_fair_price(
    book: &[BookLevel],
    instrument: &Instrument,
    index_price: f64,
    now: Option<chrono::DateTime<chrono::Utc>>,
    target_notional: f64,
) -> Result<FairResult> {
    let impact = impact_prices(book, instrument, target_notional);
    let time_years = time_to_expiry_years(instrument.expiry, now.unwrap_or(instrument.timestamp));
    fair_price(&impact, index_price, time_years)
}
