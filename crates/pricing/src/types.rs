//! Shared types for the pricing engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One depth level of an order book, best price first in a snapshot.
///
/// Either side may be absent at any depth; an absent price or size marks the
/// end of liquidity on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookLevel {
    pub bid_size: Option<f64>,
    pub bid_price: Option<f64>,
    pub ask_size: Option<f64>,
    pub ask_price: Option<f64>,
}

impl BookLevel {
    pub fn bid(price: f64, size: f64) -> Self {
        Self {
            bid_price: Some(price),
            bid_size: Some(size),
            ..Default::default()
        }
    }

    pub fn ask(price: f64, size: f64) -> Self {
        Self {
            ask_price: Some(price),
            ask_size: Some(size),
            ..Default::default()
        }
    }

    pub fn quote(bid_price: f64, bid_size: f64, ask_price: f64, ask_size: f64) -> Self {
        Self {
            bid_price: Some(bid_price),
            bid_size: Some(bid_size),
            ask_price: Some(ask_price),
            ask_size: Some(ask_size),
        }
    }
}

/// Instrument attributes the engine consumes.
///
/// `multiplier` is signed: positive for linear/quanto contracts, negative
/// for inverse contracts whose notional is `multiplier / price`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    pub multiplier: f64,
    pub expiry: DateTime<Utc>,
    pub mid_price: f64,
    /// Maintenance margin as a fraction, e.g. 0.005
    pub maint_margin: f64,
    /// Snapshot capture time; fallback clock when no live clock is supplied
    pub timestamp: DateTime<Utc>,
}

/// Computed fair-price record, field-for-field comparable with the
/// instrument record the exchange publishes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FairResult {
    pub index_price: f64,
    pub impact_bid_price: f64,
    pub impact_ask_price: f64,
    pub impact_mid_price: f64,
    pub fair_basis_rate: f64,
    pub fair_basis: f64,
    pub fair_price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_level_decodes_exchange_camel_case() {
        let json = r#"{"bidSize": 100, "bidPrice": 6000.0, "askSize": null, "askPrice": null}"#;
        let level: BookLevel = serde_json::from_str(json).unwrap();
        assert_eq!(level, BookLevel::bid(6000.0, 100.0));

        // Absent fields decode the same as explicit nulls
        let level: BookLevel = serde_json::from_str(r#"{"bidSize": 100, "bidPrice": 6000.0}"#).unwrap();
        assert_eq!(level, BookLevel::bid(6000.0, 100.0));
    }

    #[test]
    fn test_fair_result_serializes_with_exchange_field_names() {
        let result = FairResult {
            index_price: 6000.0,
            impact_bid_price: 6000.0,
            impact_ask_price: 6010.0,
            impact_mid_price: 6005.0,
            fair_basis_rate: 0.0033,
            fair_basis: 5.0,
            fair_price: 6005.0,
        };
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["indexPrice"], 6000.0);
        assert_eq!(json["impactMidPrice"], 6005.0);
        assert_eq!(json["fairBasisRate"], 0.0033);
        assert_eq!(json["fairPrice"], 6005.0);
    }
}
