//! Composite reference index
//!
//! Reproduces the .BXBT-style BTC/USD index: the arithmetic mean of two
//! spot reference feeds, fetched concurrently. Both feeds quote prices as
//! JSON strings.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::FeedError;
use crate::Result;

pub const BITSTAMP_TICKER_URL: &str = "https://www.bitstamp.net/api/v2/ticker/btcusd/";
pub const COINBASE_TICKER_URL: &str = "https://api.exchange.coinbase.com/products/BTC-USD/ticker";

#[derive(Debug, Deserialize)]
struct BitstampTicker {
    last: String,
}

#[derive(Debug, Deserialize)]
struct CoinbaseTicker {
    price: String,
}

/// Fetch both reference feeds and return their arithmetic mean.
pub async fn composite_index(client: &Client) -> Result<f64> {
    let (bitstamp, coinbase) = tokio::try_join!(bitstamp_last(client), coinbase_price(client))?;
    let index = (bitstamp + coinbase) / 2.0;
    debug!(bitstamp, coinbase, index, "composite index computed");
    Ok(index)
}

async fn bitstamp_last(client: &Client) -> Result<f64> {
    let ticker: BitstampTicker = client
        .get(BITSTAMP_TICKER_URL)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    parse_price("bitstamp", &ticker.last)
}

async fn coinbase_price(client: &Client) -> Result<f64> {
    let ticker: CoinbaseTicker = client
        .get(COINBASE_TICKER_URL)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    parse_price("coinbase", &ticker.price)
}

fn parse_price(feed: &'static str, raw: &str) -> Result<f64> {
    let price: f64 = raw.parse().map_err(|_| FeedError::Decode {
        feed,
        reason: format!("price is not a number: {raw:?}"),
    })?;
    if !(price > 0.0) {
        return Err(FeedError::Decode {
            feed,
            reason: format!("non-positive price: {price}"),
        });
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_decode_bitstamp_ticker() {
        let json = r#"{"last": "6003.50", "high": "6100.00", "volume": "12345.6"}"#;
        let ticker: BitstampTicker = serde_json::from_str(json).unwrap();
        assert_eq!(parse_price("bitstamp", &ticker.last).unwrap(), 6003.5);
    }

    #[test]
    fn test_decode_coinbase_ticker() {
        let json = r#"{"trade_id": 1, "price": "5996.50", "size": "0.01", "time": "2017-08-01T00:00:00Z"}"#;
        let ticker: CoinbaseTicker = serde_json::from_str(json).unwrap();
        assert_eq!(parse_price("coinbase", &ticker.price).unwrap(), 5996.5);
    }

    #[test]
    fn test_mean_of_two_sources() {
        let bitstamp = parse_price("bitstamp", "6003.50").unwrap();
        let coinbase = parse_price("coinbase", "5996.50").unwrap();
        assert_eq!((bitstamp + coinbase) / 2.0, 6000.0);
    }

    #[test]
    fn test_non_numeric_price_is_a_decode_error() {
        let err = parse_price("bitstamp", "n/a").unwrap_err();
        assert_matches!(err, FeedError::Decode { feed: "bitstamp", .. });
    }

    #[test]
    fn test_non_positive_price_is_a_decode_error() {
        assert_matches!(parse_price("coinbase", "0"), Err(FeedError::Decode { .. }));
        assert_matches!(parse_price("coinbase", "-5.0"), Err(FeedError::Decode { .. }));
    }
}
