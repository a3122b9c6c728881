//! BitMEX REST client
//!
//! Fetches the instrument record (which carries the exchange's own mark
//! fields for comparison) and the price-level order book.

use chrono::{DateTime, Utc};
use pricing::{BookLevel, Instrument};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::FeedError;
use crate::Result;

pub const DEFAULT_BASE_URL: &str = "https://www.bitmex.com";
pub const DEFAULT_DEPTH: u32 = 200;

const USER_AGENT: &str = concat!("fairmark/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Instrument record as the exchange reports it, camelCase on the wire.
///
/// The mark fields (`impact*`, `fair*`, `indicative_settle_price`) are what
/// the locally computed [`pricing::FairResult`] is compared against.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentRecord {
    pub symbol: String,
    pub multiplier: f64,
    pub expiry: Option<DateTime<Utc>>,
    pub timestamp: DateTime<Utc>,
    pub mid_price: Option<f64>,
    pub maint_margin: Option<f64>,
    pub indicative_settle_price: Option<f64>,
    pub impact_bid_price: Option<f64>,
    pub impact_ask_price: Option<f64>,
    pub impact_mid_price: Option<f64>,
    pub fair_basis_rate: Option<f64>,
    pub fair_basis: Option<f64>,
    pub fair_price: Option<f64>,
    pub has_liquidity: Option<bool>,
}

impl InstrumentRecord {
    /// Extract the descriptor the pricing engine consumes.
    ///
    /// Fails for perpetuals (no expiry) and for records missing the fields
    /// the calculation needs.
    pub fn descriptor(&self) -> Result<Instrument> {
        let missing = |field| FeedError::MissingField {
            symbol: self.symbol.clone(),
            field,
        };
        Ok(Instrument {
            symbol: self.symbol.clone(),
            multiplier: self.multiplier,
            expiry: self.expiry.ok_or_else(|| missing("expiry"))?,
            mid_price: self.mid_price.ok_or_else(|| missing("midPrice"))?,
            maint_margin: self.maint_margin.ok_or_else(|| missing("maintMargin"))?,
            timestamp: self.timestamp,
        })
    }
}

/// One depth level of the `orderBook` endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DepthLevel {
    level: u64,
    #[serde(default)]
    bid_size: Option<f64>,
    #[serde(default)]
    bid_price: Option<f64>,
    #[serde(default)]
    ask_size: Option<f64>,
    #[serde(default)]
    ask_price: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct BitmexClient {
    client: Client,
    base_url: String,
}

impl BitmexClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying HTTP client, shared with the index feeds.
    pub fn http(&self) -> &Client {
        &self.client
    }

    /// Fetch the instrument record for `symbol`.
    pub async fn instrument(&self, symbol: &str) -> Result<InstrumentRecord> {
        let url = format!("{}/api/v1/instrument", self.base_url);
        let body = self.get(&url, &[("symbol", symbol)]).await?;
        let mut records: Vec<InstrumentRecord> =
            serde_json::from_str(&body).map_err(|e| FeedError::Decode {
                feed: "instrument",
                reason: e.to_string(),
            })?;
        if records.is_empty() {
            return Err(FeedError::UnknownSymbol(symbol.to_string()));
        }
        Ok(records.swap_remove(0))
    }

    /// Fetch the order book for `symbol`, `depth` levels per side, ordered
    /// best price first.
    pub async fn order_book(&self, symbol: &str, depth: u32) -> Result<Vec<BookLevel>> {
        let url = format!("{}/api/v1/orderBook", self.base_url);
        let depth_s = depth.to_string();
        let body = self
            .get(&url, &[("symbol", symbol), ("depth", &depth_s)])
            .await?;
        let mut levels: Vec<DepthLevel> =
            serde_json::from_str(&body).map_err(|e| FeedError::Decode {
                feed: "orderBook",
                reason: e.to_string(),
            })?;

        // Level 0 is the top of book; the walk depends on this order
        levels.sort_by_key(|l| l.level);
        debug!(symbol, levels = levels.len(), "order book fetched");

        Ok(levels
            .into_iter()
            .map(|l| BookLevel {
                bid_size: l.bid_size,
                bid_price: l.bid_price,
                ask_size: l.ask_size,
                ask_price: l.ask_price,
            })
            .collect())
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }
        Ok(body)
    }
}
