//! Feed error types

use thiserror::Error;

/// Errors that can occur while fetching market data
#[derive(Error, Debug)]
pub enum FeedError {
    /// HTTP transport error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// WebSocket transport error
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Non-success HTTP status from an upstream feed
    #[error("unexpected status {status} from {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    /// Payload did not decode into the expected shape
    #[error("could not decode {feed} payload: {reason}")]
    Decode { feed: &'static str, reason: String },

    /// Exchange returned no record for the symbol
    #[error("unknown instrument symbol: {0}")]
    UnknownSymbol(String),

    /// Instrument record is missing a field the calculation needs
    /// (a null expiry means a perpetual, which has no fair basis)
    #[error("instrument {symbol} has no {field}")]
    MissingField {
        symbol: String,
        field: &'static str,
    },
}
