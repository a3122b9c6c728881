//! Websocket recompute trigger
//!
//! Subscribes to the exchange's realtime `instrument` stream and emits an
//! event whenever the reported fair basis changes. The consumer fetches a
//! fresh snapshot and reruns the pricing engine per event; no book state is
//! maintained here, so the engine always sees one coherent snapshot.

use futures_util::StreamExt;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::Result;

pub const RECONNECT_BACKOFF: Duration = Duration::from_secs(5);

/// Realtime endpoint with an `instrument` subscription for one symbol.
pub fn realtime_url(base_url: &str, symbol: &str) -> String {
    let ws_base = if let Some(rest) = base_url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base_url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base_url.to_string()
    };
    format!("{ws_base}/realtime?subscribe=instrument:{symbol}")
}

/// Watch the instrument stream for `symbol` and send each changed fair
/// basis value into `updates`.
///
/// Reconnects with a fixed backoff when the stream drops. Returns when the
/// token is cancelled or the receiving side goes away; transport errors
/// mid-stream are logged and retried, never propagated.
pub async fn run(
    base_url: String,
    symbol: String,
    token: CancellationToken,
    updates: mpsc::Sender<f64>,
) -> Result<()> {
    let url = realtime_url(&base_url, &symbol);
    let mut last_fair_basis: Option<f64> = None;

    while !token.is_cancelled() {
        info!(%url, "connecting to instrument stream");
        let ws = tokio::select! {
            _ = token.cancelled() => return Ok(()),
            conn = connect_async(url.as_str()) => match conn {
                Ok((ws, _)) => ws,
                Err(e) => {
                    warn!(error = %e, "websocket connect failed, backing off");
                    if !backoff(&token).await {
                        return Ok(());
                    }
                    continue;
                }
            },
        };
        let (_, mut read) = ws.split();

        loop {
            let msg = tokio::select! {
                _ = token.cancelled() => return Ok(()),
                msg = read.next() => msg,
            };
            match msg {
                Some(Ok(Message::Text(text))) => {
                    let Some(basis) = fair_basis_update(&text, &symbol) else {
                        continue;
                    };
                    if last_fair_basis == Some(basis) {
                        continue;
                    }
                    last_fair_basis = Some(basis);
                    if updates.send(basis).await.is_err() {
                        // Consumer gone, nothing left to trigger
                        return Ok(());
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(error = %e, "stream error, reconnecting");
                    break;
                }
                None => {
                    warn!("stream closed, reconnecting");
                    break;
                }
            }
        }

        if !backoff(&token).await {
            return Ok(());
        }
    }
    Ok(())
}

/// Sleep out the reconnect backoff; false means cancelled.
async fn backoff(token: &CancellationToken) -> bool {
    tokio::select! {
        _ = token.cancelled() => false,
        _ = tokio::time::sleep(RECONNECT_BACKOFF) => true,
    }
}

/// Extract the fair basis for `symbol` from one realtime message, if the
/// message is an instrument update carrying it.
fn fair_basis_update(text: &str, symbol: &str) -> Option<f64> {
    let value: Value = serde_json::from_str(text).ok()?;
    if value.get("table")?.as_str()? != "instrument" {
        return None;
    }
    value
        .get("data")?
        .as_array()?
        .iter()
        .filter(|row| row.get("symbol").and_then(Value::as_str) == Some(symbol))
        .find_map(|row| row.get("fairBasis").and_then(Value::as_f64))
}
