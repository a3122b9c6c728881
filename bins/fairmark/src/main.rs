//! fairmark CLI binary
//!
//! Recomputes a futures contract's impact prices and fair/mark price from a
//! live order-book snapshot and a composite reference index, then compares
//! the result against the values the exchange itself reports.

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Cli, Commands, MarketArgs};
use feeds::{composite_index, watch, BitmexClient, InstrumentRecord};
use observability::{init_logging, LogFormat};
use pricing::FairResult;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const SATOSHI_PER_XBT: f64 = 100_000_000.0;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let format = cli
        .log_format
        .parse::<LogFormat>()
        .map_err(anyhow::Error::msg)?;
    init_logging("fairmark", format)?;

    match cli.command {
        Commands::Check { market, json } => check_command(market, json).await,
        Commands::Watch { market } => watch_command(market).await,
    }
}

async fn check_command(market: MarketArgs, json: bool) -> Result<()> {
    let client = BitmexClient::new(&market.base_url)?;
    let (record, result) = price_snapshot(&client, &market).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_comparison(&record, &result);
    }
    Ok(())
}

async fn watch_command(market: MarketArgs) -> Result<()> {
    let client = BitmexClient::new(&market.base_url)?;
    let token = CancellationToken::new();
    let (updates_tx, mut updates_rx) = mpsc::channel(8);

    let watcher = tokio::spawn(watch::run(
        market.base_url.clone(),
        market.symbol.clone(),
        token.clone(),
        updates_tx,
    ));

    info!(symbol = %market.symbol, "watching for fair basis updates, Ctrl+C to stop");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
            update = updates_rx.recv() => match update {
                Some(fair_basis) => {
                    info!(fair_basis, "exchange fair basis changed, recomputing");
                    match price_snapshot(&client, &market).await {
                        Ok((record, result)) => print_comparison(&record, &result),
                        Err(e) => warn!(error = %e, "recompute failed, keeping watch"),
                    }
                }
                None => {
                    warn!("watch stream ended");
                    break;
                }
            }
        }
    }

    token.cancel();
    let _ = watcher.await;
    Ok(())
}

/// Fetch one coherent snapshot (instrument, book, index) and run the engine.
async fn price_snapshot(
    client: &BitmexClient,
    market: &MarketArgs,
) -> Result<(InstrumentRecord, FairResult)> {
    let record = client
        .instrument(&market.symbol)
        .await
        .context("fetching instrument")?;
    let instrument = record.descriptor()?;

    let book = client
        .order_book(&market.symbol, market.depth)
        .await
        .context("fetching order book")?;
    let index_price = composite_index(client.http())
        .await
        .context("fetching index feeds")?;

    let result = pricing::compute_fair_price(
        &book,
        &instrument,
        index_price,
        Some(Utc::now()),
        market.notional * SATOSHI_PER_XBT,
    )?;
    Ok((record, result))
}

fn print_comparison(record: &InstrumentRecord, computed: &FairResult) {
    if let Some(expiry) = record.expiry {
        let days = pricing::time_to_expiry_years(expiry, Utc::now()) * 365.0;
        println!("\nTime to Expiry: {days:.2} days");
    }

    println!("\n=== {} fair price check ===\n", record.symbol);
    println!(
        "{:<16} {:>14} {:>14} {:>12}",
        "Key", "Exchange", "Computed", "Diff"
    );

    let rows: [(&str, Option<f64>, f64, usize); 7] = [
        ("Index Price", record.indicative_settle_price, computed.index_price, 2),
        ("Impact Bid", record.impact_bid_price, computed.impact_bid_price, 2),
        ("Impact Ask", record.impact_ask_price, computed.impact_ask_price, 2),
        ("Impact Mid", record.impact_mid_price, computed.impact_mid_price, 2),
        ("Fair Basis Rate", record.fair_basis_rate, computed.fair_basis_rate, 6),
        ("Fair Basis", record.fair_basis, computed.fair_basis, 2),
        ("Fair Price", record.fair_price, computed.fair_price, 2),
    ];

    for (key, reported, value, precision) in rows {
        match reported {
            Some(reported) => println!(
                "{key:<16} {reported:>14.precision$} {value:>14.precision$} {diff:>12.precision$}",
                diff = value - reported,
            ),
            None => println!("{key:<16} {:>14} {value:>14.precision$} {:>12}", "-", "-"),
        }
    }
    println!();
}
