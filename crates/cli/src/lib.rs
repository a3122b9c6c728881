use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "fairmark")]
#[command(about = "Recompute a futures contract's mark price and compare it against the exchange")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Log output format (pretty, json, or compact)
    #[arg(long, global = true, env = "FAIRMARK_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one snapshot, compute the fair price, and print the comparison
    Check {
        #[command(flatten)]
        market: MarketArgs,

        /// Emit the computed record as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Recompute continuously, triggered by realtime fair-basis updates
    Watch {
        #[command(flatten)]
        market: MarketArgs,
    },
}

/// Arguments shared by every command that prices a contract.
#[derive(Args, Debug)]
pub struct MarketArgs {
    /// Futures contract symbol
    #[arg(short, long, default_value = "XBTU17")]
    pub symbol: String,

    /// Order book depth to fetch per side
    #[arg(long, default_value_t = 200)]
    pub depth: u32,

    /// Impact notional target, in units of the settlement asset (XBT)
    #[arg(long, default_value_t = 10.0)]
    pub notional: f64,

    /// Exchange API base URL
    #[arg(long, env = "FAIRMARK_BASE_URL", default_value = "https://www.bitmex.com")]
    pub base_url: String,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
