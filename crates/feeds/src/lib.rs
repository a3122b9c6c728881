//! Market data collaborators for the fairmark pricing engine
//!
//! Everything here is I/O: the pure calculation lives in the `pricing`
//! crate, and this crate feeds it one coherent snapshot per invocation.
//!
//! - [`bitmex`] - REST client for the instrument record and order book
//! - [`index`] - composite reference index (mean of two spot feeds)
//! - [`watch`] - websocket-triggered recompute loop with cancellation

pub mod bitmex;
pub mod error;
pub mod index;
pub mod watch;

pub use bitmex::{BitmexClient, InstrumentRecord};
pub use error::FeedError;
pub use index::composite_index;

pub type Result<T> = std::result::Result<T, FeedError>;
