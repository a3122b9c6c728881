//! Impact price calculation
//!
//! Walks one side of an order-book snapshot from the best price outward and
//! computes the size-weighted average fill price for a fixed target notional.

use tracing::warn;

use crate::notional::contract_value;
use crate::types::{BookLevel, Instrument};

/// Which side of the book to walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSide {
    Bid,
    Ask,
}

impl BookSide {
    fn quote(&self, level: &BookLevel) -> Option<(f64, f64)> {
        match self {
            BookSide::Bid => level.bid_price.zip(level.bid_size),
            BookSide::Ask => level.ask_price.zip(level.ask_size),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            BookSide::Bid => "bid",
            BookSide::Ask => "ask",
        }
    }
}

/// Outcome of walking one book side.
#[derive(Debug, Clone, Copy)]
pub struct SideImpact {
    /// Weighted average fill price; weights sum below 1 when the book is
    /// thinner than the target notional
    pub price: f64,
    /// Notional actually consumed, at most the target
    pub notional_filled: f64,
}

/// Impact bid/ask/mid for one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ImpactResult {
    pub impact_bid: f64,
    pub impact_ask: f64,
    pub impact_mid: f64,
    pub bid_notional_filled: f64,
    pub ask_notional_filled: f64,
}

/// Walk `side` of the book, consuming levels best-first until
/// `target_notional` base units are filled.
///
/// The first level with an absent price or size ends the walk: the side is
/// exhausted at that depth. The last consumed level is clamped so the fill
/// never overshoots the target. A book thinner than the target yields a
/// partial weighted sum, not an error.
pub fn impact_side(
    levels: &[BookLevel],
    side: BookSide,
    multiplier: f64,
    target_notional: f64,
) -> SideImpact {
    let mut filled = 0.0;
    let mut impact = 0.0;

    for level in levels {
        let Some((price, size)) = side.quote(level) else {
            break;
        };
        if filled >= target_notional {
            break;
        }

        let level_value = contract_value(multiplier, price, size);
        let consumable = level_value.min(target_notional - filled);
        filled += consumable;
        impact += consumable / target_notional * price;
    }

    SideImpact {
        price: impact,
        notional_filled: filled,
    }
}

/// Compute impact bid, ask, and mid for the snapshot.
///
/// Degraded conditions are advisory: a side thinner than the target and a
/// bid/ask divergence wide enough that the exchange's own fair-basis update
/// would not trigger are both logged, never raised.
pub fn impact_prices(
    book: &[BookLevel],
    instrument: &Instrument,
    target_notional: f64,
) -> ImpactResult {
    let bid = impact_side(book, BookSide::Bid, instrument.multiplier, target_notional);
    let ask = impact_side(book, BookSide::Ask, instrument.multiplier, target_notional);

    for (side, fill) in [(BookSide::Bid, &bid), (BookSide::Ask, &ask)] {
        if fill.notional_filled < target_notional {
            warn!(
                symbol = %instrument.symbol,
                side = side.as_str(),
                filled = fill.notional_filled,
                target = target_notional,
                "book side thinner than impact notional, partial impact price"
            );
        }
    }

    // Exchange rule: the fair basis only updates while the impact spread
    // stays inside mid_price / maint_margin. Outside it the reported basis
    // goes stale.
    if instrument.maint_margin > 0.0
        && (bid.price - ask.price).abs() > instrument.mid_price / instrument.maint_margin
    {
        warn!(
            symbol = %instrument.symbol,
            impact_bid = bid.price,
            impact_ask = ask.price,
            mid_price = instrument.mid_price,
            maint_margin = instrument.maint_margin,
            "impact spread exceeds basis-update band, exchange basis may be stale"
        );
    }

    ImpactResult {
        impact_bid: bid.price,
        impact_ask: ask.price,
        impact_mid: (bid.price + ask.price) / 2.0,
        bid_notional_filled: bid.notional_filled,
        ask_notional_filled: ask.notional_filled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const XBT_MULTIPLIER: f64 = -100_000_000.0;
    const TEN_XBT: f64 = 1_000_000_000.0;

    fn test_instrument() -> Instrument {
        Instrument {
            symbol: "XBTU17".to_string(),
            multiplier: XBT_MULTIPLIER,
            expiry: Utc.with_ymd_and_hms(2017, 9, 29, 12, 0, 0).unwrap(),
            mid_price: 6005.0,
            maint_margin: 0.005,
            timestamp: Utc.with_ymd_and_hms(2017, 8, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_single_deep_level_concentrates_full_weight() {
        // 0.5 XBT of contracts at 5000 is worth 1e12 satoshi, far past the
        // 10 XBT target; the walk clamps and the level carries weight 1
        let book = [BookLevel::bid(5000.0, 50_000_000.0)];
        let side = impact_side(&book, BookSide::Bid, XBT_MULTIPLIER, TEN_XBT);
        assert_eq!(side.price, 5000.0);
        assert_eq!(side.notional_filled, TEN_XBT);
    }

    #[test]
    fn test_weights_sum_to_one_across_levels() {
        // Each level holds 4 XBT of value; target fills 4 + 4 + 2.
        // Sizes in contracts: value = |m/p| * size => size = value * p / |m|
        let book = [
            BookLevel::bid(6000.0, 400_000_000.0 * 6000.0 / 1e8),
            BookLevel::bid(5990.0, 400_000_000.0 * 5990.0 / 1e8),
            BookLevel::bid(5980.0, 400_000_000.0 * 5980.0 / 1e8),
        ];
        let side = impact_side(&book, BookSide::Bid, XBT_MULTIPLIER, TEN_XBT);
        assert!((side.notional_filled - TEN_XBT).abs() < 1e-9);

        // 0.4 * 6000 + 0.4 * 5990 + 0.2 * 5980
        let expected = 0.4 * 6000.0 + 0.4 * 5990.0 + 0.2 * 5980.0;
        assert!((side.price - expected).abs() < 1e-6);
    }

    #[test]
    fn test_thin_book_yields_partial_weighted_sum() {
        // One bid worth 2 XBT against a 10 XBT target
        let book = [BookLevel::bid(6000.0, 200_000_000.0 * 6000.0 / 1e8)];
        let side = impact_side(&book, BookSide::Bid, XBT_MULTIPLIER, TEN_XBT);
        assert!((side.notional_filled - 200_000_000.0).abs() < 1.0);
        assert!((side.price - 0.2 * 6000.0).abs() < 1e-6);
    }

    #[test]
    fn test_absent_level_ends_the_walk() {
        let book = [
            BookLevel::bid(6000.0, 200_000_000.0 * 6000.0 / 1e8),
            BookLevel::default(),
            // Unreachable past the gap
            BookLevel::bid(5990.0, 900_000_000.0 * 5990.0 / 1e8),
        ];
        let side = impact_side(&book, BookSide::Bid, XBT_MULTIPLIER, TEN_XBT);
        assert!((side.price - 0.2 * 6000.0).abs() < 1e-6);
    }

    #[test]
    fn test_absent_first_level_yields_zero() {
        // A side that is empty from the top walks no levels at all
        let book = [BookLevel::ask(6010.0, 1000.0)];
        let side = impact_side(&book, BookSide::Bid, XBT_MULTIPLIER, TEN_XBT);
        assert_eq!(side.price, 0.0);
        assert_eq!(side.notional_filled, 0.0);
    }

    #[test]
    fn test_sides_walk_independently() {
        // Bid side ends at depth 1 holding 5 XBT, ask side fills the target
        let book = [
            BookLevel::quote(6000.0, 30_000.0, 6010.0, 60_100.0),
            BookLevel::ask(6020.0, 60_200.0),
            BookLevel::ask(6030.0, 60_300.0),
        ];
        let bid = impact_side(&book, BookSide::Bid, XBT_MULTIPLIER, TEN_XBT);
        let ask = impact_side(&book, BookSide::Ask, XBT_MULTIPLIER, TEN_XBT);
        assert!((bid.notional_filled - 500_000_000.0).abs() < 1.0);
        assert!((bid.price - 0.5 * 6000.0).abs() < 1e-6);
        assert_eq!(ask.notional_filled, TEN_XBT);
    }

    #[test]
    fn test_impact_mid_is_arithmetic_mean() {
        // Both sides single deep level: bid 6000, ask 6010
        let book = [BookLevel::quote(
            6000.0,
            2_000_000_000.0 * 6000.0 / 1e8,
            6010.0,
            2_000_000_000.0 * 6010.0 / 1e8,
        )];
        let result = impact_prices(&book, &test_instrument(), TEN_XBT);
        assert_eq!(result.impact_bid, 6000.0);
        assert_eq!(result.impact_ask, 6010.0);
        assert_eq!(result.impact_mid, 6005.0);
        assert_eq!(
            result.impact_mid,
            (result.impact_bid + result.impact_ask) / 2.0
        );
    }

    #[test]
    fn test_empty_book() {
        let result = impact_prices(&[], &test_instrument(), TEN_XBT);
        assert_eq!(result.impact_bid, 0.0);
        assert_eq!(result.impact_ask, 0.0);
        assert_eq!(result.impact_mid, 0.0);
    }

    #[test]
    fn test_linear_contract_walk() {
        // Linear multiplier 1: level value is price * size base units
        let book = [
            BookLevel::ask(3000.0, 200_000.0), // 6e8
            BookLevel::ask(3010.0, 200_000.0), // 6e8, clamped to 4e8
        ];
        let side = impact_side(&book, BookSide::Ask, 1.0, TEN_XBT);
        assert!((side.notional_filled - TEN_XBT).abs() < 1e-9);
        let expected = 0.6 * 3000.0 + 0.4 * 3010.0;
        assert!((side.price - expected).abs() < 1e-6);
    }
}
