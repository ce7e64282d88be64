//! Immutable order book views
//!
//! A [`BookSnapshot`] is built once per engine tick from the active
//! symbol's book and handed to every strategy. Prices are display-unit
//! doubles; levels come pre-sorted (bids descending, asks ascending) so
//! consumers index the best level at position 0.

use serde::{Deserialize, Serialize};

/// One aggregated price level as seen by strategies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelView {
    /// Level price in display units.
    pub price: f64,
    /// Total resting quantity at this level.
    pub quantity: u64,
    /// Number of resting orders at this level.
    pub order_count: u32,
}

/// Point-in-time view of one symbol's book.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// Symbol this view was taken for.
    pub symbol: String,
    /// Bid levels, best (highest) first.
    pub bids: Vec<LevelView>,
    /// Ask levels, best (lowest) first.
    pub asks: Vec<LevelView>,
    /// Best bid in display units, 0.0 when the side is empty.
    pub best_bid: f64,
    /// Best ask in display units, 0.0 when the side is empty.
    pub best_ask: f64,
    /// (best_bid + best_ask) / 2, or 0.0 when either side is empty.
    pub mid_price: f64,
    /// Capture timestamp in nanoseconds.
    pub timestamp_ns: u64,
}

impl BookSnapshot {
    /// An empty snapshot for a symbol with no book yet.
    pub fn empty(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            ..Self::default()
        }
    }

    /// Whether both sides are empty.
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}
