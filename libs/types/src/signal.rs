//! Strategy signal types
//!
//! Every strategy evaluation produces a [`SignalKind`]; the strategy engine
//! wraps it into a [`StrategySignal`] record keyed by strategy name. The
//! serialized form (SCREAMING_SNAKE_CASE kinds) is the contract with any
//! external fan-out.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction produced by a strategy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalKind {
    Neutral,
    Buy,
    Sell,
    LongSpotShortPerp,
    ShortSpotLongPerp,
    LongPair,
    ShortPair,
}

impl SignalKind {
    /// Stable string form, matching the serialized representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Neutral => "NEUTRAL",
            SignalKind::Buy => "BUY",
            SignalKind::Sell => "SELL",
            SignalKind::LongSpotShortPerp => "LONG_SPOT_SHORT_PERP",
            SignalKind::ShortSpotLongPerp => "SHORT_SPOT_LONG_PERP",
            SignalKind::LongPair => "LONG_PAIR",
            SignalKind::ShortPair => "SHORT_PAIR",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One strategy's latest verdict for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySignal {
    /// Stable strategy name.
    pub strategy_name: String,
    /// Symbol the snapshot was taken for.
    pub symbol: String,
    /// Evaluated direction.
    pub signal: SignalKind,
    /// Strategy confidence in [0, 1]; 0 for neutral signals.
    pub confidence: f64,
    /// Evaluation timestamp in nanoseconds.
    pub timestamp_ns: u64,
}
