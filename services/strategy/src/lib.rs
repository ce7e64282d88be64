//! Strategy evaluation for the QuantumFlow pipeline
//!
//! A [`Strategy`] turns the current book snapshot and the rolling trade
//! window into a directional signal. The [`engine::StrategyEngine`] owns an
//! ordered set of boxed strategies, evaluates them once per engine tick,
//! and keeps the latest signal per strategy name.
//!
//! Evaluation is deterministic in the strategy's current state; the hot
//! path dispatches through the trait object at most once per strategy per
//! tick.

pub mod engine;
pub mod strategies;

use types::signal::SignalKind;
use types::snapshot::BookSnapshot;
use types::trade::TradeInfo;

pub use engine::StrategyEngine;

/// Clamp a confidence score into [0, 1].
pub fn clamp_confidence(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Common contract for every signal-producing strategy.
pub trait Strategy: Send {
    /// Stable name, used as the key in the latest-signals map.
    fn name(&self) -> &str;

    /// Produce a signal from the current state.
    fn evaluate(&mut self, snapshot: &BookSnapshot, recent_trades: &[TradeInfo]) -> SignalKind;

    /// Confidence for a signal just produced by `evaluate`.
    ///
    /// Default: 0 for neutral, a placeholder 0.5 otherwise.
    fn confidence(
        &self,
        _snapshot: &BookSnapshot,
        _recent_trades: &[TradeInfo],
        signal: SignalKind,
    ) -> f64 {
        if signal == SignalKind::Neutral {
            0.0
        } else {
            0.5
        }
    }

    /// Observe a trade print. Default: ignore.
    fn on_trade(&mut self, _trade: &TradeInfo) {}

    /// Drop accumulated state.
    fn reset(&mut self) {}
}

#[cfg(test)]
pub(crate) mod testutil {
    //! Snapshot builder shared by the strategy test modules.

    use types::snapshot::{BookSnapshot, LevelView};

    /// Build a snapshot from (price, quantity, order_count) triples,
    /// best-first on both sides; best bid/ask and mid derive from the
    /// first entries.
    pub(crate) fn make_snapshot(
        bids: &[(f64, u64, u32)],
        asks: &[(f64, u64, u32)],
    ) -> BookSnapshot {
        let level = |&(price, quantity, order_count): &(f64, u64, u32)| LevelView {
            price,
            quantity,
            order_count,
        };

        let bids: Vec<LevelView> = bids.iter().map(level).collect();
        let asks: Vec<LevelView> = asks.iter().map(level).collect();
        let best_bid = bids.first().map(|l| l.price).unwrap_or(0.0);
        let best_ask = asks.first().map(|l| l.price).unwrap_or(0.0);

        BookSnapshot {
            symbol: "TEST".to_string(),
            bids,
            asks,
            best_bid,
            best_ask,
            mid_price: (best_bid + best_ask) / 2.0,
            timestamp_ns: 0,
        }
    }
}
