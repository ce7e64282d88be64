//! Strategy evaluation engine
//!
//! Owns the ordered strategy set. Each tick the pipeline hands it the
//! active symbol's snapshot and trade window; the engine runs every
//! strategy in insertion order, asks it for a confidence, and overwrites
//! the latest-signal entry keyed by strategy name.

use std::collections::HashMap;

use tracing::debug;
use types::clock::now_ns;
use types::signal::StrategySignal;
use types::snapshot::BookSnapshot;
use types::trade::TradeInfo;

use crate::Strategy;

/// Ordered strategy set with a latest-signal map.
#[derive(Default)]
pub struct StrategyEngine {
    strategies: Vec<Box<dyn Strategy>>,
    latest_signals: HashMap<String, StrategySignal>,
}

impl StrategyEngine {
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
            latest_signals: HashMap::new(),
        }
    }

    /// Append a strategy. Strategies are never removed; evaluation order
    /// is insertion order.
    pub fn add_strategy(&mut self, strategy: Box<dyn Strategy>) {
        debug!(name = strategy.name(), "strategy registered");
        self.strategies.push(strategy);
    }

    /// Run every strategy against the snapshot and trade window.
    ///
    /// Returns the signals in insertion order and refreshes the
    /// latest-signal map.
    pub fn evaluate(
        &mut self,
        snapshot: &BookSnapshot,
        recent_trades: &[TradeInfo],
    ) -> Vec<StrategySignal> {
        let timestamp_ns = now_ns();
        let mut signals = Vec::with_capacity(self.strategies.len());

        for strategy in &mut self.strategies {
            let signal = strategy.evaluate(snapshot, recent_trades);
            let confidence = strategy.confidence(snapshot, recent_trades, signal);

            let record = StrategySignal {
                strategy_name: strategy.name().to_string(),
                symbol: snapshot.symbol.clone(),
                signal,
                confidence,
                timestamp_ns,
            };

            self.latest_signals
                .insert(record.strategy_name.clone(), record.clone());
            signals.push(record);
        }

        signals
    }

    /// Forward a trade print to every strategy.
    pub fn on_trade(&mut self, trade: &TradeInfo) {
        for strategy in &mut self.strategies {
            strategy.on_trade(trade);
        }
    }

    /// Latest signal for a strategy name, if it has evaluated at least once.
    pub fn latest_signal(&self, strategy_name: &str) -> Option<&StrategySignal> {
        self.latest_signals.get(strategy_name)
    }

    /// The full latest-signal map.
    pub fn all_signals(&self) -> &HashMap<String, StrategySignal> {
        &self.latest_signals
    }

    pub fn strategy_count(&self) -> usize {
        self.strategies.len()
    }

    /// Reset every strategy's accumulated state. The latest-signal map is
    /// left in place until the next evaluation overwrites it.
    pub fn reset_all(&mut self) {
        for strategy in &mut self.strategies {
            strategy.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::{Momentum, OrderBookImbalance};
    use crate::testutil::make_snapshot;
    use types::signal::SignalKind;

    fn two_strategy_engine() -> StrategyEngine {
        let mut engine = StrategyEngine::new();
        engine.add_strategy(Box::new(OrderBookImbalance::default()));
        engine.add_strategy(Box::new(Momentum::default()));
        engine
    }

    #[test]
    fn test_runs_all_strategies_in_order() {
        let mut engine = two_strategy_engine();
        assert_eq!(engine.strategy_count(), 2);

        let snap = make_snapshot(&[(100.0, 500, 3)], &[(101.0, 500, 3)]);
        let signals = engine.evaluate(&snap, &[]);

        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].strategy_name, "OrderBookImbalance");
        assert_eq!(signals[1].strategy_name, "Momentum");
        assert_eq!(signals[0].symbol, "TEST");
    }

    #[test]
    fn test_latest_signal_overwritten() {
        let mut engine = two_strategy_engine();
        let snap = make_snapshot(&[(100.0, 500, 3)], &[(101.0, 500, 3)]);

        engine.evaluate(&snap, &[]);
        let first = engine.latest_signal("Momentum").unwrap().clone();

        engine.evaluate(&snap, &[]);
        let second = engine.latest_signal("Momentum").unwrap();

        assert!(second.timestamp_ns >= first.timestamp_ns);
        assert_eq!(engine.all_signals().len(), 2);
    }

    #[test]
    fn test_unknown_strategy_has_no_signal() {
        let engine = two_strategy_engine();
        assert!(engine.latest_signal("DoesNotExist").is_none());
    }

    #[test]
    fn test_neutral_signal_has_zero_confidence() {
        let mut engine = two_strategy_engine();
        let snap = make_snapshot(&[(100.0, 500, 3)], &[(101.0, 500, 3)]);

        let signals = engine.evaluate(&snap, &[]);
        for signal in &signals {
            assert_eq!(signal.signal, SignalKind::Neutral);
            assert_eq!(signal.confidence, 0.0);
        }
    }
}
