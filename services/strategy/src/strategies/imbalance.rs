//! Order book imbalance
//!
//! Compares resting quantity on the top N bid and ask levels. A book
//! leaning heavily to one side tends to push price that way before the
//! trades print.

use types::signal::SignalKind;
use types::snapshot::BookSnapshot;
use types::trade::TradeInfo;

use crate::{clamp_confidence, Strategy};

pub struct OrderBookImbalance {
    top_n: usize,
    threshold: f64,
}

impl OrderBookImbalance {
    pub fn new(top_n: usize, threshold: f64) -> Self {
        Self { top_n, threshold }
    }

    /// (bid − ask) / (bid + ask) over the top N levels; 0 on an empty top.
    fn imbalance(&self, snapshot: &BookSnapshot) -> f64 {
        let sum = |levels: &[types::snapshot::LevelView]| -> f64 {
            levels
                .iter()
                .take(self.top_n)
                .map(|l| l.quantity as f64)
                .sum()
        };

        let bid_volume = sum(&snapshot.bids);
        let ask_volume = sum(&snapshot.asks);
        let total = bid_volume + ask_volume;
        if total < 1e-9 {
            return 0.0;
        }
        (bid_volume - ask_volume) / total
    }
}

impl Default for OrderBookImbalance {
    fn default() -> Self {
        Self::new(5, 0.3)
    }
}

impl Strategy for OrderBookImbalance {
    fn name(&self) -> &str {
        "OrderBookImbalance"
    }

    fn evaluate(&mut self, snapshot: &BookSnapshot, _recent_trades: &[TradeInfo]) -> SignalKind {
        let imbalance = self.imbalance(snapshot);
        if imbalance > self.threshold {
            SignalKind::Buy
        } else if imbalance < -self.threshold {
            SignalKind::Sell
        } else {
            SignalKind::Neutral
        }
    }

    fn confidence(
        &self,
        snapshot: &BookSnapshot,
        _recent_trades: &[TradeInfo],
        signal: SignalKind,
    ) -> f64 {
        if signal == SignalKind::Neutral {
            return 0.0;
        }
        let excess = self.imbalance(snapshot).abs() - self.threshold;
        clamp_confidence(excess / self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::make_snapshot;

    #[test]
    fn test_buy_signal_on_bid_heavy() {
        let mut strat = OrderBookImbalance::new(3, 0.3);
        let snap = make_snapshot(
            &[(100.0, 1000, 5), (99.0, 800, 3), (98.0, 600, 2)],
            &[(101.0, 100, 1), (102.0, 50, 1), (103.0, 50, 1)],
        );
        assert_eq!(strat.evaluate(&snap, &[]), SignalKind::Buy);
    }

    #[test]
    fn test_sell_signal_on_ask_heavy() {
        let mut strat = OrderBookImbalance::new(3, 0.3);
        let snap = make_snapshot(
            &[(100.0, 100, 1), (99.0, 50, 1), (98.0, 50, 1)],
            &[(101.0, 1000, 5), (102.0, 800, 3), (103.0, 600, 2)],
        );
        assert_eq!(strat.evaluate(&snap, &[]), SignalKind::Sell);
    }

    #[test]
    fn test_neutral_on_balanced() {
        let mut strat = OrderBookImbalance::new(3, 0.3);
        let snap = make_snapshot(
            &[(100.0, 500, 3), (99.0, 500, 3)],
            &[(101.0, 500, 3), (102.0, 500, 3)],
        );
        assert_eq!(strat.evaluate(&snap, &[]), SignalKind::Neutral);
    }

    #[test]
    fn test_neutral_on_empty_book() {
        let mut strat = OrderBookImbalance::new(3, 0.3);
        let snap = make_snapshot(&[], &[]);
        assert_eq!(strat.evaluate(&snap, &[]), SignalKind::Neutral);
    }

    #[test]
    fn test_only_top_n_counted() {
        let mut strat = OrderBookImbalance::new(1, 0.3);
        // Deep bid liquidity beyond the top level must not count.
        let snap = make_snapshot(
            &[(100.0, 100, 1), (99.0, 100_000, 9)],
            &[(101.0, 100, 1)],
        );
        assert_eq!(strat.evaluate(&snap, &[]), SignalKind::Neutral);
    }

    #[test]
    fn test_confidence_scales_with_excess() {
        let strat = OrderBookImbalance::new(3, 0.3);
        let heavy = make_snapshot(&[(100.0, 1000, 5)], &[(101.0, 10, 1)]);
        let conf = strat.confidence(&heavy, &[], SignalKind::Buy);
        assert!(conf > 0.9, "near-total imbalance should be high confidence");

        let neutral_conf = strat.confidence(&heavy, &[], SignalKind::Neutral);
        assert_eq!(neutral_conf, 0.0);
    }
}
