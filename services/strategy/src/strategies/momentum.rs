//! Mid-price momentum
//!
//! Keeps a bounded window of observed mid prices and signals on the
//! simple return between the oldest and newest sample.

use std::collections::VecDeque;

use types::signal::SignalKind;
use types::snapshot::BookSnapshot;
use types::trade::TradeInfo;

use crate::{clamp_confidence, Strategy};

pub struct Momentum {
    window: usize,
    threshold: f64,
    price_history: VecDeque<f64>,
}

impl Momentum {
    pub fn new(window: usize, threshold: f64) -> Self {
        Self {
            window,
            threshold,
            price_history: VecDeque::with_capacity(window),
        }
    }

    /// Return over the current window, if at least two samples exist.
    fn window_return(&self) -> Option<f64> {
        if self.price_history.len() < 2 {
            return None;
        }
        let first = *self.price_history.front().unwrap();
        let last = *self.price_history.back().unwrap();
        if first.abs() < 1e-9 {
            return None;
        }
        Some((last - first) / first)
    }
}

impl Default for Momentum {
    fn default() -> Self {
        Self::new(20, 0.02)
    }
}

impl Strategy for Momentum {
    fn name(&self) -> &str {
        "Momentum"
    }

    fn evaluate(&mut self, snapshot: &BookSnapshot, _recent_trades: &[TradeInfo]) -> SignalKind {
        if snapshot.mid_price <= 0.0 {
            return SignalKind::Neutral;
        }

        self.price_history.push_back(snapshot.mid_price);
        if self.price_history.len() > self.window {
            self.price_history.pop_front();
        }

        match self.window_return() {
            Some(r) if r > self.threshold => SignalKind::Buy,
            Some(r) if r < -self.threshold => SignalKind::Sell,
            _ => SignalKind::Neutral,
        }
    }

    fn confidence(
        &self,
        _snapshot: &BookSnapshot,
        _recent_trades: &[TradeInfo],
        signal: SignalKind,
    ) -> f64 {
        if signal == SignalKind::Neutral {
            return 0.0;
        }
        match self.window_return() {
            Some(r) => clamp_confidence((r.abs() - self.threshold) / self.threshold),
            None => 0.0,
        }
    }

    fn reset(&mut self) {
        self.price_history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::make_snapshot;

    fn snap_with_mid(mid: f64) -> BookSnapshot {
        let mut snap = make_snapshot(&[(mid - 0.5, 100, 1)], &[(mid + 0.5, 100, 1)]);
        snap.mid_price = mid;
        snap
    }

    #[test]
    fn test_buy_on_uptrend() {
        let mut momentum = Momentum::new(5, 0.02);
        for mid in [100.0, 101.0, 102.0, 103.0] {
            momentum.evaluate(&snap_with_mid(mid), &[]);
        }
        // 4% rise across the window clears the 2% threshold.
        assert_eq!(momentum.evaluate(&snap_with_mid(104.0), &[]), SignalKind::Buy);
    }

    #[test]
    fn test_sell_on_downtrend() {
        let mut momentum = Momentum::new(5, 0.02);
        for mid in [100.0, 99.0, 98.0, 97.0] {
            momentum.evaluate(&snap_with_mid(mid), &[]);
        }
        assert_eq!(momentum.evaluate(&snap_with_mid(96.0), &[]), SignalKind::Sell);
    }

    #[test]
    fn test_neutral_with_single_sample() {
        let mut momentum = Momentum::new(5, 0.02);
        assert_eq!(momentum.evaluate(&snap_with_mid(100.0), &[]), SignalKind::Neutral);
    }

    #[test]
    fn test_neutral_below_threshold() {
        let mut momentum = Momentum::new(5, 0.02);
        momentum.evaluate(&snap_with_mid(100.0), &[]);
        assert_eq!(momentum.evaluate(&snap_with_mid(100.5), &[]), SignalKind::Neutral);
    }

    #[test]
    fn test_window_slides() {
        let mut momentum = Momentum::new(3, 0.02);
        for mid in [100.0, 104.0, 104.0] {
            momentum.evaluate(&snap_with_mid(mid), &[]);
        }
        // Window is now [104, 104, 104]: the old 100 fell out, return flat.
        assert_eq!(momentum.evaluate(&snap_with_mid(104.0), &[]), SignalKind::Neutral);
    }

    #[test]
    fn test_ignores_missing_mid() {
        let mut momentum = Momentum::new(5, 0.02);
        momentum.evaluate(&snap_with_mid(100.0), &[]);

        let empty = make_snapshot(&[], &[]);
        assert_eq!(momentum.evaluate(&empty, &[]), SignalKind::Neutral);
        assert_eq!(momentum.price_history.len(), 1, "empty mid not recorded");
    }

    #[test]
    fn test_reset_clears_history() {
        let mut momentum = Momentum::new(5, 0.02);
        for mid in [100.0, 110.0] {
            momentum.evaluate(&snap_with_mid(mid), &[]);
        }
        momentum.reset();
        assert_eq!(momentum.evaluate(&snap_with_mid(120.0), &[]), SignalKind::Neutral);
    }
}
