//! Pairs-trading z-score
//!
//! Tracks the hedged spread `p1 − beta·p2` over a bounded window and
//! signals mean reversion when the current spread's z-score leaves the
//! band. Prices arrive through [`PairsTrading::update_prices`]; the book
//! snapshot is not consulted.

use std::collections::VecDeque;

use types::signal::SignalKind;
use types::snapshot::BookSnapshot;
use types::trade::TradeInfo;

use crate::{clamp_confidence, Strategy};

pub struct PairsTrading {
    beta: f64,
    window: usize,
    z_threshold: f64,
    spread_history: VecDeque<f64>,
}

impl PairsTrading {
    pub fn new(beta: f64, window: usize, z_threshold: f64) -> Self {
        Self {
            beta,
            window,
            z_threshold,
            spread_history: VecDeque::with_capacity(window),
        }
    }

    /// Push a new pair observation into the spread window.
    pub fn update_prices(&mut self, price1: f64, price2: f64) {
        let spread = price1 - self.beta * price2;
        self.spread_history.push_back(spread);
        if self.spread_history.len() > self.window {
            self.spread_history.pop_front();
        }
    }

    /// Z-score of the newest spread against the window, once full.
    /// None while warming up or when the window has no variance.
    fn z_score(&self) -> Option<f64> {
        if self.spread_history.len() < self.window {
            return None;
        }

        let n = self.spread_history.len() as f64;
        let mean: f64 = self.spread_history.iter().sum::<f64>() / n;
        let variance: f64 = self
            .spread_history
            .iter()
            .map(|s| {
                let diff = s - mean;
                diff * diff
            })
            .sum::<f64>()
            / n;
        let std_dev = variance.sqrt();
        if std_dev < 1e-12 {
            return None;
        }

        let current = *self.spread_history.back().unwrap();
        Some((current - mean) / std_dev)
    }
}

impl Default for PairsTrading {
    fn default() -> Self {
        Self::new(1.0, 50, 2.0)
    }
}

impl Strategy for PairsTrading {
    fn name(&self) -> &str {
        "PairsTrading"
    }

    fn evaluate(&mut self, _snapshot: &BookSnapshot, _recent_trades: &[TradeInfo]) -> SignalKind {
        match self.z_score() {
            Some(z) if z > self.z_threshold => SignalKind::ShortPair,
            Some(z) if z < -self.z_threshold => SignalKind::LongPair,
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
        match self.z_score() {
            Some(z) => clamp_confidence((z.abs() - self.z_threshold) / self.z_threshold),
            None => 0.0,
        }
    }

    fn reset(&mut self) {
        self.spread_history.clear();
    }
}
