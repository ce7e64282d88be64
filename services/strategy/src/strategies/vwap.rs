//! VWAP execution scheduler
//!
//! Works off an execution curve: the volume profile says what fraction of
//! the parent order should be done by the end of each one-second slice.
//! The strategy signals Buy while executed quantity lags the curve and
//! goes quiet once the parent order (or the horizon) is exhausted.
//!
//! Time is advanced explicitly through [`VwapExecutor::advance_time`];
//! the strategy has no clock of its own, which keeps scheduling
//! deterministic under test and replay.

use types::signal::SignalKind;
use types::snapshot::BookSnapshot;
use types::trade::TradeInfo;

use crate::Strategy;

pub struct VwapExecutor {
    total_quantity: u64,
    volume_profile: Vec<f64>,
    executed_quantity: u64,
    elapsed_ms: u64,
}

impl VwapExecutor {
    /// `volume_profile` entries are per-second target fractions; an empty
    /// profile becomes uniform slices over `time_horizon_ms`.
    pub fn new(total_quantity: u64, time_horizon_ms: u64, volume_profile: Vec<f64>) -> Self {
        let volume_profile = if volume_profile.is_empty() {
            let slices = (time_horizon_ms / 1000).max(1) as usize;
            vec![1.0 / slices as f64; slices]
        } else {
            volume_profile
        };

        Self {
            total_quantity,
            volume_profile,
            executed_quantity: 0,
            elapsed_ms: 0,
        }
    }

    /// Advance the internal schedule clock.
    pub fn advance_time(&mut self, delta_ms: u64) {
        self.elapsed_ms += delta_ms;
    }

    pub fn executed_quantity(&self) -> u64 {
        self.executed_quantity
    }

    /// Cumulative target quantity for the current slice.
    fn target_quantity(&self) -> Option<u64> {
        let current_slice = (self.elapsed_ms / 1000) as usize;
        if current_slice >= self.volume_profile.len() {
            return None;
        }
        let target_fraction: f64 = self.volume_profile[..=current_slice].iter().sum();
        Some((self.total_quantity as f64 * target_fraction) as u64)
    }
}

impl Default for VwapExecutor {
    fn default() -> Self {
        Self::new(0, 60_000, Vec::new())
    }
}

impl Strategy for VwapExecutor {
    fn name(&self) -> &str {
        "VWAPExecutor"
    }

    fn evaluate(&mut self, _snapshot: &BookSnapshot, _recent_trades: &[TradeInfo]) -> SignalKind {
        if self.total_quantity == 0 || self.executed_quantity >= self.total_quantity {
            return SignalKind::Neutral;
        }

        match self.target_quantity() {
            Some(target) if self.executed_quantity < target => SignalKind::Buy,
            _ => SignalKind::Neutral,
        }
    }

    fn on_trade(&mut self, trade: &TradeInfo) {
        self.executed_quantity += trade.quantity;
    }

    fn reset(&mut self) {
        self.executed_quantity = 0;
        self.elapsed_ms = 0;
    }
}
