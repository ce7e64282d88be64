//! Funding-rate arbitrage
//!
//! Perpetual funding pays one side of the market every interval. When the
//! rate clears the threshold, the carry trade is to hold spot against an
//! opposite perp position and collect the payments. Rate and reference
//! prices are fed in externally; the book snapshot is not consulted.

use types::signal::SignalKind;
use types::snapshot::BookSnapshot;
use types::trade::TradeInfo;

use crate::{clamp_confidence, Strategy};

pub struct FundingArbitrage {
    threshold: f64,
    funding_rate: f64,
    spot_price: f64,
    perp_price: f64,
}

impl FundingArbitrage {
    pub fn new(funding_threshold: f64) -> Self {
        Self {
            threshold: funding_threshold,
            funding_rate: 0.0,
            spot_price: 0.0,
            perp_price: 0.0,
        }
    }

    pub fn set_funding_rate(&mut self, rate: f64) {
        self.funding_rate = rate;
    }

    pub fn set_spot_price(&mut self, price: f64) {
        self.spot_price = price;
    }

    pub fn set_perp_price(&mut self, price: f64) {
        self.perp_price = price;
    }

    /// Basis between perp and spot as a fraction of spot, for confidence
    /// blending. 1% basis earns full credit.
    fn basis_score(&self) -> f64 {
        if self.spot_price.abs() < 1e-9 {
            return 0.0;
        }
        let basis = (self.perp_price - self.spot_price).abs() / self.spot_price;
        clamp_confidence(basis / 0.01)
    }
}

impl Default for FundingArbitrage {
    fn default() -> Self {
        Self::new(0.001)
    }
}

impl Strategy for FundingArbitrage {
    fn name(&self) -> &str {
        "FundingArbitrage"
    }

    fn evaluate(&mut self, _snapshot: &BookSnapshot, _recent_trades: &[TradeInfo]) -> SignalKind {
        // Positive funding: shorts pay longs, so collect by holding spot
        // and shorting the perp. Negative funding mirrors.
        if self.funding_rate > self.threshold {
            SignalKind::LongSpotShortPerp
        } else if self.funding_rate < -self.threshold {
            SignalKind::ShortSpotLongPerp
        } else {
            SignalKind::Neutral
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
        let funding_excess = self.funding_rate.abs() - self.threshold;
        let funding_score = clamp_confidence(funding_excess / self.threshold);
        clamp_confidence(0.7 * funding_score + 0.3 * self.basis_score())
    }

    fn reset(&mut self) {
        self.funding_rate = 0.0;
        self.spot_price = 0.0;
        self.perp_price = 0.0;
    }
}
