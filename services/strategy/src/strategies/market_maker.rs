//! Inventory-aware market maker
//!
//! Tracks net inventory from trade prints and signals when the position
//! drifts past half the configured limit. Quote generation skews both
//! sides of the spread toward reducing exposure.

use types::packet::Side;
use types::signal::SignalKind;
use types::snapshot::BookSnapshot;
use types::trade::TradeInfo;

use crate::Strategy;

pub struct MarketMaker {
    max_inventory: f64,
    base_spread: f64,
    inventory: f64,
}

impl MarketMaker {
    pub fn new(max_inventory: f64, base_spread: f64) -> Self {
        Self {
            max_inventory,
            base_spread,
            inventory: 0.0,
        }
    }

    /// Net inventory accumulated from trade prints.
    pub fn inventory(&self) -> f64 {
        self.inventory
    }

    fn inventory_ratio(&self) -> f64 {
        if self.max_inventory.abs() < 1e-9 {
            return 0.0;
        }
        self.inventory / self.max_inventory
    }

    /// Bid/ask quotes around a mid price, skewed by inventory.
    ///
    /// Positive inventory lowers both quotes to encourage sells; negative
    /// inventory raises them.
    pub fn generate_quotes(&self, mid_price: f64) -> (f64, f64) {
        let skew = self.inventory_ratio() * 0.001;
        let half_spread = mid_price * self.base_spread / 2.0;
        let bid = mid_price - half_spread - skew;
        let ask = mid_price + half_spread - skew;
        (bid, ask)
    }
}

impl Default for MarketMaker {
    fn default() -> Self {
        Self::new(10.0, 0.001)
    }
}

impl Strategy for MarketMaker {
    fn name(&self) -> &str {
        "MarketMaker"
    }

    fn evaluate(&mut self, snapshot: &BookSnapshot, _recent_trades: &[TradeInfo]) -> SignalKind {
        if snapshot.mid_price <= 0.0 {
            return SignalKind::Neutral;
        }

        let ratio = self.inventory_ratio();
        if ratio > 0.5 {
            SignalKind::Sell
        } else if ratio < -0.5 {
            SignalKind::Buy
        } else {
            SignalKind::Neutral
        }
    }

    fn on_trade(&mut self, trade: &TradeInfo) {
        match trade.side {
            Side::Buy => self.inventory += trade.quantity as f64,
            Side::Sell => self.inventory -= trade.quantity as f64,
        }
    }

    fn reset(&mut self) {
        self.inventory = 0.0;
    }
}
