//! Iceberg / hidden liquidity detector
//!
//! Many small fills repeating at one price suggest a hidden order being
//! refilled there. The detector scores each side of the touch by fill
//! count and volume against configured floors; a side whose strength
//! clears 1.0 is treated as hiding size.

use types::signal::SignalKind;
use types::snapshot::BookSnapshot;
use types::trade::TradeInfo;

use crate::{clamp_confidence, Strategy};

pub struct LiquidityDetector {
    min_fills: u32,
    min_volume: u64,
    price_tolerance: f64,
}

impl LiquidityDetector {
    pub fn new(min_fills: u32, min_volume: u64, price_tolerance: f64) -> Self {
        Self {
            min_fills,
            min_volume,
            price_tolerance,
        }
    }

    /// Iceberg strength at a price: min(fills/min_fills, volume/min_volume).
    /// Values above 1.0 mean both floors are cleared.
    fn strength_at(&self, trades: &[TradeInfo], price_level: f64) -> f64 {
        let mut fills = 0u32;
        let mut volume = 0u64;
        for trade in trades {
            if (trade.price - price_level).abs() < self.price_tolerance {
                fills += 1;
                volume += trade.quantity;
            }
        }

        if self.min_fills == 0 || self.min_volume == 0 {
            return 0.0;
        }
        let fill_ratio = fills as f64 / self.min_fills as f64;
        let volume_ratio = volume as f64 / self.min_volume as f64;
        fill_ratio.min(volume_ratio)
    }
}

impl Default for LiquidityDetector {
    fn default() -> Self {
        Self::new(5, 100, 0.01)
    }
}

impl Strategy for LiquidityDetector {
    fn name(&self) -> &str {
        "LiquidityDetector"
    }

    fn evaluate(&mut self, snapshot: &BookSnapshot, recent_trades: &[TradeInfo]) -> SignalKind {
        if recent_trades.is_empty() || snapshot.bids.is_empty() {
            return SignalKind::Neutral;
        }

        let iceberg_bid = self.strength_at(recent_trades, snapshot.best_bid) > 1.0;
        let iceberg_ask = self.strength_at(recent_trades, snapshot.best_ask) > 1.0;

        // Hidden support under the bid lifts; hidden supply over the ask caps.
        if iceberg_bid && !iceberg_ask {
            SignalKind::Buy
        } else if iceberg_ask && !iceberg_bid {
            SignalKind::Sell
        } else {
            SignalKind::Neutral
        }
    }

    fn confidence(
        &self,
        snapshot: &BookSnapshot,
        recent_trades: &[TradeInfo],
        signal: SignalKind,
    ) -> f64 {
        let price = match signal {
            SignalKind::Buy => snapshot.best_bid,
            SignalKind::Sell => snapshot.best_ask,
            _ => return 0.0,
        };
        clamp_confidence(self.strength_at(recent_trades, price) - 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::make_snapshot;
    use types::packet::Side;

    fn prints_at(price: f64, quantity: u64, count: usize) -> Vec<TradeInfo> {
        (0..count)
            .map(|_| TradeInfo::new(price, quantity, Side::Buy, 0))
            .collect()
    }

    #[test]
    fn test_detects_bid_iceberg() {
        let mut detector = LiquidityDetector::new(3, 50, 0.1);
        let snap = make_snapshot(&[(100.0, 500, 3)], &[(101.0, 500, 3)]);
        let trades = prints_at(100.0, 20, 6);
        assert_eq!(detector.evaluate(&snap, &trades), SignalKind::Buy);
    }

    #[test]
    fn test_detects_ask_iceberg() {
        let mut detector = LiquidityDetector::new(3, 50, 0.1);
        let snap = make_snapshot(&[(100.0, 500, 3)], &[(101.0, 500, 3)]);
        let trades = prints_at(101.0, 20, 6);
        assert_eq!(detector.evaluate(&snap, &trades), SignalKind::Sell);
    }

    #[test]
    fn test_neutral_on_few_fills() {
        let mut detector = LiquidityDetector::new(5, 100, 0.1);
        let snap = make_snapshot(&[(100.0, 500, 3)], &[(101.0, 500, 3)]);
        let trades = prints_at(100.0, 10, 2);
        assert_eq!(detector.evaluate(&snap, &trades), SignalKind::Neutral);
    }

    #[test]
    fn test_neutral_on_volume_below_floor() {
        let mut detector = LiquidityDetector::new(3, 1000, 0.1);
        let snap = make_snapshot(&[(100.0, 500, 3)], &[(101.0, 500, 3)]);
        // Plenty of fills, not enough volume.
        let trades = prints_at(100.0, 10, 8);
        assert_eq!(detector.evaluate(&snap, &trades), SignalKind::Neutral);
    }

    #[test]
    fn test_neutral_when_both_sides_hide() {
        let mut detector = LiquidityDetector::new(3, 50, 0.1);
        let snap = make_snapshot(&[(100.0, 500, 3)], &[(101.0, 500, 3)]);
        let mut trades = prints_at(100.0, 20, 6);
        trades.extend(prints_at(101.0, 20, 6));
        assert_eq!(detector.evaluate(&snap, &trades), SignalKind::Neutral);
    }

    #[test]
    fn test_neutral_without_trades_or_book() {
        let mut detector = LiquidityDetector::default();
        let empty_book = make_snapshot(&[], &[]);
        assert_eq!(detector.evaluate(&empty_book, &[]), SignalKind::Neutral);

        let snap = make_snapshot(&[(100.0, 500, 3)], &[(101.0, 500, 3)]);
        assert_eq!(detector.evaluate(&snap, &[]), SignalKind::Neutral);
    }

    #[test]
    fn test_tolerance_bounds_matching() {
        let mut detector = LiquidityDetector::new(3, 50, 0.01);
        let snap = make_snapshot(&[(100.0, 500, 3)], &[(101.0, 500, 3)]);
        // Prints 5 cents away are outside the 1-cent tolerance.
        let trades = prints_at(100.05, 20, 6);
        assert_eq!(detector.evaluate(&snap, &trades), SignalKind::Neutral);
    }
}
