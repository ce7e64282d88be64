//! Public trade prints
//!
//! A [`TradeInfo`] is what the rest of the system sees of an execution:
//! both the matching engine's fills and event-type-1 ingress packets
//! normalize into this shape before reaching the rolling trade window and
//! the strategies.

use serde::{Deserialize, Serialize};

use crate::packet::Side;

/// A single trade print in display units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeInfo {
    /// Execution price in display units.
    pub price: f64,
    /// Traded quantity.
    pub quantity: u64,
    /// Aggressor side of the print.
    pub side: Side,
    /// Producer timestamp in nanoseconds.
    pub timestamp_ns: u64,
}

impl TradeInfo {
    pub fn new(price: f64, quantity: u64, side: Side, timestamp_ns: u64) -> Self {
        Self {
            price,
            quantity,
            side,
            timestamp_ns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_serialization() {
        let trade = TradeInfo::new(50000.25, 3, Side::Buy, 1_708_123_456_789_000_000);
        let json = serde_json::to_string(&trade).unwrap();
        let back: TradeInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(trade, back);
        assert!(json.contains("\"BUY\""));
    }
}
