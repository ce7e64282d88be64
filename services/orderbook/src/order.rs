//! Pooled order record

use serde::{Deserialize, Serialize};
use types::packet::Side;
use types::price::InternalPrice;

/// Order lifecycle status.
///
/// Active orders rest in exactly one level FIFO and the book's index.
/// Fulfilled and Deleted are terminal; the book removes such orders from
/// every structure before the status becomes observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Active,
    Fulfilled,
    Deleted,
}

/// A resting or matching order.
///
/// Owned by the book's pool; the book hands out handles, never references.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Order {
    pub order_id: u64,
    pub agent_id: u64,
    pub side: Side,
    pub price: InternalPrice,
    pub initial_volume: u64,
    pub remaining_volume: u64,
    pub status: OrderStatus,
}

impl Order {
    pub fn new(
        order_id: u64,
        agent_id: u64,
        side: Side,
        price: InternalPrice,
        volume: u64,
    ) -> Self {
        Self {
            order_id,
            agent_id,
            side,
            price,
            initial_volume: volume,
            remaining_volume: volume,
            status: OrderStatus::Active,
        }
    }

    /// Consume up to `volume` from the order; transitions to Fulfilled
    /// when nothing remains.
    pub fn fill(&mut self, volume: u64) {
        self.remaining_volume = self.remaining_volume.saturating_sub(volume);
        if self.remaining_volume == 0 {
            self.status = OrderStatus::Fulfilled;
        }
    }

    pub fn is_fulfilled(&self) -> bool {
        self.status == OrderStatus::Fulfilled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buy_order() -> Order {
        Order::new(1, 1, Side::Buy, 100, 50)
    }

    #[test]
    fn test_initial_state() {
        let order = buy_order();
        assert_eq!(order.order_id, 1);
        assert_eq!(order.agent_id, 1);
        assert_eq!(order.side, Side::Buy);
        assert_eq!(order.price, 100);
        assert_eq!(order.remaining_volume, 50);
        assert_eq!(order.status, OrderStatus::Active);
    }

    #[test]
    fn test_partial_fill_stays_active() {
        let mut order = buy_order();
        order.fill(20);
        assert_eq!(order.status, OrderStatus::Active);
        assert_eq!(order.remaining_volume, 30);
    }

    #[test]
    fn test_full_fill_becomes_fulfilled() {
        let mut order = buy_order();
        order.fill(50);
        assert_eq!(order.status, OrderStatus::Fulfilled);
        assert_eq!(order.remaining_volume, 0);
        assert!(order.is_fulfilled());
    }

    #[test]
    fn test_overfill_saturates() {
        let mut order = buy_order();
        order.fill(80);
        assert_eq!(order.remaining_volume, 0);
        assert!(order.is_fulfilled());
    }
}
