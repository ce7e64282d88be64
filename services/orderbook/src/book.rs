//! The matching engine
//!
//! One [`Book`] per symbol. All public operations run on the consumer
//! thread; nothing here blocks, suspends, or allocates once the pools are
//! warm.
//!
//! Incoming book-level packets are replayed into `place_order` by the
//! pipeline with a synthetic taker id, so a level update that crosses the
//! spread executes trades exactly like an aggressive order would. That is
//! the upstream protocol's documented behavior, not an artifact of this
//! implementation.

use std::collections::{BTreeMap, HashMap};

use crate::arena::OrderHandle;
use serde::{Deserialize, Serialize};
use tracing::trace;
use types::packet::Side;
use types::price::{InternalPrice, PriceConverter};
use types::snapshot::{BookSnapshot, LevelView};

use crate::arena::{LevelHandle, LevelPool, OrderPool};
use crate::order::{Order, OrderStatus};

/// Default pool capacity for orders and levels.
pub const DEFAULT_POOL_CAPACITY: usize = 4096;

/// One fill produced by matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// The aggressing order.
    pub taker_order_id: u64,
    /// The resting order that was hit.
    pub maker_order_id: u64,
    /// Execution price (the resting level's price), internal units.
    pub price: InternalPrice,
    /// Filled volume.
    pub volume: u64,
}

/// Price-time-priority order book for one symbol.
pub struct Book {
    /// Buy side: best bid is the maximum key.
    bids: BTreeMap<InternalPrice, LevelHandle>,
    /// Sell side: best ask is the minimum key.
    asks: BTreeMap<InternalPrice, LevelHandle>,
    /// order_id → pool handle, Active orders only.
    index: HashMap<u64, OrderHandle>,
    orders: OrderPool,
    levels: LevelPool,
    /// Reused fill buffer; `place_order` returns a borrow of it.
    trades: Vec<Trade>,
}

impl Book {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_POOL_CAPACITY)
    }

    /// Create a book whose pools pre-allocate `capacity` order slots and
    /// a proportional number of level slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            index: HashMap::with_capacity(capacity),
            orders: OrderPool::with_capacity(capacity),
            levels: LevelPool::with_capacity(capacity / 4 + 1),
            trades: Vec::with_capacity(64),
        }
    }

    /// Place a limit order: match aggressively, then rest any residual.
    ///
    /// Returns the fills in execution order. A zero price or zero quantity
    /// is rejected with an empty slice and the book unchanged; a duplicate
    /// order id is treated the same way so the index never aliases.
    pub fn place_order(
        &mut self,
        order_id: u64,
        agent_id: u64,
        side: Side,
        price: InternalPrice,
        quantity: u64,
    ) -> &[Trade] {
        self.trades.clear();

        if price == 0 || quantity == 0 || self.index.contains_key(&order_id) {
            return &self.trades;
        }

        let mut remaining = quantity;
        match side {
            Side::Buy => self.match_buy(order_id, price, &mut remaining),
            Side::Sell => self.match_sell(order_id, price, &mut remaining),
        }

        if remaining > 0 {
            self.rest_order(order_id, agent_id, side, price, quantity, remaining);
        }

        &self.trades
    }

    /// Cancel a resting order. Unknown or already-terminal ids are a
    /// silent no-op.
    pub fn delete_order(&mut self, order_id: u64) {
        let Some(&handle) = self.index.get(&order_id) else {
            return;
        };

        let (side, price, remaining) = {
            let order = self.orders.get(handle);
            if order.status != OrderStatus::Active {
                return;
            }
            (order.side, order.price, order.remaining_volume)
        };

        self.orders.get_mut(handle).status = OrderStatus::Deleted;

        let side_map = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        if let Some(&level_handle) = side_map.get(&price) {
            let level = self.levels.get_mut(level_handle);
            level.remove(handle, remaining);
            if level.is_empty() {
                side_map.remove(&price);
                self.levels.release(level_handle);
            }
        }

        self.index.remove(&order_id);
        self.orders.release(handle);
        trace!(order_id, price, remaining, "order cancelled");
    }

    /// Best bid, or 0 when the buy side is empty.
    pub fn best_buy(&self) -> InternalPrice {
        self.bids.last_key_value().map(|(&p, _)| p).unwrap_or(0)
    }

    /// Best ask, or 0 when the sell side is empty.
    pub fn best_sell(&self) -> InternalPrice {
        self.asks.first_key_value().map(|(&p, _)| p).unwrap_or(0)
    }

    /// best_sell − best_buy in internal units; 0 when either side is empty.
    pub fn spread(&self) -> i64 {
        let (bid, ask) = (self.best_buy(), self.best_sell());
        if bid == 0 || ask == 0 {
            return 0;
        }
        ask as i64 - bid as i64
    }

    /// Midpoint of the touch in internal units; 0.0 when either side is
    /// empty.
    pub fn mid_price(&self) -> f64 {
        let (bid, ask) = (self.best_buy(), self.best_sell());
        if bid == 0 || ask == 0 {
            return 0.0;
        }
        (bid as f64 + ask as f64) / 2.0
    }

    /// Bid prices, best (highest) first.
    pub fn buy_prices(&self) -> Vec<InternalPrice> {
        self.bids.keys().rev().copied().collect()
    }

    /// Ask prices, best (lowest) first.
    pub fn sell_prices(&self) -> Vec<InternalPrice> {
        self.asks.keys().copied().collect()
    }

    pub fn buy_levels_count(&self) -> usize {
        self.bids.len()
    }

    pub fn sell_levels_count(&self) -> usize {
        self.asks.len()
    }

    /// Number of Active orders resting on the book.
    pub fn resting_orders_count(&self) -> usize {
        self.index.len()
    }

    /// Status of an order id. Ids the index no longer knows (never seen,
    /// fully filled, or cancelled) all report Deleted, which is the
    /// observable contract callers rely on.
    pub fn order_status(&self, order_id: u64) -> OrderStatus {
        match self.index.get(&order_id) {
            Some(&handle) => self.orders.get(handle).status,
            None => OrderStatus::Deleted,
        }
    }

    /// Total volume and order count at a price level, if present.
    pub fn level_info(&self, side: Side, price: InternalPrice) -> Option<(u64, u32)> {
        let side_map = match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        };
        side_map.get(&price).map(|&h| {
            let level = self.levels.get(h);
            (level.total_volume(), level.order_count())
        })
    }

    /// Order ids queued at a price level in time priority, oldest first.
    pub fn orders_at(&self, side: Side, price: InternalPrice) -> Vec<u64> {
        let side_map = match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        };
        match side_map.get(&price) {
            Some(&handle) => self
                .levels
                .get(handle)
                .iter()
                .map(|h| self.orders.get(h).order_id)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Build a display-unit snapshot of the full book.
    pub fn snapshot(
        &self,
        symbol: &str,
        converter: &PriceConverter,
        timestamp_ns: u64,
    ) -> BookSnapshot {
        let view = |(_, &handle): (&InternalPrice, &LevelHandle)| {
            let level = self.levels.get(handle);
            LevelView {
                price: converter.to_external(level.price()),
                quantity: level.total_volume(),
                order_count: level.order_count(),
            }
        };

        let bids: Vec<LevelView> = self.bids.iter().rev().map(view).collect();
        let asks: Vec<LevelView> = self.asks.iter().map(view).collect();

        let best_bid = bids.first().map(|l| l.price).unwrap_or(0.0);
        let best_ask = asks.first().map(|l| l.price).unwrap_or(0.0);
        let mid_price = if best_bid > 0.0 && best_ask > 0.0 {
            (best_bid + best_ask) / 2.0
        } else {
            0.0
        };

        BookSnapshot {
            symbol: symbol.to_string(),
            bids,
            asks,
            best_bid,
            best_ask,
            mid_price,
            timestamp_ns,
        }
    }

    fn match_buy(&mut self, taker_id: u64, limit: InternalPrice, remaining: &mut u64) {
        while *remaining > 0 {
            let (best_price, level_handle) = match self.asks.first_key_value() {
                Some((&p, &h)) if p <= limit => (p, h),
                _ => break,
            };
            self.fill_level(taker_id, level_handle, best_price, remaining);
            if self.levels.get(level_handle).is_empty() {
                self.asks.remove(&best_price);
                self.levels.release(level_handle);
            }
        }
    }

    fn match_sell(&mut self, taker_id: u64, limit: InternalPrice, remaining: &mut u64) {
        while *remaining > 0 {
            let (best_price, level_handle) = match self.bids.last_key_value() {
                Some((&p, &h)) if p >= limit => (p, h),
                _ => break,
            };
            self.fill_level(taker_id, level_handle, best_price, remaining);
            if self.levels.get(level_handle).is_empty() {
                self.bids.remove(&best_price);
                self.levels.release(level_handle);
            }
        }
    }

    /// Consume the level's FIFO from the front until the taker is done or
    /// the level drains.
    fn fill_level(
        &mut self,
        taker_id: u64,
        level_handle: LevelHandle,
        level_price: InternalPrice,
        remaining: &mut u64,
    ) {
        while *remaining > 0 {
            let Some(maker_handle) = self.levels.get(level_handle).front() else {
                break;
            };

            let (fill, maker_id, fulfilled) = {
                let maker = self.orders.get_mut(maker_handle);
                let fill = (*remaining).min(maker.remaining_volume);
                maker.fill(fill);
                (fill, maker.order_id, maker.is_fulfilled())
            };

            *remaining -= fill;
            self.levels.get_mut(level_handle).decrease_volume(fill);
            self.trades.push(Trade {
                taker_order_id: taker_id,
                maker_order_id: maker_id,
                price: level_price,
                volume: fill,
            });

            if fulfilled {
                self.levels.get_mut(level_handle).pop_front();
                self.index.remove(&maker_id);
                self.orders.release(maker_handle);
            }
        }
    }

    /// Rest the residual at the limit price: create the level on demand,
    /// enqueue at the FIFO tail, index the order.
    fn rest_order(
        &mut self,
        order_id: u64,
        agent_id: u64,
        side: Side,
        price: InternalPrice,
        initial: u64,
        remaining: u64,
    ) {
        let mut order = Order::new(order_id, agent_id, side, price, initial);
        order.remaining_volume = remaining;
        let handle = self.orders.acquire(order);

        let side_map = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let level_handle = match side_map.get(&price) {
            Some(&h) => h,
            None => {
                let h = self.levels.acquire(price);
                side_map.insert(price, h);
                h
            }
        };

        self.levels.get_mut(level_handle).push_back(handle, remaining);
        self.index.insert(order_id, handle);
    }

    /// Pool occupancy: (orders in use, order slots allocated, levels in
    /// use, level slots allocated). The allocated figures are high-water
    /// marks; a warmed-up book stops growing them.
    pub fn pool_usage(&self) -> (usize, usize, usize, usize) {
        (
            self.orders.in_use(),
            self.orders.allocated(),
            self.levels.in_use(),
            self.levels.allocated(),
        )
    }
}

impl Default for Book {
    fn default() -> Self {
        Self::new()
    }
}
