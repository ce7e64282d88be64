//! The engine tick loop
//!
//! Single-threaded consumer of both ingress paths. Each tick drains the
//! ring and then the datagram endpoint under one shared budget, applies
//! every packet to its symbol's book, and evaluates the strategy set
//! against the active symbol's snapshot.
//!
//! Book-level packets (event type 0) are replayed as synthetic aggressive
//! limit orders with a fresh auto-id, which is the upstream protocol's
//! documented semantics. A level packet that crosses the spread therefore
//! executes trades, and repeated level packets at one price stack volume.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info, warn};
use types::clock::now_ns;
use types::packet::{EventKind, MarketDataPacket};
use types::price::PriceConverterRegistry;
use types::signal::StrategySignal;
use types::snapshot::BookSnapshot;
use types::trade::TradeInfo;

use orderbook::Book;
use strategy::strategies::default_set;
use strategy::StrategyEngine;

use crate::config::EngineConfig;
use crate::ingress::{Ingest, IngressEndpoint, IngressError};
use crate::ring::PacketRingConsumer;
use crate::stats::{EngineStats, IngressStats, LatencySample, RingStats};

/// The pipeline engine: books, strategies, and the tick loop.
pub struct Engine {
    config: EngineConfig,
    ring: PacketRingConsumer,
    ingress: Option<IngressEndpoint>,
    books: HashMap<String, Book>,
    converters: PriceConverterRegistry,
    recent_trades: HashMap<String, Vec<TradeInfo>>,
    strategies: StrategyEngine,
    /// Auto-id counter for synthetic orders derived from level packets.
    next_order_id: u64,
    /// Symbol of the last processed packet; snapshots target this book.
    active_symbol: String,
    last_snapshot: Option<BookSnapshot>,
    loop_count: u64,
    invalid_packets: u64,
    latency: LatencySample,
}

impl Engine {
    /// Build an engine around the ring's consumer handle, with the
    /// default strategy set and a book per configured symbol.
    pub fn new(config: EngineConfig, ring: PacketRingConsumer) -> Self {
        let mut books = HashMap::new();
        let mut recent_trades = HashMap::new();
        for symbol in &config.symbols {
            books.insert(symbol.clone(), Book::with_capacity(config.pool_capacity));
            recent_trades.insert(symbol.clone(), Vec::new());
        }

        let mut strategies = StrategyEngine::new();
        for strat in default_set() {
            strategies.add_strategy(strat);
        }

        let active_symbol = config.symbols.first().cloned().unwrap_or_default();
        let converters = PriceConverterRegistry::new(config.default_price_scale);

        info!(
            symbols = config.symbols.len(),
            strategies = strategies.strategy_count(),
            "engine initialized"
        );

        Self {
            config,
            ring,
            ingress: None,
            books,
            converters,
            recent_trades,
            strategies,
            next_order_id: 1,
            active_symbol,
            last_snapshot: None,
            loop_count: 0,
            invalid_packets: 0,
            latency: LatencySample::default(),
        }
    }

    /// Bind the configured ingress socket.
    ///
    /// A bind failure is fatal for the endpoint only; the caller decides
    /// whether to continue on the ring alone.
    pub fn bind_ingress(&mut self) -> Result<(), IngressError> {
        let Some(path) = self.config.socket_path.clone() else {
            debug!("no ingress socket configured");
            return Ok(());
        };
        self.ingress = Some(IngressEndpoint::bind(path)?);
        Ok(())
    }

    /// Per-symbol price scale override.
    pub fn set_price_scale(&mut self, symbol: &str, scale: f64) {
        self.converters.set_scale(symbol, scale);
    }

    /// Run one tick: drain, dispatch, snapshot, evaluate.
    ///
    /// Returns the number of datagrams/packets consumed this tick.
    pub fn tick(&mut self) -> usize {
        let tick_start = now_ns();
        let budget = self.config.max_drain_per_tick;
        let mut drained = 0usize;

        while drained < budget {
            match self.ring.try_pop() {
                Some(packet) => {
                    self.dispatch(packet);
                    drained += 1;
                }
                None => break,
            }
        }

        if let Some(mut ingress) = self.ingress.take() {
            while drained < budget {
                match ingress.poll() {
                    Ingest::Packet(packet) => {
                        self.dispatch(packet);
                        drained += 1;
                    }
                    // Malformed datagrams still consume drain budget.
                    Ingest::Bad => drained += 1,
                    Ingest::Idle => break,
                }
            }
            self.ingress = Some(ingress);
        }

        let match_end = now_ns();
        self.evaluate_strategies();
        let tick_end = now_ns();

        self.latency.match_us = (match_end.saturating_sub(tick_start)) as f64 / 1000.0;
        self.latency.strategy_eval_us = (tick_end.saturating_sub(match_end)) as f64 / 1000.0;
        self.latency.total_us = (tick_end.saturating_sub(tick_start)) as f64 / 1000.0;

        self.loop_count += 1;
        if self.config.stats_interval > 0 && self.loop_count % self.config.stats_interval == 0 {
            let ring = self.ring.counters();
            info!(
                loop_count = self.loop_count,
                pushed = ring.push_count,
                popped = ring.pop_count,
                dropped = ring.drop_count,
                drained,
                strategies = self.strategies.strategy_count(),
                "tick stats"
            );
        }

        drained
    }

    /// Drive ticks until the flag flips, sleeping briefly when idle.
    pub fn run(&mut self, shutdown: &AtomicBool) {
        info!("entering main loop, waiting for market data");
        while !shutdown.load(Ordering::Relaxed) {
            let drained = self.tick();
            if drained == 0 && self.config.idle_sleep_us > 0 {
                std::thread::sleep(Duration::from_micros(self.config.idle_sleep_us));
            }
        }
        self.shutdown();
    }

    /// Stop accepting ingress traffic and unlink the socket. Final
    /// counters stay readable through [`Engine::stats`].
    pub fn shutdown(&mut self) {
        self.ingress = None;
        let ring = self.ring.counters();
        info!(
            loop_count = self.loop_count,
            pushed = ring.push_count,
            popped = ring.pop_count,
            dropped = ring.drop_count,
            "engine shut down"
        );
    }

    fn dispatch(&mut self, packet: MarketDataPacket) {
        let symbol = packet.symbol_str();
        if symbol.is_empty() {
            self.invalid_packets += 1;
            debug!("dropping packet with empty symbol");
            return;
        }
        let symbol = symbol.to_string();

        if !self.books.contains_key(&symbol) {
            self.books
                .insert(symbol.clone(), Book::with_capacity(self.config.pool_capacity));
            self.recent_trades.insert(symbol.clone(), Vec::new());
            debug!(symbol = %symbol, "book auto-created for unknown symbol");
        }

        let arrival = now_ns();
        if packet.timestamp_ns <= arrival {
            self.latency.ingress_to_engine_us =
                (arrival - packet.timestamp_ns) as f64 / 1000.0;
        }

        self.active_symbol = symbol.clone();

        match packet.event_kind() {
            Ok(EventKind::BookLevel) => {
                let converter = *self.converters.get(&symbol);
                let price = converter.to_internal(packet.price);
                let order_id = self.next_order_id;
                self.next_order_id += 1;

                let book = self.books.get_mut(&symbol).expect("book just ensured");
                let fills =
                    book.place_order(order_id, 0, packet.side(), price, packet.quantity);

                if !fills.is_empty() {
                    let buffer = self
                        .recent_trades
                        .get_mut(&symbol)
                        .expect("trade buffer ensured with book");
                    for fill in fills {
                        let trade = TradeInfo::new(
                            converter.to_external(fill.price),
                            fill.volume,
                            packet.side(),
                            packet.timestamp_ns,
                        );
                        buffer.push(trade);
                        self.strategies.on_trade(&trade);
                    }
                }
            }
            Ok(EventKind::Trade) => {
                let trade = TradeInfo::new(
                    packet.price,
                    packet.quantity,
                    packet.side(),
                    packet.timestamp_ns,
                );
                self.recent_trades
                    .get_mut(&symbol)
                    .expect("trade buffer ensured with book")
                    .push(trade);
                self.strategies.on_trade(&trade);
            }
            Err(err) => {
                self.invalid_packets += 1;
                warn!(%err, symbol = %symbol, "dropping packet with unknown event type");
            }
        }
    }

    fn evaluate_strategies(&mut self) {
        if self.active_symbol.is_empty() {
            return;
        }
        let symbol = self.active_symbol.clone();

        let snapshot = match self.books.get(&symbol) {
            Some(book) => book.snapshot(&symbol, self.converters.get(&symbol), now_ns()),
            None => BookSnapshot::empty(&symbol),
        };

        let trades = self.recent_trades.entry(symbol).or_default();
        if trades.len() > self.config.trade_buffer_cap {
            let excess = trades.len() - self.config.trade_buffer_keep;
            trades.drain(..excess);
        }

        self.strategies.evaluate(&snapshot, trades);
        self.last_snapshot = Some(snapshot);
    }

    /// Latest signals per strategy name.
    pub fn signals(&self) -> &HashMap<String, StrategySignal> {
        self.strategies.all_signals()
    }

    /// Latest signal for one strategy.
    pub fn latest_signal(&self, strategy_name: &str) -> Option<&StrategySignal> {
        self.strategies.latest_signal(strategy_name)
    }

    /// Snapshot produced by the most recent tick, if any symbol was active.
    pub fn last_snapshot(&self) -> Option<&BookSnapshot> {
        self.last_snapshot.as_ref()
    }

    /// The rolling trade window for a symbol.
    pub fn recent_trades(&self, symbol: &str) -> &[TradeInfo] {
        self.recent_trades
            .get(symbol)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Read access to a symbol's book.
    pub fn book(&self, symbol: &str) -> Option<&Book> {
        self.books.get(symbol)
    }

    /// Aggregate counters and latency of the pipeline.
    pub fn stats(&self) -> EngineStats {
        let ring = self.ring.counters();
        EngineStats {
            loop_count: self.loop_count,
            ring: RingStats {
                push_count: ring.push_count,
                pop_count: ring.pop_count,
                drop_count: ring.drop_count,
            },
            ingress: self
                .ingress
                .as_ref()
                .map(|endpoint| IngressStats {
                    rx_count: endpoint.rx_count(),
                    bad_count: endpoint.bad_count(),
                })
                .unwrap_or_default(),
            invalid_packets: self.invalid_packets,
            books: self.books.len(),
            next_order_id: self.next_order_id,
            latency: self.latency,
        }
    }
}
