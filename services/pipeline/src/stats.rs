//! Counters and latency surface
//!
//! Aggregates the pipeline's observable state into one serializable
//! snapshot for whatever sits downstream (a fan-out process, a periodic
//! log line, a test). Nothing in here feeds back into the hot path.

use serde::Serialize;

/// Stage timings for the most recent tick, in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LatencySample {
    /// Producer timestamp → engine arrival for the latest packet.
    pub ingress_to_engine_us: f64,
    /// Drain + book update portion of the tick.
    pub match_us: f64,
    /// Strategy evaluation portion of the tick.
    pub strategy_eval_us: f64,
    /// Whole tick.
    pub total_us: f64,
}

/// Ring traffic as exported in stats.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RingStats {
    pub push_count: u64,
    pub pop_count: u64,
    pub drop_count: u64,
}

/// Ingress traffic as exported in stats.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct IngressStats {
    pub rx_count: u64,
    pub bad_count: u64,
}

/// One observable snapshot of the engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EngineStats {
    /// Ticks executed since start.
    pub loop_count: u64,
    /// Ring counters at snapshot time.
    pub ring: RingStats,
    /// Ingress counters at snapshot time; zero when no endpoint is bound.
    pub ingress: IngressStats,
    /// Packets dropped by the engine itself (empty symbol, unknown event).
    pub invalid_packets: u64,
    /// Symbols with a live book.
    pub books: usize,
    /// Next synthetic order id the dispatcher will assign.
    pub next_order_id: u64,
    /// Stage timings of the latest tick.
    pub latency: LatencySample,
}
