//! Engine configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default filesystem path of the ingress socket.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/quantumflow_bridge.sock";

/// Tunables for the pipeline engine.
///
/// Deserializable so a deployment can ship a JSON file; every field has a
/// default matching the engine's shipped behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Symbols with a book created at startup. The first entry is the
    /// cold-start snapshot symbol until a packet arrives.
    pub symbols: Vec<String>,
    /// Ingress socket path; `None` disables the datagram endpoint and
    /// the engine runs on the ring alone.
    pub socket_path: Option<PathBuf>,
    /// Default price scale for symbols without a registry entry.
    pub default_price_scale: f64,
    /// Shared per-tick drain budget across ring and ingress.
    pub max_drain_per_tick: usize,
    /// Rolling trade window high-water mark.
    pub trade_buffer_cap: usize,
    /// Entries kept when the window is truncated.
    pub trade_buffer_keep: usize,
    /// Sleep after a tick that drained nothing, in microseconds.
    pub idle_sleep_us: u64,
    /// Log a stats line every this many ticks.
    pub stats_interval: u64,
    /// Order pool capacity for each book.
    pub pool_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            symbols: vec!["BTC-USDT-SWAP".to_string(), "ETH-USDT-SWAP".to_string()],
            socket_path: Some(PathBuf::from(DEFAULT_SOCKET_PATH)),
            default_price_scale: 100.0,
            max_drain_per_tick: 256,
            trade_buffer_cap: 1000,
            trade_buffer_keep: 500,
            idle_sleep_us: 100,
            stats_interval: 1000,
            pool_capacity: 4096,
        }
    }
}
