//! QuantumFlow engine binary
//!
//! Wires the ring, the ingress endpoint, and the tick loop together.
//! Configuration comes from an optional JSON file (first argument) with
//! `QF_SYMBOLS` / `QF_SOCKET` environment overrides on top.

use std::sync::atomic::AtomicBool;

use anyhow::Context;
use tracing::{error, info};

use pipeline::ring::packet_ring;
use pipeline::{Engine, EngineConfig};

fn load_config() -> Result<EngineConfig, anyhow::Error> {
    let mut config = match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file {path}"))?;
            serde_json::from_str::<EngineConfig>(&raw)
                .with_context(|| format!("parsing config file {path}"))?
        }
        None => EngineConfig::default(),
    };

    if let Ok(symbols) = std::env::var("QF_SYMBOLS") {
        config.symbols = symbols
            .split(',')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Ok(socket) = std::env::var("QF_SOCKET") {
        config.socket_path = if socket.is_empty() {
            None
        } else {
            Some(socket.into())
        };
    }

    Ok(config)
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    let config = load_config()?;
    info!(
        symbols = ?config.symbols,
        socket = ?config.socket_path,
        "starting QuantumFlow engine"
    );

    // The producer handle is the in-process seam; embedders hand it to
    // their feed thread. This binary ingests over the socket, so the
    // handle idles here and the ring stays empty.
    let (_producer, consumer) = packet_ring();

    let mut engine = Engine::new(config, consumer);
    if let Err(err) = engine.bind_ingress() {
        // The ring path still works without the endpoint.
        error!(%err, "ingress endpoint unavailable, continuing on ring only");
    }

    let shutdown = AtomicBool::new(false);
    engine.run(&shutdown);

    Ok(())
}
