//! Feed generator binary
//!
//! Drives a seeded packet stream at the engine's ingress socket:
//!
//! ```text
//! feedgen [socket_path] [count]
//! ```
//!
//! `QF_SOCKET`, `QF_COUNT`, `QF_SEED`, `QF_SYMBOLS`, and `QF_RATE`
//! (packets per second, 0 = unthrottled) override the defaults.

use std::time::Duration;

use anyhow::Context;
use tracing::info;

use feedgen::{FeedConfig, FeedGenerator, PacketSender};
use types::clock::now_ns;

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    let socket_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("QF_SOCKET").ok())
        .unwrap_or_else(|| "/tmp/quantumflow_bridge.sock".to_string());
    let count: u64 = std::env::args()
        .nth(2)
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| env_or("QF_COUNT", 10_000));
    let rate: u64 = env_or("QF_RATE", 1_000);
    let seed: u64 = env_or("QF_SEED", 42);

    let mut config = FeedConfig {
        seed,
        ..FeedConfig::default()
    };
    if let Ok(symbols) = std::env::var("QF_SYMBOLS") {
        config.symbols = symbols
            .split(',')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }

    info!(socket = %socket_path, count, rate, seed, "starting feed generator");

    let mut sender = PacketSender::connect(&socket_path)
        .with_context(|| format!("creating sender for {socket_path}"))?;
    let mut generator = FeedGenerator::new(config);

    let pause = if rate > 0 {
        Some(Duration::from_nanos(1_000_000_000 / rate))
    } else {
        None
    };

    for _ in 0..count {
        let packet = generator.next_packet(now_ns());
        sender.send_packet(&packet);
        if let Some(pause) = pause {
            std::thread::sleep(pause);
        }
    }

    info!(
        sent = sender.sent(),
        dropped = sender.dropped(),
        "feed generator finished"
    );
    Ok(())
}
