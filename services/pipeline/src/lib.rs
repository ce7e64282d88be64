//! QuantumFlow market-data pipeline
//!
//! Joins out-of-process producers to the order books and strategies:
//!
//! ```text
//! producer thread ──► SPSC ring ──┐
//!                                 ├──► engine tick ──► order book(s)
//! UDS datagrams  ──► ingress   ──┘         │
//!                                          ├──► rolling trade window
//!                                          └──► strategy engine ──► latest signals
//! ```
//!
//! The consumer side is strictly single-threaded: one tick drains the
//! ring and the ingress socket under a shared budget, applies each packet
//! to its symbol's book, then evaluates the strategy set against the
//! active symbol's snapshot. The only cross-thread seam is the ring.
//!
//! # Modules
//! - `ring`: bounded wait-free SPSC queue with split producer/consumer handles
//! - `ingress`: non-blocking Unix-datagram endpoint
//! - `engine`: the tick loop and per-symbol state
//! - `stats`: counters and latency surface for external consumers
//! - `config`: engine configuration

pub mod config;
pub mod engine;
pub mod ingress;
pub mod ring;
pub mod stats;

pub use config::EngineConfig;
pub use engine::Engine;
pub use ingress::IngressEndpoint;
pub use ring::{spsc_ring, RingConsumer, RingProducer};
