//! Price-time-priority limit order book
//!
//! A single-threaded matching engine per symbol. Incoming orders match
//! aggressively against the opposite side (FIFO within a price level),
//! and any residual rests on the book. Orders and levels live in
//! pre-allocated pools so steady-state matching performs no allocation.
//!
//! # Structure
//! - `order`: pooled order record and its status lifecycle
//! - `level`: one price level with its FIFO queue
//! - `arena`: slot pools with free-list reuse for orders and levels
//! - `book`: the matching engine and its observers

mod arena;
mod level;
mod order;

pub mod book;

pub use book::{Book, Trade};
pub use order::{Order, OrderStatus};
