//! Ingress wire packet
//!
//! `MarketDataPacket` is the single datagram format accepted by the engine.
//! The layout is part of the external contract: 56 bytes, little-endian,
//! naturally aligned `#[repr(C)]`. Producers send one packet per datagram;
//! anything that is not exactly [`PACKET_SIZE`] bytes is rejected.

use serde::{Deserialize, Serialize};
use zerocopy::{AsBytes, FromBytes, FromZeroes};

use crate::errors::PacketError;

/// Wire size of a [`MarketDataPacket`] in bytes.
pub const PACKET_SIZE: usize = core::mem::size_of::<MarketDataPacket>();

/// Maximum symbol length on the wire (one byte reserved for NUL padding).
pub const MAX_SYMBOL_LEN: usize = 15;

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid), wire value 0
    Buy,
    /// Sell order (ask), wire value 1
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Wire encoding of this side
    pub fn to_wire(self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }

    /// Decode a wire byte; any nonzero value reads as sell, matching the
    /// producer bridge's `side == 0 ? 0 : 1` normalization.
    pub fn from_wire(raw: u8) -> Self {
        if raw == 0 {
            Side::Buy
        } else {
            Side::Sell
        }
    }
}

/// Packet event discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// Book-level update, wire value 0
    BookLevel,
    /// Trade print, wire value 1
    Trade,
}

impl EventKind {
    /// Wire encoding of this event kind
    pub fn to_wire(self) -> u8 {
        match self {
            EventKind::BookLevel => 0,
            EventKind::Trade => 1,
        }
    }

    /// Decode a wire byte
    pub fn from_wire(raw: u8) -> Result<Self, PacketError> {
        match raw {
            0 => Ok(EventKind::BookLevel),
            1 => Ok(EventKind::Trade),
            other => Err(PacketError::UnknownEventType(other)),
        }
    }
}

/// The 56-byte ingress datagram.
///
/// Field order and padding mirror the producer bridge exactly; the struct
/// casts to and from raw bytes without copying field by field.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, AsBytes)]
pub struct MarketDataPacket {
    /// NUL-padded ASCII symbol; an empty symbol marks the packet invalid.
    pub symbol: [u8; 16],
    /// 0 = buy, 1 = sell
    pub side: u8,
    /// 0 = book-level update, 1 = trade print
    pub event_type: u8,
    /// Must be zero on send.
    pub _padding: [u8; 6],
    /// Display-unit price.
    pub price: f64,
    /// For levels: the size placed at the level. For trades: print size.
    pub quantity: u64,
    /// Producer monotonic nanoseconds.
    pub timestamp_ns: u64,
    /// Optional producer order id; 0 when unused.
    pub order_id: u64,
}

// The wire contract is exactly 56 bytes with fields at their natural
// offsets; a drifted layout must fail the build, not the peer.
const _: () = assert!(PACKET_SIZE == 56);
const _: () = assert!(core::mem::align_of::<MarketDataPacket>() == 8);

impl MarketDataPacket {
    /// Build a packet from typed fields.
    ///
    /// The symbol is truncated to [`MAX_SYMBOL_LEN`] bytes and NUL-padded,
    /// the same normalization the producer bridge applies.
    pub fn new(
        symbol: &str,
        side: Side,
        event_type: EventKind,
        price: f64,
        quantity: u64,
        timestamp_ns: u64,
        order_id: u64,
    ) -> Self {
        let mut sym = [0u8; 16];
        let raw = symbol.as_bytes();
        let n = raw.len().min(MAX_SYMBOL_LEN);
        sym[..n].copy_from_slice(&raw[..n]);

        Self {
            symbol: sym,
            side: side.to_wire(),
            event_type: event_type.to_wire(),
            _padding: [0u8; 6],
            price,
            quantity,
            timestamp_ns,
            order_id,
        }
    }

    /// Decode a datagram payload.
    ///
    /// Accepts only exact-size datagrams; short, long, or split payloads
    /// are a [`PacketError::BadLength`].
    pub fn from_datagram(buf: &[u8]) -> Result<Self, PacketError> {
        // read_from demands an exact-length slice, which is precisely the
        // wire contract.
        Self::read_from(buf).ok_or(PacketError::BadLength { got: buf.len() })
    }

    /// Raw wire bytes of this packet.
    pub fn wire_bytes(&self) -> &[u8] {
        self.as_bytes()
    }

    /// Symbol as a string slice, stopping at the first NUL.
    ///
    /// Returns an empty string for non-UTF-8 garbage; callers treat empty
    /// symbols as invalid either way.
    pub fn symbol_str(&self) -> &str {
        let end = self
            .symbol
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.symbol.len());
        core::str::from_utf8(&self.symbol[..end]).unwrap_or("")
    }

    /// Typed side of this packet.
    pub fn side(&self) -> Side {
        Side::from_wire(self.side)
    }

    /// Typed event kind, if the discriminator is known.
    pub fn event_kind(&self) -> Result<EventKind, PacketError> {
        EventKind::from_wire(self.event_type)
    }
}
