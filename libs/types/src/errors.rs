//! Wire-level error taxonomy
//!
//! Errors here never escape the ingress boundary: malformed datagrams are
//! counted and dropped, not propagated.

use thiserror::Error;

/// Errors raised while decoding an ingress datagram.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketError {
    #[error("bad datagram length: expected 56 bytes, got {got}")]
    BadLength { got: usize },

    #[error("unknown event type discriminator: {0}")]
    UnknownEventType(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_length_display() {
        let err = PacketError::BadLength { got: 12 };
        assert_eq!(err.to_string(), "bad datagram length: expected 56 bytes, got 12");
    }

    #[test]
    fn test_unknown_event_type_display() {
        let err = PacketError::UnknownEventType(3);
        assert!(err.to_string().contains('3'));
    }
}
