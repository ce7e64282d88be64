//! Nanosecond timestamp helper

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in nanoseconds since the Unix epoch.
///
/// Signals, snapshots, and latency samples all stamp with this so the
/// timestamps in the output surface are mutually comparable.
pub fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ns_monotonic_enough() {
        let a = now_ns();
        let b = now_ns();
        assert!(b >= a);
        // Sanity: after 2020 in nanoseconds.
        assert!(a > 1_577_836_800_000_000_000);
    }
}
