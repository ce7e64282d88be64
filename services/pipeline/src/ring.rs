//! Bounded wait-free SPSC ring
//!
//! The only cross-thread seam in the pipeline. One producer thread pushes
//! packets, the consumer loop pops them; both sides are wait-free and the
//! hot path never allocates.
//!
//! The ring is created once and split into a [`RingProducer`] and a
//! [`RingConsumer`]. Neither handle is cloneable, so the
//! single-producer/single-consumer contract is enforced by the type
//! system rather than by documentation.
//!
//! One slot is always left open as the full/empty discriminator: a ring
//! with `N` slots holds at most `N − 1` packets. Head and tail live on
//! separate cache lines from each other and from the payload array.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use types::packet::MarketDataPacket;

/// Default ring capacity in slots (usable capacity is one less).
pub const RING_CAPACITY: usize = 4096;

/// Producer handle for the packet ring at the default capacity.
pub type PacketRingProducer = RingProducer<MarketDataPacket, RING_CAPACITY>;
/// Consumer handle for the packet ring at the default capacity.
pub type PacketRingConsumer = RingConsumer<MarketDataPacket, RING_CAPACITY>;

/// Monotonic traffic counters, readable from either handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RingCounters {
    pub push_count: u64,
    pub pop_count: u64,
    pub drop_count: u64,
}

#[repr(align(64))]
struct CacheAligned<T>(T);

struct Shared<T, const N: usize> {
    /// Consumer index; owned by the consumer, published with Release.
    head: CacheAligned<AtomicUsize>,
    /// Producer index; owned by the producer, published with Release.
    tail: CacheAligned<AtomicUsize>,
    push_count: AtomicU64,
    pop_count: AtomicU64,
    drop_count: AtomicU64,
    slots: Box<[UnsafeCell<MaybeUninit<T>>]>,
}

// The producer writes only the slot at `tail` before publishing it and the
// consumer reads only the slot at `head` before releasing it, so the two
// threads never touch a slot concurrently.
unsafe impl<T: Send, const N: usize> Send for Shared<T, N> {}
unsafe impl<T: Send, const N: usize> Sync for Shared<T, N> {}

impl<T, const N: usize> Shared<T, N> {
    fn len(&self) -> usize {
        let tail = self.tail.0.load(Ordering::Acquire);
        let head = self.head.0.load(Ordering::Acquire);
        tail.wrapping_sub(head) & (N - 1)
    }

    fn counters(&self) -> RingCounters {
        RingCounters {
            push_count: self.push_count.load(Ordering::Relaxed),
            pop_count: self.pop_count.load(Ordering::Relaxed),
            drop_count: self.drop_count.load(Ordering::Relaxed),
        }
    }
}

impl<T, const N: usize> Drop for Shared<T, N> {
    fn drop(&mut self) {
        // Both handles are gone; drain whatever is still initialized.
        let mut head = self.head.0.load(Ordering::Relaxed);
        let tail = self.tail.0.load(Ordering::Relaxed);
        while head != tail {
            unsafe { (*self.slots[head].get()).assume_init_drop() };
            head = (head + 1) & (N - 1);
        }
    }
}

/// Create a ring and split it into its two handles.
pub fn spsc_ring<T: Send, const N: usize>() -> (RingProducer<T, N>, RingConsumer<T, N>) {
    assert!(N.is_power_of_two(), "ring capacity must be a power of two");
    assert!(N >= 2, "ring needs at least one usable slot");

    let slots: Box<[UnsafeCell<MaybeUninit<T>>]> = (0..N)
        .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
        .collect();

    let shared = Arc::new(Shared::<T, N> {
        head: CacheAligned(AtomicUsize::new(0)),
        tail: CacheAligned(AtomicUsize::new(0)),
        push_count: AtomicU64::new(0),
        pop_count: AtomicU64::new(0),
        drop_count: AtomicU64::new(0),
        slots,
    });

    (
        RingProducer {
            shared: Arc::clone(&shared),
        },
        RingConsumer { shared },
    )
}

/// Create the packet ring at the default capacity.
pub fn packet_ring() -> (PacketRingProducer, PacketRingConsumer) {
    spsc_ring::<MarketDataPacket, RING_CAPACITY>()
}

/// Write half of the ring. Exactly one exists per ring.
pub struct RingProducer<T, const N: usize = RING_CAPACITY> {
    shared: Arc<Shared<T, N>>,
}

impl<T: Send, const N: usize> RingProducer<T, N> {
    /// Push a value if a slot is free.
    ///
    /// On success the new tail is published with Release and `push_count`
    /// increments; a full ring increments `drop_count` and returns false.
    /// Retrying is the producer's decision.
    pub fn try_push(&self, value: T) -> bool {
        let shared = &*self.shared;
        let tail = shared.tail.0.load(Ordering::Relaxed);
        let head = shared.head.0.load(Ordering::Acquire);

        let next = (tail + 1) & (N - 1);
        if next == head {
            shared.drop_count.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        unsafe { (*shared.slots[tail].get()).write(value) };
        shared.tail.0.store(next, Ordering::Release);
        shared.push_count.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Advisory occupancy; racy under concurrent use.
    pub fn len(&self) -> usize {
        self.shared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn counters(&self) -> RingCounters {
        self.shared.counters()
    }
}

/// Read half of the ring. Exactly one exists per ring.
pub struct RingConsumer<T, const N: usize = RING_CAPACITY> {
    shared: Arc<Shared<T, N>>,
}

impl<T: Send, const N: usize> RingConsumer<T, N> {
    /// Pop the oldest value, if any.
    ///
    /// Pairs an Acquire load of the producer's tail with a Release store
    /// of the new head; `pop_count` increments on success.
    pub fn try_pop(&self) -> Option<T> {
        let shared = &*self.shared;
        let head = shared.head.0.load(Ordering::Relaxed);
        let tail = shared.tail.0.load(Ordering::Acquire);

        if head == tail {
            return None;
        }

        let value = unsafe { (*shared.slots[head].get()).assume_init_read() };
        shared.head.0.store((head + 1) & (N - 1), Ordering::Release);
        shared.pop_count.fetch_add(1, Ordering::Relaxed);
        Some(value)
    }

    /// Advisory occupancy; racy under concurrent use.
    pub fn len(&self) -> usize {
        self.shared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn counters(&self) -> RingCounters {
        self.shared.counters()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::packet::{EventKind, Side};

    fn make_packet(symbol: &str, price: f64, quantity: u64) -> MarketDataPacket {
        MarketDataPacket::new(symbol, Side::Buy, EventKind::BookLevel, price, quantity, 12345, 0)
    }

    #[test]
    fn test_push_pop() {
        let (producer, consumer) = packet_ring();

        assert!(producer.try_push(make_packet("BTC-USDT", 43000.5, 100)));
        assert_eq!(producer.counters().push_count, 1);
        assert_eq!(producer.len(), 1);

        let out = consumer.try_pop().unwrap();
        assert_eq!(out.symbol_str(), "BTC-USDT");
        assert_eq!(out.price, 43000.5);
        assert_eq!(out.quantity, 100);
        assert_eq!(consumer.counters().pop_count, 1);
        assert!(consumer.is_empty());
    }

    #[test]
    fn test_pop_empty() {
        let (_producer, consumer) = packet_ring();
        assert!(consumer.try_pop().is_none());
        assert_eq!(consumer.counters().pop_count, 0);
    }

    #[test]
    fn test_fifo_order() {
        let (producer, consumer) = spsc_ring::<u64, 16>();
        for i in 0..10u64 {
            assert!(producer.try_push(i));
        }
        for i in 0..10u64 {
            assert_eq!(consumer.try_pop(), Some(i));
        }
    }

    #[test]
    fn test_full_ring_drops() {
        let (producer, consumer) = packet_ring();

        // One slot stays open: capacity − 1 pushes succeed.
        for i in 0..(RING_CAPACITY - 1) {
            assert!(producer.try_push(make_packet("X", 1.0, i as u64)));
        }
        assert!(!producer.try_push(make_packet("X", 1.0, 9999)));
        assert_eq!(producer.counters().drop_count, 1);

        // Freeing one slot lets the next push through.
        assert!(consumer.try_pop().is_some());
        assert!(producer.try_push(make_packet("X", 1.0, 9999)));
    }

    #[test]
    fn test_counter_conservation() {
        let (producer, consumer) = spsc_ring::<u64, 64>();
        for i in 0..40u64 {
            producer.try_push(i);
        }
        for _ in 0..15 {
            consumer.try_pop();
        }

        let counters = consumer.counters();
        assert_eq!(counters.push_count, 40);
        assert_eq!(counters.pop_count, 15);
        assert_eq!(counters.push_count, counters.pop_count + consumer.len() as u64);
    }

    #[test]
    fn test_wraparound() {
        let (producer, consumer) = spsc_ring::<u64, 8>();
        // Cycle several times past the physical end of the buffer.
        for round in 0..5u64 {
            for i in 0..7u64 {
                assert!(producer.try_push(round * 100 + i));
            }
            for i in 0..7u64 {
                assert_eq!(consumer.try_pop(), Some(round * 100 + i));
            }
        }
    }

    #[test]
    fn test_spsc_stress() {
        const COUNT: u64 = 100_000;
        let (producer, consumer) = packet_ring();

        let producer_thread = std::thread::spawn(move || {
            for i in 0..COUNT {
                let pkt = make_packet("STRESS", i as f64, i);
                while !producer.try_push(pkt) {
                    std::thread::yield_now();
                }
            }
            producer.counters()
        });

        let consumer_thread = std::thread::spawn(move || {
            let mut received = 0u64;
            while received < COUNT {
                if let Some(pkt) = consumer.try_pop() {
                    // FIFO across the seam: quantities arrive in push order.
                    assert_eq!(pkt.quantity, received);
                    received += 1;
                } else {
                    std::thread::yield_now();
                }
            }
            consumer.counters()
        });

        let produced = producer_thread.join().unwrap();
        let consumed = consumer_thread.join().unwrap();

        assert_eq!(produced.push_count, COUNT);
        assert_eq!(consumed.pop_count, COUNT);
        // drop_count may be nonzero from full-ring retries; that is expected.
    }
}
