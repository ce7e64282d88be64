//! Slot pools for orders and levels
//!
//! Both pools hand out index handles into a slot vector and recycle slots
//! through a free list. Released level slots keep their FIFO buffers, so a
//! book that has warmed up stops allocating entirely.

use types::price::InternalPrice;

use crate::level::Level;
use crate::order::Order;

/// Index handle into the order pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct OrderHandle(u32);

impl OrderHandle {
    pub(crate) fn new(raw: u32) -> Self {
        Self(raw)
    }
}

/// Index handle into the level pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct LevelHandle(u32);

/// Pool of order slots with free-list reuse.
#[derive(Debug)]
pub(crate) struct OrderPool {
    slots: Vec<Order>,
    free: Vec<OrderHandle>,
}

impl OrderPool {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn acquire(&mut self, order: Order) -> OrderHandle {
        match self.free.pop() {
            Some(handle) => {
                self.slots[handle.0 as usize] = order;
                handle
            }
            None => {
                let handle = OrderHandle::new(self.slots.len() as u32);
                self.slots.push(order);
                handle
            }
        }
    }

    pub(crate) fn release(&mut self, handle: OrderHandle) {
        self.free.push(handle);
    }

    pub(crate) fn get(&self, handle: OrderHandle) -> &Order {
        &self.slots[handle.0 as usize]
    }

    pub(crate) fn get_mut(&mut self, handle: OrderHandle) -> &mut Order {
        &mut self.slots[handle.0 as usize]
    }

    /// Slots currently holding a live order.
    pub(crate) fn in_use(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// High-water mark of allocated slots.
    pub(crate) fn allocated(&self) -> usize {
        self.slots.len()
    }
}

/// Pool of level slots with free-list reuse.
#[derive(Debug)]
pub(crate) struct LevelPool {
    slots: Vec<Level>,
    free: Vec<LevelHandle>,
}

impl LevelPool {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn acquire(&mut self, price: InternalPrice) -> LevelHandle {
        match self.free.pop() {
            Some(handle) => {
                self.slots[handle.0 as usize].reset(price);
                handle
            }
            None => {
                let handle = LevelHandle(self.slots.len() as u32);
                self.slots.push(Level::new(price));
                handle
            }
        }
    }

    pub(crate) fn release(&mut self, handle: LevelHandle) {
        self.free.push(handle);
    }

    pub(crate) fn get(&self, handle: LevelHandle) -> &Level {
        &self.slots[handle.0 as usize]
    }

    pub(crate) fn get_mut(&mut self, handle: LevelHandle) -> &mut Level {
        &mut self.slots[handle.0 as usize]
    }

    pub(crate) fn in_use(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn allocated(&self) -> usize {
        self.slots.len()
    }
}
