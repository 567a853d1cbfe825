//! Fixed-capacity blocking ring buffer.

use std::num::NonZeroUsize;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Circular slot array. Slots outside the occupied range hold `None`.
struct Ring<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    count: usize,
    high_water: usize,
}

impl<T> Ring<T> {
    fn new(capacity: NonZeroUsize) -> Self {
        Self {
            slots: (0..capacity.get()).map(|_| None).collect(),
            head: 0,
            tail: 0,
            count: 0,
            high_water: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn push(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            return Err(item);
        }
        debug_assert!(self.slots[self.head].is_none());
        self.slots[self.head] = Some(item);
        self.head = (self.head + 1) % self.capacity();
        self.count += 1;
        self.high_water = self.high_water.max(self.count);
        Ok(())
    }

    fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let item = self.slots[self.tail].take();
        debug_assert!(item.is_some());
        self.tail = (self.tail + 1) % self.capacity();
        self.count -= 1;
        item
    }
}

struct Inner<T, L> {
    ring: Ring<T>,
    ledger: L,
}

/// A bounded FIFO shared between producer and consumer threads.
///
/// One mutex guards the slot array, the occupancy counters and an optional
/// ledger value `L`. Two condition variables, both paired with that mutex,
/// signal "became non-full" and "became non-empty".
///
/// [`put`](Self::put) and [`get`](Self::get) are the plain blocking
/// operations. Callers that need to make decisions from the ledger and the
/// buffer state together use [`lock`](Self::lock), which returns a
/// [`BufferGuard`] holding the mutex.
///
/// # Example
///
/// ```
/// use std::num::NonZeroUsize;
/// use prodcons::BoundedBuffer;
///
/// let buffer: BoundedBuffer<u32> = BoundedBuffer::new(NonZeroUsize::new(2).unwrap());
/// buffer.put(1);
/// buffer.put(2);
/// assert!(buffer.is_full());
/// assert_eq!(buffer.get(), 1);
/// assert_eq!(buffer.get(), 2);
/// ```
pub struct BoundedBuffer<T, L = ()> {
    inner: Mutex<Inner<T, L>>,
    not_full: Condvar,
    not_empty: Condvar,
}

impl<T> BoundedBuffer<T> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self::with_ledger(capacity, ())
    }
}

impl<T, L> BoundedBuffer<T, L> {
    /// Creates a buffer whose mutex also protects `ledger`.
    pub fn with_ledger(capacity: NonZeroUsize, ledger: L) -> Self {
        Self {
            inner: Mutex::new(Inner {
                ring: Ring::new(capacity),
                ledger,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        }
    }

    /// Acquires the buffer mutex.
    ///
    /// A poisoned mutex is recovered: the ring is only mutated through
    /// methods that leave it consistent, and the panicking thread is
    /// reported when it is joined.
    pub fn lock(&self) -> BufferGuard<'_, T, L> {
        BufferGuard {
            buffer: self,
            inner: self.inner.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Stores `item`, blocking while the buffer is full.
    pub fn put(&self, item: T) {
        let mut guard = self.lock().wait_for_space(|_| false);
        if guard.push(item).is_err() {
            unreachable!("wait_for_space returned with a full buffer");
        }
    }

    /// Removes the oldest item, blocking while the buffer is empty.
    pub fn get(&self) -> T {
        let mut guard = self.lock().wait_for_item(|_| false);
        match guard.pop() {
            Some(item) => item,
            None => unreachable!("wait_for_item returned with an empty buffer"),
        }
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.lock().is_full()
    }

    /// Highest occupancy observed since creation.
    pub fn high_water(&self) -> usize {
        self.lock().high_water()
    }
}

/// Exclusive access to a [`BoundedBuffer`] and its ledger.
///
/// The mutex is released when the guard is dropped and while blocked in
/// [`wait_for_space`](Self::wait_for_space) or
/// [`wait_for_item`](Self::wait_for_item).
pub struct BufferGuard<'a, T, L> {
    buffer: &'a BoundedBuffer<T, L>,
    inner: MutexGuard<'a, Inner<T, L>>,
}

impl<T, L> BufferGuard<'_, T, L> {
    pub fn capacity(&self) -> usize {
        self.inner.ring.capacity()
    }

    pub fn len(&self) -> usize {
        self.inner.ring.count
    }

    pub fn is_empty(&self) -> bool {
        self.inner.ring.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.ring.is_full()
    }

    pub fn high_water(&self) -> usize {
        self.inner.ring.high_water
    }

    pub fn ledger(&self) -> &L {
        &self.inner.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.inner.ledger
    }

    /// Stores `item` at the write position and wakes one waiter on
    /// "non-empty". Hands the item back when the buffer is full.
    pub fn push(&mut self, item: T) -> Result<(), T> {
        self.inner.ring.push(item)?;
        self.buffer.not_empty.notify_one();
        Ok(())
    }

    /// Removes the item at the read position and wakes one waiter on
    /// "non-full". Returns `None` when the buffer is empty.
    pub fn pop(&mut self) -> Option<T> {
        let item = self.inner.ring.pop()?;
        self.buffer.not_full.notify_one();
        Some(item)
    }

    /// Blocks while the buffer is full and `stop(ledger)` is false.
    ///
    /// The predicate is re-evaluated after every wake-up, so on return either
    /// a slot is free or `stop` holds.
    pub fn wait_for_space(self, stop: impl Fn(&L) -> bool) -> Self {
        let Self { buffer, mut inner } = self;
        while inner.ring.is_full() && !stop(&inner.ledger) {
            inner = buffer
                .not_full
                .wait(inner)
                .unwrap_or_else(PoisonError::into_inner);
        }
        Self { buffer, inner }
    }

    /// Blocks while the buffer is empty and `stop(ledger)` is false.
    ///
    /// On return either an item is available or `stop` holds.
    pub fn wait_for_item(self, stop: impl Fn(&L) -> bool) -> Self {
        let Self { buffer, mut inner } = self;
        while inner.ring.is_empty() && !stop(&inner.ledger) {
            inner = buffer
                .not_empty
                .wait(inner)
                .unwrap_or_else(PoisonError::into_inner);
        }
        Self { buffer, inner }
    }

    /// Wakes every thread blocked on either condition.
    pub fn wake_all(&self) {
        self.buffer.not_full.notify_all();
        self.buffer.not_empty.notify_all();
    }
}
