//! Blocking bounded ring buffer for one producer and one consumer.
//!
//! The buffer is a classic monitor: a fixed circular slot array guarded by a
//! mutex, with one condition variable per direction. `put` blocks while the
//! buffer is full, `get` blocks while it is empty, and items are delivered in
//! FIFO order.

use std::sync::{Arc, Condvar, Mutex};

pub mod pipeline;

pub struct BufferConsumer<T> {
    inner: Arc<BoundedBuffer<T>>,
}

impl<T: Send> BufferConsumer<T> {
    /// Removes the oldest item, blocking while the buffer is empty.
    pub fn get(&self) -> T {
        self.inner.get()
    }
}

#[doc(hidden)]
impl<T> From<Arc<BoundedBuffer<T>>> for BufferConsumer<T> {
    fn from(inner: Arc<BoundedBuffer<T>>) -> Self {
        BufferConsumer { inner }
    }
}

pub struct BufferProducer<T> {
    inner: Arc<BoundedBuffer<T>>,
}

impl<T: Send> BufferProducer<T> {
    /// Appends an item, blocking while the buffer is full.
    pub fn put(&self, item: T) {
        self.inner.put(item)
    }
}

#[doc(hidden)]
impl<T> From<Arc<BoundedBuffer<T>>> for BufferProducer<T> {
    fn from(inner: Arc<BoundedBuffer<T>>) -> Self {
        BufferProducer { inner }
    }
}

/// Creates a buffer with room for `capacity - 1` items and returns its two
/// endpoints.
pub fn bounded<T: Send>(capacity: usize) -> (BufferProducer<T>, BufferConsumer<T>) {
    let buffer = Arc::new(BoundedBuffer::with_capacity(capacity));

    (buffer.clone().into(), buffer.into())
}

struct Slots<T> {
    slots: Box<[Option<T>]>,
    read_pos: usize,
    write_pos: usize,
}

impl<T> Slots<T> {
    fn is_empty(&self) -> bool {
        self.read_pos == self.write_pos
    }

    fn is_full(&self) -> bool {
        (self.write_pos + 1) % self.slots.len() == self.read_pos
    }

    fn len(&self) -> usize {
        let capacity = self.slots.len();
        (self.write_pos + capacity - self.read_pos) % capacity
    }
}

/// A fixed-capacity circular buffer with blocking `put` and `get`.
///
/// Empty is encoded as `read_pos == write_pos` and full as
/// `(write_pos + 1) % capacity == read_pos`, so one slot is sacrificed to
/// tell the two states apart: a buffer built with capacity C holds at most
/// C − 1 items.
///
/// Both positions are only touched while holding the mutex, and each wait
/// releases the lock until the opposite side signals, so no item is read
/// before it is written and none is overwritten before being read.
pub struct BoundedBuffer<T> {
    state: Mutex<Slots<T>>,
    not_empty: Condvar,
    not_full: Condvar,
}

impl<T: Send> BoundedBuffer<T> {
    /// Creates a buffer with `capacity` slots, of which `capacity - 1` are
    /// usable.
    ///
    /// # Panics
    ///
    /// Panics if `capacity < 2`, since a one-slot ring cannot hold anything.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity >= 2, "capacity must be at least 2");
        BoundedBuffer {
            state: Mutex::new(Slots {
                slots: (0..capacity).map(|_| None).collect(),
                read_pos: 0,
                write_pos: 0,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }

    /// Appends an item at the write position, blocking while the buffer is
    /// full.
    ///
    /// Exactly one future `get` returns the item, in FIFO order relative to
    /// every other `put`.
    pub fn put(&self, item: T) {
        // A poisoned lock means the other endpoint panicked mid-update;
        // the monitor's invariants are gone, so die with it.
        let mut state = self.state.lock().unwrap();
        while state.is_full() {
            state = self.not_full.wait(state).unwrap();
        }
        let write_pos = state.write_pos;
        state.slots[write_pos] = Some(item);
        state.write_pos = (write_pos + 1) % state.slots.len();
        // One consumer, so waking a single waiter is enough.
        self.not_empty.notify_one();
    }

    /// Removes and returns the oldest item, blocking while the buffer is
    /// empty.
    ///
    /// Blocks forever if no producer ever puts again; liveness is the
    /// producer's responsibility.
    pub fn get(&self) -> T {
        let mut state = self.state.lock().unwrap();
        while state.is_empty() {
            state = self.not_empty.wait(state).unwrap();
        }
        let read_pos = state.read_pos;
        let item = state.slots[read_pos]
            .take()
            .expect("non-empty buffer with vacant read slot");
        state.read_pos = (read_pos + 1) % state.slots.len();
        self.not_full.notify_one();
        item
    }

    /// Returns the number of queued items. A snapshot, stale as soon as the
    /// lock is released.
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().len()
    }

    /// Returns `true` if no items are queued.
    pub fn is_empty(&self) -> bool {
        self.state.lock().unwrap().is_empty()
    }
}
