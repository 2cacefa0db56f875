//! Producer and consumer tasks over a bounded buffer.
//!
//! The producer emits a bounded run of integers and always terminates the
//! stream with [`STREAM_END`], whether it ran to completion or was cancelled.
//! The consumer drains until it sees the sentinel; it has no cancellation
//! check of its own, so shutdown always flows through the buffer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::{bounded, BufferConsumer, BufferProducer};

/// In-band end-of-stream marker. Occupies a real slot like any data item, so
/// enqueueing it can block on a full buffer.
pub const STREAM_END: i32 = -1;

/// Shared stop request, observed by the producer between items.
///
/// Advisory only: a blocked `put` completes before the flag is re-checked,
/// so cancellation truncates the stream within a bounded but unspecified
/// delay rather than immediately.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the producer stop emitting data items.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Emits `0..count` into the buffer, checking the cancellation flag before
/// each item, then enqueues [`STREAM_END`] exactly once.
///
/// The sentinel is sent on every exit path, so the consumer always receives
/// a terminating signal even when the run is cut short. Returns the number
/// of data items actually emitted.
pub fn produce(producer: &BufferProducer<i32>, count: i32, cancel: &CancelFlag) -> i32 {
    let mut emitted = 0;
    for n in 0..count {
        if cancel.is_cancelled() {
            break;
        }
        producer.put(n);
        emitted += 1;
    }
    producer.put(STREAM_END);
    emitted
}

/// Drains the buffer, passing each data item to `sink`, until the sentinel
/// is observed. The sentinel itself is not passed on.
pub fn consume<F>(consumer: &BufferConsumer<i32>, mut sink: F)
where
    F: FnMut(i32),
{
    loop {
        let value = consumer.get();
        if value == STREAM_END {
            break;
        }
        sink(value);
    }
}

/// Runs a complete producer/consumer pipeline: creates the buffer, spawns
/// both threads, and joins them. Returns the number of data items emitted.
///
/// A panic on either thread is propagated; a failed synchronization
/// primitive leaves nothing to recover.
pub fn run<F>(capacity: usize, count: i32, cancel: CancelFlag, sink: F) -> i32
where
    F: FnMut(i32) + Send + 'static,
{
    let (producer, consumer) = bounded(capacity);

    let producer = thread::spawn(move || produce(&producer, count, &cancel));
    let consumer = thread::spawn(move || consume(&consumer, sink));

    let emitted = producer.join().unwrap();
    consumer.join().unwrap();
    emitted
}
