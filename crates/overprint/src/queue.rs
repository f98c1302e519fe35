//! Multi-producer, single-consumer record queue.
//!
//! Producers call [`MessageQueue::enqueue`] from any thread; it never waits
//! on the consumer and never fails. The render worker is the only consumer.
//! The queue keeps its own receiver so that the channel stays connected for
//! the lifetime of the queue, and a `closed` flag drops late records once the
//! worker is gone.
//!
//! Producers do share one short critical section: sequence assignment, the
//! closed check and the channel send happen under a single lock. That is the
//! price for sequence order always equalling render order, and for a record
//! that got a sequence number never being stranded behind [`close`].
//!
//! [`close`]: MessageQueue::close

use std::sync::{Mutex, MutexGuard, PoisonError};

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};

use crate::record::LogRecord;

/// Unbounded FIFO of pending records.
#[derive(Debug)]
pub struct MessageQueue {
    tx: Sender<LogRecord>,
    rx: Receiver<LogRecord>,
    tail: Mutex<Tail>,
}

#[derive(Debug)]
struct Tail {
    next_sequence: u64,
    closed: bool,
}

impl MessageQueue {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx,
            rx,
            tail: Mutex::new(Tail {
                next_sequence: 1,
                closed: false,
            }),
        }
    }

    fn tail(&self) -> MutexGuard<'_, Tail> {
        self.tail.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a record to the tail and return its sequence number.
    ///
    /// Returns `None` when the queue has been closed; the record is dropped.
    pub fn enqueue(&self, record: LogRecord) -> Option<u64> {
        let mut tail = self.tail();
        if tail.closed {
            log::trace!(target: crate::logging::targets::QUEUE, "dropping record on closed queue");
            return None;
        }
        let sequence = tail.next_sequence;
        // The queue owns a receiver, so the channel cannot be disconnected here.
        self.tx.send(record.with_sequence(sequence)).ok()?;
        tail.next_sequence += 1;
        Some(sequence)
    }

    /// Pop the head without waiting.
    pub fn try_dequeue(&self) -> Option<LogRecord> {
        match self.rx.try_recv() {
            Ok(record) => Some(record),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Number of records waiting to be rendered. Advisory only.
    pub fn count(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Stop accepting records. Already queued records stay poppable.
    ///
    /// Waits for an in-flight enqueue to finish, so once this returns every
    /// accepted record is already in the channel.
    pub fn close(&self) {
        self.tail().closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.tail().closed
    }

    pub(crate) fn receiver(&self) -> &Receiver<LogRecord> {
        &self.rx
    }
}

impl Default for MessageQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Severity;
    use std::sync::Arc;
    use std::thread;

    fn record(text: &str) -> LogRecord {
        LogRecord::new(text, Severity::Info)
    }

    #[test]
    fn test_empty_queue() {
        let queue = MessageQueue::new();
        assert_eq!(queue.count(), 0);
        assert!(queue.is_empty());
        assert!(queue.try_dequeue().is_none());
    }

    #[test]
    fn test_fifo_order() {
        let queue = MessageQueue::new();
        queue.enqueue(record("first"));
        queue.enqueue(record("second"));
        queue.enqueue(record("third"));
        assert_eq!(queue.count(), 3);

        let texts: Vec<String> = std::iter::from_fn(|| queue.try_dequeue())
            .map(|r| r.text().to_string())
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(queue.count(), 0);
    }

    #[test]
    fn test_sequence_numbers_increase() {
        let queue = MessageQueue::new();
        let a = queue.enqueue(record("a")).unwrap();
        let b = queue.enqueue(record("b")).unwrap();
        assert!(b > a);
        assert_eq!(queue.try_dequeue().unwrap().sequence(), a);
        assert_eq!(queue.try_dequeue().unwrap().sequence(), b);
    }

    #[test]
    fn test_closed_queue_drops_records() {
        let queue = MessageQueue::new();
        queue.enqueue(record("kept"));
        queue.close();
        assert!(queue.is_closed());
        assert!(queue.enqueue(record("dropped")).is_none());
        assert_eq!(queue.count(), 1);
        assert_eq!(queue.try_dequeue().unwrap().text(), "kept");
    }

    #[test]
    fn test_close_never_strands_accepted_records() {
        for _ in 0..20 {
            let queue = Arc::new(MessageQueue::new());
            let handles: Vec<_> = (0..4)
                .map(|p| {
                    let queue = Arc::clone(&queue);
                    thread::spawn(move || {
                        (0..200)
                            .filter_map(|i| queue.enqueue(record(&format!("{p}:{i}"))))
                            .count()
                    })
                })
                .collect();
            thread::yield_now();
            queue.close();
            // Whatever was accepted before close() returned must be poppable now.
            let drained = std::iter::from_fn(|| queue.try_dequeue()).count();
            let accepted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

            assert_eq!(drained, accepted);
            assert!(queue.try_dequeue().is_none());
        }
    }

    #[test]
    fn test_concurrent_producers_keep_per_producer_order() {
        let queue = Arc::new(MessageQueue::new());
        let handles: Vec<_> = (0..4)
            .map(|p| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for i in 0..100 {
                        queue.enqueue(record(&format!("{p}:{i}")));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(queue.count(), 400);
        let mut last_seen = [None::<u32>; 4];
        let mut last_sequence = 0;
        while let Some(r) = queue.try_dequeue() {
            assert!(r.sequence() > last_sequence);
            last_sequence = r.sequence();
            let (p, i) = r.text().split_once(':').unwrap();
            let p: usize = p.parse().unwrap();
            let i: u32 = i.parse().unwrap();
            if let Some(prev) = last_seen[p] {
                assert!(i > prev);
            }
            last_seen[p] = Some(i);
        }
    }
}
