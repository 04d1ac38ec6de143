#![forbid(unsafe_code)]

//! The shared event queue between the input thread and the main loop.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, PoisonError};

use weft_core::Event;

/// A blocking FIFO queue of events.
///
/// The input thread pushes, the main loop drains whole batches. Order is
/// strictly arrival order; nothing is coalesced or dropped. `wait_drain`
/// is also woken by [`EventQueue::close`] and [`EventQueue::notify`], so
/// a loop blocked on input can be told to re-check its quit flag.
#[derive(Debug, Default)]
pub struct EventQueue {
    inner: Mutex<Inner>,
    condvar: Condvar,
}

#[derive(Debug, Default)]
struct Inner {
    events: VecDeque<Event>,
    closed: bool,
    notified: bool,
}

impl EventQueue {
    /// Create an empty, open queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append one event and wake the consumer.
    ///
    /// Pushes to a closed queue are dropped.
    pub fn push(&self, event: Event) {
        let mut inner = self.lock();
        if inner.closed {
            return;
        }
        inner.events.push_back(event);
        drop(inner);
        self.condvar.notify_one();
    }

    /// Append a batch of events in order and wake the consumer.
    pub fn extend(&self, events: impl IntoIterator<Item = Event>) {
        let mut inner = self.lock();
        if inner.closed {
            return;
        }
        inner.events.extend(events);
        let nonempty = !inner.events.is_empty();
        drop(inner);
        if nonempty {
            self.condvar.notify_one();
        }
    }

    /// Close the queue. Further pushes are dropped; a blocked consumer
    /// wakes immediately.
    pub fn close(&self) {
        self.lock().closed = true;
        self.condvar.notify_all();
    }

    /// Whether the queue has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Wake a blocked consumer without enqueueing anything.
    ///
    /// Used by `exit` so the main loop re-checks its quit flag.
    pub fn notify(&self) {
        self.lock().notified = true;
        self.condvar.notify_all();
    }

    /// Block until at least one event arrives, the queue closes, or a
    /// notify fires; return everything pending, in arrival order.
    ///
    /// An empty batch means "woken without events": closed or notified.
    #[must_use]
    pub fn wait_drain(&self) -> Vec<Event> {
        let mut inner = self.lock();
        loop {
            if !inner.events.is_empty() || inner.closed || inner.notified {
                inner.notified = false;
                return inner.events.drain(..).collect();
            }
            inner = self
                .condvar
                .wait(inner)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Drain without blocking.
    #[must_use]
    pub fn try_drain(&self) -> Vec<Event> {
        let mut inner = self.lock();
        inner.notified = false;
        inner.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use weft_core::{Event, Key};

    #[test]
    fn drains_in_arrival_order() {
        let queue = EventQueue::new();
        queue.push(Event::character('a'));
        queue.push(Event::key(Key::Enter));
        queue.push(Event::character('b'));
        let batch = queue.wait_drain();
        assert_eq!(
            batch,
            vec![
                Event::character('a'),
                Event::key(Key::Enter),
                Event::character('b'),
            ]
        );
        assert!(queue.try_drain().is_empty());
    }

    #[test]
    fn close_wakes_a_blocked_consumer() {
        let queue = Arc::new(EventQueue::new());
        let consumer = {
            let queue = Arc::clone(&queue);
            std::thread::spawn(move || queue.wait_drain())
        };
        std::thread::sleep(Duration::from_millis(20));
        queue.close();
        let batch = consumer.join().expect("consumer thread");
        assert!(batch.is_empty());
        assert!(queue.is_closed());
    }

    #[test]
    fn notify_wakes_without_events() {
        let queue = Arc::new(EventQueue::new());
        let consumer = {
            let queue = Arc::clone(&queue);
            std::thread::spawn(move || queue.wait_drain())
        };
        std::thread::sleep(Duration::from_millis(20));
        queue.notify();
        let batch = consumer.join().expect("consumer thread");
        assert!(batch.is_empty());
        assert!(!queue.is_closed());
    }

    #[test]
    fn push_after_close_is_dropped() {
        let queue = EventQueue::new();
        queue.close();
        queue.push(Event::character('x'));
        assert!(queue.try_drain().is_empty());
    }

    #[test]
    fn cross_thread_batching_preserves_order() {
        let queue = Arc::new(EventQueue::new());
        let producer = {
            let queue = Arc::clone(&queue);
            std::thread::spawn(move || {
                for i in 0..100u64 {
                    queue.push(Event::Custom(i));
                }
                queue.close();
            })
        };

        let mut seen = Vec::new();
        loop {
            let batch = queue.wait_drain();
            if batch.is_empty() {
                break;
            }
            seen.extend(batch);
        }
        producer.join().expect("producer thread");

        let expected: Vec<Event> = (0..100).map(Event::Custom).collect();
        assert_eq!(seen, expected);
    }
}
