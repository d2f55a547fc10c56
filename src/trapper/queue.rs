//! Delivery queue between producers and the sender worker.
//!
//! This module provides an unbounded FIFO that any number of producer
//! threads push into and a single consumer drains:
//! - `push` never blocks on capacity and never drops an item
//! - `take` blocks until an item arrives or the queue is interrupted
//! - `try_take` is the non-blocking variant used by the shutdown drain

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use super::Item;

/// Unbounded, thread-safe FIFO of items awaiting delivery.
///
/// Features:
/// - Thread-safe (can be shared across threads via `Clone`)
/// - Insertion order is delivery order
/// - The blocking wait can be interrupted once, permanently, by `interrupt()`
///
/// ## Example
///
/// ```
/// use collector_bridge::trapper::{DeliveryQueue, Item};
///
/// let queue = DeliveryQueue::new();
/// queue.push(Item::new("cpu.load", "0.42"));
/// queue.push(Item::new("cpu.idle", "0.58"));
///
/// assert_eq!(queue.take().unwrap().key(), "cpu.load");
///
/// // After an interrupt the blocking take gives up, the rest is drained.
/// queue.interrupt();
/// assert!(queue.take().is_none());
/// assert_eq!(queue.try_take().unwrap().key(), "cpu.idle");
/// assert!(queue.try_take().is_none());
/// ```
#[derive(Clone, Default)]
pub struct DeliveryQueue {
    shared: Arc<Shared>,
}

#[derive(Default)]
struct Shared {
    state: Mutex<State>,
    available: Condvar,
}

#[derive(Default)]
struct State {
    items: VecDeque<Item>,
    interrupted: bool,
}

impl DeliveryQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item and wake the consumer.
    pub fn push(&self, item: Item) {
        let mut state = self.lock();
        state.items.push_back(item);
        drop(state);
        self.shared.available.notify_one();
    }

    /// Remove the oldest item, waiting for one to arrive.
    ///
    /// Returns `None` once the queue has been interrupted, even if items are
    /// still present; those are left for `try_take`.
    pub fn take(&self) -> Option<Item> {
        let mut state = self.lock();
        loop {
            if state.interrupted {
                return None;
            }
            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }
            state = self
                .shared
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Remove the oldest item without waiting.
    pub fn try_take(&self) -> Option<Item> {
        self.lock().items.pop_front()
    }

    /// Stop all current and future blocking waits.
    pub fn interrupt(&self) {
        self.lock().interrupted = true;
        self.shared.available.notify_all();
    }

    /// Whether `interrupt` has been called.
    pub fn is_interrupted(&self) -> bool {
        self.lock().interrupted
    }

    /// Number of items waiting for delivery.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    // A panicking producer must not make later pushes fail.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
