//! Background sender worker.
//!
//! This module provides the single thread that drains the delivery queue
//! and forwards every item to the collector, one connection per item.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::{debug, info, warn};

use super::codec::EnvelopeEncoder;
use super::queue::DeliveryQueue;
use super::transport::Transport;
use super::Item;

/// Lifecycle of the sender worker. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkerState {
    /// Blocking on the queue and sending items as they arrive.
    Running,
    /// A stop was requested; the blocking wait is being interrupted.
    Stopping,
    /// Flushing items that were queued before the stop, without waiting.
    Draining,
    /// The queue was observed empty and the thread has exited.
    Terminated,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkerState::Running => "running",
            WorkerState::Stopping => "stopping",
            WorkerState::Draining => "draining",
            WorkerState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Statistics from the sender worker.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SenderStats {
    /// Envelopes that reached the collector and got any reply.
    pub sent: usize,
    /// Replies that were exactly `OK`.
    pub acknowledged: usize,
    /// Replies that were anything else.
    pub rejected: usize,
    /// Items that could not be delivered at all.
    pub failed: usize,
}

/// Shared view of a worker's lifecycle state, readable without the worker.
#[derive(Clone)]
pub(crate) struct SharedState(Arc<Mutex<WorkerState>>);

impl SharedState {
    pub(crate) fn get(&self) -> WorkerState {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move forward to `next`; never moves backward.
    fn advance(&self, next: WorkerState) -> bool {
        let mut state = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if *state < next {
            *state = next;
            true
        } else {
            false
        }
    }
}

/// A background thread that sends queued items to the collector.
///
/// ## Example
///
/// ```no_run
/// use collector_bridge::trapper::{
///     DeliveryQueue, EnvelopeEncoder, Item, SenderWorker, TcpTransport,
/// };
///
/// let queue = DeliveryQueue::new();
/// let mut worker = SenderWorker::spawn(
///     queue.clone(),
///     EnvelopeEncoder::new("web-01"),
///     TcpTransport::new("collector.example.com", 10051),
/// )
/// .unwrap();
///
/// queue.push(Item::new("cpu.load", "0.42"));
///
/// // Stop the worker; everything still queued is sent first.
/// let stats = worker.stop();
/// println!("sent {} items", stats.sent);
/// ```
pub struct SenderWorker {
    queue: DeliveryQueue,
    state: SharedState,
    handle: Option<JoinHandle<SenderStats>>,
}

impl SenderWorker {
    /// Spawn the worker thread.
    ///
    /// The thread inherits the caller's current `tracing` dispatcher so its
    /// logs land wherever the caller's do.
    pub fn spawn<T>(
        queue: DeliveryQueue,
        encoder: EnvelopeEncoder,
        transport: T,
    ) -> std::io::Result<Self>
    where
        T: Transport + 'static,
    {
        let state = SharedState(Arc::new(Mutex::new(WorkerState::Running)));
        let dispatch = tracing::dispatcher::get_default(|current| current.clone());

        let delivery = Delivery {
            queue: queue.clone(),
            encoder,
            transport,
            state: state.clone(),
        };
        let handle = thread::Builder::new()
            .name("collector-sender".to_string())
            .spawn(move || tracing::dispatcher::with_default(&dispatch, || delivery.run()))?;

        Ok(Self {
            queue,
            state,
            handle: Some(handle),
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WorkerState {
        self.state.get()
    }

    /// A handle that keeps reporting the state while `stop` is joining.
    pub(crate) fn state_handle(&self) -> SharedState {
        self.state.clone()
    }

    /// Signal the worker to stop without waiting for the drain.
    pub fn signal_stop(&self) {
        if self.state.advance(WorkerState::Stopping) {
            debug!("sender worker stop requested");
        }
        self.queue.interrupt();
    }

    /// Signal the worker to stop, wait for it to drain the queue and exit.
    /// Returns the worker statistics; later calls return empty statistics.
    pub fn stop(&mut self) -> SenderStats {
        self.signal_stop();
        match self.handle.take() {
            Some(handle) => handle.join().unwrap_or_else(|_| {
                warn!("sender worker panicked");
                SenderStats::default()
            }),
            None => SenderStats::default(),
        }
    }
}

impl Drop for SenderWorker {
    fn drop(&mut self) {
        // Let the thread drain and finish on its own.
        self.queue.interrupt();
    }
}

struct Delivery<T> {
    queue: DeliveryQueue,
    encoder: EnvelopeEncoder,
    transport: T,
    state: SharedState,
}

impl<T: Transport> Delivery<T> {
    fn run(self) -> SenderStats {
        let destination = self.transport.destination();
        info!(%destination, "sender worker started");

        let mut stats = SenderStats::default();

        // `take` only yields `None` once the queue was interrupted by a stop,
        // which is the normal way out of this loop.
        while let Some(item) = self.queue.take() {
            self.deliver(&item, &mut stats);
        }

        self.state.advance(WorkerState::Stopping);
        self.state.advance(WorkerState::Draining);
        let mut drained = 0usize;
        while let Some(item) = self.queue.try_take() {
            self.deliver(&item, &mut stats);
            drained += 1;
        }
        self.state.advance(WorkerState::Terminated);

        info!(
            %destination,
            drained,
            sent = stats.sent,
            rejected = stats.rejected,
            failed = stats.failed,
            "sender worker terminated"
        );
        stats
    }

    fn deliver(&self, item: &Item, stats: &mut SenderStats) {
        let start = Instant::now();
        let envelope = self.encoder.encode(item);
        debug!(%envelope, "sending");

        match self.transport.transmit(&envelope) {
            Ok(reply) => {
                debug!(%reply, "received");
                stats.sent += 1;
                if reply.is_ack() {
                    stats.acknowledged += 1;
                } else {
                    stats.rejected += 1;
                    warn!(
                        key = item.key(),
                        response = %reply,
                        "received unexpected response"
                    );
                }
            }
            Err(err) => {
                stats.failed += 1;
                warn!(key = item.key(), error = %err, "ignoring failed send");
            }
        }

        debug!(
            key = item.key(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "send finished"
        );
    }
}
