//! Trapper - forwards data points to a monitoring collector.
//!
//! Producers hand items to a `Trapper` and return immediately; a single
//! background worker sends them to the collector in order.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐ ┌──────────┐ ┌──────────┐
//! │ producer │ │ producer │ │ schedule │   send() / every()
//! └────┬─────┘ └────┬─────┘ └────┬─────┘
//!      └────────────┼────────────┘
//!                   ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                DeliveryQueue (unbounded FIFO)               │
//! └─────────────────────────────────────────────────────────────┘
//!                   │ take()
//!                   ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │     SenderWorker: EnvelopeEncoder -> Transport -> Reply     │
//! │         one connection per item, failures logged            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use collector_bridge::{CollectorTrapper, Trapper, TrapperConfig};
//!
//! let trapper = CollectorTrapper::start(TrapperConfig::new("collector.internal", "web-01"))
//!     .unwrap();
//!
//! trapper.send("cpu.load", "0.42");
//!
//! // Sends whatever is still queued, then returns.
//! trapper.stop();
//! ```

mod codec;
mod error;
mod item;
mod queue;
mod schedule;
mod sender;
mod transport;

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::warn;

pub use codec::{Envelope, EnvelopeEncoder, Reply, REPLY_BUFFER_SIZE};
pub use error::{SendError, TrapperError};
pub use item::Item;
pub use queue::DeliveryQueue;
pub use sender::{SenderStats, SenderWorker, WorkerState};
pub use transport::{TcpTransport, Transport};

use crate::config::TrapperConfig;
use crate::management::Management;
use schedule::Schedule;
use sender::SharedState;

/// Trait for sending data points to a monitoring collector.
pub trait Trapper: Send + Sync {
    /// Queue a value for delivery. Never blocks and never fails.
    fn send(&self, key: &str, value: &str);

    /// Stop the trapper after delivering everything already queued.
    fn stop(&self);
}

/// A trapper that delivers through a background `SenderWorker`.
///
/// With a `Management` service attached it can also sample managed-object
/// attributes, once (`send_attribute`) or on a fixed interval (`every`).
pub struct CollectorTrapper {
    queue: DeliveryQueue,
    worker: Mutex<SenderWorker>,
    // Read without the worker lock, which `shutdown` holds while joining.
    state: SharedState,
    // `None` once the trapper has been stopped.
    schedules: Mutex<Option<Vec<Schedule>>>,
    management: Option<Management>,
}

impl CollectorTrapper {
    /// Validate `config` and start a worker that sends over TCP.
    pub fn start(config: TrapperConfig) -> Result<Self, TrapperError> {
        config.validate()?;
        let transport = TcpTransport::new(config.server.clone(), config.port)
            .with_connect_timeout(config.connect_timeout())
            .with_io_timeout(config.io_timeout());
        Self::with_transport(&config.host, transport)
    }

    /// Start a worker that reports as `host` and sends through `transport`.
    pub fn with_transport<T>(host: &str, transport: T) -> Result<Self, TrapperError>
    where
        T: Transport + 'static,
    {
        let queue = DeliveryQueue::new();
        let worker = SenderWorker::spawn(queue.clone(), EnvelopeEncoder::new(host), transport)?;
        Ok(Self {
            queue,
            state: worker.state_handle(),
            worker: Mutex::new(worker),
            schedules: Mutex::new(Some(Vec::new())),
            management: None,
        })
    }

    /// Attach the service used to sample attributes.
    pub fn with_management(mut self, management: Management) -> Self {
        self.management = Some(management);
        self
    }

    /// Read an attribute now and queue its value under `key`.
    ///
    /// A null attribute is queued without a value. Resolution failures are
    /// logged and nothing is queued.
    pub fn send_attribute(&self, key: &str, object: &str, attribute: &str) {
        match &self.management {
            Some(management) => sample(&self.queue, management, key, object, attribute),
            None => warn!(%key, "no management service attached, attribute not sent"),
        }
    }

    /// Sample an attribute every `interval` until the trapper stops.
    pub fn every(&self, interval: Duration, key: &str, object: &str, attribute: &str) {
        let Some(management) = self.management.clone() else {
            warn!(%key, "no management service attached, schedule ignored");
            return;
        };

        let mut guard = self.schedules();
        let Some(schedules) = guard.as_mut() else {
            warn!(%key, "trapper is stopped, schedule ignored");
            return;
        };

        let queue = self.queue.clone();
        let (key, object, attribute) =
            (key.to_string(), object.to_string(), attribute.to_string());
        let name = key.clone();
        let spawned = Schedule::spawn(&name, interval, move || {
            sample(&queue, &management, &key, &object, &attribute)
        });
        match spawned {
            Ok(schedule) => schedules.push(schedule),
            Err(err) => warn!(key = %name, error = %err, "unable to start schedule"),
        }
    }

    /// Items waiting to be sent.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Lifecycle state of the sender worker. Never waits for a shutdown in progress.
    pub fn state(&self) -> WorkerState {
        self.state.get()
    }

    /// Stop schedules, then the worker, and return the worker statistics.
    ///
    /// Later calls return empty statistics.
    pub fn shutdown(&self) -> SenderStats {
        // Schedules go first so the drain sees a queue nobody else feeds.
        let schedules = self.schedules().take().unwrap_or_default();
        for schedule in schedules {
            schedule.stop();
        }
        self.worker().stop()
    }

    fn worker(&self) -> MutexGuard<'_, SenderWorker> {
        self.worker.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn schedules(&self) -> MutexGuard<'_, Option<Vec<Schedule>>> {
        self.schedules.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Trapper for CollectorTrapper {
    fn send(&self, key: &str, value: &str) {
        self.queue.push(Item::new(key, value));
    }

    fn stop(&self) {
        self.shutdown();
    }
}

fn sample(
    queue: &DeliveryQueue,
    management: &Management,
    key: &str,
    object: &str,
    attribute: &str,
) {
    match management.query(object, attribute) {
        Ok(value) => queue.push(Item::from_option(key, value)),
        Err(err) => warn!(
            %key,
            %object,
            %attribute,
            error = %err,
            "unable to sample attribute"
        ),
    }
}
