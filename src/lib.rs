//! Forward a process's managed-object state to a monitoring collector.
//!
//! Two independent paths share this crate:
//! - [`trapper`] - producers queue key/value items that one background
//!   worker sends to the collector, one connection per item
//! - [`management`] - synchronous attribute queries, operation invocation
//!   and object registration against a pluggable registry

mod config;
pub mod management;
pub mod trapper;

pub use config::{ConfigError, TrapperConfig, DEFAULT_PORT};
pub use management::{
    CompositeValue, DynamicObject, InMemoryRegistry, ManagedObject, Management, ManagementError,
    MarkerLocator, ObjectName, ParamKind, Registry, RegistryLocator, Value,
};
pub use trapper::{CollectorTrapper, Item, SenderStats, Trapper, TrapperError, WorkerState};
