//! Managed-object queries, invocations and registrations.
//!
//! This module bridges callers to a managed-object registry without static
//! knowledge of the objects' shapes:
//! - `Management::query` - resolve a dotted attribute path to text
//! - `Management::invoke` - call an operation with textual arguments
//! - `Management::register` / `unregister` - bind objects, failures logged
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Management (stateless)                     │
//! │     query(object, path) / invoke(object, op, [args])        │
//! └─────────────────────────────────────────────────────────────┘
//!                            │ locate() on every call
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     RegistryLocator                         │
//! │       FixedLocator  |  MarkerLocator (runtime markers)      │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌─────────────────┐   ┌──────────────────────────────────────┐
//! │InMemoryRegistry │   │ host-runtime registry adapters       │
//! │   (included)    │   │            (external)                │
//! └─────────────────┘   └──────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use collector_bridge::management::{
//!     CompositeValue, DynamicObject, InMemoryRegistry, Management, ParamKind, Value,
//! };
//! use std::sync::Arc;
//!
//! let management = Management::for_registry(Arc::new(InMemoryRegistry::new()));
//!
//! let memory = DynamicObject::new("Memory")
//!     .constant(
//!         "HeapMemoryUsage",
//!         CompositeValue::new("MemoryUsage").with("used", 1024i64),
//!     )
//!     .operation("gc", &[ParamKind::Bool], |_| Ok(Value::from("collected")));
//! management.register(Arc::new(memory), "runtime:type=Memory");
//!
//! assert_eq!(
//!     management.query("runtime:type=Memory", "HeapMemoryUsage.used").unwrap(),
//!     Some("1024".to_string())
//! );
//! assert_eq!(
//!     management.invoke("runtime:type=Memory", "GC", "[true]").unwrap(),
//!     "collected"
//! );
//! ```

mod dynamic;
mod error;
mod in_memory;
mod invoker;
mod locator;
mod object_name;
mod registration;
mod registry;
mod resolver;
mod value;

use std::sync::Arc;

pub use dynamic::DynamicObject;
pub use error::{ManagementError, RegistrationError, ResolutionFailure};
pub use in_memory::InMemoryRegistry;
pub use locator::{FixedLocator, MarkerLocator, RegistryLocator};
pub use object_name::{ObjectName, ObjectNameError};
pub use registry::{
    BoxError, ManagedObject, ObjectInstance, OperationInfo, Registry, RegistryError,
};
pub use value::{CompositeValue, ParamKind, Structured, Value};

/// Stateless query, invoke and registration service.
///
/// Holds only the locator; the registry is looked up on every call, so a
/// change in which registry applies is picked up immediately. Cloning is
/// cheap.
#[derive(Clone)]
pub struct Management {
    locator: Arc<dyn RegistryLocator>,
}

impl Management {
    /// Create a service that asks `locator` for a registry on every call.
    pub fn new(locator: impl RegistryLocator + 'static) -> Self {
        Self {
            locator: Arc::new(locator),
        }
    }

    /// Create a service bound to a single registry.
    pub fn for_registry(registry: Arc<dyn Registry>) -> Self {
        Self::new(FixedLocator::new(registry))
    }

    /// The registry the next call would use.
    pub fn registry(&self) -> Arc<dyn Registry> {
        self.locator.locate()
    }
}
