//! Closure-backed managed objects.
//!
//! A `DynamicObject` maps attribute names to getters and operation
//! signatures to handlers. Both are closures, registered with a builder.
//!
//! ## Example
//!
//! ```
//! use collector_bridge::management::{DynamicObject, ManagedObject, ParamKind, Value};
//! use std::sync::atomic::{AtomicI64, Ordering};
//! use std::sync::Arc;
//!
//! let hits = Arc::new(AtomicI64::new(0));
//! let reader = Arc::clone(&hits);
//! let writer = Arc::clone(&hits);
//!
//! let object = DynamicObject::new("HitCounter")
//!     .getter("Hits", move || Value::Long(reader.load(Ordering::Relaxed)))
//!     .operation("add", &[ParamKind::Long], move |args| {
//!         if let Value::Long(n) = args[0] {
//!             writer.fetch_add(n, Ordering::Relaxed);
//!         }
//!         Ok(Value::Null)
//!     });
//!
//! object.invoke("add", &[ParamKind::Long], vec![Value::Long(3)]).unwrap();
//! assert_eq!(object.attribute("Hits"), Some(Value::Long(3)));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use super::registry::{BoxError, ManagedObject, OperationInfo};
use super::value::{ParamKind, Value};

type Getter = Box<dyn Fn() -> Value + Send + Sync>;
type Handler = Box<dyn Fn(Vec<Value>) -> Result<Value, BoxError> + Send + Sync>;

/// A managed object assembled from closures.
pub struct DynamicObject {
    type_name: String,
    attributes: BTreeMap<String, Getter>,
    operations: Vec<(OperationInfo, Handler)>,
}

impl DynamicObject {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            attributes: BTreeMap::new(),
            operations: Vec::new(),
        }
    }

    /// Register an attribute getter. Uses builder pattern.
    pub fn getter<F>(mut self, name: &str, getter: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.attributes.insert(name.to_string(), Box::new(getter));
        self
    }

    /// Register an attribute that always has the same value.
    pub fn constant(self, name: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.getter(name, move || value.clone())
    }

    /// Register an operation. Overloads are distinct registrations with the
    /// same name and different signatures; declaration order is preserved.
    pub fn operation<F>(mut self, name: &str, signature: &[ParamKind], handler: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.operations
            .push((OperationInfo::new(name, signature), Box::new(handler)));
        self
    }

    /// Attribute names in sorted order.
    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.keys().map(String::as_str).collect()
    }
}

impl fmt::Debug for DynamicObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicObject")
            .field("type_name", &self.type_name)
            .field("attributes", &self.attribute_names())
            .field(
                "operations",
                &self.operations.iter().map(|(info, _)| info).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ManagedObject for DynamicObject {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes.get(name).map(|getter| getter())
    }

    fn operations(&self) -> Vec<OperationInfo> {
        self.operations.iter().map(|(info, _)| info.clone()).collect()
    }

    fn invoke(
        &self,
        operation: &str,
        signature: &[ParamKind],
        args: Vec<Value>,
    ) -> Result<Value, BoxError> {
        let (_, handler) = self
            .operations
            .iter()
            .find(|(info, _)| info.name == operation && info.parameters == signature)
            .ok_or_else(|| format!("no operation {}{:?}", operation, signature))?;
        handler(args)
    }
}
