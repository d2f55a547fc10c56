//! Core registry traits.

use std::collections::BTreeMap;
use std::error::Error;
use std::sync::Arc;

use thiserror::Error;

use super::object_name::ObjectName;
use super::value::{ParamKind, Value};

/// Boxed error raised by a managed object's own code.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Signature of an operation a managed object exposes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationInfo {
    pub name: String,
    pub parameters: Vec<ParamKind>,
}

impl OperationInfo {
    pub fn new(name: impl Into<String>, parameters: impl Into<Vec<ParamKind>>) -> Self {
        Self {
            name: name.into(),
            parameters: parameters.into(),
        }
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

/// A registered object, as reported by the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectInstance {
    pub name: ObjectName,
    pub type_name: String,
}

/// An introspectable unit of runtime state.
///
/// Implementations expose named attributes and operations. See
/// `DynamicObject` for a closure-based implementation.
pub trait ManagedObject: Send + Sync {
    /// Name of the implementing type, for diagnostics.
    fn type_name(&self) -> &str;

    /// Read an attribute; `None` when the object has no such attribute.
    fn attribute(&self, name: &str) -> Option<Value>;

    /// Every declared operation, in declaration order.
    fn operations(&self) -> Vec<OperationInfo>;

    /// Run the operation with the given exact name and signature.
    ///
    /// Arguments have already been converted to the declared kinds.
    fn invoke(
        &self,
        operation: &str,
        signature: &[ParamKind],
        args: Vec<Value>,
    ) -> Result<Value, BoxError>;
}

/// Error type for registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no object registered as {0}")]
    InstanceNotFound(ObjectName),
    #[error("{object} has no attribute `{attribute}`")]
    AttributeNotFound { object: ObjectName, attribute: String },
    #[error("{object} has no operation `{operation}` with that signature")]
    OperationNotFound { object: ObjectName, operation: String },
    #[error("{0} is already registered")]
    AlreadyRegistered(ObjectName),
    #[error("{0} is not registered")]
    NotRegistered(ObjectName),
    #[error("registry rejected the request: {0}")]
    Rejected(String),
    #[error("operation `{operation}` failed: {source}")]
    Invocation {
        operation: String,
        #[source]
        source: BoxError,
    },
    #[error("registry information unavailable: {0}")]
    Unavailable(String),
    #[error("registry lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

/// Trait for a managed-object registry.
///
/// Implementations might include:
/// - `InMemoryRegistry` - the in-process default
/// - adapters over a host runtime's own management service
pub trait Registry: Send + Sync {
    /// Look up a registered object.
    fn object_instance(&self, name: &ObjectName) -> Result<ObjectInstance, RegistryError>;

    /// Read one top-level attribute of an object.
    fn attribute(&self, name: &ObjectName, attribute: &str) -> Result<Value, RegistryError>;

    /// List the operations an object declares.
    fn operations(&self, name: &ObjectName) -> Result<Vec<OperationInfo>, RegistryError>;

    /// Invoke an operation selected by exact name and signature.
    fn invoke(
        &self,
        name: &ObjectName,
        operation: &str,
        signature: &[ParamKind],
        args: Vec<Value>,
    ) -> Result<Value, RegistryError>;

    /// Bind an object to a name.
    fn register(
        &self,
        object: Arc<dyn ManagedObject>,
        name: ObjectName,
    ) -> Result<ObjectInstance, RegistryError>;

    /// Remove the binding for a name.
    fn unregister(&self, name: &ObjectName) -> Result<(), RegistryError>;

    /// Snapshot of the runtime properties this registry's host exposes.
    ///
    /// Registry locators look for marker keys in here.
    fn runtime_properties(&self) -> Result<BTreeMap<String, String>, RegistryError>;
}
