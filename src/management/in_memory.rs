//! In-process managed-object registry.
//!
//! `InMemoryRegistry` is the default registry: a table of named objects
//! shared across threads, plus a snapshot of runtime properties that
//! registry locators inspect.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use super::object_name::ObjectName;
use super::registry::{ManagedObject, ObjectInstance, OperationInfo, Registry, RegistryError};
use super::value::{ParamKind, Value};

/// Thread-safe in-memory registry.
///
/// Cloning creates another handle to the same table.
///
/// ## Example
///
/// ```
/// use collector_bridge::management::{DynamicObject, InMemoryRegistry, Registry};
/// use std::sync::Arc;
///
/// let registry = InMemoryRegistry::new();
/// let name = "app:type=Cache".parse().unwrap();
/// registry
///     .register(Arc::new(DynamicObject::new("Cache").constant("Size", 12i64)), name)
///     .unwrap();
///
/// let name = "app:type=Cache".parse().unwrap();
/// assert_eq!(registry.attribute(&name, "Size").unwrap().to_string(), "12");
/// ```
#[derive(Clone, Default)]
pub struct InMemoryRegistry {
    objects: Arc<RwLock<HashMap<ObjectName, Arc<dyn ManagedObject>>>>,
    properties: Arc<RwLock<BTreeMap<String, String>>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a runtime property. Uses builder pattern.
    pub fn with_property(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_property(key, value);
        self
    }

    /// Add or replace a runtime property on a shared registry.
    pub fn set_property(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut properties = self
            .properties
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        properties.insert(key.into(), value.into());
    }

    /// Names of every registered object, sorted.
    pub fn names(&self) -> Result<Vec<ObjectName>, RegistryError> {
        let objects = self
            .objects
            .read()
            .map_err(|_| RegistryError::LockPoisoned("names"))?;
        let mut names: Vec<ObjectName> = objects.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.objects.read().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, name: &ObjectName) -> Result<Arc<dyn ManagedObject>, RegistryError> {
        let objects = self
            .objects
            .read()
            .map_err(|_| RegistryError::LockPoisoned("lookup"))?;
        objects
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::InstanceNotFound(name.clone()))
    }
}

impl Registry for InMemoryRegistry {
    fn object_instance(&self, name: &ObjectName) -> Result<ObjectInstance, RegistryError> {
        let object = self.lookup(name)?;
        Ok(ObjectInstance {
            name: name.clone(),
            type_name: object.type_name().to_string(),
        })
    }

    fn attribute(&self, name: &ObjectName, attribute: &str) -> Result<Value, RegistryError> {
        // The read lock is released before the getter runs.
        let object = self.lookup(name)?;
        object
            .attribute(attribute)
            .ok_or_else(|| RegistryError::AttributeNotFound {
                object: name.clone(),
                attribute: attribute.to_string(),
            })
    }

    fn operations(&self, name: &ObjectName) -> Result<Vec<OperationInfo>, RegistryError> {
        Ok(self.lookup(name)?.operations())
    }

    fn invoke(
        &self,
        name: &ObjectName,
        operation: &str,
        signature: &[ParamKind],
        args: Vec<Value>,
    ) -> Result<Value, RegistryError> {
        let object = self.lookup(name)?;

        let declared = object
            .operations()
            .iter()
            .any(|info| info.name == operation && info.parameters == signature);
        if !declared {
            return Err(RegistryError::OperationNotFound {
                object: name.clone(),
                operation: operation.to_string(),
            });
        }

        let well_typed = args.len() == signature.len()
            && signature.iter().zip(&args).all(|(kind, arg)| kind.accepts(arg));
        if !well_typed {
            return Err(RegistryError::Rejected(format!(
                "arguments do not match the signature of {}",
                operation
            )));
        }

        object
            .invoke(operation, signature, args)
            .map_err(|source| RegistryError::Invocation {
                operation: operation.to_string(),
                source,
            })
    }

    fn register(
        &self,
        object: Arc<dyn ManagedObject>,
        name: ObjectName,
    ) -> Result<ObjectInstance, RegistryError> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| RegistryError::LockPoisoned("register"))?;
        if objects.contains_key(&name) {
            return Err(RegistryError::AlreadyRegistered(name));
        }

        let instance = ObjectInstance {
            name: name.clone(),
            type_name: object.type_name().to_string(),
        };
        objects.insert(name, object);
        debug!(name = %instance.name, type_name = %instance.type_name, "registered");
        Ok(instance)
    }

    fn unregister(&self, name: &ObjectName) -> Result<(), RegistryError> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| RegistryError::LockPoisoned("unregister"))?;
        objects
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| RegistryError::NotRegistered(name.clone()))
    }

    fn runtime_properties(&self) -> Result<BTreeMap<String, String>, RegistryError> {
        let properties = self
            .properties
            .read()
            .map_err(|_| RegistryError::LockPoisoned("runtime properties"))?;
        Ok(properties.clone())
    }
}
