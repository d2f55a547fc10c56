//! Registering managed objects without surfacing failures.

use std::sync::Arc;

use tracing::{debug, warn};

use super::error::RegistrationError;
use super::object_name::ObjectName;
use super::registry::{ManagedObject, ObjectInstance};
use super::Management;

impl Management {
    /// Register `object` under `name` in the current registry.
    ///
    /// Failures are logged and reported as `None`.
    pub fn register(&self, object: Arc<dyn ManagedObject>, name: &str) -> Option<ObjectInstance> {
        match self.try_register(object, name) {
            Ok(instance) => Some(instance),
            Err(err) => {
                warn!(%name, error = %err, "unable to register managed object");
                None
            }
        }
    }

    /// Register `object` under `name`, returning the failure instead of logging it.
    pub fn try_register(
        &self,
        object: Arc<dyn ManagedObject>,
        name: &str,
    ) -> Result<ObjectInstance, RegistrationError> {
        let name: ObjectName = name.parse()?;
        let instance = self.locator.locate().register(object, name)?;
        Ok(instance)
    }

    /// Remove the object registered under `name`. Failures are logged.
    pub fn unregister(&self, name: &str) {
        match self.try_unregister(name) {
            Ok(()) => debug!(%name, "unregistered managed object"),
            Err(err) => warn!(%name, error = %err, "unable to unregister managed object"),
        }
    }

    /// Remove the object registered under `name`, returning any failure.
    pub fn try_unregister(&self, name: &str) -> Result<(), RegistrationError> {
        let name: ObjectName = name.parse()?;
        self.locator.locate().unregister(&name)?;
        Ok(())
    }
}
