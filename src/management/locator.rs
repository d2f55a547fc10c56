//! Choosing which registry serves the current runtime.

use std::sync::Arc;

use tracing::debug;

use super::registry::Registry;

/// Trait for picking the registry a query runs against.
///
/// Called once per query; implementations must not cache a choice that can
/// change while the process runs.
pub trait RegistryLocator: Send + Sync {
    fn locate(&self) -> Arc<dyn Registry>;
}

/// Always returns the same registry.
#[derive(Clone)]
pub struct FixedLocator {
    registry: Arc<dyn Registry>,
}

impl FixedLocator {
    pub fn new(registry: Arc<dyn Registry>) -> Self {
        Self { registry }
    }
}

impl RegistryLocator for FixedLocator {
    fn locate(&self) -> Arc<dyn Registry> {
        Arc::clone(&self.registry)
    }
}

/// Returns an alternate registry when the default one advertises a marker.
///
/// A marker is a runtime property key. Alternates are checked in the order
/// they were added; the first one whose key is present in the default
/// registry's `runtime_properties()` wins. If reading the properties fails,
/// every marker counts as absent.
///
/// ## Example
///
/// ```
/// use collector_bridge::management::{
///     InMemoryRegistry, MarkerLocator, Registry, RegistryLocator,
/// };
/// use std::sync::Arc;
///
/// let platform = InMemoryRegistry::new().with_property("container.home", "/srv");
/// let container: Arc<dyn Registry> = Arc::new(InMemoryRegistry::new());
///
/// let locator = MarkerLocator::new(Arc::new(platform))
///     .with_alternate("container.home", Arc::clone(&container));
///
/// assert!(Arc::ptr_eq(&locator.locate(), &container));
/// ```
#[derive(Clone)]
pub struct MarkerLocator {
    default: Arc<dyn Registry>,
    alternates: Vec<(String, Arc<dyn Registry>)>,
}

impl MarkerLocator {
    pub fn new(default: Arc<dyn Registry>) -> Self {
        Self {
            default,
            alternates: Vec::new(),
        }
    }

    /// Use `registry` whenever `marker` is a runtime property of the default.
    pub fn with_alternate(mut self, marker: impl Into<String>, registry: Arc<dyn Registry>) -> Self {
        self.alternates.push((marker.into(), registry));
        self
    }
}

impl RegistryLocator for MarkerLocator {
    fn locate(&self) -> Arc<dyn Registry> {
        if self.alternates.is_empty() {
            return Arc::clone(&self.default);
        }

        let properties = match self.default.runtime_properties() {
            Ok(properties) => properties,
            Err(err) => {
                debug!(error = %err, "runtime properties unavailable, using default registry");
                return Arc::clone(&self.default);
            }
        };

        for (marker, registry) in &self.alternates {
            if properties.contains_key(marker) {
                debug!(%marker, "marker present, using alternate registry");
                return Arc::clone(registry);
            }
        }
        Arc::clone(&self.default)
    }
}
