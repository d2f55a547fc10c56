//! Dotted attribute path resolution.

use tracing::debug;

use super::error::{ManagementError, ResolutionFailure};
use super::object_name::ObjectName;
use super::Management;

impl Management {
    /// Read an attribute, descending into structured values along a dotted path.
    ///
    /// `HeapMemoryUsage` reads a top-level attribute; `HeapMemoryUsage.used`
    /// reads the `used` field of that attribute's structured value, and so on
    /// for deeper paths. Returns `Ok(None)` when the final value is null.
    pub fn query(&self, object: &str, path: &str) -> Result<Option<String>, ManagementError> {
        debug!(%object, %path, "query");
        let fail = |reason: ResolutionFailure| ManagementError::Resolution {
            object: object.to_string(),
            path: path.to_string(),
            reason,
        };

        let name: ObjectName = object.parse().map_err(|e| fail(ResolutionFailure::from(e)))?;
        let registry = self.locator.locate();

        let instance = registry
            .object_instance(&name)
            .map_err(|e| fail(ResolutionFailure::from(e)))?;
        debug!(type_name = %instance.type_name, "found object");

        let (attribute, mut rest) = split_first(path);
        let mut value = registry
            .attribute(&name, attribute)
            .map_err(|e| fail(ResolutionFailure::from(e)))?;
        let mut parent = attribute;

        while let Some(remaining) = rest {
            let (field, next) = split_first(remaining);
            let structured = value.as_structured().ok_or_else(|| {
                fail(ResolutionFailure::NotStructured {
                    segment: parent.to_string(),
                })
            })?;
            value = structured.field(field).cloned().ok_or_else(|| {
                fail(ResolutionFailure::MissingField {
                    parent: parent.to_string(),
                    field: field.to_string(),
                })
            })?;
            parent = field;
            rest = next;
        }

        Ok(value.into_text())
    }
}

/// Split on the first dot: `a.b.c` becomes `("a", Some("b.c"))`.
fn split_first(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((head, tail)) => (head, Some(tail)),
        None => (path, None),
    }
}
