//! Operation invocation with textual arguments.
//!
//! Operations are selected by case-insensitive name and by argument count;
//! each textual argument is then converted to the declared parameter kind.

use tracing::debug;

use super::error::{ManagementError, ResolutionFailure};
use super::object_name::ObjectName;
use super::registry::OperationInfo;
use super::value::Value;
use super::Management;

impl Management {
    /// Invoke an operation and return its result as text.
    ///
    /// `args` is a bracketed, comma-separated literal such as `[5,true]`;
    /// `[]` passes no arguments.
    pub fn invoke(
        &self,
        object: &str,
        operation: &str,
        args: &str,
    ) -> Result<String, ManagementError> {
        debug!(%object, %operation, %args, "invoke");
        let tokens = parse_arguments(args)?;

        let name: ObjectName = object.parse().map_err(|e| ManagementError::Resolution {
            object: object.to_string(),
            path: operation.to_string(),
            reason: ResolutionFailure::MalformedName(e),
        })?;
        let registry = self.locator.locate();
        let declared = registry
            .operations(&name)
            .map_err(|e| ManagementError::Resolution {
                object: object.to_string(),
                path: operation.to_string(),
                reason: ResolutionFailure::Registry(e),
            })?;

        let selected = select_operation(object, operation, &declared, tokens.len())?;
        let values = coerce_arguments(selected, &tokens)?;

        let result = registry
            .invoke(&name, &selected.name, &selected.parameters, values)
            .map_err(|source| ManagementError::Invocation {
                operation: selected.name.clone(),
                source,
            })?;
        Ok(result.to_string())
    }
}

/// Split `[a,b,c]` into trimmed tokens.
fn parse_arguments(literal: &str) -> Result<Vec<&str>, ManagementError> {
    let inner = literal
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| ManagementError::MalformedArguments {
            literal: literal.to_string(),
        })?;

    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(inner.split(',').map(str::trim).collect())
}

/// Pick the first operation whose name matches and whose arity equals `given`.
fn select_operation<'a>(
    object: &str,
    operation: &str,
    declared: &'a [OperationInfo],
    given: usize,
) -> Result<&'a OperationInfo, ManagementError> {
    let candidates: Vec<&OperationInfo> = declared
        .iter()
        .filter(|info| info.name.eq_ignore_ascii_case(operation))
        .collect();

    if candidates.is_empty() {
        return Err(ManagementError::OperationNotFound {
            object: object.to_string(),
            operation: operation.to_string(),
        });
    }

    candidates
        .iter()
        .find(|info| info.arity() == given)
        .copied()
        .ok_or_else(|| ManagementError::ArgumentCountMismatch {
            operation: operation.to_string(),
            declared: candidates.iter().map(|info| info.arity()).collect(),
            given,
        })
}

fn coerce_arguments(
    selected: &OperationInfo,
    tokens: &[&str],
) -> Result<Vec<Value>, ManagementError> {
    selected
        .parameters
        .iter()
        .zip(tokens)
        .enumerate()
        .map(|(index, (kind, token))| {
            kind.coerce(token)
                .ok_or_else(|| ManagementError::ArgumentCoercion {
                    operation: selected.name.clone(),
                    index,
                    kind: *kind,
                    token: token.to_string(),
                })
        })
        .collect()
}
