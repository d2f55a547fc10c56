//! Error types for queries, invocations and registrations.

use thiserror::Error;

use super::object_name::ObjectNameError;
use super::registry::RegistryError;
use super::value::ParamKind;

/// Why a step of attribute resolution failed.
#[derive(Debug, Error)]
pub enum ResolutionFailure {
    #[error(transparent)]
    MalformedName(#[from] ObjectNameError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("`{segment}` is not a structured value")]
    NotStructured { segment: String },
    #[error("no field `{field}` under `{parent}`")]
    MissingField { parent: String, field: String },
}

/// Error type for the query and invoke paths.
///
/// Each variant is a distinct failure the caller can match on.
#[derive(Debug, Error)]
pub enum ManagementError {
    /// The object could not be addressed or the attribute path did not resolve.
    #[error("cannot resolve `{path}` on `{object}`: {reason}")]
    Resolution {
        object: String,
        path: String,
        #[source]
        reason: ResolutionFailure,
    },
    /// No declared operation has this name.
    #[error("`{object}` has no operation named `{operation}`")]
    OperationNotFound { object: String, operation: String },
    /// Operations with this name exist, but none takes this many arguments.
    #[error("`{operation}` takes {declared:?} arguments, {given} given")]
    ArgumentCountMismatch {
        operation: String,
        declared: Vec<usize>,
        given: usize,
    },
    /// The argument list is not of the form `[v1,v2,...]`.
    #[error("malformed argument list `{literal}`")]
    MalformedArguments { literal: String },
    /// A token could not be read as the declared parameter kind.
    #[error("argument {index} of `{operation}` (`{token}`) is not a valid {kind}")]
    ArgumentCoercion {
        operation: String,
        index: usize,
        kind: ParamKind,
        token: String,
    },
    /// The operation was selected and called, and the call failed.
    #[error("invoking `{operation}` failed: {source}")]
    Invocation {
        operation: String,
        #[source]
        source: RegistryError,
    },
}

/// Why a registration or unregistration did not happen.
///
/// The registration manager logs these; callers only see an absent handle.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    MalformedName(#[from] ObjectNameError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
