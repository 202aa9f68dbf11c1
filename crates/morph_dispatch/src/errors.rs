//! Errors raised while resolving or dispatching an adapter call.
//!
//! Resolution errors (`MethodNotFound`, `ReturnTypeMismatch`, `ByRefOnAsync`,
//! `Configuration`) describe a broken shape and recur on every call until the
//! shape is fixed. Everything else is specific to one invocation.

use morph_types::{ConfigurationError, Name, ReturnKind, Ty};
use thiserror::Error;

use crate::{Fault, MapperError};

/// Failure of a single adapter call.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// No target method has the adapter method's name and substituted
    /// parameter types.
    #[error(
        "no method `{signature}` on target type `{target_type}`{}",
        candidates_hint(.candidates)
    )]
    MethodNotFound {
        target_type: Name,
        /// The substituted signature that was searched for.
        signature: String,
        /// Same-name overloads the target does declare.
        candidates: Vec<String>,
    },

    /// Adapter and target return types imply different invocation shapes.
    #[error(
        "`{method}` returns `{adapter_return}` ({adapter_kind}) but the target returns \
         `{target_return}` ({target_kind})"
    )]
    ReturnTypeMismatch {
        method: String,
        adapter_kind: ReturnKind,
        adapter_return: Ty,
        target_kind: ReturnKind,
        target_return: Ty,
    },

    /// The target returned a null task handle.
    #[error("target method for `{method}` returned a null task")]
    NullAsyncResult { method: String },

    /// The value mapper failed; its error is carried unchanged.
    #[error(transparent)]
    Mapper(#[from] MapperError),

    /// The target method failed; its error is carried unchanged.
    #[error(transparent)]
    Target(Fault),

    #[error("`{method}` expects {expected} argument(s), got {found}")]
    ArityMismatch {
        method: String,
        expected: usize,
        found: usize,
    },

    /// By-reference parameters cannot be written back after an await.
    #[error("asynchronous method `{method}` has a by-reference parameter at position {position}")]
    ByRefOnAsync { method: String, position: usize },

    /// A target closure returned a handle that contradicts its declared
    /// return type.
    #[error("target method for `{method}` is declared to return a {expected} but produced {found}")]
    TargetContract {
        method: String,
        expected: ReturnKind,
        found: &'static str,
    },

    /// `Adapter::call` was used for an asynchronous method.
    #[error("`{method}` completes asynchronously; use `Adapter::invoke` or `Adapter::dispatch`")]
    RequiresAwait { method: String },
}

impl DispatchError {
    /// The target's own error, if the target method failed.
    pub fn target(&self) -> Option<&Fault> {
        match self {
            DispatchError::Target(fault) => Some(fault),
            _ => None,
        }
    }

    /// Recover the target's error, or give back `self`.
    pub fn into_target(self) -> Result<Fault, Self> {
        match self {
            DispatchError::Target(fault) => Ok(fault),
            other => Err(other),
        }
    }

    /// Whether the error comes from resolution rather than from one call.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            DispatchError::Configuration(_)
                | DispatchError::MethodNotFound { .. }
                | DispatchError::ReturnTypeMismatch { .. }
                | DispatchError::ByRefOnAsync { .. }
        )
    }
}

fn candidates_hint(candidates: &[String]) -> String {
    if candidates.is_empty() {
        String::new()
    } else {
        format!("; candidates: {}", candidates.join(", "))
    }
}
