//! Errors raised while an adapter shape is being declared or resolved.

use thiserror::Error;

use crate::{Name, Ty};

/// An invalid shape configuration.
///
/// Produced while type pairs are registered, while a target dispatch table is
/// built, or (under the strict unmapped policy) the first time a method whose
/// signature mentions an undeclared type is resolved.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A source type is already mapped to a different destination.
    #[error("type `{ty}` is already mapped to `{existing}`; cannot also map it to `{attempted}`")]
    ConflictingPair {
        /// The source type being registered.
        ty: Ty,
        /// The destination it is already mapped to.
        existing: Ty,
        /// The destination that was rejected.
        attempted: Ty,
    },

    /// A by-reference type was used as a pair endpoint.
    ///
    /// Lookups unwrap by-reference types before consulting the registry, so
    /// such a pair could never match.
    #[error("by-reference type `{ty}` cannot be a type pair endpoint; register its element type")]
    ByRefEndpoint { ty: Ty },

    /// Strict mode found a type with neither a pair nor a passthrough declaration.
    #[error("type `{ty}` has no type pair and is not declared as passthrough")]
    UnmappedType { ty: Ty },

    /// Two target methods share a name and exact parameter list.
    #[error("target type `{target_type}` declares `{signature}` more than once")]
    DuplicateTargetMethod { target_type: Name, signature: String },
}
