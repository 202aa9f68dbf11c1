//! Morph Types - type descriptors and type-pair registries.
//!
//! This crate holds the configuration-time half of the call-adaptation
//! engine: the runtime type model used to describe adapter and target
//! signatures, and the registry that maps adapter-facing types to
//! target-facing ones.
//!
//! # Architecture
//!
//! - `Ty`: runtime type descriptor with a canonical textual form
//! - `ReturnKind`: invocation shape of a return type
//! - `TypePairRegistry`: immutable source -> destination substitutions,
//!   built through `TypePairRegistryBuilder`
//! - `ShapeDeclaration`: serde-loadable form of a shape's pairs and policy
//! - `ConfigurationError`: everything that can be wrong with a declaration

mod declaration;
mod error;
mod name;
mod registry;
mod return_kind;
mod ty;

pub use declaration::{PairDeclaration, ShapeDeclaration};
pub use error::ConfigurationError;
pub use name::Name;
pub use registry::{
    PairOptions, TypePair, TypePairRegistry, TypePairRegistryBuilder, UnmappedPolicy,
};
pub use return_kind::ReturnKind;
pub use ty::{write_list, ContainerKind, Ty, TyParseError};
