//! Registry of declared type substitutions.
//!
//! A `TypePairRegistry` answers one question for the method resolver: which
//! target-facing type stands in for a given adapter-facing type. It is built
//! once per adapter shape through `TypePairRegistryBuilder` and is immutable
//! afterwards, so readers on any thread need no synchronization.
//!
//! # Design
//!
//! - `FxHashMap<Ty, Ty>` for O(1) lookup, plus an insertion-ordered pair list
//!   for deterministic iteration in diagnostics
//! - Container expansion and reverse registration are derived at declaration
//!   time; lookups never synthesize pairs
//! - Each `add_pair` is atomic: all derived pairs are validated before any is
//!   committed

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{ConfigurationError, ContainerKind, ShapeDeclaration, Ty};

/// An ordered (source, destination) substitution rule.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypePair {
    pub source: Ty,
    pub destination: Ty,
}

impl TypePair {
    pub fn new(source: Ty, destination: Ty) -> Self {
        TypePair {
            source,
            destination,
        }
    }

    /// The mirror pair.
    pub fn reversed(&self) -> Self {
        TypePair::new(self.destination.clone(), self.source.clone())
    }
}

impl fmt::Display for TypePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.destination)
    }
}

/// How a declared pair is expanded at registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PairOptions {
    /// Also register array, list, enumerable and collection variants.
    pub expand_containers: bool,
    /// Also register the mirror pair (expanded the same way, never re-reversed).
    pub add_reverse: bool,
}

impl PairOptions {
    /// Only the pair itself.
    pub const EXACT: PairOptions = PairOptions {
        expand_containers: false,
        add_reverse: false,
    };

    /// The pair and its container variants.
    pub const EXPANDED: PairOptions = PairOptions {
        expand_containers: true,
        add_reverse: false,
    };

    /// The pair, its mirror, and the container variants of both.
    pub const BIDIRECTIONAL: PairOptions = PairOptions {
        expand_containers: true,
        add_reverse: true,
    };
}

impl Default for PairOptions {
    fn default() -> Self {
        PairOptions::EXPANDED
    }
}

/// What `substitute` does with a type that has no registered pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum UnmappedPolicy {
    /// Unmapped types are their own substitution.
    #[default]
    Passthrough,
    /// Unmapped types are an error unless declared with
    /// `TypePairRegistryBuilder::passthrough`.
    Strict,
}

/// Builder for a `TypePairRegistry`.
#[derive(Clone, Debug, Default)]
pub struct TypePairRegistryBuilder {
    registry: TypePairRegistry,
}

impl TypePairRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `source -> destination`, expanded according to `options`.
    ///
    /// Re-registering an identical pair is a no-op. Mapping an already mapped
    /// source to a different destination fails and leaves the builder
    /// unchanged.
    pub fn add_pair(
        &mut self,
        source: Ty,
        destination: Ty,
        options: PairOptions,
    ) -> Result<&mut Self, ConfigurationError> {
        for endpoint in [&source, &destination] {
            if endpoint.is_by_ref() {
                return Err(ConfigurationError::ByRefEndpoint {
                    ty: endpoint.clone(),
                });
            }
        }

        let primary = TypePair::new(source, destination);
        let mut staged = Vec::with_capacity(10);
        stage(&mut staged, &primary, options.expand_containers);
        if options.add_reverse {
            stage(&mut staged, &primary.reversed(), options.expand_containers);
        }

        let reg = &mut self.registry;
        let mut pending: FxHashMap<&Ty, &Ty> = FxHashMap::default();
        for pair in &staged {
            let existing = reg
                .pairs
                .get(&pair.source)
                .or_else(|| pending.get(&pair.source).copied());
            match existing {
                Some(existing) if *existing != pair.destination => {
                    return Err(ConfigurationError::ConflictingPair {
                        ty: pair.source.clone(),
                        existing: existing.clone(),
                        attempted: pair.destination.clone(),
                    });
                }
                _ => {
                    pending.insert(&pair.source, &pair.destination);
                }
            }
        }
        drop(pending);

        let mut added = 0usize;
        for pair in staged {
            if !reg.pairs.contains_key(&pair.source) {
                reg.pairs
                    .insert(pair.source.clone(), pair.destination.clone());
                reg.order.push(pair);
                added += 1;
            }
        }

        tracing::debug!(
            pair = %primary,
            expand_containers = options.expand_containers,
            add_reverse = options.add_reverse,
            added,
            "type pair registered"
        );
        if !reg.declared.contains(&primary) {
            reg.declared.push(primary);
        }
        Ok(self)
    }

    /// Register every pair of an ordered list with the same options.
    pub fn add_pairs(
        &mut self,
        pairs: impl IntoIterator<Item = (Ty, Ty)>,
        options: PairOptions,
    ) -> Result<&mut Self, ConfigurationError> {
        for (source, destination) in pairs {
            self.add_pair(source, destination, options)?;
        }
        Ok(self)
    }

    /// Apply a shape declaration loaded from configuration.
    pub fn apply(
        &mut self,
        declaration: &ShapeDeclaration,
    ) -> Result<&mut Self, ConfigurationError> {
        for pair in &declaration.pairs {
            let options = PairOptions {
                expand_containers: pair.expand_containers,
                add_reverse: pair.add_reverse,
            };
            self.add_pair(pair.source.clone(), pair.destination.clone(), options)?;
        }
        for ty in &declaration.passthrough {
            self.passthrough(ty.clone());
        }
        if declaration.strict {
            self.policy(UnmappedPolicy::Strict);
        }
        Ok(self)
    }

    /// Set the unmapped-type policy.
    pub fn policy(&mut self, policy: UnmappedPolicy) -> &mut Self {
        self.registry.policy = policy;
        self
    }

    /// Declare a type that intentionally maps to itself under the strict policy.
    ///
    /// A by-reference type declares its element type.
    pub fn passthrough(&mut self, ty: Ty) -> &mut Self {
        let ty = match ty {
            Ty::ByRef(inner) => *inner,
            other => other,
        };
        self.registry.passthrough.insert(ty);
        self
    }

    pub fn build(self) -> TypePairRegistry {
        self.registry
    }
}

/// Push `pair` and, when requested, its container variants.
fn stage(staged: &mut Vec<TypePair>, pair: &TypePair, expand_containers: bool) {
    staged.push(pair.clone());
    if expand_containers {
        for kind in ContainerKind::ALL {
            staged.push(TypePair::new(
                kind.wrap(pair.source.clone()),
                kind.wrap(pair.destination.clone()),
            ));
        }
    }
}

/// Immutable source-to-destination type substitutions for one adapter shape.
#[derive(Clone, Debug, Default)]
pub struct TypePairRegistry {
    /// Source type -> destination type.
    pairs: FxHashMap<Ty, Ty>,
    /// Every registered pair, including derived ones, in insertion order.
    order: Vec<TypePair>,
    /// Pairs as declared, before expansion.
    declared: Vec<TypePair>,
    policy: UnmappedPolicy,
    passthrough: FxHashSet<Ty>,
}

impl TypePairRegistry {
    pub fn builder() -> TypePairRegistryBuilder {
        TypePairRegistryBuilder::new()
    }

    /// Exact lookup of a registered source type.
    pub fn get(&self, source: &Ty) -> Option<&Ty> {
        self.pairs.get(source)
    }

    /// Look up the destination for `ty`.
    ///
    /// By-reference types are unwrapped before the lookup and the destination
    /// is re-wrapped as by-reference.
    pub fn lookup(&self, ty: &Ty) -> Option<Ty> {
        match ty {
            Ty::ByRef(inner) => self.pairs.get(inner).map(|found| found.clone().by_ref()),
            other => self.pairs.get(other).cloned(),
        }
    }

    /// The target-facing type for `ty`, applying the unmapped policy.
    pub fn substitute(&self, ty: &Ty) -> Result<Ty, ConfigurationError> {
        if let Some(found) = self.lookup(ty) {
            return Ok(found);
        }
        match self.policy {
            UnmappedPolicy::Passthrough => {
                tracing::trace!(%ty, "no type pair; passing type through");
                Ok(ty.clone())
            }
            UnmappedPolicy::Strict if self.passthrough.contains(ty.strip_ref()) => Ok(ty.clone()),
            UnmappedPolicy::Strict => Err(ConfigurationError::UnmappedType {
                ty: ty.strip_ref().clone(),
            }),
        }
    }

    /// Every registered pair, derived ones included, in registration order.
    pub fn pairs(&self) -> impl Iterator<Item = &TypePair> {
        self.order.iter()
    }

    /// The pairs as declared, before container and reverse expansion.
    pub fn declared(&self) -> &[TypePair] {
        &self.declared
    }

    pub fn policy(&self) -> UnmappedPolicy {
        self.policy
    }

    /// Number of registered pairs, derived ones included.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]
mod tests;
