//! Adapter shapes.
//!
//! An `AdapterShape` binds one type-pair registry to one target dispatch
//! table and owns the resolution cache for that pairing. Every adapter built
//! from the same shape (or a clone of it) shares the registry and the cache,
//! so each adapter method is resolved once per shape.

use std::fmt;
use std::sync::Arc;

use morph_types::{
    ConfigurationError, PairOptions, ShapeDeclaration, Ty, TypePairRegistry,
    TypePairRegistryBuilder, UnmappedPolicy,
};

use crate::cache::MethodCache;
use crate::target::TargetType;
use crate::{Adapter, AdapterMethod, DispatchError, InvocationInfo, MethodResolver, ValueMapper};

/// A registry, a target dispatch table and their shared resolution cache.
pub struct AdapterShape<T> {
    resolver: MethodResolver<T>,
}

impl<T> Clone for AdapterShape<T> {
    fn clone(&self) -> Self {
        AdapterShape {
            resolver: self.resolver.clone(),
        }
    }
}

impl<T> fmt::Debug for AdapterShape<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterShape")
            .field("target", self.resolver.target())
            .field("pairs", &self.resolver.registry().len())
            .field("cache", self.resolver.cache())
            .finish()
    }
}

impl<T> AdapterShape<T> {
    /// Start declaring a shape over `target`.
    pub fn builder(target: TargetType<T>) -> ShapeBuilder<T> {
        ShapeBuilder {
            registry: TypePairRegistry::builder(),
            target,
        }
    }

    pub fn new(registry: TypePairRegistry, target: TargetType<T>) -> Self {
        AdapterShape {
            resolver: MethodResolver::new(Arc::new(registry), Arc::new(target)),
        }
    }

    pub fn registry(&self) -> &Arc<TypePairRegistry> {
        self.resolver.registry()
    }

    pub fn target(&self) -> &Arc<TargetType<T>> {
        self.resolver.target()
    }

    pub fn cache(&self) -> &Arc<MethodCache<T>> {
        self.resolver.cache()
    }

    pub fn resolver(&self) -> &MethodResolver<T> {
        &self.resolver
    }

    pub fn resolve(&self, method: &AdapterMethod) -> Result<Arc<InvocationInfo<T>>, DispatchError> {
        self.resolver.resolve(method)
    }

    /// Resolve every method up front, stopping at the first failure.
    ///
    /// Surfaces configuration mistakes at startup instead of on first call.
    pub fn validate<'a>(
        &self,
        methods: impl IntoIterator<Item = &'a AdapterMethod>,
    ) -> Result<(), DispatchError> {
        for method in methods {
            self.resolve(method)?;
        }
        Ok(())
    }
}

impl<T: Send + Sync + 'static> AdapterShape<T> {
    /// An adapter forwarding to `target`, converting values with `mapper`.
    pub fn adapter(&self, target: impl Into<Arc<T>>, mapper: Arc<dyn ValueMapper>) -> Adapter<T> {
        Adapter::new(self.clone(), target.into(), mapper)
    }
}

/// Declares the type pairs of an `AdapterShape`.
pub struct ShapeBuilder<T> {
    registry: TypePairRegistryBuilder,
    target: TargetType<T>,
}

impl<T> ShapeBuilder<T> {
    /// Register a pair with container expansion and no reverse.
    pub fn pair(self, source: Ty, destination: Ty) -> Result<Self, ConfigurationError> {
        self.pair_with(source, destination, PairOptions::default())
    }

    pub fn pair_with(
        mut self,
        source: Ty,
        destination: Ty,
        options: PairOptions,
    ) -> Result<Self, ConfigurationError> {
        self.registry.add_pair(source, destination, options)?;
        Ok(self)
    }

    /// Register an ordered list of pairs with the same options.
    pub fn pairs(
        mut self,
        pairs: impl IntoIterator<Item = (Ty, Ty)>,
        options: PairOptions,
    ) -> Result<Self, ConfigurationError> {
        self.registry.add_pairs(pairs, options)?;
        Ok(self)
    }

    /// Apply a declaration loaded from configuration.
    pub fn declare(mut self, declaration: &ShapeDeclaration) -> Result<Self, ConfigurationError> {
        self.registry.apply(declaration)?;
        Ok(self)
    }

    #[must_use]
    pub fn policy(mut self, policy: UnmappedPolicy) -> Self {
        self.registry.policy(policy);
        self
    }

    #[must_use]
    pub fn passthrough(mut self, ty: Ty) -> Self {
        self.registry.passthrough(ty);
        self
    }

    pub fn build(self) -> AdapterShape<T> {
        AdapterShape::new(self.registry.build(), self.target)
    }
}
