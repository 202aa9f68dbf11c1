//! Adapter-to-target method resolution.
//!
//! Resolution turns an adapter method descriptor into an `InvocationInfo` by
//! substituting its parameter types through the shape's type-pair registry
//! and looking the result up in the target's dispatch table.
//!
//! # Resolution Steps
//!
//! 1. Substitute each parameter type in order (by-reference flags survive)
//! 2. Find the target method with the same name and exactly those types
//! 3. Require equal `ReturnKind`s on both sides
//! 4. For generic task kinds, record the inner-value remap
//! 5. Cache the result; later calls are cache hits
//!
//! Failures are never cached, so a broken method fails the same way on every
//! call.

use std::sync::Arc;

use morph_types::{ReturnKind, Ty, TypePairRegistry};

use crate::cache::MethodCache;
use crate::info::ResultRemap;
use crate::method::Signature;
use crate::target::TargetType;
use crate::{AdapterMethod, DispatchError, InvocationInfo};

/// Resolves adapter methods against one target type.
///
/// Cloning is cheap; clones share the registry, dispatch table and cache.
pub struct MethodResolver<T> {
    registry: Arc<TypePairRegistry>,
    target: Arc<TargetType<T>>,
    cache: Arc<MethodCache<T>>,
}

impl<T> Clone for MethodResolver<T> {
    fn clone(&self) -> Self {
        MethodResolver {
            registry: Arc::clone(&self.registry),
            target: Arc::clone(&self.target),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<T> MethodResolver<T> {
    pub fn new(registry: Arc<TypePairRegistry>, target: Arc<TargetType<T>>) -> Self {
        MethodResolver {
            registry,
            target,
            cache: Arc::new(MethodCache::new()),
        }
    }

    pub fn registry(&self) -> &Arc<TypePairRegistry> {
        &self.registry
    }

    pub fn target(&self) -> &Arc<TargetType<T>> {
        &self.target
    }

    pub fn cache(&self) -> &Arc<MethodCache<T>> {
        &self.cache
    }

    /// Resolve `method`, from the cache when possible.
    pub fn resolve(&self, method: &AdapterMethod) -> Result<Arc<InvocationInfo<T>>, DispatchError> {
        self.cache
            .get_or_try_insert_with(method, || self.compute(method))
    }

    #[tracing::instrument(level = "debug", skip_all, fields(method = %method))]
    fn compute(&self, method: &AdapterMethod) -> Result<InvocationInfo<T>, DispatchError> {
        let target_params = method
            .params()
            .iter()
            .map(|ty| self.registry.substitute(ty))
            .collect::<Result<Vec<Ty>, _>>()?;

        let Some(found) = self.target.find_exact(method.name(), &target_params) else {
            let candidates = self
                .target
                .overloads(method.name())
                .iter()
                .map(|m| m.signature().to_string())
                .collect();
            return Err(DispatchError::MethodNotFound {
                target_type: self.target.name().clone(),
                signature: Signature::new(method.name(), &target_params, None).to_string(),
                candidates,
            });
        };

        let adapter_kind = ReturnKind::classify(method.ret());
        let target_kind = ReturnKind::classify(found.ret());
        if adapter_kind != target_kind {
            return Err(DispatchError::ReturnTypeMismatch {
                method: method.to_string(),
                adapter_kind,
                adapter_return: method.ret().clone(),
                target_kind,
                target_return: found.ret().clone(),
            });
        }

        if adapter_kind.is_async() {
            if let Some(position) = method.params().iter().position(Ty::is_by_ref) {
                return Err(DispatchError::ByRefOnAsync {
                    method: method.to_string(),
                    position,
                });
            }
        }

        let remap = match (ReturnKind::inner(found.ret()), ReturnKind::inner(method.ret())) {
            (Some(target_inner), Some(adapter_inner)) => {
                Some(ResultRemap::new(target_inner.clone(), adapter_inner.clone()))
            }
            _ => None,
        };

        tracing::debug!(
            target_method = %found.signature(),
            return_kind = %adapter_kind,
            "method resolved"
        );
        Ok(InvocationInfo::new(
            Arc::clone(found),
            method.params().to_vec(),
            target_params,
            method.ret().clone(),
            adapter_kind,
            remap,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]
mod tests;
