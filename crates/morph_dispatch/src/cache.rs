//! Concurrent method-resolution cache.
//!
//! Maps adapter method identity to its resolved `InvocationInfo`. Entries are
//! added on first resolution and never evicted; the cache lives as long as
//! the adapter shape that owns it.
//!
//! # Concurrency
//!
//! Uses `DashMap` with the Fx hasher. Resolution runs outside any shard lock,
//! so two threads resolving the same new method may both compute it; the
//! first insertion wins and every caller gets the stored `Arc`.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use crate::{AdapterMethod, InvocationInfo};

/// Adapter method -> resolved invocation metadata.
pub struct MethodCache<T> {
    entries: DashMap<AdapterMethod, Arc<InvocationInfo<T>>, FxBuildHasher>,
}

impl<T> MethodCache<T> {
    pub fn new() -> Self {
        MethodCache {
            entries: DashMap::with_hasher(FxBuildHasher),
        }
    }

    pub fn get(&self, method: &AdapterMethod) -> Option<Arc<InvocationInfo<T>>> {
        self.entries.get(method).map(|entry| Arc::clone(entry.value()))
    }

    /// The cached entry for `method`, computing it with `compute` if absent.
    ///
    /// Errors from `compute` are returned and nothing is stored.
    pub fn get_or_try_insert_with<E>(
        &self,
        method: &AdapterMethod,
        compute: impl FnOnce() -> Result<InvocationInfo<T>, E>,
    ) -> Result<Arc<InvocationInfo<T>>, E> {
        // Fast path: already resolved
        if let Some(info) = self.get(method) {
            tracing::trace!(%method, "resolution cache hit");
            return Ok(info);
        }

        // Slow path: compute without holding a shard lock
        let computed = Arc::new(compute()?);
        let stored = self
            .entries
            .entry(method.clone())
            .or_insert(computed)
            .value()
            .clone();
        Ok(stored)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for MethodCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for MethodCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodCache")
            .field("entries", &self.len())
            .finish()
    }
}
