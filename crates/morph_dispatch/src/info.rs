//! Resolved invocation metadata.

use std::fmt;
use std::sync::Arc;

use morph_types::{ReturnKind, Ty};

use crate::target::TargetMethod;
use crate::{MapperError, Value, ValueMapper};

/// Everything dispatch needs to know about one adapter method, computed once.
pub struct InvocationInfo<T> {
    method: Arc<TargetMethod<T>>,
    adapter_params: Vec<Ty>,
    target_params: Vec<Ty>,
    adapter_return: Ty,
    return_kind: ReturnKind,
    remap: Option<ResultRemap>,
}

impl<T> InvocationInfo<T> {
    pub(crate) fn new(
        method: Arc<TargetMethod<T>>,
        adapter_params: Vec<Ty>,
        target_params: Vec<Ty>,
        adapter_return: Ty,
        return_kind: ReturnKind,
        remap: Option<ResultRemap>,
    ) -> Self {
        InvocationInfo {
            method,
            adapter_params,
            target_params,
            adapter_return,
            return_kind,
            remap,
        }
    }

    /// The resolved target method.
    pub fn method(&self) -> &Arc<TargetMethod<T>> {
        &self.method
    }

    pub fn adapter_params(&self) -> &[Ty] {
        &self.adapter_params
    }

    /// Parameter types after substitution; equal to the target's.
    pub fn target_params(&self) -> &[Ty] {
        &self.target_params
    }

    pub fn adapter_return(&self) -> &Ty {
        &self.adapter_return
    }

    pub fn target_return(&self) -> &Ty {
        self.method.ret()
    }

    pub fn return_kind(&self) -> ReturnKind {
        self.return_kind
    }

    /// Conversion of an awaited result, for generic task kinds.
    pub fn remap(&self) -> Option<&ResultRemap> {
        self.remap.as_ref()
    }

    pub fn arity(&self) -> usize {
        self.adapter_params.len()
    }

    /// Positions of by-reference parameters.
    pub fn by_ref_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.adapter_params
            .iter()
            .enumerate()
            .filter(|(_, ty)| ty.is_by_ref())
            .map(|(i, _)| i)
    }

    /// Whether `other` describes the same resolution.
    pub fn is_equivalent(&self, other: &InvocationInfo<T>) -> bool {
        Arc::ptr_eq(&self.method, &other.method)
            && self.adapter_params == other.adapter_params
            && self.target_params == other.target_params
            && self.adapter_return == other.adapter_return
            && self.return_kind == other.return_kind
            && self.remap == other.remap
    }
}

impl<T> fmt::Debug for InvocationInfo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationInfo")
            .field("method", &self.method)
            .field("target_params", &self.target_params)
            .field("return_kind", &self.return_kind)
            .field("remap", &self.remap)
            .finish_non_exhaustive()
    }
}

/// Converts an awaited target result back to the adapter's inner type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultRemap {
    target_inner: Ty,
    adapter_inner: Ty,
}

impl ResultRemap {
    pub fn new(target_inner: Ty, adapter_inner: Ty) -> Self {
        ResultRemap {
            target_inner,
            adapter_inner,
        }
    }

    pub fn target_inner(&self) -> &Ty {
        &self.target_inner
    }

    pub fn adapter_inner(&self) -> &Ty {
        &self.adapter_inner
    }

    pub fn apply(&self, mapper: &dyn ValueMapper, value: Value) -> Result<Value, MapperError> {
        mapper.map(value, &self.target_inner, &self.adapter_inner)
    }
}
