//! The value-mapping boundary.
//!
//! The dispatcher converts every argument, return value and by-reference
//! output through a `ValueMapper`. The engine only consumes this contract;
//! `morph_mapper` provides a structural implementation.

use std::fmt;
use std::sync::Arc;

use morph_types::Ty;
use thiserror::Error;

use crate::Value;

/// Converts one value between two types.
///
/// Implementations must return the value unchanged when `source ==
/// destination`, and must handle every container variant a registered pair
/// expands to. Failures are reported as `MapperError` and reach the caller
/// unchanged.
pub trait ValueMapper: Send + Sync {
    fn map(&self, value: Value, source: &Ty, destination: &Ty) -> Result<Value, MapperError>;
}

impl<M: ValueMapper + ?Sized> ValueMapper for Arc<M> {
    fn map(&self, value: Value, source: &Ty, destination: &Ty) -> Result<Value, MapperError> {
        (**self).map(value, source, destination)
    }
}

impl<M: ValueMapper + ?Sized> ValueMapper for &M {
    fn map(&self, value: Value, source: &Ty, destination: &Ty) -> Result<Value, MapperError> {
        (**self).map(value, source, destination)
    }
}

/// A mapper that only supports the identity conversion.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityMapper;

impl ValueMapper for IdentityMapper {
    fn map(&self, value: Value, source: &Ty, destination: &Ty) -> Result<Value, MapperError> {
        if source == destination {
            Ok(value)
        } else {
            Err(MapperError::msg(format!(
                "identity mapper cannot convert `{source}` to `{destination}`"
            )))
        }
    }
}

/// An opaque failure reported by a `ValueMapper`.
///
/// The engine never inspects it; callers can recover the mapper's own error
/// with `downcast_ref`.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct MapperError(#[from] anyhow::Error);

impl MapperError {
    /// Wrap a mapper's error value.
    pub fn new<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        MapperError(anyhow::Error::new(error))
    }

    /// A mapper failure with only a message.
    pub fn msg<M>(message: M) -> Self
    where
        M: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        MapperError(anyhow::Error::msg(message))
    }

    /// The mapper's original error, if it has type `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.0.downcast_ref()
    }

    pub fn into_inner(self) -> anyhow::Error {
        self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]
mod tests {
    use super::*;

    #[test]
    fn test_identity_mapper_preserves_allocation() {
        let ty = Ty::list(Ty::named("Custom"));
        let value = Value::seq(vec![Value::Int(7)]);
        let mapped = IdentityMapper
            .map(value.clone(), &ty, &ty)
            .unwrap_or_else(|e| panic!("identity mapping failed: {e}"));
        assert!(mapped.ptr_eq(&value));
    }

    #[test]
    fn test_identity_mapper_rejects_conversion() {
        let err = IdentityMapper
            .map(Value::Int(1), &Ty::named("Custom"), &Ty::named("Plain"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "identity mapper cannot convert `Custom` to `Plain`"
        );
    }

    #[test]
    fn test_mapper_error_downcasts_to_original() {
        #[derive(Debug, Error)]
        #[error("bad digit")]
        struct BadDigit;

        let err = MapperError::new(BadDigit);
        assert!(err.downcast_ref::<BadDigit>().is_some());
        assert_eq!(err.to_string(), "bad digit");
    }

    fn forward<M: ValueMapper>(mapper: M, ty: &Ty) -> Option<Value> {
        mapper.map(Value::Int(3), ty, ty).ok()
    }

    #[test]
    fn test_arc_and_reference_forward() {
        let shared: Arc<dyn ValueMapper> = Arc::new(IdentityMapper);
        let ty = Ty::named("int");
        assert_eq!(shared.map(Value::Int(2), &ty, &ty).ok(), Some(Value::Int(2)));
        assert_eq!(forward(&IdentityMapper, &ty), Some(Value::Int(3)));
    }
}
