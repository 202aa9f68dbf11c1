//! Morph Mapper - a structural `ValueMapper`.
//!
//! `FieldwiseMapper` converts values between paired types using the same
//! type-pair registry the resolver uses:
//!
//! - identical source and destination types pass the value through untouched
//! - an explicit converter registered for the exact pair wins
//! - records are renamed to the destination type; each field is mapped by
//!   its runtime type through the registry
//! - the four container kinds are mapped element-wise
//! - `null` maps to `null`, and an unset (`void`) slot stays unset
//!
//! Anything else fails with a `MappingError`, wrapped in the engine's
//! `MapperError`.

use std::fmt;
use std::sync::Arc;

use morph_dispatch::{AdapterShape, MapperError, Record, Value, ValueMapper};
use morph_types::{Name, Ty, TypePair, TypePairRegistry};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// A conversion the mapper cannot perform.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum MappingError {
    #[error("cannot map {kind} value from `{from}` to `{to}`")]
    Unsupported { kind: &'static str, from: Ty, to: Ty },

    #[error("expected a `{expected}` record, found `{found}`")]
    UnexpectedRecord { expected: Ty, found: Name },
}

type Converter = Box<dyn Fn(Value) -> Result<Value, MapperError> + Send + Sync>;

/// Maps records field by field and containers element by element.
pub struct FieldwiseMapper {
    registry: Arc<TypePairRegistry>,
    converters: FxHashMap<TypePair, Converter>,
}

impl FieldwiseMapper {
    pub fn new(registry: Arc<TypePairRegistry>) -> Self {
        FieldwiseMapper {
            registry,
            converters: FxHashMap::default(),
        }
    }

    /// A mapper over the registry of `shape`.
    pub fn for_shape<T>(shape: &AdapterShape<T>) -> Self {
        Self::new(Arc::clone(shape.registry()))
    }

    /// Use `convert` for values of `source` mapped to `destination`.
    #[must_use]
    pub fn with_converter<F>(mut self, source: Ty, destination: Ty, convert: F) -> Self
    where
        F: Fn(Value) -> Result<Value, MapperError> + Send + Sync + 'static,
    {
        self.converters
            .insert(TypePair::new(source, destination), Box::new(convert));
        self
    }

    fn convert(&self, value: Value, source: &Ty, destination: &Ty) -> Result<Value, MapperError> {
        if source == destination {
            return Ok(value);
        }
        let pair = TypePair::new(source.clone(), destination.clone());
        if let Some(convert) = self.converters.get(&pair) {
            tracing::trace!(%pair, "explicit converter");
            return convert(value);
        }

        match value {
            Value::Null => Ok(Value::Null),
            Value::Void => Ok(Value::Void),
            Value::Record(record) => self.convert_record(&record, source, destination),
            Value::Seq(items) => match (source.container(), destination.container()) {
                (Some((_, from)), Some((_, to))) => items
                    .iter()
                    .map(|item| self.convert(item.clone(), from, to))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::seq),
                _ => Err(unsupported(&Value::Seq(items), source, destination)),
            },
            other => Err(unsupported(&other, source, destination)),
        }
    }

    fn convert_record(
        &self,
        record: &Record,
        source: &Ty,
        destination: &Ty,
    ) -> Result<Value, MapperError> {
        if source.name() != Some(record.type_name()) {
            return Err(MapperError::new(MappingError::UnexpectedRecord {
                expected: source.clone(),
                found: record.type_name().clone(),
            }));
        }
        let Some(renamed) = destination.name() else {
            return Err(unsupported(&Value::Record(record.clone()), source, destination));
        };

        let fields = record
            .fields()
            .iter()
            .map(|(name, value)| {
                self.convert_dynamic(value)
                    .map(|mapped| (name.clone(), mapped))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::record(renamed.clone(), fields))
    }

    /// Map a value whose static type is unknown, using its runtime type.
    fn convert_dynamic(&self, value: &Value) -> Result<Value, MapperError> {
        match value {
            Value::Record(record) => {
                let source = Ty::Named(record.type_name().clone());
                match self.registry.lookup(&source) {
                    Some(destination) => self.convert_record(record, &source, &destination),
                    None => Ok(value.clone()),
                }
            }
            Value::Seq(items) => items
                .iter()
                .map(|item| self.convert_dynamic(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::seq),
            other => Ok(other.clone()),
        }
    }
}

impl ValueMapper for FieldwiseMapper {
    fn map(&self, value: Value, source: &Ty, destination: &Ty) -> Result<Value, MapperError> {
        self.convert(value, source, destination)
    }
}

impl fmt::Debug for FieldwiseMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldwiseMapper")
            .field("pairs", &self.registry.len())
            .field("converters", &self.converters.len())
            .finish()
    }
}

fn unsupported(value: &Value, from: &Ty, to: &Ty) -> MapperError {
    MapperError::new(MappingError::Unsupported {
        kind: value.describe(),
        from: from.clone(),
        to: to.clone(),
    })
}
