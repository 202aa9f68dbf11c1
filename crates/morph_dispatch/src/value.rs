//! Runtime values carried across the adaptation boundary.
//!
//! # Thread Safety
//!
//! Heap-backed values (`Str`, `Seq`, `Record`) share their contents through
//! `Arc`, so cloning a value is cheap and a mapper that passes a value
//! through unchanged preserves its allocation. `Value::ptr_eq` observes this.

use std::sync::Arc;

use morph_types::Name;

/// A dynamically typed value.
///
/// All four container variants (`T[]`, `List<T>`, `Enumerable<T>`,
/// `Collection<T>`) are represented as `Seq`; the declared `Ty` tells the
/// mapper which one a given sequence stands for.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// No value; the result of a void call.
    #[default]
    Void,
    /// A null reference.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    Seq(Arc<Vec<Value>>),
    Record(Record),
}

impl Value {
    pub fn string(value: impl AsRef<str>) -> Self {
        Value::Str(Arc::from(value.as_ref()))
    }

    pub fn seq(items: Vec<Value>) -> Self {
        Value::Seq(Arc::new(items))
    }

    /// A record of `type_name` with the given fields, in order.
    pub fn record<N: Into<Name>>(
        type_name: impl Into<Name>,
        fields: impl IntoIterator<Item = (N, Value)>,
    ) -> Self {
        Value::Record(Record::new(type_name, fields))
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Short description of the value's runtime kind, for error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Value::Void => "void",
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Seq(_) => "sequence",
            Value::Record(_) => "record",
        }
    }

    /// Whether both values share the same heap allocation.
    ///
    /// Always `false` for inline values.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Arc::ptr_eq(a, b),
            (Value::Seq(a), Value::Seq(b)) => Arc::ptr_eq(a, b),
            (Value::Record(a), Value::Record(b)) => Arc::ptr_eq(&a.fields, &b.fields),
            _ => false,
        }
    }
}

/// A named record with ordered fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    type_name: Name,
    fields: Arc<Vec<(Name, Value)>>,
}

impl Record {
    pub fn new<N: Into<Name>>(
        type_name: impl Into<Name>,
        fields: impl IntoIterator<Item = (N, Value)>,
    ) -> Self {
        Record {
            type_name: type_name.into(),
            fields: Arc::new(
                fields
                    .into_iter()
                    .map(|(name, value)| (name.into(), value))
                    .collect(),
            ),
        }
    }

    pub fn type_name(&self) -> &Name {
        &self.type_name
    }

    pub fn fields(&self) -> &[(Name, Value)] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name.as_str() == field)
            .map(|(_, value)| value)
    }

    /// Whether two records have equal fields, regardless of their type names.
    pub fn fields_eq(&self, other: &Record) -> bool {
        self.fields == other.fields
    }
}
