//! Target-side dispatch table.
//!
//! A target type is described once, at shape-build time, as a table of named
//! methods with declared parameter and return types. Each entry wraps a
//! closure over the concrete target value; the resolver matches adapter
//! methods against these declarations and the dispatcher calls the closure.
//!
//! # Design
//!
//! Methods are grouped by name in an `FxHashMap`, so lookups by name are
//! O(1) and overload resolution is a linear scan over a handful of entries.
//! Overloads keep declaration order, which is also the order candidates are
//! reported in when resolution fails.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use morph_types::{ConfigurationError, Name, Ty};
use rustc_hash::FxHashMap;

use crate::method::Signature;
use crate::Value;

/// The error type of target methods.
///
/// Carries the target's own error value so callers can downcast it back to
/// its original type.
pub type Fault = anyhow::Error;

/// A pending target result.
pub type TargetFuture = BoxFuture<'static, Result<Value, Fault>>;

/// What a target closure hands back to the dispatcher.
pub enum TargetReturn {
    /// A synchronous result; `Value::Void` for void methods.
    Value(Value),
    /// A task handle. `None` is a null handle.
    Task(Option<TargetFuture>),
    /// A value task; never null.
    ValueTask(TargetFuture),
}

impl TargetReturn {
    pub fn void() -> Self {
        TargetReturn::Value(Value::Void)
    }

    /// A task completing with the result of `future`.
    pub fn task<F>(future: F) -> Self
    where
        F: std::future::Future<Output = Result<Value, Fault>> + Send + 'static,
    {
        TargetReturn::Task(Some(Box::pin(future)))
    }

    pub fn null_task() -> Self {
        TargetReturn::Task(None)
    }

    pub fn value_task<F>(future: F) -> Self
    where
        F: std::future::Future<Output = Result<Value, Fault>> + Send + 'static,
    {
        TargetReturn::ValueTask(Box::pin(future))
    }

    /// Kind of handle, for contract-violation messages.
    pub fn describe(&self) -> &'static str {
        match self {
            TargetReturn::Value(Value::Void) => "no value",
            TargetReturn::Value(_) => "a synchronous value",
            TargetReturn::Task(Some(_)) => "a task",
            TargetReturn::Task(None) => "a null task",
            TargetReturn::ValueTask(_) => "a value task",
        }
    }
}

impl fmt::Debug for TargetReturn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetReturn::Value(value) => f.debug_tuple("Value").field(value).finish(),
            TargetReturn::Task(Some(_)) => f.write_str("Task(..)"),
            TargetReturn::Task(None) => f.write_str("Task(null)"),
            TargetReturn::ValueTask(_) => f.write_str("ValueTask(..)"),
        }
    }
}

type MethodFn<T> = dyn Fn(&T, &mut [Value]) -> Result<TargetReturn, Fault> + Send + Sync;

/// One declared method of a target type.
///
/// The closure receives the argument slots mutably; values it leaves in
/// by-reference positions are written back to the caller.
pub struct TargetMethod<T> {
    name: Name,
    params: Vec<Ty>,
    ret: Ty,
    func: Box<MethodFn<T>>,
}

impl<T> TargetMethod<T> {
    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn params(&self) -> &[Ty] {
        &self.params
    }

    pub fn ret(&self) -> &Ty {
        &self.ret
    }

    pub fn signature(&self) -> Signature<'_> {
        Signature::new(&self.name, &self.params, Some(&self.ret))
    }

    /// Call the method on `target`.
    pub fn invoke(&self, target: &T, args: &mut [Value]) -> Result<TargetReturn, Fault> {
        (self.func)(target, args)
    }
}

impl<T> fmt::Debug for TargetMethod<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TargetMethod({})", self.signature())
    }
}

/// The dispatch table of a target type.
pub struct TargetType<T> {
    name: Name,
    methods: FxHashMap<Name, Vec<Arc<TargetMethod<T>>>>,
}

impl<T> TargetType<T> {
    pub fn builder(name: impl Into<Name>) -> TargetTypeBuilder<T> {
        TargetTypeBuilder::new(name)
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The method named `name` whose parameter types are exactly `params`.
    pub fn find_exact(&self, name: &Name, params: &[Ty]) -> Option<&Arc<TargetMethod<T>>> {
        self.overloads(name).iter().find(|m| m.params == params)
    }

    /// Every method named `name`, in declaration order.
    pub fn overloads(&self, name: &Name) -> &[Arc<TargetMethod<T>>] {
        self.methods.get(name).map_or(&[], Vec::as_slice)
    }

    /// Number of declared methods.
    pub fn len(&self) -> usize {
        self.methods.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<T> fmt::Debug for TargetType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetType")
            .field("name", &self.name)
            .field("methods", &self.len())
            .finish()
    }
}

/// Builder for a `TargetType`.
pub struct TargetTypeBuilder<T> {
    name: Name,
    methods: Vec<TargetMethod<T>>,
}

impl<T> TargetTypeBuilder<T> {
    pub fn new(name: impl Into<Name>) -> Self {
        TargetTypeBuilder {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Declare a method.
    #[must_use]
    pub fn method<F>(
        mut self,
        name: impl Into<Name>,
        params: impl IntoIterator<Item = Ty>,
        ret: Ty,
        func: F,
    ) -> Self
    where
        F: Fn(&T, &mut [Value]) -> Result<TargetReturn, Fault> + Send + Sync + 'static,
    {
        self.methods.push(TargetMethod {
            name: name.into(),
            params: params.into_iter().collect(),
            ret,
            func: Box::new(func),
        });
        self
    }

    /// Finish the table.
    ///
    /// Fails if two methods share a name and parameter list.
    pub fn build(self) -> Result<TargetType<T>, ConfigurationError> {
        let mut methods: FxHashMap<Name, Vec<Arc<TargetMethod<T>>>> = FxHashMap::default();
        for method in self.methods {
            let overloads = methods.entry(method.name.clone()).or_default();
            if overloads.iter().any(|m| m.params == method.params) {
                return Err(ConfigurationError::DuplicateTargetMethod {
                    target_type: self.name,
                    signature: Signature::new(&method.name, &method.params, None).to_string(),
                });
            }
            overloads.push(Arc::new(method));
        }
        tracing::debug!(target_type = %self.name, methods = methods.len(), "target type built");
        Ok(TargetType {
            name: self.name,
            methods,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]
mod tests;
