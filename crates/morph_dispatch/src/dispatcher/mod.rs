//! Invocation dispatch.
//!
//! An `Adapter` stands between a proxy host and one target value. For every
//! intercepted call it resolves the adapter method, maps the arguments to the
//! target's types, calls the target, and maps the result back.
//!
//! # Call Shapes
//!
//! | Return kind | Outcome |
//! |-------------|---------|
//! | `Void`, `Sync` | `Dispatched::Ready`; return value and by-reference outputs are written into the `Invocation` |
//! | `Task`, `ValueTask` | `Dispatched::Pending`; the task yields `Value::Void` |
//! | `GenericTask`, `GenericValueTask` | `Dispatched::Pending`; the task yields the remapped result |
//!
//! A null task handle fails immediately, before anything is awaited. The
//! target future is the only suspension point of a pending task.

use std::fmt;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use morph_types::ReturnKind;
use tracing::Instrument;

use crate::target::{TargetFuture, TargetReturn};
use crate::{
    AdapterMethod, AdapterShape, CallOutcome, DispatchError, Invocation, InvocationInfo, Value,
    ValueMapper,
};

/// The completion of an asynchronous adapter call.
pub type AdapterTask = BoxFuture<'static, Result<Value, DispatchError>>;

/// What `Adapter::dispatch` produced.
#[must_use = "a pending dispatch does nothing until its task is awaited"]
pub enum Dispatched {
    /// The call completed; results are in the `Invocation`.
    Ready,
    /// The call completes when the task does.
    Pending(AdapterTask),
}

impl Dispatched {
    pub fn is_ready(&self) -> bool {
        matches!(self, Dispatched::Ready)
    }
}

impl fmt::Debug for Dispatched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatched::Ready => f.write_str("Ready"),
            Dispatched::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Forwards adapter calls to a target value of type `T`.
pub struct Adapter<T> {
    shape: AdapterShape<T>,
    target: Arc<T>,
    mapper: Arc<dyn ValueMapper>,
}

impl<T> Clone for Adapter<T> {
    fn clone(&self) -> Self {
        Adapter {
            shape: self.shape.clone(),
            target: Arc::clone(&self.target),
            mapper: Arc::clone(&self.mapper),
        }
    }
}

impl<T> fmt::Debug for Adapter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

impl<T: Send + Sync + 'static> Adapter<T> {
    pub fn new(shape: AdapterShape<T>, target: Arc<T>, mapper: Arc<dyn ValueMapper>) -> Self {
        Adapter {
            shape,
            target,
            mapper,
        }
    }

    pub fn shape(&self) -> &AdapterShape<T> {
        &self.shape
    }

    pub fn target(&self) -> &Arc<T> {
        &self.target
    }

    /// Dispatch one intercepted call.
    ///
    /// Synchronous calls complete before this returns: the mapped return
    /// value and by-reference outputs are written into `invocation`.
    /// Asynchronous calls return `Dispatched::Pending` with a task the host
    /// hands back to its caller.
    #[tracing::instrument(
        name = "dispatch",
        level = "trace",
        skip_all,
        fields(method = %invocation.method())
    )]
    pub fn dispatch(&self, invocation: &mut Invocation<'_>) -> Result<Dispatched, DispatchError> {
        let method = invocation.method();
        let info = self.shape.resolve(method)?;
        if invocation.args().len() != info.arity() {
            return Err(DispatchError::ArityMismatch {
                method: method.to_string(),
                expected: info.arity(),
                found: invocation.args().len(),
            });
        }

        let mut args = self.map_arguments(&info, invocation.args())?;
        tracing::trace!("arguments mapped");

        let returned = info
            .method()
            .invoke(&self.target, &mut args)
            .map_err(DispatchError::Target)?;
        tracing::trace!(returned = returned.describe(), "target invoked");

        match (info.return_kind(), returned) {
            (ReturnKind::Void, TargetReturn::Value(_)) => {
                self.write_back(&info, invocation, args)?;
                invocation.set_return(Value::Void);
                Ok(Dispatched::Ready)
            }
            (ReturnKind::Sync, TargetReturn::Value(value)) => {
                let value = self
                    .mapper
                    .map(value, info.target_return(), info.adapter_return())?;
                tracing::trace!("result mapped");
                self.write_back(&info, invocation, args)?;
                invocation.set_return(value);
                Ok(Dispatched::Ready)
            }
            (ReturnKind::Task | ReturnKind::GenericTask, TargetReturn::Task(None)) => {
                Err(DispatchError::NullAsyncResult {
                    method: method.to_string(),
                })
            }
            (ReturnKind::Task | ReturnKind::GenericTask, TargetReturn::Task(Some(future)))
            | (
                ReturnKind::ValueTask | ReturnKind::GenericValueTask,
                TargetReturn::ValueTask(future),
            ) => Ok(Dispatched::Pending(self.completion(&info, future))),
            (expected, returned) => Err(DispatchError::TargetContract {
                method: method.to_string(),
                expected,
                found: returned.describe(),
            }),
        }
    }

    /// Dispatch a call and await it if it is asynchronous.
    pub async fn invoke(
        &self,
        method: &AdapterMethod,
        args: Vec<Value>,
    ) -> Result<CallOutcome, DispatchError> {
        let mut invocation = Invocation::new(method, args);
        let awaited = match self.dispatch(&mut invocation)? {
            Dispatched::Ready => None,
            Dispatched::Pending(task) => Some(task.await?),
        };
        let (value, args) = invocation.into_parts();
        Ok(CallOutcome {
            value: awaited.unwrap_or(value),
            args,
        })
    }

    /// Dispatch a synchronous call.
    ///
    /// Fails with `RequiresAwait` for asynchronous methods without calling
    /// the target.
    pub fn call(
        &self,
        method: &AdapterMethod,
        args: Vec<Value>,
    ) -> Result<CallOutcome, DispatchError> {
        let requires_await = || DispatchError::RequiresAwait {
            method: method.to_string(),
        };
        if self.shape.resolve(method)?.return_kind().is_async() {
            return Err(requires_await());
        }

        let mut invocation = Invocation::new(method, args);
        match self.dispatch(&mut invocation)? {
            Dispatched::Ready => {
                let (value, args) = invocation.into_parts();
                Ok(CallOutcome { value, args })
            }
            Dispatched::Pending(_) => Err(requires_await()),
        }
    }

    /// Map every argument to its target type, in order.
    ///
    /// By-reference arguments are mapped from their current value.
    fn map_arguments(
        &self,
        info: &InvocationInfo<T>,
        args: &[Value],
    ) -> Result<Vec<Value>, DispatchError> {
        args.iter()
            .zip(info.adapter_params().iter().zip(info.target_params()))
            .map(|(value, (adapter, target))| {
                self.mapper
                    .map(value.clone(), adapter.strip_ref(), target.strip_ref())
                    .map_err(DispatchError::from)
            })
            .collect()
    }

    /// Map by-reference outputs back and store them in the invocation.
    ///
    /// The invocation is left untouched unless every output maps.
    fn write_back(
        &self,
        info: &InvocationInfo<T>,
        invocation: &mut Invocation<'_>,
        mut args: Vec<Value>,
    ) -> Result<(), DispatchError> {
        let outputs = info
            .by_ref_positions()
            .map(|position| {
                let value = std::mem::take(&mut args[position]);
                self.mapper
                    .map(
                        value,
                        info.target_params()[position].strip_ref(),
                        info.adapter_params()[position].strip_ref(),
                    )
                    .map(|mapped| (position, mapped))
            })
            .collect::<Result<Vec<_>, _>>()?;
        for (position, mapped) in outputs {
            invocation.set_arg(position, mapped);
        }
        tracing::trace!("outputs written back");
        Ok(())
    }

    /// The task that awaits `future` and remaps its result.
    fn completion(&self, info: &Arc<InvocationInfo<T>>, future: TargetFuture) -> AdapterTask {
        let info = Arc::clone(info);
        let mapper = Arc::clone(&self.mapper);
        let span = tracing::trace_span!("await", method = %info.method().name());
        async move {
            let value = future.await.map_err(DispatchError::Target)?;
            let value = match info.remap() {
                Some(remap) => remap.apply(mapper.as_ref(), value)?,
                None => Value::Void,
            };
            tracing::trace!("completed");
            Ok::<_, DispatchError>(value)
        }
        .instrument(span)
        .boxed()
    }
}
