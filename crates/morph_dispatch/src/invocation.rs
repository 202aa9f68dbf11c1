//! The per-call record exchanged with the proxy host.

use crate::{AdapterMethod, Value};

/// One adapter call in flight.
///
/// The host fills in the method and arguments; dispatch writes the return
/// value and, for synchronous calls, the post-call values of by-reference
/// arguments back into `args`.
#[derive(Debug)]
pub struct Invocation<'m> {
    method: &'m AdapterMethod,
    args: Vec<Value>,
    ret: Value,
}

impl<'m> Invocation<'m> {
    pub fn new(method: &'m AdapterMethod, args: Vec<Value>) -> Self {
        Invocation {
            method,
            args,
            ret: Value::Void,
        }
    }

    pub fn method(&self) -> &'m AdapterMethod {
        self.method
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    /// The return value; `Value::Void` until a synchronous dispatch completes.
    pub fn return_value(&self) -> &Value {
        &self.ret
    }

    pub fn into_parts(self) -> (Value, Vec<Value>) {
        (self.ret, self.args)
    }

    pub(crate) fn set_return(&mut self, value: Value) {
        self.ret = value;
    }

    pub(crate) fn set_arg(&mut self, index: usize, value: Value) {
        if let Some(slot) = self.args.get_mut(index) {
            *slot = value;
        }
    }
}

/// Result of `Adapter::call` and `Adapter::invoke`.
#[derive(Clone, Debug, PartialEq)]
pub struct CallOutcome {
    /// The mapped return value.
    pub value: Value,
    /// The arguments after by-reference write-back.
    pub args: Vec<Value>,
}
