//! Call adapter over function values
//!
//! `FunctionRef` wraps a function-typed `Value` and exposes the three call
//! shapes — plain, receiver-bound, constructor — each accepting arguments
//! either as a slice or as any iterator of values. The two argument paths
//! are observationally identical.

use kite_core::{EngineContext, EngineError, EngineResult, Invocation, Value};

/// Checked wrapper around a function-typed value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionRef {
    value: Value,
}

impl FunctionRef {
    /// Define a named native function and wrap it
    pub fn new<F>(cx: &mut EngineContext, name: &str, f: F) -> EngineResult<Self>
    where
        F: Fn(&mut EngineContext, Value, &[Value]) -> EngineResult<Value> + 'static,
    {
        Ok(Self {
            value: cx.create_function(name, f)?,
        })
    }

    /// Wrap an existing value, checking that it is a live function
    pub fn from_value(cx: &EngineContext, value: Value) -> EngineResult<Self> {
        if cx.is_function(value) {
            Ok(Self { value })
        } else {
            Err(EngineError::TypeError {
                expected: "function".to_string(),
                got: cx.type_name(value).to_string(),
            })
        }
    }

    /// The underlying function value
    pub fn value(&self) -> Value {
        self.value
    }

    /// The function's declared name
    pub fn name(&self, cx: &EngineContext) -> EngineResult<String> {
        cx.function_name(self.value)
    }

    /// Plain call with a positional argument slice; the callable observes a
    /// null receiver and its return value is passed through unchanged
    pub fn call(&self, cx: &mut EngineContext, args: &[Value]) -> EngineResult<Value> {
        cx.invoke(self.value, Invocation::Call, args)
    }

    /// Plain call with arguments converted from an iterator as they come
    pub fn call_from_iter<I>(&self, cx: &mut EngineContext, args: I) -> EngineResult<Value>
    where
        I: IntoIterator<Item = Value>,
    {
        let args: Vec<Value> = args.into_iter().collect();
        self.call(cx, &args)
    }

    /// Call with `receiver` bound, observable inside the callable
    pub fn call_with(
        &self,
        cx: &mut EngineContext,
        receiver: Value,
        args: &[Value],
    ) -> EngineResult<Value> {
        cx.invoke(self.value, Invocation::CallWithReceiver(receiver), args)
    }

    /// Receiver-bound call with arguments from an iterator
    pub fn call_with_from_iter<I>(
        &self,
        cx: &mut EngineContext,
        receiver: Value,
        args: I,
    ) -> EngineResult<Value>
    where
        I: IntoIterator<Item = Value>,
    {
        let args: Vec<Value> = args.into_iter().collect();
        self.call_with(cx, receiver, &args)
    }

    /// Constructor invocation; returns a fresh instance of this function
    pub fn construct(&self, cx: &mut EngineContext, args: &[Value]) -> EngineResult<Value> {
        cx.invoke(self.value, Invocation::Construct, args)
    }

    /// Constructor invocation with arguments from an iterator
    pub fn construct_from_iter<I>(&self, cx: &mut EngineContext, args: I) -> EngineResult<Value>
    where
        I: IntoIterator<Item = Value>,
    {
        let args: Vec<Value> = args.into_iter().collect();
        self.construct(cx, &args)
    }
}
