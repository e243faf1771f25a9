//! Invocation — polymorphic call dispatch
//!
//! All ways of entering a callable go through one operation, `invoke`, with
//! the call shape carried by an explicit `Invocation` mode rather than by
//! distinct entry points. The constructor path allocates the instance itself;
//! callers never spell a `new`-equivalent.

use crate::context::EngineContext;
use crate::object::HeapObject;
use crate::value::Value;
use crate::EngineResult;

/// How a callable is entered
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Invocation {
    /// Plain call; the callable observes a null receiver
    Call,
    /// Call with the given value bound as the receiver
    CallWithReceiver(Value),
    /// Constructor invocation; the fresh instance is the receiver and the
    /// return value
    Construct,
}

impl EngineContext {
    /// Invoke a function value with the given mode and positional arguments.
    ///
    /// - `Call` and `CallWithReceiver` return the callable's return value
    ///   unchanged.
    /// - `Construct` allocates an instance recording `callee` as its
    ///   constructor, runs the callable with the instance bound as receiver,
    ///   and returns the instance.
    ///
    /// Zero arguments are an ordinary argument list of length zero.
    pub fn invoke(
        &mut self,
        callee: Value,
        mode: Invocation,
        args: &[Value],
    ) -> EngineResult<Value> {
        let function = self.lookup_function(callee)?;
        let callable = function.callable();

        match mode {
            Invocation::Call => (*callable)(self, Value::null(), args),
            Invocation::CallWithReceiver(receiver) => (*callable)(self, receiver, args),
            Invocation::Construct => {
                let instance = self.create_instance(callee)?;
                (*callable)(self, instance, args)?;
                Ok(instance)
            }
        }
    }

    /// Check whether `value` is an object constructed by `ctor`
    pub fn is_instance_of(&self, value: Value, ctor: Value) -> EngineResult<bool> {
        match self.resolve(value) {
            Some(HeapObject::Object(obj)) => Ok(obj.constructor() == Some(ctor)),
            _ => Ok(false),
        }
    }
}
