//! Engine execution context
//!
//! Each `EngineContext` is an isolated engine instance with its own heap,
//! root set and collector. Every capability call takes the context
//! explicitly; there is no process-wide engine state. Contexts are
//! single-threaded (callables are `Rc`-held) and collection only runs when
//! `collect` is called.

use crate::gc::{GarbageCollector, GcStats, HeapStats};
use crate::object::{Array, Function, HeapObject, KiteString, NativeFn, Object, PropKey};
use crate::value::Value;
use crate::{EngineError, EngineResult};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for an `EngineContext`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl ContextId {
    /// Create a new unique context ID
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        ContextId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

/// Resource limits for an `EngineContext`
#[derive(Debug, Clone, Default)]
pub struct ResourceLimits {
    /// Maximum number of live heap entries (None = unlimited)
    pub max_heap_entries: Option<usize>,
}

impl ResourceLimits {
    /// Create unlimited resource limits
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Create resource limits with a specific heap entry cap
    pub fn with_heap_limit(max_heap_entries: usize) -> Self {
        Self {
            max_heap_entries: Some(max_heap_entries),
        }
    }
}

/// Context construction options
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Resource limits
    pub limits: ResourceLimits,
}

/// An isolated engine instance
#[derive(Debug)]
pub struct EngineContext {
    id: ContextId,
    gc: GarbageCollector,
}

impl EngineContext {
    /// Create a new context with default options
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    /// Create a new context with the given options
    pub fn with_options(options: EngineOptions) -> Self {
        let mut gc = GarbageCollector::new();
        if let Some(n) = options.limits.max_heap_entries {
            gc.heap_mut().set_max_entries(n);
        }
        Self {
            id: ContextId::new(),
            gc,
        }
    }

    /// Get this context's ID
    pub fn id(&self) -> ContextId {
        self.id
    }

    // ========================================================================
    // Value creation
    // ========================================================================

    /// Allocate a boxed string
    pub fn create_string(&mut self, s: &str) -> EngineResult<Value> {
        let slot = self.gc.allocate(HeapObject::Str(KiteString::new(s)))?;
        Ok(Value::handle(slot))
    }

    /// Allocate an array holding the given items
    pub fn create_array(&mut self, items: &[Value]) -> EngineResult<Value> {
        let slot = self
            .gc
            .allocate(HeapObject::Array(Array::from_slice(items)))?;
        Ok(Value::handle(slot))
    }

    /// Allocate an empty object
    pub fn create_object(&mut self) -> EngineResult<Value> {
        let slot = self.gc.allocate(HeapObject::Object(Object::new()))?;
        Ok(Value::handle(slot))
    }

    /// Allocate an object instance recording its constructor handle
    pub(crate) fn create_instance(&mut self, ctor: Value) -> EngineResult<Value> {
        let slot = self
            .gc
            .allocate(HeapObject::Object(Object::with_constructor(ctor)))?;
        Ok(Value::handle(slot))
    }

    /// Allocate a named native function
    pub fn create_function<F>(&mut self, name: &str, f: F) -> EngineResult<Value>
    where
        F: Fn(&mut EngineContext, Value, &[Value]) -> EngineResult<Value> + 'static,
    {
        let func: NativeFn = Rc::new(f);
        let slot = self
            .gc
            .allocate(HeapObject::Function(Function::new(name, func)))?;
        Ok(Value::handle(slot))
    }

    // ========================================================================
    // Value reading
    // ========================================================================

    /// Read string data from a boxed string value
    pub fn read_string(&self, value: Value) -> EngineResult<String> {
        match self.heap_object(value, "string")? {
            HeapObject::Str(s) => Ok(s.data.clone()),
            other => Err(self.type_error("string", other)),
        }
    }

    /// Get array length
    pub fn array_len(&self, value: Value) -> EngineResult<usize> {
        match self.heap_object(value, "array")? {
            HeapObject::Array(arr) => Ok(arr.len()),
            other => Err(self.type_error("array", other)),
        }
    }

    /// Get array element at index (None past the end)
    pub fn array_get(&self, value: Value, index: usize) -> EngineResult<Option<Value>> {
        match self.heap_object(value, "array")? {
            HeapObject::Array(arr) => Ok(arr.get(index)),
            other => Err(self.type_error("array", other)),
        }
    }

    /// Set array element at index
    pub fn array_set(&mut self, value: Value, index: usize, item: Value) -> EngineResult<()> {
        match self.heap_object_mut(value, "array")? {
            HeapObject::Array(arr) => {
                let len = arr.len();
                arr.set(index, item)
                    .map_err(|_| EngineError::IndexOutOfBounds { index, len })
            }
            other => {
                let got = other.type_name();
                Err(EngineError::TypeError {
                    expected: "array".to_string(),
                    got: got.to_string(),
                })
            }
        }
    }

    /// Append an array element
    pub fn array_push(&mut self, value: Value, item: Value) -> EngineResult<()> {
        match self.heap_object_mut(value, "array")? {
            HeapObject::Array(arr) => {
                arr.push(item);
                Ok(())
            }
            other => {
                let got = other.type_name();
                Err(EngineError::TypeError {
                    expected: "array".to_string(),
                    got: got.to_string(),
                })
            }
        }
    }

    /// Get an object property (None if absent)
    pub fn object_get(&self, value: Value, key: &PropKey) -> EngineResult<Option<Value>> {
        match self.heap_object(value, "object")? {
            HeapObject::Object(obj) => Ok(obj.get(key)),
            other => Err(self.type_error("object", other)),
        }
    }

    /// Set an object property
    pub fn object_set(
        &mut self,
        value: Value,
        key: impl Into<PropKey>,
        item: Value,
    ) -> EngineResult<()> {
        match self.heap_object_mut(value, "object")? {
            HeapObject::Object(obj) => {
                obj.set(key.into(), item);
                Ok(())
            }
            other => {
                let got = other.type_name();
                Err(EngineError::TypeError {
                    expected: "object".to_string(),
                    got: got.to_string(),
                })
            }
        }
    }

    /// Get an object's property keys in insertion order
    pub fn object_keys(&self, value: Value) -> EngineResult<Vec<PropKey>> {
        match self.heap_object(value, "object")? {
            HeapObject::Object(obj) => Ok(obj.keys().cloned().collect()),
            other => Err(self.type_error("object", other)),
        }
    }

    /// Get a function's declared name
    pub fn function_name(&self, value: Value) -> EngineResult<String> {
        match self.heap_object(value, "function")? {
            HeapObject::Function(f) => Ok(f.name().to_string()),
            other => Err(self.type_error("function", other)),
        }
    }

    /// Resolve a value's type name ("null", "int", ..., or the heap type)
    pub fn type_name(&self, value: Value) -> &'static str {
        match value.as_handle() {
            Some(slot) => match self.gc.heap().get(slot) {
                Some(object) => object.type_name(),
                None => "collected",
            },
            None => value.type_name(),
        }
    }

    /// Check if a value is a live array
    pub fn is_array(&self, value: Value) -> bool {
        matches!(self.resolve(value), Some(HeapObject::Array(_)))
    }

    /// Check if a value is a live boxed string
    pub fn is_string(&self, value: Value) -> bool {
        matches!(self.resolve(value), Some(HeapObject::Str(_)))
    }

    /// Check if a value is a live object
    pub fn is_object(&self, value: Value) -> bool {
        matches!(self.resolve(value), Some(HeapObject::Object(_)))
    }

    /// Check if a value is a live function
    pub fn is_function(&self, value: Value) -> bool {
        matches!(self.resolve(value), Some(HeapObject::Function(_)))
    }

    // ========================================================================
    // Rooting and pinning
    // ========================================================================

    /// Root a value so it survives collection
    pub fn add_root(&mut self, value: Value) {
        self.gc.roots_mut().add(value);
    }

    /// Remove one root occurrence. Returns false if the value was not rooted.
    pub fn remove_root(&mut self, value: Value) -> bool {
        self.gc.roots_mut().remove(value)
    }

    /// Pin a handle's slot (no-op for scalar values, which never die)
    pub fn pin(&mut self, value: Value) -> EngineResult<()> {
        match value.as_handle() {
            Some(slot) => self.gc.heap_mut().pin(slot),
            None => Ok(()),
        }
    }

    /// Drop one pin from a handle's slot (no-op for scalar values)
    pub fn unpin(&mut self, value: Value) -> EngineResult<()> {
        match value.as_handle() {
            Some(slot) => self.gc.heap_mut().unpin(slot),
            None => Ok(()),
        }
    }

    /// Check whether a value is still live (scalars always are)
    pub fn is_live(&self, value: Value) -> bool {
        match value.as_handle() {
            Some(slot) => self.gc.heap().contains(slot),
            None => true,
        }
    }

    // ========================================================================
    // Collection and accounting
    // ========================================================================

    /// Run a collection cycle. The only way heap entries are ever reclaimed.
    pub fn collect(&mut self) {
        self.gc.collect();
    }

    /// Get collector statistics
    pub fn gc_stats(&self) -> &GcStats {
        self.gc.stats()
    }

    /// Get a heap statistics snapshot
    pub fn heap_stats(&self) -> HeapStats {
        self.gc.heap_stats()
    }

    /// Adjust the externally allocated memory total, returning the new total
    pub fn adjust_external_memory(&mut self, delta: i64) -> i64 {
        self.gc.heap_mut().adjust_external_memory(delta)
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    pub(crate) fn resolve(&self, value: Value) -> Option<&HeapObject> {
        value.as_handle().and_then(|slot| self.gc.heap().get(slot))
    }

    fn heap_object(&self, value: Value, expected: &'static str) -> EngineResult<&HeapObject> {
        let slot = value.as_handle().ok_or_else(|| EngineError::TypeError {
            expected: expected.to_string(),
            got: value.type_name().to_string(),
        })?;
        self.gc
            .heap()
            .get(slot)
            .ok_or(EngineError::DanglingHandle(slot.raw()))
    }

    fn heap_object_mut(
        &mut self,
        value: Value,
        expected: &'static str,
    ) -> EngineResult<&mut HeapObject> {
        let slot = value.as_handle().ok_or_else(|| EngineError::TypeError {
            expected: expected.to_string(),
            got: value.type_name().to_string(),
        })?;
        self.gc
            .heap_mut()
            .get_mut(slot)
            .ok_or(EngineError::DanglingHandle(slot.raw()))
    }

    fn type_error(&self, expected: &'static str, got: &HeapObject) -> EngineError {
        EngineError::TypeError {
            expected: expected.to_string(),
            got: got.type_name().to_string(),
        }
    }

    pub(crate) fn lookup_function(&self, value: Value) -> EngineResult<Function> {
        match self.heap_object(value, "function")? {
            HeapObject::Function(f) => Ok(f.clone()),
            other => Err(self.type_error("function", other)),
        }
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_ids_unique() {
        let a = EngineContext::new();
        let b = EngineContext::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_create_and_read_string() {
        let mut cx = EngineContext::new();
        let s = cx.create_string("hello").unwrap();

        assert!(cx.is_string(s));
        assert_eq!(cx.read_string(s).unwrap(), "hello");
        assert_eq!(cx.type_name(s), "string");
    }

    #[test]
    fn test_create_and_read_array() {
        let mut cx = EngineContext::new();
        let arr = cx.create_array(&[Value::i32(1), Value::i32(2)]).unwrap();

        assert!(cx.is_array(arr));
        assert_eq!(cx.array_len(arr).unwrap(), 2);
        assert_eq!(cx.array_get(arr, 0).unwrap(), Some(Value::i32(1)));
        assert_eq!(cx.array_get(arr, 9).unwrap(), None);

        cx.array_set(arr, 1, Value::i32(5)).unwrap();
        assert_eq!(cx.array_get(arr, 1).unwrap(), Some(Value::i32(5)));

        let err = cx.array_set(arr, 7, Value::null()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::IndexOutOfBounds { index: 7, len: 2 }
        ));
    }

    #[test]
    fn test_object_properties() {
        let mut cx = EngineContext::new();
        let obj = cx.create_object().unwrap();

        cx.object_set(obj, "foo", Value::i32(1)).unwrap();
        cx.object_set(obj, 2, Value::bool(true)).unwrap();

        assert_eq!(
            cx.object_get(obj, &PropKey::from("foo")).unwrap(),
            Some(Value::i32(1))
        );
        assert_eq!(cx.object_get(obj, &PropKey::from("nope")).unwrap(), None);
        assert_eq!(cx.object_keys(obj).unwrap().len(), 2);
    }

    #[test]
    fn test_type_mismatch_errors() {
        let mut cx = EngineContext::new();
        let s = cx.create_string("x").unwrap();

        let err = cx.array_len(s).unwrap_err();
        assert!(matches!(err, EngineError::TypeError { .. }));

        let err = cx.read_string(Value::i32(1)).unwrap_err();
        assert!(matches!(err, EngineError::TypeError { .. }));
    }

    #[test]
    fn test_function_name() {
        let mut cx = EngineContext::new();
        let f = cx
            .create_function("greet", |cx, _recv, _args| cx.create_string("hi"))
            .unwrap();

        assert!(cx.is_function(f));
        assert_eq!(cx.function_name(f).unwrap(), "greet");
    }

    #[test]
    fn test_heap_limit() {
        let mut cx = EngineContext::with_options(EngineOptions {
            limits: ResourceLimits::with_heap_limit(1),
        });

        cx.create_string("one").unwrap();
        let err = cx.create_string("two").unwrap_err();
        assert!(matches!(err, EngineError::HeapLimitExceeded { limit: 1 }));
    }

    #[test]
    fn test_rooted_value_survives_collect() {
        let mut cx = EngineContext::new();
        let s = cx.create_string("kept").unwrap();

        cx.add_root(s);
        cx.collect();
        assert!(cx.is_live(s));
        assert_eq!(cx.read_string(s).unwrap(), "kept");

        cx.remove_root(s);
        cx.collect();
        assert!(!cx.is_live(s));
        assert!(matches!(
            cx.read_string(s),
            Err(EngineError::DanglingHandle(_))
        ));
    }

    #[test]
    fn test_scalars_always_live() {
        let cx = EngineContext::new();
        assert!(cx.is_live(Value::null()));
        assert!(cx.is_live(Value::i32(3)));
        assert_eq!(cx.type_name(Value::i32(3)), "int");
    }

    #[test]
    fn test_external_memory_roundtrip() {
        let mut cx = EngineContext::new();
        let baseline = cx.adjust_external_memory(0);
        let after = cx.adjust_external_memory(1024 * 1024);
        assert_eq!(after, baseline + 1024 * 1024);
        assert_eq!(cx.adjust_external_memory(-(1024 * 1024)), baseline);
    }
}
