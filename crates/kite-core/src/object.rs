//! Heap object model
//!
//! Everything the heap can hold: arrays, boxed strings, property-bag objects
//! and named native functions. Values inside heap objects are plain `Value`s;
//! any handles among them are traced by the collector.

use crate::context::EngineContext;
use crate::value::Value;
use crate::EngineResult;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::rc::Rc;

/// Property key for objects and registries (integer or string)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropKey {
    /// Integer key
    Int(i64),
    /// String key
    Str(String),
}

impl fmt::Display for PropKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropKey::Int(i) => write!(f, "{}", i),
            PropKey::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for PropKey {
    fn from(i: i64) -> Self {
        PropKey::Int(i)
    }
}

impl From<i32> for PropKey {
    fn from(i: i32) -> Self {
        PropKey::Int(i as i64)
    }
}

impl From<&str> for PropKey {
    fn from(s: &str) -> Self {
        PropKey::Str(s.to_string())
    }
}

impl From<String> for PropKey {
    fn from(s: String) -> Self {
        PropKey::Str(s)
    }
}

/// Native callable signature.
///
/// The callable receives the owning context, the bound receiver (null when
/// the call site left it unbound) and the positional argument list. It may
/// allocate through the context and may trigger an explicit collection, so
/// anything it needs to keep alive across one must be rooted.
pub type NativeFn = Rc<dyn Fn(&mut EngineContext, Value, &[Value]) -> EngineResult<Value>>;

/// Named native function object
#[derive(Clone)]
pub struct Function {
    name: String,
    func: NativeFn,
}

impl Function {
    /// Create a new named function
    pub fn new(name: impl Into<String>, func: NativeFn) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }

    /// Get the declared function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a shared handle to the callable
    pub(crate) fn callable(&self) -> NativeFn {
        self.func.clone()
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.name)
    }
}

/// Property-bag object (insertion-ordered)
#[derive(Debug, Clone, Default)]
pub struct Object {
    /// Constructor function handle recorded at construct time
    constructor: Option<Value>,
    /// Property values, keyed by `PropKey`, in insertion order
    properties: IndexMap<PropKey, Value, FxBuildHasher>,
}

impl Object {
    /// Create a new empty object
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new object recording its constructor function handle
    pub fn with_constructor(ctor: Value) -> Self {
        Self {
            constructor: Some(ctor),
            properties: IndexMap::default(),
        }
    }

    /// Get the recorded constructor handle, if any
    pub fn constructor(&self) -> Option<Value> {
        self.constructor
    }

    /// Get a property value by key
    pub fn get(&self, key: &PropKey) -> Option<Value> {
        self.properties.get(key).copied()
    }

    /// Set a property value (overwrites, keeps the original position)
    pub fn set(&mut self, key: PropKey, value: Value) {
        self.properties.insert(key, value);
    }

    /// Iterate over property keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &PropKey> {
        self.properties.keys()
    }

    /// Iterate over property values in insertion order
    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        self.properties.values().copied()
    }

    /// Get number of properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check if the object has no properties
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Array object
#[derive(Debug, Clone, Default)]
pub struct Array {
    /// Array elements
    pub elements: Vec<Value>,
}

impl Array {
    /// Create a new empty array
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an array from a slice of values
    pub fn from_slice(items: &[Value]) -> Self {
        Self {
            elements: items.to_vec(),
        }
    }

    /// Get array length
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if array is empty
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get element at index
    pub fn get(&self, index: usize) -> Option<Value> {
        self.elements.get(index).copied()
    }

    /// Set element at index
    pub fn set(&mut self, index: usize, value: Value) -> Result<(), String> {
        if index < self.elements.len() {
            self.elements[index] = value;
            Ok(())
        } else {
            Err(format!(
                "Array index {} out of bounds (length: {})",
                index,
                self.elements.len()
            ))
        }
    }

    /// Append an element
    pub fn push(&mut self, value: Value) {
        self.elements.push(value);
    }
}

/// Boxed string object (heap-allocated, distinct from any inline scalar)
#[derive(Debug, Clone)]
pub struct KiteString {
    /// UTF-8 string data
    pub data: String,
}

impl KiteString {
    /// Create a new boxed string
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    /// Get string length (in bytes)
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if string is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A heap-allocated engine object
#[derive(Debug, Clone)]
pub enum HeapObject {
    /// Array of values
    Array(Array),
    /// Boxed string
    Str(KiteString),
    /// Property-bag object
    Object(Object),
    /// Named native function
    Function(Function),
}

impl HeapObject {
    /// Get the object's type name
    pub fn type_name(&self) -> &'static str {
        match self {
            HeapObject::Array(_) => "array",
            HeapObject::Str(_) => "string",
            HeapObject::Object(_) => "object",
            HeapObject::Function(_) => "function",
        }
    }

    /// Collect the handle values this object refers to (for tracing)
    pub(crate) fn children(&self) -> Vec<Value> {
        match self {
            HeapObject::Array(arr) => arr.elements.clone(),
            HeapObject::Str(_) => Vec::new(),
            HeapObject::Object(obj) => {
                let mut out: Vec<Value> = obj.values().collect();
                if let Some(ctor) = obj.constructor() {
                    out.push(ctor);
                }
                out
            }
            HeapObject::Function(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_properties() {
        let mut obj = Object::new();
        obj.set(PropKey::from("foo"), Value::i32(42));
        obj.set(PropKey::from(1), Value::bool(true));

        assert_eq!(obj.get(&PropKey::from("foo")), Some(Value::i32(42)));
        assert_eq!(obj.get(&PropKey::from(1)), Some(Value::bool(true)));
        assert_eq!(obj.get(&PropKey::from("missing")), None);
        assert_eq!(obj.len(), 2);
    }

    #[test]
    fn test_object_overwrite() {
        let mut obj = Object::new();
        obj.set(PropKey::from("k"), Value::i32(1));
        obj.set(PropKey::from("k"), Value::i32(2));

        assert_eq!(obj.get(&PropKey::from("k")), Some(Value::i32(2)));
        assert_eq!(obj.len(), 1);
    }

    #[test]
    fn test_object_key_order() {
        let mut obj = Object::new();
        obj.set(PropKey::from("b"), Value::null());
        obj.set(PropKey::from("a"), Value::null());
        obj.set(PropKey::from(0), Value::null());

        let keys: Vec<String> = obj.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["b", "a", "0"]);
    }

    #[test]
    fn test_object_constructor() {
        let obj = Object::new();
        assert_eq!(obj.constructor(), None);

        let ctor = Value::i32(0); // any value stands in for a handle here
        let obj = Object::with_constructor(ctor);
        assert_eq!(obj.constructor(), Some(ctor));
    }

    #[test]
    fn test_array_access() {
        let mut arr = Array::from_slice(&[Value::i32(10), Value::i32(20)]);

        assert_eq!(arr.len(), 2);
        assert_eq!(arr.get(0), Some(Value::i32(10)));
        assert_eq!(arr.get(5), None);

        arr.set(1, Value::i32(30)).unwrap();
        assert_eq!(arr.get(1), Some(Value::i32(30)));
        assert!(arr.set(2, Value::null()).is_err());

        arr.push(Value::bool(true));
        assert_eq!(arr.len(), 3);
    }

    #[test]
    fn test_string() {
        let s = KiteString::new("hello");
        assert_eq!(s.len(), 5);
        assert!(!s.is_empty());
        assert_eq!(s.data, "hello");
    }

    #[test]
    fn test_function_name() {
        let f = Function::new(
            "add",
            Rc::new(|_cx: &mut EngineContext, _recv, _args: &[Value]| Ok(Value::null())),
        );
        assert_eq!(f.name(), "add");
        assert_eq!(format!("{:?}", f), "Function(add)");
    }

    #[test]
    fn test_prop_key_from() {
        assert_eq!(PropKey::from(7), PropKey::Int(7));
        assert_eq!(PropKey::from("x"), PropKey::Str("x".to_string()));
        assert_eq!(PropKey::from(7).to_string(), "7");
        assert_eq!(PropKey::from("x").to_string(), "x");
    }
}
