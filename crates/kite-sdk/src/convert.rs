//! Value conversion traits
//!
//! `FromKite` turns engine values into Rust types (with type checking);
//! `ToKite` goes the other way, allocating through the context where the
//! target is heap data.

use crate::error::ConvertError;
use kite_core::{EngineContext, Value};

/// Convert from an engine value to a Rust type.
pub trait FromKite: Sized {
    /// Convert from a value, failing on a type mismatch.
    fn from_kite(cx: &EngineContext, value: Value) -> Result<Self, ConvertError>;
}

/// Convert from a Rust type to an engine value.
pub trait ToKite {
    /// Convert to a value, allocating through the context if needed.
    fn to_kite(self, cx: &mut EngineContext) -> Result<Value, ConvertError>;
}

fn mismatch(cx: &EngineContext, value: Value, expected: &str) -> ConvertError {
    ConvertError::TypeMismatch {
        expected: expected.to_string(),
        got: cx.type_name(value).to_string(),
    }
}

impl FromKite for bool {
    fn from_kite(cx: &EngineContext, value: Value) -> Result<Self, ConvertError> {
        value.as_bool().ok_or_else(|| mismatch(cx, value, "bool"))
    }
}

impl ToKite for bool {
    fn to_kite(self, _cx: &mut EngineContext) -> Result<Value, ConvertError> {
        Ok(Value::bool(self))
    }
}

impl FromKite for i32 {
    fn from_kite(cx: &EngineContext, value: Value) -> Result<Self, ConvertError> {
        value.as_i32().ok_or_else(|| mismatch(cx, value, "int"))
    }
}

impl ToKite for i32 {
    fn to_kite(self, _cx: &mut EngineContext) -> Result<Value, ConvertError> {
        Ok(Value::i32(self))
    }
}

impl FromKite for u32 {
    fn from_kite(cx: &EngineContext, value: Value) -> Result<Self, ConvertError> {
        value.as_u32().ok_or_else(|| mismatch(cx, value, "u32"))
    }
}

impl ToKite for u32 {
    fn to_kite(self, _cx: &mut EngineContext) -> Result<Value, ConvertError> {
        Ok(Value::u32(self))
    }
}

impl FromKite for f64 {
    fn from_kite(cx: &EngineContext, value: Value) -> Result<Self, ConvertError> {
        value.as_f64().ok_or_else(|| mismatch(cx, value, "float"))
    }
}

impl ToKite for f64 {
    fn to_kite(self, _cx: &mut EngineContext) -> Result<Value, ConvertError> {
        Ok(Value::f64(self))
    }
}

impl FromKite for String {
    fn from_kite(cx: &EngineContext, value: Value) -> Result<Self, ConvertError> {
        if cx.is_string(value) {
            Ok(cx.read_string(value)?)
        } else {
            Err(mismatch(cx, value, "string"))
        }
    }
}

impl ToKite for String {
    fn to_kite(self, cx: &mut EngineContext) -> Result<Value, ConvertError> {
        Ok(cx.create_string(&self)?)
    }
}

impl ToKite for &str {
    fn to_kite(self, cx: &mut EngineContext) -> Result<Value, ConvertError> {
        Ok(cx.create_string(self)?)
    }
}

// Unit maps to null (for callables with nothing to return)
impl ToKite for () {
    fn to_kite(self, _cx: &mut EngineContext) -> Result<Value, ConvertError> {
        Ok(Value::null())
    }
}

impl FromKite for Value {
    fn from_kite(_cx: &EngineContext, value: Value) -> Result<Self, ConvertError> {
        Ok(value)
    }
}

impl ToKite for Value {
    fn to_kite(self, _cx: &mut EngineContext) -> Result<Value, ConvertError> {
        Ok(self)
    }
}

// Null maps to None, anything else converts
impl<T: FromKite> FromKite for Option<T> {
    fn from_kite(cx: &EngineContext, value: Value) -> Result<Self, ConvertError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_kite(cx, value).map(Some)
        }
    }
}

impl<T: ToKite> ToKite for Option<T> {
    fn to_kite(self, cx: &mut EngineContext) -> Result<Value, ConvertError> {
        match self {
            Some(v) => v.to_kite(cx),
            None => Ok(Value::null()),
        }
    }
}
