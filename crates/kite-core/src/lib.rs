//! Kite engine core
//!
//! This crate provides the host side of the Kite binding layer:
//! - NaN-boxed value representation with slot handles
//! - Slot-table heap with pinning and deterministic mark-sweep collection
//! - Dynamic object model (arrays, boxed strings, objects, native functions)
//! - Polymorphic invocation with explicit call modes
//!
//! Collection is explicit-only: heap entries are reclaimed solely inside
//! `EngineContext::collect`, so weak-reference loss is observable at
//! well-defined points.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod call;
pub mod context;
pub mod gc;
pub mod object;
pub mod value;

pub use call::Invocation;
pub use context::{ContextId, EngineContext, EngineOptions, ResourceLimits};
pub use gc::{GarbageCollector, GcStats, Heap, HeapStats, RootSet, Slot};
pub use object::{Array, Function, HeapObject, KiteString, NativeFn, Object, PropKey};
pub use value::Value;

/// Engine errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    /// A value had the wrong type for an operation
    #[error("Type error: expected {expected}, got {got}")]
    TypeError {
        /// Expected type name
        expected: String,
        /// Actual type name
        got: String,
    },

    /// The heap entry limit was reached
    #[error("Heap entry limit exceeded ({limit})")]
    HeapLimitExceeded {
        /// The configured limit
        limit: usize,
    },

    /// A handle referred to a slot that has been collected
    #[error("Dangling handle: slot {0} has been collected")]
    DanglingHandle(u32),

    /// An index was past the end of an array
    #[error("Index {index} out of bounds (length: {len})")]
    IndexOutOfBounds {
        /// The offending index
        index: usize,
        /// The array length
        len: usize,
    },

    /// Other runtime failure
    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

/// Engine operation result
pub type EngineResult<T> = Result<T, EngineError>;
