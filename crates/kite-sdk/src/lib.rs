//! Kite SDK — binding surface for native extensions
//!
//! This crate is what native code programs against: a call adapter over
//! function values, reference lifetime management, value conversion traits
//! and native module registration. It depends only on `kite-core` and never
//! reaches into engine internals beyond the context's public capability
//! surface.
//!
//! # Example
//!
//! ```ignore
//! use kite_core::{EngineContext, Value};
//! use kite_sdk::{FunctionRef, RefKind, ReferenceRegistry};
//!
//! let mut cx = EngineContext::new();
//!
//! let f = FunctionRef::new(&mut cx, "greet", |cx, _recv, _args| {
//!     cx.create_string("hi")
//! })?;
//! let greeting = f.call(&mut cx, &[])?;
//!
//! let mut registry = ReferenceRegistry::new();
//! registry.set(&mut cx, RefKind::Persistent, "greeting", greeting)?;
//! ```

#![warn(missing_docs)]

pub mod convert;
pub mod error;
pub mod function;
pub mod module;
pub mod reference;
pub mod registry;

pub use convert::{FromKite, ToKite};
pub use error::{ConvertError, RefResult, ReferenceError};
pub use function::FunctionRef;
pub use module::NativeModule;
pub use reference::{RefKind, Reference};
pub use registry::{ReferenceRegistry, Snapshot, COLLECTED_MARKER};
