//! Native module registration
//!
//! A `NativeModule` is the named, versioned bundle of functions an embedder
//! hands to the host to expose a native extension. Functions are defined
//! through the owning context and registered under the name they report.

use crate::function::FunctionRef;
use kite_core::{EngineContext, EngineResult, Value};
use rustc_hash::FxHashMap;

/// Native module definition
#[derive(Debug)]
pub struct NativeModule {
    name: String,
    version: String,
    functions: FxHashMap<String, FunctionRef>,
}

impl NativeModule {
    /// Create a new native module.
    ///
    /// # Arguments
    /// * `name` - Module name (e.g., "function", "objectreference")
    /// * `version` - Semantic version (e.g., "1.0.0")
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        NativeModule {
            name: name.into(),
            version: version.into(),
            functions: FxHashMap::default(),
        }
    }

    /// Define a function in the context and register it under `name`.
    /// The declared name callers later observe is exactly `name`.
    pub fn register<F>(
        &mut self,
        cx: &mut EngineContext,
        name: &str,
        f: F,
    ) -> EngineResult<FunctionRef>
    where
        F: Fn(&mut EngineContext, Value, &[Value]) -> EngineResult<Value> + 'static,
    {
        let func = FunctionRef::new(cx, name, f)?;
        self.functions.insert(name.to_string(), func);
        Ok(func)
    }

    /// Get module name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get module version
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Get a registered function by name
    pub fn get(&self, name: &str) -> Option<FunctionRef> {
        self.functions.get(name).copied()
    }

    /// Get all registered function names
    pub fn function_names(&self) -> Vec<&str> {
        self.functions.keys().map(|s| s.as_str()).collect()
    }

    /// Get number of registered functions
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
}
