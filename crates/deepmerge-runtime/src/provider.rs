//! The function registry: an immutable name -> spec table.
//!
//! A [`Provider`] is built once at startup and then only read, so it can be
//! shared between concurrent call handlers behind an `Arc` without locking.
//!
//! ```rust
//! use deepmerge_core::Value;
//! use deepmerge_runtime::Provider;
//!
//! let provider = Provider::standard();
//! let merged = provider
//!     .call("merge_objects", vec![
//!         Value::record([("a", Value::string("1"))]),
//!         Value::record([("b", Value::string("2"))]),
//!     ])
//!     .unwrap();
//! assert_eq!(
//!     merged,
//!     Value::record([("a", Value::string("1")), ("b", Value::string("2"))])
//! );
//! ```

use crate::errors::FunctionError;
use crate::function::{merge_objects, FunctionSignature, FunctionSpec, MERGE_OBJECTS};
use deepmerge_core::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Collects function specs before freezing them into a [`Provider`].
#[derive(Debug, Default)]
pub struct ProviderBuilder {
    functions: BTreeMap<String, FunctionSpec>,
}

impl ProviderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `spec` under `name`, replacing any earlier registration.
    pub fn add_function(mut self, name: impl Into<String>, spec: FunctionSpec) -> Self {
        self.functions.insert(name.into(), spec);
        self
    }

    pub fn build(self) -> Provider {
        Provider {
            functions: self.functions,
        }
    }
}

#[derive(Debug)]
pub struct Provider {
    functions: BTreeMap<String, FunctionSpec>,
}

impl Provider {
    pub fn builder() -> ProviderBuilder {
        ProviderBuilder::new()
    }

    /// The provider with every built-in function registered.
    pub fn standard() -> Self {
        Self::builder()
            .add_function(MERGE_OBJECTS, merge_objects())
            .build()
    }

    pub fn function(&self, name: &str) -> Option<&FunctionSpec> {
        self.functions.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn signatures(&self) -> Vec<FunctionSignature> {
        self.functions
            .iter()
            .map(|(name, spec)| spec.signature(name))
            .collect()
    }

    /// Look up `name` and call it with `args`.
    pub fn call(&self, name: &str, args: Vec<Value>) -> Result<Value, FunctionError> {
        let spec = self
            .function(name)
            .ok_or_else(|| FunctionError::unknown_function(name))?;
        debug!(function = name, arguments = args.len(), "calling function");
        spec.call(args)
    }

    /// A callable bound to one function name.
    pub fn call_stub<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Fn(Vec<Value>) -> Result<Value, FunctionError> + 'a {
        move |args| self.call(name, args)
    }
}

impl Default for Provider {
    fn default() -> Self {
        Self::standard()
    }
}
