//! Deepmerge Runtime Library
//!
//! This crate provides the merge engine and the function registry that
//! exposes it to callers:
//!
//! - **Merge trait**: Deep merging of dynamic values, records and maps
//!   merged attribute by attribute, unknowns propagated conservatively
//! - **Function specs**: Parameter checks and the `merge_objects` function
//! - **Provider**: An immutable name -> function table built at startup
//! - **Error types**: The arity error and structured function errors
//!
//! # Example
//!
//! ```rust
//! use deepmerge_core::{Type, Value};
//! use deepmerge_runtime::merge_all;
//!
//! let merged = merge_all(vec![
//!     Value::record([("a", Value::string("a1")), ("b", Value::string("b1"))]),
//!     Value::unknown(Type::map(Type::String)),
//! ])
//! .unwrap();
//!
//! // An unknown map hides its keys, so nothing can be predicted.
//! assert!(merged.is_dynamic());
//! ```

mod errors;
mod function;
mod merge;
mod provider;

// Re-export public types
pub use errors::{FunctionError, MergeError};
pub use function::{
    merge_objects, FunctionImpl, FunctionSignature, FunctionSpec, Parameter, MERGE_OBJECTS,
};
pub use merge::{merge_all, merge_pair, Merge};
pub use provider::{Provider, ProviderBuilder};
