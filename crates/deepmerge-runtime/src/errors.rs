//! Error types for merge calls and function dispatch.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of the variadic merge fold.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("must pass at least one argument")]
    Arity,
}

/// A structured error returned to the caller of a registered function.
///
/// `argument` names the zero-based argument at fault, when there is one.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct FunctionError {
    pub message: String,
    pub argument: Option<usize>,
}

impl FunctionError {
    /// An error that is not attributable to a single argument.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            argument: None,
        }
    }

    /// An error about the argument at `index`.
    pub fn argument(index: usize, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            argument: Some(index),
        }
    }

    pub fn unknown_function(name: &str) -> Self {
        Self::new(format!("unknown function {:?}", name))
    }
}

impl From<MergeError> for FunctionError {
    fn from(error: MergeError) -> Self {
        Self::new(error.to_string())
    }
}
