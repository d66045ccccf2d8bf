//! Function specifications: parameters, argument checks, implementation.

use crate::errors::FunctionError;
use crate::merge::merge_all;
use deepmerge_core::{Type, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Name under which [`merge_objects`] is registered.
pub const MERGE_OBJECTS: &str = "merge_objects";

/// Implementation of a function, called with already-checked arguments.
pub type FunctionImpl = fn(Vec<Value>) -> Result<Value, FunctionError>;

/// A single (positional or variadic) parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    pub ty: Type,
    /// Null arguments are passed through instead of rejected
    pub allow_null: bool,
    /// Unknown arguments are passed through instead of short-circuiting
    pub allow_unknown: bool,
    /// Fully-unresolved arguments are passed through instead of short-circuiting
    pub allow_dynamic_type: bool,
}

impl Parameter {
    /// A parameter that rejects nulls and short-circuits on unknowns.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            ty,
            allow_null: false,
            allow_unknown: false,
            allow_dynamic_type: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Accept null, unknown and fully-unresolved arguments.
    pub fn permissive(mut self) -> Self {
        self.allow_null = true;
        self.allow_unknown = true;
        self.allow_dynamic_type = true;
        self
    }
}

/// What a caller needs to know about a function without calling it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub name: String,
    pub description: String,
    pub parameters: Vec<Parameter>,
    pub variadic_parameter: Option<Parameter>,
    pub return_type: Type,
}

#[derive(Debug, Clone)]
pub struct FunctionSpec {
    pub description: String,
    pub params: Vec<Parameter>,
    pub var_param: Option<Parameter>,
    /// Declared result type. `Dynamic` when the result carries its own shape.
    pub return_type: Type,
    pub implementation: FunctionImpl,
}

/// Outcome of checking one argument against its parameter.
enum ArgumentCheck {
    Pass,
    ShortCircuit(Value),
}

impl FunctionSpec {
    /// Check `args` against the parameters, then run the implementation.
    ///
    /// An unknown argument for a parameter that does not allow unknowns
    /// skips the call and yields an unknown of the return type.
    pub fn call(&self, args: Vec<Value>) -> Result<Value, FunctionError> {
        self.check_arity(args.len())?;

        let mut short_circuit = None;
        for (index, arg) in args.iter().enumerate() {
            let param = self
                .params
                .get(index)
                .or(self.var_param.as_ref())
                .ok_or_else(|| FunctionError::argument(index, "unexpected argument"))?;

            if let ArgumentCheck::ShortCircuit(result) = self.check_argument(param, index, arg)? {
                // Keep checking: a later null is still an error.
                short_circuit.get_or_insert(result);
            }
        }

        if let Some(result) = short_circuit {
            debug!(%result, "skipping call with unknown arguments");
            return Ok(result);
        }
        (self.implementation)(args)
    }

    fn check_arity(&self, count: usize) -> Result<(), FunctionError> {
        let required = self.params.len();
        if count < required {
            return Err(FunctionError::new(format!(
                "not enough arguments: expected {}, got {}",
                required, count
            )));
        }
        if self.var_param.is_none() && count > required {
            return Err(FunctionError::argument(
                required,
                format!("too many arguments: expected {}, got {}", required, count),
            ));
        }
        Ok(())
    }

    fn check_argument(
        &self,
        param: &Parameter,
        index: usize,
        arg: &Value,
    ) -> Result<ArgumentCheck, FunctionError> {
        if arg.is_null() && !param.allow_null {
            return Err(FunctionError::argument(
                index,
                format!("argument {:?} must not be null", param.name),
            ));
        }
        if arg.is_dynamic() && !param.allow_dynamic_type {
            return Ok(ArgumentCheck::ShortCircuit(Value::dynamic()));
        }
        if !arg.is_known() && !param.allow_unknown {
            return Ok(ArgumentCheck::ShortCircuit(Value::Unknown(
                self.return_type.clone(),
            )));
        }
        Ok(ArgumentCheck::Pass)
    }

    pub fn signature(&self, name: &str) -> FunctionSignature {
        FunctionSignature {
            name: name.to_string(),
            description: self.description.clone(),
            parameters: self.params.clone(),
            variadic_parameter: self.var_param.clone(),
            return_type: self.return_type.clone(),
        }
    }
}

/// Recursively merges an object and other objects nested directly within it.
///
/// The declared result type stays `dynamic`: whether maps are involved, and
/// which keys they carry, is only known once the arguments are.
pub fn merge_objects() -> FunctionSpec {
    FunctionSpec {
        description: "Recursively merges an object and other objects nested directly within it."
            .to_string(),
        params: Vec::new(),
        var_param: Some(
            Parameter::new("val", Type::Dynamic)
                .with_description("An object, map, or other value to merge in")
                .permissive(),
        ),
        return_type: Type::Dynamic,
        implementation: merge_objects_impl,
    }
}

fn merge_objects_impl(args: Vec<Value>) -> Result<Value, FunctionError> {
    Ok(merge_all(args)?)
}
