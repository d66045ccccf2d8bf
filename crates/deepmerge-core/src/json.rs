//! Conversions between values and plain JSON.
//!
//! Plain JSON has no notion of unknown values or of map-versus-record, so
//! the mapping is lossy in one direction:
//!
//! - JSON objects become records, arrays become lists, `null` becomes an
//!   untyped null.
//! - Records and maps both render as JSON objects. Unknown values cannot be
//!   rendered and fail with [`CoreError::UnknownValue`].
//!
//! The typed encoding (serde on [`Value`]) is lossless and is what crosses
//! the call boundary.

use crate::error::CoreError;
use crate::value::Value;
use std::collections::BTreeMap;

impl Value {
    /// Interpret a plain JSON document as a value.
    pub fn from_json(json: serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::null(),
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::list(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(fields) => Value::Record(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Render as plain JSON. Fails if anything nested is unknown.
    pub fn to_json(&self) -> Result<serde_json::Value, CoreError> {
        let mut path = String::from("$");
        to_json_at(self, &mut path)
    }

    /// Decode the lossless typed encoding.
    pub fn from_typed_json(s: &str) -> Result<Value, CoreError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Encode with the lossless typed encoding.
    pub fn to_typed_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }
}

fn to_json_at(value: &Value, path: &mut String) -> Result<serde_json::Value, CoreError> {
    Ok(match value {
        Value::Null(_) => serde_json::Value::Null,
        Value::Unknown(_) => {
            return Err(CoreError::UnknownValue { path: path.clone() });
        }
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Number(n) => serde_json::Value::Number(n.clone()),
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::List { elements, .. } => {
            let mut items = Vec::with_capacity(elements.len());
            for (i, element) in elements.iter().enumerate() {
                let len = path.len();
                path.push_str(&format!("[{}]", i));
                items.push(to_json_at(element, path)?);
                path.truncate(len);
            }
            serde_json::Value::Array(items)
        }
        Value::Map { elements, .. } => object_at(elements, path)?,
        Value::Record(attrs) => object_at(attrs, path)?,
    })
}

fn object_at(
    entries: &BTreeMap<String, Value>,
    path: &mut String,
) -> Result<serde_json::Value, CoreError> {
    let mut fields = serde_json::Map::new();
    for (name, value) in entries {
        let len = path.len();
        path.push('.');
        path.push_str(name);
        fields.insert(name.clone(), to_json_at(value, path)?);
        path.truncate(len);
    }
    Ok(serde_json::Value::Object(fields))
}
