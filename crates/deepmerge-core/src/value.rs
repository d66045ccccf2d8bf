//! Dynamically-typed values, possibly unknown, possibly null

use crate::types::Type;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One dynamically-typed datum.
///
/// The serde representation is externally tagged in snake_case and
/// round-trips every variant, including unknowns:
///
/// ```json
/// {"record": {"a": {"string": "x"}, "b": {"unknown": "number"}}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Null of a declared type
    Null(Type),
    /// Content not yet known; the type may still describe the shape
    Unknown(Type),

    String(String),
    Number(serde_json::Number),
    Bool(bool),
    List {
        element_type: Type,
        elements: Vec<Value>,
    },

    /// Known map: the key set is only visible by inspecting the value
    Map {
        element_type: Type,
        elements: BTreeMap<String, Value>,
    },

    /// Known record: the attribute-name set is part of the type
    Record(BTreeMap<String, Value>),
}

impl Value {
    /// The fully-unresolved value: neither content nor shape is known
    pub fn dynamic() -> Self {
        Value::Unknown(Type::Dynamic)
    }

    pub fn unknown(ty: Type) -> Self {
        Value::Unknown(ty)
    }

    /// Null with its type erased
    pub fn null() -> Self {
        Value::Null(Type::Dynamic)
    }

    pub fn empty_record() -> Self {
        Value::Record(BTreeMap::new())
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn number(n: impl Into<serde_json::Number>) -> Self {
        Value::Number(n.into())
    }

    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    /// Build a record from `(name, value)` pairs
    pub fn record<I, K>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Record(attrs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a map whose element type is the common type of its elements
    pub fn map<I, K>(elements: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let elements: BTreeMap<String, Value> =
            elements.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let types: Vec<Type> = elements.values().map(Value::ty).collect();
        Value::Map {
            element_type: Type::common(&types),
            elements,
        }
    }

    pub fn empty_map(element_type: Type) -> Self {
        Value::Map {
            element_type,
            elements: BTreeMap::new(),
        }
    }

    /// Build a list whose element type is the common type of its elements
    pub fn list(elements: Vec<Value>) -> Self {
        let types: Vec<Type> = elements.iter().map(Value::ty).collect();
        Value::List {
            element_type: Type::common(&types),
            elements,
        }
    }

    /// The type of this value.
    pub fn ty(&self) -> Type {
        match self {
            Value::Null(ty) | Value::Unknown(ty) => ty.clone(),
            Value::String(_) => Type::String,
            Value::Number(_) => Type::Number,
            Value::Bool(_) => Type::Bool,
            Value::List { element_type, .. } => Type::list(element_type.clone()),
            Value::Map { element_type, .. } => Type::map(element_type.clone()),
            Value::Record(attrs) => {
                Type::Record(attrs.iter().map(|(k, v)| (k.clone(), v.ty())).collect())
            }
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null(_))
    }

    /// Whether the value itself is known. Nested values may still be unknown.
    pub fn is_known(&self) -> bool {
        !matches!(self, Value::Unknown(_))
    }

    /// Whether this value and everything nested within it is known.
    pub fn is_wholly_known(&self) -> bool {
        match self {
            Value::Unknown(_) => false,
            Value::List { elements, .. } => elements.iter().all(Value::is_wholly_known),
            Value::Map { elements, .. } => elements.values().all(Value::is_wholly_known),
            Value::Record(attrs) => attrs.values().all(Value::is_wholly_known),
            _ => true,
        }
    }

    /// Whether this is the fully-unresolved value.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Value::Unknown(Type::Dynamic))
    }

    /// Number of nested composite levels. Scalars, nulls and unknowns are 0.
    pub fn depth(&self) -> usize {
        let children = match self {
            Value::List { elements, .. } => elements.iter().map(Value::depth).max(),
            Value::Map { elements, .. } => elements.values().map(Value::depth).max(),
            Value::Record(attrs) => attrs.values().map(Value::depth).max(),
            _ => return 0,
        };
        1 + children.unwrap_or(0)
    }

    /// Attribute value of a record-typed value.
    ///
    /// Unknown records yield unknowns of the declared attribute type.
    pub fn get_attr(&self, name: &str) -> Option<Value> {
        match self {
            Value::Record(attrs) => attrs.get(name).cloned(),
            Value::Unknown(Type::Record(types)) => types.get(name).cloned().map(Value::Unknown),
            _ => None,
        }
    }

    /// All attributes of a record-typed value, or `None` for anything else.
    ///
    /// A null record has no attributes to contribute and yields `None`.
    pub fn into_attributes(self) -> Option<BTreeMap<String, Value>> {
        match self {
            Value::Record(attrs) => Some(attrs),
            Value::Unknown(Type::Record(types)) => Some(
                types
                    .into_iter()
                    .map(|(name, ty)| (name, Value::Unknown(ty)))
                    .collect(),
            ),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::null()
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::number(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null(_) => write!(f, "null"),
            Value::Unknown(ty) => write!(f, "unknown({})", ty),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::List { elements, .. } => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            Value::Map { elements, .. } => {
                write!(f, "map")?;
                fmt_entries(f, elements)
            }
            Value::Record(attrs) => fmt_entries(f, attrs),
        }
    }
}

fn fmt_entries(f: &mut fmt::Formatter<'_>, entries: &BTreeMap<String, Value>) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (name, value)) in entries.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{} = {}", name, value)?;
    }
    write!(f, "}}")
}
