//! Static shape descriptors attached to every value

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Core type representation - algebraic data types
///
/// A type describes what can be known about a value without inspecting it.
/// Records carry their full attribute-name set, maps only their element type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    /// Completely unresolved: even the shape is unknown
    Dynamic,

    /// Primitive types
    String,
    Number,
    Bool,

    /// Compound types
    List(Box<Type>),
    Map(Box<Type>),

    /// Product type with a fixed attribute-name set
    Record(BTreeMap<String, Type>),
}

impl Type {
    /// The record type with no attributes
    pub fn empty_record() -> Self {
        Type::Record(BTreeMap::new())
    }

    /// Build a record type from `(name, type)` pairs
    pub fn record<I, K>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, Type)>,
        K: Into<String>,
    {
        Type::Record(attrs.into_iter().map(|(k, t)| (k.into(), t)).collect())
    }

    pub fn map(element: Type) -> Self {
        Type::Map(Box::new(element))
    }

    pub fn list(element: Type) -> Self {
        Type::List(Box::new(element))
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Type::Dynamic)
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Type::Record(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Type::Map(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Type::List(_))
    }

    /// Declared attributes of a record type
    pub fn attribute_types(&self) -> Option<&BTreeMap<String, Type>> {
        match self {
            Type::Record(attrs) => Some(attrs),
            _ => None,
        }
    }

    /// Element type of a map or list type
    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::Map(element) | Type::List(element) => Some(element),
            _ => None,
        }
    }

    /// Shared type of a sequence of element types, or `Dynamic` when they
    /// disagree. An empty sequence also yields `Dynamic`.
    pub fn common<'a, I>(types: I) -> Type
    where
        I: IntoIterator<Item = &'a Type>,
    {
        let mut iter = types.into_iter();
        let Some(first) = iter.next() else {
            return Type::Dynamic;
        };
        if iter.all(|t| t == first) {
            first.clone()
        } else {
            Type::Dynamic
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Dynamic => write!(f, "dynamic"),
            Type::String => write!(f, "string"),
            Type::Number => write!(f, "number"),
            Type::Bool => write!(f, "bool"),
            Type::List(element) => write!(f, "list({})", element),
            Type::Map(element) => write!(f, "map({})", element),
            Type::Record(attrs) => {
                write!(f, "object({{")?;
                for (i, (name, ty)) in attrs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} = {}", name, ty)?;
                }
                write!(f, "}})")
            }
        }
    }
}
