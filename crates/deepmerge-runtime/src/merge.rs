//! Deep merge of dynamic values.
//!
//! The `Merge` trait folds values left to right, later values taking
//! precedence. For [`Value`] the rules are:
//!
//! - **Records and known maps**: merged attribute by attribute. The result
//!   is always a record, even when every input was a map.
//! - **Null**: a null overlay wipes out whatever came before it, and its
//!   type is erased.
//! - **Everything else** (strings, numbers, lists, unknown scalars): the
//!   overlay replaces the base wholesale.
//!
//! Unknowns are propagated so that as much shape as possible survives. A
//! record type lists its attribute names even when the record is unknown, so
//! merging an unknown record still yields a known record with unknown
//! attributes. An unknown map hides its keys, so any record merge that
//! involves one collapses to the fully-unresolved value, which in turn
//! absorbs everything merged into it afterwards.
//!
//! # Example
//!
//! ```rust
//! use deepmerge_core::Value;
//! use deepmerge_runtime::Merge;
//!
//! let base = Value::record([("a", Value::string("a value 1"))]);
//! let overlay = Value::record([
//!     ("a", Value::string("a value 2")),
//!     ("b", Value::string("b value")),
//! ]);
//!
//! let merged = base.merge(overlay);
//! assert_eq!(
//!     merged,
//!     Value::record([
//!         ("a", Value::string("a value 2")),
//!         ("b", Value::string("b value")),
//!     ])
//! );
//! ```

use crate::errors::MergeError;
use deepmerge_core::{Type, Value};
use tracing::{debug, trace};

/// Trait for deep merging configuration values.
pub trait Merge: Sized {
    /// Merge `other` into `self`, with `other` taking precedence.
    ///
    /// This consumes both values and returns the merged result.
    fn merge(self, other: Self) -> Self;

    /// Merge multiple overlays in sequence.
    ///
    /// Later overlays take precedence over earlier ones.
    fn merge_all<I>(self, overlays: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        overlays.into_iter().fold(self, |acc, overlay| acc.merge(overlay))
    }
}

impl Merge for Value {
    fn merge(self, other: Self) -> Self {
        merge_pair(self, other)
    }
}

/// Merge a single overlay into a base value. Total: never fails.
pub fn merge_pair(base: Value, overlay: Value) -> Value {
    if base.is_dynamic() {
        // Nothing can be refined once the shape is lost upstream.
        return base;
    }
    if overlay.is_null() {
        return Value::null();
    }

    match overlay {
        Value::Record(attrs) => merge_entries(base, attrs),
        Value::Unknown(Type::Record(types)) => merge_entries(
            base,
            types
                .into_iter()
                .map(|(name, ty)| (name, Value::Unknown(ty))),
        ),
        Value::Map { elements, .. } => merge_entries(base, elements),
        Value::Unknown(Type::Map(element_type)) => {
            trace!(%element_type, "unknown map overlay, result shape is unpredictable");
            Value::dynamic()
        }
        overlay => overlay,
    }
}

/// Merge `(name, value)` entries into whatever attributes `base` has.
///
/// A base that is not record-typed contributes no attributes. An absent
/// attribute merges as the empty record.
fn merge_entries<I>(base: Value, entries: I) -> Value
where
    I: IntoIterator<Item = (String, Value)>,
{
    if let Value::Unknown(Type::Map(element_type)) = &base {
        trace!(%element_type, "unknown map base, result shape is unpredictable");
        return Value::dynamic();
    }

    let mut attrs = base.into_attributes().unwrap_or_default();
    for (name, value) in entries {
        let prior = attrs.remove(&name).unwrap_or_else(Value::empty_record);
        attrs.insert(name, merge_pair(prior, value));
    }
    Value::Record(attrs)
}

/// Fold `values` left to right, starting from the empty record.
///
/// Fails only when `values` is empty.
pub fn merge_all(values: Vec<Value>) -> Result<Value, MergeError> {
    if values.is_empty() {
        return Err(MergeError::Arity);
    }

    debug!(arguments = values.len(), "merging values");
    Ok(Value::empty_record().merge_all(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn s(v: &str) -> Value {
        Value::string(v)
    }

    #[test]
    fn test_dynamic_base_absorbs_everything() {
        let overlay = Value::record([("a", s("x"))]);
        assert_eq!(merge_pair(Value::dynamic(), overlay), Value::dynamic());
        assert_eq!(merge_pair(Value::dynamic(), Value::null()), Value::dynamic());
    }

    #[test]
    fn test_null_overlay_erases_type() {
        let base = Value::record([("a", s("x"))]);
        let merged = merge_pair(base, Value::Null(Type::String));
        assert_eq!(merged, Value::Null(Type::Dynamic));
    }

    #[test]
    fn test_scalar_overlay_replaces() {
        let base = Value::record([("a", s("x"))]);
        assert_eq!(merge_pair(base, Value::number(3)), Value::number(3));
        assert_eq!(
            merge_pair(s("old"), Value::unknown(Type::String)),
            Value::unknown(Type::String)
        );
    }

    #[test]
    fn test_record_over_scalar_starts_fresh() {
        let merged = merge_pair(s("old"), Value::record([("a", s("x"))]));
        assert_eq!(merged, Value::record([("a", s("x"))]));
    }

    #[test]
    fn test_unknown_record_base_keeps_attributes() {
        let base = Value::unknown(Type::record([("a", Type::String), ("b", Type::String)]));
        let merged = merge_pair(base, Value::record([("b", s("b value"))]));
        assert_eq!(
            merged,
            Value::record([
                ("a", Value::unknown(Type::String)),
                ("b", s("b value")),
            ])
        );
    }

    #[test]
    fn test_unknown_map_on_either_side_collapses() {
        let known = Value::record([("a", s("x"))]);
        let unknown_map = Value::unknown(Type::map(Type::String));

        assert_eq!(
            merge_pair(known.clone(), unknown_map.clone()),
            Value::dynamic()
        );
        assert_eq!(merge_pair(unknown_map.clone(), known), Value::dynamic());

        // Wholesale replacement does not depend on the base's keys.
        assert_eq!(merge_pair(unknown_map, s("x")), s("x"));
    }

    #[test]
    fn test_null_base_of_record_type_contributes_nothing() {
        let base = Value::Null(Type::record([("a", Type::String)]));
        let merged = merge_pair(base, Value::record([("b", s("y"))]));
        assert_eq!(merged, Value::record([("b", s("y"))]));
    }

    #[test]
    fn test_merge_trait_matches_fold() {
        let values = vec![
            Value::record([("a", s("1"))]),
            Value::map([("b", s("2"))]),
            Value::record([("a", s("3"))]),
        ];
        let via_trait = Value::empty_record().merge_all(values.clone());
        assert_eq!(merge_all(values).unwrap(), via_trait);
        assert_eq!(via_trait, Value::record([("a", s("3")), ("b", s("2"))]));
    }

    #[test]
    fn test_merge_all_requires_arguments() {
        let err = merge_all(Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "must pass at least one argument");
    }
}
