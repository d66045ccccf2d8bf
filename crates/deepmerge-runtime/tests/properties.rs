//! Algebraic properties of the merge fold

use deepmerge_core::{Type, Value};
use deepmerge_runtime::{merge_all, merge_pair};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-d]{1,2}"
}

fn scalar_type_strategy() -> impl Strategy<Value = Type> {
    prop_oneof![Just(Type::String), Just(Type::Number), Just(Type::Bool)]
}

/// Strings, numbers, bools and lists: values the merge treats as opaque
fn scalar_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        "[a-z]{0,6}".prop_map(Value::String),
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::Bool),
    ]
    .boxed();
    prop_oneof![
        4 => leaf.clone(),
        1 => prop::collection::vec(leaf, 0..3).prop_map(Value::list),
    ]
}

/// Values that merging into the empty record leaves unchanged: records of
/// scalars, erased nulls, unknown scalars and the fully-unresolved value.
fn normal_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        4 => scalar_strategy(),
        1 => Just(Value::null()),
        1 => scalar_type_strategy().prop_map(Value::Unknown),
        1 => Just(Value::dynamic()),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop::collection::btree_map(name_strategy(), inner, 0..4).prop_map(Value::Record)
    })
}

fn normal_record_strategy() -> impl Strategy<Value = Value> {
    prop::collection::btree_map(name_strategy(), normal_strategy(), 0..4).prop_map(Value::Record)
}

/// Anything at all, including typed nulls, maps and unknown composites
fn any_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        scalar_strategy(),
        scalar_type_strategy().prop_map(Value::Null),
        scalar_type_strategy().prop_map(Value::Unknown),
        Just(Value::dynamic()),
        scalar_type_strategy().prop_map(|t| Value::unknown(Type::map(t))),
        prop::collection::btree_map(name_strategy(), scalar_type_strategy(), 0..3)
            .prop_map(|attrs| Value::unknown(Type::Record(attrs))),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::btree_map(name_strategy(), inner.clone(), 0..4)
                .prop_map(Value::Record),
            prop::collection::btree_map(name_strategy(), inner, 0..4).prop_map(Value::map),
        ]
    })
}

fn contains_map(value: &Value) -> bool {
    match value {
        Value::Map { .. } => true,
        Value::Record(attrs) => attrs.values().any(contains_map),
        _ => false,
    }
}

proptest! {
    #[test]
    fn single_scalar_is_returned_unchanged(v in scalar_strategy()) {
        prop_assert_eq!(merge_all(vec![v.clone()]).unwrap(), v);
    }

    #[test]
    fn single_record_is_returned_unchanged(r in normal_record_strategy()) {
        prop_assert_eq!(merge_all(vec![r.clone()]).unwrap(), r);
    }

    #[test]
    fn single_map_becomes_record(
        elements in prop::collection::btree_map(name_strategy(), normal_strategy(), 0..4),
    ) {
        let map = Value::map(elements.clone());
        prop_assert_eq!(merge_all(vec![map]).unwrap(), Value::Record(elements));
    }

    #[test]
    fn null_overlay_erases_everything(v in any_value_strategy()) {
        // The fully-unresolved value absorbs even a null.
        prop_assume!(!merge_all(vec![v.clone()]).unwrap().is_dynamic());
        prop_assert_eq!(merge_all(vec![v, Value::Null(Type::String)]).unwrap(), Value::null());
    }

    #[test]
    fn dynamic_base_absorbs(v in any_value_strategy()) {
        prop_assert_eq!(merge_pair(Value::dynamic(), v), Value::dynamic());
    }

    #[test]
    fn fold_is_iterated_pairwise_merge(
        a in any_value_strategy(),
        b in any_value_strategy(),
        c in any_value_strategy(),
    ) {
        let expected = merge_pair(
            merge_pair(merge_pair(Value::empty_record(), a.clone()), b.clone()),
            c.clone(),
        );
        prop_assert_eq!(merge_all(vec![a, b, c]).unwrap(), expected);
    }

    #[test]
    fn results_never_contain_maps(
        values in prop::collection::vec(any_value_strategy(), 1..4),
    ) {
        let merged = merge_all(values).unwrap();
        prop_assert!(!contains_map(&merged));
    }

    #[test]
    fn unknown_map_collapses_composite_merges(
        r in normal_record_strategy(),
        element in scalar_type_strategy(),
        rest in prop::collection::vec(any_value_strategy(), 0..3),
    ) {
        let unknown_map = Value::unknown(Type::map(element));
        prop_assert_eq!(merge_pair(r.clone(), unknown_map.clone()), Value::dynamic());
        prop_assert_eq!(merge_pair(unknown_map.clone(), r.clone()), Value::dynamic());

        let mut values = vec![r, unknown_map];
        values.extend(rest);
        prop_assert_eq!(merge_all(values).unwrap(), Value::dynamic());
    }

    #[test]
    fn unknown_record_type_yields_known_shape(
        attrs in prop::collection::btree_map(name_strategy(), scalar_type_strategy(), 0..4),
    ) {
        let merged = merge_all(vec![
            Value::unknown(Type::Record(attrs.clone())),
            Value::empty_record(),
        ])
        .unwrap();

        let expected: BTreeMap<String, Value> = attrs
            .into_iter()
            .map(|(name, ty)| (name, Value::Unknown(ty)))
            .collect();
        prop_assert_eq!(merged, Value::Record(expected));
    }

    #[test]
    fn merging_a_record_with_itself_is_idempotent(r in normal_record_strategy()) {
        prop_assert_eq!(merge_all(vec![r.clone(), r.clone()]).unwrap(), r);
    }
}
