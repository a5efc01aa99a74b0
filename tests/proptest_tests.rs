//! Property-based tests for Groundwork using proptest.
//!
//! Random trees and type descriptors exercise the laws the hand-written
//! tests only spot-check:
//! - Deep merge identities (empty overlay, empty base, idempotence)
//! - Totality of type coercion over arbitrary value/descriptor pairs
//! - Serialization round trips for plain trees
//! - Redaction and name sanitization invariants

use std::collections::HashMap;

use indexmap::IndexSet;
use proptest::collection::vec;
use proptest::prelude::*;

use groundwork::coerce::{convert, convert_map_types, TypeDescriptor};
use groundwork::config::deep_merge;
use groundwork::credentials::redact_tree;
use groundwork::naming::{sanitize_name, MAX_NAME_LEN};
use groundwork::value::{ConfigValue, Mapping};

// ============================================================================
// Strategies for generating test data
// ============================================================================

/// Strategy for generating mapping keys.
fn config_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_-]{0,15}").unwrap()
}

/// Strategy for generating scalar values. Floats stay finite so equality
/// assertions behave.
fn scalar_value() -> impl Strategy<Value = ConfigValue> {
    prop_oneof![
        Just(ConfigValue::Null),
        any::<bool>().prop_map(ConfigValue::Bool),
        any::<i64>().prop_map(ConfigValue::Integer),
        (-1.0e9..1.0e9f64).prop_map(ConfigValue::Float),
        "[a-zA-Z0-9_ .-]{0,20}".prop_map(ConfigValue::String),
    ]
}

/// Strategy for generating arbitrary configuration trees.
fn config_value() -> impl Strategy<Value = ConfigValue> {
    scalar_value().prop_recursive(
        3,  // depth
        32, // max nodes
        8,  // items per collection
        |inner| {
            prop_oneof![
                vec(inner.clone(), 0..6).prop_map(ConfigValue::Sequence),
                vec((config_key(), inner), 0..6).prop_map(|pairs| {
                    let mut map = Mapping::new();
                    for (k, v) in pairs {
                        map.insert(ConfigValue::String(k), v);
                    }
                    ConfigValue::Mapping(map)
                }),
            ]
        },
    )
}

/// Strategy for generating mapping-rooted trees, the shape stack files take.
fn config_mapping() -> impl Strategy<Value = ConfigValue> {
    vec((config_key(), config_value()), 0..8).prop_map(|pairs| {
        let mut map = Mapping::new();
        for (k, v) in pairs {
            map.insert(ConfigValue::String(k), v);
        }
        ConfigValue::Mapping(map)
    })
}

/// Strategy for generating type descriptors, containers included.
fn descriptor() -> impl Strategy<Value = TypeDescriptor> {
    let leaf = prop_oneof![
        Just(TypeDescriptor::string()),
        Just(TypeDescriptor::integer()),
        Just(TypeDescriptor::float()),
        Just(TypeDescriptor::boolean()),
        Just(TypeDescriptor::decimal()),
        Just(TypeDescriptor::date()),
        Just(TypeDescriptor::datetime()),
    ];

    leaf.prop_recursive(2, 8, 2, |inner| {
        prop_oneof![
            Just(TypeDescriptor::untyped_list()),
            Just(TypeDescriptor::untyped_set()),
            Just(TypeDescriptor::untyped_dict()),
            inner.clone().prop_map(TypeDescriptor::list),
            inner.clone().prop_map(TypeDescriptor::set),
            (inner.clone(), inner.clone())
                .prop_map(|(k, v)| TypeDescriptor::dict(k, v)),
            inner.prop_map(TypeDescriptor::optional),
        ]
    })
}

fn top_level_keys(tree: &ConfigValue) -> Vec<ConfigValue> {
    tree.as_mapping()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}

// ============================================================================
// DEEP MERGE PROPERTIES
// ============================================================================

mod merging {
    use super::*;

    proptest! {
        /// Property: merging never panics, whatever the operand shapes.
        #[test]
        fn merge_never_panics(base in config_value(), overlay in config_value()) {
            let _ = deep_merge(&base, &overlay);
        }

        /// Property: an empty overlay leaves a mapping base untouched.
        #[test]
        fn empty_overlay_is_identity(base in config_mapping()) {
            let empty = ConfigValue::Mapping(Mapping::new());
            prop_assert_eq!(deep_merge(&base, &empty), base);
        }

        /// Property: an empty base takes the overlay wholesale.
        #[test]
        fn empty_base_yields_overlay(overlay in config_mapping()) {
            let empty = ConfigValue::Mapping(Mapping::new());
            prop_assert_eq!(deep_merge(&empty, &overlay), overlay);
        }

        /// Property: applying the same overlay twice changes nothing.
        #[test]
        fn merge_is_idempotent(base in config_mapping(), overlay in config_mapping()) {
            let once = deep_merge(&base, &overlay);
            let twice = deep_merge(&once, &overlay);
            prop_assert_eq!(twice, once);
        }

        /// Property: non-mapping overlay values win at the top level.
        #[test]
        fn overlay_scalars_win(base in config_mapping(), overlay in config_mapping()) {
            let merged = deep_merge(&base, &overlay);
            let overlay_map = overlay.as_mapping().unwrap();
            let merged_map = merged.as_mapping().unwrap();
            for (key, value) in overlay_map {
                if value.as_mapping().is_none() {
                    prop_assert_eq!(merged_map.get(key), Some(value));
                }
            }
        }

        /// Property: the merged tree keeps every key from both sides.
        #[test]
        fn merged_keys_cover_both_sides(base in config_mapping(), overlay in config_mapping()) {
            let merged = deep_merge(&base, &overlay);
            let merged_keys: IndexSet<ConfigValue> =
                top_level_keys(&merged).into_iter().collect();
            for key in top_level_keys(&base) {
                prop_assert!(merged_keys.contains(&key));
            }
            for key in top_level_keys(&overlay) {
                prop_assert!(merged_keys.contains(&key));
            }
        }
    }
}

// ============================================================================
// COERCION PROPERTIES
// ============================================================================

mod conversion {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(512))]

        /// Property: conversion is total; it never panics, it only
        /// returns absence.
        #[test]
        fn convert_never_panics(value in config_value(), target in descriptor()) {
            let _ = convert(&value, &target);
        }

        /// Property: null converts to nothing, whatever the target.
        #[test]
        fn null_is_always_absent(target in descriptor()) {
            prop_assert_eq!(convert(&ConfigValue::Null, &target), None);
        }

        /// Property: a successful conversion is a fixed point; converting
        /// the output again yields the output.
        #[test]
        fn conversion_is_idempotent(value in config_value(), target in descriptor()) {
            if let Some(converted) = convert(&value, &target) {
                prop_assert_eq!(convert(&converted, &target), Some(converted.clone()));
            }
        }

        /// Property: every non-null value has a string rendering.
        #[test]
        fn non_null_values_always_stringify(value in config_value()) {
            prop_assume!(!value.is_null());
            prop_assert!(convert(&value, &TypeDescriptor::string()).is_some());
        }

        /// Property: whitespace-only strings never become numbers.
        #[test]
        fn blank_strings_yield_absence(ws in "[ \\t\\r\\n]{0,8}") {
            let blank = ConfigValue::String(ws);
            prop_assert_eq!(convert(&blank, &TypeDescriptor::integer()), None);
            prop_assert_eq!(convert(&blank, &TypeDescriptor::float()), None);
            prop_assert_eq!(convert(&blank, &TypeDescriptor::decimal()), None);
        }

        /// Property: integers survive a round trip through their string
        /// rendering.
        #[test]
        fn integers_round_trip_through_strings(i in any::<i64>()) {
            let text = ConfigValue::String(i.to_string());
            prop_assert_eq!(
                convert(&text, &TypeDescriptor::integer()),
                Some(ConfigValue::Integer(i))
            );
        }

        /// Property: set conversion yields pairwise-distinct elements drawn
        /// from the input.
        #[test]
        fn set_output_is_deduplicated(items in vec(scalar_value(), 0..12)) {
            let input = ConfigValue::Sequence(items.clone());
            if let Some(ConfigValue::Sequence(out)) =
                convert(&input, &TypeDescriptor::untyped_set())
            {
                let unique: IndexSet<&ConfigValue> = out.iter().collect();
                prop_assert_eq!(unique.len(), out.len());
                for element in &out {
                    prop_assert!(items.contains(element));
                }
            }
        }
    }
}

// ============================================================================
// MAPPING CONVERSION PROPERTIES
// ============================================================================

mod map_conversion {
    use super::*;

    proptest! {
        /// Property: with no hints, field-wise conversion is the identity.
        #[test]
        fn no_hints_is_identity(tree in config_mapping()) {
            let map = tree.as_mapping().unwrap();
            let converted = convert_map_types(map, &HashMap::new());
            prop_assert_eq!(&converted, map);
        }

        /// Property: hinted conversion preserves the key set and order even
        /// when every coercion fails.
        #[test]
        fn hints_never_change_the_key_set(tree in config_mapping()) {
            let map = tree.as_mapping().unwrap();
            let hints: HashMap<String, TypeDescriptor> = map
                .keys()
                .filter_map(ConfigValue::as_str)
                .map(|name| (name.to_string(), TypeDescriptor::integer()))
                .collect();

            let converted = convert_map_types(map, &hints);
            let before: Vec<&ConfigValue> = map.keys().collect();
            let after: Vec<&ConfigValue> = converted.keys().collect();
            prop_assert_eq!(before, after);
        }
    }
}

// ============================================================================
// SERIALIZATION PROPERTIES
// ============================================================================

mod serialization {
    use super::*;

    proptest! {
        /// Property: plain trees survive a YAML round trip.
        #[test]
        fn yaml_round_trip(tree in config_mapping()) {
            let text = serde_yaml::to_string(&tree).unwrap();
            let parsed: ConfigValue = serde_yaml::from_str(&text).unwrap();
            prop_assert_eq!(parsed, tree);
        }

        /// Property: plain trees survive a JSON round trip.
        #[test]
        fn json_round_trip(tree in config_mapping()) {
            let text = serde_json::to_string(&tree).unwrap();
            let parsed: ConfigValue = serde_json::from_str(&text).unwrap();
            prop_assert_eq!(parsed, tree);
        }
    }
}

// ============================================================================
// REDACTION PROPERTIES
// ============================================================================

mod redaction {
    use super::*;

    proptest! {
        /// Property: redacting twice is the same as redacting once.
        #[test]
        fn redaction_is_idempotent(tree in config_value()) {
            let once = redact_tree(&tree);
            let twice = redact_tree(&once);
            prop_assert_eq!(twice, once);
        }

        /// Property: redaction never adds, drops, or reorders mapping keys.
        #[test]
        fn redaction_preserves_keys(tree in config_mapping()) {
            let redacted = redact_tree(&tree);
            prop_assert_eq!(top_level_keys(&redacted), top_level_keys(&tree));
        }
    }
}

// ============================================================================
// NAMING PROPERTIES
// ============================================================================

mod naming {
    use super::*;

    proptest! {
        /// Property: sanitized names contain only lowercase alphanumerics
        /// and single interior dashes, within the length limit.
        #[test]
        fn sanitized_names_are_well_formed(raw in "\\PC{0,200}") {
            let name = sanitize_name(&raw);
            prop_assert!(name.len() <= MAX_NAME_LEN);
            prop_assert!(name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!name.starts_with('-'));
            prop_assert!(!name.ends_with('-'));
            prop_assert!(!name.contains("--"));
        }

        /// Property: sanitization is idempotent.
        #[test]
        fn sanitize_is_idempotent(raw in "\\PC{0,200}") {
            let once = sanitize_name(&raw);
            prop_assert_eq!(sanitize_name(&once), once);
        }
    }
}
