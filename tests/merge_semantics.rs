//! Deep merge semantics
//!
//! Pins the observable merge policy: key-wise recursion for objects,
//! index-wise merging for arrays, whole-value replacement for opaque
//! objects, and base-wins when the top-level kinds differ.

use serde_json::{json, Value};

use suitekit::{deep_merge, merge_layers, MergeError, Merger, ValueKind, OPAQUE_TAG};

fn merge(base: Value, overlay: Value) -> Value {
    deep_merge(base, overlay).unwrap()
}

// === Identity ===

#[test]
fn test_merge_empty_object_is_identity() {
    let config = json!({
        "root": "/home/proj",
        "sequence": {"concurrent": true},
        "reporters": ["default", ["nested", 1]]
    });
    assert_eq!(merge(config.clone(), json!({})), config);
}

#[test]
fn test_merge_empty_array_is_identity() {
    let items = json!([1, {"a": 2}, [3]]);
    assert_eq!(merge(items.clone(), json!([])), items);
}

// === Objects ===

#[test]
fn test_scalar_override_wins() {
    assert_eq!(merge(json!({"a": 1}), json!({"a": 2})), json!({"a": 2}));
}

#[test]
fn test_recursive_object_merge() {
    assert_eq!(
        merge(json!({"a": {"b": 1, "c": 2}}), json!({"a": {"b": 9}})),
        json!({"a": {"b": 9, "c": 2}})
    );
}

#[test]
fn test_new_nested_object_inserted_as_is() {
    let overlay = json!({"coverage": {"provider": "v8", "reporter": ["text"]}});
    assert_eq!(merge(json!({"root": "."}), overlay), json!({
        "root": ".",
        "coverage": {"provider": "v8", "reporter": ["text"]}
    }));
}

#[test]
fn test_nested_kind_mismatch_scalar_overlay_wins() {
    assert_eq!(merge(json!({"a": [1, 2]}), json!({"a": "x"})), json!({"a": "x"}));
    assert_eq!(merge(json!({"a": {"b": 1}}), json!({"a": null})), json!({"a": null}));
}

// === Arrays ===

#[test]
fn test_array_index_merge_not_concatenation() {
    assert_eq!(merge(json!({"a": [1, 2, 3]}), json!({"a": [9]})), json!({"a": [9, 2, 3]}));
}

#[test]
fn test_top_level_arrays_merge_by_index() {
    assert_eq!(merge(json!([{"a": 1}, 2]), json!([{"b": 2}])), json!([{"a": 1, "b": 2}, 2]));
}

#[test]
fn test_array_slot_object_meets_scalar_keeps_object() {
    // Slot merge goes through the top-level rule: mismatched kinds keep base
    assert_eq!(merge(json!([{"a": 1}]), json!([5])), json!([{"a": 1}]));
}

// === Top-level asymmetry ===

#[test]
fn test_top_level_mismatch_returns_original_base() {
    assert_eq!(merge(json!([1, 2]), json!({"a": 1})), json!([1, 2]));
    assert_eq!(merge(json!({"a": 1}), json!([1, 2])), json!({"a": 1}));
    assert_eq!(merge(json!(1), json!(2)), json!(1));
    assert_eq!(merge(Value::Null, json!({"a": 1})), Value::Null);
}

// === Opaque objects ===

#[test]
fn test_opaque_object_swapped_whole() {
    let marker = json!({OPAQUE_TAG: "react.element", "x": 5, "props": {}});
    assert_eq!(ValueKind::of(&marker), ValueKind::Opaque);

    let result = merge(json!({"a": {"x": 1, "y": 2}}), json!({"a": marker.clone()}));
    assert_eq!(result, json!({"a": marker}));
}

#[test]
fn test_opaque_object_inserted_for_new_key() {
    let marker = json!({OPAQUE_TAG: 1});
    assert_eq!(merge(json!({}), json!({"m": marker.clone()})), json!({"m": marker}));
}

#[test]
fn test_opaque_base_is_not_merged_into() {
    let marker = json!({OPAQUE_TAG: "component", "x": 1});
    let result = merge(json!({"a": marker.clone()}), json!({"a": {"x": 2}}));
    assert_eq!(result, json!({"a": marker}));
}

// === Layers and limits ===

#[test]
fn test_merge_layers_last_wins() {
    let result = merge_layers(vec![
        json!({"test_timeout_ms": 5000, "reporters": ["default"]}),
        json!({"test_timeout_ms": 100}),
        json!({"reporters": ["junit"]}),
    ])
    .unwrap();

    assert_eq!(result, json!({"test_timeout_ms": 100, "reporters": ["junit"]}));
}

#[test]
fn test_depth_guard_reports_path() {
    let base = json!({"a": {"b": [{"c": {"d": 1}}]}});
    let overlay = json!({"a": {"b": [{"c": {"d": 2}}]}});

    let err = Merger::new().with_max_depth(3).merge(base, overlay).unwrap_err();
    let MergeError::DepthExceeded { limit, path } = err;
    assert_eq!(limit, 3);
    assert_eq!(path, "a.b[0].c");
}

#[test]
fn test_new_key_added_beside_untouched_base_keys() {
    let result = merge(
        json!({"a": {"b": 1}, "z": [1]}),
        json!({"n": {"m": {"k": 1}}}),
    );

    assert_eq!(result, json!({"a": {"b": 1}, "z": [1], "n": {"m": {"k": 1}}}));
    let keys: Vec<&str> = result.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["a", "z", "n"]);
}

#[test]
fn test_overridden_keys_keep_their_position() {
    let result = merge(
        json!({"root": ".", "sequence": {"shuffle": false, "concurrent": false}, "reporters": ["default"]}),
        json!({"sequence": {"concurrent": true}, "root": "/home/proj"}),
    );

    let keys: Vec<&str> = result.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["root", "sequence", "reporters"]);
    let nested: Vec<&str> = result["sequence"].as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(nested, vec!["shuffle", "concurrent"]);
    assert_eq!(result["sequence"]["concurrent"], true);
    assert_eq!(result["reporters"], json!(["default"]));
}
