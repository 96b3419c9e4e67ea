//! Integration tests for the set operation.

use yamlpatch::{parse_document, parse_one_node, structural_eq, SetMode, YamlPatch};

fn value(text: &str) -> yamlpatch::Node {
    parse_one_node(text).unwrap().0
}

/// Replacing an existing map entry keeps the document shape.
#[test]
fn test_set_replaces_existing_map_entry() {
    let mut patch = YamlPatch::new();
    patch.add_set(".c", value("ddd"), SetMode::Existing, false, false);
    let out = patch.transform("a: b\nc: d\n").unwrap();
    assert_eq!(out, "a: b\nc: ddd\n");
}

/// Replacing with comment synthesis attaches the original entry to the
/// new key node, rendered before the entry line.
#[test]
fn test_set_comments_out_original_entry() {
    let mut patch = YamlPatch::new();
    patch.add_set(".c", value("ddd"), SetMode::Existing, true, false);
    let out = patch.transform("a: b\nc: d\n").unwrap();
    assert_eq!(out, "a: b\n# c: d\nc: ddd\n");
}

/// A missing key is appended at the back, or at the front with prepend.
#[test]
fn test_set_inserts_missing_key_back_or_front() {
    let mut patch = YamlPatch::new();
    patch.add_set(".z", value("1"), SetMode::Any, false, false);
    assert_eq!(patch.transform("a: b\n").unwrap(), "a: b\nz: 1\n");

    let mut patch = YamlPatch::new();
    patch.add_set(".z", value("1"), SetMode::Any, false, true);
    assert_eq!(patch.transform("a: b\n").unwrap(), "z: 1\na: b\n");
}

/// Nested specs address entries deep in the tree.
#[test]
fn test_set_nested_entry() {
    let mut patch = YamlPatch::new();
    patch.add_set(".server.port", value("3000"), SetMode::Existing, false, false);
    let out = patch
        .transform("server:\n  host: localhost\n  port: 8080\n")
        .unwrap();
    assert_eq!(out, "server:\n  host: localhost\n  port: 3000\n");
}

/// Replacing a sequence element; the replaced element is commented out
/// after the sequence.
#[test]
fn test_set_sequence_element_with_comment() {
    let mut patch = YamlPatch::new();
    patch.add_set(".e[0]", value("fff"), SetMode::Existing, true, false);
    let out = patch.transform("e:\n- f\n- g\n").unwrap();
    assert_eq!(out, "e:\n- fff\n- g\n# - f\n");
}

/// Setting at the sequence length appends.
#[test]
fn test_set_appends_at_sequence_length() {
    let mut patch = YamlPatch::new();
    patch.add_set(".e[2]", value("h"), SetMode::Any, false, false);
    let out = patch.transform("e:\n- f\n- g\n").unwrap();
    assert_eq!(out, "e:\n- f\n- g\n- h\n");
}

/// `[]` is equivalent to the explicit current-length index.
#[test]
fn test_set_empty_index_equals_length_index() {
    let input = "e:\n- f\n- g\n";
    let mut a = YamlPatch::new();
    a.add_set(".e[]", value("v"), SetMode::Any, false, false);
    let mut b = YamlPatch::new();
    b.add_set(".e[2]", value("v"), SetMode::Any, false, false);
    assert_eq!(a.transform(input).unwrap(), b.transform(input).unwrap());
}

/// Negative indices count from the end.
#[test]
fn test_set_negative_index() {
    let mut patch = YamlPatch::new();
    patch.add_set(".e[-1]", value("x"), SetMode::Existing, false, false);
    let out = patch.transform("e:\n- f\n- g\n- h\n").unwrap();
    assert_eq!(out, "e:\n- f\n- g\n- x\n");
}

/// EXISTING requires a present entry.
#[test]
fn test_set_existing_mode_requires_match() {
    let mut patch = YamlPatch::new();
    patch.add_set(".zzz", value("1"), SetMode::Existing, false, false);
    let err = patch.transform("a: b\n").unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

/// NON_EXISTING failure leaves the document structurally unchanged,
/// comments included.
#[test]
fn test_set_non_existing_violation_leaves_tree_unchanged() {
    let mut root = parse_document("x: 1\ny: 2\n").unwrap();
    let before = root.clone();
    let mut patch = YamlPatch::new();
    patch.add_set(".x", value("9"), SetMode::NonExisting, true, false);
    let err = patch.apply(&mut root).unwrap_err();
    assert!(err.is_match());
    assert!(err.message().contains("already exists"));
    assert_eq!(root, before);
}

/// NON_EXISTING on a sequence only accepts the append position.
#[test]
fn test_set_non_existing_sequence_requires_append_index() {
    let mut patch = YamlPatch::new();
    patch.add_set(".e[0]", value("x"), SetMode::NonExisting, false, false);
    assert!(patch.transform("e:\n- f\n").unwrap_err().to_string().contains("does not equal"));

    let mut patch = YamlPatch::new();
    patch.add_set(".e[1]", value("x"), SetMode::NonExisting, false, false);
    assert_eq!(patch.transform("e:\n- f\n").unwrap(), "e:\n- f\n- x\n");
}

/// Applying the same EXISTING set twice converges on the same value; the
/// second synthesized comment documents the new value itself.
#[test]
fn test_set_existing_is_idempotent() {
    let mut patch = YamlPatch::new();
    patch.add_set(".a", value("v"), SetMode::Existing, true, false);
    let once = patch.transform("a: x\n").unwrap();
    assert_eq!(once, "# a: x\na: v\n");
    let twice = patch.transform(&once).unwrap();
    assert_eq!(twice, "# a: v\na: v\n");
}

/// Composite values parsed from text keep their flow style when set.
#[test]
fn test_set_composite_value() {
    let mut patch = YamlPatch::new();
    patch.add_set(".c", value("{x: 1, y: 2}"), SetMode::Any, false, false);
    let out = patch.transform("a: b\n").unwrap();
    assert_eq!(out, "a: b\nc: {x: 1, y: 2}\n");

    let reparsed = parse_document(&out).unwrap();
    let expected = parse_document("a: b\nc:\n  x: 1\n  y: 2\n").unwrap();
    assert!(structural_eq(&reparsed, &expected));
}

/// A key literal addresses entries whose keys are not identifiers.
#[test]
fn test_set_literal_key() {
    let mut patch = YamlPatch::new();
    patch.add_set(".(\"x y\")", value("2"), SetMode::Existing, false, false);
    let out = patch.transform("\"x y\": 1\n").unwrap();
    assert_eq!(out, "\"x y\": 2\n");
}
