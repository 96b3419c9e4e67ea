//! End-to-end tests of the document driver: parse, apply an ordered
//! operation list, render.

use yamlpatch::{parse_document, parse_one_node, RemoveMode, SetMode, YamlPatch};

fn value(text: &str) -> yamlpatch::Node {
    parse_one_node(text).unwrap().0
}

/// A patch with no operations reproduces the document, comments and flow
/// style included.
#[test]
fn test_empty_patch_preserves_document() {
    let input = "a: b\n# Hash Comment\ne:\n- f\n- g\nh:\n  i: !!set\n    j:\n    7:\nf: [1, 2]\n";
    let out = YamlPatch::new().transform(input).unwrap();
    assert_eq!(out, input);
}

/// Removing a nested entry comments out the whole removed subtree.
#[test]
fn test_remove_nested_set_with_comment() {
    let input = "a: b\nc: d\ne:\n- f\n- g\nh:\n  i: !!set\n    j:\n    7:\n";
    let mut patch = YamlPatch::new();
    patch.add_remove(".h.i", RemoveMode::Existing, true);
    let out = patch.transform(input).unwrap();
    assert_eq!(
        out,
        "a: b\nc: d\ne:\n- f\n- g\nh: {}\n  # i: !!set\n  #   j:\n  #   7:\n"
    );
}

/// A member of a set whose key contains spec delimiters is addressed by a
/// flow literal.
#[test]
fn test_remove_set_member_by_composite_literal() {
    let input = "i: !!set\n  j:\n  ? k: l\n    \"x)x\": n\n";
    let mut patch = YamlPatch::new();
    patch.add_remove(".i.({k: l, x)x: n})", RemoveMode::Existing, false);
    let out = patch.transform(input).unwrap();
    assert_eq!(out, "i: !!set\n  j:\n");
}

/// Operations compose strictly left to right, each seeing its
/// predecessor's result.
#[test]
fn test_operations_compose_in_order() {
    let mut patch = YamlPatch::new();
    patch.add_insert(".e[0]", value("x"));
    patch.add_set(".e[1]", value("F"), SetMode::Existing, false, false);
    patch.add_remove(".e[-1]", RemoveMode::Any, false);
    let out = patch.transform("e:\n- f\n- g\n").unwrap();
    assert_eq!(out, "e:\n- x\n- F\n");
}

/// A recorded patch is reusable across documents.
#[test]
fn test_patch_is_reusable() {
    let mut patch = YamlPatch::new();
    patch.add_set(".version", value("2"), SetMode::Any, false, false);
    assert_eq!(patch.transform("version: 1\n").unwrap(), "version: 2\n");
    assert_eq!(
        patch.transform("name: app\n").unwrap(),
        "name: app\nversion: 2\n"
    );
}

/// The first failing operation aborts the pass; earlier operations keep
/// their effect and later ones never run.
#[test]
fn test_failure_stops_the_pass() {
    let mut root = parse_document("a: 1\n").unwrap();
    let mut patch = YamlPatch::new();
    patch.add_set(".b", value("2"), SetMode::Any, false, false);
    patch.add_remove(".zzz", RemoveMode::Existing, false);
    patch.add_set(".c", value("3"), SetMode::Any, false, false);

    let err = patch.apply(&mut root).unwrap_err();
    assert!(err.is_match());

    let map = root.as_mapping().unwrap();
    assert_eq!(map.entries.len(), 2);
    assert_eq!(map.entries[1].0.as_scalar().unwrap().value, "b");
}

/// Failures carry the spec, the offset consumed, and a rendering of the
/// node being matched.
#[test]
fn test_error_diagnostics_pinpoint_the_failure() {
    let mut patch = YamlPatch::new();
    patch.add_remove(".h.x.y", RemoveMode::Existing, false);
    let err = patch
        .transform("h:\n  i: 1\n")
        .unwrap_err()
        .to_string();
    assert!(err.contains("applying spec \".h.x.y\""), "got: {err}");
    assert!(err.contains("offset 4"), "got: {err}");
    assert!(err.contains("{i: 1}"), "got: {err}");
}

/// Aliases resolve for reading but are opaque to path descent.
#[test]
fn test_alias_is_not_descended_into() {
    let mut patch = YamlPatch::new();
    patch.add_remove(".y.k", RemoveMode::Existing, false);
    let err = patch
        .transform("x: &m\n  k: 1\ny: *m\n")
        .unwrap_err()
        .to_string();
    assert!(err.contains("not a mapping nor a sequence"), "got: {err}");
}

/// Anchored definitions keep an anchor through the round trip; alias
/// occurrences stay references.
#[test]
fn test_anchor_and_alias_round_trip() {
    let out = YamlPatch::new().transform("x: &base 1\ny: *base\n").unwrap();
    let reparsed = parse_document(&out).unwrap();
    let map = reparsed.as_mapping().unwrap();
    assert!(map.entries[1].1.is_alias());
}

/// Patched documents stay parseable by the codec itself.
#[test]
fn test_output_reparses() {
    let mut patch = YamlPatch::new();
    patch.add_remove(".c", RemoveMode::Existing, true);
    patch.add_set(".e[0]", value("fff"), SetMode::Existing, true, false);
    patch.add_sort(".m", false);
    let out = patch
        .transform("c: d\ne:\n- f\n- g\nm:\n  b: 2\n  a: 1\n")
        .unwrap();
    assert_eq!(out, "e:\n- fff\n- g\n# - f\nm:\n  a: 1\n  b: 2\n# c: d\n");
    parse_document(&out).unwrap();
}
