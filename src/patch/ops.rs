//! The individual patch operations.
//!
//! Each operation resolves its spec to a [`Target`] and mutates the
//! addressed container through index-based splices on its entry/element
//! list. Mode preconditions are checked before any mutation, so a failing
//! operation leaves the tree untouched.

use std::cmp::Ordering;

use crate::document::compare::{node_cmp, structural_eq};
use crate::document::node::{FlowStyle, MappingNode, Node, SequenceNode};
use crate::document::render::{render_node, summarize};
use crate::spec::resolver::{resolve, resolve_value, Target};
use crate::spec::SpecError;

use super::{AddMode, RemoveMode, SetMode};

/// Adds or changes a map entry or sequence element.
pub(crate) fn set(
    root: &mut Node,
    spec: &str,
    value: Node,
    mode: SetMode,
    comment_original: bool,
    prepend: bool,
) -> Result<(), SpecError> {
    let resolved = resolve(root, spec)?;
    match resolved.target {
        Target::MapEntry { map, key } => {
            let existing = map
                .entries
                .iter()
                .position(|(k, _)| structural_eq(k, &key));
            match mode {
                SetMode::Existing if existing.is_none() => {
                    return Err(resolved.diag.no_match(format!(
                        "entry key \"{}\" does not exist",
                        summarize(&key)
                    )));
                }
                SetMode::NonExisting if existing.is_some() => {
                    return Err(resolved.diag.no_match(format!(
                        "entry key \"{}\" already exists",
                        summarize(&key)
                    )));
                }
                _ => {}
            }
            match existing {
                Some(i) => {
                    let mut key = key;
                    if comment_original {
                        let original = single_entry_mapping(map.entries[i].clone(), map.flow);
                        comment_out(&original, key.leading_comments_mut());
                    }
                    map.entries[i] = (key, value);
                }
                None if prepend => map.entries.insert(0, (key, value)),
                None => map.entries.push((key, value)),
            }
        }
        Target::SeqElement { seq, index } => {
            let len = seq.elements.len() as isize;
            match mode {
                SetMode::Existing if index < 0 || index >= len => {
                    return Err(resolved
                        .diag
                        .no_match(format!("index {index} is out of range")));
                }
                SetMode::NonExisting if index != len => {
                    return Err(resolved.diag.no_match(format!(
                        "index {index} does not equal the sequence length {len}"
                    )));
                }
                _ => {}
            }
            if index == len {
                seq.elements.push(value);
            } else if (0..len).contains(&index) {
                let previous = std::mem::replace(&mut seq.elements[index as usize], value);
                if comment_original {
                    let original = single_element_sequence(previous, seq.flow);
                    comment_out(&original, &mut seq.trailing_comments);
                }
            } else {
                return Err(resolved
                    .diag
                    .no_match(format!("index {index} is out of range")));
            }
        }
    }
    Ok(())
}

/// Removes a map entry or sequence element.
pub(crate) fn remove(
    root: &mut Node,
    spec: &str,
    mode: RemoveMode,
    comment_original: bool,
) -> Result<(), SpecError> {
    let resolved = resolve(root, spec)?;
    match resolved.target {
        Target::MapEntry { map, key } => {
            match map
                .entries
                .iter()
                .position(|(k, _)| structural_eq(k, &key))
            {
                Some(i) => {
                    let entry = map.entries.remove(i);
                    if comment_original {
                        let original = single_entry_mapping(entry, map.flow);
                        comment_out(&original, &mut map.trailing_comments);
                    }
                }
                None => {
                    if mode == RemoveMode::Existing {
                        return Err(resolved.diag.no_match(format!(
                            "key \"{}\" does not exist",
                            summarize(&key)
                        )));
                    }
                }
            }
        }
        Target::SeqElement { seq, index } => {
            let len = seq.elements.len() as isize;
            if index < 0 || index >= len {
                return Err(resolved
                    .diag
                    .no_match(format!("sequence index {index} is out of range")));
            }
            let previous = seq.elements.remove(index as usize);
            if comment_original {
                let original = single_element_sequence(previous, seq.flow);
                comment_out(&original, &mut seq.trailing_comments);
            }
        }
    }
    Ok(())
}

/// Inserts an element into a sequence, shifting subsequent elements.
pub(crate) fn insert(root: &mut Node, spec: &str, element: Node) -> Result<(), SpecError> {
    let resolved = resolve(root, spec)?;
    match resolved.target {
        Target::MapEntry { .. } => Err(resolved
            .diag
            .no_match("cannot insert into a mapping; use set or add instead")),
        Target::SeqElement { seq, index } => {
            let len = seq.elements.len() as isize;
            if index < 0 || index > len {
                return Err(resolved
                    .diag
                    .no_match(format!("sequence index {index} is out of range")));
            }
            seq.elements.insert(index as usize, element);
            Ok(())
        }
    }
}

/// Adds a member to a mapping used as a set: the key gets a null value.
pub(crate) fn add(
    root: &mut Node,
    spec: &str,
    mode: AddMode,
    prepend: bool,
) -> Result<(), SpecError> {
    let resolved = resolve(root, spec)?;
    match resolved.target {
        Target::MapEntry { map, key } => {
            let existing = map
                .entries
                .iter()
                .position(|(k, _)| structural_eq(k, &key));
            if mode == AddMode::NonExisting && existing.is_some() {
                return Err(resolved.diag.no_match(format!(
                    "key \"{}\" already exists",
                    summarize(&key)
                )));
            }
            match existing {
                Some(i) => map.entries[i].1 = Node::null_scalar(),
                None if prepend => map.entries.insert(0, (key, Node::null_scalar())),
                None => map.entries.push((key, Node::null_scalar())),
            }
            Ok(())
        }
        Target::SeqElement { .. } => Err(resolved
            .diag
            .no_match("cannot add to a sequence; use insert instead")),
    }
}

/// Sorts the addressed sequence's elements, or the addressed mapping's
/// entries as `(key, value)` tuples. The empty spec sorts the root.
pub(crate) fn sort(root: &mut Node, spec: &str, reverse: bool) -> Result<(), SpecError> {
    let (node, diag) = resolve_value(root, spec)?;
    match node {
        Node::Sequence(seq) => {
            seq.elements.sort_by(|a, b| orient(node_cmp(a, b), reverse));
            Ok(())
        }
        Node::Mapping(map) => {
            map.entries.sort_by(|(ka, va), (kb, vb)| {
                orient(node_cmp(ka, kb).then_with(|| node_cmp(va, vb)), reverse)
            });
            Ok(())
        }
        other => {
            let kind = if other.is_alias() { "alias" } else { "scalar" };
            Err(diag.syntax(format!(
                "cannot sort {kind} \"{}\", only sequences and mappings",
                summarize(other)
            )))
        }
    }
}

fn orient(ordering: Ordering, reverse: bool) -> Ordering {
    if reverse {
        ordering.reverse()
    } else {
        ordering
    }
}

fn single_entry_mapping(entry: (Node, Node), flow: FlowStyle) -> Node {
    Node::Mapping(MappingNode {
        entries: vec![entry],
        flow,
        ..MappingNode::default()
    })
}

fn single_element_sequence(element: Node, flow: FlowStyle) -> Node {
    Node::Sequence(SequenceNode {
        elements: vec![element],
        flow,
        ..SequenceNode::default()
    })
}

/// Renders a node without comments in its ambient flow style and appends
/// the rendered lines, one comment line each, to `dest`. Lines already in
/// `dest` are kept.
pub(crate) fn comment_out(node: &Node, dest: &mut Vec<String>) {
    let rendered = render_node(node, false);
    for line in rendered.lines() {
        dest.push(format!(" {line}"));
    }
}
