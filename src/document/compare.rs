//! Structural equality and total ordering over nodes.
//!
//! Both routines ignore comments, tags, styles, and anchors on the nodes
//! they compare; only values and structure matter. Equality backs key and
//! member lookup during spec resolution, the ordering backs the sort
//! operation.

use std::cmp::Ordering;

use super::node::Node;

/// Deep, position-sensitive equality.
///
/// Two nodes are equal iff they are the same kind and:
///
/// * scalars: the values are equal (tag and style are ignored);
/// * sequences: same length and pairwise equal by position;
/// * mappings: same length and, at each position, both key and value are
///   equal. Entries are compared positionally, not by key lookup; this
///   tests whole-subtree equality, not key membership.
///
/// Any combination involving an alias, or mismatched kinds, is unequal.
pub fn structural_eq(a: &Node, b: &Node) -> bool {
    match (a, b) {
        (Node::Scalar(x), Node::Scalar(y)) => x.value == y.value,
        (Node::Sequence(x), Node::Sequence(y)) => {
            x.elements.len() == y.elements.len()
                && x.elements
                    .iter()
                    .zip(&y.elements)
                    .all(|(p, q)| structural_eq(p, q))
        }
        (Node::Mapping(x), Node::Mapping(y)) => {
            x.entries.len() == y.entries.len()
                && x.entries
                    .iter()
                    .zip(&y.entries)
                    .all(|((ka, va), (kb, vb))| structural_eq(ka, kb) && structural_eq(va, vb))
        }
        _ => false,
    }
}

/// Total order over nodes.
///
/// Nodes of different kinds order by kind rank (scalar < sequence <
/// mapping < alias). Scalars compare lexically by value; sequences
/// element-wise; mappings positionally as `(key, value)` tuples with the
/// key compared first and the value as tie-break. When one collection is
/// a strict prefix of the other, the shorter one sorts first. Aliases
/// compare by their dereferenced referents.
pub fn node_cmp(a: &Node, b: &Node) -> Ordering {
    let rank = a.kind().cmp(&b.kind());
    if rank != Ordering::Equal {
        return rank;
    }
    match (a, b) {
        (Node::Scalar(x), Node::Scalar(y)) => x.value.cmp(&y.value),
        (Node::Sequence(x), Node::Sequence(y)) => {
            cmp_elementwise(&x.elements, &y.elements, node_cmp)
        }
        (Node::Mapping(x), Node::Mapping(y)) => {
            cmp_elementwise(&x.entries, &y.entries, |(ka, va), (kb, vb)| {
                node_cmp(ka, kb).then_with(|| node_cmp(va, vb))
            })
        }
        (Node::Anchor(x), Node::Anchor(y)) => node_cmp(&x.referent, &y.referent),
        _ => Ordering::Equal,
    }
}

/// Compares two slices element by element; if all shared elements are
/// equal the shorter slice is less than the longer.
fn cmp_elementwise<T>(a: &[T], b: &[T], cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        let result = cmp(x, y);
        if result != Ordering::Equal {
            return result;
        }
    }
    a.len().cmp(&b.len())
}
