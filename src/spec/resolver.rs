//! Spec string parsing and resolution against a document tree.
//!
//! A spec addresses one location in the tree, consumed left to right:
//!
//! ```text
//! segment      := mapSegment | indexSegment
//! mapSegment   := '.' identifier | '.(' literal ')'
//! indexSegment := '[' integer? ']'
//! identifier   := [A-Za-z0-9_-]+
//! integer      := '-'? digits      (absent digits address the element
//!                                   one past the end)
//! ```
//!
//! A `.( )` literal is one YAML node read by the document parser; applied
//! to a sequence it addresses the element structurally equal to it rather
//! than an element by position. Resolution of the last segment yields a
//! [`Target`] handed to the active operation: the addressed container plus
//! the key or index, which may not exist yet (absence is meaningful, e.g.
//! for insert-only modes).

use crate::document::compare::structural_eq;
use crate::document::node::{MappingNode, Node, ScalarNode, SequenceNode};
use crate::document::parser::parse_one_node;
use crate::document::render::summarize;

use super::error::SpecError;

/// The location a fully consumed spec addresses.
#[derive(Debug)]
pub enum Target<'a> {
    /// A mapping plus the key literal of the final segment. The key may or
    /// may not be present in the mapping.
    MapEntry {
        map: &'a mut MappingNode,
        key: Node,
    },
    /// A sequence plus the resolved index of the final segment. The index
    /// is not range-checked; range validity is the operation's concern
    /// (appending at the length is valid for some operations).
    SeqElement {
        seq: &'a mut SequenceNode,
        index: isize,
    },
}

/// Diagnostics captured at resolution time, used to wrap failures an
/// operation raises against the target.
#[derive(Debug, Clone)]
pub struct TargetDiag {
    spec: String,
    offset: usize,
    context: String,
}

impl TargetDiag {
    pub fn no_match(&self, message: impl Into<String>) -> SpecError {
        SpecError::no_match(message).wrap(&self.spec, self.offset, &self.context)
    }

    pub fn syntax(&self, message: impl Into<String>) -> SpecError {
        SpecError::syntax(message).wrap(&self.spec, self.offset, &self.context)
    }
}

/// A resolved terminal segment.
#[derive(Debug)]
pub struct Resolved<'a> {
    pub target: Target<'a>,
    pub diag: TargetDiag,
}

/// One parsed path segment.
enum Segment {
    /// `.identifier` or `.(literal)` - a key to look up, or a literal to
    /// match sequence elements against.
    Key(Node),
    /// `[n]` / `[]` - `None` means "current container length".
    Index(Option<isize>),
}

/// What a segment does to the current node, decided before mutation.
#[derive(Clone, Copy)]
enum Plan {
    TerminalMap,
    TerminalSeq(isize),
    DescendEntry(usize),
    DescendElement(usize),
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

/// Parses the segment at `pos`, advancing `pos` past it on success.
fn parse_segment(spec: &str, pos: &mut usize) -> Result<Segment, SpecError> {
    let rest = &spec[*pos..];
    if let Some(after) = rest.strip_prefix(".(") {
        let (key, consumed) = parse_one_node(after)
            .map_err(|e| SpecError::syntax(format!("invalid key literal: {e:#}")))?;
        if !after[consumed..].starts_with(')') {
            return Err(SpecError::syntax(format!(
                "closing parenthesis missing after key \"{}\"",
                summarize(&key)
            )));
        }
        *pos += 2 + consumed + 1;
        Ok(Segment::Key(key))
    } else if let Some(after) = rest.strip_prefix('.') {
        let len = after
            .bytes()
            .take_while(|b| is_identifier_byte(*b))
            .count();
        if len == 0 {
            return Err(SpecError::syntax(format!("invalid spec \"{rest}\"")));
        }
        *pos += 1 + len;
        Ok(Segment::Key(Node::Scalar(ScalarNode::new(&after[..len]))))
    } else if let Some(after) = rest.strip_prefix('[') {
        let Some(end) = after.find(']') else {
            return Err(SpecError::syntax(format!("invalid spec \"{rest}\"")));
        };
        let digits = &after[..end];
        let index = if digits.is_empty() {
            None
        } else {
            match digits.parse::<isize>() {
                Ok(n) => Some(n),
                Err(_) => return Err(SpecError::syntax(format!("invalid spec \"{rest}\""))),
            }
        };
        *pos += 1 + end + 1;
        Ok(Segment::Index(index))
    } else {
        Err(SpecError::syntax(format!("invalid spec \"{rest}\"")))
    }
}

/// Walks the tree from `root` along `spec` and returns the target of the
/// final segment.
///
/// Non-terminal segments must address existing structure; the terminal
/// segment is handed through even when its key or index does not (yet)
/// exist. Aliases are not dereferenced: addressing through one is a match
/// failure.
pub fn resolve<'a>(root: &'a mut Node, spec: &str) -> Result<Resolved<'a>, SpecError> {
    let mut cur: &'a mut Node = root;
    let mut pos = 0usize;
    loop {
        let segment_start = pos;
        let segment = match parse_segment(spec, &mut pos) {
            Ok(segment) => segment,
            Err(e) => return Err(e.wrap(spec, segment_start, &summarize(cur))),
        };
        let terminal = pos == spec.len();

        let plan = match plan_step(cur, &segment, terminal) {
            Ok(plan) => plan,
            Err(e) => return Err(e.wrap(spec, pos, &summarize(cur))),
        };

        let context = match plan {
            Plan::TerminalMap | Plan::TerminalSeq(_) => summarize(cur),
            _ => String::new(),
        };
        cur = match (plan, cur) {
            (Plan::TerminalMap, Node::Mapping(map)) => {
                let Segment::Key(key) = segment else {
                    unreachable!("terminal map plan from a non-key segment")
                };
                return Ok(Resolved {
                    target: Target::MapEntry { map, key },
                    diag: TargetDiag {
                        spec: spec.to_string(),
                        offset: pos,
                        context,
                    },
                });
            }
            (Plan::TerminalSeq(index), Node::Sequence(seq)) => {
                return Ok(Resolved {
                    target: Target::SeqElement { seq, index },
                    diag: TargetDiag {
                        spec: spec.to_string(),
                        offset: pos,
                        context,
                    },
                });
            }
            (Plan::DescendEntry(i), Node::Mapping(map)) => &mut map.entries[i].1,
            (Plan::DescendElement(i), Node::Sequence(seq)) => &mut seq.elements[i],
            _ => unreachable!("plan disagrees with node kind"),
        };
    }
}

/// Decides, without mutating, what `segment` does to `node`.
fn plan_step(node: &Node, segment: &Segment, terminal: bool) -> Result<Plan, SpecError> {
    match segment {
        Segment::Key(key) => match node {
            Node::Mapping(map) => {
                if terminal {
                    return Ok(Plan::TerminalMap);
                }
                match map
                    .entries
                    .iter()
                    .position(|(k, _)| structural_eq(k, key))
                {
                    Some(i) => Ok(Plan::DescendEntry(i)),
                    None => Err(SpecError::no_match(format!(
                        "mapping does not contain key \"{}\"",
                        summarize(key)
                    ))),
                }
            }
            Node::Sequence(seq) => {
                match seq.elements.iter().position(|el| structural_eq(el, key)) {
                    Some(i) if terminal => Ok(Plan::TerminalSeq(i as isize)),
                    Some(i) => Ok(Plan::DescendElement(i)),
                    None => Err(SpecError::no_match(format!(
                        "sequence does not contain an element \"{}\"",
                        summarize(key)
                    ))),
                }
            }
            _ => Err(SpecError::no_match(
                "element is not a mapping nor a sequence",
            )),
        },
        Segment::Index(index) => match node {
            Node::Sequence(seq) => {
                let len = seq.elements.len() as isize;
                let mut index = index.unwrap_or(len);
                if index < 0 {
                    index += len;
                }
                if terminal {
                    Ok(Plan::TerminalSeq(index))
                } else if index < 0 || index >= len {
                    Err(SpecError::no_match(format!(
                        "index {index} is out of range; the sequence has {len} elements"
                    )))
                } else {
                    Ok(Plan::DescendElement(index as usize))
                }
            }
            _ => Err(SpecError::no_match("element is not a sequence")),
        },
    }
}

/// Resolves the whole node a spec addresses, rather than a container/key
/// pair. The empty spec addresses the document root.
pub fn resolve_value<'a>(
    root: &'a mut Node,
    spec: &str,
) -> Result<(&'a mut Node, TargetDiag), SpecError> {
    if spec.is_empty() {
        let diag = TargetDiag {
            spec: String::new(),
            offset: 0,
            context: summarize(root),
        };
        return Ok((root, diag));
    }
    let Resolved { target, diag } = resolve(root, spec)?;
    match target {
        Target::MapEntry { map, key } => {
            match map
                .entries
                .iter()
                .position(|(k, _)| structural_eq(k, &key))
            {
                Some(i) => Ok((&mut map.entries[i].1, diag)),
                None => Err(diag.no_match(format!(
                    "mapping lacks key \"{}\"",
                    summarize(&key)
                ))),
            }
        }
        Target::SeqElement { seq, index } => {
            let len = seq.elements.len() as isize;
            if index < 0 || index >= len {
                return Err(diag.no_match(format!("index {index} is out of range")));
            }
            Ok((&mut seq.elements[index as usize], diag))
        }
    }
}
