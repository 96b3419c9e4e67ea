//! YAML parsing with comment and style preservation.
//!
//! Lexing is delegated to `yaml-rust2`; this module listens to its marked
//! event stream and builds [`Node`] trees, reattaching whole-line comments
//! (which the event stream does not carry) by line position, detecting each
//! container's flow style from the source, and resolving aliases to owned
//! copies of their anchored nodes.
//!
//! # Example
//!
//! ```
//! use yamlpatch::document::parser::parse_document;
//!
//! let root = parse_document("a: b\nc: d\n").unwrap();
//! assert_eq!(root.as_mapping().unwrap().entries.len(), 2);
//! ```

use std::collections::HashMap;

use anyhow::{anyhow, bail, Context, Result};
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

use super::node::{AnchorNode, FlowStyle, MappingNode, Node, ScalarNode, ScalarStyle, SequenceNode};

/// Parses a complete document into its root node.
///
/// Exactly one document is read; comments and per-node flow style are
/// preserved as node metadata. Inline (end-of-line) comments are not
/// extracted.
pub fn parse_document(text: &str) -> Result<Node> {
    let mut loader = Loader::new(text);
    let mut parser = Parser::new_from_str(text);
    parser
        .load(&mut loader, false)
        .context("failed to parse YAML document")?;
    loader.finish()
}

/// Parses exactly one node from a prefix of `text`, returning the node and
/// the number of bytes consumed.
///
/// The prefix extent follows flow-context rules: quoted scalars, balanced
/// flow collections (quote-aware, so delimiters inside quoted strings do
/// not count), alias references, and plain scalars terminated by `)`, `,`,
/// `]`, `}`, `: `, ` #`, a line break, or the end of the buffer. Callers
/// embedding a node in a larger grammar continue parsing at the returned
/// offset.
pub fn parse_one_node(text: &str) -> Result<(Node, usize)> {
    let consumed = node_extent(text)?;
    let slice = &text[..consumed];
    if slice.trim().is_empty() {
        bail!("expected a YAML node");
    }
    let node = parse_document(slice)?;
    Ok((node, consumed))
}

struct Loader<'a> {
    source: &'a str,
    /// Whole-line comments, as (1-based line, text after `#`) pairs.
    comments: Vec<(usize, String)>,
    next_comment: usize,
    stack: Vec<Frame>,
    anchors: HashMap<usize, Node>,
    root: Option<Node>,
    error: Option<anyhow::Error>,
}

enum Frame {
    Sequence { node: SequenceNode, aid: usize },
    Mapping {
        node: MappingNode,
        aid: usize,
        pending_key: Option<Node>,
    },
}

impl<'a> Loader<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            comments: collect_comments(source),
            next_comment: 0,
            stack: Vec::new(),
            anchors: HashMap::new(),
            root: None,
            error: None,
        }
    }

    /// Drains the comments that appear on lines before `line`.
    fn take_comments(&mut self, line: usize) -> Vec<String> {
        let mut taken = Vec::new();
        while self.next_comment < self.comments.len() && self.comments[self.next_comment].0 < line {
            taken.push(self.comments[self.next_comment].1.clone());
            self.next_comment += 1;
        }
        taken
    }

    /// Flow containers start at their opening bracket; anything else is
    /// block form.
    fn flow_at(&self, mark: Marker, open: u8) -> FlowStyle {
        if self.source.as_bytes().get(mark.index()) == Some(&open) {
            FlowStyle::Flow
        } else {
            FlowStyle::Block
        }
    }

    fn insert(&mut self, node: Node, aid: usize) {
        if aid > 0 {
            self.anchors.insert(aid, node.clone());
        }
        match self.stack.last_mut() {
            Some(Frame::Sequence { node: seq, .. }) => seq.elements.push(node),
            Some(Frame::Mapping {
                node: map,
                pending_key,
                ..
            }) => match pending_key.take() {
                None => *pending_key = Some(node),
                Some(key) => map.entries.push((key, node)),
            },
            None => {
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
        }
    }

    fn finish(mut self) -> Result<Node> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let mut root = self
            .root
            .take()
            .ok_or_else(|| anyhow!("document contains no YAML node"))?;
        // Comments after the last content line belong to the root container.
        let rest: Vec<String> = self.comments.split_off(self.next_comment).into_iter()
            .map(|(_, text)| text)
            .collect();
        if !rest.is_empty() {
            match &mut root {
                Node::Mapping(m) => m.trailing_comments.extend(rest),
                Node::Sequence(s) => s.trailing_comments.extend(rest),
                _ => {}
            }
        }
        Ok(root)
    }
}

impl MarkedEventReceiver for Loader<'_> {
    fn on_event(&mut self, ev: Event, mark: Marker) {
        if self.error.is_some() {
            return;
        }
        match ev {
            Event::Scalar(value, style, aid, tag) => {
                let leading = self.take_comments(mark.line());
                let node = Node::Scalar(ScalarNode {
                    value,
                    tag: shorthand_tag(tag),
                    style: convert_style(style),
                    anchor: anchor_name(aid),
                    leading_comments: leading,
                });
                self.insert(node, aid);
            }
            // Container starts leave pending comments for their first
            // child; a comment above a block container's first line
            // belongs to the entry that follows it.
            Event::SequenceStart(aid, _) => {
                self.stack.push(Frame::Sequence {
                    node: SequenceNode {
                        elements: Vec::new(),
                        flow: self.flow_at(mark, b'['),
                        anchor: anchor_name(aid),
                        leading_comments: Vec::new(),
                        trailing_comments: Vec::new(),
                    },
                    aid,
                });
            }
            Event::SequenceEnd => match self.stack.pop() {
                Some(Frame::Sequence { node, aid }) => self.insert(Node::Sequence(node), aid),
                _ => self.error = Some(anyhow!("unbalanced sequence end event")),
            },
            Event::MappingStart(aid, tag) => {
                self.stack.push(Frame::Mapping {
                    node: MappingNode {
                        entries: Vec::new(),
                        tag: shorthand_tag(tag),
                        flow: self.flow_at(mark, b'{'),
                        anchor: anchor_name(aid),
                        leading_comments: Vec::new(),
                        trailing_comments: Vec::new(),
                    },
                    aid,
                    pending_key: None,
                });
            }
            Event::MappingEnd => match self.stack.pop() {
                Some(Frame::Mapping { node, aid, .. }) => self.insert(Node::Mapping(node), aid),
                _ => self.error = Some(anyhow!("unbalanced mapping end event")),
            },
            Event::Alias(aid) => match self.anchors.get(&aid) {
                Some(referent) => {
                    let node = Node::Anchor(AnchorNode {
                        name: anchor_label(aid),
                        referent: Box::new(referent.clone()),
                    });
                    self.insert(node, 0);
                }
                None => self.error = Some(anyhow!("alias references an unknown anchor")),
            },
            // Stream and document markers carry nothing this model tracks.
            _ => {}
        }
    }
}

fn anchor_label(aid: usize) -> String {
    format!("a{aid}")
}

fn anchor_name(aid: usize) -> Option<String> {
    (aid > 0).then(|| anchor_label(aid))
}

fn convert_style(style: TScalarStyle) -> ScalarStyle {
    match style {
        TScalarStyle::SingleQuoted => ScalarStyle::SingleQuoted,
        TScalarStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
        TScalarStyle::Literal => ScalarStyle::Literal,
        TScalarStyle::Folded => ScalarStyle::Folded,
        _ => ScalarStyle::Plain,
    }
}

/// Core-schema tags keep their shorthand suffix (`set`, `null`, `str`);
/// application-specific tags are not round-tripped.
fn shorthand_tag(tag: Option<Tag>) -> Option<String> {
    let tag = tag?;
    if tag.handle == "tag:yaml.org,2002:" || tag.handle == "!!" {
        Some(tag.suffix)
    } else {
        None
    }
}

/// Collects whole-line comments: lines whose first non-blank character is
/// `#`. The stored text is everything after the `#`.
fn collect_comments(source: &str) -> Vec<(usize, String)> {
    source
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let trimmed = line.trim_start();
            trimmed
                .strip_prefix('#')
                .map(|text| (i + 1, text.to_string()))
        })
        .collect()
}

/// Determines how many bytes of `text` one flow-context node occupies.
fn node_extent(text: &str) -> Result<usize> {
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
        i += 1;
    }

    // Node properties: anchors and tags precede the node content.
    while matches!(bytes.get(i).copied(), Some(b'&') | Some(b'!')) {
        while i < bytes.len() && !matches!(bytes[i], b' ' | b'\t' | b'\n' | b'\r') {
            i += 1;
        }
        while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
            i += 1;
        }
    }

    match bytes.get(i).copied() {
        Some(b'*') => {
            i += 1;
            while i < bytes.len()
                && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'-')
            {
                i += 1;
            }
            Ok(i)
        }
        Some(b'{') | Some(b'[') => balanced_extent(bytes, i),
        Some(b'"') => quoted_extent(bytes, i, b'"'),
        Some(b'\'') => quoted_extent(bytes, i, b'\''),
        _ => Ok(plain_extent(bytes, i)),
    }
}

/// Scans past a balanced flow collection starting at an opening bracket.
fn balanced_extent(bytes: &[u8], start: usize) -> Result<usize> {
    let mut depth = 0usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => i = quoted_extent(bytes, i, b'"')?,
            b'\'' => i = quoted_extent(bytes, i, b'\'')?,
            b'{' | b'[' => {
                depth += 1;
                i += 1;
            }
            b'}' | b']' => {
                depth -= 1;
                i += 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => i += 1,
        }
    }
    bail!("unterminated flow collection");
}

/// Scans past a quoted scalar starting at its opening quote.
fn quoted_extent(bytes: &[u8], start: usize, quote: u8) -> Result<usize> {
    let mut i = start + 1;
    while i < bytes.len() {
        if bytes[i] == b'\\' && quote == b'"' {
            i += 2;
        } else if bytes[i] == quote {
            if quote == b'\'' && bytes.get(i + 1) == Some(&b'\'') {
                i += 2;
            } else {
                return Ok(i + 1);
            }
        } else {
            i += 1;
        }
    }
    bail!("unterminated quoted scalar");
}

/// Scans a plain scalar using flow-context terminators, trimming trailing
/// blanks from the extent.
fn plain_extent(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b')' | b',' | b']' | b'}' | b'\n' | b'\r' => break,
            b':' if matches!(bytes.get(i + 1).copied(), None | Some(b' ') | Some(b'\t')) => break,
            b'#' if i > start && bytes[i - 1] == b' ' => break,
            _ => i += 1,
        }
    }
    while i > start && (bytes[i - 1] == b' ' || bytes[i - 1] == b'\t') {
        i -= 1;
    }
    i
}
