//! Rendering of document trees back to YAML text.
//!
//! The block renderer honors each container's own flow style and emits the
//! comments attached to nodes; the flow renderer produces a single-line,
//! comment-free form used for diagnostics and for commented-out entries.
//! Output carries no trailing newline; callers terminate the document.

use super::node::{FlowStyle, Node, ScalarNode, ScalarStyle};

const INDENT: &str = "  ";

/// Renders a node as a YAML document fragment.
///
/// Containers marked [`FlowStyle::Flow`] stay on one line; block containers
/// expand to indented lines. With `include_comments` the leading comments
/// of each node and the trailing comments of containers are emitted as
/// `#`-lines.
pub fn render_node(node: &Node, include_comments: bool) -> String {
    let mut renderer = Renderer {
        out: String::new(),
        comments: include_comments,
    };
    renderer.document(node);
    if renderer.out.ends_with('\n') {
        renderer.out.pop();
    }
    renderer.out
}

/// Renders a node on a single line in flow style, without comments.
pub fn render_flow(node: &Node) -> String {
    let mut out = String::new();
    flow(node, &mut out);
    out
}

/// A short diagnostic rendering: flow style, trimmed, truncated.
pub fn summarize(node: &Node) -> String {
    let text = render_flow(node);
    let text = text.trim();
    if text.chars().count() > 30 {
        let head: String = text.chars().take(20).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// True for containers that render as indented block lines.
fn is_block(node: &Node) -> bool {
    match node {
        Node::Sequence(s) => s.flow == FlowStyle::Block && !s.elements.is_empty(),
        Node::Mapping(m) => m.flow == FlowStyle::Block && !m.entries.is_empty(),
        _ => false,
    }
}

/// A plain empty scalar renders as nothing after its key (`key:`).
fn is_empty_scalar(node: &Node) -> bool {
    matches!(node, Node::Scalar(s) if s.value.is_empty() && s.style == ScalarStyle::Plain)
}

fn properties(anchor: &Option<String>, tag: &Option<String>) -> String {
    let mut out = String::new();
    if let Some(a) = anchor {
        out.push('&');
        out.push_str(a);
    }
    if let Some(t) = tag {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str("!!");
        out.push_str(t);
    }
    out
}

fn scalar_text(scalar: &ScalarNode) -> String {
    match scalar.style {
        ScalarStyle::Plain => {
            if scalar.value.contains('\n') {
                double_quoted(&scalar.value)
            } else {
                scalar.value.clone()
            }
        }
        ScalarStyle::SingleQuoted => format!("'{}'", scalar.value.replace('\'', "''")),
        ScalarStyle::DoubleQuoted | ScalarStyle::Literal | ScalarStyle::Folded => {
            double_quoted(&scalar.value)
        }
    }
}

fn double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn flow(node: &Node, out: &mut String) {
    match node {
        Node::Scalar(s) => {
            if let Some(a) = &s.anchor {
                out.push('&');
                out.push_str(a);
                out.push(' ');
            }
            out.push_str(&scalar_text(s));
        }
        Node::Sequence(s) => {
            let props = properties(&s.anchor, &None);
            if !props.is_empty() {
                out.push_str(&props);
                out.push(' ');
            }
            out.push('[');
            for (i, el) in s.elements.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                flow(el, out);
            }
            out.push(']');
        }
        Node::Mapping(m) => {
            let props = properties(&m.anchor, &m.tag);
            if !props.is_empty() {
                out.push_str(&props);
                out.push(' ');
            }
            out.push('{');
            for (i, (k, v)) in m.entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                flow(k, out);
                out.push_str(": ");
                if !is_empty_scalar(v) {
                    flow(v, out);
                }
            }
            out.push('}');
        }
        Node::Anchor(a) => {
            out.push('*');
            out.push_str(&a.name);
        }
    }
}

struct Renderer {
    out: String,
    comments: bool,
}

impl Renderer {
    fn indent(&mut self, level: usize) {
        for _ in 0..level {
            self.out.push_str(INDENT);
        }
    }

    fn comment_lines(&mut self, lines: &[String], level: usize) {
        if !self.comments {
            return;
        }
        for line in lines {
            self.indent(level);
            self.out.push('#');
            self.out.push_str(line);
            self.out.push('\n');
        }
    }

    /// Trailing comments of a container that was rendered inline.
    fn container_trailing(&mut self, node: &Node, level: usize) {
        match node {
            Node::Sequence(s) => self.comment_lines(&s.trailing_comments, level),
            Node::Mapping(m) => self.comment_lines(&m.trailing_comments, level),
            _ => {}
        }
    }

    fn inline(&mut self, node: &Node) {
        let mut line = String::new();
        flow(node, &mut line);
        self.out.push_str(&line);
    }

    fn document(&mut self, node: &Node) {
        self.comment_lines(node.leading_comments(), 0);
        match node {
            Node::Mapping(m) if is_block(node) => {
                let props = properties(&m.anchor, &m.tag);
                if !props.is_empty() {
                    self.out.push_str(&props);
                    self.out.push('\n');
                }
                self.mapping_entries(m, 0, false);
                self.comment_lines(&m.trailing_comments, 0);
            }
            Node::Sequence(s) if is_block(node) => {
                if let Some(a) = &s.anchor {
                    self.out.push('&');
                    self.out.push_str(a);
                    self.out.push('\n');
                }
                self.sequence_elements(s, 0);
                self.comment_lines(&s.trailing_comments, 0);
            }
            _ => {
                self.inline(node);
                self.out.push('\n');
                self.container_trailing(node, 0);
            }
        }
    }

    fn sequence_elements(&mut self, seq: &super::node::SequenceNode, level: usize) {
        for el in &seq.elements {
            self.comment_lines(el.leading_comments(), level);
            match el {
                Node::Mapping(m) if is_block(el) => {
                    let props = properties(&m.anchor, &m.tag);
                    if props.is_empty() {
                        // The first entry shares the `- ` line, so its
                        // comments must come out before it.
                        if let Some((k, v)) = m.entries.first() {
                            self.comment_lines(k.leading_comments(), level);
                            if !is_block(v) {
                                self.comment_lines(v.leading_comments(), level);
                            }
                        }
                    }
                    self.indent(level);
                    self.out.push_str("- ");
                    if props.is_empty() {
                        self.mapping_entries(m, level + 1, true);
                    } else {
                        self.out.push_str(&props);
                        self.out.push('\n');
                        self.mapping_entries(m, level + 1, false);
                    }
                    self.comment_lines(&m.trailing_comments, level + 1);
                }
                Node::Sequence(inner) if is_block(el) => {
                    self.indent(level);
                    self.out.push('-');
                    if let Some(a) = &inner.anchor {
                        self.out.push_str(" &");
                        self.out.push_str(a);
                    }
                    self.out.push('\n');
                    self.sequence_elements(inner, level + 1);
                    self.comment_lines(&inner.trailing_comments, level + 1);
                }
                _ => {
                    self.indent(level);
                    self.out.push_str("- ");
                    self.inline(el);
                    self.out.push('\n');
                    self.container_trailing(el, level);
                }
            }
        }
    }

    fn mapping_entries(
        &mut self,
        map: &super::node::MappingNode,
        level: usize,
        continue_line: bool,
    ) {
        for (i, (key, value)) in map.entries.iter().enumerate() {
            let compact = i == 0 && continue_line;
            if !compact {
                self.comment_lines(key.leading_comments(), level);
                if !is_block(value) {
                    self.comment_lines(value.leading_comments(), level);
                }
                self.indent(level);
            }
            self.inline(key);
            self.out.push(':');
            match value {
                Node::Mapping(vm) if is_block(value) => {
                    let props = properties(&vm.anchor, &vm.tag);
                    if !props.is_empty() {
                        self.out.push(' ');
                        self.out.push_str(&props);
                    }
                    self.out.push('\n');
                    self.comment_lines(&vm.leading_comments, level + 1);
                    self.mapping_entries(vm, level + 1, false);
                    self.comment_lines(&vm.trailing_comments, level + 1);
                }
                Node::Sequence(vs) if is_block(value) => {
                    if let Some(a) = &vs.anchor {
                        self.out.push_str(" &");
                        self.out.push_str(a);
                    }
                    self.out.push('\n');
                    self.comment_lines(&vs.leading_comments, level);
                    self.sequence_elements(vs, level);
                    self.comment_lines(&vs.trailing_comments, level);
                }
                v if is_empty_scalar(v) => {
                    self.out.push('\n');
                }
                v => {
                    self.out.push(' ');
                    self.inline(v);
                    self.out.push('\n');
                    self.container_trailing(v, level + 1);
                }
            }
        }
    }
}
