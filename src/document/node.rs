//! YAML node representation with comment and style metadata.
//!
//! Every value in a document is a [`Node`]: a scalar, a sequence, a mapping,
//! or an alias occurrence. Containers own their children exclusively; the
//! only indirection is [`AnchorNode`], which holds an owned copy of the
//! node its alias refers to. Comments and flow style are carried on the
//! nodes themselves so that a patched document can be re-rendered with its
//! formatting intact.
//!
//! # Example
//!
//! ```
//! use yamlpatch::{MappingNode, Node};
//!
//! let map = MappingNode::new(vec![(
//!     Node::scalar("name"),
//!     Node::scalar("yamlpatch"),
//! )]);
//! let node = Node::Mapping(map);
//! assert!(node.is_mapping());
//! ```

/// Rendering style of a container: multi-line block form or single-line
/// flow form (`[a, b]`, `{a: b}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowStyle {
    #[default]
    Block,
    Flow,
}

/// Quoting style of a scalar as it appeared in the source.
///
/// `Literal` and `Folded` block scalars keep their parsed value but are
/// re-emitted double-quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalarStyle {
    #[default]
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

/// The four node kinds, in comparison rank order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NodeKind {
    Scalar,
    Sequence,
    Mapping,
    Anchor,
}

/// A leaf value. Structural equality and ordering look at `value` only;
/// `tag` and `style` are rendering metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarNode {
    pub value: String,
    /// Shorthand tag suffix (`"set"`, `"null"`, ...), if the scalar was
    /// explicitly tagged.
    pub tag: Option<String>,
    pub style: ScalarStyle,
    pub anchor: Option<String>,
    pub leading_comments: Vec<String>,
}

impl ScalarNode {
    /// A plain untagged scalar.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            tag: None,
            style: ScalarStyle::Plain,
            anchor: None,
            leading_comments: Vec::new(),
        }
    }

    /// The empty null scalar used as the placeholder value of set members.
    pub fn null() -> Self {
        Self {
            value: String::new(),
            tag: Some("null".to_string()),
            style: ScalarStyle::Plain,
            anchor: None,
            leading_comments: Vec::new(),
        }
    }
}

/// An ordered list of elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SequenceNode {
    pub elements: Vec<Node>,
    pub flow: FlowStyle,
    pub anchor: Option<String>,
    pub leading_comments: Vec<String>,
    pub trailing_comments: Vec<String>,
}

impl SequenceNode {
    pub fn new(elements: Vec<Node>) -> Self {
        Self {
            elements,
            ..Self::default()
        }
    }
}

/// An ordered list of key/value entries.
///
/// Duplicate keys are permitted and never deduplicated; lookups always
/// resolve to the first entry whose key matches. A `tag` of `"set"` marks
/// the mapping as being used as a membership set (keys with null values).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MappingNode {
    pub entries: Vec<(Node, Node)>,
    pub tag: Option<String>,
    pub flow: FlowStyle,
    pub anchor: Option<String>,
    pub leading_comments: Vec<String>,
    pub trailing_comments: Vec<String>,
}

impl MappingNode {
    pub fn new(entries: Vec<(Node, Node)>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }
}

/// An alias occurrence (`*name`). The referent is an owned copy of the
/// anchored node, keeping tree ownership single and acyclic.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorNode {
    pub name: String,
    pub referent: Box<Node>,
}

/// A node in a YAML document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(ScalarNode),
    Sequence(SequenceNode),
    Mapping(MappingNode),
    Anchor(AnchorNode),
}

impl Node {
    /// A plain string scalar.
    pub fn scalar(value: impl Into<String>) -> Self {
        Node::Scalar(ScalarNode::new(value))
    }

    /// The null scalar placeholder.
    pub fn null_scalar() -> Self {
        Node::Scalar(ScalarNode::null())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Scalar(_) => NodeKind::Scalar,
            Node::Sequence(_) => NodeKind::Sequence,
            Node::Mapping(_) => NodeKind::Mapping,
            Node::Anchor(_) => NodeKind::Anchor,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Node::Sequence(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, Node::Anchor(_))
    }

    pub fn as_scalar(&self) -> Option<&ScalarNode> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&SequenceNode> {
        match self {
            Node::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&MappingNode> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// The comment lines rendered immediately before this node.
    ///
    /// For an alias the comments live on the referent.
    pub fn leading_comments_mut(&mut self) -> &mut Vec<String> {
        match self {
            Node::Scalar(s) => &mut s.leading_comments,
            Node::Sequence(s) => &mut s.leading_comments,
            Node::Mapping(m) => &mut m.leading_comments,
            Node::Anchor(a) => a.referent.leading_comments_mut(),
        }
    }

    pub fn leading_comments(&self) -> &[String] {
        match self {
            Node::Scalar(s) => &s.leading_comments,
            Node::Sequence(s) => &s.leading_comments,
            Node::Mapping(m) => &m.leading_comments,
            Node::Anchor(a) => a.referent.leading_comments(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_rank_order() {
        assert!(NodeKind::Scalar < NodeKind::Sequence);
        assert!(NodeKind::Sequence < NodeKind::Mapping);
        assert!(NodeKind::Mapping < NodeKind::Anchor);
    }

    #[test]
    fn test_scalar_constructor() {
        let node = Node::scalar("hello");
        assert!(node.is_scalar());
        assert_eq!(node.as_scalar().unwrap().value, "hello");
        assert_eq!(node.as_scalar().unwrap().style, ScalarStyle::Plain);
    }

    #[test]
    fn test_null_scalar() {
        let node = Node::null_scalar();
        let scalar = node.as_scalar().unwrap();
        assert!(scalar.value.is_empty());
        assert_eq!(scalar.tag.as_deref(), Some("null"));
    }

    #[test]
    fn test_mapping_allows_duplicate_keys() {
        let map = MappingNode::new(vec![
            (Node::scalar("a"), Node::scalar("1")),
            (Node::scalar("a"), Node::scalar("2")),
        ]);
        assert_eq!(map.entries.len(), 2);
    }

    #[test]
    fn test_leading_comments_through_alias() {
        let mut node = Node::Anchor(AnchorNode {
            name: "a1".to_string(),
            referent: Box::new(Node::scalar("x")),
        });
        node.leading_comments_mut().push(" note".to_string());
        assert_eq!(node.leading_comments(), &[" note".to_string()]);
    }
}
