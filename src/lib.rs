//! yamlpatch - locate and mutate single nodes in YAML documents.
//!
//! A spec string addresses one location in a parsed document tree
//! (`.server.port`, `.e[0]`, `.members.({k: l})`); the patch operations -
//! set, remove, insert, add, sort - act on the resolved location and can
//! record what they overwrote as comment lines on the surviving container.
//! The tree keeps comments and flow style as node metadata, so a patched
//! document renders with its formatting intact.
//!
//! # Example
//!
//! ```
//! use yamlpatch::{RemoveMode, YamlPatch};
//!
//! let mut patch = YamlPatch::new();
//! patch.add_remove(".c", RemoveMode::Existing, true);
//! let out = patch.transform("a: b\nc: d\n").unwrap();
//! assert_eq!(out, "a: b\n# c: d\n");
//! ```

pub mod document;
pub mod patch;
pub mod spec;

pub use document::compare::{node_cmp, structural_eq};
pub use document::node::{
    AnchorNode, FlowStyle, MappingNode, Node, NodeKind, ScalarNode, ScalarStyle, SequenceNode,
};
pub use document::parser::{parse_document, parse_one_node};
pub use document::render::{render_flow, render_node, summarize};
pub use patch::{AddMode, RemoveMode, SetMode, YamlPatch};
pub use spec::SpecError;
