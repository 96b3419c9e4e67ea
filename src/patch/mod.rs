//! The patch-operation engine.
//!
//! Five operations act on the location a spec resolves to: `set`,
//! `remove`, `insert`, `add`, and `sort`. A [`YamlPatch`] records an
//! ordered list of them and applies the list to a document in strict
//! left-to-right order, each operation observing the tree its
//! predecessors produced. The first failure aborts the pass.
//!
//! # Example
//!
//! ```
//! use yamlpatch::{SetMode, YamlPatch};
//!
//! let (port, _) = yamlpatch::parse_one_node("3000").unwrap();
//! let mut patch = YamlPatch::new();
//! patch.add_set(".server.port", port, SetMode::Existing, false, false);
//! let out = patch
//!     .transform("server:\n  host: localhost\n  port: 8080\n")
//!     .unwrap();
//! assert!(out.contains("port: 3000"));
//! ```

mod ops;

use anyhow::{Context, Result};

use crate::document::node::Node;
use crate::document::parser::parse_document;
use crate::document::render::render_node;
use crate::spec::SpecError;

/// Precondition for `set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetMode {
    /// No precondition.
    #[default]
    Any,
    /// The addressed entry or element must already exist.
    Existing,
    /// The addressed entry must not exist (for sequences: the index must
    /// equal the length, i.e. append).
    NonExisting,
}

/// Precondition for `remove`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemoveMode {
    /// Removing an absent map entry is a silent no-op.
    #[default]
    Any,
    /// The addressed map entry must exist.
    Existing,
}

/// Precondition for `add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddMode {
    /// No precondition.
    #[default]
    Any,
    /// The member must not already exist.
    NonExisting,
}

/// One recorded operation.
#[derive(Debug, Clone)]
enum PatchOp {
    Set {
        spec: String,
        value: Node,
        mode: SetMode,
        comment_original: bool,
        prepend: bool,
    },
    Remove {
        spec: String,
        mode: RemoveMode,
        comment_original: bool,
    },
    Insert {
        spec: String,
        element: Node,
    },
    Add {
        spec: String,
        mode: AddMode,
        prepend: bool,
    },
    Sort {
        spec: String,
        reverse: bool,
    },
}

impl PatchOp {
    fn apply(&self, root: &mut Node) -> Result<(), SpecError> {
        match self {
            PatchOp::Set {
                spec,
                value,
                mode,
                comment_original,
                prepend,
            } => ops::set(root, spec, value.clone(), *mode, *comment_original, *prepend),
            PatchOp::Remove {
                spec,
                mode,
                comment_original,
            } => ops::remove(root, spec, *mode, *comment_original),
            PatchOp::Insert { spec, element } => ops::insert(root, spec, element.clone()),
            PatchOp::Add {
                spec,
                mode,
                prepend,
            } => ops::add(root, spec, *mode, *prepend),
            PatchOp::Sort { spec, reverse } => ops::sort(root, spec, *reverse),
        }
    }
}

/// An ordered list of patch operations applicable to documents.
#[derive(Debug, Clone, Default)]
pub struct YamlPatch {
    ops: Vec<PatchOp>,
}

impl YamlPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a `set`: add or change the addressed map entry or sequence
    /// element.
    ///
    /// With `comment_original`, replacing an existing value attaches the
    /// original entry (rendered as comment lines) to the new key node, or
    /// the replaced element to the sequence's trailing comments. With
    /// `prepend`, a new map entry goes to the front instead of the back.
    pub fn add_set(
        &mut self,
        spec: impl Into<String>,
        value: Node,
        mode: SetMode,
        comment_original: bool,
        prepend: bool,
    ) {
        self.ops.push(PatchOp::Set {
            spec: spec.into(),
            value,
            mode,
            comment_original,
            prepend,
        });
    }

    /// Records a `remove` of the addressed map entry or sequence element.
    pub fn add_remove(
        &mut self,
        spec: impl Into<String>,
        mode: RemoveMode,
        comment_original: bool,
    ) {
        self.ops.push(PatchOp::Remove {
            spec: spec.into(),
            mode,
            comment_original,
        });
    }

    /// Records an `insert` of a new element into the addressed sequence.
    pub fn add_insert(&mut self, spec: impl Into<String>, element: Node) {
        self.ops.push(PatchOp::Insert {
            spec: spec.into(),
            element,
        });
    }

    /// Records an `add` of a member to the addressed mapping (typically a
    /// `!!set`); the member's value is the null scalar.
    pub fn add_add(&mut self, spec: impl Into<String>, mode: AddMode, prepend: bool) {
        self.ops.push(PatchOp::Add {
            spec: spec.into(),
            mode,
            prepend,
        });
    }

    /// Records a `sort` of the addressed sequence or mapping; the empty
    /// spec addresses the document root.
    pub fn add_sort(&mut self, spec: impl Into<String>, reverse: bool) {
        self.ops.push(PatchOp::Sort {
            spec: spec.into(),
            reverse,
        });
    }

    /// Applies the recorded operations to `root` in order, stopping at the
    /// first failure. Operations recorded earlier than the failing one
    /// keep their effect; the failing operation leaves no partial effect.
    pub fn apply(&self, root: &mut Node) -> Result<(), SpecError> {
        for op in &self.ops {
            op.apply(root)?;
        }
        Ok(())
    }

    /// Parses `input`, applies the recorded operations, and renders the
    /// result with comments, terminated by a newline.
    pub fn transform(&self, input: &str) -> Result<String> {
        let mut root = parse_document(input).context("failed to load document")?;
        self.apply(&mut root)?;
        let mut out = render_node(&root, true);
        out.push('\n');
        Ok(out)
    }
}
