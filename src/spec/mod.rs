//! The spec micro-language: a compact textual address of one node.
//!
//! # Supported syntax
//!
//! - `.key` - mapping entry by identifier key
//! - `.(node)` - mapping entry by arbitrary key, or the sequence element
//!   structurally equal to the literal (`.({k: l})`)
//! - `[0]`, `[-1]` - sequence element by index (negatives count from the
//!   end)
//! - `[]` - the position one past the end (append)
//!
//! Segments chain left to right: `.servers[0].port`. See
//! [`resolver`] for the resolution rules and [`error::SpecError`] for the
//! syntax/match failure taxonomy.

pub mod error;
pub mod resolver;

pub use error::SpecError;
pub use resolver::{resolve, resolve_value, Resolved, Target, TargetDiag};
