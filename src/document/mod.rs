//! Document tree model and codec.
//!
//! [`node`] defines the tree the patch engine works on; [`compare`] gives
//! it structural equality and a total order; [`parser`] and [`render`]
//! move between trees and YAML text while keeping comments and flow style.

pub mod compare;
pub mod node;
pub mod parser;
pub mod render;
