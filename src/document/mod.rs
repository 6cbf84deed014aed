//! SVG layer tree
//!
//! Reads an Inkscape drawing into an arena of elements addressed by
//! [`NodeId`], exposes layer labels, parents and styles, and writes the
//! drawing back out with the current layer styles.

pub mod error;
pub mod tree;
mod writer;

pub use error::DocumentError;
pub use tree::{Ancestors, Document, Element, NodeId};
