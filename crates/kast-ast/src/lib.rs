//! Syntax tree node model for a Kotlin-like compiler frontend.
//!
//! Nodes are stored in an [`AstArena`] and addressed by [`NodeId`]. Every
//! node kind, its child slots and its place in the category lattice are
//! declared once in the node table (`table.rs`); node structs, slot
//! metadata and both dispatch trait families are generated from it.
//!
//! - [`Visitor`] / [`VisitorVoid`]: read-only walks with category fallback
//! - [`Transformer`] / [`TransformerVoid`]: in-place rewriting of child slots
//! - [`deep_copy`], [`render`], [`validate`], [`stats`]: tools built on both

#[macro_use]
mod table;

pub mod arena;
pub mod attributes;
pub mod error;
pub mod nodes;
pub mod slots;
pub mod transformer;
pub mod visitor;

pub mod deep_copy;
pub mod render;
pub mod stats;
pub mod validate;

pub use arena::{AstArena, NodeId, NodeList, NodeRef};
pub use attributes::*;
pub use error::{ContractViolation, SnapshotError};
pub use nodes::*;
pub use slots::{SlotInfo, SlotKind, SlotRef};
pub use transformer::{TransformResult, Transformer, TransformerVoid};
pub use visitor::{Visitor, VisitorVoid};

#[cfg(test)]
#[path = "../tests/test_support.rs"]
mod test_support;

#[cfg(test)]
#[path = "../tests/node_model_tests.rs"]
mod node_model_tests;

#[cfg(test)]
#[path = "../tests/visitor_tests.rs"]
mod visitor_tests;

#[cfg(test)]
#[path = "../tests/transformer_tests.rs"]
mod transformer_tests;

#[cfg(test)]
#[path = "../tests/tools_tests.rs"]
mod tools_tests;
