//! kast: a syntax tree model for a Kotlin-like compiler frontend.
//!
//! This facade re-exports the member crates:
//!
//! - [`common`]: string interner, diagnostics, limits
//! - [`ast`]: node arena, category lattice, visitor and transformer dispatch,
//!   deep copy, rendering, validation and statistics
//! - [`injekt`]: runtime dependency injection components
//!
//! and owns the tracing subscriber setup shared by the binaries.

pub use kast_ast as ast;
pub use kast_common as common;
pub use kast_injekt as injekt;

pub mod tracing_config;

pub use kast_ast::{
    AstArena, Category, NodeId, NodeKind, NodeRef, TransformResult, Transformer, TransformerVoid,
    Visitor, VisitorVoid,
};
