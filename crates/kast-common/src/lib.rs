//! Common types and utilities for the kast syntax tree toolkit.
//!
//! This crate provides foundational types used across all kast crates:
//! - String interning (`Atom`, `Interner`)
//! - Diagnostics reported by tree validation and the CLI
//! - Limits and thresholds shared by traversal and resolution code

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner, StringTableError};

// Diagnostics with stable codes
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

// Centralized limits and thresholds
pub mod limits;

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod interner_tests;

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod diagnostics_tests;
