//! Centralized limits and thresholds for kast.
//!
//! Tree traversal in kast is plain recursion, so anything that walks a tree
//! read from disk needs a depth bound to turn a malformed or hostile input into
//! a diagnostic instead of a stack overflow. The dependency-injection runtime
//! resolves bindings recursively too and shares the same concern.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth accepted by the tree validator.
///
/// Deeper trees are reported with `TREE_TOO_DEEP` and the validator stops
/// descending below that point. Handwritten code rarely nests more than a
/// few dozen levels; generated code (long builder chains, nested lambdas)
/// can reach a few hundred.
pub const MAX_TREE_DEPTH: u32 = 1_000;

/// Default depth at which the renderer elides children with `...`.
///
/// The renderer never descends past `MAX_TREE_DEPTH` even when the caller
/// asks for more.
pub const DEFAULT_RENDER_DEPTH: u32 = 64;

/// Maximum depth of nested binding resolution in the DI runtime.
///
/// A factory that asks its component for another binding adds one level.
/// Exceeding this limit almost always means two bindings depend on each
/// other; resolution fails with `InjektError::DepthExceeded`.
pub const MAX_RESOLUTION_DEPTH: usize = 128;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Upper bound for pre-allocating the node vector when the expected node count
/// is known (for example when loading a snapshot).
pub const MAX_ARENA_PREALLOC: usize = 1 << 20;

/// Inline capacity used for per-node receiver de-duplication.
///
/// The widest aliasing group is the three receiver slots of a call.
pub const SHARED_SLOT_INLINE: usize = 4;
