//! Structural checks over a stored tree.
//!
//! Trees built through the constructors and mutators of this crate keep the
//! ownership and category rules by construction. Trees loaded from a
//! snapshot or assembled by hand do not have to; `validate` reports every
//! violation it finds as a `Diagnostic` instead of stopping at the first.

use crate::arena::{AstArena, NodeId};
use crate::slots::SlotKind;
use fixedbitset::FixedBitSet;
use kast_common::diagnostics::diagnostic_codes;
use kast_common::limits::MAX_TREE_DEPTH;
use kast_common::Diagnostic;
use kast_common::diagnostics::format_message;
use smallvec::SmallVec;
use tracing::debug;

enum Step {
    Enter { node: NodeId, depth: u32 },
    Exit(NodeId),
}

/// Check the subtree under `root`.
///
/// Reported problems: dangling ids, slot contents of the wrong category,
/// back-references to the wrong category, nodes owned by two parents,
/// ownership cycles, and nesting deeper than `MAX_TREE_DEPTH`. Builtin
/// sentinels may be owned any number of times.
pub fn validate(arena: &AstArena, root: NodeId, file: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    if !arena.contains(root) {
        diagnostics.push(Diagnostic::error(
            file,
            root.0,
            format!("root #{} is not in the arena", root.0),
            diagnostic_codes::DANGLING_NODE,
        ));
        return diagnostics;
    }

    let mut owned = FixedBitSet::with_capacity(arena.len());
    let mut on_path = FixedBitSet::with_capacity(arena.len());
    let mut too_deep_reported = false;
    let mut stack = vec![Step::Enter {
        node: root,
        depth: 0,
    }];
    owned.insert(root.index());

    while let Some(step) = stack.pop() {
        let (node, depth) = match step {
            Step::Exit(node) => {
                on_path.set(node.index(), false);
                continue;
            }
            Step::Enter { node, depth } => (node, depth),
        };
        if depth > MAX_TREE_DEPTH {
            if !too_deep_reported {
                diagnostics.push(Diagnostic::warning(
                    file,
                    node.0,
                    format!("tree nesting exceeds {MAX_TREE_DEPTH} levels; not checked further"),
                    diagnostic_codes::TREE_TOO_DEEP,
                ));
                too_deep_reported = true;
            }
            continue;
        }
        on_path.insert(node.index());
        stack.push(Step::Exit(node));

        let data = arena.data(node);
        let kind = data.kind();
        let mut shared_seen: SmallVec<[NodeId; 4]> = SmallVec::new();
        let mut children: SmallVec<[NodeId; 8]> = SmallVec::new();
        for (index, info) in kind.slots().iter().enumerate() {
            let Some(value) = data.slot(index) else {
                continue;
            };
            for &child in value.as_slice() {
                let Some(child_data) = arena.get_data(child) else {
                    diagnostics.push(Diagnostic::error(
                        file,
                        node.0,
                        format!(
                            "slot '{}' of {} refers to missing node #{}",
                            info.name,
                            kind.name(),
                            child.0
                        ),
                        diagnostic_codes::DANGLING_NODE,
                    ));
                    continue;
                };
                let found = child_data.kind().category();
                if !found.is_a(info.category) {
                    let code = if info.kind == SlotKind::Back {
                        diagnostic_codes::BACK_REFERENCE_CATEGORY_MISMATCH
                    } else {
                        diagnostic_codes::SLOT_CATEGORY_MISMATCH
                    };
                    diagnostics.push(
                        Diagnostic::error(
                            file,
                            node.0,
                            format_message(
                                "slot '{0}' of {1} expects {2}, found {3}",
                                &[info.name, kind.name(), info.category.name(), found.name()],
                            ),
                            code,
                        )
                        .with_related(child.0, "offending node"),
                    );
                }
                if !info.kind.is_owned() {
                    continue;
                }
                if info.kind.is_shared() {
                    if shared_seen.contains(&child) {
                        continue;
                    }
                    shared_seen.push(child);
                }
                if arena.is_builtin(child) {
                    continue;
                }
                if on_path.contains(child.index()) {
                    diagnostics.push(
                        Diagnostic::error(
                            file,
                            node.0,
                            format!("{} owns its ancestor #{}", kind.name(), child.0),
                            diagnostic_codes::OWNERSHIP_CYCLE,
                        )
                        .with_related(child.0, "ancestor"),
                    );
                    continue;
                }
                if owned.put(child.index()) {
                    diagnostics.push(Diagnostic::error(
                        file,
                        child.0,
                        format!(
                            "node #{} is owned by more than one parent (again through '{}' of #{})",
                            child.0, info.name, node.0
                        ),
                        diagnostic_codes::NODE_OWNED_TWICE,
                    ));
                    continue;
                }
                children.push(child);
            }
        }
        for &child in children.iter().rev() {
            stack.push(Step::Enter {
                node: child,
                depth: depth + 1,
            });
        }
    }

    debug!(root = root.0, problems = diagnostics.len(), "validated tree");
    diagnostics
}

/// Nodes that no other node owns, excluding builtin sentinels, in id order.
pub fn find_roots(arena: &AstArena) -> Vec<NodeId> {
    let mut owned = FixedBitSet::with_capacity(arena.len());
    for id in arena.ids() {
        let data = arena.data(id);
        for (index, info) in data.kind().slots().iter().enumerate() {
            if !info.kind.is_owned() {
                continue;
            }
            if let Some(value) = data.slot(index) {
                for child in value.as_slice() {
                    if arena.contains(*child) {
                        owned.insert(child.index());
                    }
                }
            }
        }
    }
    arena
        .ids()
        .filter(|&id| !arena.is_builtin(id) && !owned.contains(id.index()))
        .collect()
}
