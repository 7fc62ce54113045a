//! Subtree duplication.

use crate::arena::{AstArena, NodeId};
use crate::slots::{SlotKind, SlotMut};
use crate::transformer::{TransformResult, TransformerVoid};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Copies every node it is handed and rewrites the copy's children to
/// copies. Builtin sentinels are shared, not copied.
struct DeepCopier {
    copies: FxHashMap<NodeId, NodeId>,
}

impl TransformerVoid for DeepCopier {
    fn transform_element(&mut self, arena: &mut AstArena, id: NodeId) -> TransformResult {
        if arena.is_builtin(id) {
            return TransformResult::Unchanged(id);
        }
        let data = arena.data(id).clone();
        let copy = arena.alloc(data);
        self.copies.insert(id, copy);
        arena.transform_children_void(copy, self);
        TransformResult::Replaced(copy)
    }
}

/// Result of `deep_copy_with_mapping`.
#[derive(Debug, Clone)]
pub struct CopiedTree {
    pub root: NodeId,
    /// Original node to its copy, for every copied node.
    pub copies: FxHashMap<NodeId, NodeId>,
}

/// Copy the subtree under `root` into fresh nodes of the same arena and
/// return the new root.
///
/// Back-references that point into the copied subtree are redirected to the
/// corresponding copy; those pointing outside keep their target. Receivers
/// shared between slots of one node stay shared in the copy.
pub fn deep_copy(arena: &mut AstArena, root: NodeId) -> NodeId {
    deep_copy_with_mapping(arena, root).root
}

pub fn deep_copy_with_mapping(arena: &mut AstArena, root: NodeId) -> CopiedTree {
    let mut copier = DeepCopier {
        copies: FxHashMap::default(),
    };
    let new_root = arena
        .transform_void(root, &mut copier)
        .single()
        .unwrap_or(root);
    let copies = copier.copies;

    for &copy in copies.values() {
        let kind = arena.kind(copy);
        for (index, info) in kind.slots().iter().enumerate() {
            if info.kind != SlotKind::Back {
                continue;
            }
            let target = match arena.data_mut(copy).slot_mut(index) {
                Some(SlotMut::Single(target)) => target,
                Some(SlotMut::Optional(Some(target))) => target,
                _ => continue,
            };
            if let Some(&mapped) = copies.get(target) {
                *target = mapped;
            }
        }
    }

    debug!(root = root.0, copy = new_root.0, nodes = copies.len(), "deep copy");
    CopiedTree {
        root: new_root,
        copies,
    }
}
