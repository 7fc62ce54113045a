//! Node counts per kind and per category.

use crate::arena::{AstArena, NodeId, NodeRef};
use crate::visitor::VisitorVoid;
use indexmap::IndexMap;
use serde::Serialize;

/// Counts of one tree or a merged set of trees, in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub total: usize,
    pub kinds: IndexMap<&'static str, usize>,
    /// Every category on a node's fallback chain counts the node once, so
    /// `Element` equals `total`.
    pub categories: IndexMap<&'static str, usize>,
}

impl TreeStats {
    pub fn merge(&mut self, other: &TreeStats) {
        self.total += other.total;
        for (name, count) in &other.kinds {
            *self.kinds.entry(*name).or_default() += count;
        }
        for (name, count) in &other.categories {
            *self.categories.entry(*name).or_default() += count;
        }
    }
}

/// Visitor that counts every owned node it reaches.
#[derive(Default)]
pub struct CategoryCounter {
    stats: TreeStats,
}

impl CategoryCounter {
    pub fn into_stats(self) -> TreeStats {
        self.stats
    }
}

impl VisitorVoid for CategoryCounter {
    fn visit_element(&mut self, node: NodeRef<'_>) {
        self.stats.total += 1;
        *self.stats.kinds.entry(node.kind().name()).or_default() += 1;
        for category in node.category().fallback_chain().into_iter().skip(1) {
            *self.stats.categories.entry(category.name()).or_default() += 1;
        }
        node.accept_children_void(self);
    }
}

pub fn count(arena: &AstArena, root: NodeId) -> TreeStats {
    let mut counter = CategoryCounter::default();
    arena.accept_void(root, &mut counter);
    counter.into_stats()
}
