//! Indented text dump of a tree.

use crate::arena::{AstArena, NodeId, NodeRef};
use crate::slots::SlotKind;
use crate::visitor::Visitor;
use kast_common::limits::{DEFAULT_RENDER_DEPTH, MAX_TREE_DEPTH};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt::Write;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Spaces per indentation step. Slot labels sit one step below their
    /// node and children one step below the label.
    pub indent: usize,
    pub show_attributes: bool,
    /// Append the reported type (`: #id`) of typed nodes.
    pub show_types: bool,
    /// Levels below the root to print before eliding with `...`.
    pub max_depth: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            indent: 2,
            show_attributes: true,
            show_types: true,
            max_depth: DEFAULT_RENDER_DEPTH,
        }
    }
}

struct Renderer<'o> {
    options: &'o RenderOptions,
    max_depth: u32,
    out: String,
}

impl Renderer<'_> {
    fn pad(&mut self, columns: usize) {
        let width = columns * self.options.indent;
        self.out.extend(std::iter::repeat_n(' ', width));
    }

    fn header(&mut self, node: NodeRef<'_>) {
        let _ = write!(self.out, "{}#{}", node.kind().name(), node.id().0);
        if self.options.show_attributes {
            for (name, value) in node.data().attributes(node.arena().interner()) {
                let _ = write!(self.out, " {name}={value}");
            }
        }
        if self.options.show_types {
            if let Some(ty) = node.type_of() {
                let _ = write!(self.out, " : #{}", ty.0);
            }
        }
        self.out.push('\n');
    }
}

impl Visitor<u32> for Renderer<'_> {
    type Output = ();

    fn visit_element(&mut self, node: NodeRef<'_>, level: u32) {
        let column = level as usize * 2;
        self.pad(column);
        if level > self.max_depth {
            self.out.push_str("...\n");
            return;
        }
        self.header(node);

        let data = node.data();
        let mut shared_seen: SmallVec<[NodeId; 4]> = SmallVec::new();
        for (index, info) in node.kind().slots().iter().enumerate() {
            let Some(value) = data.slot(index) else {
                continue;
            };
            let children = value.as_slice();
            if children.is_empty() {
                continue;
            }
            self.pad(column + 1);
            match info.kind {
                SlotKind::Back => {
                    let _ = writeln!(self.out, "{}: -> #{}", info.name, children[0].0);
                    continue;
                }
                SlotKind::Shared | SlotKind::SharedOpt if shared_seen.contains(&children[0]) => {
                    let _ = writeln!(self.out, "{}: = #{}", info.name, children[0].0);
                    continue;
                }
                SlotKind::Shared | SlotKind::SharedOpt => shared_seen.push(children[0]),
                SlotKind::One | SlotKind::Opt | SlotKind::List => {}
            }
            let _ = writeln!(self.out, "{}:", info.name);
            for &child in children {
                node.with_id(child).accept(self, level + 1);
            }
        }
    }
}

/// Render the subtree under `root`.
pub fn render(arena: &AstArena, root: NodeId, options: &RenderOptions) -> String {
    let mut renderer = Renderer {
        options,
        max_depth: options.max_depth.min(MAX_TREE_DEPTH),
        out: String::new(),
    };
    arena.accept(root, &mut renderer, 0);
    renderer.out
}
