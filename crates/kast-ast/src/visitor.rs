//! Read-only double dispatch over syntax trees.
//!
//! `AstArena::accept` calls the visitor method named after the node's
//! concrete kind. Every method except `visit_element` has a default body
//! that forwards to the method of its category's parent, so an override of
//! a mid-level category catches every descendant that is not overridden
//! more specifically. The chain is the static `Category::parent` map.

use crate::arena::{AstArena, NodeId, NodeRef};
use crate::nodes::{Category, NodeKind};
use crate::slots::SlotKind;
use kast_common::limits::SHARED_SLOT_INLINE;
use smallvec::SmallVec;

macro_rules! define_visitor {
    (
        categories {
            $( $ACat:ident : $AParent:ident [ $($ASup:ident),* ] => $avisit:ident, $atransform:ident; )*
        }
        nodes {
            $(
                $Kind:ident : $KParent:ident [ $($KSup:ident),* ] => $kvisit:ident, $ktransform:ident {
                    slots { $( $slot:ident : $sk:ident $scat:ident ),* $(,)? }
                    attrs { $( $attr:ident : $aty:ty ),* $(,)? }
                    type_rule( $($rule:tt)* )
                }
            )*
        }
    ) => {
        /// A read-only tree walk producing `Output` from a node and a context
        /// value `D`.
        ///
        /// Only `visit_element` is required. Implementations override the
        /// categories they care about; everything else falls back along the
        /// category chain.
        pub trait Visitor<D = ()> {
            type Output;

            fn visit_element(&mut self, node: NodeRef<'_>, data: D) -> Self::Output;

            $(
                fn $avisit(&mut self, node: NodeRef<'_>, data: D) -> Self::Output {
                    self.visit_category(Category::$AParent, node, data)
                }
            )*

            $(
                fn $kvisit(&mut self, node: NodeRef<'_>, data: D) -> Self::Output {
                    self.visit_category(Category::$KParent, node, data)
                }
            )*

            /// Call the method that handles `category`. Used by the default
            /// bodies; not meant to be overridden.
            fn visit_category(&mut self, category: Category, node: NodeRef<'_>, data: D) -> Self::Output {
                match category {
                    Category::Element => self.visit_element(node, data),
                    $( Category::$ACat => self.$avisit(node, data), )*
                    $( Category::$Kind => self.$kvisit(node, data), )*
                }
            }
        }

        /// A visitor without context and without result.
        ///
        /// Mirrors `Visitor` method for method. Every `VisitorVoid` is a
        /// `Visitor<()>` with `Output = ()`.
        pub trait VisitorVoid {
            fn visit_element(&mut self, node: NodeRef<'_>);

            $(
                fn $avisit(&mut self, node: NodeRef<'_>) {
                    VisitorVoid::visit_category(self, Category::$AParent, node)
                }
            )*

            $(
                fn $kvisit(&mut self, node: NodeRef<'_>) {
                    VisitorVoid::visit_category(self, Category::$KParent, node)
                }
            )*

            fn visit_category(&mut self, category: Category, node: NodeRef<'_>) {
                match category {
                    Category::Element => VisitorVoid::visit_element(self, node),
                    $( Category::$ACat => VisitorVoid::$avisit(self, node), )*
                    $( Category::$Kind => VisitorVoid::$kvisit(self, node), )*
                }
            }
        }

        impl<V: VisitorVoid> Visitor<()> for V {
            type Output = ();

            #[inline]
            fn visit_element(&mut self, node: NodeRef<'_>, _data: ()) {
                VisitorVoid::visit_element(self, node)
            }

            $(
                #[inline]
                fn $avisit(&mut self, node: NodeRef<'_>, _data: ()) {
                    VisitorVoid::$avisit(self, node)
                }
            )*

            $(
                #[inline]
                fn $kvisit(&mut self, node: NodeRef<'_>, _data: ()) {
                    VisitorVoid::$kvisit(self, node)
                }
            )*

            #[inline]
            fn visit_category(&mut self, category: Category, node: NodeRef<'_>, _data: ()) {
                VisitorVoid::visit_category(self, category, node)
            }
        }

        impl AstArena {
            /// Dispatch to the visitor method of the node's concrete kind.
            pub fn accept<D, V: Visitor<D> + ?Sized>(&self, id: NodeId, visitor: &mut V, data: D) -> V::Output {
                let node = self.node(id);
                match node.kind() {
                    $( NodeKind::$Kind => visitor.$kvisit(node, data), )*
                }
            }
        }
    };
}

with_ast_table!(define_visitor);

impl AstArena {
    /// Visit every owned child of `id` in slot order.
    ///
    /// Sequence slots are walked front to back, absent nullable slots and
    /// back-references are skipped, and a node held by several shared
    /// receiver slots is visited once.
    pub fn accept_children<D: Clone, V: Visitor<D> + ?Sized>(
        &self,
        id: NodeId,
        visitor: &mut V,
        data: D,
    ) {
        let node = self.data(id);
        let mut shared_seen: SmallVec<[NodeId; SHARED_SLOT_INLINE]> = SmallVec::new();
        for (index, info) in node.kind().slots().iter().enumerate() {
            let Some(value) = node.slot(index) else {
                continue;
            };
            match info.kind {
                SlotKind::Back => {}
                SlotKind::Shared | SlotKind::SharedOpt => {
                    let Some(child) = value.single() else {
                        continue;
                    };
                    if shared_seen.contains(&child) {
                        continue;
                    }
                    shared_seen.push(child);
                    self.accept(child, visitor, data.clone());
                }
                SlotKind::One | SlotKind::Opt | SlotKind::List => {
                    for &child in value.as_slice() {
                        self.accept(child, visitor, data.clone());
                    }
                }
            }
        }
    }

    #[inline]
    pub fn accept_void<V: VisitorVoid>(&self, id: NodeId, visitor: &mut V) {
        self.accept(id, visitor, ())
    }

    #[inline]
    pub fn accept_children_void<V: VisitorVoid>(&self, id: NodeId, visitor: &mut V) {
        self.accept_children(id, visitor, ())
    }
}

impl<'a> NodeRef<'a> {
    #[inline]
    pub fn accept<D, V: Visitor<D> + ?Sized>(self, visitor: &mut V, data: D) -> V::Output {
        self.arena().accept(self.id(), visitor, data)
    }

    #[inline]
    pub fn accept_children<D: Clone, V: Visitor<D> + ?Sized>(self, visitor: &mut V, data: D) {
        self.arena().accept_children(self.id(), visitor, data)
    }

    #[inline]
    pub fn accept_children_void<V: VisitorVoid>(self, visitor: &mut V) {
        self.arena().accept_children_void(self.id(), visitor)
    }
}
