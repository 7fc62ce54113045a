//! Node structs, node kinds and the category lattice, generated from the
//! node table in `table.rs`.

use crate::arena::NodeId;
use crate::attributes::*;
use crate::error::ContractViolation;
use crate::slots::{SlotField, SlotInfo, SlotKind, SlotMut, SlotRef, slot_types};
use kast_common::{Atom, Interner};
use serde::{Deserialize, Serialize};

/// How a node kind reports its type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeRule {
    /// The kind has no type (declarations, references, types).
    Untyped,
    /// The named `One Type` slot holds the type. `replace_type` rewrites it.
    Own(&'static str),
    /// The type is the type of the child in the named slot.
    Child(&'static str),
    /// The child node in the named slot is itself the type.
    ChildNode(&'static str),
    /// The type is a well-known builtin sentinel.
    Builtin(BuiltinType),
}

impl TypeRule {
    /// Whether `replace_type` has any effect on kinds with this rule.
    #[inline]
    pub fn is_replaceable(self) -> bool {
        matches!(self, TypeRule::Own(_))
    }
}

macro_rules! type_rule {
    (none) => {
        TypeRule::Untyped
    };
    (own($slot:ident)) => {
        TypeRule::Own(stringify!($slot))
    };
    (child($slot:ident)) => {
        TypeRule::Child(stringify!($slot))
    };
    (child_node($slot:ident)) => {
        TypeRule::ChildNode(stringify!($slot))
    };
    (builtin($builtin:ident)) => {
        TypeRule::Builtin(BuiltinType::$builtin)
    };
}

/// Typed access to one node struct stored in a `NodeData`.
pub trait AstNode: Sized + Into<NodeData> {
    const KIND: NodeKind;

    fn from_data(data: &NodeData) -> Option<&Self>;

    fn from_data_mut(data: &mut NodeData) -> Option<&mut Self>;
}

macro_rules! define_nodes {
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
        /// A node category: either an abstract grouping or a concrete kind.
        ///
        /// Categories form a single-rooted lattice. `parent` is the fixed
        /// fallback chain that visitor and transformer defaults follow;
        /// `secondary_supertypes` only widen `is_a` for slot checks.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Category {
            Element,
            $( $ACat, )*
            $( $Kind, )*
        }

        impl Category {
            pub const ALL: &'static [Category] = &[
                Category::Element,
                $( Category::$ACat, )*
                $( Category::$Kind, )*
            ];

            /// The category whose handler a default visit/transform method of
            /// this category falls back to. `None` only for `Element`.
            pub fn parent(self) -> Option<Category> {
                match self {
                    Category::Element => None,
                    $( Category::$ACat => Some(Category::$AParent), )*
                    $( Category::$Kind => Some(Category::$KParent), )*
                }
            }

            pub fn secondary_supertypes(self) -> &'static [Category] {
                match self {
                    Category::Element => &[],
                    $( Category::$ACat => &[ $( Category::$ASup ),* ], )*
                    $( Category::$Kind => &[ $( Category::$KSup ),* ], )*
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    Category::Element => "Element",
                    $( Category::$ACat => stringify!($ACat), )*
                    $( Category::$Kind => stringify!($Kind), )*
                }
            }

            /// The node kind of a concrete category.
            pub fn as_kind(self) -> Option<NodeKind> {
                match self {
                    $( Category::$Kind => Some(NodeKind::$Kind), )*
                    _ => None,
                }
            }

            /// Name of the visitor method handling this category.
            pub fn visit_method(self) -> &'static str {
                match self {
                    Category::Element => "visit_element",
                    $( Category::$ACat => stringify!($avisit), )*
                    $( Category::$Kind => stringify!($kvisit), )*
                }
            }

            /// Name of the transformer method handling this category.
            pub fn transform_method(self) -> &'static str {
                match self {
                    Category::Element => "transform_element",
                    $( Category::$ACat => stringify!($atransform), )*
                    $( Category::$Kind => stringify!($ktransform), )*
                }
            }
        }

        /// The concrete shape of a node.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum NodeKind {
            $( $Kind, )*
        }

        impl NodeKind {
            pub const ALL: &'static [NodeKind] = &[ $( NodeKind::$Kind, )* ];

            #[inline]
            pub fn category(self) -> Category {
                match self {
                    $( NodeKind::$Kind => Category::$Kind, )*
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $( NodeKind::$Kind => stringify!($Kind), )*
                }
            }

            /// Child slots in traversal order.
            #[inline]
            pub fn slots(self) -> &'static [SlotInfo] {
                match self {
                    $( NodeKind::$Kind => $Kind::SLOTS, )*
                }
            }

            #[inline]
            pub fn type_rule(self) -> TypeRule {
                match self {
                    $( NodeKind::$Kind => $Kind::TYPE_RULE, )*
                }
            }

            /// Build a node of this kind with default attributes.
            ///
            /// `fill` is asked for the ids of each slot in traversal order;
            /// the answer must respect the slot's arity.
            #[allow(unused_variables, unused_mut, unused_assignments)]
            pub fn instantiate(
                self,
                mut fill: impl FnMut(&SlotInfo) -> Vec<NodeId>,
            ) -> Result<NodeData, ContractViolation> {
                match self {
                    $(
                        NodeKind::$Kind => {
                            let mut position = 0usize;
                            $(
                                let $slot = {
                                    let info = &$Kind::SLOTS[position];
                                    position += 1;
                                    <slot_types::$sk as SlotField>::from_ids(self, info, fill(info))?
                                };
                            )*
                            Ok(NodeData::$Kind($Kind {
                                $( $slot, )*
                                $( $attr: Default::default(), )*
                            }))
                        }
                    )*
                }
            }
        }

        $(
            #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
            pub struct $Kind {
                $( pub $slot: slot_types::$sk, )*
                $(
                    #[serde(default)]
                    pub $attr: $aty,
                )*
            }

            impl $Kind {
                pub const SLOTS: &'static [SlotInfo] = &[
                    $(
                        SlotInfo {
                            name: stringify!($slot),
                            kind: SlotKind::$sk,
                            category: Category::$scat,
                        },
                    )*
                ];

                pub const TYPE_RULE: TypeRule = type_rule!($($rule)*);

                #[allow(unused_variables, unused_mut, unused_assignments)]
                fn slot_at(&self, index: usize) -> Option<SlotRef<'_>> {
                    let mut position = 0usize;
                    $(
                        if position == index {
                            return Some(self.$slot.as_slot());
                        }
                        position += 1;
                    )*
                    None
                }

                #[allow(unused_variables, unused_mut, unused_assignments)]
                fn slot_at_mut(&mut self, index: usize) -> Option<SlotMut<'_>> {
                    let mut position = 0usize;
                    $(
                        if position == index {
                            return Some(self.$slot.as_slot_mut());
                        }
                        position += 1;
                    )*
                    None
                }

                #[allow(unused_variables)]
                fn write_attributes(&self, interner: &Interner, out: &mut Vec<(&'static str, String)>) {
                    $( out.push((stringify!($attr), AttrDisplay::display(&self.$attr, interner))); )*
                }
            }

            impl From<$Kind> for NodeData {
                #[inline]
                fn from(node: $Kind) -> NodeData {
                    NodeData::$Kind(node)
                }
            }

            impl AstNode for $Kind {
                const KIND: NodeKind = NodeKind::$Kind;

                #[inline]
                fn from_data(data: &NodeData) -> Option<&Self> {
                    match data {
                        NodeData::$Kind(node) => Some(node),
                        _ => None,
                    }
                }

                #[inline]
                fn from_data_mut(data: &mut NodeData) -> Option<&mut Self> {
                    match data {
                        NodeData::$Kind(node) => Some(node),
                        _ => None,
                    }
                }
            }
        )*

        /// One node of any kind, as stored in the arena.
        #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "kind")]
        pub enum NodeData {
            $( $Kind($Kind), )*
        }

        impl NodeData {
            #[inline]
            pub fn kind(&self) -> NodeKind {
                match self {
                    $( NodeData::$Kind(_) => NodeKind::$Kind, )*
                }
            }

            /// The slot at `index` in traversal order.
            #[inline]
            pub fn slot(&self, index: usize) -> Option<SlotRef<'_>> {
                match self {
                    $( NodeData::$Kind(node) => node.slot_at(index), )*
                }
            }

            #[inline]
            pub fn slot_mut(&mut self, index: usize) -> Option<SlotMut<'_>> {
                match self {
                    $( NodeData::$Kind(node) => node.slot_at_mut(index), )*
                }
            }

            /// Attribute names and rendered values in declaration order.
            pub fn attributes(&self, interner: &Interner) -> Vec<(&'static str, String)> {
                let mut out = Vec::new();
                match self {
                    $( NodeData::$Kind(node) => node.write_attributes(interner, &mut out), )*
                }
                out
            }
        }
    };
}

with_ast_table!(define_nodes);

impl Category {
    /// Whether a node of this category may stand where `other` is expected,
    /// following both the fallback parent and secondary supertypes.
    pub fn is_a(self, other: Category) -> bool {
        if self == other || other == Category::Element {
            return true;
        }
        if let Some(parent) = self.parent() {
            if parent.is_a(other) {
                return true;
            }
        }
        self.secondary_supertypes()
            .iter()
            .any(|supertype| supertype.is_a(other))
    }

    /// The fallback chain from this category up to `Element`, inclusive.
    pub fn fallback_chain(self) -> Vec<Category> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(parent) = current.parent() {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Whether `ancestor` is on this category's fallback chain.
    pub fn falls_back_to(self, ancestor: Category) -> bool {
        let mut current = Some(self);
        while let Some(category) = current {
            if category == ancestor {
                return true;
            }
            current = category.parent();
        }
        false
    }

    #[inline]
    pub fn is_abstract(self) -> bool {
        self.as_kind().is_none()
    }
}

impl RegularClass {
    /// The nested companion object, recomputed from `declarations`.
    pub fn companion_object(&self, arena: &crate::arena::AstArena) -> Option<NodeId> {
        self.declarations.nodes.iter().copied().find(|&id| {
            arena
                .get::<RegularClass>(id)
                .is_some_and(|class| class.is_companion)
        })
    }
}
