//! In-place tree rewriting with the same dispatch shape as `Visitor`.
//!
//! A transformer method receives the arena and a node id and returns a
//! `TransformResult` describing what should stand in the parent's slot.
//! `AstArena::transform_children` stores each result back into the slot it
//! came from, so rewriting never needs to rebuild unchanged ancestors.

use crate::arena::{AstArena, NodeId};
use crate::error::ContractViolation;
use crate::nodes::{Category, NodeKind};
use crate::slots::{SlotInfo, SlotKind};
use kast_common::limits::SHARED_SLOT_INLINE;
use smallvec::SmallVec;
use tracing::trace;

/// Outcome of transforming one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransformResult {
    /// The node keeps its place. Its children may have been rewritten.
    Unchanged(NodeId),
    /// Another node takes the place of the original.
    Replaced(NodeId),
    /// Several nodes take the place of the original. Only valid in sequence
    /// slots, where they are spliced in order.
    Multiple(Vec<NodeId>),
    /// The node is dropped. Only valid in sequence and nullable slots.
    Removed,
}

impl TransformResult {
    /// Tag `new` as unchanged when it is `original` and replaced otherwise.
    #[inline]
    pub fn compose(original: NodeId, new: NodeId) -> TransformResult {
        if original == new {
            TransformResult::Unchanged(new)
        } else {
            TransformResult::Replaced(new)
        }
    }

    #[inline]
    pub fn is_changed(&self) -> bool {
        !matches!(self, TransformResult::Unchanged(_))
    }

    /// The single resulting node, if there is exactly one.
    pub fn single(&self) -> Option<NodeId> {
        match self {
            TransformResult::Unchanged(id) | TransformResult::Replaced(id) => Some(*id),
            TransformResult::Multiple(ids) if ids.len() == 1 => Some(ids[0]),
            TransformResult::Multiple(_) | TransformResult::Removed => None,
        }
    }

    /// All resulting nodes in order.
    pub fn into_nodes(self) -> Vec<NodeId> {
        match self {
            TransformResult::Unchanged(id) | TransformResult::Replaced(id) => vec![id],
            TransformResult::Multiple(ids) => ids,
            TransformResult::Removed => Vec::new(),
        }
    }
}

macro_rules! define_transformer {
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
        /// A tree rewrite with context value `D`.
        ///
        /// Only `transform_element` is required; every other method falls
        /// back along the category chain exactly like `Visitor`.
        pub trait Transformer<D = ()> {
            fn transform_element(&mut self, arena: &mut AstArena, id: NodeId, data: D) -> TransformResult;

            $(
                fn $atransform(&mut self, arena: &mut AstArena, id: NodeId, data: D) -> TransformResult {
                    self.transform_category(Category::$AParent, arena, id, data)
                }
            )*

            $(
                fn $ktransform(&mut self, arena: &mut AstArena, id: NodeId, data: D) -> TransformResult {
                    self.transform_category(Category::$KParent, arena, id, data)
                }
            )*

            /// Call the method that handles `category`. Used by the default
            /// bodies; not meant to be overridden.
            fn transform_category(
                &mut self,
                category: Category,
                arena: &mut AstArena,
                id: NodeId,
                data: D,
            ) -> TransformResult {
                match category {
                    Category::Element => self.transform_element(arena, id, data),
                    $( Category::$ACat => self.$atransform(arena, id, data), )*
                    $( Category::$Kind => self.$ktransform(arena, id, data), )*
                }
            }
        }

        /// A transformer without context.
        ///
        /// The default `transform_element` rewrites the node's children and
        /// reports the node itself as unchanged, so an implementation that
        /// overrides a few methods still walks the whole tree.
        pub trait TransformerVoid: Sized {
            fn transform_element(&mut self, arena: &mut AstArena, id: NodeId) -> TransformResult {
                arena.transform_children_void(id, self);
                TransformResult::Unchanged(id)
            }

            $(
                fn $atransform(&mut self, arena: &mut AstArena, id: NodeId) -> TransformResult {
                    TransformerVoid::transform_category(self, Category::$AParent, arena, id)
                }
            )*

            $(
                fn $ktransform(&mut self, arena: &mut AstArena, id: NodeId) -> TransformResult {
                    TransformerVoid::transform_category(self, Category::$KParent, arena, id)
                }
            )*

            fn transform_category(&mut self, category: Category, arena: &mut AstArena, id: NodeId) -> TransformResult {
                match category {
                    Category::Element => TransformerVoid::transform_element(self, arena, id),
                    $( Category::$ACat => TransformerVoid::$atransform(self, arena, id), )*
                    $( Category::$Kind => TransformerVoid::$ktransform(self, arena, id), )*
                }
            }
        }

        impl<T: TransformerVoid> Transformer<()> for T {
            #[inline]
            fn transform_element(&mut self, arena: &mut AstArena, id: NodeId, _data: ()) -> TransformResult {
                TransformerVoid::transform_element(self, arena, id)
            }

            $(
                #[inline]
                fn $atransform(&mut self, arena: &mut AstArena, id: NodeId, _data: ()) -> TransformResult {
                    TransformerVoid::$atransform(self, arena, id)
                }
            )*

            $(
                #[inline]
                fn $ktransform(&mut self, arena: &mut AstArena, id: NodeId, _data: ()) -> TransformResult {
                    TransformerVoid::$ktransform(self, arena, id)
                }
            )*

            #[inline]
            fn transform_category(
                &mut self,
                category: Category,
                arena: &mut AstArena,
                id: NodeId,
                _data: (),
            ) -> TransformResult {
                TransformerVoid::transform_category(self, category, arena, id)
            }
        }

        impl AstArena {
            /// Dispatch to the transformer method of the node's concrete kind.
            pub fn transform<D, T: Transformer<D> + ?Sized>(
                &mut self,
                id: NodeId,
                transformer: &mut T,
                data: D,
            ) -> TransformResult {
                match self.kind(id) {
                    $( NodeKind::$Kind => transformer.$ktransform(self, id, data), )*
                }
            }
        }
    };
}

with_ast_table!(define_transformer);

/// Old and new occupant of the shared receiver slots rewritten so far.
type SharedRewrites = SmallVec<[(NodeId, Option<NodeId>); SHARED_SLOT_INLINE]>;

fn violation(violation: ContractViolation) -> ! {
    panic!("transform contract violated: {violation}")
}

impl AstArena {
    /// Rewrite every owned child slot of `id` in slot order and return `id`.
    ///
    /// # Panics
    /// When the transformer removes the child of a non-nullable slot, returns
    /// several nodes for a single slot, or returns a node whose category
    /// does not fit the slot.
    pub fn transform_children<D: Clone, T: Transformer<D> + ?Sized>(
        &mut self,
        id: NodeId,
        transformer: &mut T,
        data: D,
    ) -> NodeId {
        let mut shared = SharedRewrites::new();
        for (index, info) in self.kind(id).slots().iter().enumerate() {
            self.transform_slot_at(id, index, info, transformer, data.clone(), &mut shared);
        }
        id
    }

    /// Rewrite only the named slot of `id`.
    pub fn transform_slot<D: Clone, T: Transformer<D> + ?Sized>(
        &mut self,
        id: NodeId,
        slot: &str,
        transformer: &mut T,
        data: D,
    ) -> Result<NodeId, ContractViolation> {
        let (index, info) = self.slot_info(id, slot)?;
        let mut shared = SharedRewrites::new();
        self.transform_slot_at(id, index, info, transformer, data, &mut shared);
        Ok(id)
    }

    /// Rewrite every owned slot of `id` except the named ones.
    pub fn transform_other_children<D: Clone, T: Transformer<D> + ?Sized>(
        &mut self,
        id: NodeId,
        except: &[&str],
        transformer: &mut T,
        data: D,
    ) -> Result<NodeId, ContractViolation> {
        for name in except {
            self.slot_info(id, name)?;
        }
        let mut shared = SharedRewrites::new();
        for (index, info) in self.kind(id).slots().iter().enumerate() {
            if except.contains(&info.name) {
                continue;
            }
            self.transform_slot_at(id, index, info, transformer, data.clone(), &mut shared);
        }
        Ok(id)
    }

    #[inline]
    pub fn transform_void<T: TransformerVoid>(&mut self, id: NodeId, transformer: &mut T) -> TransformResult {
        self.transform(id, transformer, ())
    }

    #[inline]
    pub fn transform_children_void<T: TransformerVoid>(&mut self, id: NodeId, transformer: &mut T) -> NodeId {
        self.transform_children(id, transformer, ())
    }

    fn transform_slot_at<D: Clone, T: Transformer<D> + ?Sized>(
        &mut self,
        id: NodeId,
        index: usize,
        info: &SlotInfo,
        transformer: &mut T,
        data: D,
        shared: &mut SharedRewrites,
    ) {
        let Some(value) = self.data(id).slot(index) else {
            return;
        };
        match info.kind {
            SlotKind::Back => {}
            SlotKind::One | SlotKind::Opt => {
                let Some(old) = value.single() else {
                    return;
                };
                let new = self.transform_single(id, info, old, transformer, data);
                self.store_checked(id, index, info, new);
            }
            SlotKind::Shared | SlotKind::SharedOpt => {
                let Some(old) = value.single() else {
                    return;
                };
                let previous = shared
                    .iter()
                    .find(|(seen, _)| *seen == old)
                    .map(|&(_, new)| new);
                let new = match previous {
                    Some(new) => {
                        trace!(node = id.0, slot = info.name, "shared receiver already transformed");
                        new
                    }
                    None => {
                        let new = self.transform_single(id, info, old, transformer, data);
                        shared.push((old, new));
                        new
                    }
                };
                self.store_checked(id, index, info, new);
            }
            SlotKind::List => {
                let old: Vec<NodeId> = value.as_slice().to_vec();
                let mut rewritten = Vec::with_capacity(old.len());
                for child in old {
                    let result = self.transform(child, transformer, data.clone());
                    for new in result.into_nodes() {
                        self.assert_fits(id, info, new);
                        rewritten.push(new);
                    }
                }
                self.store_list(id, index, rewritten);
            }
        }
    }

    /// Transform the occupant of a single-valued slot and check the result.
    fn transform_single<D, T: Transformer<D> + ?Sized>(
        &mut self,
        owner: NodeId,
        info: &SlotInfo,
        old: NodeId,
        transformer: &mut T,
        data: D,
    ) -> Option<NodeId> {
        let kind = self.kind(owner);
        match self.transform(old, transformer, data) {
            TransformResult::Unchanged(new) | TransformResult::Replaced(new) => {
                self.assert_fits(owner, info, new);
                Some(new)
            }
            TransformResult::Removed if info.kind.is_nullable() => None,
            TransformResult::Removed => violation(ContractViolation::AbsentNonNullable {
                kind,
                slot: info.name,
            }),
            TransformResult::Multiple(nodes) => match nodes.as_slice() {
                [new] => {
                    self.assert_fits(owner, info, *new);
                    Some(*new)
                }
                _ => violation(ContractViolation::MultipleForSingle {
                    kind,
                    slot: info.name,
                    count: nodes.len(),
                }),
            },
        }
    }

    fn assert_fits(&self, owner: NodeId, info: &SlotInfo, new: NodeId) {
        if let Err(err) = self.check_category(self.kind(owner), info, new) {
            violation(err);
        }
    }

    fn store_checked(&mut self, id: NodeId, index: usize, info: &SlotInfo, new: Option<NodeId>) {
        if let Err(err) = self.store_single(id, index, info, new) {
            violation(err);
        }
    }
}
