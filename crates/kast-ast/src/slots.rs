//! Child slot metadata and uniform slot access.
//!
//! Generated node structs store children as plain fields. `SlotRef` and
//! `SlotMut` give traversal code one shape to work with regardless of
//! whether a slot holds a single child, an optional child or a sequence.

use crate::arena::{NodeId, NodeList};
use crate::error::ContractViolation;
use crate::nodes::{Category, NodeKind};

/// How a child slot relates to the node that declares it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// Owned, non-nullable child.
    One,
    /// Owned, nullable child.
    Opt,
    /// Owned, ordered sequence of children.
    List,
    /// Non-owning reference to a node owned elsewhere. Never traversed.
    Back,
    /// Owned receiver that may denote the same node as an earlier shared
    /// slot of the same parent. Traversed once per distinct node.
    Shared,
    /// Nullable variant of `Shared`.
    SharedOpt,
}

impl SlotKind {
    /// Whether traversal follows this slot.
    #[inline]
    pub fn is_owned(self) -> bool {
        !matches!(self, SlotKind::Back)
    }

    #[inline]
    pub fn is_nullable(self) -> bool {
        matches!(self, SlotKind::Opt | SlotKind::SharedOpt)
    }

    #[inline]
    pub fn is_shared(self) -> bool {
        matches!(self, SlotKind::Shared | SlotKind::SharedOpt)
    }

    #[inline]
    pub fn is_list(self) -> bool {
        matches!(self, SlotKind::List)
    }
}

/// Static description of one child slot of a node kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotInfo {
    pub name: &'static str,
    pub kind: SlotKind,
    /// Every node stored in the slot must be-a this category.
    pub category: Category,
}

/// Read view of a slot value.
#[derive(Clone, Copy, Debug)]
pub enum SlotRef<'a> {
    Single(&'a NodeId),
    Optional(&'a Option<NodeId>),
    List(&'a [NodeId]),
}

impl<'a> SlotRef<'a> {
    /// The node ids stored in the slot, in order. Absent optional slots are
    /// empty.
    #[inline]
    pub fn as_slice(self) -> &'a [NodeId] {
        match self {
            SlotRef::Single(id) => std::slice::from_ref(id),
            SlotRef::Optional(opt) => opt.as_slice(),
            SlotRef::List(nodes) => nodes,
        }
    }

    /// The single id of a non-sequence slot, if present.
    #[inline]
    pub fn single(self) -> Option<NodeId> {
        match self {
            SlotRef::Single(id) => Some(*id),
            SlotRef::Optional(opt) => *opt,
            SlotRef::List(_) => None,
        }
    }
}

/// Write view of a slot value.
#[derive(Debug)]
pub enum SlotMut<'a> {
    Single(&'a mut NodeId),
    Optional(&'a mut Option<NodeId>),
    List(&'a mut NodeList),
}

/// A field type that can live in a child slot.
pub trait SlotField: Sized {
    fn as_slot(&self) -> SlotRef<'_>;

    fn as_slot_mut(&mut self) -> SlotMut<'_>;

    /// Build the field from an ordered id list, enforcing the slot's arity.
    fn from_ids(
        owner: NodeKind,
        info: &SlotInfo,
        ids: Vec<NodeId>,
    ) -> Result<Self, ContractViolation>;
}

impl SlotField for NodeId {
    #[inline]
    fn as_slot(&self) -> SlotRef<'_> {
        SlotRef::Single(self)
    }

    #[inline]
    fn as_slot_mut(&mut self) -> SlotMut<'_> {
        SlotMut::Single(self)
    }

    fn from_ids(
        owner: NodeKind,
        info: &SlotInfo,
        ids: Vec<NodeId>,
    ) -> Result<Self, ContractViolation> {
        match ids.as_slice() {
            [id] => Ok(*id),
            [] => Err(ContractViolation::AbsentNonNullable {
                kind: owner,
                slot: info.name,
            }),
            _ => Err(ContractViolation::MultipleForSingle {
                kind: owner,
                slot: info.name,
                count: ids.len(),
            }),
        }
    }
}

impl SlotField for Option<NodeId> {
    #[inline]
    fn as_slot(&self) -> SlotRef<'_> {
        SlotRef::Optional(self)
    }

    #[inline]
    fn as_slot_mut(&mut self) -> SlotMut<'_> {
        SlotMut::Optional(self)
    }

    fn from_ids(
        owner: NodeKind,
        info: &SlotInfo,
        ids: Vec<NodeId>,
    ) -> Result<Self, ContractViolation> {
        match ids.as_slice() {
            [] => Ok(None),
            [id] => Ok(Some(*id)),
            _ => Err(ContractViolation::MultipleForSingle {
                kind: owner,
                slot: info.name,
                count: ids.len(),
            }),
        }
    }
}

impl SlotField for NodeList {
    #[inline]
    fn as_slot(&self) -> SlotRef<'_> {
        SlotRef::List(&self.nodes)
    }

    #[inline]
    fn as_slot_mut(&mut self) -> SlotMut<'_> {
        SlotMut::List(self)
    }

    fn from_ids(
        _owner: NodeKind,
        _info: &SlotInfo,
        ids: Vec<NodeId>,
    ) -> Result<Self, ContractViolation> {
        Ok(NodeList { nodes: ids })
    }
}

/// Field types for each slot kind, named after the `SlotKind` variants so
/// the node table can spell a field type and its slot kind with one token.
#[doc(hidden)]
pub mod slot_types {
    use crate::arena::{NodeId, NodeList};

    pub type One = NodeId;
    pub type Opt = Option<NodeId>;
    pub type List = NodeList;
    pub type Back = NodeId;
    pub type Shared = NodeId;
    pub type SharedOpt = Option<NodeId>;
}
