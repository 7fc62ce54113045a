//! Arena storage for syntax trees.
//!
//! Nodes live in one `Vec<NodeData>` and refer to each other through
//! `NodeId` handles. Node identity is handle identity: two slots denote the
//! same node exactly when they hold the same `NodeId`. Every arena starts
//! with one shared `ImplicitBuiltinType` node per `BuiltinType`.

use crate::attributes::BuiltinType;
use crate::error::{ContractViolation, SnapshotError};
use crate::nodes::{AstNode, Category, ImplicitBuiltinType, NodeData, NodeKind, TypeRule};
use crate::slots::{SlotInfo, SlotKind, SlotMut, SlotRef};
use kast_common::limits::{MAX_ARENA_PREALLOC, MAX_TREE_DEPTH};
use kast_common::{Atom, Interner};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// Handle of a node in an `AstArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An ordered sequence of child nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeList {
    pub nodes: Vec<NodeId>,
}

impl NodeList {
    #[inline]
    pub fn new() -> NodeList {
        NodeList { nodes: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, NodeId> {
        self.nodes.iter()
    }
}

impl From<Vec<NodeId>> for NodeList {
    fn from(nodes: Vec<NodeId>) -> NodeList {
        NodeList { nodes }
    }
}

impl FromIterator<NodeId> for NodeList {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> NodeList {
        NodeList {
            nodes: iter.into_iter().collect(),
        }
    }
}

/// Owner of every node of one or more trees, plus the names they use.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "ArenaSnapshot", try_from = "ArenaSnapshot")]
pub struct AstArena {
    nodes: Vec<NodeData>,
    interner: Interner,
}

/// Serialized form of an arena: the string table in atom order and the
/// nodes in id order.
#[derive(Serialize, Deserialize)]
struct ArenaSnapshot {
    strings: Vec<String>,
    nodes: Vec<NodeData>,
}

impl From<AstArena> for ArenaSnapshot {
    fn from(arena: AstArena) -> ArenaSnapshot {
        ArenaSnapshot {
            strings: arena.interner.strings().map(str::to_string).collect(),
            nodes: arena.nodes,
        }
    }
}

impl TryFrom<ArenaSnapshot> for AstArena {
    type Error = SnapshotError;

    /// Nodes stored in the builtin slots must be the matching sentinels.
    /// A snapshot shorter than the sentinel block gets the missing ones
    /// appended.
    fn try_from(snapshot: ArenaSnapshot) -> Result<AstArena, SnapshotError> {
        let interner = Interner::from_strings(snapshot.strings)?;
        for (index, (data, builtin)) in snapshot.nodes.iter().zip(BuiltinType::ALL).enumerate() {
            if *data != builtin_sentinel(builtin) {
                return Err(SnapshotError::BuiltinSlot {
                    node: NodeId(index as u32),
                    expected: builtin,
                    found: data.kind(),
                });
            }
        }
        let mut arena = AstArena {
            nodes: snapshot.nodes,
            interner,
        };
        arena.push_missing_builtins();
        Ok(arena)
    }
}

fn builtin_sentinel(builtin: BuiltinType) -> NodeData {
    NodeData::ImplicitBuiltinType(ImplicitBuiltinType { builtin })
}

impl Default for AstArena {
    fn default() -> Self {
        Self::new()
    }
}

impl AstArena {
    pub fn new() -> AstArena {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> AstArena {
        let mut interner = Interner::new();
        interner.intern_common();
        let mut arena = AstArena {
            nodes: Vec::with_capacity(capacity.min(MAX_ARENA_PREALLOC) + BuiltinType::ALL.len()),
            interner,
        };
        arena.push_missing_builtins();
        arena
    }

    fn push_missing_builtins(&mut self) {
        for builtin in BuiltinType::ALL.into_iter().skip(self.nodes.len()) {
            self.nodes.push(builtin_sentinel(builtin));
        }
    }

    /// Store a node and return its handle.
    pub fn alloc(&mut self, node: impl Into<NodeData>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node.into());
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= BuiltinType::ALL.len()
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// All node ids in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Node data for `id`.
    ///
    /// # Panics
    /// If `id` was not allocated by this arena.
    #[inline]
    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub fn get_data(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.index())
    }

    /// Typed access to a node; `None` when the node has another kind.
    #[inline]
    pub fn get<T: AstNode>(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id.index()).and_then(T::from_data)
    }

    #[inline]
    pub fn get_mut<T: AstNode>(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id.index()).and_then(T::from_data_mut)
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.data(id).kind()
    }

    #[inline]
    pub fn category(&self, id: NodeId) -> Category {
        self.kind(id).category()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { arena: self, id }
    }

    #[inline]
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    #[inline]
    pub fn intern(&mut self, name: &str) -> Atom {
        self.interner.intern(name)
    }

    #[inline]
    pub fn resolve(&self, atom: Atom) -> &str {
        self.interner.resolve(atom)
    }

    /// The shared sentinel node of a builtin type.
    #[inline]
    pub fn builtin(&self, builtin: BuiltinType) -> NodeId {
        NodeId(builtin as u32)
    }

    /// Whether `id` is one of the preallocated builtin sentinels.
    #[inline]
    pub fn is_builtin(&self, id: NodeId) -> bool {
        id.index() < BuiltinType::ALL.len()
    }

    /// The owned children of a node in traversal order, with back-references
    /// skipped and aliased shared slots reported once.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let data = self.data(id);
        let mut children = Vec::new();
        let mut shared_seen: smallvec::SmallVec<[NodeId; 4]> = smallvec::SmallVec::new();
        for (index, info) in data.kind().slots().iter().enumerate() {
            let Some(value) = data.slot(index) else {
                continue;
            };
            match info.kind {
                SlotKind::Back => {}
                SlotKind::Shared | SlotKind::SharedOpt => {
                    if let Some(child) = value.single() {
                        if !shared_seen.contains(&child) {
                            shared_seen.push(child);
                            children.push(child);
                        }
                    }
                }
                SlotKind::One | SlotKind::Opt | SlotKind::List => {
                    children.extend_from_slice(value.as_slice());
                }
            }
        }
        children
    }

    /// Position and metadata of the named slot of a node.
    pub fn slot_info(
        &self,
        id: NodeId,
        slot: &str,
    ) -> Result<(usize, &'static SlotInfo), ContractViolation> {
        let kind = self.kind(id);
        kind.slots()
            .iter()
            .enumerate()
            .find(|(_, info)| info.name == slot)
            .ok_or_else(|| ContractViolation::UnknownSlot {
                kind,
                slot: slot.to_string(),
            })
    }

    /// Current value of the named slot.
    pub fn slot(&self, id: NodeId, slot: &str) -> Result<SlotRef<'_>, ContractViolation> {
        let (index, _) = self.slot_info(id, slot)?;
        self.data(id)
            .slot(index)
            .ok_or_else(|| ContractViolation::UnknownSlot {
                kind: self.kind(id),
                slot: slot.to_string(),
            })
    }

    pub(crate) fn check_category(
        &self,
        owner: NodeKind,
        info: &SlotInfo,
        child: NodeId,
    ) -> Result<(), ContractViolation> {
        let Some(data) = self.get_data(child) else {
            return Err(ContractViolation::DanglingNode { node: child });
        };
        let found = data.kind().category();
        if found.is_a(info.category) {
            Ok(())
        } else {
            Err(ContractViolation::CategoryMismatch {
                kind: owner,
                slot: info.name,
                expected: info.category,
                found,
            })
        }
    }

    /// Store `value` into a single-valued slot, after checking nullability
    /// and category.
    pub fn replace_child(
        &mut self,
        id: NodeId,
        slot: &str,
        value: Option<NodeId>,
    ) -> Result<(), ContractViolation> {
        let (index, info) = self.slot_info(id, slot)?;
        let owner = self.kind(id);
        if info.kind.is_list() {
            return Err(ContractViolation::ShapeMismatch {
                kind: owner,
                slot: info.name,
                expected_list: true,
            });
        }
        if let Some(child) = value {
            self.check_category(owner, info, child)?;
        }
        self.store_single(id, index, info, value)
    }

    /// Replace the whole content of a sequence slot.
    pub fn replace_children(
        &mut self,
        id: NodeId,
        slot: &str,
        values: Vec<NodeId>,
    ) -> Result<(), ContractViolation> {
        let (index, info) = self.slot_info(id, slot)?;
        let owner = self.kind(id);
        if !info.kind.is_list() {
            return Err(ContractViolation::ShapeMismatch {
                kind: owner,
                slot: info.name,
                expected_list: false,
            });
        }
        for &child in &values {
            self.check_category(owner, info, child)?;
        }
        self.store_list(id, index, values);
        Ok(())
    }

    pub(crate) fn store_single(
        &mut self,
        id: NodeId,
        index: usize,
        info: &SlotInfo,
        value: Option<NodeId>,
    ) -> Result<(), ContractViolation> {
        let owner = self.kind(id);
        match (self.data_mut(id).slot_mut(index), value) {
            (Some(SlotMut::Single(field)), Some(child)) => {
                *field = child;
                Ok(())
            }
            (Some(SlotMut::Single(_)), None) => Err(ContractViolation::AbsentNonNullable {
                kind: owner,
                slot: info.name,
            }),
            (Some(SlotMut::Optional(field)), value) => {
                *field = value;
                Ok(())
            }
            (Some(SlotMut::List(_)), _) => Err(ContractViolation::ShapeMismatch {
                kind: owner,
                slot: info.name,
                expected_list: true,
            }),
            (None, _) => Err(ContractViolation::UnknownSlot {
                kind: owner,
                slot: info.name.to_string(),
            }),
        }
    }

    pub(crate) fn store_list(&mut self, id: NodeId, index: usize, values: Vec<NodeId>) {
        if let Some(SlotMut::List(list)) = self.data_mut(id).slot_mut(index) {
            list.nodes = values;
        }
    }

    /// The type of an expression-like node.
    ///
    /// Owned types are read from the node's type slot; derived types are
    /// re-read from the child they are defined by on every call; builtin
    /// types resolve to the arena's sentinel. Untyped kinds return `None`,
    /// as does a derivation chain longer than `MAX_TREE_DEPTH` (only a
    /// malformed tree can loop).
    pub fn type_of(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        for _ in 0..=MAX_TREE_DEPTH {
            let data = self.get_data(current)?;
            let (slot, derived) = match data.kind().type_rule() {
                TypeRule::Untyped => return None,
                TypeRule::Builtin(builtin) => return Some(self.builtin(builtin)),
                TypeRule::Own(slot) | TypeRule::ChildNode(slot) => (slot, false),
                TypeRule::Child(slot) => (slot, true),
            };
            let (index, _) = self.slot_info(current, slot).ok()?;
            let child = data.slot(index)?.single()?;
            if !derived {
                return Some(child);
            }
            current = child;
        }
        warn!(node = id.0, "type derivation does not terminate");
        None
    }

    /// Replace the type of a node that owns its type slot.
    ///
    /// Nodes whose type is derived from a child or fixed to a builtin keep
    /// reporting the derived type; the call is a no-op for them, as it is
    /// for untyped kinds.
    pub fn replace_type(&mut self, id: NodeId, ty: NodeId) -> Result<(), ContractViolation> {
        let kind = self.kind(id);
        let TypeRule::Own(slot) = kind.type_rule() else {
            trace!(kind = kind.name(), node = id.0, "replace_type ignored for computed type");
            return Ok(());
        };
        self.replace_child(id, slot, Some(ty))
    }

    /// The companion object nested in a class, if any.
    pub fn companion_object(&self, class: NodeId) -> Option<NodeId> {
        self.get::<crate::nodes::RegularClass>(class)?
            .companion_object(self)
    }
}

/// Read-only view of one node, handed to visitor methods.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    arena: &'a AstArena,
    id: NodeId,
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.kind().name(), self.id.0)
    }
}

impl<'a> NodeRef<'a> {
    #[inline]
    pub fn id(self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn arena(self) -> &'a AstArena {
        self.arena
    }

    #[inline]
    pub fn data(self) -> &'a NodeData {
        self.arena.data(self.id)
    }

    #[inline]
    pub fn kind(self) -> NodeKind {
        self.data().kind()
    }

    #[inline]
    pub fn category(self) -> Category {
        self.kind().category()
    }

    #[inline]
    pub fn get<T: AstNode>(self) -> Option<&'a T> {
        self.arena.get(self.id)
    }

    #[inline]
    pub fn type_of(self) -> Option<NodeId> {
        self.arena.type_of(self.id)
    }

    #[inline]
    pub fn resolve(self, atom: Atom) -> &'a str {
        self.arena.resolve(atom)
    }

    /// View of another node of the same arena.
    #[inline]
    pub fn with_id(self, id: NodeId) -> NodeRef<'a> {
        NodeRef {
            arena: self.arena,
            id,
        }
    }
}
