use crate::arena::NodeId;
use crate::attributes::BuiltinType;
use crate::nodes::{Category, NodeKind};
use kast_common::StringTableError;
use std::fmt;

/// A violated child-slot contract.
///
/// Explicit mutators (`replace_child`, `replace_children`, `replace_type`)
/// return these so the caller can react. During a transform the same values
/// are raised as panics: a transformer that removes a non-nullable child or
/// returns a node of the wrong category is a bug in that transformer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContractViolation {
    /// An absent value was stored into a non-nullable slot.
    AbsentNonNullable { kind: NodeKind, slot: &'static str },
    /// A node of the wrong category was stored into a slot.
    CategoryMismatch {
        kind: NodeKind,
        slot: &'static str,
        expected: Category,
        found: Category,
    },
    /// More than one node was offered for a single-valued slot.
    MultipleForSingle {
        kind: NodeKind,
        slot: &'static str,
        count: usize,
    },
    /// The node kind has no slot with this name.
    UnknownSlot { kind: NodeKind, slot: String },
    /// A sequence was offered for a single slot or the other way round.
    ShapeMismatch {
        kind: NodeKind,
        slot: &'static str,
        expected_list: bool,
    },
    /// The id does not name a node in this arena.
    DanglingNode { node: NodeId },
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractViolation::AbsentNonNullable { kind, slot } => write!(
                f,
                "non-nullable slot '{slot}' of {} cannot be absent",
                kind.name()
            ),
            ContractViolation::CategoryMismatch {
                kind,
                slot,
                expected,
                found,
            } => write!(
                f,
                "slot '{slot}' of {} expects {}, found {}",
                kind.name(),
                expected.name(),
                found.name()
            ),
            ContractViolation::MultipleForSingle { kind, slot, count } => write!(
                f,
                "slot '{slot}' of {} holds one node, got {count}",
                kind.name()
            ),
            ContractViolation::UnknownSlot { kind, slot } => {
                write!(f, "{} has no slot named '{slot}'", kind.name())
            }
            ContractViolation::ShapeMismatch {
                kind,
                slot,
                expected_list,
            } => {
                let shape = if *expected_list { "a sequence" } else { "a single node" };
                write!(f, "slot '{slot}' of {} holds {shape}", kind.name())
            }
            ContractViolation::DanglingNode { node } => {
                write!(f, "node #{} is not in this arena", node.0)
            }
        }
    }
}

impl std::error::Error for ContractViolation {}

/// A serialized arena that cannot be loaded as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotError {
    StringTable(StringTableError),
    /// A builtin sentinel slot holds some other node.
    BuiltinSlot {
        node: NodeId,
        expected: BuiltinType,
        found: NodeKind,
    },
}

impl From<StringTableError> for SnapshotError {
    fn from(err: StringTableError) -> Self {
        SnapshotError::StringTable(err)
    }
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::StringTable(err) => write!(f, "{err}"),
            SnapshotError::BuiltinSlot {
                node,
                expected,
                found,
            } => write!(
                f,
                "node #{} must be the {} builtin type, found {}",
                node.0,
                expected.name(),
                found.name()
            ),
        }
    }
}

impl std::error::Error for SnapshotError {}
