//! Plain (non-child) node attributes.

use kast_common::{Atom, Interner};
use serde::{Deserialize, Serialize};

/// Handle of a resolved declaration symbol. Symbol tables live outside the
/// tree; `SymbolId(0)` means "not resolved yet".
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub const UNRESOLVED: SymbolId = SymbolId(0);

    #[inline]
    pub fn is_resolved(self) -> bool {
        self.0 != 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Protected,
    Internal,
    Local,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modality {
    #[default]
    Final,
    Open,
    Abstract,
    Sealed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    EnumClass,
    EnumEntry,
    AnnotationClass,
    Object,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variance {
    #[default]
    Invariant,
    In,
    Out,
}

/// Operators carried by comparison, equality, type-operator and compound
/// assignment nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    #[default]
    Equal,
    NotEqual,
    Identity,
    NotIdentity,
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,
    Assign,
    PlusAssign,
    MinusAssign,
    TimesAssign,
    DivAssign,
    RemAssign,
    Is,
    NotIs,
    As,
    SafeAs,
}

impl Operation {
    pub fn operator(self) -> &'static str {
        match self {
            Operation::Equal => "==",
            Operation::NotEqual => "!=",
            Operation::Identity => "===",
            Operation::NotIdentity => "!==",
            Operation::Less => "<",
            Operation::Greater => ">",
            Operation::LessOrEqual => "<=",
            Operation::GreaterOrEqual => ">=",
            Operation::Assign => "=",
            Operation::PlusAssign => "+=",
            Operation::MinusAssign => "-=",
            Operation::TimesAssign => "*=",
            Operation::DivAssign => "/=",
            Operation::RemAssign => "%=",
            Operation::Is => "is",
            Operation::NotIs => "!is",
            Operation::As => "as",
            Operation::SafeAs => "as?",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicOperationKind {
    #[default]
    And,
    Or,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UseSiteTarget {
    Field,
    File,
    Property,
    PropertyGetter,
    PropertySetter,
    Receiver,
    ConstructorParameter,
    SetterParameter,
    PropertyDelegateField,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationResolveStatus {
    #[default]
    Unresolved,
    PartiallyResolved,
    Resolved,
}

/// The well-known types that synthetic nodes report without owning a type
/// child. Each has a shared `ImplicitBuiltinType` node preallocated in every
/// arena, in declaration order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltinType {
    #[default]
    Unit,
    Boolean,
    Nothing,
    Any,
    Int,
    String,
}

impl BuiltinType {
    pub const ALL: [BuiltinType; 6] = [
        BuiltinType::Unit,
        BuiltinType::Boolean,
        BuiltinType::Nothing,
        BuiltinType::Any,
        BuiltinType::Int,
        BuiltinType::String,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinType::Unit => "Unit",
            BuiltinType::Boolean => "Boolean",
            BuiltinType::Nothing => "Nothing",
            BuiltinType::Any => "Any",
            BuiltinType::Int => "Int",
            BuiltinType::String => "String",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ConstValue {
    #[default]
    Null,
    Boolean(bool),
    Char(char),
    Int(i64),
    Float(f64),
    String(Atom),
}

/// Renders an attribute value for tree dumps.
pub trait AttrDisplay {
    fn display(&self, interner: &Interner) -> String;
}

impl AttrDisplay for Atom {
    fn display(&self, interner: &Interner) -> String {
        format!("{:?}", interner.resolve(*self))
    }
}

impl AttrDisplay for bool {
    fn display(&self, _interner: &Interner) -> String {
        self.to_string()
    }
}

impl AttrDisplay for u32 {
    fn display(&self, _interner: &Interner) -> String {
        self.to_string()
    }
}

impl AttrDisplay for SymbolId {
    fn display(&self, _interner: &Interner) -> String {
        if self.is_resolved() {
            format!("${}", self.0)
        } else {
            "<unresolved>".to_string()
        }
    }
}

impl AttrDisplay for ConstValue {
    fn display(&self, interner: &Interner) -> String {
        match self {
            ConstValue::Null => "null".to_string(),
            ConstValue::Boolean(value) => value.to_string(),
            ConstValue::Char(value) => format!("{value:?}"),
            ConstValue::Int(value) => value.to_string(),
            ConstValue::Float(value) => value.to_string(),
            ConstValue::String(atom) => atom.display(interner),
        }
    }
}

impl AttrDisplay for Operation {
    fn display(&self, _interner: &Interner) -> String {
        self.operator().to_string()
    }
}

impl<T: AttrDisplay> AttrDisplay for Option<T> {
    fn display(&self, interner: &Interner) -> String {
        match self {
            Some(value) => value.display(interner),
            None => "none".to_string(),
        }
    }
}

macro_rules! impl_attr_display_debug {
    ($($ty:ty),* $(,)?) => {
        $(
            impl AttrDisplay for $ty {
                fn display(&self, _interner: &Interner) -> String {
                    format!("{self:?}")
                }
            }
        )*
    };
}

impl_attr_display_debug!(
    Visibility,
    Modality,
    ClassKind,
    Variance,
    LogicOperationKind,
    UseSiteTarget,
    AnnotationResolveStatus,
    BuiltinType,
);
