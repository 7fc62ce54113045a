//! Binding keys.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identifies a binding: the bound type plus an optional name.
///
/// Two keys are equal when they name the same type and the same qualifier.
/// The type name is carried for messages only.
#[derive(Clone, Debug)]
pub struct Key {
    type_id: TypeId,
    type_name: &'static str,
    qualifier: Option<Arc<str>>,
}

impl Key {
    pub fn of<T: 'static>() -> Key {
        Key {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            qualifier: None,
        }
    }

    pub fn named<T: 'static>(name: &str) -> Key {
        Key {
            qualifier: Some(Arc::from(name)),
            ..Key::of::<T>()
        }
    }

    /// Same type, with `name` as qualifier (or none).
    pub fn with_qualifier(&self, name: Option<&str>) -> Key {
        Key {
            type_id: self.type_id,
            type_name: self.type_name,
            qualifier: name.map(Arc::from),
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// Whether this key's type is `T`, whatever the qualifier.
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Key) -> bool {
        self.type_id == other.type_id && self.qualifier == other.qualifier
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.qualifier.hash(state);
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(name) => write!(f, "{} named \"{name}\"", self.type_name),
            None => f.write_str(self.type_name),
        }
    }
}
