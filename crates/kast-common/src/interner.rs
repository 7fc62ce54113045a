//! String interner for identifiers carried by syntax tree nodes.
//!
//! Names, labels and import paths are stored as `Atom` handles so nodes stay
//! `Copy`-friendly and names compare as integers. The arena that owns a tree
//! also owns its interner; resolving an atom needs that interner.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An interned string identifier.
///
/// Atoms are cheap to copy (just a u32) and can be compared with == in O(1).
/// To get the actual string, use `Interner::resolve(atom)`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, PartialOrd, Ord,
)]
#[serde(transparent)]
pub struct Atom(pub u32);

impl Atom {
    /// A sentinel value representing no atom / empty string.
    pub const NONE: Atom = Atom(0);

    /// Check if this is the empty/none atom.
    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Get the raw index value.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Names that show up in almost every tree: builtin type names and the
/// synthetic names used for receivers and accessors.
const COMMON_STRINGS: &[&str] = &[
    "Unit",
    "Boolean",
    "Nothing",
    "Any",
    "Int",
    "String",
    "this",
    "it",
    "<get>",
    "<set>",
    "<init>",
    "value",
    "field",
    "Companion",
];

/// A string table that cannot back the atoms stored next to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StringTableError {
    /// Entry 0 is not the empty string, so every atom would be off by one.
    MissingEmptyEntry { found: String },
}

impl std::fmt::Display for StringTableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StringTableError::MissingEmptyEntry { found } => write!(
                f,
                "string table must start with the empty string, found {found:?}"
            ),
        }
    }
}

impl std::error::Error for StringTableError {}

/// Single-threaded string interner.
#[derive(Clone, Debug)]
pub struct Interner {
    /// Map from string to atom index
    map: FxHashMap<Arc<str>, Atom>,
    /// Vector of all interned strings (index 0 is empty string)
    strings: Vec<Arc<str>>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    /// Create a new interner with the empty string pre-interned at index 0.
    pub fn new() -> Self {
        let mut interner = Interner {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(64),
        };
        // Index 0 is reserved for empty/none
        let empty: Arc<str> = Arc::from("");
        interner.strings.push(empty.clone());
        interner.map.insert(empty, Atom::NONE);
        interner
    }

    /// Rebuild an interner from a string table in atom order.
    ///
    /// The first entry must be the empty string that backs `Atom::NONE`; an
    /// empty table stands for a table holding only that entry. Duplicate
    /// strings keep their first atom.
    pub fn from_strings<I, S>(strings: I) -> Result<Self, StringTableError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut strings = strings.into_iter();
        let Some(first) = strings.next() else {
            return Ok(Interner::new());
        };
        if !first.as_ref().is_empty() {
            return Err(StringTableError::MissingEmptyEntry {
                found: first.as_ref().to_string(),
            });
        }
        let mut interner = Interner::new();
        for s in strings {
            let owned: Arc<str> = Arc::from(s.as_ref());
            let atom = Atom(interner.strings.len() as u32);
            interner.strings.push(owned.clone());
            interner.map.entry(owned).or_insert(atom);
        }
        Ok(interner)
    }

    /// Intern a string, returning its Atom handle.
    /// If the string was already interned, returns the existing Atom.
    #[inline]
    pub fn intern(&mut self, s: &str) -> Atom {
        if let Some(&atom) = self.map.get(s) {
            return atom;
        }
        let atom = Atom(self.strings.len() as u32);
        let owned: Arc<str> = Arc::from(s);
        self.strings.push(owned.clone());
        self.map.insert(owned, atom);
        atom
    }

    /// Look up a string without interning it.
    #[inline]
    pub fn lookup(&self, s: &str) -> Option<Atom> {
        self.map.get(s).copied()
    }

    /// Resolve an Atom back to its string value.
    /// Returns empty string if atom is out of bounds (safety for error recovery).
    #[inline]
    pub fn resolve(&self, atom: Atom) -> &str {
        self.strings
            .get(atom.0 as usize)
            .map(|s| s.as_ref())
            .unwrap_or("")
    }

    /// Try to resolve an Atom, returning None if invalid.
    #[inline]
    pub fn try_resolve(&self, atom: Atom) -> Option<&str> {
        self.strings.get(atom.0 as usize).map(|s| s.as_ref())
    }

    /// Get the number of interned strings.
    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if the interner is empty (only has the empty string).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.len() <= 1
    }

    /// Pre-intern builtin type names and synthetic identifiers.
    pub fn intern_common(&mut self) {
        for s in COMMON_STRINGS {
            self.intern(s);
        }
    }

    /// All interned strings in atom order, starting with the empty string.
    pub fn strings(&self) -> impl Iterator<Item = &str> + '_ {
        self.strings.iter().map(|s| s.as_ref())
    }
}
