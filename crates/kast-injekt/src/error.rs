use crate::key::Key;
use std::fmt;

/// Errors raised while assembling a component or resolving from one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InjektError {
    /// No binding for the key in the component or any of its dependencies.
    NotFound { key: Key },
    /// The key is bound twice and the later binding does not override.
    AlreadyDeclared { key: Key },
    /// The map already holds `entry` and the later element does not override.
    DuplicateMapEntry { map: Key, entry: String },
    /// The scope appears twice among the component and its dependencies.
    DuplicateScope { scope: String },
    /// A dependency is scoped but the component being built is not.
    MissingScope { dependency_scopes: Vec<String> },
    /// The same dependency component was added twice.
    DuplicateDependency,
    /// The binding for the key produced a value of another type.
    TypeMismatch { key: Key, requested: &'static str },
    /// Resolution nested deeper than the configured limit.
    DepthExceeded { key: Key, depth: usize },
    /// Resolving the last key of `path` requires itself.
    Cycle { path: Vec<Key> },
}

impl fmt::Display for InjektError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjektError::NotFound { key } => write!(f, "no binding found for {key}"),
            InjektError::AlreadyDeclared { key } => {
                write!(f, "already declared binding for {key}")
            }
            InjektError::DuplicateMapEntry { map, entry } => {
                write!(f, "already declared entry {entry} in {map}")
            }
            InjektError::DuplicateScope { scope } => write!(f, "duplicated scope '{scope}'"),
            InjektError::MissingScope { dependency_scopes } => write!(
                f,
                "component must have a scope because a dependency has scopes [{}]",
                dependency_scopes.join(", ")
            ),
            InjektError::DuplicateDependency => f.write_str("duplicated dependency component"),
            InjektError::TypeMismatch { key, requested } => {
                write!(f, "binding for {key} cannot be read as {requested}")
            }
            InjektError::DepthExceeded { key, depth } => write!(
                f,
                "resolving {key} exceeded the maximum depth of {depth}"
            ),
            InjektError::Cycle { path } => {
                f.write_str("dependency cycle: ")?;
                for (index, key) in path.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" -> ")?;
                    }
                    write!(f, "{key}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for InjektError {}
