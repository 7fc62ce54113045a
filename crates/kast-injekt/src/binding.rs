//! Declared bindings and the per-component state that backs them.

use crate::component::Resolver;
use crate::error::InjektError;
use crate::key::Key;
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// A resolved value, shared between everyone who asked for it.
pub(crate) type Instance = Arc<dyn Any + Send + Sync>;

pub(crate) type Provider =
    Arc<dyn Fn(&Resolver<'_>) -> Result<Instance, InjektError> + Send + Sync>;

/// How often a binding's provider runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// On every request.
    Factory,
    /// Once per component, on first request (or at build time when eager).
    Single,
    /// Never; the value was supplied up front.
    Instance,
}

/// Name and flags of a declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindOptions {
    pub name: Option<String>,
    /// Replace an earlier binding for the same key instead of failing.
    pub overrides: bool,
    /// Create a `Single` while the component is built.
    pub eager: bool,
}

impl BindOptions {
    pub fn named(name: impl Into<String>) -> BindOptions {
        BindOptions {
            name: Some(name.into()),
            ..BindOptions::default()
        }
    }

    pub fn overriding(mut self) -> BindOptions {
        self.overrides = true;
        self
    }

    pub fn eager(mut self) -> BindOptions {
        self.eager = true;
        self
    }

    pub(crate) fn key<T: 'static>(&self) -> Key {
        match &self.name {
            Some(name) => Key::named::<T>(name),
            None => Key::of::<T>(),
        }
    }
}

/// A declaration as stored in a module.
#[derive(Clone)]
pub(crate) struct Binding {
    pub key: Key,
    pub kind: BindingKind,
    pub overrides: bool,
    pub eager: bool,
    pub provider: Provider,
}

impl Binding {
    pub fn new<T, F>(kind: BindingKind, options: &BindOptions, provider: F) -> Binding
    where
        T: Send + Sync + 'static,
        F: Fn(&Resolver<'_>) -> Result<T, InjektError> + Send + Sync + 'static,
    {
        Binding {
            key: options.key::<T>(),
            kind,
            overrides: options.overrides,
            eager: options.eager && kind == BindingKind::Single,
            provider: Arc::new(move |resolver: &Resolver<'_>| {
                provider(resolver).map(|value| Arc::new(value) as Instance)
            }),
        }
    }

    pub fn instance<T: Send + Sync + 'static>(options: &BindOptions, value: T) -> Binding {
        let value: Instance = Arc::new(value);
        Binding {
            key: options.key::<T>(),
            kind: BindingKind::Instance,
            overrides: options.overrides,
            eager: false,
            provider: Arc::new(move |_: &Resolver<'_>| Ok(Arc::clone(&value))),
        }
    }
}

/// One contribution to the set of `T` values, keyed by element type.
#[derive(Clone)]
pub(crate) struct SetElement {
    pub element: Key,
    pub provider: Provider,
}

/// Types usable as the entry key of a map multibinding.
pub trait MapKey: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

impl<K: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static> MapKey for K {}

/// One entry of the `K` to `V` map, keyed by the map type and name.
#[derive(Clone)]
pub(crate) struct MapElement {
    pub map: Key,
    entry: Instance,
    same_entry: fn(&Instance, &Instance) -> bool,
    entry_label: Arc<str>,
    pub overrides: bool,
    pub provider: Provider,
}

impl MapElement {
    pub fn new<K, V, F>(options: &BindOptions, entry: K, provider: F) -> MapElement
    where
        K: MapKey,
        V: Send + Sync + 'static,
        F: Fn(&Resolver<'_>) -> Result<V, InjektError> + Send + Sync + 'static,
    {
        let binding = Binding::new(BindingKind::Factory, &BindOptions::default(), provider);
        MapElement {
            map: options.key::<IndexMap<K, Arc<V>>>(),
            entry_label: Arc::from(format!("{entry:?}")),
            entry: Arc::new(entry),
            same_entry: same_entry::<K>,
            overrides: options.overrides,
            provider: binding.provider,
        }
    }

    /// Whether both fill the same entry of the same map.
    pub fn same_slot(&self, other: &MapElement) -> bool {
        self.map == other.map && (self.same_entry)(&self.entry, &other.entry)
    }

    pub fn entry<K: 'static>(&self) -> Option<&K> {
        (*self.entry).downcast_ref::<K>()
    }

    pub fn duplicate(&self) -> InjektError {
        InjektError::DuplicateMapEntry {
            map: self.map.clone(),
            entry: self.entry_label.to_string(),
        }
    }
}

fn same_entry<K: PartialEq + 'static>(a: &Instance, b: &Instance) -> bool {
    match ((**a).downcast_ref::<K>(), (**b).downcast_ref::<K>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// A binding installed in a component, with its cached value.
pub(crate) struct ComponentBinding {
    pub binding: Binding,
    cache: OnceCell<Instance>,
}

impl ComponentBinding {
    pub fn new(binding: Binding) -> ComponentBinding {
        ComponentBinding {
            binding,
            cache: OnceCell::new(),
        }
    }

    pub fn instance(&self, resolver: &Resolver<'_>) -> Result<Instance, InjektError> {
        match self.binding.kind {
            BindingKind::Factory => (self.binding.provider)(resolver),
            BindingKind::Single | BindingKind::Instance => self
                .cache
                .get_or_try_init(|| (self.binding.provider)(resolver))
                .cloned(),
        }
    }

    pub fn is_created(&self) -> bool {
        self.cache.get().is_some()
    }
}
