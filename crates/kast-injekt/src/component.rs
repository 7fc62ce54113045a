//! Assembled components and resolution.

use crate::binding::{BindOptions, Binding, ComponentBinding, Instance, MapElement, MapKey, SetElement};
use crate::error::InjektError;
use crate::key::Key;
use crate::module::Module;
use indexmap::IndexMap;
use kast_common::limits::MAX_RESOLUTION_DEPTH;
use rustc_hash::{FxBuildHasher, FxHashMap};
use smallvec::SmallVec;
use std::any::type_name;
use std::sync::Arc;
use tracing::{debug, trace};

/// Collects scopes, dependencies, modules and instances for a `Component`.
#[derive(Default)]
pub struct ComponentBuilder {
    scopes: Vec<String>,
    dependencies: Vec<Arc<Component>>,
    modules: Vec<Module>,
    instances: Module,
    instance_errors: Vec<InjektError>,
}

impl ComponentBuilder {
    pub fn new() -> ComponentBuilder {
        ComponentBuilder::default()
    }

    pub fn scope(mut self, scope: impl Into<String>) -> ComponentBuilder {
        self.scopes.push(scope.into());
        self
    }

    /// Fall back to `dependency` for keys this component does not bind.
    pub fn dependency(mut self, dependency: Arc<Component>) -> ComponentBuilder {
        self.dependencies.push(dependency);
        self
    }

    pub fn module(mut self, module: Module) -> ComponentBuilder {
        self.modules.push(module);
        self
    }

    /// Bind `T` to `value` in this component.
    pub fn instance<T: Send + Sync + 'static>(self, value: T) -> ComponentBuilder {
        self.instance_with(BindOptions::default(), value)
    }

    pub fn instance_with<T: Send + Sync + 'static>(
        mut self,
        options: BindOptions,
        value: T,
    ) -> ComponentBuilder {
        if let Err(err) = self.instances.instance_with(options, value) {
            self.instance_errors.push(err);
        }
        self
    }

    /// Check the declarations and create the component.
    ///
    /// Fails when a scope repeats among this component and its
    /// dependencies, when a dependency is scoped but this component is not,
    /// when a dependency is added twice, or when a key or a map entry is
    /// declared twice without the later declaration overriding. Eager
    /// singles are created before returning.
    #[tracing::instrument(level = "debug", skip_all, fields(scopes = ?self.scopes))]
    pub fn build(self) -> Result<Arc<Component>, InjektError> {
        if let Some(err) = self.instance_errors.into_iter().next() {
            return Err(err);
        }
        check_dependencies(&self.dependencies)?;
        check_scopes(&self.scopes, &self.dependencies)?;

        let mut inherited: FxHashMap<Key, *const Component> = FxHashMap::default();
        for dependency in &self.dependencies {
            dependency.collect_keys(&mut inherited)?;
        }

        let mut inherited_entries = Vec::new();
        for dependency in &self.dependencies {
            dependency.collect_map_elements(None, &mut inherited_entries);
        }
        check_map_entries(&inherited_entries)?;

        let mut bindings: IndexMap<Key, ComponentBinding, FxBuildHasher> = IndexMap::default();
        let mut set_elements: Vec<SetElement> = Vec::new();
        let mut map_elements: Vec<MapElement> = Vec::new();
        for module in self.modules.into_iter().chain(std::iter::once(self.instances)) {
            let (declared, elements, entries) = module.into_parts();
            for binding in declared {
                install(&mut bindings, &inherited, binding)?;
            }
            set_elements.extend(elements);
            for entry in entries {
                install_map_element(&mut map_elements, &inherited_entries, entry)?;
            }
        }

        let component = Arc::new(Component {
            scopes: self.scopes,
            dependencies: self.dependencies,
            bindings,
            set_elements,
            map_elements,
        });

        for (key, binding) in &component.bindings {
            if binding.binding.eager {
                debug!(key = %key, "creating eager single");
                binding.instance(&Resolver::root(&component).nested(&component, key))?;
            }
        }
        debug!(bindings = component.bindings.len(), "component built");
        Ok(component)
    }
}

fn check_dependencies(dependencies: &[Arc<Component>]) -> Result<(), InjektError> {
    for (index, dependency) in dependencies.iter().enumerate() {
        if dependencies[..index]
            .iter()
            .any(|earlier| Arc::ptr_eq(earlier, dependency))
        {
            return Err(InjektError::DuplicateDependency);
        }
    }
    Ok(())
}

fn check_scopes(scopes: &[String], dependencies: &[Arc<Component>]) -> Result<(), InjektError> {
    let mut seen: SmallVec<[&str; 4]> = SmallVec::new();
    let dependency_scopes = dependencies.iter().flat_map(|d| d.scopes.iter());
    for scope in dependency_scopes.clone().chain(scopes.iter()) {
        if seen.contains(&scope.as_str()) {
            return Err(InjektError::DuplicateScope {
                scope: scope.clone(),
            });
        }
        seen.push(scope.as_str());
    }
    if scopes.is_empty() && dependency_scopes.clone().next().is_some() {
        return Err(InjektError::MissingScope {
            dependency_scopes: dependency_scopes.cloned().collect(),
        });
    }
    Ok(())
}

fn install(
    bindings: &mut IndexMap<Key, ComponentBinding, FxBuildHasher>,
    inherited: &FxHashMap<Key, *const Component>,
    binding: Binding,
) -> Result<(), InjektError> {
    let declared = bindings.contains_key(&binding.key) || inherited.contains_key(&binding.key);
    if declared && !binding.overrides {
        return Err(InjektError::AlreadyDeclared { key: binding.key });
    }
    if declared {
        trace!(key = %binding.key, "binding overridden");
    }
    bindings.insert(binding.key.clone(), ComponentBinding::new(binding));
    Ok(())
}

/// Entries reachable through two dependencies must agree: a later entry
/// for the same key has to override the earlier one.
fn check_map_entries(entries: &[(&Component, &MapElement)]) -> Result<(), InjektError> {
    for (index, (_, element)) in entries.iter().enumerate() {
        if element.overrides {
            continue;
        }
        if entries[..index]
            .iter()
            .any(|(_, earlier)| earlier.same_slot(element))
        {
            return Err(element.duplicate());
        }
    }
    Ok(())
}

fn install_map_element(
    elements: &mut Vec<MapElement>,
    inherited: &[(&Component, &MapElement)],
    element: MapElement,
) -> Result<(), InjektError> {
    let local = elements
        .iter()
        .position(|existing| existing.same_slot(&element));
    let declared = local.is_some() || inherited.iter().any(|(_, seen)| seen.same_slot(&element));
    if declared && !element.overrides {
        return Err(element.duplicate());
    }
    match local {
        Some(index) => elements[index] = element,
        None => elements.push(element),
    }
    Ok(())
}

/// Bindings plus the dependencies to fall back to.
pub struct Component {
    scopes: Vec<String>,
    dependencies: Vec<Arc<Component>>,
    bindings: IndexMap<Key, ComponentBinding, FxBuildHasher>,
    set_elements: Vec<SetElement>,
    map_elements: Vec<MapElement>,
}

impl Component {
    pub fn builder() -> ComponentBuilder {
        ComponentBuilder::new()
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, InjektError> {
        Resolver::root(self).get()
    }

    pub fn get_named<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, InjektError> {
        Resolver::root(self).get_named(name)
    }

    /// Resolve `key` and read the value as `T`.
    pub fn get_key<T: Send + Sync + 'static>(&self, key: &Key) -> Result<Arc<T>, InjektError> {
        Resolver::root(self).get_key(key)
    }

    /// Every element contributed to the set of `T`, dependencies first.
    /// Empty when nothing contributes.
    pub fn get_set<T: Send + Sync + 'static>(&self) -> Result<Vec<Arc<T>>, InjektError> {
        Resolver::root(self).get_set()
    }

    /// Every entry contributed to the map from `K` to `V`. Dependencies
    /// contribute first; an overriding entry keeps the position of the
    /// entry it replaces. Empty when nothing contributes.
    pub fn get_map<K: MapKey, V: Send + Sync + 'static>(
        &self,
    ) -> Result<IndexMap<K, Arc<V>>, InjektError> {
        Resolver::root(self).get_map()
    }

    pub fn get_map_named<K: MapKey, V: Send + Sync + 'static>(
        &self,
        name: &str,
    ) -> Result<IndexMap<K, Arc<V>>, InjektError> {
        Resolver::root(self).get_map_named(name)
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    pub fn dependencies(&self) -> &[Arc<Component>] {
        &self.dependencies
    }

    /// Whether this component or a dependency binds `key`.
    pub fn contains(&self, key: &Key) -> bool {
        self.lookup(key).is_some()
    }

    /// Keys bound by this component itself, in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.bindings.keys()
    }

    /// Whether the single or instance bound to `key` has been created.
    pub fn is_created(&self, key: &Key) -> bool {
        self.lookup(key)
            .is_some_and(|(_, binding)| binding.is_created())
    }

    /// The binding for `key` and the component that owns it.
    fn lookup(&self, key: &Key) -> Option<(&Component, &ComponentBinding)> {
        if let Some(binding) = self.bindings.get(key) {
            return Some((self, binding));
        }
        self.dependencies
            .iter()
            .find_map(|dependency| dependency.lookup(key))
    }

    /// Record every key visible through this component, failing on a key
    /// that two unrelated components bind without overriding.
    fn collect_keys(&self, keys: &mut FxHashMap<Key, *const Component>) -> Result<(), InjektError> {
        for dependency in &self.dependencies {
            dependency.collect_keys(keys)?;
        }
        let owner = self as *const Component;
        for (key, binding) in &self.bindings {
            match keys.get(key) {
                Some(&existing) if existing == owner => {}
                Some(_) if !binding.binding.overrides => {
                    return Err(InjektError::AlreadyDeclared { key: key.clone() });
                }
                _ => {
                    keys.insert(key.clone(), owner);
                }
            }
        }
        Ok(())
    }

    fn collect_set_elements<'a>(&'a self, element: &Key, out: &mut Vec<(&'a Component, &'a SetElement)>) {
        for dependency in &self.dependencies {
            dependency.collect_set_elements(element, out);
        }
        for set_element in &self.set_elements {
            if &set_element.element == element
                && !out.iter().any(|(_, seen)| std::ptr::eq(*seen, set_element))
            {
                out.push((self, set_element));
            }
        }
    }
}

impl Component {
    /// Map entries visible through this component, dependencies first.
    /// `None` collects the entries of every map.
    fn collect_map_elements<'a>(
        &'a self,
        map: Option<&Key>,
        out: &mut Vec<(&'a Component, &'a MapElement)>,
    ) {
        for dependency in &self.dependencies {
            dependency.collect_map_elements(map, out);
        }
        for element in &self.map_elements {
            if map.is_none_or(|map| &element.map == map)
                && !out.iter().any(|(_, seen)| std::ptr::eq(*seen, element))
            {
                out.push((self, element));
            }
        }
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("scopes", &self.scopes)
            .field("keys", &self.bindings.keys().collect::<Vec<_>>())
            .field("dependencies", &self.dependencies.len())
            .finish()
    }
}

/// Handed to providers so they can request their own dependencies.
///
/// Tracks the chain of keys being resolved to detect cycles and bound the
/// nesting depth.
pub struct Resolver<'a> {
    component: &'a Component,
    key: Option<&'a Key>,
    parent: Option<&'a Resolver<'a>>,
    depth: usize,
}

impl<'a> Resolver<'a> {
    fn root(component: &'a Component) -> Resolver<'a> {
        Resolver {
            component,
            key: None,
            parent: None,
            depth: 0,
        }
    }

    fn nested<'b>(&'b self, component: &'b Component, key: &'b Key) -> Resolver<'b> {
        Resolver {
            component,
            key: Some(key),
            parent: Some(self),
            depth: self.depth + 1,
        }
    }

    /// The component whose binding is being resolved.
    pub fn component(&self) -> &'a Component {
        self.component
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, InjektError> {
        self.get_key(&Key::of::<T>())
    }

    pub fn get_named<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, InjektError> {
        self.get_key(&Key::named::<T>(name))
    }

    pub fn get_key<T: Send + Sync + 'static>(&self, key: &Key) -> Result<Arc<T>, InjektError> {
        downcast(key, self.resolve(key)?)
    }

    pub fn get_set<T: Send + Sync + 'static>(&self) -> Result<Vec<Arc<T>>, InjektError> {
        let element = Key::of::<T>();
        let mut contributions = Vec::new();
        self.component.collect_set_elements(&element, &mut contributions);
        contributions
            .into_iter()
            .map(|(owner, set_element)| {
                self.check_depth(&element)?;
                let value = (set_element.provider)(&self.nested(owner, &element))?;
                downcast(&element, value)
            })
            .collect()
    }

    pub fn get_map<K: MapKey, V: Send + Sync + 'static>(
        &self,
    ) -> Result<IndexMap<K, Arc<V>>, InjektError> {
        self.get_map_key(&Key::of::<IndexMap<K, Arc<V>>>())
    }

    pub fn get_map_named<K: MapKey, V: Send + Sync + 'static>(
        &self,
        name: &str,
    ) -> Result<IndexMap<K, Arc<V>>, InjektError> {
        self.get_map_key(&Key::named::<IndexMap<K, Arc<V>>>(name))
    }

    fn get_map_key<K: MapKey, V: Send + Sync + 'static>(
        &self,
        map: &Key,
    ) -> Result<IndexMap<K, Arc<V>>, InjektError> {
        let mut contributions = Vec::new();
        self.component.collect_map_elements(Some(map), &mut contributions);
        let mut entries = IndexMap::with_capacity(contributions.len());
        for (owner, element) in contributions {
            self.check_depth(map)?;
            let entry = element
                .entry::<K>()
                .ok_or_else(|| InjektError::TypeMismatch {
                    key: map.clone(),
                    requested: type_name::<K>(),
                })?;
            let value = (element.provider)(&self.nested(owner, map))?;
            entries.insert(entry.clone(), downcast::<V>(map, value)?);
        }
        trace!(map = %map, entries = entries.len(), "map resolved");
        Ok(entries)
    }

    fn resolve(&self, key: &Key) -> Result<Instance, InjektError> {
        self.check_depth(key)?;
        if self.is_resolving(key) {
            let mut path = vec![key.clone()];
            let mut current = Some(self);
            while let Some(resolver) = current {
                if let Some(pending) = resolver.key {
                    path.push(pending.clone());
                }
                current = resolver.parent;
            }
            path.reverse();
            return Err(InjektError::Cycle { path });
        }
        let (owner, binding) = self
            .component
            .lookup(key)
            .ok_or_else(|| InjektError::NotFound { key: key.clone() })?;
        trace!(key = %key, depth = self.depth, "resolving");
        binding.instance(&self.nested(owner, key))
    }

    fn check_depth(&self, key: &Key) -> Result<(), InjektError> {
        if self.depth >= MAX_RESOLUTION_DEPTH {
            return Err(InjektError::DepthExceeded {
                key: key.clone(),
                depth: MAX_RESOLUTION_DEPTH,
            });
        }
        Ok(())
    }

    fn is_resolving(&self, key: &Key) -> bool {
        let mut current = Some(self);
        while let Some(resolver) = current {
            if resolver.key == Some(key) {
                return true;
            }
            current = resolver.parent;
        }
        false
    }
}

fn downcast<T: Send + Sync + 'static>(key: &Key, value: Instance) -> Result<Arc<T>, InjektError> {
    value.downcast::<T>().map_err(|_| InjektError::TypeMismatch {
        key: key.clone(),
        requested: type_name::<T>(),
    })
}
