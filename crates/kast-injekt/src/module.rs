//! Groups of binding declarations.

use crate::binding::{BindOptions, Binding, BindingKind, MapElement, MapKey, SetElement};
use crate::component::Resolver;
use crate::error::InjektError;
use crate::key::Key;

/// An ordered list of declarations.
///
/// Declaring a key that the module already holds fails unless the new
/// declaration overrides; an overriding declaration replaces the earlier
/// one in place.
#[derive(Clone, Default)]
pub struct Module {
    bindings: Vec<Binding>,
    set_elements: Vec<SetElement>,
    map_elements: Vec<MapElement>,
}

impl Module {
    pub fn new() -> Module {
        Module::default()
    }

    /// Bind `T` to a provider that runs on every request.
    pub fn factory<T, F>(&mut self, provider: F) -> Result<&mut Module, InjektError>
    where
        T: Send + Sync + 'static,
        F: Fn(&Resolver<'_>) -> Result<T, InjektError> + Send + Sync + 'static,
    {
        self.bind(BindingKind::Factory, BindOptions::default(), provider)
    }

    /// Bind `T` to a provider that runs once per component.
    pub fn single<T, F>(&mut self, provider: F) -> Result<&mut Module, InjektError>
    where
        T: Send + Sync + 'static,
        F: Fn(&Resolver<'_>) -> Result<T, InjektError> + Send + Sync + 'static,
    {
        self.bind(BindingKind::Single, BindOptions::default(), provider)
    }

    /// Bind `T` to an existing value.
    pub fn instance<T: Send + Sync + 'static>(&mut self, value: T) -> Result<&mut Module, InjektError> {
        self.instance_with(BindOptions::default(), value)
    }

    pub fn instance_with<T: Send + Sync + 'static>(
        &mut self,
        options: BindOptions,
        value: T,
    ) -> Result<&mut Module, InjektError> {
        self.declare(Binding::instance(&options, value))
    }

    /// Declare a factory or single with a name or flags.
    ///
    /// `BindingKind::Instance` is treated as `Single`: the provider runs
    /// once and its value is kept.
    pub fn bind<T, F>(
        &mut self,
        kind: BindingKind,
        options: BindOptions,
        provider: F,
    ) -> Result<&mut Module, InjektError>
    where
        T: Send + Sync + 'static,
        F: Fn(&Resolver<'_>) -> Result<T, InjektError> + Send + Sync + 'static,
    {
        let kind = match kind {
            BindingKind::Instance => BindingKind::Single,
            other => other,
        };
        self.declare(Binding::new(kind, &options, provider))
    }

    /// Contribute one element to the set of `T` values.
    ///
    /// The provider runs each time the set is requested.
    pub fn set_element<T, F>(&mut self, provider: F) -> &mut Module
    where
        T: Send + Sync + 'static,
        F: Fn(&Resolver<'_>) -> Result<T, InjektError> + Send + Sync + 'static,
    {
        let binding = Binding::new(BindingKind::Factory, &BindOptions::default(), provider);
        self.set_elements.push(SetElement {
            element: binding.key,
            provider: binding.provider,
        });
        self
    }

    /// Contribute the `entry` value to the map from `K` to `V`.
    ///
    /// The provider runs each time the map is requested. Fails when this
    /// module already fills `entry` of the same map.
    pub fn map_element<K, V, F>(&mut self, entry: K, provider: F) -> Result<&mut Module, InjektError>
    where
        K: MapKey,
        V: Send + Sync + 'static,
        F: Fn(&Resolver<'_>) -> Result<V, InjektError> + Send + Sync + 'static,
    {
        self.map_element_with(BindOptions::default(), entry, provider)
    }

    /// Like `map_element`, for a named map or an overriding entry. An
    /// overriding entry replaces the earlier one in place.
    pub fn map_element_with<K, V, F>(
        &mut self,
        options: BindOptions,
        entry: K,
        provider: F,
    ) -> Result<&mut Module, InjektError>
    where
        K: MapKey,
        V: Send + Sync + 'static,
        F: Fn(&Resolver<'_>) -> Result<V, InjektError> + Send + Sync + 'static,
    {
        let element = MapElement::new(&options, entry, provider);
        match self
            .map_elements
            .iter()
            .position(|existing| existing.same_slot(&element))
        {
            Some(index) if element.overrides => self.map_elements[index] = element,
            Some(_) => return Err(element.duplicate()),
            None => self.map_elements.push(element),
        }
        Ok(self)
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.bindings.iter().any(|binding| &binding.key == key)
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.bindings.iter().map(|binding| &binding.key)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty() && self.set_elements.is_empty() && self.map_elements.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Vec<Binding>, Vec<SetElement>, Vec<MapElement>) {
        (self.bindings, self.set_elements, self.map_elements)
    }

    fn declare(&mut self, binding: Binding) -> Result<&mut Module, InjektError> {
        match self.bindings.iter().position(|existing| existing.key == binding.key) {
            Some(index) if binding.overrides => self.bindings[index] = binding,
            Some(_) => return Err(InjektError::AlreadyDeclared { key: binding.key }),
            None => self.bindings.push(binding),
        }
        Ok(self)
    }
}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .field("set_elements", &self.set_elements.len())
            .field("map_elements", &self.map_elements.len())
            .finish()
    }
}
