//! Runtime dependency injection.
//!
//! A `Module` declares how to create values, keyed by type and an optional
//! name. A `ComponentBuilder` combines modules, explicit instances and
//! dependency components into a `Component`, which hands out shared
//! instances on request:
//!
//! ```
//! use kast_injekt::{ComponentBuilder, Module};
//!
//! struct Config { retries: u32 }
//! struct Client { retries: u32 }
//!
//! let mut module = Module::new();
//! module
//!     .single(|_| Ok(Config { retries: 3 }))?
//!     .factory(|r| Ok(Client { retries: r.get::<Config>()?.retries }))?;
//!
//! let component = ComponentBuilder::new().module(module).build()?;
//! assert_eq!(component.get::<Client>()?.retries, 3);
//! # Ok::<(), kast_injekt::InjektError>(())
//! ```
//!
//! `Module::set_element` and `Module::map_element` contribute to multibound
//! collections that gather entries from every module and dependency.

pub mod binding;
pub mod component;
pub mod error;
pub mod key;
pub mod module;

pub use binding::{BindOptions, BindingKind, MapKey};
pub use component::{Component, ComponentBuilder, Resolver};
pub use error::InjektError;
pub use key::Key;
pub use module::Module;

#[cfg(test)]
#[path = "../tests/key_tests.rs"]
mod key_tests;

#[cfg(test)]
#[path = "../tests/module_tests.rs"]
mod module_tests;

#[cfg(test)]
#[path = "../tests/component_tests.rs"]
mod component_tests;
