use super::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, PartialEq)]
struct Config {
    url: String,
}

struct Repository {
    config: Arc<Config>,
}

struct Service {
    repository: Arc<Repository>,
}

fn app_module() -> Module {
    let mut module = Module::new();
    module
        .instance(Config {
            url: "db://local".to_string(),
        })
        .unwrap()
        .single(|r| {
            Ok(Repository {
                config: r.get()?,
            })
        })
        .unwrap()
        .factory(|r| {
            Ok(Service {
                repository: r.get()?,
            })
        })
        .unwrap();
    module
}

#[test]
fn test_resolves_through_provider_graph() {
    let component = ComponentBuilder::new().module(app_module()).build().unwrap();

    let service = component.get::<Service>().unwrap();
    assert_eq!(service.repository.config.url, "db://local");
}

#[test]
fn test_single_is_cached_and_factory_is_not() {
    let component = ComponentBuilder::new().module(app_module()).build().unwrap();

    let first = component.get::<Service>().unwrap();
    let second = component.get::<Service>().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first.repository, &second.repository));
    assert!(Arc::ptr_eq(
        &first.repository,
        &component.get::<Repository>().unwrap()
    ));
}

#[test]
fn test_missing_binding_reports_not_found() {
    let component = ComponentBuilder::new().build().unwrap();

    let err = component.get::<Config>().unwrap_err();
    assert_eq!(
        err,
        InjektError::NotFound {
            key: Key::of::<Config>()
        }
    );
    assert!(err.to_string().starts_with("no binding found for "));
}

#[test]
fn test_missing_transitive_binding_names_inner_key() {
    let mut module = Module::new();
    module
        .factory(|r| {
            Ok(Repository {
                config: r.get()?,
            })
        })
        .unwrap();
    let component = ComponentBuilder::new().module(module).build().unwrap();

    assert_eq!(
        component.get::<Repository>().err(),
        Some(InjektError::NotFound {
            key: Key::of::<Config>()
        })
    );
}

#[test]
fn test_named_lookup() {
    let component = ComponentBuilder::new()
        .instance(String::from("default"))
        .instance_with(BindOptions::named("greeting"), String::from("hello"))
        .build()
        .unwrap();

    assert_eq!(*component.get::<String>().unwrap(), "default");
    assert_eq!(*component.get_named::<String>("greeting").unwrap(), "hello");
    assert!(component.get_named::<String>("farewell").is_err());
}

#[test]
fn test_dependency_supplies_missing_bindings() {
    let parent = ComponentBuilder::new()
        .scope("app")
        .instance(Config {
            url: "db://parent".to_string(),
        })
        .build()
        .unwrap();

    let mut module = Module::new();
    module
        .single(|r| {
            Ok(Repository {
                config: r.get()?,
            })
        })
        .unwrap();
    let child = ComponentBuilder::new()
        .scope("activity")
        .dependency(Arc::clone(&parent))
        .module(module)
        .build()
        .unwrap();

    assert_eq!(child.get::<Repository>().unwrap().config.url, "db://parent");
    assert!(Arc::ptr_eq(
        &child.get::<Config>().unwrap(),
        &parent.get::<Config>().unwrap()
    ));
    assert!(child.contains(&Key::of::<Config>()));
    assert!(!parent.contains(&Key::of::<Repository>()));
}

#[test]
fn test_dependency_bindings_resolve_in_their_own_component() {
    let parent = ComponentBuilder::new()
        .scope("app")
        .module(app_module())
        .build()
        .unwrap();
    let child = ComponentBuilder::new()
        .scope("screen")
        .dependency(parent)
        .instance_with(BindOptions::named("child"), Config {
            url: "db://child".to_string(),
        })
        .build()
        .unwrap();

    assert_eq!(
        child.get::<Service>().unwrap().repository.config.url,
        "db://local"
    );
}

#[test]
fn test_redeclaring_dependency_key_requires_override() {
    let parent = ComponentBuilder::new()
        .scope("app")
        .instance(1u32)
        .build()
        .unwrap();

    let err = ComponentBuilder::new()
        .scope("child")
        .dependency(Arc::clone(&parent))
        .instance(2u32)
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        InjektError::AlreadyDeclared {
            key: Key::of::<u32>()
        }
    );

    let child = ComponentBuilder::new()
        .scope("child")
        .dependency(parent)
        .instance_with(BindOptions::default().overriding(), 2u32)
        .build()
        .unwrap();
    assert_eq!(*child.get::<u32>().unwrap(), 2);
}

#[test]
fn test_duplicate_keys_across_modules_are_rejected() {
    let mut first = Module::new();
    first.instance(1u32).unwrap();
    let mut second = Module::new();
    second.instance(2u32).unwrap();

    let err = ComponentBuilder::new()
        .module(first)
        .module(second)
        .build()
        .unwrap_err();
    assert!(matches!(err, InjektError::AlreadyDeclared { .. }));
}

#[test]
fn test_two_dependencies_binding_the_same_key() {
    let left = ComponentBuilder::new().scope("left").instance(1u32).build().unwrap();
    let right = ComponentBuilder::new().scope("right").instance(2u32).build().unwrap();

    let err = ComponentBuilder::new()
        .scope("both")
        .dependency(left)
        .dependency(right)
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        InjektError::AlreadyDeclared {
            key: Key::of::<u32>()
        }
    );
}

#[test]
fn test_shared_grandparent_is_not_a_duplicate() {
    let root = ComponentBuilder::new().scope("root").instance(1u32).build().unwrap();
    let left = ComponentBuilder::new()
        .scope("left")
        .dependency(Arc::clone(&root))
        .build()
        .unwrap();
    let right = ComponentBuilder::new()
        .scope("right")
        .dependency(Arc::clone(&root))
        .build()
        .unwrap();

    let both = ComponentBuilder::new()
        .scope("both")
        .dependency(left)
        .dependency(right)
        .build()
        .unwrap();
    assert!(Arc::ptr_eq(&both.get::<u32>().unwrap(), &root.get::<u32>().unwrap()));
}

#[test]
fn test_scope_checks() {
    let parent = ComponentBuilder::new().scope("app").build().unwrap();

    let err = ComponentBuilder::new()
        .scope("app")
        .dependency(Arc::clone(&parent))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        InjektError::DuplicateScope {
            scope: "app".to_string()
        }
    );

    let err = ComponentBuilder::new()
        .dependency(Arc::clone(&parent))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        InjektError::MissingScope {
            dependency_scopes: vec!["app".to_string()]
        }
    );

    let err = ComponentBuilder::new()
        .scope("a")
        .scope("a")
        .build()
        .unwrap_err();
    assert!(matches!(err, InjektError::DuplicateScope { .. }));

    let err = ComponentBuilder::new()
        .scope("screen")
        .dependency(Arc::clone(&parent))
        .dependency(parent)
        .build()
        .unwrap_err();
    assert_eq!(err, InjektError::DuplicateDependency);
}

#[test]
fn test_eager_single_is_created_during_build() {
    let created = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&created);
    let mut module = Module::new();
    module
        .bind(BindingKind::Single, BindOptions::default().eager(), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Config {
                url: "eager".to_string(),
            })
        })
        .unwrap();

    let component = ComponentBuilder::new().module(module).build().unwrap();
    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert!(component.is_created(&Key::of::<Config>()));

    component.get::<Config>().unwrap();
    assert_eq!(created.load(Ordering::SeqCst), 1);
}

#[test]
fn test_lazy_single_waits_for_first_request() {
    let component = ComponentBuilder::new().module(app_module()).build().unwrap();
    let key = Key::of::<Repository>();

    assert!(!component.is_created(&key));
    component.get::<Repository>().unwrap();
    assert!(component.is_created(&key));
}

#[test]
fn test_eager_failure_fails_build() {
    let mut module = Module::new();
    module
        .bind(BindingKind::Single, BindOptions::default().eager(), |r| {
            Ok(Repository {
                config: r.get()?,
            })
        })
        .unwrap();

    let err = ComponentBuilder::new().module(module).build().unwrap_err();
    assert!(matches!(err, InjektError::NotFound { .. }));
}

#[test]
fn test_cycle_is_reported() {
    struct Chicken;
    struct Egg;

    let mut module = Module::new();
    module
        .single(|r| {
            r.get::<Egg>()?;
            Ok(Chicken)
        })
        .unwrap()
        .single(|r| {
            r.get::<Chicken>()?;
            Ok(Egg)
        })
        .unwrap();
    let component = ComponentBuilder::new().module(module).build().unwrap();

    let err = component.get::<Chicken>().err();
    assert_eq!(
        err,
        Some(InjektError::Cycle {
            path: vec![Key::of::<Chicken>(), Key::of::<Egg>(), Key::of::<Chicken>()]
        })
    );
    assert!(!component.is_created(&Key::of::<Chicken>()));
}

#[test]
fn test_deep_chain_hits_depth_limit() {
    use kast_common::limits::MAX_RESOLUTION_DEPTH;

    /// Level `n` is named `n` and needs level `n + 1`.
    struct Level;

    let mut module = Module::new();
    for depth in 0..=MAX_RESOLUTION_DEPTH {
        module
            .bind(
                BindingKind::Factory,
                BindOptions::named(depth.to_string()),
                move |r| {
                    r.get_named::<Level>(&(depth + 1).to_string())?;
                    Ok(Level)
                },
            )
            .unwrap();
    }
    let component = ComponentBuilder::new().module(module).build().unwrap();

    let err = component.get_named::<Level>("0").err();
    assert!(matches!(
        err,
        Some(InjektError::DepthExceeded { depth, .. }) if depth == MAX_RESOLUTION_DEPTH
    ));
}

#[test]
fn test_get_key_with_mismatched_type() {
    let component = ComponentBuilder::new().instance(7u32).build().unwrap();

    let err = component.get_key::<u64>(&Key::of::<u32>()).unwrap_err();
    assert_eq!(
        err,
        InjektError::TypeMismatch {
            key: Key::of::<u32>(),
            requested: "u64"
        }
    );
    assert_eq!(*component.get_key::<u32>(&Key::of::<u32>()).unwrap(), 7);
}

#[test]
fn test_set_collects_dependency_elements_first() {
    let mut parent_module = Module::new();
    parent_module.set_element(|_| Ok(String::from("parent")));
    let parent = ComponentBuilder::new()
        .scope("app")
        .module(parent_module)
        .build()
        .unwrap();

    let mut first = Module::new();
    first.set_element(|_| Ok(String::from("first")));
    let mut second = Module::new();
    second
        .instance(5usize)
        .unwrap()
        .set_element(|r| Ok(format!("second:{}", r.get::<usize>()?)));
    let child = ComponentBuilder::new()
        .scope("screen")
        .dependency(parent)
        .module(first)
        .module(second)
        .build()
        .unwrap();

    let names: Vec<String> = child
        .get_set::<String>()
        .unwrap()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, vec!["parent", "first", "second:5"]);
    assert!(child.get_set::<u8>().unwrap().is_empty());
}

#[test]
fn test_component_is_shareable_across_threads() {
    let component = ComponentBuilder::new().module(app_module()).build().unwrap();

    let repositories: Vec<Arc<Repository>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| component.get::<Repository>().unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for repository in &repositories {
        assert!(Arc::ptr_eq(repository, &repositories[0]));
    }
}

fn handler_names(map: &indexmap::IndexMap<&'static str, Arc<String>>) -> Vec<(&'static str, String)> {
    map.iter()
        .map(|(entry, handler)| (*entry, handler.to_string()))
        .collect()
}

#[test]
fn test_map_collects_dependency_entries_first() {
    let mut parent_module = Module::new();
    parent_module
        .map_element("card", |_| Ok(String::from("card handler")))
        .unwrap();
    let parent = ComponentBuilder::new()
        .scope("app")
        .module(parent_module)
        .build()
        .unwrap();

    let mut child_module = Module::new();
    child_module
        .instance(Config {
            url: "pay://eu".to_string(),
        })
        .unwrap()
        .map_element("paypal", |r| {
            Ok(format!("paypal via {}", r.get::<Config>()?.url))
        })
        .unwrap();
    let child = ComponentBuilder::new()
        .scope("checkout")
        .dependency(parent.clone())
        .module(child_module)
        .build()
        .unwrap();

    let handlers = child.get_map::<&'static str, String>().unwrap();
    assert_eq!(
        handler_names(&handlers),
        vec![
            ("card", "card handler".to_string()),
            ("paypal", "paypal via pay://eu".to_string()),
        ]
    );
    assert_eq!(parent.get_map::<&'static str, String>().unwrap().len(), 1);
    assert!(child.get_map::<u8, String>().unwrap().is_empty());
}

#[test]
fn test_map_entry_clashing_with_dependency_needs_override() {
    let mut parent_module = Module::new();
    parent_module
        .map_element("card", |_| Ok(String::from("parent card")))
        .unwrap()
        .map_element("cash", |_| Ok(String::from("cash")))
        .unwrap();
    let parent = ComponentBuilder::new()
        .scope("app")
        .module(parent_module)
        .build()
        .unwrap();

    let mut clashing = Module::new();
    clashing
        .map_element("card", |_| Ok(String::from("child card")))
        .unwrap();
    let err = ComponentBuilder::new()
        .scope("checkout")
        .dependency(parent.clone())
        .module(clashing)
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        InjektError::DuplicateMapEntry { ref entry, .. } if entry == "\"card\""
    ));

    let mut overriding = Module::new();
    overriding
        .map_element_with(BindOptions::default().overriding(), "card", |_| {
            Ok(String::from("child card"))
        })
        .unwrap();
    let child = ComponentBuilder::new()
        .scope("checkout")
        .dependency(parent.clone())
        .module(overriding)
        .build()
        .unwrap();
    assert_eq!(
        handler_names(&child.get_map().unwrap()),
        vec![
            ("card", "child card".to_string()),
            ("cash", "cash".to_string()),
        ]
    );
    assert_eq!(
        parent.get_map::<&'static str, String>().unwrap()["card"].as_str(),
        "parent card"
    );
}

#[test]
fn test_map_entry_clash_between_modules_and_dependencies() {
    let mut first = Module::new();
    first.map_element("card", |_| Ok(String::from("first"))).unwrap();
    let mut second = Module::new();
    second.map_element("card", |_| Ok(String::from("second"))).unwrap();
    let err = ComponentBuilder::new()
        .module(first)
        .module(second)
        .build()
        .unwrap_err();
    assert!(matches!(err, InjektError::DuplicateMapEntry { .. }));

    let sibling = |scope: &str, handler: &'static str| {
        let mut module = Module::new();
        module
            .map_element("card", move |_| Ok(String::from(handler)))
            .unwrap();
        ComponentBuilder::new()
            .scope(scope)
            .module(module)
            .build()
            .unwrap()
    };
    let err = ComponentBuilder::new()
        .scope("checkout")
        .dependency(sibling("eu", "eu card"))
        .dependency(sibling("us", "us card"))
        .build()
        .unwrap_err();
    assert!(matches!(err, InjektError::DuplicateMapEntry { .. }));
}

#[test]
fn test_named_maps_are_separate() {
    let mut module = Module::new();
    module
        .map_element(1u8, |_| Ok(String::from("default")))
        .unwrap()
        .map_element_with(BindOptions::named("admin"), 1u8, |_| {
            Ok(String::from("admin"))
        })
        .unwrap();
    let component = ComponentBuilder::new().module(module).build().unwrap();

    assert_eq!(component.get_map::<u8, String>().unwrap()[&1u8].as_str(), "default");
    assert_eq!(
        component.get_map_named::<u8, String>("admin").unwrap()[&1u8].as_str(),
        "admin"
    );
}
