use super::*;

#[test]
fn test_duplicate_declaration_is_rejected() {
    let mut module = Module::new();
    module.single(|_| Ok(1u32)).unwrap();

    let err = module.factory(|_| Ok(2u32)).unwrap_err();
    assert_eq!(
        err,
        InjektError::AlreadyDeclared {
            key: Key::of::<u32>()
        }
    );
    assert_eq!(err.to_string(), "already declared binding for u32");
    assert_eq!(module.len(), 1);
}

#[test]
fn test_named_declarations_do_not_collide() {
    let mut module = Module::new();
    module
        .instance(80u16)
        .unwrap()
        .instance_with(BindOptions::named("admin"), 8080u16)
        .unwrap();

    assert!(module.contains(&Key::of::<u16>()));
    assert!(module.contains(&Key::named::<u16>("admin")));
    assert_eq!(module.len(), 2);
}

#[test]
fn test_override_replaces_in_place() {
    let mut module = Module::new();
    module
        .instance(1u8)
        .unwrap()
        .instance(String::from("x"))
        .unwrap()
        .instance_with(BindOptions::default().overriding(), 2u8)
        .unwrap();

    let keys: Vec<&Key> = module.keys().collect();
    assert_eq!(keys, vec![&Key::of::<u8>(), &Key::of::<String>()]);

    let component = ComponentBuilder::new().module(module).build().unwrap();
    assert_eq!(*component.get::<u8>().unwrap(), 2);
}

#[test]
fn test_set_elements_are_not_bindings() {
    let mut module = Module::new();
    module.set_element(|_| Ok("a")).set_element(|_| Ok("b"));

    assert_eq!(module.len(), 0);
    assert!(!module.is_empty());
    assert!(!module.contains(&Key::of::<&'static str>()));
}

#[test]
fn test_map_element_rejects_duplicate_entry() {
    let mut module = Module::new();
    module
        .map_element("card", |_| Ok(1u32))
        .unwrap()
        .map_element("paypal", |_| Ok(2u32))
        .unwrap();

    let err = module.map_element("card", |_| Ok(3u32)).unwrap_err();
    assert_eq!(
        err,
        InjektError::DuplicateMapEntry {
            map: Key::of::<indexmap::IndexMap<&'static str, std::sync::Arc<u32>>>(),
            entry: "\"card\"".to_string(),
        }
    );
    assert!(err.to_string().starts_with("already declared entry \"card\" in "));

    // Same entry key in a map of another value type is a different map.
    module.map_element("card", |_| Ok(String::from("visa"))).unwrap();
    assert_eq!(module.len(), 0);
    assert!(!module.is_empty());
}

#[test]
fn test_map_element_override_replaces_in_place() {
    let mut module = Module::new();
    module
        .map_element("card", |_| Ok(1u32))
        .unwrap()
        .map_element("paypal", |_| Ok(2u32))
        .unwrap()
        .map_element_with(BindOptions::default().overriding(), "card", |_| Ok(10u32))
        .unwrap();

    let component = ComponentBuilder::new().module(module).build().unwrap();
    let map = component.get_map::<&'static str, u32>().unwrap();
    let entries: Vec<(&str, u32)> = map.iter().map(|(k, v)| (*k, **v)).collect();
    assert_eq!(entries, vec![("card", 10), ("paypal", 2)]);
}
