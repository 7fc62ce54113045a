use super::*;
use std::collections::HashSet;

struct Database;

#[test]
fn test_keys_compare_type_and_qualifier() {
    assert_eq!(Key::of::<Database>(), Key::of::<Database>());
    assert_ne!(Key::of::<Database>(), Key::of::<String>());
    assert_ne!(Key::of::<Database>(), Key::named::<Database>("main"));
    assert_eq!(Key::named::<Database>("main"), Key::named::<Database>("main"));
    assert_ne!(Key::named::<Database>("main"), Key::named::<Database>("replica"));

    let keys: HashSet<Key> = [
        Key::of::<Database>(),
        Key::named::<Database>("main"),
        Key::of::<Database>(),
    ]
    .into_iter()
    .collect();
    assert_eq!(keys.len(), 2);
}

#[test]
fn test_key_accessors() {
    let key = Key::named::<u32>("port");
    assert!(key.is::<u32>());
    assert!(!key.is::<u64>());
    assert_eq!(key.type_name(), "u32");
    assert_eq!(key.qualifier(), Some("port"));
    assert_eq!(key.with_qualifier(None), Key::of::<u32>());
}

#[test]
fn test_key_display() {
    assert_eq!(Key::of::<u32>().to_string(), "u32");
    assert_eq!(Key::named::<u32>("port").to_string(), "u32 named \"port\"");
}
