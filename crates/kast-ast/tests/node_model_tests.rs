use super::*;
use crate::test_support::*;
use kast_common::Atom;

#[test]
fn test_every_category_reaches_element() {
    for &category in Category::ALL {
        let chain = category.fallback_chain();
        assert_eq!(chain.first(), Some(&category));
        assert_eq!(chain.last(), Some(&Category::Element));
        assert!(category.is_a(Category::Element));
    }
}

#[test]
fn test_category_and_kind_tables_agree() {
    for &kind in NodeKind::ALL {
        let category = kind.category();
        assert_eq!(category.as_kind(), Some(kind));
        assert_eq!(category.name(), kind.name());
        assert!(!category.is_abstract());
    }
    assert!(Category::Expression.is_abstract());
    assert_eq!(
        Category::ALL.iter().filter(|c| !c.is_abstract()).count(),
        NodeKind::ALL.len()
    );
}

#[test]
fn test_secondary_supertypes_widen_is_a_only() {
    assert!(Category::Property.is_a(Category::Statement));
    assert!(!Category::Property.falls_back_to(Category::Statement));
    assert!(Category::WhileLoop.is_a(Category::TargetElement));
    assert!(Category::AnonymousFunction.is_a(Category::Expression));
    assert!(Category::AnonymousFunction.falls_back_to(Category::Function));
    assert!(Category::EqualityOperatorCall.is_a(Category::Call));
    assert!(!Category::EqualityOperatorCall.falls_back_to(Category::Call));
    assert!(!Category::SimpleType.is_a(Category::Expression));
}

#[test]
fn test_slot_names_are_unique_per_kind() {
    for &kind in NodeKind::ALL {
        let slots = kind.slots();
        for (i, a) in slots.iter().enumerate() {
            for b in &slots[i + 1..] {
                assert_ne!(a.name, b.name, "{} repeats a slot name", kind.name());
            }
        }
    }
}

#[test]
fn test_expression_kinds_list_annotations_first_and_owned_type_last() {
    for &kind in NodeKind::ALL {
        if let TypeRule::Own(slot) = kind.type_rule() {
            let last = kind.slots().last().unwrap();
            assert_eq!(last.name, slot, "{}", kind.name());
            assert_eq!(last.kind, SlotKind::One);
            assert_eq!(last.category, Category::Type);
        }
        let is_call_site_of_type =
            matches!(kind, NodeKind::AnnotationCall | NodeKind::DelegatedConstructorCall);
        if kind.category().is_a(Category::Expression) && !is_call_site_of_type {
            let first = kind.slots().first().unwrap();
            assert_eq!(first.name, "annotations", "{}", kind.name());
        }
    }
}

#[test]
fn test_type_rules_name_existing_slots() {
    for &kind in NodeKind::ALL {
        let slot = match kind.type_rule() {
            TypeRule::Own(slot) | TypeRule::Child(slot) | TypeRule::ChildNode(slot) => slot,
            TypeRule::Untyped | TypeRule::Builtin(_) => continue,
        };
        let info = kind
            .slots()
            .iter()
            .find(|info| info.name == slot)
            .unwrap_or_else(|| panic!("{} has no slot {slot}", kind.name()));
        assert_eq!(info.kind, SlotKind::One, "{}", kind.name());
    }
}

#[test]
fn test_builtins_are_preallocated_at_fixed_ids() {
    let arena = AstArena::new();
    assert!(arena.is_empty());
    for builtin in BuiltinType::ALL {
        let id = arena.builtin(builtin);
        assert!(arena.is_builtin(id));
        assert_eq!(
            arena.get::<ImplicitBuiltinType>(id).map(|node| node.builtin),
            Some(builtin)
        );
    }
}

#[test]
fn test_instantiate_rejects_absent_non_nullable_slot() {
    let err = NodeKind::Block.instantiate(|_| Vec::new()).unwrap_err();
    assert_eq!(
        err,
        ContractViolation::AbsentNonNullable {
            kind: NodeKind::Block,
            slot: "ty",
        }
    );
}

#[test]
fn test_replace_type_on_computed_type_is_noop() {
    let mut arena = AstArena::new();
    let t1 = simple_type(&mut arena, "Int");
    let t2 = simple_type(&mut arena, "String");
    let body = block(&mut arena, vec![], t1);
    let lambda = arena.alloc(LambdaArgumentExpression {
        annotations: NodeList::new(),
        expression: body,
    });

    assert_eq!(arena.type_of(lambda), Some(t1));
    arena.replace_type(lambda, t2).unwrap();
    assert_eq!(arena.type_of(lambda), Some(t1));

    arena.replace_type(body, t2).unwrap();
    assert_eq!(arena.type_of(body), Some(t2));
    // The wrapper keeps deriving its type from the child.
    assert_eq!(arena.type_of(lambda), Some(t2));
}

#[test]
fn test_builtin_and_child_node_types() {
    let mut arena = AstArena::new();
    let unit = unit_literal(&mut arena);
    let condition = arena.alloc(ElseIfTrueCondition {
        annotations: NodeList::new(),
    });
    assert_eq!(arena.type_of(unit), Some(arena.builtin(BuiltinType::Unit)));
    assert_eq!(
        arena.type_of(condition),
        Some(arena.builtin(BuiltinType::Boolean))
    );

    let annotation_type = simple_type(&mut arena, "Deprecated");
    let arguments = arena.alloc(ArgumentList {
        arguments: NodeList::new(),
    });
    let annotation = arena.alloc(AnnotationCall {
        annotation_type,
        argument_list: arguments,
        use_site_target: None,
        resolve_status: AnnotationResolveStatus::Resolved,
    });
    assert_eq!(arena.type_of(annotation), Some(annotation_type));
    assert_eq!(arena.type_of(annotation_type), None);

    let other = simple_type(&mut arena, "Other");
    arena.replace_type(unit, other).unwrap();
    assert_eq!(arena.type_of(unit), Some(arena.builtin(BuiltinType::Unit)));
}

#[test]
fn test_replace_type_rejects_non_type() {
    let mut arena = AstArena::new();
    let ty = simple_type(&mut arena, "Int");
    let body = block(&mut arena, vec![], ty);
    let not_a_type = unit_literal(&mut arena);
    let err = arena.replace_type(body, not_a_type).unwrap_err();
    assert!(matches!(
        err,
        ContractViolation::CategoryMismatch {
            expected: Category::Type,
            found: Category::UnitLiteral,
            ..
        }
    ));
    assert_eq!(arena.type_of(body), Some(ty));
}

#[test]
fn test_absent_value_rejected_for_every_non_nullable_slot() {
    let mut arena = AstArena::new();
    for &kind in NodeKind::ALL {
        let sample = build_sample(&mut arena, kind, Shape::Full);
        for (info, before) in kind.slots().iter().zip(&sample.slots) {
            let result = arena.replace_child(sample.id, info.name, None);
            match info.kind {
                SlotKind::One | SlotKind::Shared | SlotKind::Back => {
                    assert_eq!(
                        result,
                        Err(ContractViolation::AbsentNonNullable {
                            kind,
                            slot: info.name,
                        })
                    );
                    let after = arena.slot(sample.id, info.name).unwrap().as_slice().to_vec();
                    assert_eq!(&after, before, "{}.{} changed", kind.name(), info.name);
                }
                SlotKind::Opt | SlotKind::SharedOpt => {
                    assert_eq!(result, Ok(()));
                    assert!(arena.slot(sample.id, info.name).unwrap().single().is_none());
                }
                SlotKind::List => {
                    assert!(matches!(result, Err(ContractViolation::ShapeMismatch { .. })));
                }
            }
        }
    }
}

#[test]
fn test_replace_child_checks_category_and_name() {
    let mut arena = AstArena::new();
    let ty = simple_type(&mut arena, "Int");
    let body = block(&mut arena, vec![], ty);
    let condition = unit_literal(&mut arena);
    let while_loop = arena.alloc(WhileLoop {
        annotations: NodeList::new(),
        label: None,
        condition,
        block: body,
    });

    let err = arena.replace_child(while_loop, "condition", Some(ty)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "slot 'condition' of WhileLoop expects Expression, found SimpleType"
    );
    assert!(matches!(
        arena.replace_child(while_loop, "missing", None),
        Err(ContractViolation::UnknownSlot { .. })
    ));
    assert!(matches!(
        arena.replace_children(while_loop, "block", vec![body]),
        Err(ContractViolation::ShapeMismatch { .. })
    ));

    let other_condition = unit_literal(&mut arena);
    arena
        .replace_child(while_loop, "condition", Some(other_condition))
        .unwrap();
    assert_eq!(
        arena.get::<WhileLoop>(while_loop).unwrap().condition,
        other_condition
    );
}

#[test]
fn test_companion_object_is_derived_from_declarations() {
    let mut arena = AstArena::new();
    let companion = arena.alloc(RegularClass {
        annotations: NodeList::new(),
        type_parameters: NodeList::new(),
        super_types: NodeList::new(),
        declarations: NodeList::new(),
        name: Atom::NONE,
        class_kind: ClassKind::Object,
        visibility: Visibility::Public,
        modality: Modality::Final,
        is_companion: true,
        is_inner: false,
        is_data: false,
        symbol: SymbolId::UNRESOLVED,
    });
    let name = arena.intern("Outer");
    let outer = arena.alloc(RegularClass {
        annotations: NodeList::new(),
        type_parameters: NodeList::new(),
        super_types: NodeList::new(),
        declarations: NodeList::new(),
        name,
        class_kind: ClassKind::Class,
        visibility: Visibility::Public,
        modality: Modality::Final,
        is_companion: false,
        is_inner: false,
        is_data: false,
        symbol: SymbolId(7),
    });
    assert_eq!(arena.companion_object(outer), None);

    arena
        .replace_children(outer, "declarations", vec![companion])
        .unwrap();
    assert_eq!(arena.companion_object(outer), Some(companion));

    arena.get_mut::<RegularClass>(companion).unwrap().is_companion = false;
    assert_eq!(arena.companion_object(outer), None);
}

#[test]
fn test_attributes_render_through_interner() {
    let mut arena = AstArena::new();
    let name = arena.intern("count");
    let reference = arena.alloc(ResolvedNamedReference {
        name,
        resolved_symbol: SymbolId(3),
    });
    let attributes = arena.data(reference).attributes(arena.interner());
    assert_eq!(
        attributes,
        vec![
            ("name", "\"count\"".to_string()),
            ("resolved_symbol", "$3".to_string()),
        ]
    );
}

#[test]
fn test_arena_snapshot_round_trip() {
    let mut arena = AstArena::new();
    let ty = simple_type(&mut arena, "Int");
    let s1 = unit_literal(&mut arena);
    let root = block(&mut arena, vec![s1], ty);

    let json = serde_json::to_string(&arena).unwrap();
    assert!(json.contains("\"kind\":\"Block\""));
    let restored: AstArena = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.len(), arena.len());
    for id in arena.ids() {
        assert_eq!(restored.data(id), arena.data(id));
    }
    let name = restored.get::<SimpleType>(ty).unwrap().name;
    assert_eq!(restored.resolve(name), "Int");
    assert_eq!(restored.type_of(root), Some(ty));
}

fn builtin_sentinels_json() -> Vec<String> {
    BuiltinType::ALL
        .iter()
        .map(|builtin| {
            format!(
                r#"{{ "kind": "ImplicitBuiltinType", "builtin": "{}" }}"#,
                builtin.name()
            )
        })
        .collect()
}

#[test]
fn test_snapshot_attributes_default_when_missing() {
    let mut nodes = builtin_sentinels_json();
    nodes.push(r#"{ "kind": "Label" }"#.to_string());
    let json = format!(r#"{{ "strings": [""], "nodes": [{}] }}"#, nodes.join(","));

    let arena: AstArena = serde_json::from_str(&json).unwrap();
    let label = NodeId(BuiltinType::ALL.len() as u32);
    assert_eq!(arena.kind(label), NodeKind::Label);
    assert_eq!(arena.get::<Label>(label).unwrap().name, Atom::NONE);
    assert_eq!(arena.len(), BuiltinType::ALL.len() + 1);
}

#[test]
fn test_snapshot_fills_in_trailing_builtins() {
    let nodes = builtin_sentinels_json();
    let json = format!(r#"{{ "strings": [], "nodes": [{}] }}"#, nodes[0]);

    let arena: AstArena = serde_json::from_str(&json).unwrap();
    assert_eq!(arena.len(), BuiltinType::ALL.len());
    let string = arena.builtin(BuiltinType::String);
    assert_eq!(
        arena.get::<ImplicitBuiltinType>(string).unwrap().builtin,
        BuiltinType::String
    );
}

#[test]
fn test_snapshot_rejects_other_node_in_builtin_slot() {
    let json = r#"{
        "strings": [""],
        "nodes": [{ "kind": "StarProjection" }, { "kind": "Label" }]
    }"#;
    let err = serde_json::from_str::<AstArena>(json).unwrap_err();
    assert!(
        err.to_string()
            .contains("node #0 must be the Unit builtin type, found StarProjection"),
        "{err}"
    );

    let mut nodes = builtin_sentinels_json();
    nodes.swap(1, 2);
    let json = format!(r#"{{ "strings": [""], "nodes": [{}] }}"#, nodes.join(","));
    let err = serde_json::from_str::<AstArena>(&json).unwrap_err();
    assert!(
        err.to_string()
            .contains("node #1 must be the Boolean builtin type, found ImplicitBuiltinType"),
        "{err}"
    );
}

#[test]
fn test_snapshot_rejects_shifted_string_table() {
    let json = r#"{ "strings": ["Int", "x"], "nodes": [] }"#;
    let err = serde_json::from_str::<AstArena>(json).unwrap_err();
    assert!(
        err.to_string()
            .contains("string table must start with the empty string, found \"Int\""),
        "{err}"
    );
}

#[test]
fn test_type_of_gives_up_on_self_derived_type() {
    let mut arena = AstArena::new();
    let unit = arena.alloc(UnitLiteral {
        annotations: NodeList::new(),
    });
    let lambda = arena.alloc(LambdaArgumentExpression {
        annotations: NodeList::new(),
        expression: unit,
    });
    assert_eq!(arena.type_of(lambda), Some(arena.builtin(BuiltinType::Unit)));

    arena.get_mut::<LambdaArgumentExpression>(lambda).unwrap().expression = lambda;
    assert_eq!(arena.type_of(lambda), None);
}
