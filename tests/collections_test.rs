use graphcol::collections::{CollectionError, ContainerKind, HashValue, ListValue, TreeValue};
use graphcol::config::DisplayConfig;
use graphcol::{ErrorKind, TypeTag, Value};
use serde_json::json;

#[test]
fn test_display_strings() {
    let list = ListValue::from_values([1, 2, 3]).unwrap();
    assert_eq!(list.to_display_string(), "[1, 2, 3]");

    let hash = HashValue::from_pairs([("k", "v")]).unwrap();
    assert_eq!(hash.to_display_string(), "{ \"k\": \"v\" }");

    let tree = TreeValue::from_values([4, 2, 6, 1]).unwrap();
    assert_eq!(tree.to_display_string(), "tree<num> (4 nodes)");

    let long = ListValue::from_values(0..10).unwrap();
    let config = DisplayConfig { max_elements: Some(3) };
    assert_eq!(long.to_display_string_with(&config), "[0, 1, 2, ...]");
}

#[test]
fn test_deep_plain_conversion() {
    let mut inner = HashValue::new();
    inner.set("xs", ListValue::from_values([1, 2]).unwrap()).unwrap();
    inner.set("t", TreeValue::from_values([3, 1, 2]).unwrap()).unwrap();
    let mut outer = ListValue::new();
    outer.append(inner).unwrap();
    outer.append(Value::None).unwrap();
    outer.append(true).unwrap();

    assert_eq!(
        outer.to_plain(),
        json!([{"xs": [1, 2], "t": [1, 2, 3]}, null, true])
    );
}

#[test]
fn test_freeze_reaches_every_element() {
    let mut list = ListValue::new();
    list.append(ListValue::from_values([1]).unwrap()).unwrap();
    list.append(ListValue::from_values([2]).unwrap()).unwrap();
    list.freeze();

    assert!(list.iter().all(Value::is_frozen));
    let before = list.to_plain();

    for result in [
        list.append(3).map(|_| ()),
        list.insert(0, 3).map(|_| ()),
        list.set(0, 3).map(|_| ()),
        list.pop().map(|_| ()),
    ] {
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Immutability);
        assert!(matches!(err, CollectionError::FrozenMutation { .. }));
    }
    assert_eq!(list.to_plain(), before);
}

#[test]
fn test_frozen_tree_of_values() {
    let mut tree = TreeValue::from_values(["b", "a"]).unwrap();
    tree.freeze();
    assert!(tree.in_order().into_iter().all(Value::is_frozen));
    assert!(tree.insert("c").is_err());
    assert_eq!(tree.size(), 2);
}

#[test]
fn test_mixing_frozen_and_unfrozen_is_rejected() {
    let mut frozen = HashValue::new();
    frozen.freeze();

    let mut hash = HashValue::new();
    hash.set("open", ListValue::new()).unwrap();
    let err = hash.set("closed", frozen.clone()).unwrap_err();
    assert!(matches!(err, CollectionError::Contamination(_)));
    assert!(!hash.has_key("closed"));

    // replacing the only unfrozen entry is fine
    hash.set("open", frozen).unwrap();
    assert!(hash.contains_frozen());
}

#[test]
fn test_constraints_by_kind() {
    let mut list = ListValue::with_constraint(TypeTag::List);
    list.append(ListValue::new()).unwrap();
    let err = list.append(HashValue::new()).unwrap_err();
    assert_eq!(
        err,
        CollectionError::ConstraintViolation {
            expected: TypeTag::List,
            actual: TypeTag::Hash,
        }
    );
}

#[test]
fn test_method_names_for_analysis() {
    for kind in [ContainerKind::List, ContainerKind::Hash, ContainerKind::Tree] {
        let names = kind.method_names();
        for common in ["size", "type", "inspect", "get_active_rules", "visualize_structure"] {
            assert!(names.contains(&common), "{} lacks {}", kind, common);
        }
        assert!(names.iter().all(|name| kind.has_method(name)));
    }
    assert!(ContainerKind::List.has_method("append"));
    assert!(!ContainerKind::Tree.has_method("append"));
}

#[test]
fn test_equality_is_structural() {
    let a = Value::from(ListValue::from_values([1, 2]).unwrap());
    let b = Value::from(ListValue::from_values([1, 2]).unwrap());
    assert_eq!(a, b);

    let t1 = Value::from(TreeValue::from_values([2, 1, 3]).unwrap());
    let t2 = Value::from(TreeValue::from_values([1, 2, 3]).unwrap());
    assert_eq!(t1, t2);
    assert_ne!(a, Value::from(HashValue::new()));
}

/// Pseudo-random but repeatable key order
fn scrambled(n: u64) -> impl Iterator<Item = i64> {
    (0..n).map(move |i| (i * 7919 % n) as i64)
}

#[test]
fn test_bulk_builds() {
    // per-element checks are constant time, so these stay fast even in
    // debug builds
    let list = ListValue::from_values(0..40_000).unwrap();
    assert_eq!(list.len(), 40_000);
    assert_eq!(list.get(-1), Some(&Value::from(39_999)));
    assert!(list.graph().is_consistent());

    let hash = HashValue::from_pairs((0..40_000).map(|i| (format!("k{}", i), i))).unwrap();
    assert_eq!(hash.len(), 40_000);
    assert_eq!(hash.get("k123"), Some(&Value::from(123)));

    let tree = TreeValue::from_values(scrambled(20_000)).unwrap();
    assert_eq!(tree.size(), 20_000);
    assert_eq!(tree.min(), Some(&Value::from(0)));
    assert_eq!(tree.max(), Some(&Value::from(19_999)));
}

#[test]
fn test_bulk_nested_containers() {
    let mut outer = ListValue::new();
    for i in 0..2_000 {
        outer.append(ListValue::from_values([i]).unwrap()).unwrap();
    }
    assert!(!outer.contains_frozen());

    let mut cold = ListValue::new();
    cold.freeze();
    let err = outer.append(cold).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Immutability);
    assert_eq!(outer.len(), 2_000);
}
