use graphcol::graph::{EdgeKind, KeyedGraph};
use graphcol::Value;

#[test]
fn test_set_set_remove_scenario() {
    let mut map = KeyedGraph::new();
    map.set("a", 1).unwrap();
    map.set("b", 2).unwrap();
    map.remove("a").unwrap();

    assert_eq!(map.keys(), vec!["b"]);
    assert!(!map.has_key("a"));
    assert!(map.is_consistent());
}

#[test]
fn test_reassignment_leaves_one_edge() {
    let mut map = KeyedGraph::new();
    let old = map.set("k", "v1").unwrap();
    let new = map.set("k", "v2").unwrap();

    let root = map.graph().get_node(map.root_id()).unwrap();
    let matching: Vec<_> = root
        .outgoing()
        .iter()
        .filter(|(_, meta)| meta.kind == EdgeKind::Keyed("k".to_string()))
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(*matching[0].0, new);

    let node = map.graph().get_node(new).unwrap();
    assert_eq!(node.value(), &Value::from("v2"));
    assert!(!map.graph().contains_node(old));
    // the stale id stays stale
    assert!(map.graph().get_node(old).is_none());
}

#[test]
fn test_items_in_insertion_order() {
    let mut map = KeyedGraph::new();
    for (key, value) in [("z", 1), ("a", 2), ("m", 3)] {
        map.set(key, value).unwrap();
    }
    map.set("a", 20).unwrap();

    let items: Vec<(String, Value)> = map
        .items()
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect();
    assert_eq!(
        items,
        vec![
            ("z".to_string(), Value::from(1)),
            ("a".to_string(), Value::from(20)),
            ("m".to_string(), Value::from(3)),
        ]
    );
    assert_eq!(map.graph().node_count(), 4);
    assert_eq!(map.graph().edge_count(), 3);
}

#[test]
fn test_root_reaches_every_value() {
    let mut map = KeyedGraph::new();
    let ids: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|key| map.set(*key, *key).unwrap())
        .collect();
    for id in ids {
        let path = map.graph().shortest_path(map.root_id(), id).unwrap();
        assert_eq!(path, vec![map.root_id(), id]);
    }
}
