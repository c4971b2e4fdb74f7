//! Hash values over a keyed graph
//!
//! Assigning to an existing key replaces the backing node (see
//! [`KeyedGraph`]); node ids captured before the assignment go stale.

use super::names::{self, Names};
use super::{
    join_limited, CollectionError, CollectionResult, ContainerKind, ElementPolicy, Governed, Holding,
};
use crate::config::DisplayConfig;
use crate::graph::{ControlLayer, GraphError, GraphStructure, KeyedGraph};
use crate::value::{TypeTag, Value};
use serde_json::{Map, Value as JsonValue};

const KIND: ContainerKind = ContainerKind::Hash;

#[derive(Debug, Clone, Default)]
pub struct HashValue {
    graph: KeyedGraph,
    policy: ElementPolicy,
}

impl HashValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_constraint(constraint: TypeTag) -> Self {
        HashValue {
            graph: KeyedGraph::new(),
            policy: ElementPolicy::new(Some(constraint)),
        }
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> CollectionResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut hash = Self::new();
        for (key, value) in pairs {
            hash.set(key, value)?;
        }
        Ok(hash)
    }

    pub fn graph(&self) -> &KeyedGraph {
        &self.graph
    }

    pub fn constraint(&self) -> Option<TypeTag> {
        self.policy.constraint()
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn size(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn type_name(&self) -> String {
        match self.constraint() {
            Some(tag) => format!("{}<{}>", KIND, tag),
            None => KIND.to_string(),
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.policy.is_frozen()
    }

    pub fn contains_frozen(&self) -> bool {
        self.policy.contains_frozen()
    }

    pub fn freeze(&mut self) {
        for value in self.graph.values_mut() {
            value.freeze();
        }
        self.policy.freeze();
    }

    /// Bind `key` to `value`; an existing key keeps its position
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> CollectionResult<()> {
        let key = key.into();
        let value = value.into();
        let replaced = self.graph.get(&key);
        self.policy.admit("set", KIND, &value, replaced)?;

        let replaced = replaced.map(Holding::of);
        let holding = Holding::of(&value);
        self.graph.set(key, value)?;
        self.policy.note_added(holding);
        match replaced {
            Some(old) => self.policy.note_removed(old),
            None => names::update(self.graph.metadata_mut(), |names| names.push(None)),
        }
        Ok(())
    }

    /// Value for `key`, or `None` when absent
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.graph.get(key)
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.graph.has_key(key)
    }

    /// Remove `key`, returning its value; a missing key is an error
    pub fn remove(&mut self, key: &str) -> CollectionResult<Value> {
        self.policy.check_not_frozen("remove", KIND)?;
        let position = self
            .graph
            .position_of(key)
            .ok_or_else(|| GraphError::KeyNotFound(key.to_string()))?;
        let removed = self
            .graph
            .remove(key)?
            .ok_or_else(|| GraphError::KeyNotFound(key.to_string()))?;
        names::update(self.graph.metadata_mut(), |names| {
            if position < names.len() {
                names.remove(position);
            }
        });
        self.policy.note_removed(Holding::of(&removed));
        Ok(removed)
    }

    pub fn clear(&mut self) -> CollectionResult<()> {
        self.policy.check_not_frozen("clear", KIND)?;
        self.graph.clear()?;
        names::update(self.graph.metadata_mut(), Vec::clear);
        self.policy.clear_elements();
        Ok(())
    }

    pub fn keys(&self) -> Vec<&str> {
        self.graph.keys()
    }

    pub fn values(&self) -> Vec<&Value> {
        self.graph.values()
    }

    pub fn items(&self) -> Vec<(&str, &Value)> {
        self.graph.items()
    }

    /// Replace the name overlay; one entry per key, in key order
    pub fn set_names(&mut self, new_names: Names) -> CollectionResult<()> {
        self.policy.check_not_frozen("set_names", KIND)?;
        if new_names.len() != self.len() {
            return Err(CollectionError::NameCountMismatch {
                expected: self.len(),
                actual: new_names.len(),
            });
        }
        names::store(self.graph.metadata_mut(), &new_names);
        Ok(())
    }

    pub fn get_names(&self) -> Option<Names> {
        names::load(self.graph.metadata())
    }

    pub fn get_name(&self, key: &str) -> Option<String> {
        let position = self.graph.position_of(key)?;
        self.get_names()?.into_iter().nth(position).flatten()
    }

    pub fn set_name(&mut self, key: &str, name: Option<String>) -> CollectionResult<()> {
        self.policy.check_not_frozen("set_name", KIND)?;
        let position = self
            .graph
            .position_of(key)
            .ok_or_else(|| GraphError::KeyNotFound(key.to_string()))?;
        let len = self.len();
        names::assign(self.graph.metadata_mut(), len, position, name);
        Ok(())
    }

    /// Look a value up by its element name rather than its key
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        let position = names::position(self.graph.metadata(), name)?;
        let key = *self.keys().get(position)?;
        self.get(key)
    }

    /// Deep conversion to a JSON object, keys in insertion order
    pub fn to_plain(&self) -> JsonValue {
        let map: Map<String, JsonValue> = self
            .items()
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_plain()))
            .collect();
        JsonValue::Object(map)
    }

    /// `{ "k": v }`, or `{}` when empty
    pub fn to_display_string(&self) -> String {
        self.to_display_string_with(&DisplayConfig::default())
    }

    pub fn to_display_string_with(&self, config: &DisplayConfig) -> String {
        if self.is_empty() {
            return "{}".to_string();
        }
        let entries = self
            .items()
            .into_iter()
            .map(|(key, value)| format!("{:?}: {}", key, value.repr()));
        format!("{{ {} }}", join_limited(entries, config))
    }

    pub fn inspect(&self) -> String {
        let graph = self.graph.graph();
        format!(
            "<{} size={} nodes={} edges={} frozen={} rules={}>",
            self.type_name(),
            self.len(),
            graph.node_count(),
            graph.edge_count(),
            self.is_frozen(),
            graph.control().get_active_rules().len()
        )
    }
}

impl Governed for HashValue {
    fn container_kind(&self) -> ContainerKind {
        KIND
    }

    fn structure(&self) -> &GraphStructure {
        self.graph.graph()
    }

    fn control_mut(&mut self) -> &mut ControlLayer {
        self.graph.control_mut()
    }

    fn is_frozen(&self) -> bool {
        self.policy.is_frozen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_set_remove_keys() {
        let mut hash = HashValue::new();
        hash.set("a", 1).unwrap();
        hash.set("b", 2).unwrap();
        assert_eq!(hash.remove("a").unwrap(), Value::from(1));

        assert_eq!(hash.keys(), vec!["b"]);
        assert!(!hash.has_key("a"));
        assert_eq!(hash.get("a"), None);
        let err = hash.remove("a").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
    }

    #[test]
    fn test_replace_keeps_order() {
        let mut hash = HashValue::from_pairs([("x", 1), ("y", 2)]).unwrap();
        hash.set("x", 10).unwrap();
        assert_eq!(hash.keys(), vec!["x", "y"]);
        assert_eq!(hash.values(), vec![&Value::from(10), &Value::from(2)]);
        assert!(hash.graph().is_consistent());
    }

    #[test]
    fn test_constraint_and_freeze() {
        let mut hash = HashValue::with_constraint(TypeTag::String);
        hash.set("name", "graph").unwrap();
        let err = hash.set("count", 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Constraint);
        assert_eq!(hash.type_name(), "hash<string>");

        hash.freeze();
        let err = hash.set("name", "other").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Immutability);
        assert_eq!(hash.get("name"), Some(&Value::from("graph")));
        assert!(hash.remove("name").is_err());
    }

    #[test]
    fn test_nested_freeze() {
        let mut hash = HashValue::new();
        hash.set("inner", HashValue::from_pairs([("k", 1)]).unwrap()).unwrap();
        hash.freeze();
        assert!(hash.get("inner").unwrap().is_frozen());
    }

    #[test]
    fn test_contamination_tracks_replacement() {
        let mut frozen = HashValue::new();
        frozen.freeze();
        let mut hash = HashValue::new();
        hash.set("a", frozen.clone()).unwrap();
        assert!(hash.contains_frozen());
        assert!(hash.set("b", HashValue::new()).is_err());

        // overwriting the only frozen entry lifts the restriction
        hash.set("a", HashValue::new()).unwrap();
        assert!(!hash.contains_frozen());
        hash.set("b", HashValue::new()).unwrap();
        assert!(hash.set("c", frozen).is_err());

        hash.remove("a").unwrap();
        hash.remove("b").unwrap();
        hash.set("c", 1).unwrap();
        let mut cold = HashValue::new();
        cold.freeze();
        hash.set("d", cold).unwrap();
    }

    #[test]
    fn test_names() {
        let mut hash = HashValue::from_pairs([("a", 1), ("b", 2)]).unwrap();
        hash.set_names(vec![Some("first".to_string()), None]).unwrap();
        assert_eq!(hash.get_by_name("first"), Some(&Value::from(1)));
        assert_eq!(hash.get_name("a"), Some("first".to_string()));

        hash.set("c", 3).unwrap();
        hash.set_name("c", Some("third".to_string())).unwrap();
        hash.remove("a").unwrap();
        assert_eq!(hash.get_names(), Some(vec![None, Some("third".to_string())]));
        assert_eq!(hash.get_by_name("third"), Some(&Value::from(3)));
        assert_eq!(hash.get_by_name("first"), None);
        assert!(hash.set_name("zzz", None).is_err());
    }

    #[test]
    fn test_display_and_plain() {
        assert_eq!(HashValue::new().to_display_string(), "{}");
        let hash = HashValue::from_pairs([("k", Value::from("v")), ("n", Value::from(1))]).unwrap();
        assert_eq!(hash.to_display_string(), "{ \"k\": \"v\", \"n\": 1 }");
        assert_eq!(hash.to_plain(), json!({"k": "v", "n": 1}));
        assert!(hash.inspect().starts_with("<hash size=2 nodes=3 edges=2"));
    }
}
