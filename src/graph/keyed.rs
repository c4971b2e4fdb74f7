//! Keyed graph: the hub-and-spoke structure behind hash values
//!
//! A permanent root node holding `none` fans out to one value node per key
//! through a `Keyed(key)` edge.
//!
//! Assigning to an existing key never mutates the old node: a new node is
//! created and linked, then the old node is removed. Any node id obtained
//! for that key before the assignment is stale afterwards and resolves to
//! nothing.

use super::control::ControlLayer;
use super::edge::EdgeMetadata;
use super::metadata::MetadataLayer;
use super::store::{GraphResult, GraphStructure};
use super::types::{NodeId, StructureKind};
use crate::value::Value;
use indexmap::IndexMap;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct KeyedGraph {
    graph: GraphStructure,
    root: NodeId,
    /// Key -> value node, in first-insertion order
    index: IndexMap<String, NodeId>,
}

impl KeyedGraph {
    pub fn new() -> Self {
        let mut graph = GraphStructure::new(StructureKind::Keyed);
        let root = graph.add_root_node(Value::None);
        KeyedGraph {
            graph,
            root,
            index: IndexMap::new(),
        }
    }

    pub fn graph(&self) -> &GraphStructure {
        &self.graph
    }

    pub fn control(&self) -> &ControlLayer {
        self.graph.control()
    }

    pub fn control_mut(&mut self) -> &mut ControlLayer {
        self.graph.control_mut()
    }

    pub fn metadata(&self) -> &MetadataLayer {
        self.graph.metadata()
    }

    pub fn metadata_mut(&mut self) -> &mut MetadataLayer {
        self.graph.metadata_mut()
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Bind `key` to a fresh node holding `value`.
    ///
    /// The new node is linked before the old one is discarded, so a rejected
    /// edge leaves the previous binding untouched.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> GraphResult<NodeId> {
        let key = key.into();
        let id = self.graph.add_node(value);
        if let Err(err) = self.graph.add_edge(self.root, id, EdgeMetadata::keyed(key.clone())) {
            self.graph.remove_node(id)?;
            return Err(err);
        }

        if let Some(old) = self.index.insert(key, id) {
            debug!(
                structure = self.graph.id().as_u64(),
                old = old.as_u64(),
                new = id.as_u64(),
                "replacing keyed node"
            );
            self.graph.remove_node(old)?;
        }
        Ok(id)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        let id = self.index.get(key)?;
        self.graph.get_node(*id).map(|node| node.value())
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        let id = self.index.get(key)?;
        self.graph.get_node_mut(*id).map(|node| node.value_mut())
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Current node bound to `key`
    pub fn node_for(&self, key: &str) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    /// Position of `key` in iteration order
    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.index.get_index_of(key)
    }

    /// Unbind `key`, returning its value
    pub fn remove(&mut self, key: &str) -> GraphResult<Option<Value>> {
        match self.index.shift_remove(key) {
            Some(id) => Ok(Some(self.graph.remove_node(id)?.into_value())),
            None => Ok(None),
        }
    }

    pub fn keys(&self) -> Vec<&str> {
        self.index.keys().map(String::as_str).collect()
    }

    pub fn values(&self) -> Vec<&Value> {
        self.items().into_iter().map(|(_, value)| value).collect()
    }

    pub fn items(&self) -> Vec<(&str, &Value)> {
        self.index
            .iter()
            .filter_map(|(key, id)| {
                self.graph
                    .get_node(*id)
                    .map(|node| (key.as_str(), node.value()))
            })
            .collect()
    }

    /// Mutable access to every value, including the root's `none`
    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.graph.values_mut()
    }

    /// Drop every binding, keeping the root
    pub fn clear(&mut self) -> GraphResult<()> {
        for (_, id) in self.index.drain(..) {
            self.graph.remove_node(id)?;
        }
        Ok(())
    }

    /// Check that every key has exactly one matching keyed edge from root
    pub fn is_consistent(&self) -> bool {
        let Some(root) = self.graph.get_node(self.root) else {
            return false;
        };
        root.out_degree() == self.index.len()
            && self.index.iter().all(|(key, id)| {
                root.edge_to(*id).and_then(EdgeMetadata::key) == Some(key.as_str())
            })
    }
}

impl Default for KeyedGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::control::{Rule, RuleVerdict};

    #[test]
    fn test_set_get() {
        let mut map = KeyedGraph::new();
        map.set("a", 1).unwrap();
        map.set("b", 2).unwrap();

        assert_eq!(map.get("a"), Some(&Value::from(1)));
        assert_eq!(map.get("z"), None);
        assert_eq!(map.keys(), vec!["a", "b"]);
        assert_eq!(map.len(), 2);
        assert!(map.is_consistent());
    }

    #[test]
    fn test_replace_creates_new_node() {
        let mut map = KeyedGraph::new();
        let first = map.set("k", 1).unwrap();
        map.set("other", 0).unwrap();
        let second = map.set("k", 2).unwrap();

        assert_ne!(first, second);
        assert!(!map.graph().contains_node(first));
        assert_eq!(map.get("k"), Some(&Value::from(2)));
        // replacing keeps the key's position
        assert_eq!(map.keys(), vec!["k", "other"]);

        let root = map.graph().get_node(map.root_id()).unwrap();
        let keyed: Vec<_> = root
            .outgoing()
            .values()
            .filter(|meta| meta.key() == Some("k"))
            .collect();
        assert_eq!(keyed.len(), 1);
        assert!(map.is_consistent());
    }

    #[test]
    fn test_remove() {
        let mut map = KeyedGraph::new();
        map.set("a", 1).unwrap();
        map.set("b", 2).unwrap();

        assert_eq!(map.remove("a").unwrap(), Some(Value::from(1)));
        assert_eq!(map.remove("a").unwrap(), None);
        assert_eq!(map.keys(), vec!["b"]);
        assert!(!map.has_key("a"));
        assert_eq!(map.graph().node_count(), 2);
    }

    #[test]
    fn test_rejected_set_keeps_old_binding() {
        let mut map = KeyedGraph::new();
        let old = map.set("k", 1).unwrap();
        map.control_mut().add_rule(Rule::new("frozen-keys", "no rebinding", |ctx| {
            if ctx.metadata.key() == Some("k") {
                RuleVerdict::reject("k is fixed")
            } else {
                RuleVerdict::Accept
            }
        }));

        assert!(map.set("k", 2).is_err());
        assert_eq!(map.node_for("k"), Some(old));
        assert_eq!(map.get("k"), Some(&Value::from(1)));
        assert_eq!(map.graph().node_count(), 2);
    }

    #[test]
    fn test_star_is_connected() {
        let mut map = KeyedGraph::new();
        map.set("a", 1).unwrap();
        map.set("b", 2).unwrap();
        map.clear().unwrap();
        assert!(map.is_empty());
        assert_eq!(map.graph().node_count(), 1);

        map.set("c", 3).unwrap();
        assert!(map.graph().is_connected());
    }
}
