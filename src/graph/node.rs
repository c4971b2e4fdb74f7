//! Node implementation
//!
//! A node holds one value plus its outgoing and incoming adjacency, each
//! keyed by neighbor id. The adjacency maps are only written by the owning
//! [`GraphStructure`](super::GraphStructure) so both sides of an edge stay
//! symmetric.

use super::edge::EdgeMetadata;
use super::types::{NodeId, StructureId};
use crate::value::Value;
use indexmap::IndexMap;

/// A value-holding vertex
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,

    value: Value,

    /// Target -> metadata, in insertion order
    outgoing: IndexMap<NodeId, EdgeMetadata>,

    /// Source -> metadata, in insertion order
    incoming: IndexMap<NodeId, EdgeMetadata>,

    /// Non-owning back-reference to the containing structure
    structure: Option<StructureId>,
}

impl Node {
    /// Create a detached node
    pub fn new(id: NodeId, value: impl Into<Value>) -> Self {
        Node {
            id,
            value: value.into(),
            outgoing: IndexMap::new(),
            incoming: IndexMap::new(),
            structure: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    /// Replace the held value, returning the previous one
    pub fn set_value(&mut self, value: impl Into<Value>) -> Value {
        std::mem::replace(&mut self.value, value.into())
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Structure this node belongs to, if any
    pub fn structure(&self) -> Option<StructureId> {
        self.structure
    }

    pub fn outgoing(&self) -> &IndexMap<NodeId, EdgeMetadata> {
        &self.outgoing
    }

    pub fn incoming(&self) -> &IndexMap<NodeId, EdgeMetadata> {
        &self.incoming
    }

    /// Metadata of the edge from this node to `target`
    pub fn edge_to(&self, target: NodeId) -> Option<&EdgeMetadata> {
        self.outgoing.get(&target)
    }

    /// Metadata of the edge from `source` into this node
    pub fn edge_from(&self, source: NodeId) -> Option<&EdgeMetadata> {
        self.incoming.get(&source)
    }

    pub fn has_edge_to(&self, target: NodeId) -> bool {
        self.outgoing.contains_key(&target)
    }

    pub fn successors(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing.keys().copied()
    }

    pub fn predecessors(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.incoming.keys().copied()
    }

    pub fn out_degree(&self) -> usize {
        self.outgoing.len()
    }

    pub fn in_degree(&self) -> usize {
        self.incoming.len()
    }

    /// Target of the named edge with the given label (e.g. `left`)
    pub fn child(&self, label: &str) -> Option<NodeId> {
        self.outgoing
            .iter()
            .find(|(_, meta)| meta.is_child_slot() && meta.label() == Some(label))
            .map(|(id, _)| *id)
    }

    /// Number of outgoing `left`/`right` edges
    pub fn child_count(&self) -> usize {
        self.outgoing.values().filter(|meta| meta.is_child_slot()).count()
    }

    /// Source of the incoming `left`/`right` edge, if any
    pub fn parent(&self) -> Option<NodeId> {
        self.incoming
            .iter()
            .find(|(_, meta)| meta.is_child_slot())
            .map(|(id, _)| *id)
    }

    pub(crate) fn attach(&mut self, structure: StructureId) {
        self.structure = Some(structure);
    }

    pub(crate) fn insert_outgoing(&mut self, target: NodeId, metadata: EdgeMetadata) {
        self.outgoing.insert(target, metadata);
    }

    pub(crate) fn insert_incoming(&mut self, source: NodeId, metadata: EdgeMetadata) {
        self.incoming.insert(source, metadata);
    }

    pub(crate) fn remove_outgoing(&mut self, target: NodeId) -> Option<EdgeMetadata> {
        self.outgoing.shift_remove(&target)
    }

    pub(crate) fn remove_incoming(&mut self, source: NodeId) -> Option<EdgeMetadata> {
        self.incoming.shift_remove(&source)
    }

    /// Drop every adjacency entry, returning the neighbor ids on each side
    pub(crate) fn clear_adjacency(&mut self) -> (Vec<NodeId>, Vec<NodeId>) {
        let targets = self.outgoing.drain(..).map(|(id, _)| id).collect();
        let sources = self.incoming.drain(..).map(|(id, _)| id).collect();
        (targets, sources)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.structure == other.structure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::edge::{LEFT, RIGHT};

    #[test]
    fn test_create_node() {
        let node = Node::new(NodeId::new(1), 42);
        assert_eq!(node.id(), NodeId::new(1));
        assert_eq!(node.value(), &Value::from(42));
        assert!(node.structure().is_none());
        assert_eq!(node.out_degree(), 0);
    }

    #[test]
    fn test_set_value() {
        let mut node = Node::new(NodeId::new(2), "a");
        let old = node.set_value("b");
        assert_eq!(old, Value::from("a"));
        assert_eq!(node.value(), &Value::from("b"));
    }

    #[test]
    fn test_child_lookup() {
        let mut node = Node::new(NodeId::new(3), 5);
        node.insert_outgoing(NodeId::new(4), EdgeMetadata::named(LEFT));
        node.insert_outgoing(NodeId::new(5), EdgeMetadata::typed(RIGHT));

        assert_eq!(node.child(LEFT), Some(NodeId::new(4)));
        // a typed edge never fills a child slot
        assert_eq!(node.child(RIGHT), None);
        assert_eq!(node.child_count(), 1);
    }

    #[test]
    fn test_clear_adjacency() {
        let mut node = Node::new(NodeId::new(1), 0);
        node.insert_outgoing(NodeId::new(2), EdgeMetadata::sequential(0));
        node.insert_incoming(NodeId::new(3), EdgeMetadata::sequential(1));

        let (targets, sources) = node.clear_adjacency();
        assert_eq!(targets, vec![NodeId::new(2)]);
        assert_eq!(sources, vec![NodeId::new(3)]);
        assert_eq!(node.out_degree() + node.in_degree(), 0);
    }
}
