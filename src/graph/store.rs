//! Graph structure
//!
//! Owns a set of nodes, an optional root, a metadata layer and a control
//! layer. Every edge write goes through [`GraphStructure::add_edge`], which
//! validates the edge with the control layer before touching adjacency.

use super::control::{ControlLayer, RuleContext};
use super::edge::EdgeMetadata;
use super::metadata::MetadataLayer;
use super::node::Node;
use super::types::{NodeId, StructureId, StructureKind};
use crate::algo;
use crate::value::Value;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::trace;

static NEXT_STRUCTURE_ID: AtomicU64 = AtomicU64::new(1);

fn next_structure_id() -> StructureId {
    StructureId(NEXT_STRUCTURE_ID.fetch_add(1, Ordering::Relaxed))
}

/// Broad error category, used by callers to map errors onto language-level
/// runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// A control-layer rule rejected an edge
    Structural,
    /// A value did not match a declared element type
    Constraint,
    /// Mutation of frozen data, or mixing frozen and unfrozen data
    Immutability,
    /// Missing node, edge, index, key, name or rule
    Lookup,
    /// Malformed request such as an unknown format name
    Argument,
}

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Edge {from} -> {to} not found")]
    EdgeNotFound { from: NodeId, to: NodeId },

    #[error("Structural violation ({rule}): {reason}")]
    StructuralViolation { rule: String, reason: String },

    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Unknown rule: {0}")]
    UnknownRule(String),
}

impl GraphError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GraphError::StructuralViolation { .. } => ErrorKind::Structural,
            GraphError::NodeNotFound(_)
            | GraphError::EdgeNotFound { .. }
            | GraphError::IndexOutOfRange { .. }
            | GraphError::KeyNotFound(_)
            | GraphError::UnknownRule(_) => ErrorKind::Lookup,
        }
    }

    /// Name of the rejecting rule for structural violations
    pub fn rule(&self) -> Option<&str> {
        match self {
            GraphError::StructuralViolation { rule, .. } => Some(rule),
            _ => None,
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Nodes and root, detached from a structure so a failed rebuild can put
/// them back
#[derive(Debug)]
pub(crate) struct Topology {
    nodes: IndexMap<NodeId, Node>,
    root: Option<NodeId>,
    next_node_id: u64,
}

/// In-memory graph structure
///
/// Nodes are stored in insertion order and keyed by id; edges live in the
/// adjacency maps of their two endpoints.
#[derive(Debug)]
pub struct GraphStructure {
    id: StructureId,

    kind: StructureKind,

    /// Exclusively owned nodes
    nodes: IndexMap<NodeId, Node>,

    root: Option<NodeId>,

    metadata: MetadataLayer,

    control: ControlLayer,

    /// Next node ID
    next_node_id: u64,
}

impl GraphStructure {
    /// Create an empty structure governed by the default rules for `kind`
    pub fn new(kind: StructureKind) -> Self {
        GraphStructure {
            id: next_structure_id(),
            kind,
            nodes: IndexMap::new(),
            root: None,
            metadata: MetadataLayer::new(),
            control: ControlLayer::for_kind(kind),
            next_node_id: 1,
        }
    }

    pub fn id(&self) -> StructureId {
        self.id
    }

    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Point the root at an existing node, or clear it
    pub fn set_root(&mut self, root: Option<NodeId>) -> GraphResult<()> {
        if let Some(id) = root {
            if !self.nodes.contains_key(&id) {
                return Err(GraphError::NodeNotFound(id));
            }
        }
        self.root = root;
        Ok(())
    }

    pub fn metadata(&self) -> &MetadataLayer {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut MetadataLayer {
        &mut self.metadata
    }

    pub fn control(&self) -> &ControlLayer {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut ControlLayer {
        &mut self.control
    }

    /// Create a node holding `value` and return its id
    pub fn add_node(&mut self, value: impl Into<Value>) -> NodeId {
        let id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;

        let mut node = Node::new(id, value);
        node.attach(self.id);
        self.nodes.insert(id, node);
        trace!(structure = self.id.as_u64(), node = id.as_u64(), "node added");
        id
    }

    /// Detach every edge of a node, then drop it
    pub fn remove_node(&mut self, id: NodeId) -> GraphResult<Node> {
        let mut node = self.nodes.shift_remove(&id).ok_or(GraphError::NodeNotFound(id))?;

        let (targets, sources) = node.clear_adjacency();
        for target in targets {
            if let Some(neighbor) = self.nodes.get_mut(&target) {
                neighbor.remove_incoming(id);
            }
        }
        for source in sources {
            if let Some(neighbor) = self.nodes.get_mut(&source) {
                neighbor.remove_outgoing(id);
            }
        }

        if self.root == Some(id) {
            self.root = None;
        }
        trace!(structure = self.id.as_u64(), node = id.as_u64(), "node removed");
        Ok(node)
    }

    /// Create a node and make it the root
    pub(crate) fn add_root_node(&mut self, value: impl Into<Value>) -> NodeId {
        let id = self.add_node(value);
        self.root = Some(id);
        id
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of directed adjacency entries; a bidirectional edge counts twice
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(Node::out_degree).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids of nodes whose value equals `value`
    pub fn find_nodes_by_value(&self, value: &Value) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|node| node.value() == value)
            .map(Node::id)
            .collect()
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.nodes.values_mut().map(Node::value_mut)
    }

    /// Validate and create an edge
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, metadata: EdgeMetadata) -> GraphResult<()> {
        self.add_edge_at(from, to, metadata, None)
    }

    /// Validate and create an edge whose endpoint chain positions are
    /// already known to the caller
    pub(crate) fn add_edge_at(
        &mut self,
        from: NodeId,
        to: NodeId,
        metadata: EdgeMetadata,
        positions: Option<(usize, usize)>,
    ) -> GraphResult<()> {
        self.validate_edge_at(from, to, &metadata, positions)?;
        if metadata.bidirectional {
            let reversed = positions.map(|(source, target)| (target, source));
            self.validate_edge_at(to, from, &metadata, reversed)?;
        }

        if metadata.bidirectional {
            self.link(to, from, metadata.clone());
        }
        self.link(from, to, metadata);
        trace!(
            structure = self.id.as_u64(),
            from = from.as_u64(),
            to = to.as_u64(),
            "edge added"
        );
        Ok(())
    }

    /// Ask the control layer whether an edge may exist, without writing it
    pub fn validate_edge(&self, from: NodeId, to: NodeId, metadata: &EdgeMetadata) -> GraphResult<()> {
        self.validate_edge_at(from, to, metadata, None)
    }

    fn validate_edge_at(
        &self,
        from: NodeId,
        to: NodeId,
        metadata: &EdgeMetadata,
        positions: Option<(usize, usize)>,
    ) -> GraphResult<()> {
        let source = self.nodes.get(&from).ok_or(GraphError::NodeNotFound(from))?;
        let target = self.nodes.get(&to).ok_or(GraphError::NodeNotFound(to))?;

        let ctx = RuleContext {
            structure: self,
            source,
            target,
            metadata,
            positions,
        };
        self.control.validate_edge_operation(&ctx)?;
        Ok(())
    }

    fn link(&mut self, from: NodeId, to: NodeId, metadata: EdgeMetadata) {
        if let Some(target) = self.nodes.get_mut(&to) {
            target.insert_incoming(from, metadata.clone());
        }
        if let Some(source) = self.nodes.get_mut(&from) {
            source.insert_outgoing(to, metadata);
        }
    }

    /// Remove an edge; a bidirectional edge loses both directions
    pub fn remove_edge(&mut self, from: NodeId, to: NodeId) -> GraphResult<EdgeMetadata> {
        let metadata = self
            .nodes
            .get_mut(&from)
            .and_then(|source| source.remove_outgoing(to))
            .ok_or(GraphError::EdgeNotFound { from, to })?;
        if let Some(target) = self.nodes.get_mut(&to) {
            target.remove_incoming(from);
        }

        if metadata.bidirectional {
            let mirrored = self
                .nodes
                .get(&to)
                .and_then(|target| target.edge_to(from))
                .is_some_and(|meta| meta.bidirectional);
            if mirrored {
                if let Some(target) = self.nodes.get_mut(&to) {
                    target.remove_outgoing(from);
                }
                if let Some(source) = self.nodes.get_mut(&from) {
                    source.remove_incoming(to);
                }
            }
        }
        Ok(metadata)
    }

    /// Drop every edge, keeping the nodes
    pub fn clear_edges(&mut self) {
        for node in self.nodes.values_mut() {
            node.clear_adjacency();
        }
    }

    /// Drop every node and edge. Metadata and rules are kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Depth-first reachability over outgoing edges
    pub fn can_reach(&self, from: NodeId, to: NodeId) -> bool {
        if !self.nodes.contains_key(&from) || !self.nodes.contains_key(&to) {
            return false;
        }
        let mut stack = vec![from];
        let mut seen = FxHashSet::default();
        while let Some(id) = stack.pop() {
            if id == to {
                return true;
            }
            if !seen.insert(id) {
                continue;
            }
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.successors().filter(|n| !seen.contains(n)));
            }
        }
        false
    }

    /// Inclusive shortest path over outgoing edges
    pub fn shortest_path(&self, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
        algo::shortest_path(self, from, to)
    }

    /// Components over the union of outgoing and incoming neighbors
    pub fn connected_components(&self) -> Vec<Vec<NodeId>> {
        algo::connected_components(self)
    }

    /// True when every node is in one component (vacuously for empty graphs)
    pub fn is_connected(&self) -> bool {
        self.connected_components().len() <= 1
    }

    pub(crate) fn take_topology(&mut self) -> Topology {
        Topology {
            nodes: std::mem::take(&mut self.nodes),
            root: self.root.take(),
            next_node_id: self.next_node_id,
        }
    }

    pub(crate) fn restore_topology(&mut self, topology: Topology) {
        self.nodes = topology.nodes;
        self.root = topology.root;
        self.next_node_id = self.next_node_id.max(topology.next_node_id);
    }
}

impl Clone for GraphStructure {
    /// Deep copy with a fresh identity; cloned nodes point back at the copy.
    fn clone(&self) -> Self {
        let id = next_structure_id();
        let nodes = self
            .nodes
            .iter()
            .map(|(node_id, node)| {
                let mut node = node.clone();
                node.attach(id);
                (*node_id, node)
            })
            .collect();

        GraphStructure {
            id,
            kind: self.kind,
            nodes,
            root: self.root,
            metadata: self.metadata.clone(),
            control: self.control.clone(),
            next_node_id: self.next_node_id,
        }
    }
}
