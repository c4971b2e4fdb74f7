//! Sequential graph: the chain behind list values
//!
//! Keeps an explicit traversal order next to the edges so positional reads
//! don't need a walk. The node at position `i` has a `Sequential(i)` edge to
//! the node at position `i + 1`.
//!
//! Structural edits other than append and in-place set (insert, remove,
//! prepend, reverse) rebuild the whole chain from the reordered values.
//! That costs O(n) per edit and gives every element a fresh node id; edge
//! indices always end up contiguous from 0.

use super::control::ControlLayer;
use super::edge::{EdgeKind, EdgeMetadata};
use super::metadata::MetadataLayer;
use super::store::{GraphError, GraphResult, GraphStructure};
use super::types::{NodeId, StructureKind};
use crate::value::Value;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct SequentialGraph {
    graph: GraphStructure,
    order: Vec<NodeId>,
}

impl SequentialGraph {
    pub fn new() -> Self {
        SequentialGraph {
            graph: GraphStructure::new(StructureKind::Sequential),
            order: Vec::new(),
        }
    }

    pub fn from_values<I>(values: I) -> GraphResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let mut seq = Self::new();
        for value in values {
            seq.append(value)?;
        }
        Ok(seq)
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

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Node ids in traversal order
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Resolve a possibly negative index against the current length
    pub fn resolve_index(&self, index: i64) -> Option<usize> {
        let len = self.order.len() as i64;
        let idx = if index < 0 { index + len } else { index };
        (0..len).contains(&idx).then_some(idx as usize)
    }

    pub fn node_at(&self, index: i64) -> Option<NodeId> {
        self.resolve_index(index).map(|idx| self.order[idx])
    }

    /// Append a value at the end of the chain
    pub fn append(&mut self, value: impl Into<Value>) -> GraphResult<NodeId> {
        let Some(&last) = self.order.last() else {
            let id = self.graph.add_root_node(value);
            self.order.push(id);
            return Ok(id);
        };
        let id = self.graph.add_node(value);
        let position = self.order.len() - 1;
        let meta = EdgeMetadata::sequential(position);
        if let Err(err) = self.graph.add_edge_at(last, id, meta, Some((position, position + 1))) {
            self.graph.remove_node(id)?;
            return Err(err);
        }
        self.order.push(id);
        Ok(id)
    }

    /// Value at a position; negative indices count from the end
    pub fn get_at_index(&self, index: i64) -> Option<&Value> {
        let id = self.node_at(index)?;
        self.graph.get_node(id).map(|node| node.value())
    }

    /// Replace the value at a position in place and return the previous one
    pub fn set_at_index(&mut self, index: i64, value: impl Into<Value>) -> GraphResult<Value> {
        let len = self.order.len();
        let id = self
            .node_at(index)
            .ok_or(GraphError::IndexOutOfRange { index, len })?;
        let node = self.graph.get_node_mut(id).ok_or(GraphError::NodeNotFound(id))?;
        Ok(node.set_value(value))
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.graph.get_node(*id).map(|node| node.value()))
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.graph.values_mut()
    }

    pub fn prepend(&mut self, value: impl Into<Value>) -> GraphResult<()> {
        self.insert_at(0, value)
    }

    /// Insert before position `index` (`index == len` appends)
    pub fn insert_at(&mut self, index: usize, value: impl Into<Value>) -> GraphResult<()> {
        if index > self.order.len() {
            return Err(GraphError::IndexOutOfRange {
                index: index as i64,
                len: self.order.len(),
            });
        }
        if index == self.order.len() {
            return self.append(value).map(|_| ());
        }
        let mut values = self.cloned_values();
        values.insert(index, value.into());
        self.rebuild(values)
    }

    /// Remove the element at a position and return its value
    pub fn remove_at(&mut self, index: i64) -> GraphResult<Value> {
        let idx = self.resolve_index(index).ok_or(GraphError::IndexOutOfRange {
            index,
            len: self.order.len(),
        })?;
        if idx + 1 == self.order.len() {
            let id = self.order[idx];
            let node = self.graph.remove_node(id)?;
            self.order.pop();
            if self.order.is_empty() {
                self.graph.set_root(None)?;
            }
            return Ok(node.into_value());
        }

        let mut values = self.cloned_values();
        let removed = values.remove(idx);
        self.rebuild(values)?;
        Ok(removed)
    }

    pub fn reverse(&mut self) -> GraphResult<()> {
        if self.order.len() < 2 {
            return Ok(());
        }
        let mut values = self.cloned_values();
        values.reverse();
        self.rebuild(values)
    }

    pub fn clear(&mut self) {
        self.graph.clear();
        self.order.clear();
    }

    /// Add an extra sequential edge between two positions, subject to the
    /// control layer
    pub fn connect(&mut self, from_index: i64, to_index: i64) -> GraphResult<()> {
        let len = self.order.len();
        let source = self
            .resolve_index(from_index)
            .ok_or(GraphError::IndexOutOfRange { index: from_index, len })?;
        let target = self
            .resolve_index(to_index)
            .ok_or(GraphError::IndexOutOfRange { index: to_index, len })?;
        self.graph.add_edge_at(
            self.order[source],
            self.order[target],
            EdgeMetadata::sequential(source),
            Some((source, target)),
        )
    }

    /// Check that order and chain edges agree
    pub fn is_consistent(&self) -> bool {
        if self.order.len() != self.graph.node_count() {
            return false;
        }
        if self.graph.root() != self.order.first().copied() {
            return false;
        }
        self.order.windows(2).enumerate().all(|(i, pair)| {
            self.graph
                .get_node(pair[0])
                .and_then(|node| node.edge_to(pair[1]))
                .is_some_and(|meta| meta.kind == EdgeKind::Sequential(i))
        })
    }

    fn cloned_values(&self) -> Vec<Value> {
        self.values().cloned().collect()
    }

    /// Discard every node and re-append `values`.
    ///
    /// If any edge is rejected the previous nodes and order are restored.
    fn rebuild(&mut self, values: Vec<Value>) -> GraphResult<()> {
        debug!(
            structure = self.graph.id().as_u64(),
            len = values.len(),
            "rebuilding sequential chain"
        );
        let previous = self.graph.take_topology();
        let previous_order = std::mem::take(&mut self.order);

        for value in values {
            if let Err(err) = self.append(value) {
                self.graph.clear();
                self.graph.restore_topology(previous);
                self.order = previous_order;
                return Err(err);
            }
        }
        Ok(())
    }
}

impl Default for SequentialGraph {
    fn default() -> Self {
        Self::new()
    }
}
