//! Tree graph: the binary search tree behind tree values
//!
//! Children hang off their parent through `left`/`right` named edges. The
//! tree rule table (see [`control`](super::control)) keeps the hierarchy
//! strict: at most two children, one parent, no cycles.

use super::control::ControlLayer;
use super::edge::{EdgeMetadata, LEFT, RIGHT};
use super::metadata::MetadataLayer;
use super::node::Node;
use super::store::{GraphError, GraphResult, GraphStructure};
use super::types::{NodeId, StructureKind};
use crate::value::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone)]
pub struct TreeGraph {
    graph: GraphStructure,
    size: usize,
}

impl TreeGraph {
    pub fn new() -> Self {
        TreeGraph {
            graph: GraphStructure::new(StructureKind::Tree),
            size: 0,
        }
    }

    pub fn from_values<I>(values: I) -> GraphResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let mut tree = Self::new();
        for value in values {
            tree.insert(value)?;
        }
        Ok(tree)
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

    pub fn root_id(&self) -> Option<NodeId> {
        self.graph.root()
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn value_of(&self, id: NodeId) -> Option<&Value> {
        self.graph.get_node(id).map(|node| node.value())
    }

    pub fn left_child(&self, id: NodeId) -> Option<NodeId> {
        self.graph.get_node(id)?.child(LEFT)
    }

    pub fn right_child(&self, id: NodeId) -> Option<NodeId> {
        self.graph.get_node(id)?.child(RIGHT)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.graph.get_node(id)?.parent()
    }

    /// Insert a value in search order.
    ///
    /// Values comparing less than or equal to a node go left, greater go
    /// right.
    pub fn insert(&mut self, value: impl Into<Value>) -> GraphResult<NodeId> {
        let value = value.into();
        let Some(root) = self.graph.root() else {
            let id = self.graph.add_root_node(value);
            self.size += 1;
            return Ok(id);
        };

        let (parent, slot) = self.find_slot(root, &value);
        let id = self.graph.add_node(value);
        if let Err(err) = self.graph.add_edge(parent, id, EdgeMetadata::named(slot)) {
            self.graph.remove_node(id)?;
            return Err(err);
        }
        self.size += 1;
        Ok(id)
    }

    /// Descend to the first empty slot for `value`
    fn find_slot(&self, root: NodeId, value: &Value) -> (NodeId, &'static str) {
        let mut current = root;
        loop {
            let Some(node) = self.graph.get_node(current) else {
                return (current, LEFT);
            };
            let slot = match value.compare(node.value()) {
                Ordering::Greater => RIGHT,
                Ordering::Less | Ordering::Equal => LEFT,
            };
            match node.child(slot) {
                Some(child) => current = child,
                None => return (current, slot),
            }
        }
    }

    /// Place a new node under `parent` in an explicit slot, bypassing search
    /// order. The node is removed again if the edge is rejected.
    pub fn attach(&mut self, parent: NodeId, value: impl Into<Value>, label: &str) -> GraphResult<NodeId> {
        if !self.graph.contains_node(parent) {
            return Err(GraphError::NodeNotFound(parent));
        }
        let id = self.graph.add_node(value);
        if let Err(err) = self.graph.add_edge(parent, id, EdgeMetadata::named(label)) {
            self.graph.remove_node(id)?;
            return Err(err);
        }
        self.size += 1;
        Ok(id)
    }

    /// Node holding a value equal (by ordering) to `value`
    pub fn search(&self, value: &Value) -> Option<NodeId> {
        let mut current = self.graph.root();
        while let Some(id) = current {
            let node = self.graph.get_node(id)?;
            current = match value.compare(node.value()) {
                Ordering::Equal => return Some(id),
                Ordering::Less => node.child(LEFT),
                Ordering::Greater => node.child(RIGHT),
            };
        }
        None
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.search(value).is_some()
    }

    /// Longest root-to-leaf path in nodes; 0 when empty. Counted level by
    /// level.
    pub fn height(&self) -> usize {
        let mut level: Vec<&Node> = self.root_node().into_iter().collect();
        let mut height = 0;
        while !level.is_empty() {
            height += 1;
            level = level
                .into_iter()
                .flat_map(|node| [node.child(LEFT), node.child(RIGHT)])
                .filter_map(|child| self.graph.get_node(child?))
                .collect();
        }
        height
    }

    pub fn min(&self) -> Option<&Value> {
        let mut id = self.graph.root()?;
        while let Some(left) = self.left_child(id) {
            id = left;
        }
        self.value_of(id)
    }

    pub fn max(&self) -> Option<&Value> {
        let mut id = self.graph.root()?;
        while let Some(right) = self.right_child(id) {
            id = right;
        }
        self.value_of(id)
    }

    pub fn in_order(&self) -> Vec<&Value> {
        let mut out = Vec::with_capacity(self.size);
        let mut stack: Vec<&Node> = Vec::new();
        let mut current = self.root_node();
        loop {
            while let Some(node) = current {
                stack.push(node);
                current = self.child_node(node, LEFT);
            }
            let Some(node) = stack.pop() else {
                break;
            };
            out.push(node.value());
            current = self.child_node(node, RIGHT);
        }
        out
    }

    pub fn pre_order(&self) -> Vec<&Value> {
        let mut out = Vec::with_capacity(self.size);
        let mut stack: Vec<&Node> = self.root_node().into_iter().collect();
        while let Some(node) = stack.pop() {
            out.push(node.value());
            stack.extend(self.child_node(node, RIGHT));
            stack.extend(self.child_node(node, LEFT));
        }
        out
    }

    /// Children before parents; built as a mirrored pre-order, then reversed
    pub fn post_order(&self) -> Vec<&Value> {
        let mut out = Vec::with_capacity(self.size);
        let mut stack: Vec<&Node> = self.root_node().into_iter().collect();
        while let Some(node) = stack.pop() {
            out.push(node.value());
            stack.extend(self.child_node(node, LEFT));
            stack.extend(self.child_node(node, RIGHT));
        }
        out.reverse();
        out
    }

    fn root_node(&self) -> Option<&Node> {
        self.graph.get_node(self.graph.root()?)
    }

    fn child_node(&self, node: &Node, slot: &str) -> Option<&Node> {
        self.graph.get_node(node.child(slot)?)
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.graph.values_mut()
    }

    pub fn clear(&mut self) {
        self.graph.clear();
        self.size = 0;
    }

    /// Check the search-order property: everything in a left subtree
    /// compares <= its ancestor, everything in a right subtree >
    pub fn is_valid_search_tree(&self) -> bool {
        let mut pending: Vec<(&Node, Option<&Value>, Option<&Value>)> =
            self.root_node().map(|root| (root, None, None)).into_iter().collect();
        while let Some((node, low, high)) = pending.pop() {
            let value = node.value();
            if low.is_some_and(|low| value.compare(low) != Ordering::Greater) {
                return false;
            }
            if high.is_some_and(|high| value.compare(high) == Ordering::Greater) {
                return false;
            }
            if let Some(left) = self.child_node(node, LEFT) {
                pending.push((left, low, Some(value)));
            }
            if let Some(right) = self.child_node(node, RIGHT) {
                pending.push((right, Some(value), high));
            }
        }
        true
    }
}

impl Default for TreeGraph {
    fn default() -> Self {
        Self::new()
    }
}
