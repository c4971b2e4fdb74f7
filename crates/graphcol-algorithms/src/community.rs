//! Connected component discovery
//!
//! Components are computed over the union of outgoing and incoming
//! neighbors, so edge direction is ignored.

use super::common::{GraphView, NodeId};
use std::collections::HashMap;

/// Result of a component search
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentsResult {
    /// Components in discovery order; members in DFS visit order
    pub components: Vec<Vec<NodeId>>,
    /// Map of NodeId -> index into `components`
    pub node_component: HashMap<NodeId, usize>,
}

impl ComponentsResult {
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Size of the largest component
    pub fn largest(&self) -> usize {
        self.components.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Undirected components by iterative depth-first search.
///
/// Components are numbered in the order their first node appears in the
/// view.
pub fn connected_components(view: &GraphView) -> ComponentsResult {
    let mut visited = vec![false; view.node_count];
    let mut result = ComponentsResult::default();

    for start in 0..view.node_count {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let component = result.components.len();
        let mut members = Vec::new();
        let mut stack = vec![start];

        while let Some(idx) = stack.pop() {
            let id = view.node_at(idx);
            members.push(id);
            result.node_component.insert(id, component);
            for next in view.neighbors(idx) {
                if !visited[next] {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }
        result.components.push(members);
    }
    result
}
