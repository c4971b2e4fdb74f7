//! Graph algorithms module
//!
//! Algorithms are implemented in the `graphcol-algorithms` crate.
//! This module provides the integration/adapter layer.

use crate::graph::{GraphStructure, NodeId};
use graphcol_algorithms::{GraphView, NodeId as AlgoNodeId};
use rustc_hash::FxHashMap;

// Re-export algorithms
pub use graphcol_algorithms::{bfs, connected_components as components, ComponentsResult, PathResult};

/// Build a GraphView from a structure for algorithm execution.
///
/// Nodes keep the structure's insertion order. Only topology is copied.
pub fn build_view(structure: &GraphStructure) -> GraphView {
    // 1. Collect nodes and dense index mappings
    let index_to_node: Vec<AlgoNodeId> = structure.nodes().map(|n| n.id().as_u64()).collect();
    let node_to_index: FxHashMap<NodeId, usize> = structure
        .nodes()
        .enumerate()
        .map(|(idx, n)| (n.id(), idx))
        .collect();

    // 2. Adjacency lists in dense indices
    let mut outgoing: Vec<Vec<usize>> = Vec::with_capacity(index_to_node.len());
    for node in structure.nodes() {
        let targets = node
            .outgoing()
            .keys()
            .filter_map(|target| node_to_index.get(target).copied())
            .collect();
        outgoing.push(targets);
    }

    // 3. Convert to CSR
    GraphView::from_adjacency_list(index_to_node, outgoing)
}

/// Inclusive BFS path over outgoing edges
pub fn shortest_path(structure: &GraphStructure, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
    if !structure.contains_node(from) || !structure.contains_node(to) {
        return None;
    }
    let view = build_view(structure);
    bfs(&view, from.as_u64(), to.as_u64()).map(|result| result.path.into_iter().map(NodeId::new).collect())
}

/// Undirected components, in node insertion order of their first member
pub fn connected_components(structure: &GraphStructure) -> Vec<Vec<NodeId>> {
    let view = build_view(structure);
    components(&view)
        .components
        .into_iter()
        .map(|members| members.into_iter().map(NodeId::new).collect())
        .collect()
}
