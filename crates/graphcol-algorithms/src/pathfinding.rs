//! Pathfinding algorithms
//!
//! Unweighted shortest path (BFS).

use super::common::{GraphView, NodeId};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::collections::VecDeque;

/// Result of a pathfinding algorithm
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathResult {
    pub source: NodeId,
    pub target: NodeId,
    /// Inclusive path, `source` first and `target` last
    pub path: Vec<NodeId>,
    pub cost: f64,
}

/// Unweighted shortest path by breadth-first search.
///
/// Follows outgoing edges only. Returns `None` when either endpoint is not
/// part of the view or the target is unreachable.
pub fn bfs(view: &GraphView, source: NodeId, target: NodeId) -> Option<PathResult> {
    let source_idx = view.index_of(source)?;
    let target_idx = view.index_of(target)?;

    // dense index -> index it was discovered from
    let mut parents: FxHashMap<usize, Option<usize>> = FxHashMap::default();
    let mut queue = VecDeque::from([source_idx]);
    parents.insert(source_idx, None);

    while let Some(current) = queue.pop_front() {
        if current == target_idx {
            let path = unwind(view, &parents, target_idx);
            return Some(PathResult {
                source,
                target,
                cost: (path.len() - 1) as f64,
                path,
            });
        }
        for &next in view.successors(current) {
            if let Entry::Vacant(slot) = parents.entry(next) {
                slot.insert(Some(current));
                queue.push_back(next);
            }
        }
    }
    None
}

/// Walk parent links back from `end` and return the path source-first
fn unwind(view: &GraphView, parents: &FxHashMap<usize, Option<usize>>, end: usize) -> Vec<NodeId> {
    let mut path = vec![view.node_at(end)];
    let mut current = end;
    while let Some(&Some(parent)) = parents.get(&current) {
        path.push(view.node_at(parent));
        current = parent;
    }
    path.reverse();
    path
}
