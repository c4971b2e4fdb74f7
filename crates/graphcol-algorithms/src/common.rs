//! Dense topology view shared by every algorithm
//!
//! Engine node ids are sparse and carry values and edge metadata around
//! with them. Algorithms only need the shape, so they run over a compact
//! CSR (compressed sparse row) copy indexed `0..node_count`.

use rustc_hash::FxHashMap;

/// Engine node id as seen by the algorithms
pub type NodeId = u64;

/// Read-only CSR snapshot of a structure's edges
#[derive(Debug, Clone, Default)]
pub struct GraphView {
    pub node_count: usize,
    /// Dense index -> engine id
    pub index_to_node: Vec<NodeId>,
    /// Engine id -> dense index
    pub node_to_index: FxHashMap<NodeId, usize>,

    /// Row offsets into `out_targets` (`node_count + 1` entries)
    pub out_offsets: Vec<usize>,
    pub out_targets: Vec<usize>,

    /// Row offsets into `in_sources`, mirroring the outgoing side
    pub in_offsets: Vec<usize>,
    pub in_sources: Vec<usize>,

}

impl GraphView {
    /// Build a view from per-node adjacency rows.
    ///
    /// `outgoing[i]` lists the dense indices node `i` points to; the
    /// incoming rows are derived.
    pub fn from_adjacency_list(index_to_node: Vec<NodeId>, outgoing: Vec<Vec<usize>>) -> Self {
        let node_count = index_to_node.len();
        let node_to_index = index_to_node
            .iter()
            .enumerate()
            .map(|(idx, &id)| (id, idx))
            .collect();

        let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); node_count];
        for (source, targets) in outgoing.iter().enumerate() {
            for &target in targets {
                incoming[target].push(source);
            }
        }

        let (out_offsets, out_targets) = compress(outgoing);
        let (in_offsets, in_sources) = compress(incoming);

        GraphView {
            node_count,
            index_to_node,
            node_to_index,
            out_offsets,
            out_targets,
            in_offsets,
            in_sources,
        }
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.node_to_index.get(&id).copied()
    }

    pub fn node_at(&self, idx: usize) -> NodeId {
        self.index_to_node[idx]
    }

    pub fn edge_count(&self) -> usize {
        self.out_targets.len()
    }

    pub fn out_degree(&self, idx: usize) -> usize {
        self.out_offsets[idx + 1] - self.out_offsets[idx]
    }

    pub fn in_degree(&self, idx: usize) -> usize {
        self.in_offsets[idx + 1] - self.in_offsets[idx]
    }

    pub fn successors(&self, idx: usize) -> &[usize] {
        &self.out_targets[self.out_offsets[idx]..self.out_offsets[idx + 1]]
    }

    pub fn predecessors(&self, idx: usize) -> &[usize] {
        &self.in_sources[self.in_offsets[idx]..self.in_offsets[idx + 1]]
    }

    /// Successors then predecessors, ignoring direction
    pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.successors(idx)
            .iter()
            .chain(self.predecessors(idx))
            .copied()
    }
}

/// Flatten rows into (offsets, values)
fn compress(rows: Vec<Vec<usize>>) -> (Vec<usize>, Vec<usize>) {
    let mut offsets = Vec::with_capacity(rows.len() + 1);
    let mut values = Vec::new();
    offsets.push(0);
    for row in rows {
        values.extend(row);
        offsets.push(values.len());
    }
    (offsets, values)
}
