//! Closed sum over the three structural disciplines

use super::keyed::KeyedGraph;
use super::sequential::SequentialGraph;
use super::store::GraphStructure;
use super::tree::TreeGraph;
use super::types::StructureKind;

/// Borrowed view of any specialized graph
#[derive(Debug, Clone, Copy)]
pub enum GraphRef<'a> {
    Sequential(&'a SequentialGraph),
    Keyed(&'a KeyedGraph),
    Tree(&'a TreeGraph),
}

impl<'a> GraphRef<'a> {
    /// Underlying node/edge structure
    pub fn base(&self) -> &'a GraphStructure {
        match self {
            GraphRef::Sequential(seq) => seq.graph(),
            GraphRef::Keyed(map) => map.graph(),
            GraphRef::Tree(tree) => tree.graph(),
        }
    }

    pub fn kind(&self) -> StructureKind {
        match self {
            GraphRef::Sequential(_) => StructureKind::Sequential,
            GraphRef::Keyed(_) => StructureKind::Keyed,
            GraphRef::Tree(_) => StructureKind::Tree,
        }
    }

    /// Number of elements, as opposed to nodes (a keyed graph has an extra
    /// root node)
    pub fn element_count(&self) -> usize {
        match self {
            GraphRef::Sequential(seq) => seq.len(),
            GraphRef::Keyed(map) => map.len(),
            GraphRef::Tree(tree) => tree.len(),
        }
    }

    /// Check the discipline-specific invariant
    pub fn is_consistent(&self) -> bool {
        match self {
            GraphRef::Sequential(seq) => seq.is_consistent(),
            GraphRef::Keyed(map) => map.is_consistent(),
            GraphRef::Tree(tree) => tree.is_valid_search_tree() && tree.len() == tree.graph().node_count(),
        }
    }
}

impl<'a> From<&'a SequentialGraph> for GraphRef<'a> {
    fn from(seq: &'a SequentialGraph) -> Self {
        GraphRef::Sequential(seq)
    }
}

impl<'a> From<&'a KeyedGraph> for GraphRef<'a> {
    fn from(map: &'a KeyedGraph) -> Self {
        GraphRef::Keyed(map)
    }
}

impl<'a> From<&'a TreeGraph> for GraphRef<'a> {
    fn from(tree: &'a TreeGraph) -> Self {
        GraphRef::Tree(tree)
    }
}
