//! Core type definitions for the graph engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a node, unique within its owning structure.
///
/// Ids are handed out monotonically and never reused, so a stale id can
/// only ever resolve to "not found", never to a different node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn new(id: u64) -> Self {
        NodeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId(id)
    }
}

/// Process-unique identity of a graph structure.
///
/// Nodes hold one of these as their non-owning back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct StructureId(pub u64);

impl StructureId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StructureId({})", self.0)
    }
}

/// Structural discipline a graph follows.
///
/// The control layer uses this as the structural context when deciding
/// which rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureKind {
    /// Unconstrained adjacency
    Generic,
    /// Acyclic chain backing list values
    Sequential,
    /// Root hub with one child per key, backing hash values
    Keyed,
    /// Strict binary hierarchy backing search-tree values
    Tree,
}

impl StructureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StructureKind::Generic => "generic",
            StructureKind::Sequential => "sequential",
            StructureKind::Keyed => "keyed",
            StructureKind::Tree => "tree",
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
