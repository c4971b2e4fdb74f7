//! Edge metadata
//!
//! Edges are not owned objects: an edge is an entry in the source node's
//! outgoing map and the target node's incoming map, both carrying the same
//! [`EdgeMetadata`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label of a left child edge in a tree structure
pub const LEFT: &str = "left";
/// Label of a right child edge in a tree structure
pub const RIGHT: &str = "right";

/// Role an edge plays in its structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum EdgeKind {
    /// Chain link, carrying the position of the source element
    Sequential(usize),
    /// Hub-to-value link, carrying the map key
    Keyed(String),
    /// Named relation such as a `left`/`right` tree slot
    Named(String),
    /// Plain typed relation with no structural meaning
    Typed(String),
}

/// Metadata attached to every edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeMetadata {
    pub kind: EdgeKind,
    pub weight: f64,
    /// Materialized as a mirrored edge in the opposite direction
    pub bidirectional: bool,
}

impl EdgeMetadata {
    pub fn new(kind: EdgeKind) -> Self {
        EdgeMetadata {
            kind,
            weight: 1.0,
            bidirectional: false,
        }
    }

    pub fn sequential(index: usize) -> Self {
        Self::new(EdgeKind::Sequential(index))
    }

    pub fn keyed(key: impl Into<String>) -> Self {
        Self::new(EdgeKind::Keyed(key.into()))
    }

    pub fn named(label: impl Into<String>) -> Self {
        Self::new(EdgeKind::Named(label.into()))
    }

    pub fn typed(label: impl Into<String>) -> Self {
        Self::new(EdgeKind::Typed(label.into()))
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn bidirectional(mut self) -> Self {
        self.bidirectional = true;
        self
    }

    /// Position carried by a sequential edge
    pub fn index(&self) -> Option<usize> {
        match self.kind {
            EdgeKind::Sequential(idx) => Some(idx),
            _ => None,
        }
    }

    /// Key carried by a keyed edge
    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            EdgeKind::Keyed(key) => Some(key),
            _ => None,
        }
    }

    /// Label of a named or typed edge
    pub fn label(&self) -> Option<&str> {
        match &self.kind {
            EdgeKind::Named(label) | EdgeKind::Typed(label) => Some(label),
            _ => None,
        }
    }

    /// True for a `left`/`right` named edge
    pub fn is_child_slot(&self) -> bool {
        matches!(&self.kind, EdgeKind::Named(label) if label == LEFT || label == RIGHT)
    }

    /// Short tag used by visualizations, e.g. `seq:0` or `key:name`
    pub fn tag(&self) -> String {
        match &self.kind {
            EdgeKind::Sequential(idx) => format!("seq:{}", idx),
            EdgeKind::Keyed(key) => format!("key:{}", key),
            EdgeKind::Named(label) => label.clone(),
            EdgeKind::Typed(label) => format!("type:{}", label),
        }
    }
}

impl fmt::Display for EdgeMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())?;
        if self.weight != 1.0 {
            write!(f, " (w={})", self.weight)?;
        }
        if self.bidirectional {
            write!(f, " <->")?;
        }
        Ok(())
    }
}
