//! Graph engine behind the collection values
//!
//! This module implements the node/edge model with:
//! - Nodes owned by exactly one structure, edges stored as adjacency entries
//! - A per-structure control layer that validates every new edge
//! - Three structural disciplines: sequential chains, keyed hubs and
//!   binary search trees

pub mod any;
pub mod control;
pub mod edge;
pub mod keyed;
pub mod metadata;
pub mod node;
pub mod render;
pub mod sequential;
pub mod store;
pub mod tree;
pub mod types;

// Re-export main types
pub use any::GraphRef;
pub use control::{
    ControlLayer, Rule, RuleContext, RuleOrigin, RuleStatus, RuleVerdict, RuleViolation,
    HIERARCHY_ONLY, MAX_TWO_CHILDREN, NO_BACKWARD_EDGES, NO_CYCLES_STRICT, SAME_STRUCTURE_ONLY,
    SINGLE_PARENT,
};
pub use edge::{EdgeKind, EdgeMetadata, LEFT, RIGHT};
pub use keyed::KeyedGraph;
pub use metadata::MetadataLayer;
pub use node::Node;
pub use render::{GraphSummary, VisualFormat};
pub use sequential::SequentialGraph;
pub use store::{ErrorKind, GraphError, GraphResult, GraphStructure};
pub use tree::TreeGraph;
pub use types::{NodeId, StructureId, StructureKind};
