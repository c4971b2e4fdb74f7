//! graphcol: graph-backed collections
//!
//! The collection engine of an interpreted language. Every list, hash and
//! search-tree value is stored as a small graph of value-bearing nodes, and
//! every new edge is checked by a per-structure rule engine before it is
//! written.
//!
//! # Layers
//!
//! - [`graph`]: nodes, edges, the control layer and the three structural
//!   disciplines (sequential chain, keyed hub, binary search tree)
//! - [`algo`]: shortest path and connected components over a CSR view
//! - [`value`]: runtime values
//! - [`collections`]: container values with type constraints, freezing and
//!   governance introspection
//! - [`config`]: display and visualization settings
//!
//! ## Example Usage
//!
//! ```rust
//! use graphcol::collections::{Governed, ListValue};
//! use graphcol::graph::NO_BACKWARD_EDGES;
//!
//! let mut list = ListValue::from_values([1, 2, 3]).unwrap();
//! assert_eq!(list.get(-1).unwrap().to_string(), "3");
//! assert_eq!(list.to_display_string(), "[1, 2, 3]");
//!
//! // Governance is per value
//! list.disable_rule(NO_BACKWARD_EDGES).unwrap();
//! assert!(!list.get_active_rules().contains(&NO_BACKWARD_EDGES.to_string()));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod collections;
pub mod config;
pub mod graph;
pub mod value;

// Re-export main types for convenience
pub use graph::{
    ControlLayer, EdgeKind, EdgeMetadata, ErrorKind, GraphError, GraphRef, GraphResult,
    GraphStructure, GraphSummary, KeyedGraph, Node, NodeId, Rule, RuleVerdict, SequentialGraph,
    StructureKind, TreeGraph, VisualFormat,
};

pub use collections::{
    CollectionError, CollectionResult, ContainerKind, Governed, HashValue, ListValue, TreeValue,
};

pub use config::{ConfigError, DisplayConfig, EngineConfig, VisualizeConfig};

pub use value::{TypeTag, Value};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
