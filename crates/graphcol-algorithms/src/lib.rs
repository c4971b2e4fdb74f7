//! Topology algorithms for graphcol structures
//!
//! Algorithms run over a dense, read-only [`GraphView`] so they stay
//! independent of how the engine stores node values and edge metadata.

pub mod common;
pub mod community;
pub mod pathfinding;

pub use common::{GraphView, NodeId};
pub use community::{connected_components, ComponentsResult};
pub use pathfinding::{bfs, PathResult};
