//! Extended Matrix graph model
//!
//! This module implements the typed stratigraphic/paradata graph with:
//! - A closed vocabulary of edge types validated at edge construction
//! - One node type discriminated by `node_type`, with typed payloads
//! - An insertion-ordered graph container with indexed id lookup
//! - JSON snapshots that re-validate on load

pub mod edge;
pub mod edge_types;
pub mod node;
pub mod property;
pub mod snapshot;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::{Edge, EdgeRecord};
pub use edge_types::{EdgeTypeInfo, EdgeTypeRegistry};
pub use node::{Node, NodePayload, VisualAttributes};
pub use property::{PropertyMap, PropertyValue};
pub use snapshot::{EdgeSnapshot, GraphSnapshot, SnapshotError, SnapshotResult};
pub use store::{EntityKind, Graph, GraphError, GraphResult, GraphStatistics, GRAPH_CODE_ATTRIBUTE};
pub use types::{EdgeId, GraphId, NodeId, NodeType};
