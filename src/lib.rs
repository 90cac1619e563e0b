//! s3dgraphy
//!
//! The Extended Matrix graph model: typed stratigraphic and paradata graphs,
//! several of which can be loaded at once and addressed by id.
//!
//! # Model
//!
//! - Edge types form a closed vocabulary ([`EdgeTypeRegistry`]); an edge with
//!   an unknown type cannot be constructed.
//! - Nodes are one type discriminated by `node_type`, with an optional typed
//!   payload (document, epoch, property, link).
//! - A [`Graph`] owns its nodes and edges. Edges refer to nodes by id and may
//!   dangle; removing a node never removes its edges.
//! - A [`MultiGraphManager`] maps graph ids to graphs and tracks the active
//!   one. Wrap it in a [`SharedMultiGraph`] to use it from several threads.
//!
//! ## Example Usage
//!
//! ```rust
//! use s3dgraphy::{Graph, GraphError, MultiGraphManager, Node};
//!
//! let mut graph = Graph::new("G1");
//! graph.add_node(Node::stratigraphic("n1", "US10")).unwrap();
//! graph.add_node(Node::stratigraphic("n2", "US11")).unwrap();
//!
//! let edge = graph.add_edge("e1", "n1", "n2", "is_before").unwrap();
//! assert_eq!(edge.label(), "Chronological Sequence");
//!
//! let bogus = graph.add_edge("e2", "n1", "n2", "bogus_type");
//! assert!(matches!(bogus, Err(GraphError::InvalidEdgeType(_))));
//!
//! let mut manager = MultiGraphManager::new();
//! manager.register("G1", graph).unwrap();
//! manager.set_active("G1").unwrap();
//! assert_eq!(manager.get_active().unwrap().edge_count(), 1);
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod graph;
pub mod multigraph;

// Re-export main types for convenience
pub use graph::{
    Edge, EdgeId, EdgeRecord, EdgeTypeInfo, EdgeTypeRegistry, EntityKind, Graph, GraphError,
    GraphId, GraphResult, GraphSnapshot, GraphStatistics, Node, NodeId, NodePayload, NodeType,
    PropertyMap, PropertyValue, SnapshotError, VisualAttributes,
};

pub use multigraph::{MultiGraphManager, NodeRef, SharedMultiGraph};

pub use config::{ConfigError, ConfigResult, MultiGraphConfig, UnregisterActivePolicy};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
