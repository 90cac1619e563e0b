//! In-memory graph container
//!
//! Nodes and edges live in insertion-ordered maps keyed by id, giving both
//! deterministic listing and constant-time lookup. Edges reference nodes by
//! id only; removing a node never cascades to its edges.

use super::edge::Edge;
use super::edge_types::EdgeTypeRegistry;
use super::node::Node;
use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeId, GraphId, NodeId, NodeType};
use indexmap::{IndexMap, IndexSet};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

/// Attribute key holding the short code that disambiguates graphs
pub const GRAPH_CODE_ATTRIBUTE: &str = "graph_code";

/// Kind of entity an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Node,
    Edge,
    Graph,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Node => write!(f, "Node"),
            EntityKind::Edge => write!(f, "Edge"),
            EntityKind::Graph => write!(f, "Graph"),
        }
    }
}

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Invalid edge type: {0}")]
    InvalidEdgeType(String),

    #[error("{kind} {id} already exists")]
    DuplicateId { kind: EntityKind, id: String },

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },

    #[error("Graph {0} is active and cannot be unregistered")]
    ActiveGraph(GraphId),

    #[error("Graph limit reached ({limit})")]
    QuotaExceeded { limit: usize },
}

impl GraphError {
    pub(crate) fn duplicate(kind: EntityKind, id: impl fmt::Display) -> Self {
        GraphError::DuplicateId {
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn not_found(kind: EntityKind, id: impl fmt::Display) -> Self {
        GraphError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Summary counts for a graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphStatistics {
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes_by_type: BTreeMap<String, usize>,
    pub edges_by_type: BTreeMap<String, usize>,
    pub dangling_edge_count: usize,
    /// Documents, properties, extractors and combiners
    pub paradata_node_count: usize,
}

/// One logical Extended Matrix graph
///
/// Uses insertion-ordered hash maps:
/// - nodes: NodeId -> Node
/// - edges: EdgeId -> Edge
#[derive(Debug, Clone)]
pub struct Graph {
    graph_id: GraphId,
    name: String,
    description: String,
    nodes: IndexMap<NodeId, Node>,
    edges: IndexMap<EdgeId, Edge>,
    attributes: PropertyMap,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(graph_id: impl Into<GraphId>) -> Self {
        Graph {
            graph_id: graph_id.into(),
            name: String::new(),
            description: String::new(),
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            attributes: PropertyMap::new(),
        }
    }

    /// Builder-style name setter
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder-style description setter
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn graph_id(&self) -> &GraphId {
        &self.graph_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn set_graph_id(&mut self, graph_id: GraphId) {
        self.graph_id = graph_id;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Add a node; fails if the id is taken
    pub fn add_node(&mut self, node: Node) -> GraphResult<()> {
        if self.nodes.contains_key(node.id()) {
            debug!("Rejected duplicate node {} in graph {}", node.id(), self.graph_id);
            return Err(GraphError::duplicate(EntityKind::Node, node.id()));
        }
        trace!("Adding node {} ({}) to graph {}", node.id(), node.node_type(), self.graph_id);
        self.nodes.insert(node.id().clone(), node);
        Ok(())
    }

    /// Create and add an edge validated against the built-in registry
    ///
    /// Endpoints need not exist yet.
    pub fn add_edge(
        &mut self,
        edge_id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        edge_type: &str,
    ) -> GraphResult<&Edge> {
        let edge = Edge::new(edge_id, source, target, edge_type)?;
        self.insert_edge(edge)
    }

    /// Create and add an edge validated against a custom registry
    pub fn add_edge_with_registry(
        &mut self,
        edge_id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        edge_type: &str,
        registry: &EdgeTypeRegistry,
    ) -> GraphResult<&Edge> {
        let edge = Edge::with_registry(edge_id, source, target, edge_type, registry)?;
        self.insert_edge(edge)
    }

    /// Add an already constructed edge; fails if the id is taken
    pub fn insert_edge(&mut self, edge: Edge) -> GraphResult<&Edge> {
        if self.edges.contains_key(edge.edge_id()) {
            debug!("Rejected duplicate edge {} in graph {}", edge.edge_id(), self.graph_id);
            return Err(GraphError::duplicate(EntityKind::Edge, edge.edge_id()));
        }
        trace!(
            "Adding edge {} ({} -[{}]-> {}) to graph {}",
            edge.edge_id(),
            edge.source(),
            edge.edge_type(),
            edge.target(),
            self.graph_id
        );
        let (index, _) = self.edges.insert_full(edge.edge_id().clone(), edge);
        Ok(&self.edges[index])
    }

    /// Get a node by ID
    pub fn find_node_by_id(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Get a mutable node by ID
    pub fn find_node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// First node (in insertion order) with the given display name
    pub fn find_node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.values().find(|n| n.name() == name)
    }

    /// Get an edge by ID
    pub fn find_edge_by_id(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Get a mutable edge by ID (only attributes are mutable)
    pub fn find_edge_mut(&mut self, id: &str) -> Option<&mut Edge> {
        self.edges.get_mut(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    /// Remove a node; edges referencing it are left in place
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let removed = self.nodes.shift_remove(id);
        if removed.is_some() {
            trace!("Removed node {} from graph {}", id, self.graph_id);
        }
        removed
    }

    /// Remove an edge
    pub fn remove_edge(&mut self, id: &str) -> Option<Edge> {
        let removed = self.edges.shift_remove(id);
        if removed.is_some() {
            trace!("Removed edge {} from graph {}", id, self.graph_id);
        }
        removed
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Nodes with the given type tag, in insertion order
    pub fn nodes_of_type<'a>(&'a self, node_type: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.values().filter(move |n| n.is_type(node_type))
    }

    /// Edges with the given type key, in insertion order
    pub fn edges_by_type<'a>(&'a self, edge_type: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.values().filter(move |e| e.edge_type() == edge_type)
    }

    /// Edges leaving a node
    pub fn outgoing_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges
            .values()
            .filter(move |e| e.source().as_str() == node_id)
    }

    /// Edges entering a node
    pub fn incoming_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges
            .values()
            .filter(move |e| e.target().as_str() == node_id)
    }

    /// Nodes adjacent to `node_id` in either direction
    ///
    /// Outgoing targets come first, then incoming sources; duplicates and
    /// dangling endpoints are skipped.
    pub fn neighbors(&self, node_id: &str) -> Vec<&Node> {
        let ids: IndexSet<&NodeId> = self
            .outgoing_edges(node_id)
            .map(|e| e.target())
            .chain(self.incoming_edges(node_id).map(|e| e.source()))
            .collect();
        ids.into_iter()
            .filter_map(|id| self.nodes.get(id))
            .collect()
    }

    /// Edges whose source or target is not in this graph
    pub fn dangling_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values().filter(move |e| {
            !self.nodes.contains_key(e.source()) || !self.nodes.contains_key(e.target())
        })
    }

    /// Targets of `edge_type` edges leaving `node_id` that carry the given node type
    fn targets_of_type<'s: 'a, 'a>(
        &'s self,
        node_id: &'a str,
        edge_type: &'a str,
        node_type: &'a str,
    ) -> impl Iterator<Item = &'s Node> + 'a {
        self.outgoing_edges(node_id)
            .filter(move |e| e.edge_type() == edge_type)
            .filter_map(move |e| self.nodes.get(e.target()))
            .filter(move |n| n.is_type(node_type))
    }

    /// Epochs a stratigraphic node belongs to: its first epoch, then the epochs it survives in
    pub fn epochs_of(&self, node_id: &str) -> Vec<&Node> {
        let epochs: IndexSet<&NodeId> = self
            .targets_of_type(node_id, "has_first_epoch", NodeType::EPOCH)
            .chain(self.targets_of_type(node_id, "survive_in_epoch", NodeType::EPOCH))
            .map(|n| n.id())
            .collect();
        epochs
            .into_iter()
            .filter_map(|id| self.nodes.get(id))
            .collect()
    }

    /// Property nodes attached to a node through `has_property`
    pub fn properties_of(&self, node_id: &str) -> Vec<&Node> {
        self.targets_of_type(node_id, "has_property", NodeType::PROPERTY)
            .collect()
    }

    /// Documents backing a node's properties
    ///
    /// Follows `has_property` to property nodes, then `extracted_from` from
    /// those properties (directly or through an extractor) to documents.
    pub fn documents_of(&self, node_id: &str) -> Vec<&Node> {
        let mut documents: IndexSet<&NodeId> = IndexSet::new();
        for property in self.properties_of(node_id) {
            let pid = property.id().as_str();
            for doc in self.targets_of_type(pid, "extracted_from", NodeType::DOCUMENT) {
                documents.insert(doc.id());
            }
            for extractor in self.targets_of_type(pid, "extracted_from", NodeType::EXTRACTOR) {
                let eid = extractor.id().as_str();
                for doc in self.targets_of_type(eid, "extracted_from", NodeType::DOCUMENT) {
                    documents.insert(doc.id());
                }
            }
        }
        documents
            .into_iter()
            .filter_map(|id| self.nodes.get(id))
            .collect()
    }

    /// Get number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Remove all nodes and edges; attributes are kept
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    pub fn attributes(&self) -> &PropertyMap {
        &self.attributes
    }

    /// Set an attribute value
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Option<PropertyValue> {
        self.attributes.insert(key.into(), value.into())
    }

    /// Get an attribute value
    pub fn get_attribute(&self, key: &str) -> Option<&PropertyValue> {
        self.attributes.get(key)
    }

    /// Remove an attribute
    pub fn remove_attribute(&mut self, key: &str) -> Option<PropertyValue> {
        self.attributes.shift_remove(key)
    }

    /// Short code identifying this graph in multigraph mode
    pub fn graph_code(&self) -> Option<&str> {
        self.get_attribute(GRAPH_CODE_ATTRIBUTE)
            .and_then(|v| v.as_string())
    }

    pub fn set_graph_code(&mut self, code: impl Into<String>) {
        let code: String = code.into();
        self.set_attribute(GRAPH_CODE_ATTRIBUTE, code);
    }

    /// Compute summary counts
    pub fn statistics(&self) -> GraphStatistics {
        let mut stats = GraphStatistics {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            dangling_edge_count: self.dangling_edges().count(),
            ..Default::default()
        };
        for node in self.nodes.values() {
            if node.node_type().is_paradata() {
                stats.paradata_node_count += 1;
            }
            *stats
                .nodes_by_type
                .entry(node.node_type().as_str().to_string())
                .or_insert(0) += 1;
        }
        for edge in self.edges.values() {
            *stats
                .edges_by_type
                .entry(edge.edge_type().to_string())
                .or_insert(0) += 1;
        }
        stats
    }
}
