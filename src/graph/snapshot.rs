//! Serializable snapshot of a graph
//!
//! Loading a snapshot rebuilds the graph through `add_node` / `add_edge`, so
//! every invariant (unique ids, known edge types) is checked again. Stored
//! edge labels are informational: they are re-read from the registry.

use super::edge::EdgeRecord;
use super::edge_types::EdgeTypeRegistry;
use super::node::Node;
use super::property::PropertyMap;
use super::store::{Graph, GraphError, GraphResult};
use super::types::GraphId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Snapshot errors
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// JSON encoding or decoding failed
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot content violates a graph invariant
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Edge interchange record plus its attribute bag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    #[serde(flatten)]
    pub record: EdgeRecord,
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    pub attributes: PropertyMap,
}

/// Plain-data form of a [`Graph`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub graph_id: GraphId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attributes: PropertyMap,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<EdgeSnapshot>,
}

impl Graph {
    /// Capture the graph as plain data, preserving insertion order
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            graph_id: self.graph_id().clone(),
            name: self.name().to_string(),
            description: self.description().to_string(),
            attributes: self.attributes().clone(),
            nodes: self.nodes().cloned().collect(),
            edges: self
                .edges()
                .map(|e| EdgeSnapshot {
                    record: e.to_record(),
                    attributes: e.attributes().clone(),
                })
                .collect(),
        }
    }

    /// Rebuild a graph, validating edge types against the built-in registry
    pub fn from_snapshot(snapshot: GraphSnapshot) -> GraphResult<Graph> {
        Self::from_snapshot_with_registry(snapshot, EdgeTypeRegistry::builtin())
    }

    /// Rebuild a graph, validating edge types against `registry`
    pub fn from_snapshot_with_registry(snapshot: GraphSnapshot, registry: &EdgeTypeRegistry) -> GraphResult<Graph> {
        let mut graph = Graph::new(snapshot.graph_id)
            .with_name(snapshot.name)
            .with_description(snapshot.description);

        for (key, value) in snapshot.attributes {
            graph.set_attribute(key, value);
        }
        for node in snapshot.nodes {
            graph.add_node(node)?;
        }
        for EdgeSnapshot { record, attributes } in snapshot.edges {
            graph.add_edge_with_registry(
                record.edge_id.as_str(),
                record.source.as_str(),
                record.target.as_str(),
                &record.edge_type,
                registry,
            )?;
            if let Some(edge) = graph.find_edge_mut(&record.edge_id) {
                for (key, value) in attributes {
                    edge.set_attribute(key, value);
                }
            }
        }

        debug!(
            "Loaded graph {} from snapshot ({} nodes, {} edges)",
            graph.graph_id(),
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> SnapshotResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_snapshot())?)
    }

    /// Parse JSON produced by [`Graph::to_json`]
    pub fn from_json(json: &str) -> SnapshotResult<Graph> {
        let snapshot: GraphSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeType;

    fn build() -> Graph {
        let mut graph = Graph::new("G1").with_name("Test graph");
        graph.set_graph_code("GT16");
        graph.add_node(Node::stratigraphic("n1", "US10")).unwrap();
        graph.add_node(Node::document("d1", "D.01", "http://x")).unwrap();
        graph.add_node(Node::epoch("ep1", "Roman", -27.0, 476.0)).unwrap();
        graph.add_edge("e1", "n1", "d1", "has_data_provenance").unwrap();
        graph.add_edge("e2", "n1", "ep1", "has_first_epoch").unwrap();
        graph
            .find_edge_mut("e1")
            .unwrap()
            .set_attribute("certainty", "low");
        graph
    }

    #[test]
    fn test_json_round_trip() {
        let graph = build();
        let json = graph.to_json().unwrap();
        let loaded = Graph::from_json(&json).unwrap();

        assert_eq!(loaded.graph_id().as_str(), "G1");
        assert_eq!(loaded.name(), "Test graph");
        assert_eq!(loaded.graph_code(), Some("GT16"));

        let ids: Vec<&str> = loaded.nodes().map(|n| n.id().as_str()).collect();
        assert_eq!(ids, vec!["n1", "d1", "ep1"]);

        let doc = loaded.find_node_by_id("d1").unwrap();
        assert!(doc.is_type(NodeType::DOCUMENT));
        assert_eq!(doc.url(), Some("http://x"));
        assert_eq!(
            loaded.find_node_by_id("ep1").unwrap().epoch_span(),
            Some((-27.0, 476.0))
        );

        let edge = loaded.find_edge_by_id("e1").unwrap();
        assert_eq!(edge.label(), "Data Provenance");
        assert_eq!(edge.get_attribute("certainty").unwrap().as_string(), Some("low"));
        assert_eq!(loaded.edge_count(), 2);
    }

    #[test]
    fn test_edges_serialize_with_interchange_names() {
        let json = build().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &value["edges"][0];
        assert_eq!(first["edge_id"], "e1");
        assert_eq!(first["type"], "has_data_provenance");
        assert_eq!(first["source"], "n1");
        assert_eq!(first["target"], "d1");
        assert_eq!(first["attributes"]["certainty"], "low");
        // Edges without attributes omit the field
        assert!(value["edges"][1].get("attributes").is_none());
    }

    #[test]
    fn test_unknown_edge_type_rejected_on_load() {
        let json = r#"{
            "graph_id": "G1",
            "edges": [{"edge_id": "e1", "source": "a", "target": "b",
                       "type": "bogus_type", "label": "", "description": ""}]
        }"#;
        let err = Graph::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::Graph(GraphError::InvalidEdgeType(ref t)) if t == "bogus_type"
        ));
    }

    #[test]
    fn test_duplicate_node_rejected_on_load() {
        let mut snapshot = build().to_snapshot();
        snapshot.nodes.push(Node::stratigraphic("n1", "again"));
        let result = Graph::from_snapshot(snapshot);
        assert!(matches!(result, Err(GraphError::DuplicateId { .. })));
    }

    #[test]
    fn test_stale_label_is_refreshed_from_registry() {
        let mut snapshot = build().to_snapshot();
        snapshot.edges[0].record.label = "Outdated".to_string();
        let graph = Graph::from_snapshot(snapshot).unwrap();
        assert_eq!(graph.find_edge_by_id("e1").unwrap().label(), "Data Provenance");
    }

    #[test]
    fn test_non_finite_values_round_trip() {
        let mut graph = Graph::new("G1");
        graph.add_node(Node::epoch("ep1", "Undated", f64::NAN, f64::NAN)).unwrap();
        graph.add_node(Node::property("p1", "height", f64::NAN)).unwrap();

        let loaded = Graph::from_json(&graph.to_json().unwrap()).unwrap();
        let (start, end) = loaded.find_node_by_id("ep1").unwrap().epoch_span().unwrap();
        assert!(start.is_nan() && end.is_nan());
        assert_eq!(
            loaded.find_node_by_id("p1").unwrap().property_value(),
            graph.find_node_by_id("p1").unwrap().property_value()
        );
    }

    #[test]
    fn test_malformed_json() {
        let err = Graph::from_json("{not json").unwrap_err();
        assert!(matches!(err, SnapshotError::Json(_)));
    }
}
