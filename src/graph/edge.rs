//! Edge implementation for the Extended Matrix graph
//!
//! Edges are directed and typed. The type key is validated against an
//! [`EdgeTypeRegistry`] once, at construction; label and description are
//! copied from the registry at that moment and never refreshed.

use super::edge_types::EdgeTypeRegistry;
use super::property::{PropertyMap, PropertyValue};
use super::store::{GraphError, GraphResult};
use super::types::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

/// A directed, typed connection between two node ids
///
/// Endpoints are ids, not references: either may be absent from the owning
/// graph.
#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    edge_id: EdgeId,
    edge_source: NodeId,
    edge_target: NodeId,
    edge_type: String,
    label: String,
    description: String,
    attributes: PropertyMap,
}

/// Flat interchange record consumed by importers and exporters
///
/// Field names are part of the compatibility surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub edge_id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: String,
    pub label: String,
    pub description: String,
}

impl Edge {
    /// Create an edge validated against the built-in registry
    pub fn new(
        edge_id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        edge_type: &str,
    ) -> GraphResult<Self> {
        Self::with_registry(edge_id, source, target, edge_type, EdgeTypeRegistry::builtin())
    }

    /// Create an edge validated against a caller-supplied registry
    pub fn with_registry(
        edge_id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        edge_type: &str,
        registry: &EdgeTypeRegistry,
    ) -> GraphResult<Self> {
        let info = registry
            .lookup(edge_type)
            .ok_or_else(|| GraphError::InvalidEdgeType(edge_type.to_string()))?;

        Ok(Edge {
            edge_id: edge_id.into(),
            edge_source: source.into(),
            edge_target: target.into(),
            edge_type: edge_type.to_string(),
            label: info.label.clone(),
            description: info.description.clone(),
            attributes: PropertyMap::new(),
        })
    }

    pub fn edge_id(&self) -> &EdgeId {
        &self.edge_id
    }

    pub fn source(&self) -> &NodeId {
        &self.edge_source
    }

    pub fn target(&self) -> &NodeId {
        &self.edge_target
    }

    pub fn edge_type(&self) -> &str {
        &self.edge_type
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn attributes(&self) -> &PropertyMap {
        &self.attributes
    }

    /// Canonical flat record `{edge_id, source, target, type, label, description}`
    pub fn to_record(&self) -> EdgeRecord {
        EdgeRecord {
            edge_id: self.edge_id.as_str().to_string(),
            source: self.edge_source.as_str().to_string(),
            target: self.edge_target.as_str().to_string(),
            edge_type: self.edge_type.clone(),
            label: self.label.clone(),
            description: self.description.clone(),
        }
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

    /// Check if this edge connects two specific nodes (in either direction)
    pub fn connects(&self, node1: &NodeId, node2: &NodeId) -> bool {
        (&self.edge_source == node1 && &self.edge_target == node2)
            || (&self.edge_source == node2 && &self.edge_target == node1)
    }

    /// Check if this edge goes FROM a specific node
    pub fn starts_from(&self, node: &NodeId) -> bool {
        &self.edge_source == node
    }

    /// Check if this edge goes TO a specific node
    pub fn ends_at(&self, node: &NodeId) -> bool {
        &self.edge_target == node
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.edge_id == other.edge_id
    }
}

impl Eq for Edge {}

impl std::hash::Hash for Edge {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.edge_id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_edge() {
        let edge = Edge::new("e1", "n1", "n2", "is_before").unwrap();

        assert_eq!(edge.edge_id().as_str(), "e1");
        assert_eq!(edge.source().as_str(), "n1");
        assert_eq!(edge.target().as_str(), "n2");
        assert_eq!(edge.edge_type(), "is_before");
        assert_eq!(edge.label(), "Chronological Sequence");
    }

    #[test]
    fn test_invalid_edge_type() {
        let result = Edge::new("e2", "n1", "n2", "bogus_type");
        assert_eq!(
            result.unwrap_err(),
            GraphError::InvalidEdgeType("bogus_type".to_string())
        );
    }

    #[test]
    fn test_every_registry_key_is_accepted() {
        let registry = EdgeTypeRegistry::builtin();
        for (key, info) in registry.iter() {
            let edge = Edge::new("e", "a", "b", key).unwrap();
            assert_eq!(edge.label(), info.label);
            assert_eq!(edge.description(), info.description);
        }
    }

    #[test]
    fn test_label_is_a_snapshot() {
        let mut registry = EdgeTypeRegistry::builtin().clone();
        let edge = Edge::with_registry("e1", "n1", "n2", "is_before", &registry).unwrap();

        registry.define("is_before", "Renamed", "Redefined after construction");

        assert_eq!(edge.label(), "Chronological Sequence");
        assert_ne!(edge.description(), "Redefined after construction");

        let later = Edge::with_registry("e2", "n1", "n2", "is_before", &registry).unwrap();
        assert_eq!(later.label(), "Renamed");
    }

    #[test]
    fn test_custom_registry_rejects_builtin_keys_it_lacks() {
        let mut registry = EdgeTypeRegistry::empty();
        registry.define("cites", "Cites", "Bibliographic link");

        assert!(Edge::with_registry("e1", "a", "b", "cites", &registry).is_ok());
        assert!(matches!(
            Edge::with_registry("e2", "a", "b", "is_before", &registry),
            Err(GraphError::InvalidEdgeType(_))
        ));
    }

    #[test]
    fn test_edge_direction() {
        let edge = Edge::new("e2", "n10", "n20", "has_property").unwrap();

        assert!(edge.starts_from(&NodeId::new("n10")));
        assert!(edge.ends_at(&NodeId::new("n20")));
        assert!(!edge.starts_from(&NodeId::new("n20")));
        assert!(!edge.ends_at(&NodeId::new("n10")));

        assert!(edge.connects(&NodeId::new("n10"), &NodeId::new("n20")));
        assert!(edge.connects(&NodeId::new("n20"), &NodeId::new("n10")));
        assert!(!edge.connects(&NodeId::new("n10"), &NodeId::new("n30")));
    }

    #[test]
    fn test_edge_attributes() {
        let mut edge = Edge::new("e3", "n1", "n2", "generic_connection").unwrap();

        edge.set_attribute("weight", 2i64);
        edge.set_attribute("verified", true);

        assert_eq!(edge.get_attribute("weight").unwrap().as_integer(), Some(2));
        assert_eq!(edge.get_attribute("verified").unwrap().as_boolean(), Some(true));
        assert_eq!(edge.attributes().len(), 2);

        let removed = edge.remove_attribute("weight");
        assert!(removed.is_some());
        assert_eq!(edge.attributes().len(), 1);
    }

    #[test]
    fn test_record_field_names() {
        let edge = Edge::new("e1", "n1", "n2", "is_before").unwrap();
        let record = edge.to_record();
        assert_eq!(record.edge_type, "is_before");

        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(|k| k.as_str()).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["description", "edge_id", "label", "source", "target", "type"]
        );
        assert_eq!(obj["type"], "is_before");
        assert_eq!(obj["source"], "n1");
        assert_eq!(obj["label"], "Chronological Sequence");
    }

    #[test]
    fn test_multiple_edges_between_nodes() {
        let edge1 = Edge::new("e1", "n1", "n2", "is_before").unwrap();
        let edge2 = Edge::new("e2", "n1", "n2", "has_data_provenance").unwrap();

        assert_ne!(edge1, edge2);
        assert!(edge1.connects(&NodeId::new("n1"), &NodeId::new("n2")));
        assert!(edge2.connects(&NodeId::new("n1"), &NodeId::new("n2")));
    }
}
