//! Node implementation for the Extended Matrix graph
//!
//! A single node type covers every Extended Matrix vertex. The `node_type`
//! discriminator classifies it, and an optional typed payload carries the
//! fields that only some kinds have (document URL, epoch span, ...).

use super::property::{PropertyMap, PropertyValue};
use super::types::{NodeId, NodeType};
use serde::{Deserialize, Deserializer, Serialize};

/// Type-specific data carried by a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodePayload {
    /// No extra data
    #[default]
    Generic,

    /// Paradata source document
    Document {
        url: String,
        /// Auxiliary metadata such as `url_type`
        #[serde(default)]
        data: PropertyMap,
    },

    /// Temporal period; times are years (negative for BC)
    ///
    /// An unknown bound is NaN, written as JSON `null`.
    Epoch {
        #[serde(deserialize_with = "time_or_nan")]
        start_time: f64,
        #[serde(deserialize_with = "time_or_nan")]
        end_time: f64,
        #[serde(default)]
        color: Option<String>,
    },

    /// Interpreted property of a stratigraphic unit
    Property {
        value: PropertyValue,
        #[serde(default)]
        property_type: Option<String>,
    },

    /// External resource reference
    Link {
        url: String,
        #[serde(default)]
        url_type: Option<String>,
    },
}

fn time_or_nan<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl NodePayload {
    /// The node type a payload is bound to, if any
    pub fn required_type(&self) -> Option<&'static str> {
        match self {
            NodePayload::Generic => None,
            NodePayload::Document { .. } => Some(NodeType::DOCUMENT),
            NodePayload::Epoch { .. } => Some(NodeType::EPOCH),
            NodePayload::Property { .. } => Some(NodeType::PROPERTY),
            NodePayload::Link { .. } => Some(NodeType::LINK),
        }
    }
}

/// Placement hints consumed by the 3D visualization layer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisualAttributes {
    #[serde(default)]
    pub shape: Option<String>,
    #[serde(default)]
    pub y_position: Option<f64>,
    #[serde(default)]
    pub fill_color: Option<String>,
}

/// A vertex in an Extended Matrix graph
///
/// Nodes are exclusively owned by one [`Graph`](super::Graph); their id is
/// fixed at construction because the graph indexes them by it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "NodeRepr")]
pub struct Node {
    id: NodeId,
    name: String,
    description: String,
    node_type: NodeType,
    payload: NodePayload,
    has_continuity: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    visual: Option<VisualAttributes>,
    attributes: PropertyMap,
}

/// Unchecked wire form of [`Node`]
#[derive(Deserialize)]
struct NodeRepr {
    id: NodeId,
    name: String,
    #[serde(default)]
    description: String,
    node_type: NodeType,
    #[serde(default)]
    payload: NodePayload,
    #[serde(default)]
    has_continuity: bool,
    #[serde(default)]
    visual: Option<VisualAttributes>,
    #[serde(default)]
    attributes: PropertyMap,
}

impl TryFrom<NodeRepr> for Node {
    type Error = String;

    fn try_from(repr: NodeRepr) -> Result<Self, Self::Error> {
        if let Some(required) = repr.payload.required_type() {
            if !repr.node_type.is(required) {
                return Err(format!(
                    "node {}: {} payload requires node_type '{}', found '{}'",
                    repr.id, required, required, repr.node_type
                ));
            }
        }
        Ok(Node {
            id: repr.id,
            name: repr.name,
            description: repr.description,
            node_type: repr.node_type,
            payload: repr.payload,
            has_continuity: repr.has_continuity,
            visual: repr.visual,
            attributes: repr.attributes,
        })
    }
}

impl Node {
    /// Create a generic node. Empty names are accepted.
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, node_type: impl Into<NodeType>) -> Self {
        Node {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            node_type: node_type.into(),
            payload: NodePayload::Generic,
            has_continuity: false,
            visual: None,
            attributes: PropertyMap::new(),
        }
    }

    /// Builder-style description setter
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Create a stratigraphic unit node
    pub fn stratigraphic(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeType::STRATIGRAPHIC_UNIT)
    }

    /// Create a document node
    pub fn document(id: impl Into<NodeId>, name: impl Into<String>, url: impl Into<String>) -> Self {
        let mut node = Self::new(id, name, NodeType::DOCUMENT);
        node.payload = NodePayload::Document {
            url: url.into(),
            data: PropertyMap::new(),
        };
        node
    }

    /// Create an epoch node spanning `start_time..end_time`
    pub fn epoch(id: impl Into<NodeId>, name: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        let mut node = Self::new(id, name, NodeType::EPOCH);
        node.payload = NodePayload::Epoch {
            start_time,
            end_time,
            color: None,
        };
        node
    }

    /// Create a property node
    pub fn property(id: impl Into<NodeId>, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        let mut node = Self::new(id, name, NodeType::PROPERTY);
        node.payload = NodePayload::Property {
            value: value.into(),
            property_type: None,
        };
        node
    }

    /// Create a link node
    pub fn link(id: impl Into<NodeId>, name: impl Into<String>, url: impl Into<String>) -> Self {
        let mut node = Self::new(id, name, NodeType::LINK);
        node.payload = NodePayload::Link {
            url: url.into(),
            url_type: None,
        };
        node
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn node_type(&self) -> &NodeType {
        &self.node_type
    }

    pub fn payload(&self) -> &NodePayload {
        &self.payload
    }

    pub fn has_continuity(&self) -> bool {
        self.has_continuity
    }

    pub fn visual(&self) -> Option<&VisualAttributes> {
        self.visual.as_ref()
    }

    pub fn attributes(&self) -> &PropertyMap {
        &self.attributes
    }

    /// Check the node type tag
    pub fn is_type(&self, tag: &str) -> bool {
        self.node_type.is(tag)
    }

    pub fn is_document(&self) -> bool {
        matches!(self.payload, NodePayload::Document { .. })
    }

    /// URL of a document or link node
    pub fn url(&self) -> Option<&str> {
        match &self.payload {
            NodePayload::Document { url, .. } | NodePayload::Link { url, .. } => Some(url.as_str()),
            _ => None,
        }
    }

    /// Auxiliary metadata of a document node
    pub fn document_data(&self) -> Option<&PropertyMap> {
        match &self.payload {
            NodePayload::Document { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Mutable metadata of a document node
    pub fn document_data_mut(&mut self) -> Option<&mut PropertyMap> {
        match &mut self.payload {
            NodePayload::Document { data, .. } => Some(data),
            _ => None,
        }
    }

    /// `(start_time, end_time)` of an epoch node
    pub fn epoch_span(&self) -> Option<(f64, f64)> {
        match self.payload {
            NodePayload::Epoch {
                start_time,
                end_time,
                ..
            } => Some((start_time, end_time)),
            _ => None,
        }
    }

    /// Value of a property node
    pub fn property_value(&self) -> Option<&PropertyValue> {
        match &self.payload {
            NodePayload::Property { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_continuity(&mut self, has_continuity: bool) {
        self.has_continuity = has_continuity;
    }

    /// Replace the URL of a document or link node. Returns false for other kinds.
    pub fn set_url(&mut self, new_url: impl Into<String>) -> bool {
        match &mut self.payload {
            NodePayload::Document { url, .. } | NodePayload::Link { url, .. } => {
                *url = new_url.into();
                true
            }
            _ => false,
        }
    }

    pub fn set_visual(&mut self, visual: VisualAttributes) {
        self.visual = Some(visual);
    }

    /// Visual attributes, created empty on first access
    pub fn visual_mut(&mut self) -> &mut VisualAttributes {
        self.visual.get_or_insert_with(VisualAttributes::default)
    }

    pub fn clear_visual(&mut self) -> Option<VisualAttributes> {
        self.visual.take()
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

    /// Check if attribute exists
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_generic_node() {
        let node = Node::new("n1", "US10", NodeType::STRATIGRAPHIC_UNIT);
        assert_eq!(node.id().as_str(), "n1");
        assert_eq!(node.name(), "US10");
        assert_eq!(node.description(), "");
        assert!(node.is_type("US"));
        assert_eq!(node.payload(), &NodePayload::Generic);
        assert!(!node.has_continuity());
        assert!(node.visual().is_none());
    }

    #[test]
    fn test_empty_fields_accepted() {
        let node = Node::new("", "", "").with_description("");
        assert_eq!(node.name(), "");
        assert_eq!(node.node_type().as_str(), "");
    }

    #[test]
    fn test_document_node() {
        let mut node = Node::document("d1", "D.01", "https://example.org/report.pdf")
            .with_description("Excavation report");

        assert!(node.is_document());
        assert!(node.is_type(NodeType::DOCUMENT));
        assert_eq!(node.url(), Some("https://example.org/report.pdf"));
        assert!(node.document_data().unwrap().is_empty());

        node.document_data_mut()
            .unwrap()
            .insert("url_type".to_string(), "External link".into());
        assert_eq!(
            node.document_data().unwrap().get("url_type").unwrap().as_string(),
            Some("External link")
        );

        assert!(node.set_url("https://example.org/v2.pdf"));
        assert_eq!(node.url(), Some("https://example.org/v2.pdf"));
    }

    #[test]
    fn test_non_document_has_no_document_data() {
        let mut node = Node::stratigraphic("n1", "US1");
        assert!(!node.is_document());
        assert!(node.url().is_none());
        assert!(node.document_data().is_none());
        assert!(node.document_data_mut().is_none());
        assert!(!node.set_url("https://example.org"));
    }

    #[test]
    fn test_epoch_and_property_payloads() {
        let epoch = Node::epoch("ep1", "Roman period", -27.0, 476.0);
        assert_eq!(epoch.epoch_span(), Some((-27.0, 476.0)));
        assert!(epoch.is_type(NodeType::EPOCH));

        let prop = Node::property("p1", "material", "travertine");
        assert_eq!(prop.property_value().unwrap().as_string(), Some("travertine"));
        assert!(prop.epoch_span().is_none());

        let link = Node::link("l1", "model", "https://example.org/model.glb");
        assert_eq!(link.url(), Some("https://example.org/model.glb"));
        assert!(!link.is_document());
    }

    #[test]
    fn test_mutators() {
        let mut node = Node::stratigraphic("n1", "US1");
        node.set_description("Wall foundation");
        node.set_name("US1a");
        node.set_continuity(true);

        assert_eq!(node.description(), "Wall foundation");
        assert_eq!(node.name(), "US1a");
        assert!(node.has_continuity());

        node.visual_mut().y_position = Some(12.5);
        node.visual_mut().fill_color = Some("#FFAA00".to_string());
        let visual = node.visual().unwrap();
        assert_eq!(visual.y_position, Some(12.5));
        assert_eq!(visual.fill_color.as_deref(), Some("#FFAA00"));

        let cleared = node.clear_visual();
        assert!(cleared.is_some());
        assert!(node.visual().is_none());
    }

    #[test]
    fn test_node_attributes() {
        let mut node = Node::stratigraphic("n1", "US1");
        node.set_attribute("graph_code", "GT16");
        node.set_attribute("area", 3i64);

        assert_eq!(node.get_attribute("graph_code").unwrap().as_string(), Some("GT16"));
        assert!(node.has_attribute("area"));

        let removed = node.remove_attribute("area");
        assert!(removed.is_some());
        assert!(!node.has_attribute("area"));
        assert_eq!(node.attributes().len(), 1);
    }

    #[test]
    fn test_node_equality() {
        let node1 = Node::stratigraphic("n7", "US7");
        let node2 = Node::stratigraphic("n7", "another name");
        let node3 = Node::stratigraphic("n8", "US7");

        assert_eq!(node1, node2); // Same ID
        assert_ne!(node1, node3); // Different ID
    }

    #[test]
    fn test_json_payload_must_match_type() {
        let ok = r#"{"id":"d1","name":"D.01","description":"","node_type":"document",
                     "payload":{"kind":"document","url":"http://x","data":{"url_type":"web"}}}"#;
        let node: Node = serde_json::from_str(ok).unwrap();
        assert_eq!(node.url(), Some("http://x"));

        let bad = r#"{"id":"d1","name":"D.01","description":"","node_type":"US",
                      "payload":{"kind":"document","url":"http://x"}}"#;
        let err = serde_json::from_str::<Node>(bad).unwrap_err();
        assert!(err.to_string().contains("requires node_type 'document'"));
    }

    #[test]
    fn test_description_is_optional_in_json() {
        let node: Node = serde_json::from_str(r#"{"id":"n","name":"US1","node_type":"US"}"#).unwrap();
        assert_eq!(node.description(), "");
        assert_eq!(node.payload(), &NodePayload::Generic);
    }

    #[test]
    fn test_unknown_epoch_bound_survives_json() {
        let epoch = Node::epoch("ep1", "Undated", f64::NAN, 476.0);
        let json = serde_json::to_string(&epoch).unwrap();
        assert!(json.contains(r#""start_time":null"#));

        let back: Node = serde_json::from_str(&json).unwrap();
        let (start, end) = back.epoch_span().unwrap();
        assert!(start.is_nan());
        assert_eq!(end, 476.0);
    }
}
