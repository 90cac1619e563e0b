//! Core identifier types for the Extended Matrix graph model

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique identifier for a node, supplied by the caller (usually the importer)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for an edge within one graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    pub fn new(id: impl Into<String>) -> Self {
        EdgeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EdgeId {
    fn from(s: String) -> Self {
        EdgeId(s)
    }
}

impl From<&str> for EdgeId {
    fn from(s: &str) -> Self {
        EdgeId(s.to_string())
    }
}

impl Borrow<str> for EdgeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Identifier under which a graph is registered with the multigraph manager
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct GraphId(String);

impl GraphId {
    pub fn new(id: impl Into<String>) -> Self {
        GraphId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for GraphId {
    fn from(s: String) -> Self {
        GraphId(s)
    }
}

impl From<&str> for GraphId {
    fn from(s: &str) -> Self {
        GraphId(s.to_string())
    }
}

impl Borrow<str> for GraphId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Node type discriminator (e.g., "US", "document", "epoch")
///
/// This is an open set: importers may introduce tags that are not listed
/// among the well-known constants below.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeType(String);

impl NodeType {
    /// Stratigraphic unit
    pub const STRATIGRAPHIC_UNIT: &'static str = "US";
    /// Virtual stratigraphic unit, structural
    pub const USVS: &'static str = "USVs";
    /// Virtual stratigraphic unit, non-structural
    pub const USVN: &'static str = "USVn";
    /// Special find
    pub const SPECIAL_FIND: &'static str = "SF";
    /// Virtual special find
    pub const VIRTUAL_SPECIAL_FIND: &'static str = "VSF";
    /// Series of stratigraphic units
    pub const SERIES: &'static str = "serSU";
    pub const DOCUMENT: &'static str = "document";
    pub const PROPERTY: &'static str = "property";
    pub const EXTRACTOR: &'static str = "extractor";
    pub const COMBINER: &'static str = "combiner";
    pub const EPOCH: &'static str = "epoch";
    pub const ACTIVITY: &'static str = "activity";
    pub const AUTHOR: &'static str = "author";
    pub const LICENSE: &'static str = "license";
    pub const LINK: &'static str = "link";
    pub const REPRESENTATION_MODEL: &'static str = "representation_model";
    pub const SEMANTIC_SHAPE: &'static str = "semantic_shape";
    pub const PARADATA_NODEGROUP: &'static str = "ParadataNodeGroup";

    pub fn new(node_type: impl Into<String>) -> Self {
        NodeType(node_type.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is(&self, tag: &str) -> bool {
        self.0 == tag
    }

    /// True for the stratigraphic family (US, USV*, SF, VSF, serSU)
    pub fn is_stratigraphic(&self) -> bool {
        matches!(
            self.0.as_str(),
            Self::STRATIGRAPHIC_UNIT
                | Self::USVS
                | Self::USVN
                | Self::SPECIAL_FIND
                | Self::VIRTUAL_SPECIAL_FIND
                | Self::SERIES
        )
    }

    /// True for nodes describing provenance rather than the record itself
    pub fn is_paradata(&self) -> bool {
        matches!(
            self.0.as_str(),
            Self::DOCUMENT | Self::PROPERTY | Self::EXTRACTOR | Self::COMBINER
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeType {
    fn from(s: String) -> Self {
        NodeType(s)
    }
}

impl From<&str> for NodeType {
    fn from(s: &str) -> Self {
        NodeType(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new("n1");
        assert_eq!(id.as_str(), "n1");
        assert_eq!(format!("{}", id), "n1");

        let id2: NodeId = "n2".into();
        assert_eq!(id2.as_str(), "n2");
    }

    #[test]
    fn test_edge_id() {
        let id = EdgeId::new("e99");
        assert_eq!(id.as_str(), "e99");
        assert_eq!(format!("{}", id), "e99");
    }

    #[test]
    fn test_graph_id() {
        let id: GraphId = "G1".into();
        assert_eq!(id.as_str(), "G1");
        assert_eq!(id, GraphId::new(String::from("G1")));
    }

    #[test]
    fn test_node_type_families() {
        assert!(NodeType::new("US").is_stratigraphic());
        assert!(NodeType::new("USVs").is_stratigraphic());
        assert!(!NodeType::new("document").is_stratigraphic());

        assert!(NodeType::new(NodeType::EXTRACTOR).is_paradata());
        assert!(!NodeType::new(NodeType::EPOCH).is_paradata());

        // Open set: unknown tags are accepted
        let custom = NodeType::new("my_custom_tag");
        assert!(custom.is("my_custom_tag"));
        assert!(!custom.is_stratigraphic());
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&NodeId::new("n1")).unwrap();
        assert_eq!(json, "\"n1\"");
        let back: EdgeId = serde_json::from_str("\"e1\"").unwrap();
        assert_eq!(back, EdgeId::new("e1"));
    }

    #[test]
    fn test_id_ordering() {
        let id1 = NodeId::new("a");
        let id2 = NodeId::new("b");
        assert!(id1 < id2);
    }
}
