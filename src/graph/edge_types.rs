//! Edge type registry
//!
//! The closed vocabulary of relationship kinds recognized by the Extended
//! Matrix model. Every edge is validated against a registry exactly once, at
//! construction.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Label and description attached to a recognized edge type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeTypeInfo {
    pub label: String,
    pub description: String,
}

/// Built-in vocabulary: (type key, label, description)
const BUILTIN_EDGE_TYPES: &[(&str, &str, &str)] = &[
    // Legacy yEd line styles, kept so older GraphML imports still resolve
    (
        "line",
        "Chronological Sequence",
        "Indicates a temporal sequence where one node occurs after another.",
    ),
    (
        "dashed",
        "Data Provenance",
        "Indicates a provenance relationship from a node to its source data.",
    ),
    (
        "dotted",
        "Temporal Change",
        "Represents a change of the same entity over time.",
    ),
    (
        "double_line",
        "Contemporaneity",
        "Indicates that two nodes are contemporaneous.",
    ),
    (
        "dashed_dotted",
        "Unknown Connection",
        "Represents an unspecified connection between two nodes.",
    ),
    // Semantic edge types
    (
        "is_before",
        "Chronological Sequence",
        "Indicates that the source node precedes the target node in time.",
    ),
    (
        "has_same_time",
        "Contemporaneity",
        "Indicates that the source and target nodes are contemporaneous.",
    ),
    (
        "changed_from",
        "Temporal Change",
        "Indicates that the source node is a later state of the target node.",
    ),
    (
        "has_data_provenance",
        "Data Provenance",
        "Links a node to the paradata that documents where its data comes from.",
    ),
    (
        "contrasts_with",
        "Contrasting Properties",
        "Links two property nodes that express mutually exclusive interpretations.",
    ),
    (
        "has_first_epoch",
        "Has First Epoch",
        "Links a stratigraphic node to the epoch in which it was created.",
    ),
    (
        "survive_in_epoch",
        "Survives In Epoch",
        "Links a stratigraphic node to a later epoch in which it still exists.",
    ),
    (
        "is_in_activity",
        "Part of Activity",
        "Indicates that the source node belongs to an activity group.",
    ),
    (
        "has_property",
        "Has Property",
        "Connects a node to one of its property nodes.",
    ),
    (
        "extracted_from",
        "Extracted From",
        "Indicates that a property or extractor was derived from a source document.",
    ),
    (
        "combines",
        "Combines",
        "Indicates that a combiner node merges information from several extractors.",
    ),
    (
        "is_in_paradata_nodegroup",
        "Belongs to Paradata Node Group",
        "Indicates that a paradata node is a member of a paradata node group.",
    ),
    (
        "has_paradata_nodegroup",
        "Has Paradata Node Group",
        "Connects a node to the paradata node group that documents it.",
    ),
    (
        "has_timebranch",
        "Has Time Branch",
        "Connects a graph element to an alternative time branch.",
    ),
    (
        "is_in_timebranch",
        "Is In Time Branch",
        "Indicates that a node belongs to a specific time branch.",
    ),
    (
        "has_license",
        "Has License",
        "Connects a resource to the license under which it is distributed.",
    ),
    (
        "has_embargo",
        "Has Embargo",
        "Connects a license to the embargo period restricting it.",
    ),
    (
        "has_author",
        "Has Author",
        "Connects a node or graph to its author.",
    ),
    (
        "has_semantic_shape",
        "Has Semantic Shape",
        "Connects a node to the 3D shape that visualizes its semantics.",
    ),
    (
        "has_representation_model",
        "Has Representation Model",
        "Connects a node to the 3D model that represents it.",
    ),
    (
        "has_linked_resource",
        "Has Linked Resource",
        "Connects a node to an external resource such as a URL or file.",
    ),
    (
        "generic_connection",
        "Generic Connection",
        "Represents a generic connection between two nodes.",
    ),
];

static BUILTIN: LazyLock<EdgeTypeRegistry> = LazyLock::new(|| {
    let mut registry = EdgeTypeRegistry::empty();
    for (key, label, description) in BUILTIN_EDGE_TYPES {
        registry.define(*key, *label, *description);
    }
    registry
});

/// Mapping from edge type key to its label and description
///
/// The process-wide built-in table is reached through [`EdgeTypeRegistry::builtin`]
/// and is read-only. Owned copies can be extended with [`EdgeTypeRegistry::define`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeTypeRegistry {
    types: IndexMap<String, EdgeTypeInfo>,
}

impl EdgeTypeRegistry {
    /// The built-in Extended Matrix vocabulary
    pub fn builtin() -> &'static EdgeTypeRegistry {
        &BUILTIN
    }

    /// A registry with no recognized types
    pub fn empty() -> Self {
        Self {
            types: IndexMap::new(),
        }
    }

    /// Define (or redefine) a type. Edges already built keep their old label.
    pub fn define(
        &mut self,
        key: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Option<EdgeTypeInfo> {
        self.types.insert(
            key.into(),
            EdgeTypeInfo {
                label: label.into(),
                description: description.into(),
            },
        )
    }

    pub fn lookup(&self, type_key: &str) -> Option<&EdgeTypeInfo> {
        self.types.get(type_key)
    }

    pub fn is_valid(&self, type_key: &str) -> bool {
        self.types.contains_key(type_key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EdgeTypeInfo)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
