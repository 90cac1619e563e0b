//! Multigraph registry
//!
//! Maps graph ids to [`Graph`] instances and tracks which one is active.
//! The manager is an explicit context object owned by the host session;
//! [`SharedMultiGraph`] wraps it in a reader/writer lock for callers that
//! touch it from more than one thread.

use crate::config::{MultiGraphConfig, UnregisterActivePolicy};
use crate::graph::{EntityKind, Graph, GraphError, GraphId, GraphResult, Node, NodeId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Compound key addressing a node inside a specific graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    pub graph_id: GraphId,
    pub node_id: NodeId,
}

impl NodeRef {
    pub fn new(graph_id: impl Into<GraphId>, node_id: impl Into<NodeId>) -> Self {
        Self {
            graph_id: graph_id.into(),
            node_id: node_id.into(),
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.graph_id, self.node_id)
    }
}

/// Registry of loaded graphs - one per graph id
#[derive(Debug, Default)]
pub struct MultiGraphManager {
    /// Registered graphs
    graphs: IndexMap<GraphId, Graph>,
    /// Lookup key of the active graph
    active: Option<GraphId>,
    config: MultiGraphConfig,
}

impl MultiGraphManager {
    /// Create an empty manager with default settings
    pub fn new() -> Self {
        Self::with_config(MultiGraphConfig::default())
    }

    /// Create an empty manager
    pub fn with_config(config: MultiGraphConfig) -> Self {
        debug!("Multigraph manager initialized with {:?}", config);
        Self {
            graphs: IndexMap::new(),
            active: None,
            config,
        }
    }

    pub fn config(&self) -> &MultiGraphConfig {
        &self.config
    }

    /// Register a graph under `graph_id`
    ///
    /// The graph's own id is set to `graph_id`.
    pub fn register(&mut self, graph_id: impl Into<GraphId>, mut graph: Graph) -> GraphResult<()> {
        let graph_id = graph_id.into();

        if self.graphs.contains_key(&graph_id) {
            debug!("Rejected duplicate graph {}", graph_id);
            return Err(GraphError::duplicate(EntityKind::Graph, &graph_id));
        }
        if let Some(limit) = self.config.max_graphs {
            if self.graphs.len() >= limit {
                debug!("Rejected graph {}: limit of {} reached", graph_id, limit);
                return Err(GraphError::QuotaExceeded { limit });
            }
        }

        graph.set_graph_id(graph_id.clone());
        info!(
            "Registered graph {} ({} nodes, {} edges)",
            graph_id,
            graph.node_count(),
            graph.edge_count()
        );
        self.graphs.insert(graph_id, graph);
        Ok(())
    }

    /// Remove a graph and return it
    ///
    /// Unregistering the active graph follows the configured
    /// [`UnregisterActivePolicy`].
    pub fn unregister(&mut self, graph_id: &str) -> GraphResult<Graph> {
        if !self.graphs.contains_key(graph_id) {
            return Err(GraphError::not_found(EntityKind::Graph, graph_id));
        }

        let is_active = self.active.as_ref().map(|a| a.as_str()) == Some(graph_id);
        if is_active {
            match self.config.unregister_active {
                UnregisterActivePolicy::Reject => {
                    debug!("Refused to unregister active graph {}", graph_id);
                    return Err(GraphError::ActiveGraph(GraphId::new(graph_id)));
                }
                UnregisterActivePolicy::Clear => {
                    self.active = None;
                    info!("Cleared active graph {}", graph_id);
                }
            }
        }

        let graph = self
            .graphs
            .shift_remove(graph_id)
            .ok_or_else(|| GraphError::not_found(EntityKind::Graph, graph_id))?;
        info!("Unregistered graph {}", graph_id);
        Ok(graph)
    }

    /// Get a graph by id
    pub fn get(&self, graph_id: &str) -> Option<&Graph> {
        self.graphs.get(graph_id)
    }

    /// Get a mutable graph by id
    pub fn get_mut(&mut self, graph_id: &str) -> Option<&mut Graph> {
        self.graphs.get_mut(graph_id)
    }

    /// All registered graphs
    pub fn all(&self) -> impl Iterator<Item = (&GraphId, &Graph)> {
        self.graphs.iter()
    }

    pub fn graph_ids(&self) -> impl Iterator<Item = &GraphId> {
        self.graphs.keys()
    }

    pub fn contains(&self, graph_id: &str) -> bool {
        self.graphs.contains_key(graph_id)
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Make a registered graph the active one
    pub fn set_active(&mut self, graph_id: &str) -> GraphResult<()> {
        let (key, _) = self
            .graphs
            .get_key_value(graph_id)
            .ok_or_else(|| GraphError::not_found(EntityKind::Graph, graph_id))?;
        self.active = Some(key.clone());
        info!("Active graph set to {}", graph_id);
        Ok(())
    }

    /// Clear the active pointer without touching any graph
    pub fn clear_active(&mut self) -> Option<GraphId> {
        self.active.take()
    }

    pub fn active_id(&self) -> Option<&GraphId> {
        self.active.as_ref()
    }

    /// The active graph, if one is set
    pub fn get_active(&self) -> Option<&Graph> {
        self.active.as_ref().and_then(|id| self.graphs.get(id))
    }

    pub fn get_active_mut(&mut self) -> Option<&mut Graph> {
        match &self.active {
            Some(id) => self.graphs.get_mut(id),
            None => None,
        }
    }

    /// Graph whose `graph_code` attribute equals `code`
    pub fn find_by_code(&self, code: &str) -> Option<(&GraphId, &Graph)> {
        self.graphs
            .iter()
            .find(|(_, graph)| graph.graph_code() == Some(code))
    }

    /// Resolve a compound key
    pub fn resolve(&self, node_ref: &NodeRef) -> Option<&Node> {
        self.graphs
            .get(&node_ref.graph_id)
            .and_then(|graph| graph.find_node_by_id(node_ref.node_id.as_str()))
    }

    /// Every graph containing a node with this id
    pub fn find_node_everywhere(&self, node_id: &str) -> Vec<NodeRef> {
        self.graphs
            .iter()
            .filter_map(|(graph_id, graph)| {
                graph
                    .find_node_by_id(node_id)
                    .map(|node| NodeRef::new(graph_id.clone(), node.id().clone()))
            })
            .collect()
    }

    /// Nodes carrying the given display name, across all graphs
    pub fn find_nodes_by_name(&self, name: &str) -> Vec<NodeRef> {
        self.graphs
            .iter()
            .flat_map(|(graph_id, graph)| {
                graph
                    .nodes()
                    .filter(move |node| node.name() == name)
                    .map(move |node| NodeRef::new(graph_id.clone(), node.id().clone()))
            })
            .collect()
    }
}

/// Thread-safe handle to a [`MultiGraphManager`]
///
/// Cloning shares the same manager. A poisoned lock is recovered: the
/// manager holds plain maps, which stay structurally valid after a panic.
#[derive(Debug, Clone, Default)]
pub struct SharedMultiGraph {
    inner: Arc<RwLock<MultiGraphManager>>,
}

impl SharedMultiGraph {
    pub fn new(manager: MultiGraphManager) -> Self {
        Self {
            inner: Arc::new(RwLock::new(manager)),
        }
    }

    /// Acquire shared read access
    pub fn read(&self) -> RwLockReadGuard<'_, MultiGraphManager> {
        match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Recovering from poisoned multigraph lock (read)");
                poisoned.into_inner()
            }
        }
    }

    /// Acquire exclusive write access
    pub fn write(&self) -> RwLockWriteGuard<'_, MultiGraphManager> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Recovering from poisoned multigraph lock (write)");
                poisoned.into_inner()
            }
        }
    }
}
