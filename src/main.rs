use anyhow::{Context, Result};
use s3dgraphy::{Graph, GraphId, MultiGraphConfig, MultiGraphManager, Node};
use tracing::info;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("s3dgraphy v{}", s3dgraphy::version());
    println!("==========================================");
    println!();

    // Optional: path to a multigraph config, then any number of JSON snapshots
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => MultiGraphConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => MultiGraphConfig::default(),
    };
    let mut manager = MultiGraphManager::with_config(config);

    let snapshots: Vec<String> = args.collect();
    if snapshots.is_empty() {
        manager.register("demo", demo_graph()?)?;
    } else {
        for path in &snapshots {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path))?;
            let graph = Graph::from_json(&json)
                .with_context(|| format!("failed to load graph from {}", path))?;
            let graph_id = graph.graph_id().clone();
            manager.register(graph_id, graph)?;
        }
    }

    activate_first(&mut manager)?;

    for (graph_id, graph) in manager.all() {
        print_summary(graph_id.as_str(), graph);
    }

    if let Some(active) = manager.get_active() {
        info!("Active graph: {}", active.graph_id());
    }

    Ok(())
}

/// Make the first registered graph active, if any
fn activate_first(manager: &mut MultiGraphManager) -> Result<Option<GraphId>> {
    let first = manager.graph_ids().next().cloned();
    if let Some(first) = &first {
        manager.set_active(first.as_str())?;
    }
    Ok(first)
}

fn demo_graph() -> Result<Graph> {
    let mut graph = Graph::new("demo").with_name("Demo excavation");
    graph.set_graph_code("DEMO");

    graph.add_node(Node::stratigraphic("us10", "US10").with_description("Wall foundation"))?;
    graph.add_node(Node::stratigraphic("us11", "US11").with_description("Floor layer"))?;
    graph.add_node(Node::epoch("ep1", "Roman period", -27.0, 476.0))?;
    graph.add_node(Node::property("p1", "height", 2.4))?;
    graph.add_node(Node::document("d1", "D.01", "https://example.org/report.pdf"))?;

    graph.add_edge("e1", "us10", "us11", "is_before")?;
    graph.add_edge("e2", "us10", "ep1", "has_first_epoch")?;
    graph.add_edge("e3", "us10", "p1", "has_property")?;
    graph.add_edge("e4", "p1", "d1", "extracted_from")?;

    println!("✓ Built demo graph with {} nodes and {} edges", graph.node_count(), graph.edge_count());
    Ok(graph)
}

fn print_summary(graph_id: &str, graph: &Graph) {
    let stats = graph.statistics();
    println!("\nGraph {} ({}):", graph_id, graph.name());
    println!("  Total nodes: {}", stats.node_count);
    println!("  Total edges: {}", stats.edge_count);
    println!("  Dangling edges: {}", stats.dangling_edge_count);
    println!("  Paradata nodes: {}", stats.paradata_node_count);
    for (node_type, count) in &stats.nodes_by_type {
        println!("  {:>20}: {}", node_type, count);
    }

    for unit in graph.nodes().filter(|n| n.node_type().is_stratigraphic()) {
        let epochs: Vec<&str> = graph.epochs_of(unit.id().as_str()).iter().map(|n| n.name()).collect();
        let documents: Vec<&str> = graph.documents_of(unit.id().as_str()).iter().map(|n| n.name()).collect();
        println!(
            "  {} [{}] epochs: {:?} sources: {:?}",
            unit.name(),
            unit.node_type(),
            epochs,
            documents
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_first_registered_graph() {
        let mut manager = MultiGraphManager::new();
        assert_eq!(activate_first(&mut manager).unwrap(), None);
        assert!(manager.get_active().is_none());

        manager.register("demo", demo_graph().unwrap()).unwrap();
        manager.register("other", Graph::new("other")).unwrap();

        let active = activate_first(&mut manager).unwrap();
        assert_eq!(active, Some(GraphId::new("demo")));
        assert_eq!(manager.get_active().unwrap().graph_id().as_str(), "demo");
    }
}
