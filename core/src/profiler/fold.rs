//! Folds per-port details into a single topology graph.
//!
//! Every vertex is inserted before it is linked, so the only way an edge
//! insertion can fail is a broken graph invariant. Vertices, edges and their
//! directions do not depend on the order of the input records. Process
//! attributes do: when two records disagree on a value, the first one wins,
//! so callers fold records in listing order.

use busviz_common::graph::{EdgeId, GraphError, VertexId};
use busviz_common::topology::{
    EdgeKind, Link, ORPHAN, OwnershipDir, PortDetails, ProcessInfo, ProcessVertex, TopologyGraph,
    Vertex,
};
use tracing::trace;

/// Builds the topology graph for a set of port records.
pub fn build_topology_graph(details: &[PortDetails]) -> Result<TopologyGraph, GraphError> {
    let mut graph = TopologyGraph::new();
    for record in details {
        fold_port(&mut graph, record)?;
    }
    Ok(graph)
}

fn fold_port(graph: &mut TopologyGraph, details: &PortDetails) -> Result<(), GraphError> {
    trace!(port = %details.name, "folding port");
    let port = graph.insert(Vertex::port(&details.name));

    if details.owner.is_known() {
        let process = insert_process(graph, &details.owner);
        link_owner(graph, process, port, OwnershipDir::of(details))?;
        if let Some(vertex) = graph.vertex_mut(port) {
            vertex.properties_mut().remove(ORPHAN);
        }
    } else if graph.owner_of(port).is_none() {
        if let Some(vertex) = graph.vertex_mut(port) {
            vertex.properties_mut().set_flag(ORPHAN);
        }
    }

    for conn in &details.outputs {
        let target = graph.insert(Vertex::port(&conn.name));
        connect(graph, port, target, &conn.carrier)?;
    }

    for conn in &details.inputs {
        let source = graph.insert(Vertex::port(&conn.name));
        connect(graph, source, port, &conn.carrier)?;
    }

    Ok(())
}

/// One ownership edge per process and port. A port described twice keeps the
/// strongest direction seen.
fn link_owner(
    graph: &mut TopologyGraph,
    process: VertexId,
    port: VertexId,
    dir: OwnershipDir,
) -> Result<(), GraphError> {
    let existing = graph
        .in_edges(port)
        .find(|e| e.source == process && e.payload.kind() == EdgeKind::Ownership)
        .map(|e| e.id);

    match existing.and_then(|id| graph.edge_mut(id)) {
        Some(Link::Ownership { dir: current }) => *current = current.merge(dir),
        _ => {
            graph.insert_edge_between(process, port, Link::ownership(dir))?;
        }
    }
    Ok(())
}

/// Adds a connection unless it is already known. An empty carrier means the
/// reporting end did not know it: it never adds a parallel edge and is
/// replaced by the first known carrier for the same pair.
fn connect(
    graph: &mut TopologyGraph,
    source: VertexId,
    target: VertexId,
    carrier: &str,
) -> Result<(), GraphError> {
    let parallel: Vec<(EdgeId, String)> = graph
        .out_edges(source)
        .filter(|e| e.target == target)
        .filter_map(|e| e.payload.carrier().map(|c| (e.id, c.to_string())))
        .collect();

    if parallel.iter().any(|(_, known)| known == carrier) {
        return Ok(());
    }
    if carrier.is_empty() && !parallel.is_empty() {
        return Ok(());
    }

    let unknown = parallel.iter().find(|(_, known)| known.is_empty()).map(|(id, _)| *id);
    match unknown.and_then(|id| graph.edge_mut(id)) {
        Some(Link::Connection { carrier: current }) => *current = carrier.to_string(),
        _ => {
            graph.insert_edge_between(source, target, Link::connection(carrier))?;
        }
    }
    Ok(())
}

/// Insert-or-get for processes. A process seen through several ports keeps the
/// attributes it was first seen with and only gains the ones it was missing.
fn insert_process(graph: &mut TopologyGraph, owner: &ProcessInfo) -> VertexId {
    let incoming = ProcessVertex::from_info(owner);
    let (id, created) = graph.insert_full(Vertex::Process(incoming.clone()));
    if !created {
        if let Some(existing) = graph.vertex_mut(id) {
            let props = existing.properties_mut();
            for (key, value) in incoming.properties.iter() {
                if !props.check(key) {
                    props.put(key, value.clone());
                }
            }
        }
    }
    id
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
