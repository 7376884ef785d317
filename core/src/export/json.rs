use busviz_common::properties::Properties;
use busviz_common::topology::TopologyGraph;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct GraphReport {
    pub vertices: Vec<VertexReport>,
    pub edges: Vec<EdgeReport>,
}

#[derive(Debug, Serialize)]
pub struct VertexReport {
    pub id: usize,
    #[serde(flatten)]
    pub attributes: Properties,
}

#[derive(Debug, Serialize)]
pub struct EdgeReport {
    pub source: usize,
    pub target: usize,
    #[serde(flatten)]
    pub properties: Properties,
}

/// Collects every vertex and edge, hidden and orphan ones included.
pub fn report(graph: &TopologyGraph) -> GraphReport {
    let ids = super::numbering(graph);

    let vertices = graph
        .vertices()
        .map(|(id, vertex)| VertexReport {
            id: ids.get(&id).copied().unwrap_or_default(),
            attributes: vertex.attributes(),
        })
        .collect();

    let edges = graph
        .edges()
        .filter_map(|edge| {
            Some(EdgeReport {
                source: *ids.get(&edge.source)?,
                target: *ids.get(&edge.target)?,
                properties: edge.payload.properties(),
            })
        })
        .collect();

    GraphReport { vertices, edges }
}

pub fn render(graph: &TopologyGraph) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&report(graph))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
