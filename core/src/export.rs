//! # Graph Exporters
//!
//! Text renderings of a [`TopologyGraph`] for tools outside busviz.
//!
//! * **[`dot`]**: Graphviz source, laid out the way the viewer draws the bus.
//! * **[`json`]**: every vertex and edge with its attributes.

use std::collections::HashMap;

use busviz_common::graph::VertexId;
use busviz_common::topology::TopologyGraph;

pub mod dot;
pub mod json;

/// Dense, stable numbering of the vertices, in iteration order.
fn numbering(graph: &TopologyGraph) -> HashMap<VertexId, usize> {
    graph
        .vertices()
        .enumerate()
        .map(|(n, (id, _))| (id, n))
        .collect()
}
