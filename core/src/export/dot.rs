use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use busviz_common::graph::VertexId;
use busviz_common::topology::{Link, TopologyGraph, Vertex};
use thiserror::Error;

const BACKGROUND: &str = "#2e3e56";
const PROCESS_COLOR: &str = "#a5cf80";
const PORT_COLOR: &str = "#edad56";

/// Edge routing style handed to Graphviz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Splines {
    #[default]
    Ortho,
    Polyline,
    Line,
    Curved,
}

impl Splines {
    pub fn as_str(&self) -> &'static str {
        match self {
            Splines::Ortho => "ortho",
            Splines::Polyline => "polyline",
            Splines::Line => "line",
            Splines::Curved => "curved",
        }
    }
}

impl fmt::Display for Splines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown spline style '{0}' (expected ortho, polyline, line or curved)")]
pub struct UnknownSplines(String);

impl FromStr for Splines {
    type Err = UnknownSplines;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ortho" | "orthogonal" => Ok(Splines::Ortho),
            "polyline" => Ok(Splines::Polyline),
            "line" => Ok(Splines::Line),
            "curved" => Ok(Splines::Curved),
            _ => Err(UnknownSplines(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DotOptions {
    pub splines: Splines,
    /// Group every process with the ports it owns.
    pub cluster: bool,
    /// Draw ports whose owner is unknown.
    pub show_orphans: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            splines: Splines::default(),
            cluster: true,
            show_orphans: false,
        }
    }
}

/// Renders `graph` as a Graphviz digraph.
///
/// Hidden vertices are left out together with their edges, as are orphan
/// ports unless `show_orphans` is set. Ownership edges of unknown direction
/// are never drawn.
pub fn render(graph: &TopologyGraph, options: &DotOptions) -> String {
    Dot::new(graph, options).to_string()
}

struct Dot<'a> {
    graph: &'a TopologyGraph,
    options: &'a DotOptions,
    ids: HashMap<VertexId, usize>,
}

impl<'a> Dot<'a> {
    fn new(graph: &'a TopologyGraph, options: &'a DotOptions) -> Self {
        Self {
            graph,
            options,
            ids: super::numbering(graph),
        }
    }

    fn is_drawn(&self, vertex: &Vertex) -> bool {
        if vertex.is_hidden() {
            return false;
        }
        match vertex {
            Vertex::Port(_) => self.options.show_orphans || !vertex.is_orphan(),
            Vertex::Process(_) => true,
        }
    }

    fn node_id(&self, id: VertexId) -> String {
        format!("n{}", self.ids.get(&id).copied().unwrap_or_default())
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, indent: &str, id: VertexId, vertex: &Vertex) -> fmt::Result {
        let (shape, color) = match vertex {
            Vertex::Process(_) => ("box", PROCESS_COLOR),
            Vertex::Port(_) => ("ellipse", PORT_COLOR),
        };
        writeln!(
            f,
            "{indent}{} [label={}, shape={shape}, fillcolor=\"{color}\", color=\"{color}\"];",
            self.node_id(id),
            quote(&vertex.label())
        )
    }

    fn write_nodes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut placed = HashSet::new();

        for (cluster, (id, vertex)) in self
            .graph
            .vertices()
            .filter(|(_, v)| v.as_process().is_some() && self.is_drawn(v))
            .enumerate()
        {
            if !self.options.cluster {
                self.write_node(f, "    ", id, vertex)?;
                continue;
            }

            writeln!(f, "    subgraph cluster_{cluster} {{")?;
            writeln!(f, "        color=\"{BACKGROUND}\";")?;
            self.write_node(f, "        ", id, vertex)?;
            for port in self.graph.ports_of(id) {
                if let Some(owned) = self.graph.vertex(port).filter(|v| self.is_drawn(v)) {
                    self.write_node(f, "        ", port, owned)?;
                    placed.insert(port);
                }
            }
            writeln!(f, "    }}")?;
        }

        for (id, vertex) in self.graph.vertices() {
            if vertex.as_port().is_some() && self.is_drawn(vertex) && !placed.contains(&id) {
                self.write_node(f, "    ", id, vertex)?;
            }
        }
        Ok(())
    }

    fn write_edges(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for edge in self.graph.edges() {
            let drawn = |id| self.graph.vertex(id).is_some_and(|v| self.is_drawn(v));
            if !drawn(edge.source) || !drawn(edge.target) || !edge.payload.is_traversable() {
                continue;
            }

            let (source, target) = (self.node_id(edge.source), self.node_id(edge.target));
            match edge.payload {
                Link::Ownership { .. } => {
                    writeln!(f, "    {source} -> {target} [color=\"grey\", style=\"dashed\"];")?
                }
                Link::Connection { carrier } => writeln!(
                    f,
                    "    {source} -> {target} [label={}, color=\"white\", fontcolor=\"white\"];",
                    quote(carrier)
                )?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Dot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph busviz {{")?;
        writeln!(
            f,
            "    graph [splines=\"{}\", rankdir=\"LR\", bgcolor=\"{BACKGROUND}\", nodesep=\"0.4\", ranksep=\"0.5\"];",
            self.options.splines
        )?;
        writeln!(f, "    node [style=\"filled\", fillcolor=\"gray\", height=\"1.0\"];")?;
        writeln!(f, "    edge [minlen=\"2.0\"];")?;
        self.write_nodes(f)?;
        self.write_edges(f)?;
        writeln!(f, "}}")
    }
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
