use crate::graph::{EdgeRef, Graph, VertexId};

use super::link::{EdgeKind, Link};
use super::vertex::{PortVertex, ProcessVertex, Vertex, VertexKey};
use super::{HIDDEN, ORPHAN};

/// The graph produced by a discovery run.
pub type TopologyGraph = Graph<Vertex, Link>;

impl Graph<Vertex, Link> {
    pub fn ports(&self) -> impl Iterator<Item = (VertexId, &PortVertex)> + '_ {
        self.vertices().filter_map(|(id, v)| v.as_port().map(|p| (id, p)))
    }

    pub fn processes(&self) -> impl Iterator<Item = (VertexId, &ProcessVertex)> + '_ {
        self.vertices().filter_map(|(id, v)| v.as_process().map(|p| (id, p)))
    }

    pub fn find_port(&self, name: &str) -> Option<VertexId> {
        self.find(&VertexKey::port(name))
    }

    pub fn find_process(&self, hostname: &str, pid: i32) -> Option<VertexId> {
        self.find(&VertexKey::process(hostname, pid))
    }

    /// The process hosting `port`, if an ownership edge leads to it.
    pub fn owner_of(&self, port: VertexId) -> Option<VertexId> {
        self.in_edges(port)
            .find(|e| e.payload.kind() == EdgeKind::Ownership)
            .map(|e| e.source)
    }

    /// Ports hosted by `process`, in edge insertion order.
    pub fn ports_of(&self, process: VertexId) -> Vec<VertexId> {
        let mut ports: Vec<_> = self
            .out_edges(process)
            .filter(|e| e.payload.kind() == EdgeKind::Ownership)
            .collect();
        ports.sort_by_key(|e| e.id);
        ports.into_iter().map(|e| e.target).collect()
    }

    pub fn connections(&self) -> impl Iterator<Item = EdgeRef<'_, Link>> + '_ {
        self.edges().filter(|e| e.payload.kind() == EdgeKind::Connection)
    }

    pub fn ownerships(&self) -> impl Iterator<Item = EdgeRef<'_, Link>> + '_ {
        self.edges().filter(|e| e.payload.kind() == EdgeKind::Ownership)
    }

    pub fn orphans(&self) -> impl Iterator<Item = (VertexId, &PortVertex)> + '_ {
        self.ports().filter(|(_, port)| port.properties.check(ORPHAN))
    }

    /// Sets or clears the `hidden` flag. Returns `false` for unknown keys.
    pub fn set_hidden(&mut self, key: &VertexKey, hidden: bool) -> bool {
        let Some(vertex) = self.find(key).and_then(|id| self.vertex_mut(id)) else {
            return false;
        };
        let props = vertex.properties_mut();
        if hidden {
            props.set_flag(HIDDEN);
        } else {
            props.remove(HIDDEN);
        }
        true
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
