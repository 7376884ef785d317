//! # Generic Graph Model
//!
//! A directed, attributed multigraph that knows nothing about ports or processes.
//!
//! Vertices are deduplicated by a content-derived identity key (see [`Identify`]),
//! never by reference and never by full attribute equality. Edges are
//! deduplicated on `(source, target, payload)`, so two edges between the same
//! pair of vertices survive as long as their payloads differ.
//!
//! Storage is an index-stable arena: [`VertexId`] and [`EdgeId`] handles stay
//! valid while the graph grows and while *other* items are removed. A handle to
//! a removed item must not be reused; its slot may be recycled by a later insert.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use thiserror::Error;

/// Content-based identity for vertices.
pub trait Identify {
    type Key: Eq + Hash + Clone + Debug;

    fn key(&self) -> Self::Key;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An edge referenced a vertex that is not part of the graph.
    #[error("vertex not found: {0}")]
    VertexNotFound(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(NodeIndex);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(EdgeIndex);

/// Borrowed view of one edge.
#[derive(Debug)]
pub struct EdgeRef<'a, E> {
    pub id: EdgeId,
    pub source: VertexId,
    pub target: VertexId,
    pub payload: &'a E,
}

impl<E> Clone for EdgeRef<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for EdgeRef<'_, E> {}

#[derive(Debug, Clone)]
pub struct Graph<V: Identify, E> {
    store: StableDiGraph<V, E>,
    index: HashMap<V::Key, VertexId>,
}

impl<V: Identify, E> Default for Graph<V, E> {
    fn default() -> Self {
        Self {
            store: StableDiGraph::default(),
            index: HashMap::new(),
        }
    }
}

impl<V: Identify, E: PartialEq> Graph<V, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `vertex` unless an equal one exists. Returns the id of the
    /// vertex that lives in the graph afterwards.
    pub fn insert(&mut self, vertex: V) -> VertexId {
        self.insert_full(vertex).0
    }

    /// Like [`Graph::insert`], also reporting whether a new vertex was created.
    /// On a hit the stored vertex is kept and `vertex` is dropped.
    pub fn insert_full(&mut self, vertex: V) -> (VertexId, bool) {
        let key = vertex.key();
        if let Some(&id) = self.index.get(&key) {
            return (id, false);
        }
        let id = VertexId(self.store.add_node(vertex));
        self.index.insert(key, id);
        (id, true)
    }

    pub fn find(&self, key: &V::Key) -> Option<VertexId> {
        self.index.get(key).copied()
    }

    pub fn contains(&self, key: &V::Key) -> bool {
        self.index.contains_key(key)
    }

    pub fn vertex(&self, id: VertexId) -> Option<&V> {
        self.store.node_weight(id.0)
    }

    /// Mutable access to a stored vertex.
    ///
    /// The identity key is captured at insert time; mutations must not change
    /// what [`Identify::key`] would return.
    pub fn vertex_mut(&mut self, id: VertexId) -> Option<&mut V> {
        self.store.node_weight_mut(id.0)
    }

    pub fn vertex_by_key(&self, key: &V::Key) -> Option<&V> {
        self.find(key).and_then(|id| self.vertex(id))
    }

    /// Removes the vertex equal to `key` together with every incident edge.
    pub fn remove(&mut self, key: &V::Key) -> Option<V> {
        let id = self.index.remove(key)?;
        self.store.remove_node(id.0)
    }

    pub fn remove_vertex(&mut self, id: VertexId) -> Option<V> {
        let vertex = self.store.remove_node(id.0)?;
        self.index.remove(&vertex.key());
        Some(vertex)
    }

    /// Links two vertices identified by key. Both must already be present.
    pub fn insert_edge(&mut self, from: &V::Key, to: &V::Key, payload: E) -> Result<EdgeId, GraphError> {
        let source = self
            .find(from)
            .ok_or_else(|| GraphError::VertexNotFound(format!("{from:?}")))?;
        let target = self
            .find(to)
            .ok_or_else(|| GraphError::VertexNotFound(format!("{to:?}")))?;
        Ok(self.link(source, target, payload).0)
    }

    pub fn insert_edge_between(
        &mut self,
        source: VertexId,
        target: VertexId,
        payload: E,
    ) -> Result<EdgeId, GraphError> {
        self.insert_edge_full(source, target, payload).map(|(id, _)| id)
    }

    /// Like [`Graph::insert_edge_between`], also reporting whether a new edge was created.
    pub fn insert_edge_full(
        &mut self,
        source: VertexId,
        target: VertexId,
        payload: E,
    ) -> Result<(EdgeId, bool), GraphError> {
        for id in [source, target] {
            if !self.store.contains_node(id.0) {
                return Err(GraphError::VertexNotFound(format!("{id:?}")));
            }
        }
        Ok(self.link(source, target, payload))
    }

    fn link(&mut self, source: VertexId, target: VertexId, payload: E) -> (EdgeId, bool) {
        let existing = self
            .out_edges(source)
            .find(|edge| edge.target == target && *edge.payload == payload)
            .map(|edge| edge.id);

        match existing {
            Some(id) => (id, false),
            None => (EdgeId(self.store.add_edge(source.0, target.0, payload)), true),
        }
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Option<E> {
        self.store.remove_edge(id.0)
    }

    /// Payload of edge `id`. Changing it may make the edge equal to a sibling.
    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut E> {
        self.store.edge_weight_mut(id.0)
    }

    pub fn edge(&self, id: EdgeId) -> Option<EdgeRef<'_, E>> {
        let (source, target) = self.store.edge_endpoints(id.0)?;
        let payload = self.store.edge_weight(id.0)?;
        Some(EdgeRef {
            id,
            source: VertexId(source),
            target: VertexId(target),
            payload,
        })
    }

    /// Edges leaving `id`. Empty for unknown vertices.
    pub fn out_edges(&self, id: VertexId) -> impl Iterator<Item = EdgeRef<'_, E>> + '_ {
        self.incident(id, Direction::Outgoing)
    }

    /// Edges arriving at `id`. Empty for unknown vertices.
    pub fn in_edges(&self, id: VertexId) -> impl Iterator<Item = EdgeRef<'_, E>> + '_ {
        self.incident(id, Direction::Incoming)
    }

    fn incident(&self, id: VertexId, dir: Direction) -> impl Iterator<Item = EdgeRef<'_, E>> + '_ {
        let ids: Vec<EdgeIndex> = if self.store.contains_node(id.0) {
            use petgraph::visit::EdgeRef as _;
            self.store.edges_directed(id.0, dir).map(|e| e.id()).collect()
        } else {
            Vec::new()
        };
        ids.into_iter().filter_map(|e| self.edge(EdgeId(e)))
    }

    pub fn degree(&self, id: VertexId) -> usize {
        self.out_edges(id).count() + self.in_edges(id).count()
    }

    /// All vertices. Iteration order is stable for an unmodified graph.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &V)> + '_ {
        self.store
            .node_indices()
            .filter_map(|idx| self.store.node_weight(idx).map(|v| (VertexId(idx), v)))
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'_, E>> + '_ {
        self.store.edge_indices().filter_map(|idx| self.edge(EdgeId(idx)))
    }

    /// Number of vertices.
    pub fn order(&self) -> usize {
        self.store.node_count()
    }

    /// Number of edges.
    pub fn size(&self) -> usize {
        self.store.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.order() == 0
    }

    pub fn clear(&mut self) {
        self.store.clear();
        self.index.clear();
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

#[cfg(test)]
mod tests {
    use super::*;

    /// Identity is the name only; `weight` is a plain attribute.
    #[derive(Debug, Clone, PartialEq)]
    struct Node {
        name: &'static str,
        weight: u32,
    }

    impl Identify for Node {
        type Key = &'static str;

        fn key(&self) -> Self::Key {
            self.name
        }
    }

    fn node(name: &'static str) -> Node {
        Node { name, weight: 0 }
    }

    #[test]
    fn insert_dedups_by_identity_and_keeps_first() {
        let mut graph: Graph<Node, &str> = Graph::new();
        let (a, created) = graph.insert_full(Node { name: "a", weight: 1 });
        assert!(created);

        let (again, created) = graph.insert_full(Node { name: "a", weight: 99 });
        assert!(!created);
        assert_eq!(a, again);
        assert_eq!(graph.order(), 1);
        assert_eq!(graph.vertex(a).unwrap().weight, 1);
    }

    #[test]
    fn insert_edge_requires_both_vertices() {
        let mut graph: Graph<Node, &str> = Graph::new();
        graph.insert(node("a"));

        let err = graph.insert_edge(&"a", &"missing", "x").unwrap_err();
        assert!(matches!(err, GraphError::VertexNotFound(_)));
        assert_eq!(graph.size(), 0);
    }

    #[test]
    fn edges_are_indexed_on_both_endpoints() {
        let mut graph: Graph<Node, &str> = Graph::new();
        let a = graph.insert(node("a"));
        let b = graph.insert(node("b"));
        let e = graph.insert_edge(&"a", &"b", "data").unwrap();

        let outs: Vec<_> = graph.out_edges(a).map(|e| e.id).collect();
        let ins: Vec<_> = graph.in_edges(b).map(|e| e.id).collect();
        assert_eq!(outs, vec![e]);
        assert_eq!(ins, vec![e]);
        assert_eq!(graph.in_edges(a).count(), 0);
        assert_eq!(graph.degree(a), 1);
        assert_eq!(graph.degree(b), 1);

        let edge = graph.edge(e).unwrap();
        assert_eq!((edge.source, edge.target, *edge.payload), (a, b, "data"));
    }

    #[test]
    fn identical_edges_are_stored_once_distinct_payloads_are_kept() {
        let mut graph: Graph<Node, &str> = Graph::new();
        graph.insert(node("a"));
        graph.insert(node("b"));

        let first = graph.insert_edge(&"a", &"b", "tcp").unwrap();
        let second = graph.insert_edge(&"a", &"b", "tcp").unwrap();
        assert_eq!(first, second);
        assert_eq!(graph.size(), 1);

        graph.insert_edge(&"a", &"b", "udp").unwrap();
        assert_eq!(graph.size(), 2);

        graph.insert_edge(&"b", &"a", "tcp").unwrap();
        assert_eq!(graph.size(), 3, "direction is part of edge identity");
    }

    #[test]
    fn edge_payload_can_be_updated_in_place() {
        let mut graph: Graph<Node, &str> = Graph::new();
        graph.insert(node("a"));
        graph.insert(node("b"));
        let e = graph.insert_edge(&"a", &"b", "old").unwrap();

        *graph.edge_mut(e).unwrap() = "new";
        assert_eq!(*graph.edge(e).unwrap().payload, "new");
        assert_eq!(graph.insert_edge(&"a", &"b", "new").unwrap(), e);
        assert_eq!(graph.size(), 1);
    }

    #[test]
    fn remove_cascades_to_incident_edges() {
        let mut graph: Graph<Node, &str> = Graph::new();
        let a = graph.insert(node("a"));
        let b = graph.insert(node("b"));
        let c = graph.insert(node("c"));
        graph.insert_edge(&"a", &"b", "ab").unwrap();
        graph.insert_edge(&"b", &"c", "bc").unwrap();
        graph.insert_edge(&"a", &"c", "ac").unwrap();

        let removed = graph.remove(&"b").unwrap();
        assert_eq!(removed.name, "b");
        assert!(graph.find(&"b").is_none());
        assert_eq!(graph.size(), 1);

        assert!(graph.edges().all(|e| e.source != b && e.target != b));
        assert_eq!(graph.out_edges(a).count(), 1);
        assert_eq!(graph.in_edges(c).count(), 1);
        assert_eq!(graph.out_edges(b).count(), 0);
    }

    #[test]
    fn handles_survive_growth_and_unrelated_removal() {
        let mut graph: Graph<Node, &str> = Graph::new();
        let keep = graph.insert(node("keep"));
        let gone = graph.insert(node("gone"));
        for name in ["n0", "n1", "n2", "n3", "n4", "n5", "n6", "n7"] {
            graph.insert(node(name));
        }
        graph.remove_vertex(gone);

        assert_eq!(graph.vertex(keep).unwrap().name, "keep");
        assert_eq!(graph.find(&"keep"), Some(keep));
        assert_eq!(graph.order(), 9);
    }

    #[test]
    fn removed_vertex_can_be_inserted_again() {
        let mut graph: Graph<Node, &str> = Graph::new();
        graph.insert(node("a"));
        graph.remove(&"a");
        assert!(graph.is_empty());

        let (_, created) = graph.insert_full(node("a"));
        assert!(created);
        assert_eq!(graph.order(), 1);
    }

    #[test]
    fn unknown_vertex_has_no_edges() {
        let mut graph: Graph<Node, &str> = Graph::new();
        let a = graph.insert(node("a"));
        graph.remove_vertex(a);

        assert_eq!(graph.out_edges(a).count(), 0);
        assert!(graph.insert_edge_between(a, a, "loop").is_err());
    }

    #[test]
    fn clear_drops_vertices_and_index() {
        let mut graph: Graph<Node, &str> = Graph::new();
        graph.insert(node("a"));
        graph.insert(node("b"));
        graph.insert_edge(&"a", &"b", "x").unwrap();

        graph.clear();
        assert_eq!((graph.order(), graph.size()), (0, 0));
        assert!(!graph.contains(&"a"));
    }
}
