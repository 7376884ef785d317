//! # Topology Entities
//!
//! The two vertex kinds of a message-bus topology (ports and the processes
//! hosting them), the two edge kinds linking them, and the per-port records a
//! discovery run folds into a [`TopologyGraph`].
//!
//! * [`Vertex::Port`] is identified by its name.
//! * [`Vertex::Process`] is identified by `(hostname, pid)`.
//! * [`Link::Ownership`] goes Process → Port, [`Link::Connection`] goes Port → Port.
//!
//! Consumers switch on [`Vertex::kind`] / [`Link::kind`] and may filter on the
//! [`ORPHAN`] and [`HIDDEN`] flags.

mod details;
mod graph;
mod link;
mod vertex;

pub use details::{ConnectionInfo, DetailDefect, PortDetails, ProcessInfo, UNKNOWN_PID};
pub use graph::TopologyGraph;
pub use link::{EdgeKind, Link, OwnershipDir};
pub use vertex::{PortVertex, ProcessVertex, Vertex, VertexKey, VertexKind};

/// Set on ports whose owner could not be resolved.
pub const ORPHAN: &str = "orphan";
/// Set on vertices a consumer chose not to show.
pub const HIDDEN: &str = "hidden";
