//! # busviz core
//!
//! The discovery engine. It talks to the bus through a
//! [`NameService`](busviz_common::name_service::NameService) and produces a
//! [`TopologyGraph`](busviz_common::topology::TopologyGraph).
//!
//! * **[`profiler`]**: lists ports, fetches their details and folds them into a graph.
//! * **[`snapshot`]**: a name service that answers from a captured directory dump.
//! * **[`export`]**: DOT and JSON renderings of a graph.
//! * **[`error`]**: what can go wrong during a run.

pub mod error;
pub mod export;
pub mod profiler;
pub mod snapshot;

pub use error::ProfileError;
pub use profiler::{NetworkProfiler, Topology};
