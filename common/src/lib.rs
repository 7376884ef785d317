//! # busviz common
//!
//! Models and boundaries shared by the discovery engine and its front ends.
//!
//! * **[`graph`]**: a generic directed multigraph with identity-based dedup.
//! * **[`topology`]**: ports, processes and the links between them.
//! * **[`name_service`]**: the outbound port towards the bus directory.
//! * **[`progress`]**: the callback a scan reports progress to.
//!
//! Nothing in this crate performs I/O.

pub mod config;
pub mod graph;
pub mod name_service;
pub mod progress;
pub mod properties;
pub mod topology;
