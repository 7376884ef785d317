//! # Network Profiler
//!
//! Turns the live state of the message bus into one [`TopologyGraph`].
//!
//! A run goes through three phases:
//! 1. **Clean** (optional): ask the name service to forget dead registrations.
//! 2. **List + describe**: fetch the port list, then each port's details.
//! 3. **Fold**: merge every gathered record into the graph.
//!
//! Only an unreachable name service at listing time aborts a run. A port that
//! vanishes, cannot be reached or returns garbage is skipped and recorded as a
//! diagnostic. Cancellation through the progress sink stops new detail fetches
//! and folds what was already gathered.

use std::sync::Arc;

use busviz_common::config::Config;
use busviz_common::name_service::{CleanReport, NameService, NameServiceError};
use busviz_common::progress::ProgressSink;
use busviz_common::topology::{PortDetails, TopologyGraph};
use tokio::task::JoinSet;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::error::ProfileError;

mod fold;
mod progress;

pub use fold::build_topology_graph;

use progress::Reporter;

/// Result of a discovery run.
#[derive(Debug)]
pub struct Topology {
    pub graph: TopologyGraph,
    /// Records the graph was folded from, in listing order.
    pub details: Vec<PortDetails>,
    /// Per-port problems the run recovered from.
    pub diagnostics: Vec<ProfileError>,
    /// Number of ports the name service listed.
    pub listed: usize,
    /// `true` when the progress sink stopped the run early.
    pub cancelled: bool,
    /// Outcome of the clean phase, when it ran and succeeded.
    pub cleaned: Option<CleanReport>,
}

pub struct NetworkProfiler {
    name_service: Arc<dyn NameService>,
    config: Config,
}

impl NetworkProfiler {
    pub fn new(name_service: Arc<dyn NameService>, config: Config) -> Self {
        Self {
            name_service,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lists the registered ports. An empty bus is not an error.
    pub async fn list_ports(&self) -> Result<Vec<String>, ProfileError> {
        self.name_service.list_ports().await.map_err(|err| match err {
            NameServiceError::Unreachable(reason) => ProfileError::DiscoveryUnavailable(reason),
            other => ProfileError::DiscoveryUnavailable(other.to_string()),
        })
    }

    /// Fetches and validates the details of one port.
    pub async fn get_port_details(&self, name: &str) -> Result<PortDetails, ProfileError> {
        fetch_details(self.name_service.clone(), name.to_string()).await
    }

    /// Best-effort sweep of dead registrations. Never fails the caller.
    pub async fn clean(&self) -> Option<CleanReport> {
        let timeout = self.config.liveness_timeout;
        info!("Cleaning dead ports (timeout {:.2}s)...", timeout.as_secs_f64());

        match self.name_service.unregister_stale(timeout).await {
            Ok(report) => {
                for (port, reason) in &report.failed {
                    warn!("Could not unregister dead port {port}: {reason}");
                }
                if !report.removed.is_empty() {
                    info!("Removed {} dead port(s)", report.removed.len());
                }
                Some(report)
            }
            Err(e) => {
                warn!("Skipping cleanup: {e}");
                None
            }
        }
    }

    /// Runs a full discovery and folds the result into a graph.
    ///
    /// `progress` receives non-decreasing percentages at each phase boundary and
    /// after every detail fetch, and may cancel the run.
    pub async fn profile(&self, progress: Option<&mut dyn ProgressSink>) -> Result<Topology, ProfileError> {
        let span = info_span!("profile");
        let mut reporter = Reporter::new(progress);
        let mut cleaned = None;

        if reporter.report(progress::START).is_continue() && self.config.clean {
            cleaned = self.clean().instrument(span.clone()).await;
            let _ = reporter.report(progress::CLEANED);
        }

        if reporter.is_cancelled() {
            info!(parent: &span, "Profiling cancelled before listing");
            return Ok(Topology::empty(cleaned));
        }

        info!(parent: &span, "Getting the ports list...");
        let ports = self.list_ports().instrument(span.clone()).await?;
        info!(parent: &span, "Found {} port(s)", ports.len());

        let mut details = Vec::new();
        let mut diagnostics = Vec::new();
        if reporter.report(progress::LISTED).is_continue() {
            info!(parent: &span, "Getting the ports details...");
            (details, diagnostics) = self
                .fetch_all(&ports, &mut reporter)
                .instrument(span.clone())
                .await;
        }

        let cancelled = reporter.is_cancelled();
        if cancelled {
            warn!(
                parent: &span,
                "Profiling cancelled after {} of {} port(s)",
                details.len() + diagnostics.len(),
                ports.len()
            );
        }

        info!(parent: &span, "Generating the graph...");
        let graph = build_topology_graph(&details)?;
        let _ = reporter.report(progress::DONE);

        Ok(Topology {
            graph,
            details,
            diagnostics,
            listed: ports.len(),
            cancelled,
            cleaned,
        })
    }

    /// Describes `ports` with at most `config.jobs` fetches in flight.
    ///
    /// New fetches are only started after the previous completion has been
    /// reported, so a cancelling sink sees no further name-service calls.
    async fn fetch_all(
        &self,
        ports: &[String],
        reporter: &mut Reporter<'_>,
    ) -> (Vec<PortDetails>, Vec<ProfileError>) {
        let jobs = self.config.jobs();
        let total = ports.len();
        let mut pending = ports.iter().cloned().enumerate();
        let mut in_flight = JoinSet::new();
        let mut gathered: Vec<(usize, PortDetails)> = Vec::with_capacity(total);
        let mut diagnostics = Vec::new();
        let mut done = 0;

        loop {
            while in_flight.len() < jobs {
                let Some((idx, port)) = pending.next() else {
                    break;
                };
                debug!("Checking {port}...");
                let name_service = self.name_service.clone();
                in_flight.spawn(async move { (idx, fetch_details(name_service, port).await) });
            }

            let Some(joined) = in_flight.join_next().await else {
                break;
            };
            done += 1;

            match joined {
                Ok((idx, Ok(record))) => gathered.push((idx, record)),
                Ok((_, Err(err))) => {
                    warn!("Skipping port: {err}");
                    diagnostics.push(err);
                }
                Err(join_err) => {
                    warn!("Detail fetch task failed: {join_err}");
                    diagnostics.push(ProfileError::FetchAborted(join_err.to_string()));
                }
            }

            if reporter.report(progress::fetch_step(done, total)).is_break() {
                in_flight.shutdown().await;
                break;
            }
        }

        gathered.sort_by_key(|(idx, _)| *idx);
        let details = gathered.into_iter().map(|(_, record)| record).collect();
        (details, diagnostics)
    }
}

impl Topology {
    fn empty(cleaned: Option<CleanReport>) -> Self {
        Self {
            graph: TopologyGraph::new(),
            details: Vec::new(),
            diagnostics: Vec::new(),
            listed: 0,
            cancelled: true,
            cleaned,
        }
    }
}

async fn fetch_details(name_service: Arc<dyn NameService>, port: String) -> Result<PortDetails, ProfileError> {
    let record = name_service
        .describe_port(&port)
        .await
        .map_err(|err| ProfileError::from_detail_fetch(&port, err))?;

    record
        .validate(&port)
        .map_err(|defect| ProfileError::MalformedDetail {
            port: port.clone(),
            reason: defect.to_string(),
        })?;

    Ok(record)
}
