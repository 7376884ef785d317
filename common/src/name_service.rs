//! # Name Service Port
//!
//! The outbound boundary towards the message bus directory. Adapters answer
//! "which ports exist", "describe this port" and "forget dead registrations";
//! how they talk to the bus is their own business.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::topology::PortDetails;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameServiceError {
    /// The directory itself could not be contacted.
    #[error("name service unreachable: {0}")]
    Unreachable(String),
    /// The port is not (or no longer) registered.
    #[error("port {0} is not registered")]
    NotFound(String),
    /// The directory answered with something that is not a port description.
    #[error("malformed record for {port}: {reason}")]
    Malformed { port: String, reason: String },
}

/// Outcome of a stale-registration sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Registrations checked for liveness.
    pub checked: usize,
    /// Registrations removed because nothing answered in time.
    pub removed: Vec<String>,
    /// Dead registrations that could not be removed, with the reason.
    pub failed: Vec<(String, String)>,
}

#[async_trait]
pub trait NameService: Send + Sync {
    /// Lists every registered port name.
    async fn list_ports(&self) -> Result<Vec<String>, NameServiceError>;

    /// Fetches connections and owner of a single port.
    async fn describe_port(&self, name: &str) -> Result<PortDetails, NameServiceError>;

    /// Drops registrations whose process does not answer within `timeout`.
    async fn unregister_stale(&self, timeout: Duration) -> Result<CleanReport, NameServiceError>;
}
