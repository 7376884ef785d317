use busviz_common::graph::GraphError;
use busviz_common::name_service::NameServiceError;
use thiserror::Error;

/// Failures of a discovery run.
///
/// Only [`ProfileError::DiscoveryUnavailable`] and [`ProfileError::Graph`] end
/// a scan. Every other variant concerns a single port: the port is skipped and
/// the error is kept as a diagnostic.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("name service unavailable: {0}")]
    DiscoveryUnavailable(String),

    #[error("port {port} vanished before it could be described")]
    PortVanished { port: String },

    #[error("could not describe {port}: {reason}")]
    PortUnreachable { port: String, reason: String },

    #[error("malformed details for {port}: {reason}")]
    MalformedDetail { port: String, reason: String },

    #[error("detail fetch aborted: {0}")]
    FetchAborted(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl ProfileError {
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ProfileError::DiscoveryUnavailable(_) | ProfileError::Graph(_))
    }

    /// The port a per-item error is about.
    pub fn port(&self) -> Option<&str> {
        match self {
            ProfileError::PortVanished { port }
            | ProfileError::PortUnreachable { port, .. }
            | ProfileError::MalformedDetail { port, .. } => Some(port),
            _ => None,
        }
    }

    /// Maps a failed `describe_port` call for `port`.
    pub(crate) fn from_detail_fetch(port: &str, err: NameServiceError) -> Self {
        match err {
            NameServiceError::NotFound(_) => ProfileError::PortVanished {
                port: port.to_string(),
            },
            NameServiceError::Malformed { reason, .. } => ProfileError::MalformedDetail {
                port: port.to_string(),
                reason,
            },
            NameServiceError::Unreachable(reason) => ProfileError::PortUnreachable {
                port: port.to_string(),
                reason,
            },
        }
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
