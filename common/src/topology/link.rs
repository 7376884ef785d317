use serde::Serialize;

use crate::properties::Properties;

use super::details::PortDetails;

/// Direction of the data handled by an owned port, from the owner's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnershipDir {
    In,
    Out,
    Unknown,
}

impl OwnershipDir {
    /// `out` for ports that send anywhere, `in` for receive-only ports and
    /// `unknown` for ports with no connection at all.
    pub fn of(details: &PortDetails) -> Self {
        if !details.outputs.is_empty() {
            OwnershipDir::Out
        } else if !details.inputs.is_empty() {
            OwnershipDir::In
        } else {
            OwnershipDir::Unknown
        }
    }

    /// Combines two observations of the same ownership: `out` beats `in`,
    /// and any known direction beats `unknown`.
    pub fn merge(self, other: OwnershipDir) -> Self {
        match (self, other) {
            (OwnershipDir::Out, _) | (_, OwnershipDir::Out) => OwnershipDir::Out,
            (OwnershipDir::In, _) | (_, OwnershipDir::In) => OwnershipDir::In,
            _ => OwnershipDir::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OwnershipDir::In => "in",
            OwnershipDir::Out => "out",
            OwnershipDir::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Ownership,
    Connection,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Ownership => "ownership",
            EdgeKind::Connection => "connection",
        }
    }
}

/// Payload of a topology edge.
///
/// The whole payload takes part in graph edge identity, so two connections
/// between the same ports over different carriers are distinct edges. The
/// fold keeps a single ownership edge per process and port and merges `dir`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Link {
    /// Process → Port.
    Ownership { dir: OwnershipDir },
    /// Port → Port, data flowing from source to target.
    Connection { carrier: String },
}

impl Link {
    pub fn ownership(dir: OwnershipDir) -> Self {
        Link::Ownership { dir }
    }

    pub fn connection(carrier: &str) -> Self {
        Link::Connection {
            carrier: carrier.to_string(),
        }
    }

    pub fn kind(&self) -> EdgeKind {
        match self {
            Link::Ownership { .. } => EdgeKind::Ownership,
            Link::Connection { .. } => EdgeKind::Connection,
        }
    }

    pub fn carrier(&self) -> Option<&str> {
        match self {
            Link::Connection { carrier } => Some(carrier),
            Link::Ownership { .. } => None,
        }
    }

    pub fn dir(&self) -> Option<OwnershipDir> {
        match self {
            Link::Ownership { dir } => Some(*dir),
            Link::Connection { .. } => None,
        }
    }

    /// Ownership edges of unknown direction stay in the graph but are not
    /// drawn or followed as ownership.
    pub fn is_traversable(&self) -> bool {
        !matches!(self, Link::Ownership { dir: OwnershipDir::Unknown })
    }

    /// The `type` / `dir` / `carrier` view consumers filter on.
    pub fn properties(&self) -> Properties {
        let props = Properties::new().with("type", self.kind().as_str());
        match self {
            Link::Ownership { dir } => props.with("dir", dir.as_str()),
            Link::Connection { carrier } => props.with("carrier", carrier.as_str()),
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
