//! Per-port records fetched from the name service.
//!
//! These are working records of a scan. They are folded into a topology graph
//! and are not stored in it.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pid reported for a port whose owner could not be resolved.
pub const UNKNOWN_PID: i32 = -1;

/// One end of a port-to-port connection as seen from the described port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    pub name: String,
    #[serde(default)]
    pub carrier: String,
}

impl ConnectionInfo {
    pub fn new(name: &str, carrier: &str) -> Self {
        Self {
            name: name.to_string(),
            carrier: carrier.to_string(),
        }
    }
}

/// Process hosting a port, together with its scheduling attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessInfo {
    pub name: String,
    pub arguments: String,
    pub os: String,
    pub hostname: String,
    pub pid: i32,
    pub priority: i32,
    pub policy: i32,
}

impl Default for ProcessInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            arguments: String::new(),
            os: String::new(),
            hostname: String::new(),
            pid: UNKNOWN_PID,
            priority: -1,
            policy: -1,
        }
    }
}

impl ProcessInfo {
    pub fn new(hostname: &str, pid: i32) -> Self {
        Self {
            hostname: hostname.to_string(),
            pid,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// `false` when the name service could not tell who owns the port.
    pub fn is_known(&self) -> bool {
        self.pid != UNKNOWN_PID
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DetailDefect {
    #[error("port name is empty")]
    EmptyName,
    #[error("asked for {requested} but got a record for {reported}")]
    NameMismatch { requested: String, reported: String },
    #[error("{direction} connection #{index} has no peer name")]
    EmptyPeer { direction: &'static str, index: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortDetails {
    pub name: String,
    #[serde(default)]
    pub outputs: Vec<ConnectionInfo>,
    #[serde(default)]
    pub inputs: Vec<ConnectionInfo>,
    #[serde(default)]
    pub owner: ProcessInfo,
}

impl PortDetails {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_owner(mut self, owner: ProcessInfo) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_output(mut self, name: &str, carrier: &str) -> Self {
        self.outputs.push(ConnectionInfo::new(name, carrier));
        self
    }

    pub fn with_input(mut self, name: &str, carrier: &str) -> Self {
        self.inputs.push(ConnectionInfo::new(name, carrier));
        self
    }

    /// Checks that the record can be folded as the details of `requested`.
    pub fn validate(&self, requested: &str) -> Result<(), DetailDefect> {
        if self.name.is_empty() {
            return Err(DetailDefect::EmptyName);
        }
        if self.name != requested {
            return Err(DetailDefect::NameMismatch {
                requested: requested.to_string(),
                reported: self.name.clone(),
            });
        }
        let peers = [("outbound", &self.outputs), ("inbound", &self.inputs)];
        for (direction, conns) in peers {
            if let Some(index) = conns.iter().position(|c| c.name.is_empty()) {
                return Err(DetailDefect::EmptyPeer { direction, index });
            }
        }
        Ok(())
    }
}

impl fmt::Display for PortDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "port name: {}", self.name)?;
        writeln!(f, "outputs:")?;
        for conn in &self.outputs {
            writeln!(f, "   + {} ({})", conn.name, conn.carrier)?;
        }
        writeln!(f, "inputs:")?;
        for conn in &self.inputs {
            writeln!(f, "   + {} ({})", conn.name, conn.carrier)?;
        }
        writeln!(f, "owner:")?;
        writeln!(f, "   + name:      {}", self.owner.name)?;
        writeln!(f, "   + arguments: {}", self.owner.arguments)?;
        writeln!(f, "   + hostname:  {}", self.owner.hostname)?;
        writeln!(f, "   + priority:  {}", self.owner.priority)?;
        writeln!(f, "   + policy:    {}", self.owner.policy)?;
        writeln!(f, "   + os:        {}", self.owner.os)?;
        writeln!(f, "   + pid:       {}", self.owner.pid)
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
