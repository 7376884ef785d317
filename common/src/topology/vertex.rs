use std::fmt;

use serde::Serialize;

use crate::graph::Identify;
use crate::properties::Properties;

use super::details::ProcessInfo;
use super::{HIDDEN, ORPHAN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VertexKind {
    Process,
    Port,
}

impl VertexKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VertexKind::Process => "process",
            VertexKind::Port => "port",
        }
    }
}

/// Identity of a topology vertex. A port and a process never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VertexKey {
    Port(String),
    Process { hostname: String, pid: i32 },
}

impl VertexKey {
    pub fn port(name: &str) -> Self {
        VertexKey::Port(name.to_string())
    }

    pub fn process(hostname: &str, pid: i32) -> Self {
        VertexKey::Process {
            hostname: hostname.to_string(),
            pid,
        }
    }
}

impl fmt::Display for VertexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexKey::Port(name) => f.write_str(name),
            VertexKey::Process { hostname, pid } => write!(f, "{hostname}:{pid}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortVertex {
    name: String,
    pub properties: Properties,
}

impl PortVertex {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            properties: Properties::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessVertex {
    hostname: String,
    pid: i32,
    pub properties: Properties,
}

impl ProcessVertex {
    pub fn new(hostname: &str, pid: i32) -> Self {
        Self {
            hostname: hostname.to_string(),
            pid,
            properties: Properties::new(),
        }
    }

    /// Builds the vertex and copies the descriptive fields of `info`.
    /// Empty strings and `-1` (unknown) values are left out.
    pub fn from_info(info: &ProcessInfo) -> Self {
        let mut vertex = Self::new(&info.hostname, info.pid);
        let props = &mut vertex.properties;
        for (key, value) in [("name", &info.name), ("arguments", &info.arguments), ("os", &info.os)] {
            if !value.is_empty() {
                props.put(key, value.as_str());
            }
        }
        for (key, value) in [("priority", info.priority), ("policy", info.policy)] {
            if value != -1 {
                props.put(key, value);
            }
        }
        vertex
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn pid(&self) -> i32 {
        self.pid
    }

    /// Process name if the name service reported one.
    pub fn name(&self) -> Option<&str> {
        self.properties.get_str("name")
    }
}

/// A node of the topology graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Vertex {
    Port(PortVertex),
    Process(ProcessVertex),
}

impl Vertex {
    pub fn port(name: &str) -> Self {
        Vertex::Port(PortVertex::new(name))
    }

    pub fn process(hostname: &str, pid: i32) -> Self {
        Vertex::Process(ProcessVertex::new(hostname, pid))
    }

    pub fn kind(&self) -> VertexKind {
        match self {
            Vertex::Port(_) => VertexKind::Port,
            Vertex::Process(_) => VertexKind::Process,
        }
    }

    pub fn properties(&self) -> &Properties {
        match self {
            Vertex::Port(p) => &p.properties,
            Vertex::Process(p) => &p.properties,
        }
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        match self {
            Vertex::Port(p) => &mut p.properties,
            Vertex::Process(p) => &mut p.properties,
        }
    }

    /// The full attribute set: `type`, identity fields, then the bag.
    pub fn attributes(&self) -> Properties {
        let mut attrs = self.properties().clone();
        attrs.put("type", self.kind().as_str());
        match self {
            Vertex::Port(p) => {
                attrs.put("name", p.name());
            }
            Vertex::Process(p) => {
                attrs.put("hostname", p.hostname());
                attrs.put("pid", p.pid());
            }
        }
        attrs
    }

    /// Human readable name: the port name, or the process name falling back
    /// to `hostname:pid`.
    pub fn label(&self) -> String {
        match self {
            Vertex::Port(p) => p.name().to_string(),
            Vertex::Process(p) => match p.name() {
                Some(name) => name.to_string(),
                None => self.key().to_string(),
            },
        }
    }

    pub fn as_port(&self) -> Option<&PortVertex> {
        match self {
            Vertex::Port(p) => Some(p),
            Vertex::Process(_) => None,
        }
    }

    pub fn as_process(&self) -> Option<&ProcessVertex> {
        match self {
            Vertex::Process(p) => Some(p),
            Vertex::Port(_) => None,
        }
    }

    pub fn is_orphan(&self) -> bool {
        self.properties().check(ORPHAN)
    }

    pub fn is_hidden(&self) -> bool {
        self.properties().check(HIDDEN)
    }
}

impl Identify for Vertex {
    type Key = VertexKey;

    fn key(&self) -> VertexKey {
        match self {
            Vertex::Port(p) => VertexKey::Port(p.name.clone()),
            Vertex::Process(p) => VertexKey::Process {
                hostname: p.hostname.clone(),
                pid: p.pid,
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
