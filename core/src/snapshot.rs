//! # Snapshot Name Service
//!
//! A [`NameService`] answering from a captured directory dump instead of a
//! live bus. The dump is a JSON document:
//!
//! ```json
//! { "ports": [ { "name": "/cam", "outputs": [...], "inputs": [...], "owner": {...},
//!                "alive": true, "latency": 0.02 } ] }
//! ```
//!
//! Records stay raw until a port is described, so one broken record only
//! spoils that port.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use busviz_common::name_service::{CleanReport, NameService, NameServiceError};
use busviz_common::topology::PortDetails;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    ports: Vec<Value>,
}

#[derive(Debug)]
pub struct SnapshotNameService {
    records: RwLock<Vec<Value>>,
}

impl SnapshotNameService {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let file: SnapshotFile = serde_json::from_str(text)?;
        Ok(Self::from_records(file.ports))
    }

    pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing snapshot {}", path.display()))
    }

    /// Builds a snapshot of live, well-formed ports.
    pub fn from_details(details: &[PortDetails]) -> Self {
        let records = details
            .iter()
            .filter_map(|record| serde_json::to_value(record).ok())
            .collect();
        Self::from_records(records)
    }

    fn from_records(records: Vec<Value>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn name_of(record: &Value) -> Option<&str> {
    record.get("name").and_then(Value::as_str).filter(|name| !name.is_empty())
}

fn is_alive(record: &Value) -> bool {
    record.get("alive").and_then(Value::as_bool).unwrap_or(true)
}

fn latency_of(record: &Value) -> f64 {
    record.get("latency").and_then(Value::as_f64).unwrap_or(0.0)
}

fn is_stale(record: &Value, timeout: Duration) -> bool {
    !is_alive(record) || latency_of(record) > timeout.as_secs_f64()
}

#[async_trait]
impl NameService for SnapshotNameService {
    async fn list_ports(&self) -> Result<Vec<String>, NameServiceError> {
        let records = self.records.read().await;
        let mut names = Vec::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            match name_of(record) {
                Some(name) => names.push(name.to_string()),
                None => warn!("Ignoring snapshot record #{idx} without a port name"),
            }
        }
        Ok(names)
    }

    async fn describe_port(&self, name: &str) -> Result<PortDetails, NameServiceError> {
        let records = self.records.read().await;
        let record = records
            .iter()
            .find(|record| name_of(record) == Some(name))
            .ok_or_else(|| NameServiceError::NotFound(name.to_string()))?;

        if !is_alive(record) {
            return Err(NameServiceError::Unreachable(format!("{name} does not answer")));
        }

        serde_json::from_value(record.clone()).map_err(|err| NameServiceError::Malformed {
            port: name.to_string(),
            reason: err.to_string(),
        })
    }

    async fn unregister_stale(&self, timeout: Duration) -> Result<CleanReport, NameServiceError> {
        let mut records = self.records.write().await;
        let mut report = CleanReport {
            checked: records.len(),
            ..CleanReport::default()
        };

        records.retain(|record| {
            let Some(name) = name_of(record) else {
                return true;
            };
            if is_stale(record, timeout) {
                debug!("Unregistering {name}");
                report.removed.push(name.to_string());
                false
            } else {
                true
            }
        });

        Ok(report)
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
