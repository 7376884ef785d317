use std::collections::HashMap;
use std::ops::ControlFlow;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use busviz_common::name_service::{CleanReport, NameService, NameServiceError};
use busviz_common::topology::{PortDetails, ProcessInfo};

/// Scripted name service that records every call it receives.
#[derive(Default)]
pub struct MockBus {
    ports: Vec<String>,
    answers: HashMap<String, Result<PortDetails, NameServiceError>>,
    delays: HashMap<String, Duration>,
    list_error: Option<NameServiceError>,
    clean_error: Option<NameServiceError>,
    stale: Vec<String>,
    stuck: Vec<String>,
    pub list_calls: AtomicUsize,
    pub clean_calls: AtomicUsize,
    pub describe_calls: Mutex<Vec<String>>,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn port(mut self, details: PortDetails) -> Self {
        self.ports.push(details.name.clone());
        self.answers.insert(details.name.clone(), Ok(details));
        self
    }

    /// Listed, but gone by the time it is described.
    pub fn vanished(mut self, name: &str) -> Self {
        self.ports.push(name.to_string());
        self.answers
            .insert(name.to_string(), Err(NameServiceError::NotFound(name.to_string())));
        self
    }

    pub fn unreachable(mut self, name: &str) -> Self {
        self.ports.push(name.to_string());
        self.answers.insert(
            name.to_string(),
            Err(NameServiceError::Unreachable("connection refused".into())),
        );
        self
    }

    /// Listed under `name` but answers with `details`.
    pub fn answering(mut self, name: &str, details: PortDetails) -> Self {
        self.ports.push(name.to_string());
        self.answers.insert(name.to_string(), Ok(details));
        self
    }

    pub fn delay(mut self, name: &str, delay: Duration) -> Self {
        self.delays.insert(name.to_string(), delay);
        self
    }

    pub fn stale(mut self, name: &str) -> Self {
        self.stale.push(name.to_string());
        self
    }

    /// Dead, but the name server refuses to drop it.
    pub fn failing_unregister(mut self, name: &str) -> Self {
        self.stuck.push(name.to_string());
        self
    }

    pub fn offline(mut self) -> Self {
        self.list_error = Some(NameServiceError::Unreachable("no name server".into()));
        self
    }

    pub fn failing_clean(mut self) -> Self {
        self.clean_error = Some(NameServiceError::Unreachable("clean refused".into()));
        self
    }

    pub fn described(&self) -> Vec<String> {
        self.describe_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NameService for MockBus {
    async fn list_ports(&self) -> Result<Vec<String>, NameServiceError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        match &self.list_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.ports.clone()),
        }
    }

    async fn describe_port(&self, name: &str) -> Result<PortDetails, NameServiceError> {
        self.describe_calls.lock().unwrap().push(name.to_string());
        if let Some(delay) = self.delays.get(name) {
            tokio::time::sleep(*delay).await;
        }
        self.answers
            .get(name)
            .cloned()
            .unwrap_or_else(|| Err(NameServiceError::NotFound(name.to_string())))
    }

    async fn unregister_stale(&self, _timeout: Duration) -> Result<CleanReport, NameServiceError> {
        self.clean_calls.fetch_add(1, Ordering::SeqCst);
        match &self.clean_error {
            Some(err) => Err(err.clone()),
            None => Ok(CleanReport {
                checked: self.ports.len(),
                removed: self.stale.clone(),
                failed: self
                    .stuck
                    .iter()
                    .map(|name| (name.clone(), "permission denied".to_string()))
                    .collect(),
            }),
        }
    }
}

pub fn owned(name: &str, host: &str, pid: i32) -> PortDetails {
    PortDetails::new(name).with_owner(ProcessInfo::new(host, pid))
}

/// A writer feeding two readers on another process, plus a logger nobody owns.
pub fn camera_bus() -> MockBus {
    MockBus::new()
        .port(owned("/cam", "node1", 10).with_output("/view", "tcp").with_output("/rec", "udp"))
        .port(owned("/view", "node2", 20).with_input("/cam", "tcp"))
        .port(owned("/rec", "node2", 20).with_input("/cam", "udp"))
        .port(PortDetails::new("/log").with_input("/cam", "text"))
}

/// Sink recording every value it receives.
pub fn recorder(seen: &mut Vec<u8>) -> impl FnMut(u8) -> ControlFlow<()> + '_ {
    move |p| {
        seen.push(p);
        ControlFlow::Continue(())
    }
}
