use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use busviz_common::config::Config;
use busviz_common::name_service::NameService;
use busviz_core::export::{dot, json};
use busviz_core::snapshot::SnapshotNameService;
use busviz_core::{NetworkProfiler, ProfileError};
use serde_json::Value;

const BUS: &str = r#"{
    "ports": [
        { "name": "/grabber/out",
          "outputs": [ { "name": "/viewer/in", "carrier": "tcp" },
                       { "name": "/recorder/in", "carrier": "shmem" } ],
          "owner": { "name": "grabber", "arguments": "--fps 30", "os": "linux",
                     "hostname": "node1", "pid": 100, "priority": 5, "policy": 0 } },
        { "name": "/viewer/in",
          "inputs": [ { "name": "/grabber/out", "carrier": "tcp" } ],
          "owner": { "name": "viewer", "hostname": "node2", "pid": 200 },
          "latency": 0.01 },
        { "name": "/recorder/in",
          "inputs": [ { "name": "/grabber/out", "carrier": "shmem" } ],
          "owner": { "name": "recorder", "hostname": "node2", "pid": 201 } },
        { "name": "/stale/port", "alive": false,
          "owner": { "hostname": "node3", "pid": 7 } },
        { "name": "/slow/port", "latency": 0.5,
          "owner": { "hostname": "node3", "pid": 8 } },
        { "name": "/broken", "owner": { "pid": "not a number" } },
        { "name": "/nobody" }
    ]
}"#;

async fn load() -> anyhow::Result<SnapshotNameService> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(BUS.as_bytes())?;
    SnapshotNameService::load(file.path()).await
}

#[tokio::test]
async fn snapshot_scan_cleans_then_builds_the_graph() -> anyhow::Result<()> {
    let profiler = NetworkProfiler::new(Arc::new(load().await?), Config::default());
    let topology = profiler.profile(None).await?;

    let report = topology.cleaned.clone().unwrap();
    assert_eq!(report.checked, 7);
    assert_eq!(report.removed, vec!["/stale/port", "/slow/port"]);

    assert_eq!(topology.listed, 5);
    assert_eq!(topology.diagnostics.len(), 1);
    assert!(matches!(
        &topology.diagnostics[0],
        ProfileError::MalformedDetail { port, .. } if port == "/broken"
    ));

    let graph = &topology.graph;
    assert_eq!(graph.processes().count(), 3);
    assert_eq!(graph.ports().count(), 4);
    assert_eq!(graph.connections().count(), 2);
    assert_eq!(graph.orphans().count(), 1);

    let grabber = graph.find_process("node1", 100).unwrap();
    let props = graph.vertex(grabber).unwrap().properties();
    assert_eq!(props.get_str("arguments"), Some("--fps 30"));
    assert_eq!(props.get_int("priority"), Some(5));
    assert_eq!(props.get_int("policy"), Some(0));
    Ok(())
}

#[tokio::test]
async fn snapshot_scan_without_cleanup_sees_dead_ports() -> anyhow::Result<()> {
    let config = Config {
        clean: false,
        liveness_timeout: Duration::from_secs(1),
        ..Config::default()
    };
    let profiler = NetworkProfiler::new(Arc::new(load().await?), config);
    let topology = profiler.profile(None).await?;

    assert_eq!(topology.listed, 7);
    // the dead port does not answer, the slow one does
    assert_eq!(topology.diagnostics.len(), 2);
    assert!(matches!(
        topology.diagnostics[0],
        ProfileError::PortUnreachable { .. }
    ));
    assert!(topology.graph.find_port("/slow/port").is_some());
    assert!(topology.graph.find_port("/stale/port").is_none());
    Ok(())
}

#[tokio::test]
async fn liveness_timeout_controls_what_is_stale() -> anyhow::Result<()> {
    let ns = load().await?;
    let report = ns.unregister_stale(Duration::from_secs(1)).await?;
    assert_eq!(report.removed, vec!["/stale/port"]);
    Ok(())
}

#[tokio::test]
async fn exports_follow_the_scanned_graph() -> anyhow::Result<()> {
    let profiler = NetworkProfiler::new(Arc::new(load().await?), Config::default());
    let topology = profiler.profile(None).await?;

    let text = dot::render(&topology.graph, &dot::DotOptions::default());
    assert_eq!(text.matches("subgraph cluster_").count(), 3);
    assert!(text.contains("label=\"shmem\""));
    assert!(!text.contains("/nobody"));

    let doc: Value = serde_json::from_str(&json::render(&topology.graph)?)?;
    assert_eq!(doc["vertices"].as_array().map(Vec::len), Some(topology.graph.order()));
    assert_eq!(doc["edges"].as_array().map(Vec::len), Some(topology.graph.size()));
    Ok(())
}
