use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use busviz_common::config::Config;
use busviz_common::topology::{EdgeKind, PortDetails, TopologyGraph, VertexKey};
use busviz_core::{NetworkProfiler, ProfileError};

use crate::util::{MockBus, camera_bus, owned, recorder};

fn profiler(bus: &Arc<MockBus>, config: Config) -> NetworkProfiler {
    NetworkProfiler::new(bus.clone(), config)
}

fn connections(graph: &TopologyGraph) -> Vec<(String, String, String)> {
    let mut pairs: Vec<_> = graph
        .connections()
        .map(|e| {
            (
                graph.vertex(e.source).unwrap().label(),
                graph.vertex(e.target).unwrap().label(),
                e.payload.carrier().unwrap().to_string(),
            )
        })
        .collect();
    pairs.sort();
    pairs
}

#[tokio::test]
async fn full_scan_builds_the_whole_topology() {
    let bus = Arc::new(camera_bus());
    let mut seen = Vec::new();

    let topology = profiler(&bus, Config::default())
        .profile(Some(&mut recorder(&mut seen)))
        .await
        .unwrap();

    let graph = &topology.graph;
    assert_eq!(graph.processes().count(), 2);
    assert_eq!(graph.ports().count(), 4);
    assert_eq!(graph.ownerships().count(), 3);
    assert_eq!(
        connections(graph),
        vec![
            ("/cam".into(), "/log".into(), "text".into()),
            ("/cam".into(), "/rec".into(), "udp".into()),
            ("/cam".into(), "/view".into(), "tcp".into()),
        ]
    );

    let log = graph.vertex_by_key(&VertexKey::port("/log")).unwrap();
    assert!(log.is_orphan());

    assert!(!topology.cancelled);
    assert!(topology.diagnostics.is_empty());
    assert_eq!(topology.listed, 4);
    assert_eq!(bus.clean_calls.load(Ordering::SeqCst), 1);
    assert!(topology.cleaned.is_some());

    assert_eq!(seen.first(), Some(&0));
    assert_eq!(seen.last(), Some(&100));
    assert!(seen.contains(&5) && seen.contains(&10));
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    // start, clean, listing, four fetches, fold
    assert_eq!(seen.len(), 8);
}

#[tokio::test]
async fn details_come_back_in_listing_order() {
    let bus = Arc::new(camera_bus());
    let topology = profiler(&bus, Config::default()).profile(None).await.unwrap();

    let names: Vec<_> = topology.details.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["/cam", "/view", "/rec", "/log"]);
    assert_eq!(bus.described(), vec!["/cam", "/view", "/rec", "/log"]);
}

#[tokio::test]
async fn vanished_port_is_skipped_and_reported() {
    let bus = Arc::new(
        MockBus::new()
            .port(owned("/a", "h", 1))
            .vanished("/ghost")
            .port(owned("/b", "h", 1)),
    );

    let topology = profiler(&bus, Config::default()).profile(None).await.unwrap();

    assert_eq!(topology.details.len(), 2);
    assert_eq!(topology.diagnostics.len(), 1);
    assert!(matches!(
        &topology.diagnostics[0],
        ProfileError::PortVanished { port } if port == "/ghost"
    ));
    assert!(topology.graph.find_port("/ghost").is_none());
    assert_eq!(topology.graph.ports().count(), 2);
}

#[tokio::test]
async fn unreachable_and_malformed_ports_are_recoverable() {
    let bus = Arc::new(
        MockBus::new()
            .unreachable("/down")
            .answering("/liar", PortDetails::new("/someone-else"))
            .answering("/blank", PortDetails::new("/blank").with_output("", "tcp"))
            .port(owned("/ok", "h", 1)),
    );

    let topology = profiler(&bus, Config::default()).profile(None).await.unwrap();

    assert_eq!(topology.details.len(), 1);
    assert_eq!(topology.diagnostics.len(), 3);
    assert!(topology.diagnostics.iter().all(ProfileError::is_recoverable));
    assert!(matches!(topology.diagnostics[0], ProfileError::PortUnreachable { .. }));
    assert!(matches!(topology.diagnostics[1], ProfileError::MalformedDetail { .. }));
    assert!(matches!(topology.diagnostics[2], ProfileError::MalformedDetail { .. }));
    assert_eq!(topology.graph.order(), 2);
    assert!(topology.graph.find_port("/someone-else").is_none());
}

#[tokio::test]
async fn unreachable_name_service_is_fatal() {
    let bus = Arc::new(camera_bus().offline());
    let result = profiler(&bus, Config::default()).profile(None).await;

    assert!(matches!(result, Err(ProfileError::DiscoveryUnavailable(_))));
    assert!(bus.described().is_empty());
}

#[tokio::test]
async fn empty_bus_is_an_empty_graph() {
    let bus = Arc::new(MockBus::new());
    let mut seen = Vec::new();

    let topology = profiler(&bus, Config::default())
        .profile(Some(&mut recorder(&mut seen)))
        .await
        .unwrap();

    assert!(topology.graph.is_empty());
    assert!(topology.diagnostics.is_empty());
    assert_eq!(seen.last(), Some(&100));
}

#[tokio::test]
async fn failed_cleanup_does_not_stop_the_scan() {
    let bus = Arc::new(camera_bus().failing_clean());
    let topology = profiler(&bus, Config::default()).profile(None).await.unwrap();

    assert!(topology.cleaned.is_none());
    assert_eq!(topology.graph.ports().count(), 4);
}

#[tokio::test]
async fn entry_that_cannot_be_unregistered_does_not_stop_the_scan() {
    let bus = Arc::new(camera_bus().stale("/old").failing_unregister("/zombie"));
    let topology = profiler(&bus, Config::default()).profile(None).await.unwrap();

    let report = topology.cleaned.clone().unwrap();
    assert_eq!(report.removed, vec!["/old"]);
    assert_eq!(
        report.failed,
        vec![("/zombie".to_string(), "permission denied".to_string())]
    );
    assert_eq!(bus.list_calls.load(Ordering::SeqCst), 1);
    assert_eq!(topology.listed, 4);
    assert_eq!(topology.graph.ports().count(), 4);
}

#[tokio::test]
async fn cleanup_can_be_disabled() {
    let bus = Arc::new(camera_bus().stale("/old"));
    let config = Config {
        clean: false,
        ..Config::default()
    };
    let mut seen = Vec::new();

    let topology = profiler(&bus, config)
        .profile(Some(&mut recorder(&mut seen)))
        .await
        .unwrap();

    assert_eq!(bus.clean_calls.load(Ordering::SeqCst), 0);
    assert!(topology.cleaned.is_none());
    assert!(!seen.contains(&5));
}

#[tokio::test]
async fn cleanup_report_is_returned() {
    let bus = Arc::new(camera_bus().stale("/old"));
    let topology = profiler(&bus, Config::default()).profile(None).await.unwrap();

    let report = topology.cleaned.unwrap();
    assert_eq!(report.removed, vec!["/old"]);
    assert_eq!(report.checked, 4);
}

#[tokio::test]
async fn cancelling_after_two_fetches_keeps_exactly_two() {
    let bus = Arc::new(
        MockBus::new()
            .port(owned("/a", "h", 1).with_output("/b", "tcp"))
            .port(owned("/b", "h", 2).with_input("/a", "tcp"))
            .port(owned("/c", "h", 3))
            .port(owned("/d", "h", 4))
            .port(owned("/e", "h", 5)),
    );

    let mut fetched = 0;
    let mut sink = |p: u8| {
        if p > 10 && p < 100 {
            fetched += 1;
            if fetched == 2 {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    };

    let topology = profiler(&bus, Config::default())
        .profile(Some(&mut sink))
        .await
        .unwrap();

    assert!(topology.cancelled);
    assert_eq!(bus.described(), vec!["/a", "/b"]);
    assert_eq!(topology.details.len(), 2);
    assert_eq!(topology.listed, 5);
    assert_eq!(topology.graph.processes().count(), 2);
    assert_eq!(topology.graph.ports().count(), 2);
    assert_eq!(topology.graph.connections().count(), 1);
}

#[tokio::test]
async fn cancelling_at_start_skips_everything() {
    let bus = Arc::new(camera_bus());
    let mut sink = |_: u8| ControlFlow::Break(());

    let topology = profiler(&bus, Config::default())
        .profile(Some(&mut sink))
        .await
        .unwrap();

    assert!(topology.cancelled);
    assert!(topology.graph.is_empty());
    assert_eq!(bus.list_calls.load(Ordering::SeqCst), 0);
    assert_eq!(bus.clean_calls.load(Ordering::SeqCst), 0);
    assert!(bus.described().is_empty());
}

#[tokio::test]
async fn cancelling_after_listing_describes_nothing() {
    let bus = Arc::new(camera_bus());
    let mut sink = |p: u8| {
        if p >= 10 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    };

    let topology = profiler(&bus, Config::default())
        .profile(Some(&mut sink))
        .await
        .unwrap();

    assert!(topology.cancelled);
    assert_eq!(topology.listed, 4);
    assert!(topology.graph.is_empty());
    assert!(bus.described().is_empty());
}

#[tokio::test]
async fn concurrent_fetches_build_the_same_graph() {
    let slow_first = || {
        camera_bus()
            .delay("/cam", Duration::from_millis(40))
            .delay("/view", Duration::from_millis(20))
    };

    let sequential = profiler(&Arc::new(slow_first()), Config::default())
        .profile(None)
        .await
        .unwrap();

    let config = Config {
        jobs: 4,
        ..Config::default()
    };
    let concurrent = profiler(&Arc::new(slow_first()), config)
        .profile(None)
        .await
        .unwrap();

    assert_eq!(sequential.details, concurrent.details);
    assert_eq!(sequential.graph.order(), concurrent.graph.order());
    assert_eq!(sequential.graph.size(), concurrent.graph.size());
    assert_eq!(connections(&sequential.graph), connections(&concurrent.graph));
}

#[tokio::test]
async fn cancelling_concurrent_fetches_discards_in_flight_work() {
    let bus = Arc::new(
        camera_bus()
            .delay("/view", Duration::from_millis(200))
            .delay("/rec", Duration::from_millis(200))
            .delay("/log", Duration::from_millis(200)),
    );
    let config = Config {
        jobs: 3,
        ..Config::default()
    };
    let mut sink = |p: u8| {
        if p > 10 && p < 100 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    };

    let topology = profiler(&bus, config).profile(Some(&mut sink)).await.unwrap();

    assert!(topology.cancelled);
    assert_eq!(topology.details.len(), 1);
    assert_eq!(topology.details[0].name, "/cam");
    assert!(!bus.described().contains(&"/log".to_string()));
}

#[tokio::test]
async fn single_port_lookup_maps_errors() {
    let bus = Arc::new(
        MockBus::new()
            .port(owned("/a", "h", 1))
            .vanished("/gone")
            .unreachable("/down"),
    );
    let profiler = profiler(&bus, Config::default());

    assert_eq!(profiler.get_port_details("/a").await.unwrap().owner.pid, 1);
    assert!(matches!(
        profiler.get_port_details("/gone").await,
        Err(ProfileError::PortVanished { .. })
    ));
    assert!(matches!(
        profiler.get_port_details("/down").await,
        Err(ProfileError::PortUnreachable { .. })
    ));
}

#[tokio::test]
async fn listing_alone_reports_registered_names() {
    let bus = Arc::new(camera_bus());
    let ports = profiler(&bus, Config::default()).list_ports().await.unwrap();
    assert_eq!(ports, vec!["/cam", "/view", "/rec", "/log"]);

    let offline = Arc::new(MockBus::new().offline());
    assert!(profiler(&offline, Config::default()).list_ports().await.is_err());
}

#[tokio::test]
async fn ownership_edges_point_from_process_to_port() {
    let bus = Arc::new(camera_bus());
    let topology = profiler(&bus, Config::default()).profile(None).await.unwrap();
    let graph = &topology.graph;

    for edge in graph.edges() {
        let source = graph.vertex(edge.source).unwrap();
        let target = graph.vertex(edge.target).unwrap();
        match edge.payload.kind() {
            EdgeKind::Ownership => {
                assert!(source.as_process().is_some());
                assert!(target.as_port().is_some());
            }
            EdgeKind::Connection => {
                assert!(source.as_port().is_some());
                assert!(target.as_port().is_some());
            }
        }
    }

    let node2 = graph.find_process("node2", 20).unwrap();
    assert_eq!(graph.ports_of(node2).len(), 2);
}
