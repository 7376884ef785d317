use busviz_common::config::Config;
use busviz_common::graph::VertexId;
use busviz_common::topology::{ORPHAN, PortDetails, ProcessVertex, TopologyGraph, Vertex};
use colored::*;

use crate::mprint;
use crate::terminal::{colors, print};

type Detail = (String, ColoredString);

/// Prints the "Modules" and "Ports" trees: every visible process with the
/// ports it owns, then every visible, non-orphan port with its links.
pub fn print_topology(graph: &TopologyGraph, cfg: &Config) {
    let modules: Vec<_> = graph
        .processes()
        .filter(|(id, _)| is_visible(graph, *id))
        .collect();
    let ports: Vec<_> = graph
        .ports()
        .filter(|(id, port)| is_visible(graph, *id) && !port.properties.check(ORPHAN))
        .collect();

    print::header("Modules", cfg.quiet);
    for (idx, (id, process)) in modules.iter().enumerate() {
        print::tree_head(idx, &process_label(process));
        print::as_tree_one_level(&process_details(graph, *id, process));
        if idx + 1 != modules.len() {
            mprint!();
        }
    }

    if !modules.is_empty() && !ports.is_empty() {
        mprint!();
    }

    print::header("Ports", cfg.quiet);
    for (idx, (id, port)) in ports.iter().enumerate() {
        print::tree_head(idx, &port.name().color(colors::PORT));
        print::as_tree_one_level(&port_links(graph, *id));
        if idx + 1 != ports.len() {
            mprint!();
        }
    }
}

fn is_visible(graph: &TopologyGraph, id: VertexId) -> bool {
    graph.vertex(id).is_some_and(|v| !v.is_hidden())
}

fn process_label(process: &ProcessVertex) -> ColoredString {
    match process.name() {
        Some(name) => name.color(colors::PROCESS).bold(),
        None => format!("{}:{}", process.hostname(), process.pid())
            .color(colors::PROCESS)
            .bold(),
    }
}

fn process_details(graph: &TopologyGraph, id: VertexId, process: &ProcessVertex) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![
        ("Host".to_string(), process.hostname().normal()),
        ("PID".to_string(), process.pid().to_string().normal()),
    ];

    for key in ["os", "arguments"] {
        if let Some(value) = process.properties.get_str(key) {
            details.push((capitalize(key), value.normal()));
        }
    }
    for key in ["priority", "policy"] {
        if let Some(value) = process.properties.get_int(key) {
            details.push((capitalize(key), value.to_string().normal()));
        }
    }

    for port in graph.ports_of(id) {
        let Some(vertex) = graph.vertex(port).filter(|v| !v.is_hidden()) else {
            continue;
        };
        let dir = graph
            .in_edges(port)
            .find_map(|e| e.payload.dir())
            .map(|d| d.as_str())
            .unwrap_or("unknown");
        details.push((
            "Port".to_string(),
            format!("{} {}", vertex.label().color(colors::PORT), format!("({dir})").dimmed()).normal(),
        ));
    }
    details
}

fn port_links(graph: &TopologyGraph, id: VertexId) -> Vec<Detail> {
    let mut details = Vec::new();

    match graph.owner_of(id).and_then(|owner| graph.vertex(owner)) {
        Some(owner) => details.push(("Owner".to_string(), owner.label().color(colors::PROCESS))),
        None => details.push(("Owner".to_string(), "not scanned".dimmed())),
    }

    for edge in graph.out_edges(id) {
        if let (Some(carrier), Some(peer)) = (edge.payload.carrier(), graph.vertex(edge.target)) {
            details.push(("Out".to_string(), link(peer, carrier)));
        }
    }
    for edge in graph.in_edges(id) {
        if let (Some(carrier), Some(peer)) = (edge.payload.carrier(), graph.vertex(edge.source)) {
            details.push(("In".to_string(), link(peer, carrier)));
        }
    }
    details
}

fn link(peer: &Vertex, carrier: &str) -> ColoredString {
    format!(
        "{} {}",
        peer.label().color(colors::PORT),
        format!("[{carrier}]").color(colors::CARRIER)
    )
    .normal()
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Line-per-field rendering of one port record.
pub fn port_details(details: &PortDetails) -> Vec<Detail> {
    let owner = &details.owner;
    let unknown = |value: &str| -> ColoredString {
        if value.is_empty() {
            "unknown".dimmed()
        } else {
            value.normal()
        }
    };
    let number = |value: i32| -> ColoredString {
        if value == -1 {
            "unknown".dimmed()
        } else {
            value.to_string().normal()
        }
    };

    vec![
        ("Name".to_string(), unknown(&owner.name)),
        ("Arguments".to_string(), unknown(&owner.arguments)),
        ("Hostname".to_string(), unknown(&owner.hostname)),
        ("PID".to_string(), number(owner.pid)),
        ("OS".to_string(), unknown(&owner.os)),
        ("Priority".to_string(), number(owner.priority)),
        ("Policy".to_string(), number(owner.policy)),
    ]
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
