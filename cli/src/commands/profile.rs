use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

use anyhow::Context;
use busviz_common::config::Config;
use busviz_common::graph::Identify;
use busviz_common::topology::{TopologyGraph, VertexKey};
use busviz_core::export::{dot, json};
use busviz_core::snapshot::SnapshotNameService;
use busviz_core::{NetworkProfiler, Topology};
use colored::*;
use tracing::{Instrument, info, info_span, warn};

use crate::commands::{OutputFormat, ProfileArgs};
use crate::mprint;
use crate::terminal::input::InputHandle;
use crate::terminal::progress::ProgressBarSink;
use crate::terminal::{colors, format, print};

pub async fn profile(args: ProfileArgs, mut cfg: Config) -> anyhow::Result<()> {
    if args.output.is_some() && args.format == OutputFormat::Tree {
        anyhow::bail!("--output needs --format dot or --format json");
    }

    cfg.clean = !args.no_clean;
    cfg.liveness_timeout = args.liveness_timeout;
    cfg.jobs = args.jobs;

    let name_service = SnapshotNameService::load(&args.snapshot).await?;
    let profiler = NetworkProfiler::new(Arc::new(name_service), cfg.clone());

    let span = info_span!("scan", indicatif.pb_show = true);
    let input = InputHandle::start(Arc::new(AtomicBool::new(false)));
    let mut sink = ProgressBarSink::new(span.clone(), &input);

    let start_time = Instant::now();
    let result = profiler.profile(Some(&mut sink)).instrument(span.clone()).await;
    drop(sink);
    drop(input);
    drop(span);

    let mut topology = result?;
    hide_all(&mut topology.graph, &args.hide);

    match args.format {
        OutputFormat::Tree => print_tree(&topology, &cfg),
        OutputFormat::Dot => {
            let options = dot::DotOptions {
                splines: args.splines,
                cluster: !args.no_cluster,
                show_orphans: args.show_orphans,
            };
            emit(&dot::render(&topology.graph, &options), &args).await?;
        }
        OutputFormat::Json => emit(&json::render(&topology.graph)?, &args).await?,
    }

    print_diagnostics(&topology, &cfg);
    print_summary(&topology, start_time.elapsed(), &cfg);
    Ok(())
}

/// Marks every vertex matching `name` as hidden: a port name, a process name
/// or a `host:pid` pair.
fn hide_all(graph: &mut TopologyGraph, names: &[String]) {
    for name in names {
        let keys: Vec<VertexKey> = graph
            .vertices()
            .filter(|(_, v)| v.label() == *name || v.key().to_string() == *name)
            .map(|(_, v)| v.key())
            .collect();

        if keys.is_empty() {
            warn!("Nothing named {name} to hide");
        }
        for key in keys {
            graph.set_hidden(&key, true);
        }
    }
}

async fn emit(text: &str, args: &ProfileArgs) -> anyhow::Result<()> {
    match &args.output {
        Some(path) => {
            tokio::fs::write(path, text)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            info!("Graph written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            if !text.ends_with('\n') {
                writeln!(stdout)?;
            }
            stdout.flush()?;
        }
    }
    Ok(())
}

fn print_tree(topology: &Topology, cfg: &Config) {
    if topology.graph.is_empty() {
        print::header("NO PORTS DETECTED", cfg.quiet);
        print::no_results();
        return;
    }
    if cfg.quiet < 2 {
        format::print_topology(&topology.graph, cfg);
    }
}

fn print_diagnostics(topology: &Topology, cfg: &Config) {
    if topology.diagnostics.is_empty() || cfg.quiet > 1 {
        return;
    }

    let width = topology
        .diagnostics
        .iter()
        .filter_map(|diag| diag.port())
        .map(str::len)
        .max()
        .unwrap_or(1);

    mprint!();
    print::header("Skipped ports", cfg.quiet);
    for diag in &topology.diagnostics {
        let port = diag.port().unwrap_or("?");
        print::aligned_line(port, diag.to_string().color(colors::ACCENT), width);
    }
}

fn print_summary(topology: &Topology, total_time: Duration, cfg: &Config) {
    let graph = &topology.graph;
    let processes: ColoredString = format!("{} processes", graph.processes().count()).bold().green();
    let ports: ColoredString = format!("{} ports", graph.ports().count()).bold().green();
    let links: ColoredString = format!("{} connections", graph.connections().count()).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();

    let verdict = if topology.cancelled {
        format!(
            "Profiling Stopped ({}/{} ports scanned)",
            topology.details.len() + topology.diagnostics.len(),
            topology.listed
        )
        .yellow()
    } else {
        "Profiling Complete".normal()
    };
    let output = format!("{verdict}: {processes}, {ports}, {links} in {total_time}")
        .color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output.to_string());
        }
        _ => print::print(&output.to_string()),
    }
}
