use std::path::Path;
use std::sync::Arc;

use busviz_common::config::Config;
use busviz_common::topology::{ConnectionInfo, PortDetails};
use busviz_core::NetworkProfiler;
use busviz_core::snapshot::SnapshotNameService;
use colored::*;

use crate::mprint;
use crate::terminal::{colors, format, print};

pub async fn inspect(snapshot: &Path, port: &str, cfg: Config) -> anyhow::Result<()> {
    let name_service = SnapshotNameService::load(snapshot).await?;
    let profiler = NetworkProfiler::new(Arc::new(name_service), cfg.clone());

    let details = profiler.get_port_details(port).await?;
    print_details(&details, &cfg);
    Ok(())
}

fn print_details(details: &PortDetails, cfg: &Config) {
    if cfg.quiet > 1 {
        details.to_string().lines().for_each(print::print);
        return;
    }

    print::tree_head(0, &details.name.color(colors::PORT).bold());
    print::as_tree_one_level(&format::port_details(details));

    for (title, conns) in [("Outputs", &details.outputs), ("Inputs", &details.inputs)] {
        mprint!();
        print::header(title, cfg.quiet);
        print_connections(conns);
    }
}

fn print_connections(conns: &[ConnectionInfo]) {
    if conns.is_empty() {
        print::print_status(format!("{}", "none".dimmed()));
        return;
    }

    let width = conns.iter().map(|c| c.name.len()).max().unwrap_or(0);
    for conn in conns {
        if conn.carrier.is_empty() {
            print::aligned_line(&conn.name, "unknown carrier", width);
        } else {
            print::aligned_line(&conn.name, conn.carrier.color(colors::CARRIER), width);
        }
    }
}
