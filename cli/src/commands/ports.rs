use std::path::Path;
use std::sync::Arc;

use busviz_common::config::Config;
use busviz_core::NetworkProfiler;
use busviz_core::snapshot::SnapshotNameService;
use colored::*;

use crate::terminal::{colors, print};

pub async fn ports(snapshot: &Path, cfg: Config) -> anyhow::Result<()> {
    let name_service = SnapshotNameService::load(snapshot).await?;
    let profiler = NetworkProfiler::new(Arc::new(name_service), cfg.clone());

    let ports = profiler.list_ports().await?;
    if ports.is_empty() {
        print::header("NO PORTS DETECTED", cfg.quiet);
        print::no_results();
        return Ok(());
    }

    for (idx, port) in ports.iter().enumerate() {
        match cfg.quiet {
            0 | 1 => print::tree_head(idx, &port.color(colors::PORT)),
            _ => print::print(port),
        }
    }

    if cfg.quiet == 0 {
        print::fat_separator();
        let count: ColoredString = format!("{} ports", ports.len()).bold().green();
        print::centerln(&format!("Listing Complete: {count} registered"));
    }
    Ok(())
}
