pub mod inspect;
pub mod ports;
pub mod profile;

use std::path::PathBuf;
use std::time::Duration;

use busviz_core::export::dot::Splines;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "busviz")]
#[command(about = "A live topology viewer for publish/subscribe buses.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Print less (-q hides headers, -qq only keeps the summary)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the topology graph of the bus
    #[command(alias = "p")]
    Profile(ProfileArgs),
    /// List the registered ports
    #[command(alias = "l")]
    Ports { snapshot: PathBuf },
    /// Show what one port is connected to and who owns it
    #[command(alias = "i")]
    Inspect { snapshot: PathBuf, port: String },
}

#[derive(Args)]
pub struct ProfileArgs {
    /// Name service snapshot (JSON)
    pub snapshot: PathBuf,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Tree)]
    pub format: OutputFormat,

    /// Write the dot/json output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Do not unregister dead ports before scanning
    #[arg(long)]
    pub no_clean: bool,

    /// Seconds a port may take to answer before it counts as dead
    #[arg(long, value_name = "SECS", value_parser = parse_seconds, default_value = "0.1")]
    pub liveness_timeout: Duration,

    /// Port details fetched concurrently
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// Leave a port or process out of the output (port name, process name or host:pid)
    #[arg(long, value_name = "NAME")]
    pub hide: Vec<String>,

    /// Draw ports whose owner is unknown
    #[arg(long)]
    pub show_orphans: bool,

    /// Edge routing for dot output: ortho, polyline, line or curved
    #[arg(long, value_name = "STYLE", default_value_t = Splines::Ortho)]
    pub splines: Splines,

    /// Do not group ports with their process in dot output
    #[arg(long)]
    pub no_cluster: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Tree,
    Dot,
    Json,
}

fn parse_seconds(value: &str) -> Result<Duration, String> {
    let secs: f64 = value.parse().map_err(|e| format!("{e}"))?;
    Duration::try_from_secs_f64(secs).map_err(|_| format!("'{value}' is not a valid number of seconds"))
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
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
