mod commands;
mod terminal;

use busviz_common::config::Config;
use commands::{CommandLine, Commands, inspect, ports, profile};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose, commands.quiet);
    print::banner(commands.quiet);

    let cfg = Config {
        quiet: commands.quiet,
        ..Config::default()
    };

    let result = match commands.command {
        Commands::Profile(args) => {
            print::header("profiling the bus", cfg.quiet);
            profile::profile(args, cfg.clone()).await
        }
        Commands::Ports { snapshot } => {
            print::header("registered ports", cfg.quiet);
            ports::ports(&snapshot, cfg.clone()).await
        }
        Commands::Inspect { snapshot, port } => {
            print::header("port details", cfg.quiet);
            inspect::inspect(&snapshot, &port, cfg.clone()).await
        }
    };

    if cfg.quiet == 0 {
        print::end_of_program();
    }
    result
}
