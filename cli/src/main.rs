mod cli;
mod commands;
mod telemetry;

use cli::{Cli, Commands};
use commands::{prepare, scenario, validate};

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    telemetry::init(cli.verbose);
    match &cli.command {
        Commands::Precincts(args) => prepare::precincts(&cli, args),
        Commands::Sites(args) => prepare::sites(&cli, args),
        Commands::Districts(args) => prepare::districts(&cli, args),
        Commands::Upzone(args) => prepare::upzone(&cli, args),
        Commands::All(args) => prepare::all(&cli, args),
        Commands::Validate(args) => validate::run(&cli, args),
        Commands::Scenario(args) => scenario::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
