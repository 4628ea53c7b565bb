mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{analyze, classify, isochrones};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);
    match &cli.command {
        Commands::Classify(args) => classify::run(&cli, args),
        Commands::Isochrones(args) => isochrones::run(&cli, args),
        Commands::Analyze(args) => analyze::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
