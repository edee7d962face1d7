mod cli;
mod commands;

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};
use commands::{classify, export, optimize, options, view};

/// Log to stderr so command output on stdout stays machine-readable.
/// `RUST_LOG` wins over the `-v` count when set.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("solarsuit={level},solarsuit_cli={level}")));

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(true).with_writer(std::io::stderr).with_filter(filter))
        .init();
}

pub fn run() -> Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::View(args) => view::run(&cli, args),
        Commands::Options(args) => options::run(&cli, args),
        Commands::Export(args) => export::run(&cli, args),
        Commands::Optimize(args) => optimize::run(&cli, args),
        Commands::Classify(args) => classify::run(&cli, args),
    }
}

fn main() -> Result<()> { run() }
