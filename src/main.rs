use clap::Parser;

use h5graph::cli::commands::{init, inspect, verify};
use h5graph::cli::{Cli, Commands};
use h5graph::Settings;

fn main() {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    h5graph::logging::init_with_config(&settings.logging);

    if cli.info {
        eprintln!("h5graph {}", env!("CARGO_PKG_VERSION"));
    }

    match cli.command {
        Commands::Init { force } => init::run_init(force),
        Commands::Config => init::run_config(&settings),
        Commands::Inspect { path, json, max_depth } => inspect::run_inspect(&path, json, max_depth),
        Commands::Verify { path } => verify::run_verify(&path),
    }
}
