mod cli;
mod commands;

use autohd::JsonFileStore;
use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store_path = match cli.store {
        Some(path) => path,
        None => commands::default_store_path()?,
    };
    let mut store = JsonFileStore::new(store_path);

    match cli.command {
        cli::Commands::Resolve { fps } => commands::resolve(&store, fps),
        cli::Commands::Show => commands::show(&store),
        cli::Commands::Set { fps, quality } => commands::set(&mut store, fps, &quality),
        cli::Commands::Reset => commands::reset(&mut store),
    }
}

/// Log to stderr so stdout stays machine-readable; RUST_LOG overrides the level
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
