//! modlayer - game mod installer
//!
//! Installs mod archives by running their FOMOD install wizards, either
//! straight into the game's Data directory or as a symlink overlay whose
//! ledger allows conflicts to be listed, verified and rolled back.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod archive;
mod cli;
mod commands;
mod common;
mod config;
mod error;
mod operations;
mod overlay;
mod plugins;
mod prompt;
mod ui;
mod wizard;

use cli::{Cli, Commands};

/// Log to stderr; `RUST_LOG` wins over `--log`
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();

    if cli.no_colors {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(&cli.paths, args),
        Commands::List(args) => commands::list::run(&cli.paths, args),
        Commands::Remove(args) => commands::remove::run(&cli.paths, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
