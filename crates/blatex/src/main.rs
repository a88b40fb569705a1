//! blatex CLI - directive scanner and renderer.
//!
//! Provides commands for:
//! - `scan`: List the directives located in a markup file
//! - `render`: Substitute directives with the configured fragment templates

mod commands;
mod error;
mod output;
mod templates;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{RenderArgs, ScanArgs};
use output::Output;

/// blatex - directive scanner and renderer.
#[derive(Parser)]
#[command(name = "blatex", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List directives located in a markup file.
    Scan(ScanArgs),
    /// Render a markup file, substituting directives.
    Render(RenderArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Scan(args) => args.input.verbose,
        Commands::Render(args) => args.input.verbose,
    };

    // --verbose enables DEBUG level, otherwise use RUST_LOG
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Scan(args) => args.execute(),
        Commands::Render(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
