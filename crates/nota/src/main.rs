//! Nota CLI - Notion-backed static site generator.
//!
//! Provides commands for:
//! - `build`: Build the site into `public/`

mod commands;
mod error;
mod report;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::BuildArgs;
use report::Reporter;

/// Nota - Notion-backed static site generator.
#[derive(Parser)]
#[command(name = "nota", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site.
    Build(BuildArgs),
}

fn main() {
    let cli = Cli::parse();
    let report = Reporter::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Build(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
    };

    if let Err(err) = result {
        report.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
