//! # dpp CLI entry point
//!
//! Parses command-line arguments, initialises tracing, loads the run
//! configuration and dispatches to the subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dpp_cli::schema::{run_check_schema, CheckSchemaArgs};
use dpp_cli::validate::{run_validate, ValidateArgs};
use dpp_cli::{load_config, EXIT_OPERATIONAL};

/// Digital Product Passport validator.
///
/// Checks passport documents against the passport JSON Schema and against
/// the material-share rules the schema cannot express.
#[derive(Parser, Debug)]
#[command(name = "dpp", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate passport documents against the schema and semantic rules.
    Validate(ValidateArgs),

    /// Check that the schema itself is well-formed.
    CheckSchema(CheckSchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "dpp starting");

    let result = load_config(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::Validate(args) => run_validate(args, config),
        Commands::CheckSchema(args) => run_check_schema(args, config),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_OPERATIONAL)
        }
    }
}
