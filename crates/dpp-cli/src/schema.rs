//! # Check-Schema Subcommand
//!
//! Runs only the schema precondition: load the schema, meta-validate it
//! against its declared draft, and compile it.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use dpp_core::RunConfig;
use dpp_schema::SchemaValidator;

use crate::report::write_schema_error;
use crate::{EXIT_INVALID, EXIT_OK};

/// Arguments for the `dpp check-schema` subcommand.
#[derive(Args, Debug, Default)]
pub struct CheckSchemaArgs {
    /// Schema to check. Overrides the configuration file.
    #[arg(long, value_name = "PATH")]
    pub schema: Option<PathBuf>,
}

/// Execute the check-schema subcommand, writing the result to stdout.
pub fn run_check_schema(args: &CheckSchemaArgs, config: RunConfig) -> Result<u8> {
    let schema_path = args.schema.clone().unwrap_or(config.schema_path);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    check_schema_file(&schema_path, &mut out)
}

/// Check the schema at `path` and write `[OK]` or `[SCHEMA ERROR]` to `out`.
pub fn check_schema_file<W: Write>(path: &Path, out: &mut W) -> Result<u8> {
    match SchemaValidator::from_file(path) {
        Ok(validator) => {
            tracing::info!(schema = %path.display(), draft = ?validator.draft(), "schema is valid");
            writeln!(out, "[OK] {}", path.display()).context("failed to write report")?;
            Ok(EXIT_OK)
        }
        Err(e) => {
            write_schema_error(out, &e).context("failed to write report")?;
            Ok(EXIT_INVALID)
        }
    }
}
