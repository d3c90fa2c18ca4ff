//! # dpp-cli — Passport Validation Command-Line Interface
//!
//! Provides the `dpp` binary:
//!
//! ```bash
//! dpp validate                          # schema + examples/*.json
//! dpp validate passports/jacket.yaml    # explicit files
//! dpp --config dpp.yaml validate
//! dpp check-schema --schema packages/schema/dpp.schema.json
//! ```
//!
//! ## Exit status
//!
//! - `0` — the schema passed its precondition and every document is valid.
//! - `1` — the schema failed, or at least one document did not validate.
//! - `2` — operational error (unreadable or invalid configuration).
//!
//! ## Crate Policy
//!
//! - Argument parsing and printing only; validation lives in `dpp-schema`.
//! - The report goes to stdout, logs go to stderr.

pub mod report;
pub mod schema;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use dpp_core::RunConfig;

/// Everything validated.
pub const EXIT_OK: u8 = 0;
/// The schema or at least one document failed validation.
pub const EXIT_INVALID: u8 = 1;
/// The tool could not run.
pub const EXIT_OPERATIONAL: u8 = 2;

/// Load the run configuration from `path`, or the defaults when absent.
pub fn load_config(path: Option<&Path>) -> Result<RunConfig> {
    match path {
        Some(path) => {
            let config = RunConfig::load(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            tracing::debug!(config = %path.display(), "loaded configuration");
            Ok(config)
        }
        None => Ok(RunConfig::default()),
    }
}
