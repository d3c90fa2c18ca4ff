//! # Validate Subcommand
//!
//! Checks the schema precondition, then validates every selected passport
//! and prints one report block per document followed by a summary line.
//! A schema failure prints a single `[SCHEMA ERROR]` line and no document
//! output.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use dpp_core::RunConfig;
use dpp_schema::{discover_documents, ValidationRunner};

use crate::report::{write_document, write_schema_error, write_summary};
use crate::{EXIT_INVALID, EXIT_OK};

/// Arguments for the `dpp validate` subcommand.
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Schema to validate against. Overrides the configuration file.
    #[arg(long, value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Pattern selecting passport documents, e.g. `examples/*.json`.
    /// Overrides the configuration file.
    #[arg(long, value_name = "PATTERN")]
    pub documents: Option<String>,

    /// Validate these files instead of discovering documents by pattern.
    #[arg(value_name = "FILE")]
    pub paths: Vec<PathBuf>,
}

impl ValidateArgs {
    /// Layer the command-line overrides on top of `config`.
    pub fn apply(&self, mut config: RunConfig) -> Result<RunConfig> {
        if let Some(schema) = &self.schema {
            config.schema_path = schema.clone();
        }
        if let Some(documents) = &self.documents {
            config.documents = documents.clone();
        }
        config.check().context("invalid validate arguments")?;
        Ok(config)
    }
}

/// Execute the validate subcommand, writing the report to stdout.
pub fn run_validate(args: &ValidateArgs, config: RunConfig) -> Result<u8> {
    let config = args.apply(config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    validate_documents(&config, &args.paths, &mut out)
}

/// Run the pipeline for `config` and write the report to `out`.
///
/// Explicit `paths` replace pattern discovery. Returns the exit status.
pub fn validate_documents<W: Write>(
    config: &RunConfig,
    paths: &[PathBuf],
    out: &mut W,
) -> Result<u8> {
    let runner = match ValidationRunner::new(&config.schema_path, config.tolerance) {
        Ok(runner) => runner,
        Err(e) => {
            tracing::error!(schema = %config.schema_path.display(), "schema precondition failed");
            write_schema_error(out, &e).context("failed to write report")?;
            return Ok(EXIT_INVALID);
        }
    };

    let paths = if paths.is_empty() {
        let found = discover_documents(&config.documents);
        if found.is_empty() {
            tracing::warn!(pattern = %config.documents, "no passport documents matched");
        }
        found
    } else {
        paths.to_vec()
    };

    let report = runner.run(&paths);
    for doc in &report.documents {
        write_document(out, doc, runner.policy()).context("failed to write report")?;
    }
    write_summary(out, &report).context("failed to write report")?;

    Ok(if report.success() { EXIT_OK } else { EXIT_INVALID })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;

    fn write_schema(dir: &Path) -> PathBuf {
        let path = dir.join("dpp.schema.json");
        let schema = json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "type": "object",
            "required": ["materials"],
            "properties": {
                "materials": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["share_percent"],
                        "properties": {"share_percent": {"type": "number"}}
                    }
                }
            }
        });
        std::fs::write(&path, schema.to_string()).unwrap();
        path
    }

    fn config(dir: &Path) -> RunConfig {
        RunConfig {
            schema_path: write_schema(dir),
            documents: format!("{}/docs/*.json", dir.display()),
            ..RunConfig::default()
        }
    }

    fn run(config: &RunConfig, paths: &[PathBuf]) -> (u8, String) {
        let mut out = Vec::new();
        let code = validate_documents(config, paths, &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn all_valid_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        let doc = dir.path().join("docs/ok.json");
        std::fs::write(&doc, r#"{"materials":[{"share_percent":60},{"share_percent":40}]}"#).unwrap();

        let (code, out) = run(&config, &[]);
        assert_eq!(code, EXIT_OK);
        assert_eq!(out, format!("[OK] {}\nPassports: 1/1 passed\n", doc.display()));
    }

    #[test]
    fn any_invalid_exits_one_and_reports_all() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let docs = dir.path().join("docs");
        std::fs::create_dir(&docs).unwrap();
        std::fs::write(docs.join("a.json"), "{ broken").unwrap();
        std::fs::write(docs.join("b.json"), r#"{"materials":[{"share_percent":60},{"share_percent":50}]}"#).unwrap();
        std::fs::write(docs.join("c.json"), r#"{"materials":[{}]}"#).unwrap();
        std::fs::write(docs.join("d.json"), r#"{"materials":[{"share_percent":100}]}"#).unwrap();

        let (code, out) = run(&config, &[]);
        assert_eq!(code, EXIT_INVALID);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("[ERROR] ") && lines[0].contains("a.json"));
        assert!(lines[1].starts_with("[INVALID] ") && lines[1].ends_with("b.json"));
        assert_eq!(lines[2], "  - materials.share_percent must sum to 100 ± 0.1");
        assert!(lines[3].starts_with("[INVALID] ") && lines[3].ends_with("c.json"));
        assert!(lines[4].starts_with("  - /materials/0: "), "got {}", lines[4]);
        assert!(lines[5].starts_with("[OK] ") && lines[5].ends_with("d.json"));
        assert_eq!(lines[6], "Passports: 1/4 passed");
    }

    #[test]
    fn invalid_schema_prints_only_fatal_line() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        std::fs::write(&config.schema_path, r#"{"type": "sequence"}"#).unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/ok.json"), r#"{"materials":[{"share_percent":100}]}"#).unwrap();

        let (code, out) = run(&config, &[]);
        assert_eq!(code, EXIT_INVALID);
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("[SCHEMA ERROR] "));
    }

    #[test]
    fn explicit_paths_replace_discovery() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let doc = dir.path().join("single.yaml");
        std::fs::write(&doc, "materials:\n  - share_percent: 100\n").unwrap();

        let (code, out) = run(&config, &[doc.clone()]);
        assert_eq!(code, EXIT_OK);
        assert!(out.starts_with(&format!("[OK] {}", doc.display())));
    }

    #[test]
    fn no_documents_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let (code, out) = run(&config, &[]);
        assert_eq!(code, EXIT_OK);
        assert_eq!(out, "Passports: 0/0 passed\n");
    }

    #[test]
    fn repeated_runs_are_identical() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let docs = dir.path().join("docs");
        std::fs::create_dir(&docs).unwrap();
        std::fs::write(docs.join("x.json"), r#"{"materials":[{"share_percent":"a"},{}],"extra":1}"#).unwrap();
        std::fs::write(docs.join("y.json"), r#"[]"#).unwrap();

        let first = run(&config, &[]);
        let second = run(&config, &[]);
        assert_eq!(first, second);
        assert_eq!(first.0, EXIT_INVALID);
    }

    #[test]
    fn args_override_config() {
        let args = ValidateArgs {
            schema: Some(PathBuf::from("other.schema.json")),
            documents: Some("passports/*.yaml".into()),
            paths: Vec::new(),
        };
        let config = args.apply(RunConfig::default()).unwrap();
        assert_eq!(config.schema_path, PathBuf::from("other.schema.json"));
        assert_eq!(config.documents, "passports/*.yaml");
    }

    #[test]
    fn empty_pattern_override_is_rejected() {
        let args = ValidateArgs {
            documents: Some(String::new()),
            ..ValidateArgs::default()
        };
        assert!(args.apply(RunConfig::default()).is_err());
    }
}
