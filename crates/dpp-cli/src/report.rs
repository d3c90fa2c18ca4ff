//! # Report Output
//!
//! Line formats are a compatibility contract for CI scripts that grep them:
//!
//! ```text
//! [SCHEMA ERROR] <reason>
//! [OK] <path>
//! [ERROR] <path>: <reason>
//! [INVALID] <path>
//!   - <location>: <message>
//!   - <rule text>
//! ```

use std::io::{self, Write};

use dpp_core::{SchemaDefinitionError, TolerancePolicy};
use dpp_schema::{DocumentReport, RunReport, Verdict};

/// The single fatal line printed when the schema fails its precondition.
pub fn write_schema_error<W: Write>(out: &mut W, err: &SchemaDefinitionError) -> io::Result<()> {
    writeln!(out, "[SCHEMA ERROR] {err}")
}

/// Print one document's verdict and its diagnostics.
pub fn write_document<W: Write>(
    out: &mut W,
    doc: &DocumentReport,
    policy: &TolerancePolicy,
) -> io::Result<()> {
    let path = doc.path.display();
    match &doc.verdict {
        Verdict::Valid => writeln!(out, "[OK] {path}"),
        Verdict::LoadError(e) => writeln!(out, "[ERROR] {path}: {}", e.describe()),
        Verdict::StructurallyInvalid(errors) => {
            writeln!(out, "[INVALID] {path}")?;
            for error in errors {
                writeln!(out, "  - {}: {}", error.location, error.message)?;
            }
            Ok(())
        }
        Verdict::SemanticallyInvalid(violation) => {
            writeln!(out, "[INVALID] {path}")?;
            writeln!(out, "  - {}", violation.rule.describe(policy))
        }
    }
}

/// Trailing summary line.
pub fn write_summary<W: Write>(out: &mut W, report: &RunReport) -> io::Result<()> {
    writeln!(out, "Passports: {}/{} passed", report.passed(), report.total())
}
