//! # Validation Runner
//!
//! Drives a closed set of documents through the validation pipeline:
//!
//! ```text
//! Load ──parse error──▶ LoadError
//!   │
//! StructuralCheck ──violations──▶ StructurallyInvalid
//!   │
//! SemanticCheck ──first violation──▶ SemanticallyInvalid
//!   │
//! Valid
//! ```
//!
//! Each document ends in exactly one terminal [`Verdict`]. A failed document
//! never stops the others from being checked. The only fatal condition is a
//! schema that fails its precondition, and that is raised by
//! [`ValidationRunner::new`] before any document exists.

use std::path::{Path, PathBuf};

use dpp_core::{DocumentLoadError, SchemaDefinitionError, TolerancePolicy};
use serde_json::Value;

use crate::load::load_document;
use crate::semantic::{SemanticRuleEngine, SemanticViolation};
use crate::validate::{SchemaValidator, StructuralError};

/// Terminal outcome for one document.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// The document could not be read or parsed.
    LoadError(DocumentLoadError),
    /// The document violates the schema. Never empty; sorted by location.
    StructurallyInvalid(Vec<StructuralError>),
    /// The document is well-formed but breaks a semantic rule.
    SemanticallyInvalid(SemanticViolation),
    /// The document passed both layers.
    Valid,
}

impl Verdict {
    /// Whether the document passed.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Verdict for one file.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentReport {
    /// Path the document was loaded from.
    pub path: PathBuf,
    /// Its verdict.
    pub verdict: Verdict,
}

/// Verdicts for every document of a run, in the order they were given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Per-document results.
    pub documents: Vec<DocumentReport>,
}

impl RunReport {
    /// Number of documents checked.
    pub fn total(&self) -> usize {
        self.documents.len()
    }

    /// Number of documents that reached [`Verdict::Valid`].
    pub fn passed(&self) -> usize {
        self.documents.iter().filter(|d| d.verdict.is_valid()).count()
    }

    /// Number of documents that did not.
    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// Whether every document is valid. Vacuously true for an empty run.
    pub fn success(&self) -> bool {
        self.documents.iter().all(|d| d.verdict.is_valid())
    }
}

/// A schema that passed its precondition plus the semantic rules.
#[derive(Debug)]
pub struct ValidationRunner {
    schema: SchemaValidator,
    rules: SemanticRuleEngine,
}

impl ValidationRunner {
    /// Load the schema at `schema_path` and prepare to validate documents.
    ///
    /// # Errors
    ///
    /// Returns the [`SchemaDefinitionError`] that makes the whole run fail.
    pub fn new(schema_path: &Path, policy: TolerancePolicy) -> Result<Self, SchemaDefinitionError> {
        let schema = SchemaValidator::from_file(schema_path)?;
        tracing::info!(schema = %schema_path.display(), "schema passed meta-validation");
        Ok(Self::with_schema(schema, policy))
    }

    /// Build a runner around an already validated schema.
    pub fn with_schema(schema: SchemaValidator, policy: TolerancePolicy) -> Self {
        Self {
            schema,
            rules: SemanticRuleEngine::new(policy),
        }
    }

    /// The compiled schema.
    pub fn schema(&self) -> &SchemaValidator {
        &self.schema
    }

    /// The tolerance policy for percentage sums.
    pub fn policy(&self) -> &TolerancePolicy {
        self.rules.policy()
    }

    /// Run the structural and semantic layers on an already parsed document.
    pub fn validate_value(&self, document: &Value) -> Verdict {
        let errors = self.schema.validate_document(document);
        if !errors.is_empty() {
            return Verdict::StructurallyInvalid(errors);
        }
        match self.rules.check(document) {
            Ok(()) => Verdict::Valid,
            Err(violation) => Verdict::SemanticallyInvalid(violation),
        }
    }

    /// Load a document from disk and validate it.
    pub fn validate_path(&self, path: &Path) -> DocumentReport {
        let verdict = match load_document(path) {
            Ok(document) => self.validate_value(&document),
            Err(e) => Verdict::LoadError(e),
        };
        tracing::debug!(path = %path.display(), valid = verdict.is_valid(), "document checked");
        DocumentReport {
            path: path.to_path_buf(),
            verdict,
        }
    }

    /// Validate every path, in order.
    pub fn run(&self, paths: &[PathBuf]) -> RunReport {
        let documents: Vec<DocumentReport> = paths.iter().map(|p| self.validate_path(p)).collect();
        let report = RunReport { documents };
        tracing::info!(
            total = report.total(),
            passed = report.passed(),
            failed = report.failed(),
            "validation run complete"
        );
        report
    }
}

/// Resolve a selection pattern of the form `dir/<file pattern>` into a sorted
/// list of files.
///
/// The file pattern may use `*` (any run of characters) and `?` (one
/// character); the directory part is taken literally and is not searched
/// recursively. A pattern without `/` selects from the working directory.
/// Names starting with `.` only match patterns that start with `.`. A missing
/// directory selects nothing.
pub fn discover_documents(pattern: &str) -> Vec<PathBuf> {
    let (dir, file_pattern) = match pattern.rsplit_once('/') {
        Some((dir, file)) => (Some(if dir.is_empty() { "/" } else { dir }), file),
        None => (None, pattern),
    };
    let read_from = Path::new(dir.unwrap_or("."));

    let entries = match std::fs::read_dir(read_from) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %read_from.display(), error = %e, "cannot list document directory");
            return Vec::new();
        }
    };

    let mut matches: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| !name.starts_with('.') || file_pattern.starts_with('.'))
        .filter(|name| wildcard_match(file_pattern, name))
        .map(|name| match dir {
            Some(dir) => Path::new(dir).join(name),
            None => PathBuf::from(name),
        })
        .collect();
    matches.sort();
    matches
}

/// Match `name` against a pattern with `*` and `?` wildcards.
fn wildcard_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();
    let (mut p, mut n) = (0, 0);
    // Position of the last `*` seen and the name position it was tried at.
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == name[n]) {
            p += 1;
            n += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, n));
            p += 1;
        } else if let Some((star, tried)) = backtrack {
            p = star + 1;
            n = tried + 1;
            backtrack = Some((star, n));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|&c| c == '*')
}
