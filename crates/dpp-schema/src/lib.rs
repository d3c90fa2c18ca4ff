//! # dpp-schema — Passport Validation Engine
//!
//! Validates Digital Product Passport documents in two layers:
//!
//! 1. **Structural** ([`validate`]) — the document is checked against a
//!    declared JSON Schema. The schema itself is meta-validated once, before
//!    any document is looked at.
//! 2. **Semantic** ([`semantic`]) — invariants a schema cannot express:
//!    material shares summing to 100 %, origin breakdowns summing to 100 %,
//!    and unique country codes within a breakdown.
//!
//! The [`runner`] module drives both layers over a set of files and produces
//! exactly one [`Verdict`] per document. [`load`] turns JSON or YAML files
//! into `serde_json::Value`s.
//!
//! ## Crate Policy
//!
//! - Depends only on `dpp-core` internally.
//! - Semantic checks only ever see documents that passed structural
//!   validation.
//! - Semantic reporting is fail-fast: the first violated rule is the verdict.

pub mod load;
pub mod runner;
pub mod semantic;
pub mod validate;

pub use load::{load_document, parse_document, DocumentFormat};
pub use runner::{discover_documents, DocumentReport, RunReport, ValidationRunner, Verdict};
pub use semantic::{SemanticRule, SemanticRuleEngine, SemanticViolation};
pub use validate::{SchemaValidator, StructuralError};
