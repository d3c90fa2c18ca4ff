//! # dpp-core — Foundational Types for Passport Validation
//!
//! Leaf crate of the workspace. Defines the types shared by the schema
//! layer, the semantic rule engine and the CLI:
//!
//! - [`error`] — the error taxonomy (`SchemaDefinitionError`,
//!   `DocumentLoadError`, `ConfigError`).
//! - [`policy`] — the percentage target and tolerance used by every sum check.
//! - [`path`] — JSON-Pointer instance locations with a total ordering, used to
//!   sort structural diagnostics deterministically.
//! - [`config`] — run configuration (schema path, document pattern, tolerance).
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dpp-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod path;
pub mod policy;

pub use config::{RunConfig, DEFAULT_DOCUMENTS_PATTERN, DEFAULT_SCHEMA_PATH};
pub use error::{ConfigError, DocumentLoadError, SchemaDefinitionError};
pub use path::{InstancePath, PathSegment};
pub use policy::{TolerancePolicy, PERCENT_TARGET, PERCENT_TOLERANCE};
