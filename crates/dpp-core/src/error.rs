//! # Error Types
//!
//! The validation pipeline distinguishes errors by their blast radius:
//!
//! - [`SchemaDefinitionError`] is fatal. The schema is loaded once per run and
//!   nothing can be checked against a broken schema, so the run aborts before
//!   any document is examined.
//! - [`DocumentLoadError`] is local to one document. It becomes that
//!   document's verdict and the run continues with the next file.
//! - [`ConfigError`] covers the run configuration and is raised before the
//!   schema is touched.
//!
//! Structural and semantic violations are not errors in this sense: they are
//! verdicts, defined next to the checks that produce them in `dpp-schema`.

use thiserror::Error;

/// The schema itself cannot be used for validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaDefinitionError {
    /// The schema file could not be read.
    #[error("cannot read schema {path}: {reason}")]
    Read {
        /// Path to the schema file.
        path: String,
        /// Underlying I/O failure.
        reason: String,
    },

    /// The schema file is not valid JSON.
    #[error("schema {path} is not valid JSON: {reason}")]
    InvalidJson {
        /// Path to the schema file.
        path: String,
        /// Parser message.
        reason: String,
    },

    /// The schema declares a `$schema` dialect this validator does not know.
    #[error("schema {path} declares unsupported $schema '{uri}'")]
    UnknownDraft {
        /// Path to the schema file.
        path: String,
        /// The declared `$schema` URI.
        uri: String,
    },

    /// The schema does not conform to the meta-schema of its draft.
    #[error("schema {path} violates its meta-schema at {location}: {reason}")]
    MetaSchemaViolation {
        /// Path to the schema file.
        path: String,
        /// JSON Pointer into the schema where the violation was found.
        location: String,
        /// Meta-validator message.
        reason: String,
    },

    /// The schema passed the meta check but could not be compiled,
    /// typically because of an unresolvable `$ref`.
    #[error("schema {path} could not be compiled: {reason}")]
    Compile {
        /// Path to the schema file.
        path: String,
        /// Compiler message.
        reason: String,
    },
}

/// A candidate document could not be turned into a JSON value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentLoadError {
    /// The file could not be read.
    #[error("cannot read {path}: {reason}")]
    Read {
        /// Path to the document.
        path: String,
        /// Underlying I/O failure.
        reason: String,
    },

    /// The file is not valid JSON.
    #[error("invalid JSON in {path}: {reason}")]
    InvalidJson {
        /// Path to the document.
        path: String,
        /// Parser message.
        reason: String,
    },

    /// The file is not valid YAML.
    #[error("invalid YAML in {path}: {reason}")]
    InvalidYaml {
        /// Path to the document.
        path: String,
        /// Parser message.
        reason: String,
    },

    /// The YAML parsed but uses values with no JSON equivalent
    /// (non-scalar map keys, non-finite floats).
    #[error("{path} cannot be represented as JSON: {reason}")]
    Conversion {
        /// Path to the document.
        path: String,
        /// What could not be converted.
        reason: String,
    },
}

impl DocumentLoadError {
    /// Path of the document that failed to load.
    pub fn path(&self) -> &str {
        match self {
            Self::Read { path, .. }
            | Self::InvalidJson { path, .. }
            | Self::InvalidYaml { path, .. }
            | Self::Conversion { path, .. } => path,
        }
    }

    /// The failure without the path, for reports that print the path already.
    pub fn describe(&self) -> String {
        match self {
            Self::Read { reason, .. } => format!("cannot read: {reason}"),
            Self::InvalidJson { reason, .. } => format!("invalid JSON: {reason}"),
            Self::InvalidYaml { reason, .. } => format!("invalid YAML: {reason}"),
            Self::Conversion { reason, .. } => format!("cannot be represented as JSON: {reason}"),
        }
    }
}

/// The run configuration is unusable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config {path}: {reason}")]
    Read {
        /// Path to the configuration file.
        path: String,
        /// Underlying I/O failure.
        reason: String,
    },

    /// The configuration file is not valid YAML or has unknown fields.
    #[error("invalid config {path}: {reason}")]
    Parse {
        /// Path to the configuration file.
        path: String,
        /// Parser message.
        reason: String,
    },

    /// The tolerance policy is not usable for comparisons.
    #[error("invalid tolerance policy: target={target}, tolerance={tolerance}")]
    InvalidTolerance {
        /// Configured target sum.
        target: f64,
        /// Configured maximum deviation.
        tolerance: f64,
    },

    /// The document selection pattern is empty.
    #[error("document pattern must not be empty")]
    EmptyDocumentPattern,
}
