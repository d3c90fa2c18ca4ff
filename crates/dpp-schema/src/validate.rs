//! # Structural Validation
//!
//! Validates passport documents against a JSON Schema using the `jsonschema`
//! crate.
//!
//! ## Schema precondition
//!
//! A schema is checked against the meta-schema of the draft it declares in
//! `$schema` (Draft 2020-12 when it declares none) before it is compiled.
//! Any failure here is a [`SchemaDefinitionError`]: the caller must not
//! validate documents against a schema that did not pass.
//!
//! ## Deterministic diagnostics
//!
//! [`SchemaValidator::validate_document`] returns every violation, sorted by
//! [`InstancePath`]. The sort is stable, so violations at the same location
//! keep the order the validator emitted them in. Repeated runs over the same
//! input print identical diagnostics.
//!
//! ## Schema resolution
//!
//! Cross-file `$ref`s are resolved against the `*.schema.json` files that sit
//! next to the schema, matched by `$id` or by filename. Nothing is fetched
//! over the network; an unresolvable reference fails compilation.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use dpp_core::{InstancePath, SchemaDefinitionError};
use jsonschema::{Draft, Retrieve, Uri, Validator};
use serde_json::Value;

/// `$schema` URIs accepted for meta-validation, with the draft they select.
/// A trailing `#` is ignored when matching.
const KNOWN_DRAFTS: [(&str, Draft); 5] = [
    ("https://json-schema.org/draft/2020-12/schema", Draft::Draft202012),
    ("https://json-schema.org/draft/2019-09/schema", Draft::Draft201909),
    ("http://json-schema.org/draft-07/schema", Draft::Draft7),
    ("http://json-schema.org/draft-06/schema", Draft::Draft6),
    ("http://json-schema.org/draft-04/schema", Draft::Draft4),
];

/// A single structural violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralError {
    /// Location of the violating value in the document.
    pub location: InstancePath,
    /// JSON Pointer to the schema keyword that rejected it.
    pub schema_path: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Resolves `$ref` URIs to schemas loaded from the schema's directory.
struct LocalSchemaRetriever {
    schemas_by_uri: HashMap<String, Value>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }
        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        self.schemas_by_uri
            .get(filename)
            .cloned()
            .ok_or_else(|| format!("schema not found for URI: {uri_str}").into())
    }
}

/// A meta-validated, compiled passport schema.
///
/// Construction performs the schema precondition; a `SchemaValidator` that
/// exists is safe to validate documents with. Compilation happens once and
/// the compiled validator is reused for every document.
pub struct SchemaValidator {
    schema_path: PathBuf,
    schema: Value,
    draft: Draft,
    validator: Validator,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema_path", &self.schema_path)
            .field("draft", &self.draft)
            .finish()
    }
}

impl SchemaValidator {
    /// Load, meta-validate and compile the schema at `path`.
    ///
    /// Sibling `*.schema.json` files are registered for `$ref` resolution.
    ///
    /// # Errors
    ///
    /// Any [`SchemaDefinitionError`]: unreadable file, invalid JSON, unknown
    /// draft, meta-schema violation, or compile failure.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaDefinitionError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| SchemaDefinitionError::Read {
            path: name.clone(),
            reason: e.to_string(),
        })?;
        let schema: Value =
            serde_json::from_str(&content).map_err(|e| SchemaDefinitionError::InvalidJson {
                path: name.clone(),
                reason: e.to_string(),
            })?;

        let siblings = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => load_sibling_schemas(dir, path),
            _ => load_sibling_schemas(Path::new("."), path),
        };

        Self::build(schema, path.to_path_buf(), siblings)
    }

    /// Meta-validate and compile an in-memory schema. `name` identifies it in
    /// errors. No cross-file `$ref` resolution is available.
    pub fn from_value(schema: Value, name: impl Into<PathBuf>) -> Result<Self, SchemaDefinitionError> {
        Self::build(schema, name.into(), HashMap::new())
    }

    fn build(
        schema: Value,
        schema_path: PathBuf,
        schemas_by_uri: HashMap<String, Value>,
    ) -> Result<Self, SchemaDefinitionError> {
        let name = schema_path.display().to_string();
        let draft = check_schema(&schema, &name)?;

        let mut opts = jsonschema::options();
        opts.with_draft(draft);
        opts.with_retriever(LocalSchemaRetriever { schemas_by_uri });
        let validator = opts
            .build(&schema)
            .map_err(|e| SchemaDefinitionError::Compile {
                path: name.clone(),
                reason: e.to_string(),
            })?;

        tracing::debug!(schema = %name, ?draft, "compiled passport schema");

        Ok(Self {
            schema_path,
            schema,
            draft,
            validator,
        })
    }

    /// Path (or name) the schema was loaded from.
    pub fn schema_path(&self) -> &Path {
        &self.schema_path
    }

    /// The raw schema document.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// The draft the schema is interpreted under.
    pub fn draft(&self) -> Draft {
        self.draft
    }

    /// Collect every structural violation of `instance`, sorted by location.
    ///
    /// An empty vector means the document is structurally valid. Documents of
    /// any shape are accepted; a non-object root yields violations located at
    /// `/`.
    pub fn validate_document(&self, instance: &Value) -> Vec<StructuralError> {
        let mut errors: Vec<StructuralError> = self
            .validator
            .iter_errors(instance)
            .map(|e| StructuralError {
                location: InstancePath::from_pointer(&e.instance_path.to_string()),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();
        errors.sort_by(|a, b| a.location.cmp(&b.location));
        errors
    }

    /// Whether `instance` has no structural violations.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }
}

/// Check a schema against the meta-schema of its declared draft.
///
/// Returns the draft the schema should be compiled under.
///
/// # Errors
///
/// [`SchemaDefinitionError::UnknownDraft`] for an unrecognised `$schema`
/// URI, [`SchemaDefinitionError::MetaSchemaViolation`] when the schema does
/// not conform to its meta-schema.
pub fn check_schema(schema: &Value, name: &str) -> Result<Draft, SchemaDefinitionError> {
    let draft = declared_draft(schema, name)?;
    jsonschema::meta::validate(schema).map_err(|e| {
        let pointer = e.instance_path.to_string();
        SchemaDefinitionError::MetaSchemaViolation {
            path: name.to_string(),
            location: InstancePath::from_pointer(&pointer).to_string(),
            reason: e.to_string(),
        }
    })?;
    Ok(draft)
}

fn declared_draft(schema: &Value, name: &str) -> Result<Draft, SchemaDefinitionError> {
    let Some(uri) = schema.get("$schema").and_then(Value::as_str) else {
        return Ok(Draft::Draft202012);
    };
    let normalized = uri.trim_end_matches('#');
    KNOWN_DRAFTS
        .iter()
        .find(|(known, _)| *known == normalized)
        .map(|(_, draft)| *draft)
        .ok_or_else(|| SchemaDefinitionError::UnknownDraft {
            path: name.to_string(),
            uri: uri.to_string(),
        })
}

/// Index the `*.schema.json` files in `dir` (except `primary`) by filename and
/// by `$id`. Unreadable siblings are skipped: they only matter if referenced,
/// and an unresolved reference fails compilation with its URI.
fn load_sibling_schemas(dir: &Path, primary: &Path) -> HashMap<String, Value> {
    let mut schemas_by_uri = HashMap::new();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "cannot list schema directory");
            return schemas_by_uri;
        }
    };
    let primary_name = primary.file_name();
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".schema.json") || path.file_name() == primary_name {
            continue;
        }
        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| serde_json::from_str::<Value>(&content).map_err(|e| e.to_string()));
        match parsed {
            Ok(value) => {
                if let Some(id) = value.get("$id").and_then(Value::as_str) {
                    schemas_by_uri.insert(id.to_string(), value.clone());
                }
                schemas_by_uri.insert(name.to_string(), value);
            }
            Err(reason) => {
                tracing::warn!(schema = %path.display(), %reason, "skipping unreadable sibling schema");
            }
        }
    }
    schemas_by_uri
}
