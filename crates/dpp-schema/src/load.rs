//! # Document Loading
//!
//! Reads candidate documents from disk into `serde_json::Value`. The format
//! is chosen by extension: `.yaml`/`.yml` are parsed as YAML and converted to
//! the JSON data model, everything else is parsed as JSON.

use std::path::Path;

use dpp_core::DocumentLoadError;
use serde_json::Value;

/// Serialization format of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON (the default).
    Json,
    /// YAML 1.2, restricted to its JSON-compatible subset.
    Yaml,
}

impl DocumentFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Read and parse a document file.
///
/// # Errors
///
/// Returns a [`DocumentLoadError`] naming the path if the file cannot be
/// read or parsed.
pub fn load_document(path: &Path) -> Result<Value, DocumentLoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| DocumentLoadError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse_document(&content, DocumentFormat::from_path(path), &path.display().to_string())
}

/// Parse document text. `origin` names the source in errors.
pub fn parse_document(
    content: &str,
    format: DocumentFormat,
    origin: &str,
) -> Result<Value, DocumentLoadError> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str(content).map_err(|e| DocumentLoadError::InvalidJson {
                path: origin.to_string(),
                reason: e.to_string(),
            })
        }
        DocumentFormat::Yaml => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|e| DocumentLoadError::InvalidYaml {
                    path: origin.to_string(),
                    reason: e.to_string(),
                })?;
            yaml_to_json_value(&yaml).map_err(|reason| DocumentLoadError::Conversion {
                path: origin.to_string(),
                reason,
            })
        }
    }
}

/// Convert a `serde_yaml::Value` tree into the equivalent JSON tree.
///
/// Tags are dropped. Map keys must be scalars; numbers and booleans used as
/// keys are stringified.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(i.into()))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(u.into()))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut object = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                object.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(object))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
