//! Integration tests: run the full pipeline against the repository schema
//! (`packages/schema/dpp.schema.json`), the sample passports under
//! `passports/`, and passports written to temporary directories.

use std::path::{Path, PathBuf};

use dpp_core::{SchemaDefinitionError, TolerancePolicy};
use dpp_schema::{discover_documents, SemanticRule, ValidationRunner, Verdict};
use serde_json::{json, Value};

/// Compute the repo root from the crate manifest directory.
fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // crates/dpp-schema -> crates -> repo root
    dir.pop();
    dir.pop();
    dir
}

fn schema_path() -> PathBuf {
    repo_root().join("packages/schema/dpp.schema.json")
}

fn runner() -> ValidationRunner {
    ValidationRunner::new(&schema_path(), TolerancePolicy::default())
        .expect("repository schema must pass meta-validation")
}

fn passport(materials: Value) -> Value {
    json!({
        "passport_id": "DPP-TEST-0001",
        "product": {"name": "Test product", "category": "apparel"},
        "materials": materials
    })
}

fn write(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

#[test]
fn repository_schema_passes_precondition() {
    let runner = runner();
    assert_eq!(runner.schema().schema_path(), schema_path().as_path());
}

#[test]
fn sample_passports_are_valid() {
    let runner = runner();
    let pattern = format!("{}/*", repo_root().join("passports").display());
    let paths = discover_documents(&pattern);
    assert!(paths.len() >= 2, "expected sample passports, found {paths:?}");

    let report = runner.run(&paths);
    for doc in &report.documents {
        assert!(
            doc.verdict.is_valid(),
            "{} should be valid, got {:?}",
            doc.path.display(),
            doc.verdict
        );
    }
    assert!(report.success());
}

#[test]
fn exact_split_is_valid() {
    let doc = passport(json!([
        {"name": "cotton", "share_percent": 60},
        {"name": "linen", "share_percent": 40}
    ]));
    assert_eq!(runner().validate_value(&doc), Verdict::Valid);
}

#[test]
fn sum_within_tolerance_is_valid() {
    let doc = passport(json!([
        {"name": "cotton", "share_percent": 60},
        {"name": "linen", "share_percent": 40.05}
    ]));
    assert_eq!(runner().validate_value(&doc), Verdict::Valid);
}

#[test]
fn sum_outside_tolerance_fails_regardless_of_breakdowns() {
    let doc = passport(json!([
        {"name": "cotton", "share_percent": 60, "origin": {"breakdown": [
            {"country_code": "DE", "share_percent": 60},
            {"country_code": "DE", "share_percent": 40}
        ]}},
        {"name": "linen", "share_percent": 40.2}
    ]));
    match runner().validate_value(&doc) {
        Verdict::SemanticallyInvalid(v) => assert_eq!(v.reason_code(), "materials_sum_mismatch"),
        other => panic!("expected materials_sum_mismatch, got {other:?}"),
    }
}

#[test]
fn duplicate_country_code_with_exact_sum() {
    let doc = passport(json!([
        {"name": "cotton", "share_percent": 100, "origin": {"breakdown": [
            {"country_code": "DE", "share_percent": 60},
            {"country_code": "DE", "share_percent": 40}
        ]}}
    ]));
    match runner().validate_value(&doc) {
        Verdict::SemanticallyInvalid(v) => {
            assert_eq!(v.rule, SemanticRule::DuplicateCountryCode);
            assert_eq!(v.material_index, Some(0));
        }
        other => panic!("expected duplicate_country_code, got {other:?}"),
    }
}

#[test]
fn breakdown_mismatch_reported_for_first_failing_material() {
    let doc = passport(json!([
        {"name": "cotton", "share_percent": 50, "origin": {"breakdown": [
            {"country_code": "IN", "share_percent": 100}
        ]}},
        {"name": "wool", "share_percent": 50, "origin": {"breakdown": [
            {"country_code": "NZ", "share_percent": 70},
            {"country_code": "AU", "share_percent": 20}
        ]}}
    ]));
    match runner().validate_value(&doc) {
        Verdict::SemanticallyInvalid(v) => {
            assert_eq!(v.reason_code(), "breakdown_sum_mismatch");
            assert_eq!(v.material_index, Some(1));
        }
        other => panic!("expected breakdown_sum_mismatch, got {other:?}"),
    }
}

#[test]
fn missing_or_empty_breakdown_is_vacuous() {
    let doc = passport(json!([
        {"name": "cotton", "share_percent": 50},
        {"name": "wool", "share_percent": 50, "origin": {"breakdown": []}}
    ]));
    assert_eq!(runner().validate_value(&doc), Verdict::Valid);
}

#[test]
fn structural_errors_collected_and_sorted() {
    let doc = json!({
        "passport_id": "",
        "product": {"name": "x"},
        "materials": [
            {"name": "cotton", "share_percent": 150},
            {"share_percent": 10, "origin": {"breakdown": [{"country_code": "de", "share_percent": 5}]}}
        ],
        "unexpected": true
    });
    let errors = match runner().validate_value(&doc) {
        Verdict::StructurallyInvalid(errors) => errors,
        other => panic!("expected StructurallyInvalid, got {other:?}"),
    };
    let locations: Vec<String> = errors.iter().map(|e| e.location.to_string()).collect();
    assert_eq!(
        locations,
        vec![
            "/",
            "/materials/0/share_percent",
            "/materials/1",
            "/materials/1/origin/breakdown/0/country_code",
            "/passport_id",
            "/product",
        ]
    );
}

#[test]
fn non_object_document_is_structurally_invalid() {
    match runner().validate_value(&json!(["materials"])) {
        Verdict::StructurallyInvalid(errors) => {
            assert!(!errors.is_empty());
            assert!(errors.iter().all(|e| e.location.is_root()));
        }
        other => panic!("expected StructurallyInvalid, got {other:?}"),
    }
}

#[test]
fn run_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.json", &passport(json!([{"name": "a", "share_percent": 100}])));
    write(dir.path(), "b.json", &passport(json!([{"name": "b", "share_percent": 90}])));
    write(dir.path(), "c.json", &json!({"materials": "nope"}));
    std::fs::write(dir.path().join("d.json"), "{ truncated").unwrap();

    let pattern = format!("{}/*.json", dir.path().display());
    let runner = runner();
    let first = runner.run(&discover_documents(&pattern));
    let second = runner.run(&discover_documents(&pattern));

    assert_eq!(first, second);
    assert_eq!(first.total(), 4);
    assert_eq!(first.passed(), 1);
    assert!(!first.success());
    assert!(matches!(first.documents[3].verdict, Verdict::LoadError(_)));
}

#[test]
fn yaml_documents_are_validated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("passport.yaml");
    std::fs::write(
        &path,
        "passport_id: DPP-Y-1\nproduct:\n  name: Scarf\n  category: apparel\nmaterials:\n  - name: wool\n    share_percent: 60\n  - name: silk\n    share_percent: 50\n",
    )
    .unwrap();
    let report = runner().validate_path(&path);
    match report.verdict {
        Verdict::SemanticallyInvalid(v) => assert_eq!(v.reason_code(), "materials_sum_mismatch"),
        other => panic!("expected materials_sum_mismatch, got {other:?}"),
    }
}

#[test]
fn schema_failing_meta_validation_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("dpp.schema.json");
    std::fs::write(
        &schema,
        json!({"$schema": "https://json-schema.org/draft/2020-12/schema", "required": "materials"})
            .to_string(),
    )
    .unwrap();
    let err = ValidationRunner::new(&schema, TolerancePolicy::default()).unwrap_err();
    assert!(matches!(err, SchemaDefinitionError::MetaSchemaViolation { .. }), "got {err}");
}

#[test]
fn minimal_schema_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write(
        dir.path(),
        "dpp.schema.json",
        &json!({
            "type": "object",
            "properties": {
                "materials": {
                    "type": "array",
                    "items": {"type": "object", "properties": {"share_percent": {"type": "number"}}}
                }
            }
        }),
    );
    let docs = dir.path().join("docs");
    std::fs::create_dir(&docs).unwrap();
    let ok = write(&docs, "ok.json", &json!({"materials": [{"share_percent": 60}, {"share_percent": 40}]}));
    let over = write(&docs, "over.json", &json!({"materials": [{"share_percent": 60}, {"share_percent": 50}]}));

    let runner = ValidationRunner::new(&schema, TolerancePolicy::default()).unwrap();
    assert_eq!(runner.validate_path(&ok).verdict, Verdict::Valid);
    match runner.validate_path(&over).verdict {
        Verdict::SemanticallyInvalid(v) => {
            assert_eq!(v.reason_code(), "materials_sum_mismatch");
            assert_eq!(v.total, Some(110.0));
        }
        other => panic!("expected materials_sum_mismatch, got {other:?}"),
    }
}
