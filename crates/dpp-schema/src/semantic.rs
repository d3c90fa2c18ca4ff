//! # Semantic Rules
//!
//! Invariants over material composition that a JSON Schema cannot express:
//!
//! - the `share_percent` values of the top-level `materials` sum to 100,
//! - for every material with a non-empty `origin.breakdown`, the entries'
//!   `share_percent` values sum to 100 and no `country_code` repeats.
//!
//! Sums are left folds in sequence order and compared through the
//! [`TolerancePolicy`]. A missing `share_percent` counts as 0.
//!
//! ## Fail-fast reporting
//!
//! A document gets at most one [`SemanticViolation`]. The materials sum is
//! checked first; breakdowns are then checked material by material in
//! declared order, and within a breakdown a repeated country code is reported
//! as soon as it is seen, before the breakdown's sum is considered. Later
//! materials are not inspected once one fails. Changing this to aggregate
//! reporting would change the diagnostics users see.
//!
//! These checks assume the document passed structural validation. Shapes
//! that do not match (a non-array `materials`, a non-object `origin`, a
//! non-numeric share) are read leniently as absent rather than rejected.

use std::collections::HashSet;
use std::fmt;

use dpp_core::TolerancePolicy;
use serde_json::Value;
use thiserror::Error;

/// A semantic rule a passport can violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticRule {
    /// `materials[*].share_percent` does not sum to the target.
    MaterialsSumMismatch,
    /// A material's `origin.breakdown[*].share_percent` does not sum to the target.
    BreakdownSumMismatch,
    /// A `country_code` appears twice in one breakdown.
    DuplicateCountryCode,
}

impl SemanticRule {
    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MaterialsSumMismatch => "materials_sum_mismatch",
            Self::BreakdownSumMismatch => "breakdown_sum_mismatch",
            Self::DuplicateCountryCode => "duplicate_country_code",
        }
    }

    /// Fixed human-readable statement of the rule, rendered with `policy`.
    pub fn describe(&self, policy: &TolerancePolicy) -> String {
        match self {
            Self::MaterialsSumMismatch => {
                format!("materials.share_percent must sum to {policy}")
            }
            Self::BreakdownSumMismatch => {
                format!("materials.origin.breakdown.share_percent must sum to {policy}")
            }
            Self::DuplicateCountryCode => {
                "Duplicate country_code in materials.origin.breakdown".to_string()
            }
        }
    }
}

impl fmt::Display for SemanticRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The first semantic rule a document violates.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{rule}")]
pub struct SemanticViolation {
    /// The violated rule.
    pub rule: SemanticRule,
    /// Index into `materials` of the offending material, for breakdown rules.
    pub material_index: Option<usize>,
    /// The computed sum, for sum rules.
    pub total: Option<f64>,
    /// The repeated country code, for the duplicate rule.
    pub country_code: Option<String>,
}

impl SemanticViolation {
    /// Machine-readable reason code of the violated rule.
    pub fn reason_code(&self) -> &'static str {
        self.rule.code()
    }
}

/// Applies the semantic rules under a fixed tolerance policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemanticRuleEngine {
    policy: TolerancePolicy,
}

impl SemanticRuleEngine {
    /// Create an engine with the given policy.
    pub fn new(policy: TolerancePolicy) -> Self {
        Self { policy }
    }

    /// The policy sums are compared against.
    pub fn policy(&self) -> &TolerancePolicy {
        &self.policy
    }

    /// Run all rules: materials sum first, then origin breakdowns.
    pub fn check(&self, document: &Value) -> Result<(), SemanticViolation> {
        let total = materials_total(document);
        if !self.policy.accepts(total) {
            return Err(SemanticViolation {
                rule: SemanticRule::MaterialsSumMismatch,
                material_index: None,
                total: Some(total),
                country_code: None,
            });
        }
        self.check_origin_breakdowns(document)
    }

    /// Whether `materials[*].share_percent` sums to the target.
    ///
    /// A missing or empty `materials` collection sums to 0 and fails.
    pub fn check_materials_sum(&self, document: &Value) -> bool {
        self.policy.accepts(materials_total(document))
    }

    /// Check every non-empty `origin.breakdown`, stopping at the first failure.
    ///
    /// Materials without `origin`, without `breakdown`, or with an empty
    /// breakdown are skipped. Entries without a `country_code` (or with an
    /// empty one) still count toward the sum but are not checked for
    /// duplicates.
    pub fn check_origin_breakdowns(&self, document: &Value) -> Result<(), SemanticViolation> {
        for (index, material) in materials(document).iter().enumerate() {
            let Some(breakdown) = breakdown(material) else {
                continue;
            };

            let mut total = 0.0;
            let mut seen: HashSet<&str> = HashSet::new();
            for entry in breakdown {
                total += share_percent(entry);
                if let Some(code) = entry
                    .get("country_code")
                    .and_then(Value::as_str)
                    .filter(|c| !c.is_empty())
                {
                    if !seen.insert(code) {
                        tracing::debug!(material = index, country_code = code, "duplicate country code");
                        return Err(SemanticViolation {
                            rule: SemanticRule::DuplicateCountryCode,
                            material_index: Some(index),
                            total: None,
                            country_code: Some(code.to_string()),
                        });
                    }
                }
            }

            if !self.policy.accepts(total) {
                tracing::debug!(material = index, total, "breakdown sum out of tolerance");
                return Err(SemanticViolation {
                    rule: SemanticRule::BreakdownSumMismatch,
                    material_index: Some(index),
                    total: Some(total),
                    country_code: None,
                });
            }
        }
        Ok(())
    }
}

fn materials(document: &Value) -> &[Value] {
    document
        .get("materials")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn materials_total(document: &Value) -> f64 {
    materials(document).iter().fold(0.0, |acc, m| acc + share_percent(m))
}

fn share_percent(value: &Value) -> f64 {
    value.get("share_percent").and_then(Value::as_f64).unwrap_or(0.0)
}

/// The material's breakdown, if present and non-empty.
fn breakdown(material: &Value) -> Option<&[Value]> {
    material
        .get("origin")
        .and_then(Value::as_object)
        .and_then(|origin| origin.get("breakdown"))
        .and_then(Value::as_array)
        .filter(|entries| !entries.is_empty())
        .map(Vec::as_slice)
}
