//! # Percentage Tolerance Policy
//!
//! Every sum check in the semantic layer compares a left-to-right sum of
//! `share_percent` values against a fixed target with a fixed absolute
//! tolerance. Both numbers live here as named constants so tests can probe
//! the boundary precisely.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Expected sum of a percentage breakdown.
pub const PERCENT_TARGET: f64 = 100.0;

/// Maximum absolute deviation from [`PERCENT_TARGET`] that still passes.
pub const PERCENT_TOLERANCE: f64 = 0.1;

/// Target and tolerance applied to percentage sums.
///
/// A sum passes iff `|sum - target| <= tolerance`. The comparison is
/// inclusive at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TolerancePolicy {
    /// Expected sum.
    pub target: f64,
    /// Maximum absolute deviation.
    pub tolerance: f64,
}

impl Default for TolerancePolicy {
    fn default() -> Self {
        Self {
            target: PERCENT_TARGET,
            tolerance: PERCENT_TOLERANCE,
        }
    }
}

impl TolerancePolicy {
    /// Build a policy, rejecting non-finite values and negative tolerances.
    pub fn new(target: f64, tolerance: f64) -> Result<Self, ConfigError> {
        let policy = Self { target, tolerance };
        policy.check()?;
        Ok(policy)
    }

    /// Verify the policy can be used for comparisons.
    pub fn check(&self) -> Result<(), ConfigError> {
        if !self.target.is_finite() || !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance {
                target: self.target,
                tolerance: self.tolerance,
            });
        }
        Ok(())
    }

    /// Absolute deviation of `sum` from the target.
    pub fn deviation(&self, sum: f64) -> f64 {
        (sum - self.target).abs()
    }

    /// Whether `sum` lies within tolerance of the target.
    pub fn accepts(&self, sum: f64) -> bool {
        self.deviation(sum) <= self.tolerance
    }
}

impl fmt::Display for TolerancePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ± {}", self.target, self.tolerance)
    }
}
