//! Compliance gate.

use qms_core::{Finding, Organization, ValidationResult};

use crate::engine::validate_organization;

/// Compliance gate failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComplianceError {
    /// At least one mandatory requirement is not met.
    #[error("QMS is not compliant with ISO 9001:2015 requirements ({} error findings)", errors.len())]
    NotCompliant {
        /// The error findings that failed the gate
        errors: Vec<Finding>,
    },
}

/// Gate decision after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// No findings
    Pass,
    /// Valid, with warnings or infos
    PassWithWarnings,
    /// At least one error
    Fail,
}

impl GateDecision {
    /// Decide from a validation result.
    pub fn evaluate(result: &ValidationResult) -> Self {
        if !result.valid {
            GateDecision::Fail
        } else if result.total_findings() > 0 {
            GateDecision::PassWithWarnings
        } else {
            GateDecision::Pass
        }
    }

    /// True for both passing decisions.
    pub fn passed(&self) -> bool {
        matches!(self, GateDecision::Pass | GateDecision::PassWithWarnings)
    }
}

/// `Ok(())` when the organization has no error findings.
pub fn ensure_compliant(org: &Organization) -> Result<(), ComplianceError> {
    let result = validate_organization(org);
    if result.valid {
        Ok(())
    } else {
        tracing::warn!(organization = %org.id, errors = result.errors.len(), "Compliance gate failed");
        Err(ComplianceError::NotCompliant { errors: result.errors })
    }
}
