//! Validation findings and their aggregate.

use serde::{Deserialize, Serialize};

/// How serious a finding is.
///
/// Only errors make a result invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Mandatory requirement not met
    Error,
    /// Recommended element missing
    Warning,
    /// Best-practice suggestion
    Info,
}

impl Severity {
    /// Lowercase tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation outcome, tied to a clause and a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// ISO 9001 clause, e.g. "4.4"
    pub clause: String,

    /// Field or record the finding refers to
    pub field: String,

    /// Human-readable explanation
    pub message: String,

    /// Severity
    pub severity: Severity,
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] Clause {} - {}: {}",
            self.severity, self.clause, self.field, self.message
        )
    }
}

/// Findings from one or more clause checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// False as soon as any error finding is recorded
    pub valid: bool,

    /// Error findings
    #[serde(default)]
    pub errors: Vec<Finding>,

    /// Warning findings
    #[serde(default)]
    pub warnings: Vec<Finding>,

    /// Informational findings
    #[serde(default)]
    pub infos: Vec<Finding>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    /// An empty, valid result.
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            infos: Vec::new(),
        }
    }

    /// Record an error and mark the result invalid.
    pub fn add_error(&mut self, clause: &str, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(Finding {
            clause: clause.to_string(),
            field: field.into(),
            message: message.into(),
            severity: Severity::Error,
        });
        self.valid = false;
    }

    /// Record a warning.
    pub fn add_warning(&mut self, clause: &str, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(Finding {
            clause: clause.to_string(),
            field: field.into(),
            message: message.into(),
            severity: Severity::Warning,
        });
    }

    /// Record an informational finding.
    pub fn add_info(&mut self, clause: &str, field: impl Into<String>, message: impl Into<String>) {
        self.infos.push(Finding {
            clause: clause.to_string(),
            field: field.into(),
            message: message.into(),
            severity: Severity::Info,
        });
    }

    /// Append another result's findings and AND the validity flags.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.infos.extend(other.infos);
        self.valid &= other.valid;
    }

    /// Number of findings of every severity.
    pub fn total_findings(&self) -> usize {
        self.errors.len() + self.warnings.len() + self.infos.len()
    }

    /// All findings: errors, then warnings, then infos.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .chain(self.infos.iter())
    }

    /// Findings for a single clause.
    pub fn for_clause<'a>(&'a self, clause: &'a str) -> impl Iterator<Item = &'a Finding> {
        self.findings().filter(move |f| f.clause == clause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_result_is_valid_and_empty() {
        let result = ValidationResult::new();
        assert!(result.valid);
        assert_eq!(result.total_findings(), 0);
    }

    #[test]
    fn test_only_errors_invalidate() {
        let mut result = ValidationResult::new();
        result.add_warning("4.1", "external_issues", "none");
        result.add_info("4.2", "regulators", "consider");
        assert!(result.valid);

        result.add_error("4.3", "scope", "missing");
        assert!(!result.valid);
        assert_eq!(result.total_findings(), 3);
    }

    #[test]
    fn test_merge_concatenates_and_ands_validity() {
        let mut a = ValidationResult::new();
        a.add_warning("4.1", "w", "w");

        let mut b = ValidationResult::new();
        b.add_error("5.1", "leadership", "missing");
        b.add_info("6.1", "opportunities", "consider");

        a.merge(b);
        assert!(!a.valid);
        assert_eq!(a.errors.len(), 1);
        assert_eq!(a.warnings.len(), 1);
        assert_eq!(a.infos.len(), 1);
        assert_eq!(a.for_clause("5.1").count(), 1);
    }

    #[test]
    fn test_finding_display() {
        let mut result = ValidationResult::new();
        result.add_error("5.2", "policy_statement", "Quality policy must include a statement");
        assert_eq!(
            result.errors[0].to_string(),
            "[error] Clause 5.2 - policy_statement: Quality policy must include a statement"
        );
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"warning\"");
    }
}
