//! ISO 9001 validation and compliance scoring.
//!
//! Clause checks, the validation engine, scoring, reports and the compliance gate.

#![warn(missing_docs)]

pub mod engine;
pub mod checks;
pub mod score;
pub mod report;
pub mod gate;

pub use engine::{ValidationEngine, EngineConfig, validate_organization, organization_score};
pub use checks::ClauseCheck;
pub use score::{compliance_score, ComplianceLevel};
pub use report::{ComplianceReport, ComplianceGap, ImprovementArea};
pub use gate::{ensure_compliant, ComplianceError, GateDecision};
