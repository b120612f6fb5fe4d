//! Progress Tracking
//!
//! Quality objective progress (clause 6.2), internal audits (clause 9.2) and
//! management reviews (clause 9.3).

#![warn(missing_docs)]

pub mod tracker;
pub mod audit;

pub use tracker::{
    ObjectivesManager, ObjectiveProgress, ObjectiveAchievement, ObjectiveSummary, ObjectiveTrend,
    TrendDirection, status_for_progress,
};
pub use audit::{AuditManager, AuditStatistics};
