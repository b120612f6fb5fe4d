//! Free-text argument parsing.
//!
//! Enum arguments match their wire tags exactly (case-sensitive). Unknown
//! tags fall back to a fixed default where one is defined.

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, TimeZone, Utc};
use serde::de::DeserializeOwned;
use qms_core::{
    AuditType, DocumentCategory, DocumentType, Fallback, Impact, IssueType, NonconformitySeverity, RiskLevel,
    Time,
};

/// Parse a wire tag such as `very_high`.
pub fn parse_tag<T: DeserializeOwned>(tag: &str) -> Option<T> {
    qms_core::from_tag(tag)
}

/// Parse a wire tag, failing on unknown values.
pub fn require_tag<T: DeserializeOwned>(what: &str, tag: &str) -> Result<T> {
    parse_tag(tag).ok_or_else(|| anyhow!("unknown {what}: {tag}"))
}

fn tag_or<T: DeserializeOwned + Fallback>(what: &str, tag: &str) -> T {
    parse_tag(tag).unwrap_or_else(|| {
        tracing::warn!(value = tag, "Unknown {what}, using default");
        T::FALLBACK
    })
}

/// Risk level; unknown values are `medium`.
pub fn risk_level(tag: &str) -> RiskLevel {
    tag_or("risk level", tag)
}

/// Audit type; unknown values are `internal`.
pub fn audit_type(tag: &str) -> AuditType {
    tag_or("audit type", tag)
}

/// Finding severity; unknown values are `minor`.
pub fn severity(tag: &str) -> NonconformitySeverity {
    tag_or("finding severity", tag)
}

/// Document type; unknown values are `record`.
pub fn document_type(tag: &str) -> DocumentType {
    tag_or("document type", tag)
}

/// Document category; unknown values are `quality_management`.
pub fn document_category(tag: &str) -> DocumentCategory {
    tag_or("document category", tag)
}

/// Issue type; unknown values are `internal`.
pub fn issue_type(tag: &str) -> IssueType {
    tag_or("issue type", tag)
}

/// Issue impact; unknown values are `medium`.
pub fn impact(tag: &str) -> Impact {
    tag_or("impact", tag)
}

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date (midnight UTC).
pub fn date(value: &str) -> Result<Time> {
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid date: {value}"))?;
    Ok(Utc.from_utc_datetime(&day.and_time(chrono::NaiveTime::MIN)))
}
