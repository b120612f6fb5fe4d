//! Lenient decoding of enum wire tags.
//!
//! Organization files written by other tools may carry an empty tag for an
//! unset value, or a tag this crate does not know. Empty tags decode as unset
//! and unknown tags decode as the type's [`Fallback`]. Matching is exact and
//! case-sensitive.

use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Deserializer};

use crate::audit::{AuditType, NonconformitySeverity};
use crate::document::{DocumentCategory, DocumentType};
use crate::organization::{Impact, IssueType, Status};
use crate::risk::{ActionType, Priority, RiskLevel};
use crate::system::{ProcessStatus, ResourceType};

/// Value an unrecognized wire tag maps to.
pub trait Fallback: Sized {
    /// The fallback value
    const FALLBACK: Self;
}

impl Fallback for IssueType {
    const FALLBACK: Self = IssueType::Internal;
}

impl Fallback for Impact {
    const FALLBACK: Self = Impact::Medium;
}

impl Fallback for Status {
    const FALLBACK: Self = Status::Active;
}

impl Fallback for RiskLevel {
    const FALLBACK: Self = RiskLevel::Medium;
}

impl Fallback for Priority {
    const FALLBACK: Self = Priority::Medium;
}

impl Fallback for ActionType {
    const FALLBACK: Self = ActionType::Preventive;
}

impl Fallback for ProcessStatus {
    const FALLBACK: Self = ProcessStatus::Planned;
}

impl Fallback for ResourceType {
    const FALLBACK: Self = ResourceType::Infrastructure;
}

impl Fallback for AuditType {
    const FALLBACK: Self = AuditType::Internal;
}

impl Fallback for NonconformitySeverity {
    const FALLBACK: Self = NonconformitySeverity::Minor;
}

impl Fallback for DocumentType {
    const FALLBACK: Self = DocumentType::Record;
}

impl Fallback for DocumentCategory {
    const FALLBACK: Self = DocumentCategory::QualityManagement;
}

/// Parse an exact wire tag such as `very_high`.
pub fn from_tag<T: DeserializeOwned>(tag: &str) -> Option<T> {
    let de: StrDeserializer<'_, ValueError> = tag.into_deserializer();
    T::deserialize(de).ok()
}

/// `null` or `""` is `None`; an unknown tag is `T::FALLBACK`.
pub(crate) fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Fallback,
{
    let tag = Option::<String>::deserialize(deserializer)?;
    Ok(match tag.as_deref() {
        None | Some("") => None,
        Some(tag) => Some(from_tag(tag).unwrap_or(T::FALLBACK)),
    })
}

/// `null`, `""` and unknown tags are `T::default()`.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let tag = Option::<String>::deserialize(deserializer)?;
    Ok(tag.as_deref().and_then(|tag| from_tag(tag)).unwrap_or_default())
}

/// Known tags in order; unknown tags are dropped and `null` is empty.
pub(crate) fn known<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let tags = Option::<Vec<String>>::deserialize(deserializer)?;
    Ok(tags.unwrap_or_default().iter().filter_map(|tag| from_tag(tag)).collect())
}
