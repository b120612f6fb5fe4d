//! Quality objectives (clause 6.2).

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use crate::id::ObjectiveId;
use crate::Time;

/// A measurable quality objective.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityObjective {
    /// Unique identifier
    pub id: ObjectiveId,

    /// Objective name
    pub name: String,

    /// What it aims at
    pub description: String,

    /// Must be true for the objective to be accepted
    pub measurable: bool,

    /// Metric/value/unit targets
    pub targets: Vec<ObjectiveTarget>,

    /// Responsible party
    pub responsible: String,

    /// Start, target and review dates
    pub timeline: ObjectiveTimeline,

    /// Derived from reported progress
    #[serde(deserialize_with = "crate::tag::or_default")]
    pub status: ObjectiveStatus,

    /// When created
    pub created: Option<Time>,
}

impl QualityObjective {
    /// Create a measurable, planned objective.
    pub fn new(id: impl Into<ObjectiveId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            measurable: true,
            ..Default::default()
        }
    }

    /// Add a target.
    pub fn with_target(mut self, metric: impl Into<String>, value: impl Into<String>, unit: impl Into<String>) -> Self {
        self.targets.push(ObjectiveTarget {
            id: format!("T{}", self.targets.len() + 1),
            metric: metric.into(),
            value: value.into(),
            unit: unit.into(),
        });
        self
    }

    /// Set the responsible party.
    pub fn with_responsible(mut self, responsible: impl Into<String>) -> Self {
        self.responsible = responsible.into();
        self
    }

    /// Set the target date.
    pub fn with_target_date(mut self, target_date: Time) -> Self {
        self.timeline.target_date = Some(target_date);
        self
    }
}

/// One measurable target of an objective.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveTarget {
    /// Target identifier within the objective
    pub id: String,
    /// Measured metric
    pub metric: String,
    /// Target value
    pub value: String,
    /// Unit of the value
    pub unit: String,
}

/// Objective dates. Only `target_date` is required for a valid timeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveTimeline {
    /// When work starts
    pub start_date: Option<Time>,
    /// When the objective should be met
    pub target_date: Option<Time>,
    /// Next review
    pub review_date: Option<Time>,
}

impl ObjectiveTimeline {
    /// Target date, treating the zero instant `0001-01-01T00:00:00Z` as unset.
    pub fn target(&self) -> Option<Time> {
        self.target_date.filter(|d| d.year() > 1)
    }

    /// Whether a usable target date is set.
    pub fn has_target_date(&self) -> bool {
        self.target().is_some()
    }
}

/// Objective status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveStatus {
    /// No progress yet
    #[default]
    Planned,
    /// Partially met
    InProgress,
    /// Target reached
    Achieved,
    /// Missed
    NotAchieved,
}

impl ObjectiveStatus {
    /// Wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectiveStatus::Planned => "planned",
            ObjectiveStatus::InProgress => "in_progress",
            ObjectiveStatus::Achieved => "achieved",
            ObjectiveStatus::NotAchieved => "not_achieved",
        }
    }
}

impl std::fmt::Display for ObjectiveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
