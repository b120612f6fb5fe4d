//! Quality objective tracking.
//!
//! Objective status follows the latest reported progress: 0 or less is
//! planned, between 0 and 100 is in progress, 100 or more is achieved.
//! An achieved objective stays achieved.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use qms_core::{ObjectiveId, ObjectiveStatus, QmsError, QualityObjective, Result, Time};

/// A progress report against an objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveProgress {
    /// Objective reported on
    pub objective_id: ObjectiveId,

    /// When reported
    pub date: Time,

    /// Percent complete; values over 100 count as achieved
    pub progress: f64,

    /// Status after applying this report
    #[serde(default)]
    pub status: ObjectiveStatus,

    /// Free-text comment, used as evidence on achievement
    #[serde(default)]
    pub comments: String,
}

impl ObjectiveProgress {
    /// A report with no comment.
    pub fn new(objective_id: impl Into<ObjectiveId>, date: Time, progress: f64) -> Self {
        Self {
            objective_id: objective_id.into(),
            date,
            progress,
            status: ObjectiveStatus::default(),
            comments: String::new(),
        }
    }

    /// Attach a comment.
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }
}

/// Recorded when an objective is first achieved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveAchievement {
    /// Objective
    pub objective_id: ObjectiveId,
    /// When first achieved
    pub achieved_date: Time,
    /// Supporting evidence
    pub evidence: String,
    /// Whether the achievement was recognised
    #[serde(default)]
    pub celebrated: bool,
}

/// Direction of the last two progress reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    /// Improving
    Improving,
    /// Stable
    Stable,
    /// Declining
    Declining,
}

/// Progress history and direction of one objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveTrend {
    /// Objective
    pub objective_id: ObjectiveId,
    /// Direction of the last change
    pub trend: TrendDirection,
    /// Reported progress values, oldest first
    pub data: Vec<f64>,
}

/// Counts per status and the achievement rate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveSummary {
    /// All objectives
    pub total_objectives: usize,
    /// Planned
    pub planned: usize,
    /// In progress
    pub in_progress: usize,
    /// Achieved
    pub achieved: usize,
    /// Not achieved
    pub not_achieved: usize,
    /// Percent of objectives achieved
    pub achievement_rate: f64,
}

/// Status implied by a progress value. NaN counts as no progress.
pub fn status_for_progress(progress: f64) -> ObjectiveStatus {
    if progress >= 100.0 {
        ObjectiveStatus::Achieved
    } else if progress > 0.0 {
        ObjectiveStatus::InProgress
    } else {
        ObjectiveStatus::Planned
    }
}

/// Manages quality objectives and their progress history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectivesManager {
    objectives: HashMap<ObjectiveId, QualityObjective>,
    progress_reports: Vec<ObjectiveProgress>,
    achievements: Vec<ObjectiveAchievement>,
}

fn rejected(err: QmsError) -> QmsError {
    tracing::warn!(error = %err, "Objective operation rejected");
    err
}

impl ObjectivesManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an objective, or replace one with the same ID.
    pub fn create_objective(&mut self, mut objective: QualityObjective) -> Result<()> {
        const OP: &str = "create_objective";

        if objective.id.is_empty() {
            return Err(rejected(QmsError::missing(OP, "id")));
        }
        if objective.name.is_empty() {
            return Err(rejected(QmsError::missing(OP, "name")));
        }
        if !objective.measurable {
            return Err(rejected(QmsError::InvalidField {
                operation: OP,
                field: "measurable",
                reason: "must be true",
            }));
        }
        if objective.targets.is_empty() {
            return Err(rejected(QmsError::missing(OP, "targets")));
        }
        if objective.responsible.is_empty() {
            return Err(rejected(QmsError::missing(OP, "responsible")));
        }

        objective.created = Some(chrono::Utc::now());
        objective.status = ObjectiveStatus::Planned;

        tracing::info!(objective = %objective.id, "Objective created");
        self.objectives.insert(objective.id.clone(), objective);
        Ok(())
    }

    /// Apply a progress report and return the resulting status.
    pub fn update_progress(&mut self, id: &ObjectiveId, mut report: ObjectiveProgress) -> Result<ObjectiveStatus> {
        let objective = self
            .objectives
            .get_mut(id)
            .ok_or_else(|| rejected(QmsError::not_found("update_progress", "objective", id)))?;

        let previous = objective.status;
        let status = match previous {
            ObjectiveStatus::Achieved => ObjectiveStatus::Achieved,
            _ => status_for_progress(report.progress),
        };
        objective.status = status;

        if status == ObjectiveStatus::Achieved && previous != ObjectiveStatus::Achieved {
            self.achievements.push(ObjectiveAchievement {
                objective_id: id.clone(),
                achieved_date: report.date,
                evidence: report.comments.clone(),
                celebrated: false,
            });
            tracing::info!(objective = %id, "Objective achieved");
        }

        report.objective_id = id.clone();
        report.status = status;
        tracing::info!(objective = %id, progress = report.progress, %status, "Progress recorded");
        self.progress_reports.push(report);

        Ok(status)
    }

    /// Look up an objective.
    pub fn get_objective(&self, id: &ObjectiveId) -> Option<&QualityObjective> {
        self.objectives.get(id)
    }

    /// Every objective, by ID.
    pub fn objectives(&self) -> Vec<&QualityObjective> {
        sorted_by_id(self.objectives.values())
    }

    /// Reports for one objective, oldest first.
    pub fn history(&self, id: &ObjectiveId) -> Vec<&ObjectiveProgress> {
        self.progress_reports.iter().filter(|r| &r.objective_id == id).collect()
    }

    /// Every recorded achievement.
    pub fn achievements(&self) -> &[ObjectiveAchievement] {
        &self.achievements
    }

    /// Achieved objectives, by ID.
    pub fn achieved_objectives(&self) -> Vec<&QualityObjective> {
        sorted_by_id(
            self.objectives
                .values()
                .filter(|o| o.status == ObjectiveStatus::Achieved),
        )
    }

    /// Objectives not achieved whose target date is before `now`, by ID.
    pub fn overdue_objectives(&self, now: Time) -> Vec<&QualityObjective> {
        sorted_by_id(self.objectives.values().filter(|o| {
            o.status != ObjectiveStatus::Achieved && o.timeline.target().is_some_and(|d| d < now)
        }))
    }

    /// Objectives grouped by responsible party.
    pub fn by_responsible(&self) -> BTreeMap<&str, Vec<&QualityObjective>> {
        let mut grouped: BTreeMap<&str, Vec<&QualityObjective>> = BTreeMap::new();
        for objective in self.objectives() {
            grouped.entry(objective.responsible.as_str()).or_default().push(objective);
        }
        grouped
    }

    /// Status counts and achievement rate.
    pub fn summary(&self) -> ObjectiveSummary {
        let mut summary = ObjectiveSummary {
            total_objectives: self.objectives.len(),
            ..Default::default()
        };

        for objective in self.objectives.values() {
            match objective.status {
                ObjectiveStatus::Planned => summary.planned += 1,
                ObjectiveStatus::InProgress => summary.in_progress += 1,
                ObjectiveStatus::Achieved => summary.achieved += 1,
                ObjectiveStatus::NotAchieved => summary.not_achieved += 1,
            }
        }

        if summary.total_objectives > 0 {
            summary.achievement_rate = summary.achieved as f64 / summary.total_objectives as f64 * 100.0;
        }
        summary
    }

    /// Direction of the last two reports. `None` with fewer than two reports.
    pub fn trend(&self, id: &ObjectiveId) -> Option<ObjectiveTrend> {
        let data: Vec<f64> = self.history(id).iter().map(|r| r.progress).collect();
        let [.., previous, latest] = data.as_slice() else {
            return None;
        };

        let trend = if latest > previous {
            TrendDirection::Improving
        } else if latest < previous {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        };

        Some(ObjectiveTrend {
            objective_id: id.clone(),
            trend,
            data,
        })
    }
}

fn sorted_by_id<'a>(objectives: impl Iterator<Item = &'a QualityObjective>) -> Vec<&'a QualityObjective> {
    let mut all: Vec<_> = objectives.collect();
    all.sort_by(|a, b| a.id.cmp(&b.id));
    all
}
