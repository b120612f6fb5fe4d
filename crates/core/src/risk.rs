//! Risks, opportunities and the actions that address them (clause 6.1).

use serde::{Deserialize, Serialize};
use crate::id::{OpportunityId, RiskId};
use crate::Time;

/// Five-step ordinal scale used for likelihood and impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Lowest
    VeryLow,
    /// Low
    Low,
    /// Medium
    Medium,
    /// High
    High,
    /// Highest
    VeryHigh,
}

impl RiskLevel {
    /// All levels, lowest first.
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::VeryLow,
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::VeryHigh,
    ];

    /// Wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "very_low",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "very_high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opportunities use the same five-step scale.
pub type OpportunityLevel = RiskLevel;

/// Priority tier derived from a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Low
    Low,
    /// Medium
    Medium,
    /// High
    High,
    /// Critical
    Critical,
}

impl Priority {
    /// Wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a risk is in its handling. Caller-set; not enforced as a state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskStatus {
    /// Identified
    #[default]
    Identified,
    /// Assessed
    Assessed,
    /// Mitigated
    Mitigated,
    /// Monitored
    Monitored,
}

impl RiskStatus {
    /// Wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskStatus::Identified => "identified",
            RiskStatus::Assessed => "assessed",
            RiskStatus::Mitigated => "mitigated",
            RiskStatus::Monitored => "monitored",
        }
    }
}

impl std::fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An identified risk.
///
/// Likelihood, impact and priority stay `None` until the risk is assessed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Risk {
    /// Unique identifier
    pub id: RiskId,

    /// What could go wrong
    pub description: String,

    /// Causes
    pub causes: Vec<String>,

    /// Effects if it materialises
    pub effects: Vec<String>,

    /// How likely it is
    #[serde(deserialize_with = "crate::tag::optional")]
    pub likelihood: Option<RiskLevel>,

    /// How bad it would be
    #[serde(deserialize_with = "crate::tag::optional")]
    pub impact: Option<RiskLevel>,

    /// Derived priority tier
    #[serde(deserialize_with = "crate::tag::optional")]
    pub priority: Option<Priority>,

    /// Mitigation actions
    pub mitigation: Vec<Action>,

    /// Handling status
    #[serde(deserialize_with = "crate::tag::or_default")]
    pub status: RiskStatus,

    /// When identified
    pub created: Option<Time>,

    /// When last assessed
    pub assessed: Option<Time>,
}

impl Risk {
    /// Create an unassessed risk.
    pub fn new(id: impl Into<RiskId>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Set causes.
    pub fn with_causes(mut self, causes: Vec<String>) -> Self {
        self.causes = causes;
        self
    }

    /// Set effects.
    pub fn with_effects(mut self, effects: Vec<String>) -> Self {
        self.effects = effects;
        self
    }
}

/// Where an opportunity is in its realisation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityStatus {
    /// Identified
    #[default]
    Identified,
    /// Planned
    Planned,
    /// Implemented
    Implemented,
    /// Realized
    Realized,
}

/// An identified opportunity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Opportunity {
    /// Unique identifier
    pub id: OpportunityId,

    /// What could go well
    pub description: String,

    /// Expected benefits
    pub benefits: Vec<String>,

    /// How likely it is
    #[serde(deserialize_with = "crate::tag::optional")]
    pub likelihood: Option<OpportunityLevel>,

    /// How much it would help
    #[serde(deserialize_with = "crate::tag::optional")]
    pub impact: Option<OpportunityLevel>,

    /// Caller-assigned rank
    pub priority: u32,

    /// Realisation actions
    pub actions: Vec<Action>,

    /// Realisation status
    #[serde(deserialize_with = "crate::tag::or_default")]
    pub status: OpportunityStatus,

    /// When identified
    pub created: Option<Time>,
}

impl Opportunity {
    /// Create a newly identified opportunity.
    pub fn new(id: impl Into<OpportunityId>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            ..Default::default()
        }
    }
}

/// An action addressing a risk or opportunity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Action {
    /// Identifier
    pub id: String,

    /// What will be done
    pub description: String,

    /// Kind of action
    #[serde(rename = "type", deserialize_with = "crate::tag::optional")]
    pub action_type: Option<ActionType>,

    /// Who does it
    pub responsible: String,

    /// When it is due
    pub timeline: Option<Time>,

    /// Progress
    #[serde(deserialize_with = "crate::tag::or_default")]
    pub status: ActionStatus,

    /// When recorded
    pub created: Option<Time>,
}

impl Action {
    /// Create a planned action.
    pub fn new(description: impl Into<String>, action_type: ActionType) -> Self {
        Self {
            description: description.into(),
            action_type: Some(action_type),
            created: Some(chrono::Utc::now()),
            ..Default::default()
        }
    }

    /// True when the action is not completed and its due date has passed.
    pub fn is_overdue(&self, now: Time) -> bool {
        self.status != ActionStatus::Completed && self.timeline.is_some_and(|due| due < now)
    }
}

/// Kind of action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Preventive
    Preventive,
    /// Corrective
    Corrective,
    /// Improvement
    Improvement,
    /// Mitigation
    Mitigation,
}

/// Action progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    /// Planned
    #[default]
    Planned,
    /// In progress
    InProgress,
    /// Completed
    Completed,
    /// Verified
    Verified,
}
