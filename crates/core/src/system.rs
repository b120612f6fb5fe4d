//! The quality management system block: scope and processes (clauses 4.3, 4.4).

use serde::{Deserialize, Serialize};
use crate::objective::QualityObjective;
use crate::risk::{Opportunity, Risk};
use crate::Time;

/// The organization's QMS.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityManagementSystem {
    /// Identifier
    pub id: String,

    /// Scope (clause 4.3)
    pub scope: Option<QmsScope>,

    /// Processes (clause 4.4)
    pub processes: Vec<Process>,

    /// Quality objectives (clause 6.2)
    pub objectives: Vec<QualityObjective>,

    /// Organization-level risks
    pub risks: Vec<Risk>,

    /// Organization-level opportunities
    pub opportunities: Vec<Opportunity>,

    /// When created
    pub created: Option<Time>,
}

impl QualityManagementSystem {
    /// Organization-level risks plus every process's own risks.
    pub fn total_risks(&self) -> usize {
        self.risks.len() + self.processes.iter().map(|p| p.risks.len()).sum::<usize>()
    }

    /// Organization-level opportunities plus every process's own opportunities.
    pub fn total_opportunities(&self) -> usize {
        self.opportunities.len()
            + self.processes.iter().map(|p| p.opportunities.len()).sum::<usize>()
    }
}

/// QMS scope (clause 4.3).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QmsScope {
    /// What the QMS covers
    pub description: String,

    /// Products covered
    pub products: Vec<String>,

    /// Services covered
    pub services: Vec<String>,

    /// Clauses declared not applicable
    pub exclusions: Vec<Exclusion>,

    /// Overall justification
    pub justification: String,
}

/// A clause declared not applicable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Exclusion {
    /// Excluded clause
    pub clause: String,
    /// Description
    pub description: String,
    /// Why it does not apply
    pub justification: String,
}

/// A QMS process (clause 4.4).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Process {
    /// Identifier
    pub id: String,

    /// Process name
    pub name: String,

    /// What the process does
    pub description: String,

    /// Inputs
    pub inputs: Vec<ProcessInput>,

    /// Outputs
    pub outputs: Vec<ProcessOutput>,

    /// Resources needed
    pub resources: Vec<Resource>,

    /// Owners and responsible parties
    pub responsibilities: Vec<String>,

    /// Operation and control criteria
    pub criteria: Vec<ProcessCriteria>,

    /// Process-level risks
    pub risks: Vec<Risk>,

    /// Process-level opportunities
    pub opportunities: Vec<Opportunity>,

    /// Lifecycle status
    #[serde(deserialize_with = "crate::tag::optional")]
    pub status: Option<ProcessStatus>,

    /// When created
    pub created: Option<Time>,
}

/// An input to a process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessInput {
    /// Identifier
    pub id: String,
    /// Name
    pub name: String,
    /// Kind of input
    #[serde(rename = "type")]
    pub input_type: String,
    /// Where it comes from
    pub source: String,
}

/// An output of a process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessOutput {
    /// Identifier
    pub id: String,
    /// Name
    pub name: String,
    /// Kind of output
    #[serde(rename = "type")]
    pub output_type: String,
    /// Where it goes
    pub destination: String,
}

/// A criterion for operating and controlling a process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessCriteria {
    /// Identifier
    pub id: String,
    /// Name
    pub name: String,
    /// Description
    pub description: String,
    /// What is measured
    pub metric: String,
    /// Target value
    pub target: String,
}

/// Process lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    /// Planned
    Planned,
    /// Implemented
    Implemented,
    /// Monitored
    Monitored,
    /// Improved
    Improved,
}

/// A resource (clause 7.1).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resource {
    /// Identifier
    pub id: String,
    /// Kind of resource
    #[serde(rename = "type", deserialize_with = "crate::tag::optional")]
    pub resource_type: Option<ResourceType>,
    /// Name
    pub name: String,
    /// Description
    pub description: String,
    /// Amount available
    pub quantity: String,
    /// Currently available
    pub available: bool,
}

/// Kind of resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// People
    People,
    /// Infrastructure
    Infrastructure,
    /// Environment
    Environment,
    /// Monitoring
    Monitoring,
    /// Organizational knowledge
    OrganizationalKnowledge,
}
