//! The risk register: a ranked projection of every known risk.
//!
//! The register is rebuilt from scratch on every write. Entries are sorted by
//! score descending, ties broken by risk ID ascending, so rebuilding the same
//! risks always yields the same order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use qms_core::{Action, Priority, Risk, RiskId, RiskLevel, RiskStatus, Time};

use crate::scoring::score_of;

/// One risk as it appears in the register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskEntry {
    /// Risk identifier
    pub risk_id: RiskId,

    /// Risk description
    pub description: String,

    /// Process the risk belongs to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_id: Option<String>,

    /// Assessed likelihood
    pub likelihood: Option<RiskLevel>,

    /// Assessed impact
    pub impact: Option<RiskLevel>,

    /// Likelihood weight × impact weight
    pub risk_score: u32,

    /// Assessed priority tier
    pub priority: Option<Priority>,

    /// Handling status
    pub status: RiskStatus,

    /// When the risk was last assessed
    pub last_assessed: Option<Time>,
}

impl RiskEntry {
    /// Project a risk into a register entry.
    pub fn from_risk(risk: &Risk, process_id: Option<&str>) -> Self {
        Self {
            risk_id: risk.id.clone(),
            description: risk.description.clone(),
            process_id: process_id.map(str::to_string),
            likelihood: risk.likelihood,
            impact: risk.impact,
            risk_score: score_of(risk),
            priority: risk.priority,
            status: risk.status,
            last_assessed: risk.assessed,
        }
    }
}

/// Ranked register of all risks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskRegister {
    /// Every risk, highest score first
    pub organization_risks: Vec<RiskEntry>,

    /// Process-linked entries grouped by process ID
    pub process_risks: BTreeMap<String, Vec<RiskEntry>>,

    /// Top entries by score, regardless of priority tier
    pub critical_risks: Vec<RiskEntry>,

    /// Mitigation actions of every risk, in register order
    pub mitigation_actions: Vec<Action>,

    /// When the register was last rebuilt
    pub last_updated: Option<Time>,
}

impl RiskRegister {
    /// Rebuild the register from `(risk, process)` pairs.
    pub fn rebuild<'a>(
        risks: impl IntoIterator<Item = (&'a Risk, Option<&'a str>)>,
        critical_view_len: usize,
        now: Time,
    ) -> Self {
        let mut ranked: Vec<(&Risk, RiskEntry)> = risks
            .into_iter()
            .map(|(risk, process)| (risk, RiskEntry::from_risk(risk, process)))
            .collect();

        ranked.sort_by(|(_, a), (_, b)| {
            b.risk_score
                .cmp(&a.risk_score)
                .then_with(|| a.risk_id.cmp(&b.risk_id))
        });

        let mitigation_actions = ranked
            .iter()
            .flat_map(|(risk, _)| risk.mitigation.iter().cloned())
            .collect();

        let organization_risks: Vec<RiskEntry> = ranked.into_iter().map(|(_, entry)| entry).collect();

        let mut process_risks: BTreeMap<String, Vec<RiskEntry>> = BTreeMap::new();
        for entry in &organization_risks {
            if let Some(process) = &entry.process_id {
                process_risks.entry(process.clone()).or_default().push(entry.clone());
            }
        }

        let critical_risks = organization_risks
            .iter()
            .take(critical_view_len)
            .cloned()
            .collect();

        tracing::debug!(
            entries = organization_risks.len(),
            processes = process_risks.len(),
            "Risk register rebuilt"
        );

        Self {
            organization_risks,
            process_risks,
            critical_risks,
            mitigation_actions,
            last_updated: Some(now),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.organization_risks.len()
    }

    /// True when no risks are registered.
    pub fn is_empty(&self) -> bool {
        self.organization_risks.is_empty()
    }
}
