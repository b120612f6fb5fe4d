//! Risk and opportunity manager.
//!
//! Holds risks and opportunities keyed by ID. Every mutation rebuilds the
//! register in full. Single-writer: wrap in a mutex to share across threads.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use qms_core::{
    Action, OpportunityId, Opportunity, OpportunityStatus, Priority, QmsError, Result, Risk,
    RiskId, RiskLevel, RiskStatus, Time,
};

use crate::register::RiskRegister;
use crate::scoring::{calculate_priority, is_critical};

/// Risk manager configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskManagerConfig {
    /// Length of the register's top-by-score view
    pub critical_view_len: usize,
}

impl Default for RiskManagerConfig {
    fn default() -> Self {
        Self { critical_view_len: 10 }
    }
}

/// Count of assessed risks per impact row and likelihood column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskHeatMap {
    rows: BTreeMap<RiskLevel, BTreeMap<RiskLevel, usize>>,
}

impl RiskHeatMap {
    /// Risks with this impact and likelihood.
    pub fn count(&self, impact: RiskLevel, likelihood: RiskLevel) -> usize {
        self.rows
            .get(&impact)
            .and_then(|row| row.get(&likelihood))
            .copied()
            .unwrap_or(0)
    }

    /// Risks in one impact row.
    pub fn row_total(&self, impact: RiskLevel) -> usize {
        self.rows.get(&impact).map_or(0, |row| row.values().sum())
    }

    /// All counted risks.
    pub fn total(&self) -> usize {
        self.rows.values().flat_map(|row| row.values()).sum()
    }

    fn add(&mut self, impact: RiskLevel, likelihood: RiskLevel) {
        *self.rows.entry(impact).or_default().entry(likelihood).or_default() += 1;
    }
}

/// Counts by risk status, priority tier and opportunity status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskStatistics {
    /// Risks identified
    pub identified: usize,
    /// Risks assessed
    pub assessed: usize,
    /// Risks mitigated
    pub mitigated: usize,
    /// Risks monitored
    pub monitored: usize,
    /// Risks with critical priority
    pub critical: usize,
    /// Risks with high priority
    pub high: usize,
    /// Risks with medium priority
    pub medium: usize,
    /// Risks with low priority
    pub low: usize,
    /// Opportunities identified
    pub opportunities_identified: usize,
    /// Opportunities planned
    pub opportunities_planned: usize,
    /// Opportunities implemented
    pub opportunities_implemented: usize,
    /// Opportunities realized
    pub opportunities_realized: usize,
}

/// Manages risks, opportunities and the register.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskManager {
    #[serde(skip)]
    config: RiskManagerConfig,
    risks: HashMap<RiskId, Risk>,
    process_links: HashMap<RiskId, String>,
    opportunities: HashMap<OpportunityId, Opportunity>,
    register: RiskRegister,
}

fn rejected(err: QmsError) -> QmsError {
    tracing::warn!(error = %err, "Risk operation rejected");
    err
}

impl RiskManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty manager with a custom configuration.
    pub fn with_config(config: RiskManagerConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Replace the configuration and rebuild the register.
    pub fn set_config(&mut self, config: RiskManagerConfig) {
        self.config = config;
        self.rebuild_register();
    }

    /// Record a new risk, or replace one with the same ID.
    pub fn identify_risk(&mut self, risk: Risk) -> Result<()> {
        self.insert_risk("identify_risk", risk, None)
    }

    /// Record a risk belonging to a process.
    pub fn identify_process_risk(&mut self, process_id: impl Into<String>, risk: Risk) -> Result<()> {
        let process_id = process_id.into();
        if process_id.is_empty() {
            return Err(rejected(QmsError::missing("identify_process_risk", "process_id")));
        }
        self.insert_risk("identify_process_risk", risk, Some(process_id))
    }

    fn insert_risk(&mut self, operation: &'static str, mut risk: Risk, process_id: Option<String>) -> Result<()> {
        if risk.id.is_empty() {
            return Err(rejected(QmsError::missing(operation, "id")));
        }
        if risk.description.is_empty() {
            return Err(rejected(QmsError::missing(operation, "description")));
        }

        risk.created = Some(chrono::Utc::now());
        risk.status = RiskStatus::Identified;

        match process_id {
            Some(process) => {
                self.process_links.insert(risk.id.clone(), process);
            }
            None => {
                self.process_links.remove(&risk.id);
            }
        }

        tracing::info!(risk = %risk.id, "Risk identified");
        self.risks.insert(risk.id.clone(), risk);
        self.rebuild_register();
        Ok(())
    }

    /// Set likelihood and impact, derive priority and mark assessed.
    pub fn assess_risk(&mut self, id: &RiskId, likelihood: RiskLevel, impact: RiskLevel) -> Result<Priority> {
        let risk = self
            .risks
            .get_mut(id)
            .ok_or_else(|| rejected(QmsError::not_found("assess_risk", "risk", id)))?;

        let priority = calculate_priority(likelihood, impact);
        risk.likelihood = Some(likelihood);
        risk.impact = Some(impact);
        risk.priority = Some(priority);
        risk.status = RiskStatus::Assessed;
        risk.assessed = Some(chrono::Utc::now());

        tracing::info!(risk = %id, %likelihood, %impact, %priority, "Risk assessed");
        self.rebuild_register();
        Ok(priority)
    }

    /// Append mitigation actions and mark mitigated.
    pub fn mitigate_risk(&mut self, id: &RiskId, actions: Vec<Action>) -> Result<()> {
        let risk = self
            .risks
            .get_mut(id)
            .ok_or_else(|| rejected(QmsError::not_found("mitigate_risk", "risk", id)))?;

        risk.mitigation.extend(actions);
        risk.status = RiskStatus::Mitigated;

        tracing::info!(risk = %id, actions = risk.mitigation.len(), "Risk mitigated");
        self.rebuild_register();
        Ok(())
    }

    /// Set the status of a risk.
    pub fn monitor_risk(&mut self, id: &RiskId, status: RiskStatus) -> Result<()> {
        let risk = self
            .risks
            .get_mut(id)
            .ok_or_else(|| rejected(QmsError::not_found("monitor_risk", "risk", id)))?;

        risk.status = status;

        tracing::info!(risk = %id, %status, "Risk status updated");
        self.rebuild_register();
        Ok(())
    }

    /// Record a new opportunity, or replace one with the same ID.
    pub fn identify_opportunity(&mut self, mut opportunity: Opportunity) -> Result<()> {
        if opportunity.id.is_empty() {
            return Err(rejected(QmsError::missing("identify_opportunity", "id")));
        }
        if opportunity.description.is_empty() {
            return Err(rejected(QmsError::missing("identify_opportunity", "description")));
        }

        opportunity.created = Some(chrono::Utc::now());
        opportunity.status = OpportunityStatus::Identified;

        tracing::info!(opportunity = %opportunity.id, "Opportunity identified");
        self.opportunities.insert(opportunity.id.clone(), opportunity);
        self.rebuild_register();
        Ok(())
    }

    /// Replace an opportunity's actions and mark it planned.
    pub fn realize_opportunity(&mut self, id: &OpportunityId, actions: Vec<Action>) -> Result<()> {
        let opportunity = self
            .opportunities
            .get_mut(id)
            .ok_or_else(|| rejected(QmsError::not_found("realize_opportunity", "opportunity", id)))?;

        opportunity.actions = actions;
        opportunity.status = OpportunityStatus::Planned;

        tracing::info!(opportunity = %id, "Opportunity planned");
        self.rebuild_register();
        Ok(())
    }

    /// Look up a risk.
    pub fn get_risk(&self, id: &RiskId) -> Option<&Risk> {
        self.risks.get(id)
    }

    /// Look up an opportunity.
    pub fn get_opportunity(&self, id: &OpportunityId) -> Option<&Opportunity> {
        self.opportunities.get(id)
    }

    /// Every risk, by ID.
    pub fn risks(&self) -> Vec<&Risk> {
        sorted_by_id(self.risks.values())
    }

    /// Every opportunity, by ID.
    pub fn opportunities(&self) -> Vec<&Opportunity> {
        let mut all: Vec<_> = self.opportunities.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// The current register.
    pub fn register(&self) -> &RiskRegister {
        &self.register
    }

    /// Assessed risks whose priority is at least `min`, by ID.
    pub fn high_priority_risks(&self, min: Priority) -> Vec<&Risk> {
        sorted_by_id(
            self.risks
                .values()
                .filter(|r| r.priority.is_some_and(|p| p >= min)),
        )
    }

    /// Risks with very high impact and high or very high likelihood, by ID.
    pub fn critical_risks(&self) -> Vec<&Risk> {
        sorted_by_id(self.risks.values().filter(|r| is_critical(r)))
    }

    /// Risks with any unfinished mitigation action due before `now`, by ID.
    pub fn overdue_mitigations(&self, now: Time) -> Vec<&Risk> {
        sorted_by_id(
            self.risks
                .values()
                .filter(|r| r.mitigation.iter().any(|a| a.is_overdue(now))),
        )
    }

    /// Impact × likelihood distribution of assessed risks.
    pub fn heat_map(&self) -> RiskHeatMap {
        let mut map = RiskHeatMap::default();
        for risk in self.risks.values() {
            if let (Some(impact), Some(likelihood)) = (risk.impact, risk.likelihood) {
                map.add(impact, likelihood);
            }
        }
        map
    }

    /// Status and priority counts.
    pub fn statistics(&self) -> RiskStatistics {
        let mut stats = RiskStatistics::default();

        for risk in self.risks.values() {
            match risk.status {
                RiskStatus::Identified => stats.identified += 1,
                RiskStatus::Assessed => stats.assessed += 1,
                RiskStatus::Mitigated => stats.mitigated += 1,
                RiskStatus::Monitored => stats.monitored += 1,
            }
            match risk.priority {
                Some(Priority::Critical) => stats.critical += 1,
                Some(Priority::High) => stats.high += 1,
                Some(Priority::Medium) => stats.medium += 1,
                Some(Priority::Low) => stats.low += 1,
                None => {}
            }
        }

        for opportunity in self.opportunities.values() {
            match opportunity.status {
                OpportunityStatus::Identified => stats.opportunities_identified += 1,
                OpportunityStatus::Planned => stats.opportunities_planned += 1,
                OpportunityStatus::Implemented => stats.opportunities_implemented += 1,
                OpportunityStatus::Realized => stats.opportunities_realized += 1,
            }
        }

        stats
    }

    fn rebuild_register(&mut self) {
        let links = &self.process_links;
        self.register = RiskRegister::rebuild(
            self.risks
                .values()
                .map(|risk| (risk, links.get(&risk.id).map(String::as_str))),
            self.config.critical_view_len,
            chrono::Utc::now(),
        );
    }
}

fn sorted_by_id<'a>(risks: impl Iterator<Item = &'a Risk>) -> Vec<&'a Risk> {
    let mut all: Vec<_> = risks.collect();
    all.sort_by(|a, b| a.id.cmp(&b.id));
    all
}
