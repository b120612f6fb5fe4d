//! Plain-text rendering of results.

use std::fmt::Write;

use qms_core::{RiskLevel, ValidationResult};
use qms_quality::ComplianceReport;
use qms_risk::{RiskEntry, RiskHeatMap, RiskStatistics};

/// Findings grouped by severity, then the validity line.
pub fn validation(result: &ValidationResult) -> String {
    let mut out = String::new();
    for finding in result.findings() {
        let _ = writeln!(out, "{finding}");
    }
    let _ = writeln!(
        out,
        "{} error(s), {} warning(s), {} info(s): {}",
        result.errors.len(),
        result.warnings.len(),
        result.infos.len(),
        if result.valid { "valid" } else { "NOT valid" }
    );
    out
}

/// Compliance report summary.
pub fn report(report: &ComplianceReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Organization: {}", report.organization_id);
    let _ = writeln!(out, "Assessed: {}", report.assessment_date.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(
        out,
        "Compliance: {} ({:.1})",
        report.overall_compliance, report.compliance_score
    );

    section(&mut out, "Critical gaps", report.critical_gaps.iter().map(|g| {
        format!("Clause {} - {}", g.clause, g.description)
    }));
    section(&mut out, "Improvement areas", report.improvement_areas.iter().map(|a| {
        format!("{} - {}", a.area, a.description)
    }));
    section(&mut out, "Strengths", report.strengths.iter().cloned());
    section(&mut out, "Recommendations", report.recommendations.iter().cloned());
    out
}

fn section(out: &mut String, title: &str, lines: impl Iterator<Item = String>) {
    let lines: Vec<_> = lines.collect();
    if lines.is_empty() {
        return;
    }
    let _ = writeln!(out, "{title} ({}):", lines.len());
    for line in lines {
        let _ = writeln!(out, "  - {line}");
    }
}

/// One line per register entry.
pub fn register(entries: &[RiskEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(
            out,
            "{:>2} | {:<8} | {:<10} | {} - {}",
            entry.risk_score,
            entry.priority.map_or("-", |p| p.as_str()),
            entry.status.as_str(),
            entry.risk_id,
            entry.description
        );
    }
    out
}

/// Impact rows (very high first) by likelihood columns.
pub fn heat_map(map: &RiskHeatMap) -> String {
    let mut out = String::from("impact \\ likelihood");
    for likelihood in RiskLevel::ALL {
        let _ = write!(out, " | {:>9}", likelihood.as_str());
    }
    out.push('\n');
    for impact in RiskLevel::ALL.into_iter().rev() {
        let _ = write!(out, "{:<19}", impact.as_str());
        for likelihood in RiskLevel::ALL {
            let _ = write!(out, " | {:>9}", map.count(impact, likelihood));
        }
        out.push('\n');
    }
    out
}

/// Risk counters.
pub fn risk_statistics(stats: &RiskStatistics) -> String {
    format!(
        "Risks: {} identified, {} assessed, {} mitigated, {} monitored\n\
         Priority: {} critical, {} high, {} medium, {} low\n\
         Opportunities: {} identified, {} planned, {} implemented, {} realized\n",
        stats.identified,
        stats.assessed,
        stats.mitigated,
        stats.monitored,
        stats.critical,
        stats.high,
        stats.medium,
        stats.low,
        stats.opportunities_identified,
        stats.opportunities_planned,
        stats.opportunities_implemented,
        stats.opportunities_realized,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use qms_core::Organization;
    use qms_risk::RiskManager;

    #[test]
    fn test_validation_summary_line() {
        let mut result = ValidationResult::new();
        result.add_error("6.2", "quality_objectives", "Quality objectives must be established");
        result.add_info("6.1", "opportunities", "Consider identifying opportunities");

        let text = validation(&result);
        assert!(text.contains("Clause 6.2 - quality_objectives"));
        assert!(text.ends_with("1 error(s), 0 warning(s), 1 info(s): NOT valid\n"));
    }

    #[test]
    fn test_report_sections() {
        let org = Organization::new("ORG-1", "Acme");
        let result = qms_quality::validate_organization(&org);
        let text = report(&ComplianceReport::from_result(&org, &result));

        assert!(text.starts_with("Organization: ORG-1\n"));
        assert!(text.contains("Critical gaps ("));
        assert!(text.contains("Recommendations ("));
    }

    #[test]
    fn test_heat_map_layout() {
        let mut manager = RiskManager::new();
        manager.identify_risk(qms_core::Risk::new("RISK-1", "Supplier failure")).unwrap();
        manager
            .assess_risk(&"RISK-1".into(), RiskLevel::High, RiskLevel::VeryHigh)
            .unwrap();

        let text = heat_map(&manager.heat_map());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[1].starts_with("very_high"));
        assert!(lines[1].ends_with("|         1 |         0"));
    }
}
