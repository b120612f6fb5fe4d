//! QMS CLI - ISO 9001:2015 quality management toolkit.

mod config;
mod parse;
mod render;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

use qms_core::{
    ActionType, Approval, Audit, AuditFinding, AuditId, AuditReport, Document, DocumentId, Issue,
    ObjectiveId, Organization, OrganizationId, QualityObjective, Risk, RiskId, RiskStatus,
};
use qms_documents::{validate_document, DocumentSearchCriteria, DocumentationManager};
use qms_progress::{AuditManager, ObjectiveProgress, ObjectivesManager};
use qms_quality::{ensure_compliant, ValidationEngine};
use qms_risk::RiskManager;
use qms_storage::{load_state_as, save_state_as, JsonStorage, StateKind, Storage};

use config::{CliConfig, DEFAULT_LOG_LEVEL, DEFAULT_STORAGE_PATH};

#[derive(Parser)]
#[command(name = "qms")]
#[command(about = "ISO 9001:2015 quality management toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Storage path for QMS data
    #[arg(short, long, global = true, env = "QMS_STORAGE", default_value = DEFAULT_STORAGE_PATH)]
    storage: PathBuf,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, global = true, env = "QMS_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

impl Cli {
    fn config(&self) -> CliConfig {
        CliConfig {
            storage_path: self.storage.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

/// Organization given as a JSON file or a stored ID.
#[derive(Args, Debug, Clone)]
struct OrgSource {
    /// Organization JSON file
    file: Option<PathBuf>,

    /// Stored organization ID
    #[arg(long, conflicts_with = "file")]
    org: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List findings for an organization
    Validate(OrgSource),
    /// Print the compliance score
    Score(OrgSource),
    /// Print the compliance report
    Report(OrgSource),
    /// Exit non-zero unless the organization has no error findings
    Check(OrgSource),
    /// Manage stored organizations
    #[command(subcommand)]
    Org(OrgCommand),
    /// Manage risks (clause 6.1)
    #[command(subcommand)]
    Risk(RiskCommand),
    /// Manage quality objectives (clause 6.2)
    #[command(subcommand)]
    Objective(ObjectiveCommand),
    /// Manage internal audits (clause 9.2)
    #[command(subcommand)]
    Audit(AuditCommand),
    /// Manage documented information (clause 7.5)
    #[command(subcommand)]
    Doc(DocCommand),
}

#[derive(Subcommand)]
enum OrgCommand {
    /// Store an organization from a JSON file
    Import {
        /// Organization JSON file
        file: PathBuf,
    },
    /// List stored organizations
    List,
    /// Add a context issue (clause 4.1)
    AddIssue {
        /// Organization ID
        org: String,
        /// Issue description
        description: String,
        /// internal or external
        #[arg(long = "type", default_value = "internal")]
        issue_type: String,
        /// low, medium, high or critical
        #[arg(long, default_value = "medium")]
        impact: String,
    },
}

#[derive(Subcommand)]
enum RiskCommand {
    /// Identify a risk
    Identify {
        /// Risk description
        description: String,
        /// Risk ID (generated if omitted)
        #[arg(long)]
        id: Option<String>,
        /// Process the risk belongs to
        #[arg(long)]
        process: Option<String>,
        /// Cause (repeatable)
        #[arg(long = "cause")]
        causes: Vec<String>,
        /// Effect (repeatable)
        #[arg(long = "effect")]
        effects: Vec<String>,
    },
    /// Assess likelihood and impact
    Assess {
        /// Risk ID
        id: String,
        /// very_low, low, medium, high or very_high
        likelihood: String,
        /// very_low, low, medium, high or very_high
        impact: String,
    },
    /// Add a mitigation action
    Mitigate {
        /// Risk ID
        id: String,
        /// Action description
        action: String,
        /// Responsible party
        #[arg(long, default_value = "")]
        responsible: String,
        /// Due date (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        due: Option<String>,
    },
    /// Set the handling status
    Monitor {
        /// Risk ID
        id: String,
        /// identified, assessed, mitigated or monitored
        status: String,
    },
    /// Print the ranked register
    Register,
    /// Print risks with very high impact and high or very high likelihood
    Critical,
    /// Print the impact by likelihood heat map
    Heatmap,
    /// Print risk statistics
    Stats,
}

#[derive(Subcommand)]
enum ObjectiveCommand {
    /// Create a measurable objective
    Create {
        /// Objective ID
        id: String,
        /// Objective name
        name: String,
        /// Target metric
        #[arg(long)]
        metric: String,
        /// Target value
        #[arg(long)]
        target: String,
        /// Target unit
        #[arg(long, default_value = "")]
        unit: String,
        /// Responsible party
        #[arg(long)]
        responsible: String,
        /// Target date (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        target_date: Option<String>,
    },
    /// Report progress in percent
    Progress {
        /// Objective ID
        id: String,
        /// Percent complete
        percent: f64,
        /// Comment, kept as evidence on achievement
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Print counts per status and the achievement rate
    Summary,
}

#[derive(Subcommand)]
enum AuditCommand {
    /// Plan an audit
    Create {
        /// Audit ID
        id: String,
        /// Audit title
        title: String,
        /// Scope description
        #[arg(long)]
        scope: String,
        /// internal, external, certification, supplier, process or system
        #[arg(long = "type", default_value = "internal")]
        audit_type: String,
        /// Planned start (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        start: Option<String>,
    },
    /// Start a planned audit
    Start {
        /// Audit ID
        id: String,
    },
    /// Record a finding
    Finding {
        /// Audit ID
        id: String,
        /// ISO 9001 clause
        clause: String,
        /// What was found
        description: String,
        /// critical, major, minor or observation
        #[arg(long, default_value = "minor")]
        severity: String,
        /// Due date (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        due: Option<String>,
    },
    /// Complete an audit
    Complete {
        /// Audit ID
        id: String,
        /// Report summary
        #[arg(long)]
        summary: Option<String>,
    },
    /// Print audit statistics
    Stats,
}

#[derive(Subcommand)]
enum DocCommand {
    /// Add a draft document
    Add {
        /// Document ID
        id: String,
        /// Document title
        title: String,
        /// Document type
        #[arg(long = "type", default_value = "record")]
        doc_type: String,
        /// Document category
        #[arg(long, default_value = "quality_management")]
        category: String,
        /// Author
        #[arg(long, default_value = "")]
        author: String,
        /// Owner
        #[arg(long, default_value = "")]
        owner: String,
        /// Related clause (repeatable)
        #[arg(long = "clause")]
        clauses: Vec<String>,
        /// Keyword (repeatable)
        #[arg(long = "keyword")]
        keywords: Vec<String>,
        /// Retention period in days
        #[arg(long)]
        retention_days: Option<i64>,
    },
    /// Record an approval
    Approve {
        /// Document ID
        id: String,
        /// Approver ID
        approver: String,
    },
    /// Search documents by exact field values
    Search {
        /// Document type
        #[arg(long = "type")]
        doc_type: Option<String>,
        /// Document category
        #[arg(long)]
        category: Option<String>,
        /// Document status
        #[arg(long)]
        status: Option<String>,
        /// Exact title
        #[arg(long)]
        title: Option<String>,
        /// Author
        #[arg(long)]
        author: Option<String>,
        /// Keyword
        #[arg(long)]
        keyword: Option<String>,
        /// Related clause
        #[arg(long)]
        clause: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.config().init_logging();
    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.config();
    let json = cli.json;

    match cli.command {
        Commands::Validate(source) => {
            let org = load_org(&config, &source).await?;
            let result = ValidationEngine::new().validate(&org);
            emit(json, &result, || render::validation(&result))?;
        }
        Commands::Score(source) => {
            let org = load_org(&config, &source).await?;
            let score = ValidationEngine::new().score(&org);
            emit(json, &serde_json::json!({ "organization_id": org.id, "score": score }), || {
                format!("{score:.1}\n")
            })?;
        }
        Commands::Report(source) => {
            let org = load_org(&config, &source).await?;
            let report = ValidationEngine::new().report(&org);
            emit(json, &report, || render::report(&report))?;
        }
        Commands::Check(source) => {
            let org = load_org(&config, &source).await?;
            ensure_compliant(&org)?;
            emit(json, &serde_json::json!({ "organization_id": org.id, "compliant": true }), || {
                format!("{} is compliant\n", org.id)
            })?;
        }
        Commands::Org(command) => org_command(&config, json, command).await?,
        Commands::Risk(command) => risk_command(&config, json, command).await?,
        Commands::Objective(command) => objective_command(&config, json, command).await?,
        Commands::Audit(command) => audit_command(&config, json, command).await?,
        Commands::Doc(command) => doc_command(&config, json, command).await?,
    }

    Ok(())
}

async fn open_storage(config: &CliConfig) -> Result<JsonStorage> {
    JsonStorage::new(&config.storage_path)
        .await
        .with_context(|| format!("opening storage at {}", config.storage_path.display()))
}

async fn read_org_file(path: &Path) -> Result<Organization> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

async fn load_org(config: &CliConfig, source: &OrgSource) -> Result<Organization> {
    match (&source.file, &source.org) {
        (Some(path), _) => read_org_file(path).await,
        (None, Some(id)) => {
            let storage = open_storage(config).await?;
            storage
                .load_organization(&OrganizationId::from(id.as_str()))
                .await?
                .with_context(|| format!("organization {id} not found"))
        }
        (None, None) => bail!("give an organization JSON file or --org <ID>"),
    }
}

async fn load_state<T: DeserializeOwned + Default>(storage: &JsonStorage, kind: StateKind) -> Result<T> {
    load_state_as(storage, kind)
        .await
        .with_context(|| format!("loading {kind} state"))
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}

async fn org_command(config: &CliConfig, json: bool, command: OrgCommand) -> Result<()> {
    let mut storage = open_storage(config).await?;

    match command {
        OrgCommand::Import { file } => {
            let org = read_org_file(&file).await?;
            storage.save_organization(&org).await?;
            info!(organization = %org.id, "Imported organization");
            println!("Imported organization: {} - {}", org.id, org.name);
        }
        OrgCommand::List => {
            let orgs = storage.list_organizations().await?;
            let rows: Vec<_> = orgs
                .iter()
                .map(|o| serde_json::json!({ "id": o.id, "name": o.name }))
                .collect();
            emit(json, &rows, || {
                let mut out = format!("Organizations ({})\n", orgs.len());
                for org in &orgs {
                    out.push_str(&format!("  {} - {}\n", org.id, org.name));
                }
                out
            })?;
        }
        OrgCommand::AddIssue { org, description, issue_type, impact } => {
            let id = OrganizationId::from(org.as_str());
            let mut organization = storage
                .load_organization(&id)
                .await?
                .with_context(|| format!("organization {id} not found"))?;
            let issue = Issue::new(description, parse::issue_type(&issue_type), parse::impact(&impact));
            println!("Added issue: {}", issue.id);
            organization.add_issue(issue);
            storage.save_organization(&organization).await?;
        }
    }
    Ok(())
}

async fn risk_command(config: &CliConfig, json: bool, command: RiskCommand) -> Result<()> {
    let mut storage = open_storage(config).await?;
    let mut manager: RiskManager = load_state(&storage, StateKind::Risks).await?;

    let changed = match command {
        RiskCommand::Identify { description, id, process, causes, effects } => {
            let id = id.map_or_else(RiskId::generate, RiskId::new);
            let risk = Risk::new(id.clone(), description)
                .with_causes(causes)
                .with_effects(effects);
            match process {
                Some(process) => manager.identify_process_risk(process, risk)?,
                None => manager.identify_risk(risk)?,
            }
            println!("Identified risk: {id}");
            true
        }
        RiskCommand::Assess { id, likelihood, impact } => {
            let id = RiskId::new(id);
            let priority = manager.assess_risk(&id, parse::risk_level(&likelihood), parse::risk_level(&impact))?;
            println!("Risk {id} priority: {priority}");
            true
        }
        RiskCommand::Mitigate { id, action, responsible, due } => {
            let id = RiskId::new(id);
            let existing = manager
                .get_risk(&id)
                .map_or(0, |r| r.mitigation.len());
            let mut action = qms_core::Action::new(action, ActionType::Mitigation);
            action.id = format!("{id}-M{}", existing + 1);
            action.responsible = responsible;
            action.timeline = due.as_deref().map(parse::date).transpose()?;
            manager.mitigate_risk(&id, vec![action])?;
            println!("Risk {id} mitigated");
            true
        }
        RiskCommand::Monitor { id, status } => {
            let id = RiskId::new(id);
            let status: RiskStatus = parse::require_tag("risk status", &status)?;
            manager.monitor_risk(&id, status)?;
            println!("Risk {id} is {status}");
            true
        }
        RiskCommand::Register => {
            let register = manager.register();
            emit(json, register, || render::register(&register.organization_risks))?;
            false
        }
        RiskCommand::Critical => {
            let critical = manager.critical_risks();
            emit(json, &critical, || {
                let mut out = format!("Critical risks ({})\n", critical.len());
                for risk in &critical {
                    out.push_str(&format!("  {} - {}\n", risk.id, risk.description));
                }
                out
            })?;
            false
        }
        RiskCommand::Heatmap => {
            let map = manager.heat_map();
            emit(json, &map, || render::heat_map(&map))?;
            false
        }
        RiskCommand::Stats => {
            let stats = manager.statistics();
            emit(json, &stats, || render::risk_statistics(&stats))?;
            false
        }
    };

    if changed {
        save_state_as(&mut storage, StateKind::Risks, &manager).await?;
    }
    Ok(())
}

async fn objective_command(config: &CliConfig, json: bool, command: ObjectiveCommand) -> Result<()> {
    let mut storage = open_storage(config).await?;
    let mut manager: ObjectivesManager = load_state(&storage, StateKind::Objectives).await?;

    let changed = match command {
        ObjectiveCommand::Create { id, name, metric, target, unit, responsible, target_date } => {
            let mut objective = QualityObjective::new(id.as_str(), name)
                .with_target(metric, target, unit)
                .with_responsible(responsible);
            if let Some(date) = target_date {
                objective = objective.with_target_date(parse::date(&date)?);
            }
            manager.create_objective(objective)?;
            println!("Created objective: {id}");
            true
        }
        ObjectiveCommand::Progress { id, percent, comment } => {
            let id = ObjectiveId::new(id);
            let report = ObjectiveProgress::new(id.clone(), Utc::now(), percent).with_comments(comment);
            let status = manager.update_progress(&id, report)?;
            println!("Objective {id} is {status}");
            true
        }
        ObjectiveCommand::Summary => {
            let summary = manager.summary();
            emit(json, &summary, || {
                format!(
                    "Objectives: {} total, {} planned, {} in progress, {} achieved, {} not achieved\n\
                     Achievement rate: {:.1}%\n",
                    summary.total_objectives,
                    summary.planned,
                    summary.in_progress,
                    summary.achieved,
                    summary.not_achieved,
                    summary.achievement_rate,
                )
            })?;
            false
        }
    };

    if changed {
        save_state_as(&mut storage, StateKind::Objectives, &manager).await?;
    }
    Ok(())
}

async fn audit_command(config: &CliConfig, json: bool, command: AuditCommand) -> Result<()> {
    let mut storage = open_storage(config).await?;
    let mut manager: AuditManager = load_state(&storage, StateKind::Audits).await?;

    let changed = match command {
        AuditCommand::Create { id, title, scope, audit_type, start } => {
            let mut audit = Audit::new(id.as_str(), title, scope);
            audit.audit_type = parse::audit_type(&audit_type);
            audit.planned_start_date = start.as_deref().map(parse::date).transpose()?;
            manager.create_audit(audit)?;
            println!("Planned audit: {id}");
            true
        }
        AuditCommand::Start { id } => {
            let id = AuditId::new(id);
            manager.start_audit(&id, Utc::now())?;
            println!("Started audit: {id}");
            true
        }
        AuditCommand::Finding { id, clause, description, severity, due } => {
            let id = AuditId::new(id);
            let finding = AuditFinding {
                clause,
                description,
                severity: parse::severity(&severity),
                due_date: due.as_deref().map(parse::date).transpose()?,
                ..Default::default()
            };
            manager.add_finding(&id, finding)?;
            println!("Recorded finding on audit {id}");
            true
        }
        AuditCommand::Complete { id, summary } => {
            let id = AuditId::new(id);
            let now = Utc::now();
            let report = summary.map(|summary| AuditReport {
                id: format!("{id}-R"),
                summary,
                issued_date: Some(now),
                ..Default::default()
            });
            manager.complete_audit(&id, now, report)?;
            println!("Completed audit: {id}");
            true
        }
        AuditCommand::Stats => {
            let stats = manager.statistics();
            emit(json, &stats, || {
                format!(
                    "Audits: {} planned, {} in progress, {} completed, {} reported, {} closed\n\
                     Findings: {} critical, {} major, {} minor, {} observations ({} open)\n",
                    stats.planned,
                    stats.in_progress,
                    stats.completed,
                    stats.reported,
                    stats.closed,
                    stats.critical_findings,
                    stats.major_findings,
                    stats.minor_findings,
                    stats.observations,
                    stats.open_findings,
                )
            })?;
            false
        }
    };

    if changed {
        save_state_as(&mut storage, StateKind::Audits, &manager).await?;
    }
    Ok(())
}

async fn doc_command(config: &CliConfig, json: bool, command: DocCommand) -> Result<()> {
    let mut storage = open_storage(config).await?;
    let mut manager: DocumentationManager = load_state(&storage, StateKind::Documents).await?;

    let changed = match command {
        DocCommand::Add {
            id,
            title,
            doc_type,
            category,
            author,
            owner,
            clauses,
            keywords,
            retention_days,
        } => {
            let mut doc = Document::new(id.as_str(), title, parse::document_type(&doc_type));
            doc.category = Some(parse::document_category(&category));
            doc.metadata.author = author;
            doc.metadata.owner = owner;
            doc.metadata.related_clauses = clauses;
            doc.metadata.keywords = keywords;
            doc.metadata.retention_days = retention_days;
            if let Err(err) = validate_document(&doc) {
                eprintln!("warning: {err}");
            }
            manager.add_document(doc)?;
            println!("Added document: {id}");
            true
        }
        DocCommand::Approve { id, approver } => {
            let id = DocumentId::new(id);
            let approval = Approval {
                approver_id: approver,
                ..Default::default()
            };
            if manager.approve_document(&id, approval)? {
                println!("Document {id} approved");
            } else {
                println!("Approval recorded for {id}");
            }
            true
        }
        DocCommand::Search { doc_type, category, status, title, author, keyword, clause } => {
            let criteria = DocumentSearchCriteria {
                doc_type: doc_type.as_deref().map(parse::document_type),
                category: category.as_deref().map(parse::document_category),
                status: status
                    .as_deref()
                    .map(|s| parse::require_tag("document status", s))
                    .transpose()?,
                title,
                author,
                keyword,
                clause,
            };
            let found = manager.search(&criteria);
            emit(json, &found, || {
                let mut out = format!("Documents ({})\n", found.len());
                for doc in &found {
                    out.push_str(&format!(
                        "  {} | {:?} | v{} - {}\n",
                        doc.id,
                        doc.status,
                        doc.current_version().unwrap_or("-"),
                        doc.title
                    ));
                }
                out
            })?;
            false
        }
    };

    if changed {
        save_state_as(&mut storage, StateKind::Documents, &manager).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cli(dir: &TempDir, args: &[&str]) -> Cli {
        let storage = dir.path().join(".qms");
        let mut argv = vec!["qms", "--storage", storage.to_str().unwrap()];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["qms", "risk", "stats", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Risk(RiskCommand::Stats)));
    }

    #[test]
    fn test_org_source_conflict() {
        assert!(Cli::try_parse_from(["qms", "validate", "org.json", "--org", "ORG-1"]).is_err());
    }

    #[tokio::test]
    async fn test_risk_commands_persist_state() {
        let dir = TempDir::new().unwrap();
        run(cli(&dir, &["risk", "identify", "Key supplier failure", "--id", "RISK-1"])).await.unwrap();
        run(cli(&dir, &["risk", "assess", "RISK-1", "high", "very_high"])).await.unwrap();

        let storage = JsonStorage::new(dir.path().join(".qms")).await.unwrap();
        let manager: RiskManager = load_state_as(&storage, StateKind::Risks).await.unwrap();
        let risk = manager.get_risk(&RiskId::from("RISK-1")).unwrap();
        assert_eq!(risk.priority, Some(qms_core::Priority::High));
        assert_eq!(manager.critical_risks().len(), 1);
    }

    #[tokio::test]
    async fn test_audit_start_guard() {
        let dir = TempDir::new().unwrap();
        run(cli(&dir, &["audit", "create", "AUDIT-1", "Internal audit", "--scope", "All"])).await.unwrap();
        run(cli(&dir, &["audit", "start", "AUDIT-1"])).await.unwrap();
        assert!(run(cli(&dir, &["audit", "start", "AUDIT-1"])).await.is_err());
    }

    #[tokio::test]
    async fn test_check_fails_for_empty_org() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("org.json");
        std::fs::write(&path, r#"{"id":"ORG-1","name":"Acme"}"#).unwrap();

        let err = run(cli(&dir, &["check", path.to_str().unwrap()])).await.unwrap_err();
        assert!(err.to_string().starts_with("QMS is not compliant"));
        run(cli(&dir, &["validate", path.to_str().unwrap()])).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_org_source() {
        let dir = TempDir::new().unwrap();
        assert!(run(cli(&dir, &["score"])).await.is_err());
    }
}
