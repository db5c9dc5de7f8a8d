use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use conductor_core::domain::{DomainEvent, TaskSnapshot};
use conductor_core::ports::MemoryEventSink;
use conductor_core::settings::{ConductorSettings, LogFormat};
use conductor_core::{
    OrchestratorBuilder, PolicyDocument, Proposal, RiskLevel, TaskState, TransitionContext,
};
use serde::Serialize;

mod telemetry;

#[derive(Parser)]
#[command(name = "conductor")]
#[command(about = "Task lifecycle and policy gate for the automation control plane")]
struct Cli {
    /// Settings file (TOML, JSON or YAML, snake_case keys); CONDUCTOR_* environment variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Policy JSON in the policy-file shape (camelCase keys accepted); replaces the settings policy
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    /// Log filter directive; takes precedence over RUST_LOG and logging.level
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format (overrides logging.format)
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a proposal against the policy; exits with 1 when rejected
    Evaluate {
        #[command(flatten)]
        input: ProposalArgs,
    },
    /// Drive one task through the whole lifecycle and print its history
    Simulate {
        #[command(flatten)]
        input: ProposalArgs,

        /// Final state after Executing (used only if the proposal is approved)
        #[arg(long, value_enum, default_value = "completed")]
        outcome: Outcome,
    },
    /// Print the lifecycle transition table
    Transitions {
        /// Only this state, e.g. `validated` or `rolled-back`
        #[arg(long)]
        from: Option<TaskState>,
    },
}

/// A proposal from a file or given inline.
#[derive(Args)]
struct ProposalArgs {
    /// Proposal JSON, e.g. {"risk": "low", "costUsd": 10}
    #[arg(long, required_unless_present = "risk", conflicts_with_all = ["risk", "cost"])]
    proposal: Option<PathBuf>,

    /// Inline risk level: low, medium or high (needs --cost)
    #[arg(long, requires = "cost")]
    risk: Option<RiskLevel>,

    /// Inline cost in USD (needs --risk)
    #[arg(long, requires = "risk")]
    cost: Option<f64>,
}

impl ProposalArgs {
    fn resolve(&self) -> Result<Proposal> {
        match (&self.proposal, self.risk, self.cost) {
            (Some(path), _, _) => read_proposal(path),
            (None, Some(risk), Some(cost)) => {
                Proposal::new(risk, cost).context("invalid inline proposal")
            }
            _ => bail!("pass --proposal <file> or both --risk and --cost"),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Plain,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Plain => LogFormat::Plain,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Outcome {
    Completed,
    RolledBack,
    Failed,
}

impl From<Outcome> for TaskState {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Completed => TaskState::Completed,
            Outcome::RolledBack => TaskState::RolledBack,
            Outcome::Failed => TaskState::Failed,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut settings = ConductorSettings::load(cli.config.as_deref())
        .context("failed to load conductor settings")?;
    if let Some(path) = &cli.policy {
        settings.policy = read_policy(path)?;
    }
    if let Some(format) = cli.log_format {
        settings.logging.format = format.into();
    }
    telemetry::init_telemetry(&settings.logging, cli.log_level.as_deref())?;

    match cli.command {
        Commands::Evaluate { input } => evaluate(settings, input.resolve()?).await,
        Commands::Simulate { input, outcome } => {
            simulate(settings, input.resolve()?, outcome.into()).await
        }
        Commands::Transitions { from } => {
            for line in transition_lines(from) {
                println!("{line}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_proposal(path: &Path) -> Result<Proposal> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read proposal {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid proposal {}", path.display()))
}

fn read_policy(path: &Path) -> Result<PolicyDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read policy {}", path.display()))?;
    let policy: PolicyDocument = serde_json::from_str(&text)
        .with_context(|| format!("invalid policy {}", path.display()))?;
    policy
        .validate()
        .with_context(|| format!("invalid policy {}", path.display()))?;
    Ok(policy)
}

async fn evaluate(settings: ConductorSettings, proposal: Proposal) -> Result<ExitCode> {
    let registry = OrchestratorBuilder::new()
        .policy(settings.policy)
        .build_registry()?;

    let decision = registry.evaluate(&proposal).await;
    println!("{}", serde_json::to_string_pretty(&decision)?);

    if decision.is_approved() {
        tracing::info!("policy approved");
        Ok(ExitCode::SUCCESS)
    } else {
        let reason = decision.reason().unwrap_or_default();
        tracing::warn!(%reason, "policy rejected");
        Ok(ExitCode::FAILURE)
    }
}

#[derive(Serialize)]
struct SimulationReport {
    task: TaskSnapshot,
    events: Vec<DomainEvent>,
}

async fn simulate(
    settings: ConductorSettings,
    proposal: Proposal,
    outcome: TaskState,
) -> Result<ExitCode> {
    let sink = Arc::new(MemoryEventSink::new());
    let registry = OrchestratorBuilder::new()
        .policy(settings.policy)
        .event_sink(sink.clone())
        .build_registry()?;

    let task_id = registry.create_task().await;
    for state in [
        TaskState::Classified,
        TaskState::Proposed,
        TaskState::Validated,
    ] {
        registry
            .request_transition(task_id, state, TransitionContext::new())
            .await?;
    }

    let gated = registry
        .request_transition(task_id, TaskState::Approved, proposal)
        .await?;
    if gated.state == TaskState::Approved {
        for state in [TaskState::Executing, outcome] {
            registry
                .request_transition(task_id, state, TransitionContext::new())
                .await?;
        }
    }

    let report = SimulationReport {
        task: registry.snapshot(task_id).await?,
        events: sink.events().await,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(ExitCode::SUCCESS)
}

fn transition_lines(from: Option<TaskState>) -> Vec<String> {
    let states: Vec<TaskState> = match from {
        Some(state) => vec![state],
        None => TaskState::ALL.to_vec(),
    };
    states
        .into_iter()
        .map(|state| {
            let successors = state.successors();
            if successors.is_empty() {
                format!("{:<12} (terminal)", state.as_str())
            } else {
                let targets: Vec<&str> = successors.iter().map(|s| s.as_str()).collect();
                format!("{:<12} -> {}", state.as_str(), targets.join(", "))
            }
        })
        .collect()
}
