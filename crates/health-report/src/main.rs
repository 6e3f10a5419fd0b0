//! Summarize project health snapshot history from a JSON export.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use models::project_health::{HealthSnapshot, HealthTrendSummary};
use services::services::{
    config::{HealthTrendConfig, SnapshotOrdering},
    health_trend::HealthTrendAnalyzer,
    project_health::{InMemorySnapshotSource, ProjectHealthService},
};
use tracing::{debug, info};
use utils::{logging::init_tracing, response::ApiResponse};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "health-report")]
#[command(about = "Compute the health trend of a project from its daily snapshots")]
#[command(version)]
struct Args {
    /// JSON file containing an array of health snapshots
    #[arg(short, long)]
    input: PathBuf,

    /// TOML file with max_days / ordering settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of most recent snapshots to analyze
    #[arg(long)]
    max_days: Option<u32>,

    /// trust_caller or sort_by_date
    #[arg(long)]
    ordering: Option<SnapshotOrdering>,

    /// Only analyze snapshots of this project (the file may mix projects)
    #[arg(long)]
    project_id: Option<Uuid>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() {
    init_tracing("health_report=info,services=info");

    let args = Args::parse();
    let pretty = args.pretty;

    let response = envelope(run(args, |key| std::env::var(key).ok()).await);
    print_envelope(&response, pretty);
    if !response.is_success() {
        std::process::exit(1);
    }
}

fn envelope(result: Result<HealthTrendSummary>) -> ApiResponse<HealthTrendSummary> {
    match result {
        Ok(summary) => ApiResponse::success(summary),
        Err(e) => ApiResponse::error(&format!("{e:#}")),
    }
}

async fn run<F>(args: Args, env: F) -> Result<HealthTrendSummary>
where
    F: Fn(&str) -> Option<String>,
{
    let config = resolve_config(&args, env)?;
    debug!(?config, "Resolved health trend configuration");

    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let snapshots = HealthSnapshot::parse_list(&content)
        .with_context(|| format!("failed to parse snapshots from {}", args.input.display()))?;

    info!(
        snapshots = snapshots.len(),
        input = %args.input.display(),
        "Loaded health snapshots"
    );

    match args.project_id {
        Some(project_id) => {
            let source = InMemorySnapshotSource::from_snapshots(snapshots);
            let service = ProjectHealthService::new(Arc::new(source), config)?;
            Ok(service.health_trend(project_id).await?)
        }
        None => {
            let analyzer = HealthTrendAnalyzer::new(config)?;
            Ok(analyzer.analyze(Some(snapshots.as_slice())))
        }
    }
}

/// Defaults, then the config file, then environment, then flags.
/// Validation runs once, after every layer is applied.
fn resolve_config<F>(args: &Args, env: F) -> Result<HealthTrendConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            HealthTrendConfig::parse_toml(&content)
                .with_context(|| format!("invalid config file {}", path.display()))?
        }
        None => HealthTrendConfig::default(),
    };

    config.apply_lookup(env)?;

    if let Some(max_days) = args.max_days {
        config.max_days = max_days;
    }
    if let Some(ordering) = args.ordering {
        config.ordering = ordering;
    }

    config.validate()?;
    Ok(config)
}

fn print_envelope(response: &ApiResponse<HealthTrendSummary>, pretty: bool) {
    let rendered = if pretty {
        serde_json::to_string_pretty(response)
    } else {
        serde_json::to_string(response)
    };

    match rendered {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("failed to serialize response: {e}"),
    }
}
