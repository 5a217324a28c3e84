//! golfbench - code-golf benchmark CLI
//!
//! The `golfbench` command evaluates stack-VM submissions against the
//! Fibonacci battery and keeps a ranked leaderboard.
//!
//! ## Commands
//!
//! - `submit`: validate, evaluate and record a submission
//! - `check`: evaluate without recording, with per-input outcomes (`--json`)
//! - `leaderboard`: show the ranked top scores
//! - `battery`: list battery inputs and their reference values

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use golfbench_core::config::parse_step_limit;
use golfbench_core::metrics::METRICS;
use golfbench_core::{
    normalize_source, Evaluation, Harness, HarnessConfig, ScoreRecord, StackVm, Submission,
};
use golfbench_store::{MemoryScoreStore, ScoreStore, SurrealScoreStore};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "golfbench")]
#[command(author = "Stevedores Org")]
#[command(version = golfbench_core::VERSION)]
#[command(about = "Code-golf benchmark harness", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Harness configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Instruction ceiling per run (0, "none" or "unlimited" disable it)
    #[arg(long, global = true, env = "GOLFBENCH_MAX_STEPS")]
    max_steps: Option<String>,

    /// Keep scores in memory instead of the database
    #[arg(long, global = true)]
    memory: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a program and record its score
    Submit {
        /// Submitter name (at most 20 characters)
        #[arg(short, long)]
        name: String,

        /// Path to the program source
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Evaluate a program without recording it
    Check {
        /// Path to the program source
        #[arg(short, long)]
        file: PathBuf,

        /// Print the evaluation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the ranked leaderboard
    Leaderboard {
        /// Number of entries (default: configured leaderboard size)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// List battery inputs and reference values
    Battery,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    golfbench_core::telemetry::init_tracing(cli.json_logs, level);

    let config = load_config(cli.config.as_deref(), cli.max_steps.as_deref())?;
    let store = open_store(cli.memory).await?;
    let harness = Harness::from_config(&config, store).context("Failed to build harness")?;

    let result = match cli.command {
        Commands::Submit { name, file } => cmd_submit(&harness, &name, &file).await,
        Commands::Check { file, json } => cmd_check(&harness, &file, json).await,
        Commands::Leaderboard { limit, json } => cmd_leaderboard(&harness, limit, json).await,
        Commands::Battery => cmd_battery(&harness),
    };

    METRICS.flush();
    result
}

/// Defaults or `path`, then `GOLFBENCH_*` variables, then `--max-steps`.
fn load_config(path: Option<&Path>, max_steps: Option<&str>) -> Result<HarnessConfig> {
    let mut config = match path {
        Some(path) => HarnessConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => HarnessConfig::default(),
    };
    config
        .apply_overrides(|key| std::env::var(key).ok())
        .context("Invalid GOLFBENCH_* environment")?;
    if let Some(raw) = max_steps {
        config.max_steps_per_run = parse_step_limit(raw).context("Invalid --max-steps")?;
    }
    config.validate()?;
    Ok(config)
}

async fn open_store(memory: bool) -> Result<Arc<dyn ScoreStore>> {
    if memory {
        info!("using in-memory score store");
        return Ok(Arc::new(MemoryScoreStore::new()));
    }
    let store = SurrealScoreStore::from_env()
        .await
        .context("Failed to connect to golfbench database")?;
    Ok(Arc::new(store))
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
}

/// Validate, evaluate and record a submission
async fn cmd_submit(harness: &Harness<StackVm>, name: &str, file: &Path) -> Result<()> {
    let raw = read_source(file)?;
    let submission = Submission::parse(name, &raw)?;

    let record = harness
        .submit(submission.name(), submission.source())
        .await
        .context("Submission rejected")?;

    println!(
        "Passed {}/{} tests",
        record.passed_count(),
        harness.battery().len()
    );
    println!("Code length:    {} bytes", record.code_length());
    println!("Execution cost: {}", record.execution_cost());
    println!("Score id:       {}", record.score_id());

    Ok(())
}

/// Evaluate without recording
async fn cmd_check(harness: &Harness<StackVm>, file: &Path, json: bool) -> Result<()> {
    let raw = read_source(file)?;
    let source = normalize_source(&raw)?;

    let evaluation = harness
        .check(source)
        .await
        .context("Program does not compile")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
    } else {
        print!("{}", render_evaluation(&evaluation));
    }

    Ok(())
}

/// Show the ranked leaderboard
async fn cmd_leaderboard(
    harness: &Harness<StackVm>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let records = match limit {
        Some(limit) => harness.leaderboard(limit).await?,
        None => harness.display().await?,
    };

    if json {
        let rows: Vec<LeaderboardRow> = records
            .iter()
            .enumerate()
            .map(|(idx, record)| LeaderboardRow {
                rank: idx + 1,
                record,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No scores recorded yet");
        return Ok(());
    }
    let total = harness.total_records().await?;
    print!("{}", render_leaderboard(&records, harness.battery().len()));
    println!("({} of {} submissions shown)", records.len(), total);

    Ok(())
}

/// List battery inputs and reference values
fn cmd_battery(harness: &Harness<StackVm>) -> Result<()> {
    let battery = harness.battery();
    println!("Battery: {} inputs (sha256 {})", battery.len(), battery.digest());
    for input in battery.iter() {
        println!("{:>5}  {}", input, harness.oracle().reference(input));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct LeaderboardRow<'a> {
    rank: usize,
    #[serde(flatten)]
    record: &'a ScoreRecord,
}

fn render_leaderboard(records: &[ScoreRecord], battery_len: usize) -> String {
    let mut out = format!(
        "{:<4} {:<20} {:>9} {:>8} {:>12}  {}\n",
        "RANK", "NAME", "PASSED", "LENGTH", "COST", "SUBMITTED"
    );
    for (idx, record) in records.iter().enumerate() {
        out.push_str(&format!(
            "{:<4} {:<20} {:>9} {:>8} {:>12}  {}\n",
            idx + 1,
            record.submitter_name(),
            format!("{}/{}", record.passed_count(), battery_len),
            record.code_length(),
            record.execution_cost(),
            record.submitted_at().format("%Y-%m-%d %H:%M:%S UTC"),
        ));
    }
    out
}

fn render_evaluation(evaluation: &Evaluation) -> String {
    let mut out = String::new();
    for case in &evaluation.cases {
        let status = match (&case.fault, case.passed) {
            (Some(fault), _) => format!("FAULT  {fault}"),
            (None, true) => "ok".to_string(),
            (None, false) => "wrong".to_string(),
        };
        out.push_str(&format!(
            "input {:>4}  cost {:>8}  {}\n",
            case.input, case.cost, status
        ));
    }
    out.push_str(&format!(
        "Passed {}/{} tests, length {} bytes, cost {}\n",
        evaluation.passed_count,
        evaluation.total_tests(),
        evaluation.code_length,
        evaluation.total_cost
    ));
    out
}
