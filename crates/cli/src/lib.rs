use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use risk_protocol::{schema_json, SchemaKind, Snapshot};
use risk_stats::{AggregatorConfig, FormStatsAggregator};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

mod output;

use output::{print_json, print_stdout, ErrorResponse};

#[derive(Parser)]
#[command(name = "risk-stats")]
#[command(about = "Roll up K/V/P risk scores of assessment forms", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute stats for one form of a snapshot
    Stats(StatsArgs),

    /// Print the JSON Schema of the snapshot input or the stats output
    Schema(SchemaArgs),
}

#[derive(Args)]
struct StatsArgs {
    /// Inline snapshot JSON (mutually exclusive with --file)
    #[arg(long, conflicts_with = "file")]
    json: Option<String>,

    /// Path to snapshot JSON file (stdin when neither --json nor --file is given)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Form id; may be omitted when the snapshot holds a single form
    #[arg(long)]
    form: Option<u64>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Build item stats in parallel
    #[arg(long)]
    parallel: bool,

    /// Minimum item count before --parallel takes effect
    #[arg(long, default_value_t = AggregatorConfig::default().min_parallel_items)]
    min_parallel_items: usize,
}

#[derive(Args)]
struct SchemaArgs {
    /// Which document to describe
    #[arg(long, value_enum, default_value = "output")]
    kind: SchemaTarget,
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaTarget {
    Input,
    Output,
}

impl From<SchemaTarget> for SchemaKind {
    fn from(target: SchemaTarget) -> Self {
        match target {
            SchemaTarget::Input => SchemaKind::Input,
            SchemaTarget::Output => SchemaKind::Output,
        }
    }
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let result = match cli.command {
        Commands::Stats(args) => run_stats(args),
        Commands::Schema(args) => run_schema(args),
    };

    if let Err(err) = result {
        log::error!("{err:#}");
        print_json(&ErrorResponse::from_error(&err), false)?;
        std::process::exit(1);
    }
    Ok(())
}

fn run_stats(args: StatsArgs) -> Result<()> {
    let raw = read_payload(&args)?;
    let snapshot = Snapshot::from_json(&raw)?;

    let config = AggregatorConfig {
        parallel_items: args.parallel,
        min_parallel_items: args.min_parallel_items,
    };
    let aggregator = FormStatsAggregator::new(config)?;

    log::info!(
        "Loaded snapshot: {} form(s), {} group(s)",
        snapshot.forms.len(),
        snapshot.groups.len()
    );

    let stats = aggregator
        .aggregate_snapshot(&snapshot, args.form)
        .context("Failed to compute form stats")?;

    print_json(&stats, args.pretty)
}

fn run_schema(args: SchemaArgs) -> Result<()> {
    let schema = schema_json(args.kind.into())?;
    print_stdout(&schema)
}

fn read_payload(args: &StatsArgs) -> Result<String> {
    if let Some(raw) = &args.json {
        return Ok(raw.clone());
    }
    if let Some(path) = &args.file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot from {}", path.display()));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read snapshot from stdin")?;

    if buffer.trim().is_empty() {
        anyhow::bail!("Snapshot is empty. Provide --json, --file, or pipe JSON via stdin.");
    }

    Ok(buffer)
}
