//! Command-line driver for kindle datasets.
//!
//! Loads a text file as a dataset of lines and runs one operation on it,
//! printing the result as JSON on stdout. Logs go to stderr.
//!
//! ```bash
//! kindle data.csv --header --partitions 4 --workers 3 take 5
//! kindle numbers.txt -n 3 average
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kindle_core::{Dataset, DatasetError, FlowConfig, FlowContext, WorkerPool};
use serde_json::{Value, json};
use std::path::PathBuf;
use tracing::{Level, debug};

#[derive(Parser, Debug)]
#[command(
    name = "kindle",
    version,
    about = "Run partitioned dataset operations over the lines of a text file"
)]
struct Cli {
    /// Input file, one element per line
    file: PathBuf,

    /// Number of partitions (defaults to the configured default)
    #[arg(short = 'n', long)]
    partitions: Option<usize>,

    /// Treat the first line as a header and exclude it from the data
    #[arg(long)]
    header: bool,

    /// Size of a fixed worker pool for placement; one worker per partition if omitted
    #[arg(short, long)]
    workers: Option<usize>,

    /// Threads for partition-local work; sequential if omitted
    #[arg(short, long)]
    threads: Option<usize>,

    /// JSON configuration file; command-line flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Number of lines
    Count,
    /// Every line in order
    Collect,
    /// The first N lines
    Take { n: usize },
    /// Sum of the lines parsed as numbers
    Sum,
    /// Mean of the lines parsed as numbers
    Average,
    /// Smallest numeric value
    Min,
    /// Largest numeric value
    Max,
    /// Lines sorted lexicographically
    Sort {
        #[arg(long)]
        descending: bool,
    },
    /// Lines grouped by their first characters
    GroupByPrefix {
        #[arg(long, default_value_t = 1)]
        len: usize,
    },
    /// Worker location of every partition
    Placement,
    /// Merge partitions down to the given count and describe the result
    Coalesce { partitions: usize },
    /// Partition sizes, placement and header
    Summary,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Result<FlowConfig> {
    let mut config = match &cli.config {
        Some(path) => FlowConfig::from_file(path)?,
        None => FlowConfig::new("kindle-cli"),
    };
    if let Some(threads) = cli.threads {
        config = config.with_threads(threads);
    }
    if let Some(workers) = cli.workers {
        config = config.with_worker_pool(WorkerPool::Fixed(workers));
    }
    config.validate()?;
    Ok(config)
}

fn parse_numbers(lines: &Dataset<String>) -> Result<Dataset<f64>, DatasetError> {
    lines.try_map(|line| {
        line.parse::<f64>()
            .map_err(|_| DatasetError::type_mismatch("f64", line.as_str()))
    })
}

/// JSON has no NaN or infinity, so those are written as strings.
fn number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(value.to_string()))
}

fn run(cli: &Cli, lines: &Dataset<String>) -> Result<Value> {
    let output = match &cli.command {
        Command::Count => json!(lines.count()),
        Command::Collect => json!(lines.collect()),
        Command::Take { n } => json!(lines.take(*n)),
        Command::Sum => number(parse_numbers(lines)?.sum()?),
        Command::Average => number(parse_numbers(lines)?.average()?),
        Command::Min => number(parse_numbers(lines)?.min()?),
        Command::Max => number(parse_numbers(lines)?.max()?),
        Command::Sort { descending } => json!(lines.sort(*descending)?.collect()),
        Command::GroupByPrefix { len } => {
            let groups = lines.group_by(|line| line.chars().take(*len).collect::<String>());
            Value::Array(
                groups
                    .into_iter()
                    .map(|(key, values)| json!({ "key": key, "values": values }))
                    .collect(),
            )
        }
        Command::Placement => json!(lines.placement().labels()),
        Command::Coalesce { partitions } => {
            serde_json::to_value(lines.coalesce(*partitions)?.summary())?
        }
        Command::Summary => serde_json::to_value(lines.summary())?,
    };
    Ok(output)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = build_config(&cli)?;
    let num_partitions = cli.partitions.unwrap_or(config.default_partitions);
    let mut context = FlowContext::new(config)?;
    let lines = context
        .text_file(&cli.file, num_partitions, cli.header)
        .with_context(|| format!("Failed to load {}", cli.file.display()))?;
    debug!(command = ?cli.command, "running command");

    let output = run(&cli, &lines)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
