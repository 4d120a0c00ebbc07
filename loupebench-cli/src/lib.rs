#![warn(missing_docs)]
//! LoupeBench CLI Library
//!
//! Command-line driver for the loupe gas benchmark. Resolves the scenario
//! list and runner settings (compiled-in defaults, then `loupe.toml`, then
//! flags), runs every scenario against a simulated chain and writes the
//! report.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     loupebench_cli::run()
//! }
//! ```

mod config;
mod error;
mod executor;
mod planner;

pub use config::*;
pub use error::{BenchError, Step};
pub use executor::{
    BenchSettings, CandidateDeployment, ComparativeRunner, DeploymentDriver, DiamondDeployment,
    RegistrationOrchestrator, RunSummary, ScenarioOutcome, build_report_meta, format_human_output,
};
pub use planner::{ExecutionPlan, build_plan};

use clap::{Parser, Subcommand};
use loupebench_chain::{ChainBackend, SimulatedChain, SimulatedChainConfig};
use loupebench_core::{DEFAULT_SCENARIOS, Scenario, facet_share};
use loupebench_report::{
    CsvFileSink, DEFAULT_REPORT_PATH, OutputFormat, Report, ReportConfig, ResultAggregator,
    generate_json_report,
};
use regex::Regex;
use std::path::PathBuf;
use std::time::Instant;

/// LoupeBench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "loupebench")]
#[command(
    author,
    version,
    about = "LoupeBench - gas comparison of two diamond loupe implementations"
)]
pub struct Cli {
    /// Optional subcommand (List, Run, Init); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Filter scenarios by regex pattern on their id (e.g. "^64x")
    #[arg(default_value = ".*")]
    pub filter: String,

    /// Output format: csv, json, human (default from loupe.toml, else csv)
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (CSV defaults to loupe_benchmark_results.csv, others to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (discovered loupe.toml if not specified)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Scenario to run, repeatable; replaces the configured list
    #[arg(long = "scenario", value_name = "SELECTORSxFACETS")]
    pub scenarios: Vec<Scenario>,

    /// Registration entries per diamondCut call
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Loupe function measured for each candidate (e.g. "facets()")
    #[arg(long)]
    pub entrypoint: Option<String>,

    /// Dry run - list scenarios without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the planned scenarios
    List,
    /// Run scenarios (default)
    Run,
    /// Write a default loupe.toml to the current directory
    Init,
}

/// Fully resolved run parameters
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Scenario list before filtering
    pub scenarios: Vec<Scenario>,
    /// Runner parameters
    pub bench: BenchSettings,
    /// Entrypoint signature as configured
    pub entrypoint: String,
    /// Simulated chain parameters
    pub chain: SimulatedChainConfig,
    /// Report format
    pub format: OutputFormat,
    /// Report destination; `None` prints to stdout
    pub output: Option<PathBuf>,
}

impl RunSettings {
    /// Run configuration as captured in report metadata
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            max_batch_size: self.bench.max_batch_size,
            entrypoint: self.entrypoint.clone(),
            block_gas_limit: self.chain.block_gas_limit,
            scenarios: self.scenarios.clone(),
        }
    }
}

/// Results of executing a plan
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Recorded results and failures
    pub aggregator: ResultAggregator,
    /// Full report built from the aggregator
    pub report: Report,
    /// Scenario counts
    pub summary: RunSummary,
}

/// Run the LoupeBench CLI with the process arguments.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the LoupeBench CLI with pre-parsed arguments.
///
/// Exits the process with status 1 after writing the report if any
/// scenario failed.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("loupebench=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("loupebench=info")
            .init();
    }

    if matches!(cli.command, Some(Commands::Init)) {
        return init_config();
    }

    let config = match &cli.config {
        Some(path) => LoupeConfig::load(path)?,
        None => LoupeConfig::discover().unwrap_or_default(),
    };
    let settings = build_run_settings(&cli, &config)?;
    let filter = Regex::new(&cli.filter)?;
    let plan = build_plan(settings.scenarios.iter().copied(), Some(&filter));

    match cli.command {
        Some(Commands::List) => list_scenarios(&plan, &settings),
        Some(Commands::Run) => run_scenarios(&plan, &settings)?,
        Some(Commands::Init) => {}
        None => {
            if cli.dry_run {
                list_scenarios(&plan, &settings);
            } else {
                run_scenarios(&plan, &settings)?;
            }
        }
    }

    Ok(())
}

/// Layer defaults, `loupe.toml` and CLI flags into run settings.
pub fn build_run_settings(cli: &Cli, config: &LoupeConfig) -> anyhow::Result<RunSettings> {
    let scenarios = if !cli.scenarios.is_empty() {
        cli.scenarios.clone()
    } else {
        config
            .runner
            .scenarios
            .clone()
            .unwrap_or_else(|| DEFAULT_SCENARIOS.to_vec())
    };

    let max_batch_size = cli.batch_size.unwrap_or(config.runner.max_batch_size);
    let entrypoint = cli
        .entrypoint
        .clone()
        .unwrap_or_else(|| config.runner.entrypoint.clone());
    let bench = BenchSettings::new(max_batch_size, &entrypoint)?;

    let chain = SimulatedChainConfig {
        block_gas_limit: config.runner.block_gas_limit,
        block_time: config.block_time()?,
        ..Default::default()
    };

    let format: OutputFormat = cli
        .format
        .as_deref()
        .unwrap_or(&config.output.format)
        .parse()
        .map_err(anyhow::Error::msg)?;

    let output = match (&cli.output, format) {
        (Some(path), _) => Some(path.clone()),
        (None, OutputFormat::Csv) => Some(PathBuf::from(&config.output.path)),
        (None, _) => None,
    };

    Ok(RunSettings {
        scenarios,
        bench,
        entrypoint: entrypoint.trim().to_string(),
        chain,
        format,
        output,
    })
}

/// Execute `plan` against `backend`.
pub async fn execute_plan<B: ChainBackend + ?Sized>(
    backend: &B,
    plan: &ExecutionPlan,
    settings: &RunSettings,
) -> RunOutput {
    let start_time = Instant::now();
    let mut aggregator = ResultAggregator::new();

    let runner = ComparativeRunner::new(backend, settings.bench.clone());
    let summary = runner.run_all(&plan.scenarios, &mut aggregator).await;

    let total_duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
    let meta = build_report_meta(settings.report_config());
    let report = aggregator.to_report(meta, total_duration_ms);

    RunOutput {
        aggregator,
        report,
        summary,
    }
}

/// Write the report in the configured format.
pub fn write_output(settings: &RunSettings, output: &RunOutput) -> anyhow::Result<()> {
    let text = match settings.format {
        OutputFormat::Csv => {
            let path = settings
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH));
            output.aggregator.flush(&mut CsvFileSink::new(&path))?;
            println!("Report written to: {}", path.display());
            return Ok(());
        }
        OutputFormat::Json => generate_json_report(&output.report)?,
        OutputFormat::Human => format_human_output(&output.report),
    };

    if let Some(ref path) = settings.output {
        std::fs::write(path, text.as_bytes())?;
        println!("Report written to: {}", path.display());
    } else {
        print!("{}", text);
    }
    Ok(())
}

/// Run `plan` and write the report.
///
/// An empty plan still writes a report, header-only for CSV.
fn run_scenarios(plan: &ExecutionPlan, settings: &RunSettings) -> anyhow::Result<()> {
    if plan.scenarios.is_empty() {
        println!("No scenarios found.");
    } else {
        println!(
            "Running {} scenarios (batch size {}, entrypoint {})...\n",
            plan.scenarios.len(),
            settings.bench.max_batch_size,
            settings.entrypoint
        );
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let chain = SimulatedChain::new(settings.chain.clone());
    let output = runtime.block_on(execute_plan(&chain, plan, settings));

    write_output(settings, &output)?;

    if output.summary.failed > 0 {
        eprintln!("\n{} scenario(s) failed", output.summary.failed);
        std::process::exit(1);
    }
    Ok(())
}

fn list_scenarios(plan: &ExecutionPlan, settings: &RunSettings) {
    println!("LoupeBench Plan:");
    for scenario in &plan.scenarios {
        let entries = (0..scenario.facet_count)
            .filter(|&i| facet_share(scenario.total_selectors, scenario.facet_count, i) > 0)
            .count();
        let batches = entries.div_ceil(settings.bench.max_batch_size);
        println!(
            "├── {} ({} selectors / {} facets, {} entries in {} batch(es))",
            scenario, scenario.total_selectors, scenario.facet_count, entries, batches
        );
    }
    println!("{} scenarios found.", plan.scenarios.len());
}

fn init_config() -> anyhow::Result<()> {
    let path = PathBuf::from(CONFIG_FILE_NAME);
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    std::fs::write(&path, LoupeConfig::default_toml())?;
    println!("Wrote {}", path.display());
    Ok(())
}
