#![warn(missing_docs)]
//! LoupeBench Report - Result Aggregation and Output
//!
//! Generates the output formats of a benchmark run:
//! - CSV (fixed column set, the durable report)
//! - JSON (machine-readable, with metadata and failures)
//! - Human (terminal table, rendered by the CLI)

mod aggregator;
mod csv;
mod json;
mod report;

pub use aggregator::{CsvFileSink, MemorySink, ReportError, ReportSink, ResultAggregator};
pub use csv::{CSV_HEADER, generate_csv_report};
pub use json::{REPORT_SCHEMA_VERSION, generate_json_report};
pub use report::{
    BenchmarkResult, Report, ReportConfig, ReportMeta, ReportSummary, ScenarioDivergence,
    ScenarioFailure, SurfaceDivergence, SystemInfo,
};

/// Default CSV report path, relative to the working directory
pub const DEFAULT_REPORT_PATH: &str = "loupe_benchmark_results.csv";

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// CSV with the fixed column set
    Csv,
    /// JSON with full metadata
    Json,
    /// Human-readable terminal output
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
