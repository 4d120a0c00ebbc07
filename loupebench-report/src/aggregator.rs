//! Result Aggregation
//!
//! [`ResultAggregator`] collects per-scenario results in memory while the
//! runner works through the scenario list, then writes them to a
//! [`ReportSink`] in one go. Results keep their recording order.

use crate::csv::generate_csv_report;
use crate::report::{
    BenchmarkResult, Report, ReportMeta, ReportSummary, ScenarioDivergence, ScenarioFailure,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while writing a report
#[derive(Debug, Error)]
pub enum ReportError {
    /// Report file could not be written
    #[error("failed to write report to {path}: {source}")]
    Io {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Destination for flushed results
pub trait ReportSink {
    /// Write a complete result set
    fn write(&mut self, results: &[BenchmarkResult]) -> Result<(), ReportError>;
}

/// CSV file sink; each write replaces the file contents
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    /// Sink writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Destination path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for CsvFileSink {
    fn write(&mut self, results: &[BenchmarkResult]) -> Result<(), ReportError> {
        std::fs::write(&self.path, generate_csv_report(results)).map_err(|source| {
            ReportError::Io {
                path: self.path.clone(),
                source,
            }
        })
    }
}

/// In-memory CSV sink; writes accumulate
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Concatenated CSV output of every write
    pub contents: String,
    /// Number of writes received
    pub writes: usize,
}

impl ReportSink for MemorySink {
    fn write(&mut self, results: &[BenchmarkResult]) -> Result<(), ReportError> {
        self.contents.push_str(&generate_csv_report(results));
        self.writes += 1;
        Ok(())
    }
}

/// Accumulates results, failures and surface divergences for one run
#[derive(Debug, Clone, Default)]
pub struct ResultAggregator {
    results: Vec<BenchmarkResult>,
    failures: Vec<ScenarioFailure>,
    divergences: Vec<ScenarioDivergence>,
}

impl ResultAggregator {
    /// Empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result
    pub fn record(&mut self, result: BenchmarkResult) {
        self.results.push(result);
    }

    /// Append a scenario failure
    pub fn record_failure(&mut self, failure: ScenarioFailure) {
        self.failures.push(failure);
    }

    /// Append a surface divergence
    pub fn record_divergence(&mut self, divergence: ScenarioDivergence) {
        self.divergences.push(divergence);
    }

    /// Results in recording order
    pub fn results(&self) -> &[BenchmarkResult] {
        &self.results
    }

    /// Failures in recording order
    pub fn failures(&self) -> &[ScenarioFailure] {
        &self.failures
    }

    /// Divergences in recording order
    pub fn divergences(&self) -> &[ScenarioDivergence] {
        &self.divergences
    }

    /// True if any scenario failed
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Write every recorded result to `sink`.
    ///
    /// Each call writes the full set again; flushing twice into an appending
    /// sink duplicates the rows.
    pub fn flush(&self, sink: &mut dyn ReportSink) -> Result<(), ReportError> {
        sink.write(&self.results)
    }

    /// Build the full report
    pub fn to_report(&self, meta: ReportMeta, total_duration_ms: f64) -> Report {
        let passed: HashSet<_> = self.results.iter().map(|r| r.scenario()).collect();
        let failed: HashSet<_> = self.failures.iter().map(|f| f.scenario).collect();

        let summary = ReportSummary {
            total_scenarios: passed.len() + failed.len(),
            passed: passed.len(),
            failed: failed.len(),
            divergent: self.divergences.len(),
            total_duration_ms,
        };

        Report {
            meta,
            results: self.results.clone(),
            failures: self.failures.clone(),
            divergences: self.divergences.clone(),
            summary,
        }
    }
}
